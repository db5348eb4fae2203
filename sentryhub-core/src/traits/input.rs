//! Input events from the rotary encoder

/// Input events produced by the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Encoder turned; positive is clockwise (down the list, value up)
    Rotation(i32),
    /// Encoder shaft pressed
    Press,
}

impl InputEvent {
    /// Check if this is a rotation event
    pub fn is_rotation(&self) -> bool {
        matches!(self, InputEvent::Rotation(_))
    }

    /// Check if this is a button event
    pub fn is_press(&self) -> bool {
        matches!(self, InputEvent::Press)
    }

    /// Rotation delta, or zero for non-rotation events
    pub fn rotation_delta(&self) -> i32 {
        match self {
            InputEvent::Rotation(d) => *d,
            InputEvent::Press => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_delta() {
        assert_eq!(InputEvent::Rotation(3).rotation_delta(), 3);
        assert_eq!(InputEvent::Rotation(-1).rotation_delta(), -1);
        assert_eq!(InputEvent::Press.rotation_delta(), 0);
    }

    #[test]
    fn test_classification() {
        assert!(InputEvent::Rotation(1).is_rotation());
        assert!(!InputEvent::Rotation(1).is_press());
        assert!(InputEvent::Press.is_press());
    }
}
