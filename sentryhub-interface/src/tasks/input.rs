//! Bench input
//!
//! One command per line:
//!
//! | Line            | Meaning                  |
//! |-----------------|--------------------------|
//! | `+`, `++`, ...  | rotate clockwise         |
//! | `-`, `--`, ...  | rotate counter-clockwise |
//! | `3`, `-2`       | rotate by that many      |
//! | empty, `p`      | press                    |
//! | `q`             | quit                     |

use std::io::BufRead;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;
use tracing::{info, warn};

use sentryhub_core::traits::InputEvent;

/// A parsed input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Input(InputEvent),
    Quit,
}

/// Parse one input line; `None` if it means nothing
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    match line {
        "" | "p" => return Some(Command::Input(InputEvent::Press)),
        "q" => return Some(Command::Quit),
        _ => {}
    }

    if line.chars().all(|c| c == '+') {
        return Some(Command::Input(InputEvent::Rotation(line.len() as i32)));
    }
    if line.chars().all(|c| c == '-') {
        return Some(Command::Input(InputEvent::Rotation(-(line.len() as i32))));
    }
    match line.parse::<i32>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(Command::Input(InputEvent::Rotation(n))),
    }
}

/// Source of input commands
pub trait InputSource {
    /// Next command, or `None` once the source is exhausted
    fn next_command(&mut self) -> Option<Command>;
}

/// Line-oriented input from any reader (stdin on the bench)
#[derive(Debug)]
pub struct LineInput<R> {
    reader: R,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl LineInput<std::io::BufReader<std::io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(std::io::BufReader::new(std::io::stdin()))
    }
}

impl<R: BufRead> InputSource for LineInput<R> {
    fn next_command(&mut self) -> Option<Command> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => match parse_command(&line) {
                    Some(command) => return Some(command),
                    None => warn!("unrecognised input {:?}", line.trim()),
                },
                Err(e) => {
                    warn!("input read failed: {}", e);
                    return None;
                }
            }
        }
    }
}

/// Forward input events until the source ends or asks to quit
///
/// Dropping the sender on exit closes the channel, which is how the
/// dispatch loop learns to stop.
pub fn spawn_input_reader<S>(
    mut source: S,
    events: Sender<InputEvent>,
) -> std::io::Result<JoinHandle<()>>
where
    S: InputSource + Send + 'static,
{
    std::thread::Builder::new()
        .name("input".into())
        .spawn(move || {
            while let Some(command) = source.next_command() {
                match command {
                    Command::Input(event) => {
                        if events.send(event).is_err() {
                            break;
                        }
                    }
                    Command::Quit => {
                        info!("quit requested");
                        break;
                    }
                }
            }
        })
}
