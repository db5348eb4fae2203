//! Navigation stack and cursor
//!
//! The stack always holds at least the root menu. The scroll offset is
//! the index of the highlighted item and stays within `[0, len - 1]`.

use alloc::vec;
use alloc::vec::Vec;

use crate::menu::MenuId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    stack: Vec<MenuId>,
    offset: usize,
    item_count: usize,
}

impl Navigation {
    pub fn new(root: MenuId) -> Self {
        Self {
            stack: vec![root],
            offset: 0,
            item_count: 0,
        }
    }

    /// Menu on top of the stack
    pub fn current(&self) -> &MenuId {
        // The root is never popped
        &self.stack[self.stack.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn stack(&self) -> &[MenuId] {
        &self.stack
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Enter a menu; the cursor returns to the top
    pub fn push(&mut self, id: MenuId) {
        self.stack.push(id);
        self.offset = 0;
    }

    /// Leave the current menu; the root is never popped
    pub fn pop(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        self.offset = 0;
        true
    }

    /// Record the size of the freshly resolved menu
    ///
    /// With `keep_offset` the cursor stays where it was, clamped to the new
    /// length; otherwise it returns to the top.
    pub fn set_item_count(&mut self, count: usize, keep_offset: bool) {
        self.item_count = count;
        if !keep_offset {
            self.offset = 0;
        }
        self.offset = self.offset.min(count.saturating_sub(1));
    }

    /// Move the cursor by `delta` rows; returns whether it moved
    pub fn scroll(&mut self, delta: i32) -> bool {
        let last = self.item_count.saturating_sub(1) as i64;
        let next = (self.offset as i64 + i64::from(delta)).clamp(0, last) as usize;
        let moved = next != self.offset;
        self.offset = next;
        moved
    }

    pub fn cursor_down(&mut self) -> bool {
        self.scroll(1)
    }

    pub fn cursor_up(&mut self) -> bool {
        self.scroll(-1)
    }
}
