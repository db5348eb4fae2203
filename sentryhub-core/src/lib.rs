//! Board-agnostic menu engine for the SentryHub front panel
//!
//! This crate contains all menu logic that does not depend on the host:
//!
//! - Collaborator traits (panel, settings, LED, sensors, host facts, scanner)
//! - Menu item model and definition validation
//! - Row formatting and pre-rendered frame caching
//! - Navigation, edit sessions and the inactivity timer
//! - The controller tying them together

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod controller;
pub mod edit;
pub mod format;
pub mod menu;
pub mod nav;
pub mod render;
pub mod sleep;
pub mod traits;

#[cfg(test)]
mod testing;

pub use controller::{MenuController, UiEvent};
