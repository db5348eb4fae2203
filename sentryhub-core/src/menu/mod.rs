//! Menu model
//!
//! - Item variants and the capabilities they bind to
//! - Validated menu definitions
//! - Synthesized rows for generated menus

pub mod definition;
pub mod item;
pub mod synth;

pub use definition::{DefinitionError, MenuDefinition, ROOT_MENU};
pub use item::{
    Action, AlertLevel, ChoiceGroup, Generator, MenuId, MenuItem, Query, RefreshPolicy, Setting,
};
