//! Validated menu definitions
//!
//! A definition is a flat map of menu name to item list. Validation runs
//! once at load time so navigation never meets a dangling reference.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::item::{MenuId, MenuItem};

/// Name of the menu shown at startup
pub const ROOT_MENU: &str = "main";

/// Problems found while validating a definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// No menu named `main`
    MissingRoot,
    /// A menu has no items
    EmptyMenu(String),
    /// A submenu row points at a menu that does not exist
    UnknownSubmenu { menu: String, target: String },
    /// An editor row has `min >= max`
    InvalidBounds { menu: String, item: String },
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionError::MissingRoot => write!(f, "no '{}' menu defined", ROOT_MENU),
            DefinitionError::EmptyMenu(name) => write!(f, "menu '{}' has no items", name),
            DefinitionError::UnknownSubmenu { menu, target } => {
                write!(f, "menu '{}' links to unknown menu '{}'", menu, target)
            }
            DefinitionError::InvalidBounds { menu, item } => {
                write!(f, "item '{}' in menu '{}' has min >= max", item, menu)
            }
        }
    }
}

/// A complete, validated set of menus
#[derive(Debug, Clone, PartialEq)]
pub struct MenuDefinition {
    menus: BTreeMap<String, Vec<MenuItem>>,
}

impl MenuDefinition {
    /// Validate and wrap a set of menus
    pub fn new(menus: BTreeMap<String, Vec<MenuItem>>) -> Result<Self, DefinitionError> {
        if !menus.contains_key(ROOT_MENU) {
            return Err(DefinitionError::MissingRoot);
        }

        for (name, items) in &menus {
            if items.is_empty() {
                return Err(DefinitionError::EmptyMenu(name.clone()));
            }

            for item in items {
                Self::check_item(&menus, name, item)?;
            }
        }

        Ok(Self { menus })
    }

    fn check_item(
        menus: &BTreeMap<String, Vec<MenuItem>>,
        menu: &str,
        item: &MenuItem,
    ) -> Result<(), DefinitionError> {
        let bounds_ok = match item {
            MenuItem::Submenu {
                submenu: MenuId::Named(target),
                ..
            } => {
                if !menus.contains_key(target) {
                    return Err(DefinitionError::UnknownSubmenu {
                        menu: String::from(menu),
                        target: target.clone(),
                    });
                }
                true
            }
            MenuItem::Editable { min, max, .. }
            | MenuItem::BrightnessBar { min, max, .. }
            | MenuItem::ThresholdBar { min, max, .. } => min < max,
            MenuItem::HueBar { min, max, .. } => min < max,
            _ => true,
        };

        if bounds_ok {
            Ok(())
        } else {
            Err(DefinitionError::InvalidBounds {
                menu: String::from(menu),
                item: String::from(item.text()),
            })
        }
    }

    /// Items of a named menu
    pub fn get(&self, name: &str) -> Option<&[MenuItem]> {
        self.menus.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.menus.contains_key(name)
    }

    pub fn menu_names(&self) -> impl Iterator<Item = &str> {
        self.menus.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }
}
