//! Turning items into display rows
//!
//! Formatting is pure: it reads cached query results, the open edit
//! session and persisted settings, and never calls out to collaborators.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

use crate::edit::{EditSession, EditValue};
use crate::menu::item::fill_tokens;
use crate::menu::{MenuItem, Query};
use crate::traits::system::UNKNOWN;
use crate::traits::SettingsStore;

/// Maximum characters kept per row segment
pub const ROW_CHARS: usize = 32;

/// Text bounded to one row
pub type RowText = heapless::String<ROW_CHARS>;

/// Copy `s` into a row buffer, dropping whatever does not fit
pub fn row_text(s: &str) -> RowText {
    let mut out = RowText::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// A cached query result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedValue {
    pub value: String,
    pub refreshed_ms: u64,
}

/// Latest result of every query that has been run
#[derive(Debug, Clone, Default)]
pub struct DynamicValueCache {
    entries: BTreeMap<Query, CachedValue>,
}

impl DynamicValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, query: Query) -> Option<&str> {
        self.entries.get(&query).map(|e| e.value.as_str())
    }

    pub fn refreshed_at(&self, query: Query) -> Option<u64> {
        self.entries.get(&query).map(|e| e.refreshed_ms)
    }

    /// Store a fresh result; returns whether the displayed value changed
    pub fn store(&mut self, query: Query, value: String, now_ms: u64) -> bool {
        match self.entries.get_mut(&query) {
            Some(entry) => {
                entry.refreshed_ms = now_ms;
                if entry.value == value {
                    false
                } else {
                    entry.value = value;
                    true
                }
            }
            None => {
                self.entries.insert(
                    query,
                    CachedValue {
                        value,
                        refreshed_ms: now_ms,
                    },
                );
                true
            }
        }
    }

    /// Whether a query on the given interval should run again
    pub fn is_due(&self, query: Query, interval_ms: u64, now_ms: u64) -> bool {
        match self.refreshed_at(query) {
            Some(at) => now_ms.saturating_sub(at) >= interval_ms,
            None => true,
        }
    }
}

/// A fully formatted row, ready for layout
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedRow {
    pub text: RowText,
    pub right: Option<RowText>,
    /// Row leads into another menu and gets an indicator
    pub descends: bool,
}

impl FormattedRow {
    pub fn new(text: &str, right: Option<&str>, descends: bool) -> Self {
        Self {
            text: row_text(text),
            right: right.map(row_text),
            descends,
        }
    }
}

/// Everything the formatter reads
pub struct FormatContext<'a> {
    pub values: &'a DynamicValueCache,
    pub edit: Option<&'a EditSession>,
    pub settings: &'a dyn SettingsStore,
    pub limits: &'a BTreeMap<String, i32>,
}

pub const CHECKED: &str = "[x]";
pub const UNCHECKED: &str = "[ ]";

/// Put `value` into the item's placeholders
///
/// Tokens in the label win; otherwise a right template is filled, and
/// failing that the value becomes the right column.
fn place_value(text: &str, right: Option<&str>, value: &str) -> (String, Option<String>) {
    if text.contains('{') {
        (fill_tokens(text, value), right.map(|r| fill_tokens(r, value)))
    } else if let Some(r) = right {
        (text.to_string(), Some(fill_tokens(r, value)))
    } else {
        (text.to_string(), Some(value.to_string()))
    }
}

/// Format one item
pub fn format_item(item: &MenuItem, ctx: &FormatContext<'_>) -> FormattedRow {
    match item {
        MenuItem::Dynamic { text, .. } | MenuItem::SensorSummary { text, .. } => {
            let value = item
                .query()
                .and_then(|(q, _)| ctx.values.get(q))
                .unwrap_or(UNKNOWN);
            let right = item.right().map(|r| fill_tokens(r, value));
            FormattedRow::new(&fill_tokens(text, value), right.as_deref(), false)
        }
        MenuItem::Checkbox { text, group, value } => {
            let stored = ctx.settings.get_int(group.key(), group.default_value());
            let glyph = if stored == *value { CHECKED } else { UNCHECKED };
            let label = if text.contains('{') {
                fill_tokens(text, glyph)
            } else {
                let mut s = String::from(glyph);
                s.push(' ');
                s.push_str(text);
                s
            };
            FormattedRow::new(&label, None, false)
        }
        MenuItem::Editable { .. }
        | MenuItem::BrightnessBar { .. }
        | MenuItem::HueBar { .. }
        | MenuItem::ThresholdBar { .. } => format_editor(item, ctx),
        _ => FormattedRow::new(item.text(), item.right(), item.descends()),
    }
}

/// Editor rows show the live value in brackets while their session is
/// open, and the persisted value otherwise
fn format_editor(item: &MenuItem, ctx: &FormatContext<'_>) -> FormattedRow {
    let shown = match ctx.edit.filter(|session| session.targets(item)) {
        Some(session) => {
            let mut s = String::from("[");
            s.push_str(&session.value().to_string());
            s.push(']');
            s
        }
        None => match item.setting() {
            Some(setting) => {
                let fallback = match item {
                    MenuItem::ThresholdBar { min, .. } => *min,
                    _ => 0,
                };
                EditValue::read(&setting, ctx.settings, ctx.limits, fallback).to_string()
            }
            None => String::from(UNKNOWN),
        },
    };

    let (text, right) = place_value(item.text(), item.right(), &shown);
    FormattedRow::new(&text, right.as_deref(), false)
}
