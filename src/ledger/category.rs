use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};
use crate::palette::ColorSource;

/// Expense category with its assigned chart color.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRecord {
    pub name: String,
    pub color: String,
}

/// Built-in categories seeded into an empty ledger, with their fixed colors.
pub const DEFAULT_CATEGORIES: [(&str, &str); 7] = [
    ("食品", "#FF6384"),
    ("雑貨", "#36A2EB"),
    ("交通費", "#f1f141"),
    ("家賃", "#60f343"),
    ("光熱費", "#c1a8f2ff"),
    ("お小遣い", "#FF9F40"),
    ("その他", "#C9CBCF"),
];

fn builtin_color(name: &str) -> Option<&'static str> {
    DEFAULT_CATEGORIES
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, color)| *color)
}

/// Ordered set of categories. Names are unique after trimming and are the
/// only part persisted; colors are reassigned on load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRegistry {
    records: Vec<CategoryRecord>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let records = DEFAULT_CATEGORIES
            .iter()
            .map(|(name, color)| CategoryRecord {
                name: (*name).to_string(),
                color: (*color).to_string(),
            })
            .collect();
        CategoryRegistry { records }
    }

    /// Rebuilds a registry from persisted names. Built-in names keep their
    /// fixed colors, everything else is colored by `colors`. Blank and
    /// duplicate names are skipped.
    pub fn from_names<I, S>(names: I, colors: &dyn ColorSource) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = CategoryRegistry::new();
        for name in names {
            let _ = registry.add(name.as_ref(), colors);
        }
        registry
    }

    /// Registers a category. The color must match what a reload would
    /// rebuild for the same name, so built-in names use their fixed color.
    pub fn add(&mut self, name: &str, colors: &dyn ColorSource) -> Result<&CategoryRecord> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        if self.contains(trimmed) {
            return Err(LedgerError::DuplicateCategory(trimmed.to_string()));
        }
        let color = builtin_color(trimmed)
            .map(str::to_string)
            .unwrap_or_else(|| colors.color_for(trimmed));
        self.records.push(CategoryRecord {
            name: trimmed.to_string(),
            color,
        });
        tracing::debug!(category = trimmed, "category registered");
        Ok(self.records.last().expect("record just pushed"))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.iter().any(|record| record.name == name)
    }

    pub fn color_of(&self, name: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|record| record.name == name)
            .map(|record| record.color.as_str())
    }

    /// Records in insertion order.
    pub fn list(&self) -> &[CategoryRecord] {
        &self.records
    }

    /// Names in insertion order, the persisted representation.
    pub fn names(&self) -> Vec<String> {
        self.records.iter().map(|r| r.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
