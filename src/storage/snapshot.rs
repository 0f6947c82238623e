use std::collections::BTreeMap;

use crate::ledger::category::CategoryRegistry;
use crate::ledger::entry::{EntryStore, ExpenseEntry};
use crate::ledger::income::IncomeLedger;
use crate::ledger::month::MonthKey;
use crate::palette::ColorSource;

use super::{KeyValueStore, Result};

pub const KEY_ITEMS: &str = "kakeibo-items";
pub const KEY_CATEGORIES: &str = "kakeibo-categories";
pub const KEY_INCOME: &str = "kakeibo-income";
pub const KEY_MONTHLY_INCOME: &str = "kakeibo-monthlyIncome";

/// Older snapshots kept the month map under this key. Read-only fallback;
/// saves always write the canonical keys.
const KEY_MONTHLY_INCOME_LEGACY: &str = "kakeibo-incomes";

/// Outcome of reading a snapshot: the rebuilt stores plus one warning per
/// recovery that was applied. An absent key is not a recovery, it simply
/// yields that key's default.
#[derive(Debug)]
pub struct LoadReport {
    pub categories: CategoryRegistry,
    pub entries: EntryStore,
    pub incomes: IncomeLedger,
    pub warnings: Vec<String>,
    pub migrations: Vec<String>,
}

/// Serializes the three stores to and from their string-keyed blobs.
///
/// Every key is handled independently: a corrupt or unreadable value falls
/// back to that key's default without touching the others.
pub struct SnapshotCodec;

impl SnapshotCodec {
    pub fn load(store: &dyn KeyValueStore, colors: &dyn ColorSource) -> LoadReport {
        let mut warnings = Vec::new();
        let mut migrations = Vec::new();
        let categories = Self::load_categories(store, colors, &mut warnings);
        let entries = Self::load_entries(store, &mut warnings);
        let incomes = Self::load_incomes(store, &mut warnings, &mut migrations);

        for entry in entries.list() {
            if !categories.contains(&entry.category) {
                warnings.push(format!(
                    "entry {} references unknown category `{}`",
                    entry.id, entry.category
                ));
            }
        }
        for warning in &warnings {
            tracing::warn!("{warning}");
        }
        for migration in &migrations {
            tracing::info!("{migration}");
        }
        LoadReport {
            categories,
            entries,
            incomes,
            warnings,
            migrations,
        }
    }

    /// Writes the full snapshot under the four canonical keys.
    pub fn save(
        store: &dyn KeyValueStore,
        categories: &CategoryRegistry,
        entries: &EntryStore,
        incomes: &IncomeLedger,
    ) -> Result<()> {
        let items = serde_json::to_string(entries.list())?;
        let names = serde_json::to_string(&categories.names())?;
        let monthly = serde_json::to_string(incomes.by_month())?;
        let base = incomes.base_income().to_string();

        store.set(KEY_ITEMS, &items)?;
        store.set(KEY_CATEGORIES, &names)?;
        store.set(KEY_INCOME, &base)?;
        store.set(KEY_MONTHLY_INCOME, &monthly)?;
        tracing::debug!(
            entries = entries.len(),
            categories = categories.len(),
            "snapshot saved"
        );
        Ok(())
    }

    fn read_key(
        store: &dyn KeyValueStore,
        key: &str,
        warnings: &mut Vec<String>,
    ) -> Option<String> {
        match store.get(key) {
            Ok(value) => value,
            Err(err) => {
                warnings.push(format!("`{}` is unreadable, using its default: {}", key, err));
                None
            }
        }
    }

    fn load_categories(
        store: &dyn KeyValueStore,
        colors: &dyn ColorSource,
        warnings: &mut Vec<String>,
    ) -> CategoryRegistry {
        let Some(raw) = Self::read_key(store, KEY_CATEGORIES, warnings) else {
            return CategoryRegistry::with_defaults();
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(names) => {
                let registry = CategoryRegistry::from_names(&names, colors);
                if registry.len() != names.len() {
                    warnings.push(format!(
                        "`{}` held blank or duplicate names, kept {} of {}",
                        KEY_CATEGORIES,
                        registry.len(),
                        names.len()
                    ));
                }
                registry
            }
            Err(err) => {
                warnings.push(format!(
                    "`{}` is corrupt, restoring the built-in categories: {}",
                    KEY_CATEGORIES, err
                ));
                CategoryRegistry::with_defaults()
            }
        }
    }

    fn load_entries(store: &dyn KeyValueStore, warnings: &mut Vec<String>) -> EntryStore {
        let Some(raw) = Self::read_key(store, KEY_ITEMS, warnings) else {
            return EntryStore::new();
        };
        match serde_json::from_str::<Vec<ExpenseEntry>>(&raw) {
            Ok(items) => EntryStore::from_entries(items),
            Err(err) => {
                warnings.push(format!(
                    "`{}` is corrupt, starting with no entries: {}",
                    KEY_ITEMS, err
                ));
                EntryStore::new()
            }
        }
    }

    fn load_incomes(
        store: &dyn KeyValueStore,
        warnings: &mut Vec<String>,
        migrations: &mut Vec<String>,
    ) -> IncomeLedger {
        let base = match Self::read_key(store, KEY_INCOME, warnings) {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(value) => value,
                Err(_) => {
                    warnings.push(format!(
                        "`{}` is not a number (`{}`), treating it as 0",
                        KEY_INCOME, raw
                    ));
                    0.0
                }
            },
            None => 0.0,
        };

        let raw_map = match Self::read_key(store, KEY_MONTHLY_INCOME, warnings) {
            Some(raw) => Some(raw),
            None => {
                let legacy = Self::read_key(store, KEY_MONTHLY_INCOME_LEGACY, warnings);
                if legacy.is_some() {
                    migrations.push(format!(
                        "monthly income loaded from legacy key `{}`",
                        KEY_MONTHLY_INCOME_LEGACY
                    ));
                }
                legacy
            }
        };

        let mut by_month = BTreeMap::new();
        if let Some(raw) = raw_map {
            match serde_json::from_str::<BTreeMap<String, f64>>(&raw) {
                Ok(parsed) => {
                    for (key, amount) in parsed {
                        match MonthKey::parse(&key) {
                            Some(month) => {
                                by_month.insert(month, amount);
                            }
                            None => {
                                warnings.push(format!(
                                    "ignored ill-formed month key `{}` in the income map",
                                    key
                                ));
                            }
                        }
                    }
                }
                Err(err) => {
                    warnings.push(format!(
                        "`{}` is corrupt, starting with no monthly income: {}",
                        KEY_MONTHLY_INCOME, err
                    ));
                }
            }
        }
        IncomeLedger::from_parts(base, by_month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::DefaultPalette;
    use crate::storage::MemoryStore;
    use crate::time::FixedClock;

    fn month(raw: &str) -> MonthKey {
        MonthKey::parse(raw).expect("month key")
    }

    #[test]
    fn empty_store_loads_pure_defaults() {
        let store = MemoryStore::new();
        let report = SnapshotCodec::load(&store, &DefaultPalette);
        assert_eq!(report.categories.len(), 7);
        assert!(report.entries.is_empty());
        assert!(report.incomes.is_empty());
        assert!(report.warnings.is_empty());
        assert!(report.migrations.is_empty());
    }

    #[test]
    fn corrupt_items_do_not_poison_other_keys() {
        let store = MemoryStore::seeded([
            (KEY_ITEMS, "{not json"),
            (KEY_CATEGORIES, r#"["食品","旅行"]"#),
        ]);
        let report = SnapshotCodec::load(&store, &DefaultPalette);
        assert!(report.entries.is_empty());
        assert_eq!(report.categories.len(), 2);
        assert!(report.categories.contains("旅行"));
        assert!(report
            .warnings
            .iter()
            .any(|warning| warning.contains(KEY_ITEMS)));
    }

    #[test]
    fn corrupt_categories_restore_the_builtin_set() {
        let store = MemoryStore::seeded([(KEY_CATEGORIES, "42")]);
        let report = SnapshotCodec::load(&store, &DefaultPalette);
        assert_eq!(report.categories.len(), 7);
        assert!(report
            .warnings
            .iter()
            .any(|warning| warning.contains(KEY_CATEGORIES)));
    }

    #[test]
    fn legacy_income_key_is_honored() {
        let store = MemoryStore::seeded([("kakeibo-incomes", r#"{"2025-01":3000}"#)]);
        let report = SnapshotCodec::load(&store, &DefaultPalette);
        assert_eq!(report.incomes.income_for(month("2025-01")), 3000.0);
        assert_eq!(report.migrations.len(), 1);
    }

    #[test]
    fn canonical_income_key_wins_over_legacy() {
        let store = MemoryStore::seeded([
            (KEY_MONTHLY_INCOME, r#"{"2025-01":2000}"#),
            ("kakeibo-incomes", r#"{"2025-01":9999}"#),
        ]);
        let report = SnapshotCodec::load(&store, &DefaultPalette);
        assert_eq!(report.incomes.income_for(month("2025-01")), 2000.0);
        assert!(report.migrations.is_empty());
    }

    #[test]
    fn ill_formed_month_keys_are_skipped() {
        let store = MemoryStore::seeded([(
            KEY_MONTHLY_INCOME,
            r#"{"2025-01":3000,"Fri Aug":1234,"2025-13":5}"#,
        )]);
        let report = SnapshotCodec::load(&store, &DefaultPalette);
        assert_eq!(report.incomes.income_for(month("2025-01")), 3000.0);
        assert_eq!(report.incomes.months().len(), 1);
        assert_eq!(
            report
                .warnings
                .iter()
                .filter(|warning| warning.contains("ill-formed month key"))
                .count(),
            2
        );
    }

    #[test]
    fn non_numeric_base_income_defaults_to_zero() {
        let store = MemoryStore::seeded([(KEY_INCOME, "a lot")]);
        let report = SnapshotCodec::load(&store, &DefaultPalette);
        assert_eq!(report.incomes.base_income(), 0.0);
        assert!(report
            .warnings
            .iter()
            .any(|warning| warning.contains(KEY_INCOME)));
    }

    #[test]
    fn orphan_entry_categories_are_kept_but_reported() {
        let store = MemoryStore::seeded([
            (
                KEY_ITEMS,
                r#"[{"id":1,"category":"骨董品","amount":800.0,"date":"2025-01-03","comment":""}]"#,
            ),
            (KEY_CATEGORIES, r#"["食品"]"#),
        ]);
        let report = SnapshotCodec::load(&store, &DefaultPalette);
        assert_eq!(report.entries.len(), 1);
        assert!(report
            .warnings
            .iter()
            .any(|warning| warning.contains("骨董品")));
    }

    #[test]
    fn save_then_load_preserves_everything() {
        let clock = FixedClock::at_date(2025, 1, 15);
        let palette = DefaultPalette;
        let mut categories = CategoryRegistry::with_defaults();
        categories.add("旅行", &palette).expect("add category");
        let mut entries = EntryStore::new();
        entries
            .add("旅行", 4200.0, None, "温泉", &clock)
            .expect("add entry");
        let mut incomes = IncomeLedger::new();
        incomes.set_income(month("2025-01"), 3000.0);

        let store = MemoryStore::new();
        SnapshotCodec::save(&store, &categories, &entries, &incomes).expect("save");
        let report = SnapshotCodec::load(&store, &palette);

        assert_eq!(report.categories.len(), 8);
        assert_eq!(report.categories.color_of("旅行"), categories.color_of("旅行"));
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries.list()[0].comment, "温泉");
        assert_eq!(report.incomes.income_for(month("2025-01")), 3000.0);
        assert_eq!(report.incomes.base_income(), 3000.0);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn saved_blobs_use_the_original_encodings() {
        let clock = FixedClock::at_date(2025, 1, 15);
        let mut entries = EntryStore::new();
        entries
            .add("食品", 1000.0, None, "", &clock)
            .expect("add entry");
        let mut incomes = IncomeLedger::new();
        incomes.set_income(month("2025-01"), 3000.0);
        let categories = CategoryRegistry::with_defaults();

        let store = MemoryStore::new();
        SnapshotCodec::save(&store, &categories, &entries, &incomes).expect("save");

        let raw_income = store.get(KEY_INCOME).expect("get").expect("income");
        assert_eq!(raw_income, "3000");
        let raw_monthly = store
            .get(KEY_MONTHLY_INCOME)
            .expect("get")
            .expect("monthly");
        assert_eq!(raw_monthly, r#"{"2025-01":3000.0}"#);
        let raw_names = store.get(KEY_CATEGORIES).expect("get").expect("names");
        assert!(raw_names.starts_with(r#"["食品""#));
    }
}
