use std::collections::BTreeMap;

use crate::ledger::month::MonthKey;

fn sanitize(amount: f64) -> f64 {
    if amount.is_finite() {
        amount.max(0.0)
    } else {
        0.0
    }
}

/// Declared income per month, plus the base income carried forward into
/// months that have no declaration of their own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomeLedger {
    by_month: BTreeMap<MonthKey, f64>,
    base: f64,
}

impl IncomeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(base: f64, by_month: BTreeMap<MonthKey, f64>) -> Self {
        let by_month = by_month
            .into_iter()
            .map(|(month, amount)| (month, sanitize(amount)))
            .collect();
        IncomeLedger {
            by_month,
            base: sanitize(base),
        }
    }

    /// Declares the income for a month, overwriting any prior value. The
    /// sanitized amount becomes the new base income.
    pub fn set_income(&mut self, month: MonthKey, amount: f64) {
        let amount = sanitize(amount);
        self.by_month.insert(month, amount);
        self.base = amount;
        tracing::debug!(%month, amount, "income declared");
    }

    /// Applies the base income to `month` when it has none of its own.
    /// Returns whether anything changed.
    pub fn carry_forward(&mut self, month: MonthKey) -> bool {
        if self.base > 0.0 && !self.by_month.contains_key(&month) {
            self.by_month.insert(month, self.base);
            tracing::debug!(%month, amount = self.base, "base income carried forward");
            true
        } else {
            false
        }
    }

    pub fn income_for(&self, month: MonthKey) -> f64 {
        self.by_month.get(&month).copied().unwrap_or(0.0)
    }

    pub fn total_income(&self) -> f64 {
        self.by_month.values().sum()
    }

    pub fn base_income(&self) -> f64 {
        self.base
    }

    /// Months with a declared income, ascending.
    pub fn months(&self) -> Vec<MonthKey> {
        self.by_month.keys().copied().collect()
    }

    pub fn by_month(&self) -> &BTreeMap<MonthKey, f64> {
        &self.by_month
    }

    pub fn is_empty(&self) -> bool {
        self.by_month.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(raw: &str) -> MonthKey {
        MonthKey::parse(raw).expect("month key")
    }

    #[test]
    fn declared_income_overwrites_and_tracks_base() {
        let mut ledger = IncomeLedger::new();
        ledger.set_income(month("2025-01"), 3000.0);
        ledger.set_income(month("2025-01"), 2500.0);
        assert_eq!(ledger.income_for(month("2025-01")), 2500.0);
        assert_eq!(ledger.base_income(), 2500.0);
        assert_eq!(ledger.income_for(month("2025-02")), 0.0);
    }

    #[test]
    fn amounts_are_sanitized() {
        let mut ledger = IncomeLedger::new();
        ledger.set_income(month("2025-01"), f64::NAN);
        assert_eq!(ledger.income_for(month("2025-01")), 0.0);
        ledger.set_income(month("2025-02"), -500.0);
        assert_eq!(ledger.income_for(month("2025-02")), 0.0);
        ledger.set_income(month("2025-03"), f64::INFINITY);
        assert_eq!(ledger.income_for(month("2025-03")), 0.0);
        assert_eq!(ledger.base_income(), 0.0);
    }

    #[test]
    fn carry_forward_fills_only_missing_months() {
        let mut ledger = IncomeLedger::new();
        ledger.set_income(month("2025-01"), 3000.0);
        assert!(ledger.carry_forward(month("2025-02")));
        assert_eq!(ledger.income_for(month("2025-02")), 3000.0);
        assert!(!ledger.carry_forward(month("2025-01")));
        assert!(!ledger.carry_forward(month("2025-02")));
    }

    #[test]
    fn carry_forward_is_inert_without_a_base() {
        let mut ledger = IncomeLedger::new();
        assert!(!ledger.carry_forward(month("2025-02")));
        assert!(ledger.is_empty());
    }

    #[test]
    fn totals_and_months_cover_every_declaration() {
        let mut ledger = IncomeLedger::new();
        ledger.set_income(month("2025-02"), 1000.0);
        ledger.set_income(month("2024-12"), 2000.0);
        ledger.set_income(month("2025-01"), 3000.0);
        assert_eq!(ledger.total_income(), 6000.0);
        let months: Vec<String> = ledger.months().iter().map(MonthKey::to_string).collect();
        assert_eq!(months, vec!["2024-12", "2025-01", "2025-02"]);
    }

    #[test]
    fn loaded_values_are_clamped() {
        let mut by_month = BTreeMap::new();
        by_month.insert(month("2025-01"), -100.0);
        by_month.insert(month("2025-02"), 400.0);
        let ledger = IncomeLedger::from_parts(-1.0, by_month);
        assert_eq!(ledger.income_for(month("2025-01")), 0.0);
        assert_eq!(ledger.income_for(month("2025-02")), 400.0);
        assert_eq!(ledger.base_income(), 0.0);
    }
}
