use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kakeibo_core::ledger::{
    CategoryRegistry, DEFAULT_CATEGORIES, EntryStore, IncomeLedger, MonthFilter, MonthKey,
};
use kakeibo_core::reports::{EntryQuery, ReportService};
use kakeibo_core::storage::{FileStore, SnapshotCodec};
use kakeibo_core::time::FixedClock;
use kakeibo_core::DefaultPalette;
use tempfile::tempdir;

fn build_sample_stores(entry_count: usize) -> (CategoryRegistry, EntryStore, IncomeLedger) {
    let clock = FixedClock::at_date(2025, 12, 31);
    let categories = CategoryRegistry::with_defaults();
    let start_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    let mut entries = EntryStore::new();
    for idx in 0..entry_count {
        let date = start_date + Duration::days((idx % 365) as i64);
        let category = DEFAULT_CATEGORIES[idx % DEFAULT_CATEGORIES.len()].0;
        let comment = if idx % 12 == 0 { "まとめ買い" } else { "" };
        entries
            .add(
                category,
                50.0 + (idx % 100) as f64,
                Some(date),
                comment,
                &clock,
            )
            .expect("add entry");
    }

    let mut incomes = IncomeLedger::new();
    for month in 1..=12 {
        let key = MonthKey::new(2025, month).expect("month key");
        incomes.set_income(key, 280_000.0);
    }
    (categories, entries, incomes)
}

fn bench_snapshot_io(c: &mut Criterion) {
    let (categories, entries, incomes) = build_sample_stores(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let store = FileStore::new(Some(dir.path().to_path_buf())).expect("file store");

    c.bench_function("snapshot_save_10k", |b| {
        b.iter(|| {
            SnapshotCodec::save(&store, &categories, &entries, &incomes).expect("save snapshot");
        })
    });

    SnapshotCodec::save(&store, &categories, &entries, &incomes).expect("seed");

    c.bench_function("snapshot_load_10k", |b| {
        b.iter(|| {
            let report = SnapshotCodec::load(&store, &DefaultPalette);
            black_box(report);
        })
    });
}

fn bench_reports(c: &mut Criterion) {
    let (categories, entries, incomes) = build_sample_stores(black_box(10_000));
    let june = MonthFilter::Month(MonthKey::new(2025, 6).expect("month key"));

    c.bench_function("monthly_total_10k", |b| {
        b.iter(|| {
            let total = ReportService::total_expense(june, &entries);
            black_box(total);
        })
    });

    c.bench_function("chart_data_10k", |b| {
        b.iter(|| {
            let chart = ReportService::chart_data(june, &categories, &entries);
            black_box(chart);
        })
    });

    c.bench_function("monthly_summary_10k", |b| {
        b.iter(|| {
            let rows = ReportService::monthly_summary(&entries, &incomes);
            black_box(rows);
        })
    });

    c.bench_function("keyword_search_10k", |b| {
        let query = EntryQuery::keyword("まとめ買い");
        b.iter(|| {
            let hits = ReportService::filter_entries(&entries, &query);
            black_box(hits);
        })
    });
}

criterion_group!(benches, bench_snapshot_io, bench_reports);
criterion_main!(benches);
