use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use cl_app::{
    AnalysisOptions, AnalysisRequest, AppError, ReportMemo, analysis_service, document_service,
    query,
};
use cl_results::ReportStore;

fn demo_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // crates
    path.pop(); // repo root
    path.push("demos");
    path
}

/// Copy a demo document into a fresh directory so reports land there.
fn staged_demo(name: &str, prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    let target = dir.join(name);
    fs::copy(demo_dir().join("results").join(name), &target).expect("failed to stage demo");
    target
}

fn request(document_path: &Path, use_cache: bool) -> AnalysisRequest<'_> {
    AnalysisRequest {
        document_path,
        settings_path: None,
        options: AnalysisOptions {
            use_cache,
            ..Default::default()
        },
    }
}

#[test]
fn report_persists_next_to_document() {
    let document = staged_demo("02_multi_work_order.json", "cl_app_persist");

    let first = analysis_service::ensure_report(&request(&document, true)).expect("analysis failed");
    assert!(!first.loaded_from_cache);

    let store = ReportStore::for_source(&document).expect("failed to open store");
    assert!(store.has_report(&first.report_id));

    let second = analysis_service::ensure_report(&request(&document, true)).expect("analysis failed");
    assert!(second.loaded_from_cache);
    assert_eq!(second.report_id, first.report_id);
    assert_eq!(second.report, first.report);

    let listed = analysis_service::list_reports(&document).expect("failed to list reports");
    assert_eq!(listed.len(), 1);

    let (manifest, report) =
        analysis_service::load_report(&document, &first.report_id).expect("failed to load report");
    assert_eq!(manifest.cut_count, 4);
    assert_eq!(report.work_orders.len(), 3);

    let _ = fs::remove_dir_all(document.parent().unwrap());
}

#[test]
fn no_cache_reanalyzes_with_same_id() {
    let document = staged_demo("01_single_work_order.json", "cl_app_no_cache");

    let first = analysis_service::ensure_report(&request(&document, false)).unwrap();
    let second = analysis_service::ensure_report(&request(&document, false)).unwrap();
    assert!(!first.loaded_from_cache);
    assert!(!second.loaded_from_cache);
    assert_eq!(first.report_id, second.report_id);
    assert_eq!(first.report, second.report);
    assert_eq!(first.report.overall.efficiency, 96.67);

    let _ = fs::remove_dir_all(document.parent().unwrap());
}

#[test]
fn memo_reuses_identical_input() {
    let document = staged_demo("03_pooled.json", "cl_app_memo");
    let mut memo = ReportMemo::new();

    let first =
        analysis_service::ensure_report_with_memo(&request(&document, false), Some(&mut memo)).unwrap();
    let second =
        analysis_service::ensure_report_with_memo(&request(&document, false), Some(&mut memo)).unwrap();

    assert_eq!(memo.len(), 1);
    assert_eq!(memo.hits(), 1);
    assert_eq!(memo.get(&first.report_id), Some(&second.report));
    assert!(first.report.is_pooled());

    let _ = fs::remove_dir_all(document.parent().unwrap());
}

#[test]
fn missing_document_is_a_read_error() {
    let missing = std::env::temp_dir().join("cl_app_missing_dir").join("nope.json");
    let err = analysis_service::ensure_report(&request(&missing, true)).unwrap_err();
    assert!(matches!(err, AppError::DocumentRead { .. }));
}

#[test]
fn pooled_demo_rows() {
    let result = document_service::load_result(&demo_dir().join("results").join("03_pooled.json"))
        .expect("failed to load pooled demo");
    let settings = document_service::load_settings(Some(&demo_dir().join("settings.yaml")))
        .expect("failed to load demo settings");
    let report = analysis_service::analyze(&result, &settings);

    let pools = report.pools.as_ref().expect("pooled document should have pool rows");
    assert_eq!(pools.len(), 2);
    assert_eq!(pools[0].pool_key, "Kutu|40x40");
    assert_eq!(pools[0].work_order_count, 2);
    assert_eq!(pools[0].profile_type, "Kutu");
    assert_eq!(pools[0].efficiency, 98.33);
    assert_eq!(pools[1].work_order_count, 1);

    let summary = query::summarize_report(&report);
    assert_eq!(summary.pool_count, 2);
    assert!(summary.is_valid);
}

#[test]
fn corrupt_demo_degrades_gracefully() {
    let result = document_service::load_result(&demo_dir().join("results").join("04_corrupt.json"))
        .expect("corrupt demo should still decode");
    let report = analysis_service::analyze(&result, &Default::default());

    assert!(!report.overall.is_valid);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].cut_id, "garbled");
    assert_eq!(report.overall.accepted_cuts, 2);
    assert_eq!(report.overall.efficiency, 95.83);
    assert!(!report.issues.is_empty());

    let csv = query::work_order_rows_csv(&report).unwrap();
    assert!(csv.lines().count() >= 2);
}
