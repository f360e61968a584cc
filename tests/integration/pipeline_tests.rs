/*!
 * Pipeline scenarios over in-memory tables
 */

use sheetlate::errors::PipelineError;
use sheetlate::providers::mock::MockProvider;
use sheetlate::session::Session;
use sheetlate::table::{CellState, FAILURE_MARKER_PREFIX};
use sheetlate::translation::{CancellationFlag, ProgressEvent, TranslationPipeline};

use crate::common;

#[tokio::test]
async fn test_run_withWorkingProvider_shouldFillRowsWithSourceText() {
    common::init_logger();
    let mock = MockProvider::working();
    let service = common::service_with(mock.clone(), 3, 1);
    let mut table = common::sample_table();

    let summary = TranslationPipeline::new(&service)
        .run(&mut table, "desc", &["es"], |_| {})
        .await
        .unwrap();

    assert_eq!(table.get_cell(0, "desc_es"), Some("[es] Hello"));
    assert_eq!(table.cell_state(1, "desc_es"), CellState::Empty);
    assert_eq!(table.get_cell(2, "desc_es"), Some("[es] World"));
    assert_eq!(mock.call_count(), 2);
    assert_eq!(summary.total_translated(), 2);
    assert!(!summary.has_failures());
}

#[tokio::test(start_paused = true)]
async fn test_run_withRowFailing_shouldMarkItAndRetryOnNextRun() {
    let mock = MockProvider::failing_for(["World"]);
    let service = common::service_with(mock.clone(), 3, 2000);
    let mut table = common::sample_table();
    let pipeline = TranslationPipeline::new(&service);

    let first = pipeline.run(&mut table, "desc", &["es"], |_| {}).await.unwrap();

    assert_eq!(table.get_cell(0, "desc_es"), Some("[es] Hello"));
    assert!(table.get_cell(2, "desc_es").unwrap().starts_with(FAILURE_MARKER_PREFIX));
    assert_eq!(first.languages[0].failed, 1);
    assert_eq!(mock.calls_for("World"), 3);

    let mut events = Vec::new();
    pipeline
        .run(&mut table, "desc", &["es"], |event| events.push(event))
        .await
        .unwrap();

    assert_eq!(mock.calls_for("Hello"), 1);
    assert_eq!(mock.calls_for("World"), 6);
    assert_eq!(table.get_cell(0, "desc_es"), Some("[es] Hello"));
    assert!(events.iter().any(|e| matches!(e, ProgressEvent::RowFailed { row: 2, .. })));
    assert!(!events.iter().any(|e| matches!(e, ProgressEvent::RowCompleted { row: 0, .. })));
}

#[tokio::test]
async fn test_run_twice_withAllSucceeded_shouldMakeNoNewCalls() {
    let mock = MockProvider::working();
    let service = common::service_with(mock.clone(), 3, 1);
    let mut table = common::sample_table();
    let pipeline = TranslationPipeline::new(&service);

    pipeline.run(&mut table, "desc", &["es", "fr"], |_| {}).await.unwrap();
    let snapshot = table.clone();
    let calls = mock.call_count();

    let mut events = Vec::new();
    let summary = pipeline
        .run(&mut table, "desc", &["es", "fr"], |event| events.push(event))
        .await
        .unwrap();

    assert_eq!(table, snapshot);
    assert_eq!(mock.call_count(), calls);
    assert!(summary.languages.iter().all(|l| l.is_skipped()));
    assert!(events.iter().all(|e| matches!(e, ProgressEvent::NothingToDo { .. })));
}

#[tokio::test]
async fn test_run_withPreexistingTranslations_shouldNeverOverwriteThem() {
    let mock = MockProvider::working();
    let service = common::service_with(mock.clone(), 3, 1);
    let mut table = common::sample_table();
    table.set_cell(0, "desc_es", "Hola (revisado)");
    table.set_cell(2, "desc_es", "ERROR_TRADUCCION_FALLIDA: timeout");

    TranslationPipeline::new(&service)
        .run(&mut table, "desc", &["es"], |_| {})
        .await
        .unwrap();

    assert_eq!(table.get_cell(0, "desc_es"), Some("Hola (revisado)"));
    assert_eq!(table.get_cell(2, "desc_es"), Some("[es] World"));
    assert_eq!(mock.calls_for("Hello"), 0);
}

#[tokio::test]
async fn test_run_withRegionSubtag_shouldNameFieldRawAndSendBaseSubtag() {
    let mock = MockProvider::working();
    let service = common::service_with(mock.clone(), 3, 1);
    let mut table = common::sample_table();
    let pipeline = TranslationPipeline::new(&service);

    pipeline.run(&mut table, "desc", &["pt-BR"], |_| {}).await.unwrap();
    pipeline.run(&mut table, "desc", &["pt-BR"], |_| {}).await.unwrap();

    assert!(table.has_field("desc_pt-BR"));
    assert!(!table.has_field("desc_pt"));
    assert_eq!(table.get_cell(0, "desc_pt-BR"), Some("[pt] Hello"));
    assert!(mock.calls().iter().all(|call| call.target_language == "pt"));
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_run_withSeveralLanguages_shouldProcessThemInOrder() {
    let service = common::service_with(MockProvider::working(), 3, 1);
    let mut table = common::sample_table();
    let mut started = Vec::new();

    TranslationPipeline::new(&service)
        .run(&mut table, "desc", &["fr", "de", "fr"], |event| {
            if let ProgressEvent::LanguageStarted { language, .. } = event {
                started.push(language);
            }
        })
        .await
        .unwrap();

    assert_eq!(started, vec!["fr", "de"]);
    assert_eq!(table.fields(), ["id", "desc", "desc_fr", "desc_de"]);
}

#[tokio::test]
async fn test_run_withEmptyLanguageList_shouldRejectBeforeWork() {
    let mock = MockProvider::working();
    let service = common::service_with(mock.clone(), 3, 1);
    let mut table = common::sample_table();
    let languages: [&str; 0] = [];

    let result = TranslationPipeline::new(&service)
        .run(&mut table, "desc", &languages, |_| {})
        .await;

    assert_eq!(result.unwrap_err(), PipelineError::NoTargetLanguages);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_run_withConcurrency_shouldWriteSameResultsAsSequential() {
    let mut table = common::sample_table();
    for i in 4..=20 {
        table.push_row([i.to_string(), format!("text {}", i)]);
    }
    let mut sequential_table = table.clone();

    let concurrent_service = common::service_with(MockProvider::slow(100), 1, 1);
    let mut rows = Vec::new();
    TranslationPipeline::new(&concurrent_service)
        .with_concurrency(4)
        .run(&mut table, "desc", &["es"], |event| {
            if let ProgressEvent::RowCompleted { row, .. } = event {
                rows.push(row);
            }
        })
        .await
        .unwrap();

    let sequential_service = common::service_with(MockProvider::working(), 1, 1);
    TranslationPipeline::new(&sequential_service)
        .run(&mut sequential_table, "desc", &["es"], |_| {})
        .await
        .unwrap();

    assert_eq!(table, sequential_table);
    let mut sorted = rows.clone();
    sorted.sort_unstable();
    assert_eq!(rows, sorted);
}

#[tokio::test]
async fn test_run_withCancellationBeforeStart_shouldNotTouchTable() {
    let mock = MockProvider::working();
    let service = common::service_with(mock.clone(), 3, 1);
    let mut table = common::sample_table();
    let cancel = CancellationFlag::new();
    cancel.cancel();

    let summary = TranslationPipeline::new(&service)
        .with_cancellation(cancel)
        .run(&mut table, "desc", &["es"], |_| {})
        .await
        .unwrap();

    assert!(summary.cancelled);
    assert_eq!(mock.call_count(), 0);
    assert_eq!(table, common::sample_table());
}

#[tokio::test]
async fn test_session_translate_shouldCountRunsAndFailures() {
    let service = common::service_with(MockProvider::failing_for(["Hello"]), 1, 1);
    let pipeline = TranslationPipeline::new(&service);
    let mut session = Session::new("sample.csv", common::sample_table());

    session.translate(&pipeline, "desc", &["es"], |_| {}).await.unwrap();
    session.translate(&pipeline, "desc", &["es"], |_| {}).await.unwrap();

    let info = session.info();
    assert_eq!(info.runs, 2);
    assert_eq!(info.failed_cells, 1);
    assert!(info.has_failures());
    assert_eq!(session.original(), &common::sample_table());
}
