use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use kanal::AsyncReceiver;

use yomu_cache::{MemoryStore, TranslationCache};
use yomu_config::Config;
use yomu_types::{ProgressEvent, RunStatus, TranslationResult};

use crate::processor::Processor;
use crate::progress::progress_channel;

use super::fakes::{FakeEngine, FakeFactory, FakePage, FakeTranslator, RecordingRenderer};

struct Harness {
    processor: Arc<Processor>,
    engine: Arc<FakeEngine>,
    factory: Arc<FakeFactory>,
    translator: Arc<FakeTranslator>,
    renderer: Arc<RecordingRenderer>,
    cache: Arc<TranslationCache>,
    progress_rx: AsyncReceiver<ProgressEvent>,
}

impl Harness {
    async fn new(page: FakePage) -> Self {
        Self::build(page, Arc::new(FakeEngine::new()), Arc::new(FakeTranslator::new())).await
    }

    async fn build(
        page: FakePage,
        engine: Arc<FakeEngine>,
        translator: Arc<FakeTranslator>,
    ) -> Self {
        let factory = Arc::new(FakeFactory::new(engine.clone()));
        Self::with_factory(page, engine, translator, factory).await
    }

    async fn with_factory(
        page: FakePage,
        engine: Arc<FakeEngine>,
        translator: Arc<FakeTranslator>,
        factory: Arc<FakeFactory>,
    ) -> Self {
        let renderer = Arc::new(RecordingRenderer::new());
        let cache = Arc::new(TranslationCache::load(Arc::new(MemoryStore::new())).await);
        let (progress, progress_rx) = progress_channel(64);

        let processor = Arc::new(Processor::new(
            Arc::new(page),
            renderer.clone(),
            translator.clone(),
            factory.clone(),
            cache.clone(),
            progress,
        ));

        Self {
            processor,
            engine,
            factory,
            translator,
            renderer,
            cache,
            progress_rx,
        }
    }

    fn drain_progress(&self) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.progress_rx.try_recv() {
            events.push(event);
        }
        events
    }
}

fn settings() -> Config {
    Config::new()
}

#[tokio::test]
async fn five_images_with_wave_size_two_complete_in_three_waves() {
    let harness = Harness::new(FakePage::with_images(5)).await;
    let mut config = settings();
    config.processing.max_concurrent = 2;

    harness.processor.start(config).await;

    let state = harness.processor.state();
    assert_eq!(state.status, RunStatus::Complete);
    assert_eq!(state.stats.total, 5);
    assert_eq!(state.stats.processed, 5);
    assert_eq!(state.stats.failed, 0);

    // ceil(5/2) = 3 waves, never more than 2 images in flight.
    assert_eq!(harness.engine.calls.load(Ordering::SeqCst), 5);
    assert!(harness.engine.max_in_flight.load(Ordering::SeqCst) <= 2);

    let percents: Vec<u8> = harness
        .drain_progress()
        .iter()
        .filter_map(|e| e.percent)
        .collect();
    assert_eq!(percents, vec![0, 33, 67, 100, 100]);
}

#[tokio::test]
async fn blank_ocr_counts_processed_without_render_or_cache() {
    let engine = Arc::new(FakeEngine::new());
    engine.set_text(&FakePage::url(0), "   \n");
    let harness = Harness::build(
        FakePage::with_images(1),
        engine,
        Arc::new(FakeTranslator::new()),
    )
    .await;

    harness.processor.start(settings()).await;

    let state = harness.processor.state();
    assert_eq!(state.status, RunStatus::Complete);
    assert_eq!(state.stats.processed, 1);
    assert_eq!(state.stats.failed, 0);
    assert!(!state.has_translations);
    assert_eq!(harness.renderer.render_count(), 0);
    assert!(harness.cache.is_empty());
    assert_eq!(harness.translator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn translation_timeout_is_a_per_item_failure() {
    let translator = Arc::new(FakeTranslator::with_delay(Duration::from_secs(5)));
    let harness = Harness::build(
        FakePage::with_images(1),
        Arc::new(FakeEngine::new()),
        translator,
    )
    .await;
    let mut config = settings();
    config.translator.timeout_seconds = 1;

    harness.processor.start(config).await;

    let state = harness.processor.state();
    assert_eq!(state.status, RunStatus::Complete);
    assert_eq!(state.stats.processed, 0);
    assert_eq!(state.stats.failed, 1);
    assert_eq!(harness.renderer.render_count(), 0);
}

#[tokio::test]
async fn zero_candidates_fail_the_run_before_engine_init() {
    let harness = Harness::new(FakePage::empty()).await;

    harness.processor.start(settings()).await;

    let state = harness.processor.state();
    assert_eq!(state.status, RunStatus::Error);
    assert_eq!(state.stats.total, 0);
    assert!(state.last_error.unwrap().contains("no images"));
    assert_eq!(harness.factory.created.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn engine_init_failure_is_fatal() {
    let harness = Harness::with_factory(
        FakePage::with_images(2),
        Arc::new(FakeEngine::new()),
        Arc::new(FakeTranslator::new()),
        Arc::new(FakeFactory::failing()),
    )
    .await;

    harness.processor.start(settings()).await;

    let state = harness.processor.state();
    assert_eq!(state.status, RunStatus::Error);
    assert!(state.last_error.unwrap().contains("initialization failed"));
    assert_eq!(state.stats.processed, 0);
}

#[tokio::test]
async fn cache_hit_skips_ocr_and_translation() {
    let harness = Harness::new(FakePage::with_images(1)).await;
    let cached = TranslationResult {
        original_text: "原文".to_string(),
        translated_text: "cached translation".to_string(),
        lines: Vec::new(),
    };
    harness.cache.store(&FakePage::url(0), &cached).await.unwrap();

    harness.processor.start(settings()).await;

    let state = harness.processor.state();
    assert_eq!(state.status, RunStatus::Complete);
    assert_eq!(state.stats.processed, 1);
    assert_eq!(harness.engine.calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.translator.calls.load(Ordering::SeqCst), 0);

    let renders = harness.renderer.renders.lock();
    assert_eq!(renders.len(), 1);
    assert_eq!(renders[0].1.translated_text, "cached translation");
}

#[tokio::test]
async fn successful_items_populate_the_cache() {
    let harness = Harness::new(FakePage::with_images(2)).await;

    harness.processor.start(settings()).await;

    assert_eq!(harness.cache.len(), 2);
    assert!(
        harness
            .cache
            .lookup(&FakePage::url(0), 7)
            .unwrap()
            .translated_text
            .contains("(translated)")
    );
}

#[tokio::test]
async fn disabled_cache_is_never_consulted_or_written() {
    let harness = Harness::new(FakePage::with_images(1)).await;
    let mut config = settings();
    config.cache.enabled = false;

    harness.processor.start(config).await;

    assert_eq!(harness.processor.state().stats.processed, 1);
    assert!(harness.cache.is_empty());
    assert_eq!(harness.renderer.render_count(), 1);
}

#[tokio::test]
async fn one_failed_item_never_aborts_its_wave() {
    let harness = Harness::new(FakePage::with_images(3).break_image(1)).await;
    let mut config = settings();
    config.processing.max_concurrent = 3;

    harness.processor.start(config).await;

    let state = harness.processor.state();
    assert_eq!(state.status, RunStatus::Complete);
    assert_eq!(state.stats.processed, 2);
    assert_eq!(state.stats.failed, 1);
    assert_eq!(harness.renderer.render_count(), 2);
}

#[tokio::test]
async fn stop_is_idempotent() {
    let harness = Harness::new(FakePage::with_images(2)).await;
    harness.processor.start(settings()).await;

    harness.processor.stop().await;
    let first = harness.processor.state();
    harness.processor.stop().await;
    let second = harness.processor.state();

    assert_eq!(first.status, RunStatus::Idle);
    assert_eq!(second.status, RunStatus::Idle);
    assert!(!second.is_active);
    assert_eq!(second.stats.total, 0);
    assert!(second.last_error.is_none());
    assert_eq!(harness.renderer.removed_all.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn stop_discards_results_from_in_flight_items() {
    let engine = Arc::new(FakeEngine::with_delay(Duration::from_millis(200)));
    let harness = Arc::new(
        Harness::build(
            FakePage::with_images(3),
            engine,
            Arc::new(FakeTranslator::new()),
        )
        .await,
    );

    let processor = harness.processor.clone();
    let run = tokio::spawn(async move { processor.start(settings()).await });

    // Let the run get into its first wave, then tear it down.
    tokio::time::sleep(Duration::from_millis(50)).await;
    harness.processor.stop().await;
    run.await.unwrap();

    let state = harness.processor.state();
    assert_eq!(state.status, RunStatus::Idle);
    assert_eq!(state.stats.settled(), 0);
    assert_eq!(harness.renderer.render_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn start_while_processing_is_an_idempotent_no_op() {
    let engine = Arc::new(FakeEngine::with_delay(Duration::from_millis(100)));
    let harness = Arc::new(
        Harness::build(
            FakePage::with_images(4),
            engine,
            Arc::new(FakeTranslator::new()),
        )
        .await,
    );

    let processor = harness.processor.clone();
    let run = tokio::spawn(async move { processor.start(settings()).await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Second start returns immediately without disturbing the run.
    harness.processor.start(settings()).await;
    assert!(harness.processor.state().is_processing);

    run.await.unwrap();
    let state = harness.processor.state();
    assert_eq!(state.status, RunStatus::Complete);
    assert_eq!(state.stats.total, 4);
    assert_eq!(state.stats.processed, 4);
    assert_eq!(harness.factory.created.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn toggle_view_is_presentation_only() {
    let harness = Harness::new(FakePage::with_images(2)).await;
    harness.processor.start(settings()).await;
    let before = harness.processor.state().stats;

    let showing = harness.processor.toggle_view();
    assert!(showing);
    assert!(harness.renderer.showing_original.load(Ordering::SeqCst));

    let showing = harness.processor.toggle_view();
    assert!(!showing);
    assert!(!harness.renderer.showing_original.load(Ordering::SeqCst));

    let after = harness.processor.state();
    assert_eq!(after.stats, before);
    assert_eq!(after.status, RunStatus::Complete);
}

#[tokio::test]
async fn retry_failed_reprocesses_only_the_failures() {
    let engine = Arc::new(FakeEngine::new());
    engine.set_text(&FakePage::url(0), "alpha");
    engine.set_text(&FakePage::url(1), "beta");
    let translator = Arc::new(FakeTranslator::new());
    translator.fail_once_for("alpha");

    let harness = Harness::build(FakePage::with_images(2), engine, translator).await;
    harness.processor.start(settings()).await;

    let state = harness.processor.state();
    assert_eq!(state.stats.processed, 1);
    assert_eq!(state.stats.failed, 1);

    harness.processor.retry_failed(settings()).await;

    let state = harness.processor.state();
    assert_eq!(state.status, RunStatus::Complete);
    assert_eq!(state.stats.total, 2);
    assert_eq!(state.stats.processed, 2);
    assert_eq!(state.stats.failed, 0);
    assert_eq!(harness.renderer.render_count(), 2);

    // Only the failed image went back through OCR.
    assert_eq!(harness.engine.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retry_with_nothing_failed_is_a_no_op() {
    let harness = Harness::new(FakePage::with_images(1)).await;
    harness.processor.start(settings()).await;
    let before = harness.processor.state();

    harness.processor.retry_failed(settings()).await;

    let after = harness.processor.state();
    assert_eq!(after.status, before.status);
    assert_eq!(after.stats, before.stats);
}

#[tokio::test]
async fn run_completes_with_no_progress_listener() {
    let harness = Harness::new(FakePage::with_images(2)).await;
    drop(harness.progress_rx);

    harness.processor.start(settings()).await;

    assert_eq!(harness.processor.state().status, RunStatus::Complete);
}

#[tokio::test]
async fn stats_never_exceed_total() {
    let harness = Harness::new(FakePage::with_images(5).break_image(2)).await;
    harness.processor.start(settings()).await;

    let stats = harness.processor.state().stats;
    assert_eq!(stats.settled(), stats.total);
    assert_eq!(stats.processed, 4);
    assert_eq!(stats.failed, 1);
}
