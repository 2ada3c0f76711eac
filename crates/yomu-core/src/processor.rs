use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use parking_lot::Mutex;

use yomu_cache::TranslationCache;
use yomu_config::Config;
use yomu_ocr::{EngineFactory, EngineSlot, OcrEngine, engine_languages};
use yomu_page::{OverlayRenderer, PageSurface, discover};
use yomu_translator::{Translator, translate_with_timeout};
use yomu_types::{
    ImageCandidate, ProgressEvent, RunState, RunStats, RunStatus, TranslationResult,
};

use crate::error::RunError;
use crate::progress::ProgressSender;

/// The orchestration core: drives discovered images through OCR and
/// translation in fixed-size waves, consulting the cache and emitting
/// progress along the way.
///
/// Run state lives behind a single short-lived lock together with the run
/// generation; stop() bumps the generation, so a result arriving from an
/// already-stopped run fails its generation check and is dropped unrendered.
pub struct Processor {
    page: Arc<dyn PageSurface>,
    renderer: Arc<dyn OverlayRenderer>,
    translator: Arc<dyn Translator>,
    engine_factory: Arc<dyn EngineFactory>,
    engine: EngineSlot,
    cache: Arc<TranslationCache>,
    progress: ProgressSender,
    inner: Mutex<RunInner>,
}

#[derive(Default)]
struct RunInner {
    generation: u64,
    status: RunStatus,
    showing_original: bool,
    stats: RunStats,
    failed: Vec<ImageCandidate>,
    rendered: usize,
    last_error: Option<String>,
}

impl Processor {
    pub fn new(
        page: Arc<dyn PageSurface>,
        renderer: Arc<dyn OverlayRenderer>,
        translator: Arc<dyn Translator>,
        engine_factory: Arc<dyn EngineFactory>,
        cache: Arc<TranslationCache>,
        progress: ProgressSender,
    ) -> Self {
        Self {
            page,
            renderer,
            translator,
            engine_factory,
            engine: EngineSlot::new(),
            cache,
            progress,
            inner: Mutex::new(RunInner::default()),
        }
    }

    /// Start a run with an immutable settings snapshot.
    ///
    /// A start while a run is in flight is accepted and ignored.
    pub async fn start(&self, settings: Config) {
        let generation = {
            let mut inner = self.inner.lock();
            if inner.is_running() {
                tracing::debug!("translation already in progress, ignoring start");
                return;
            }
            inner.status = RunStatus::Discovering;
            inner.stats = RunStats::default();
            inner.failed.clear();
            inner.rendered = 0;
            inner.last_error = None;
            inner.generation
        };
        self.progress.emit(ProgressEvent::status(RunStatus::Discovering));

        if let Err(e) = self.run(&settings, generation).await {
            self.fail_run(generation, &e);
        }
    }

    async fn run(&self, settings: &Config, generation: u64) -> Result<(), RunError> {
        let candidates = discover(self.page.as_ref(), settings.processing.min_image_area);
        if candidates.is_empty() {
            return Err(RunError::NoImagesFound);
        }
        tracing::info!(count = candidates.len(), "discovered images");

        let engine = self.acquire_engine(settings).await?;

        let stale = {
            let mut inner = self.inner.lock();
            if inner.generation != generation {
                true
            } else {
                inner.status = RunStatus::Processing;
                inner.stats.total = candidates.len();
                false
            }
        };
        if stale {
            // Stopped while the engine was coming up.
            self.engine.release().await;
            return Ok(());
        }
        self.emit_with_stats(
            RunStatus::Processing,
            Some(0),
            Some(format!("found {} images", candidates.len())),
        );

        self.process_waves(&candidates, &engine, settings, generation)
            .await;

        let mut inner = self.inner.lock();
        if inner.generation != generation {
            return Ok(());
        }
        inner.status = RunStatus::Complete;
        let stats = inner.stats;
        drop(inner);

        tracing::info!(
            processed = stats.processed,
            failed = stats.failed,
            "translation run complete"
        );
        self.progress.emit(ProgressEvent {
            status: RunStatus::Complete,
            percent: Some(100),
            stats: Some(stats),
            showing_original: None,
            message: None,
        });
        Ok(())
    }

    async fn acquire_engine(&self, settings: &Config) -> Result<Arc<dyn OcrEngine>, RunError> {
        let languages = engine_languages(&settings.ocr.source_language);
        self.engine
            .acquire(self.engine_factory.as_ref(), &languages)
            .await
            .map_err(RunError::EngineInit)
    }

    /// Process candidates in consecutive waves of `max_concurrent`.
    ///
    /// Items within a wave settle independently; wave N+1 never starts before
    /// wave N has fully settled. One progress event per settled wave.
    async fn process_waves(
        &self,
        candidates: &[ImageCandidate],
        engine: &Arc<dyn OcrEngine>,
        settings: &Config,
        generation: u64,
    ) {
        let wave_size = settings.processing.wave_size();
        let waves_total = candidates.len().div_ceil(wave_size);

        for (wave_index, wave) in candidates.chunks(wave_size).enumerate() {
            join_all(
                wave.iter()
                    .map(|candidate| self.process_one(candidate, engine, settings, generation)),
            )
            .await;

            if self.inner.lock().generation != generation {
                return;
            }
            let percent =
                (((wave_index + 1) as f64 / waves_total as f64) * 100.0).round() as u8;
            self.emit_with_stats(
                RunStatus::Processing,
                Some(percent),
                Some(format!("processing batch {}/{}", wave_index + 1, waves_total)),
            );
        }
    }

    async fn process_one(
        &self,
        candidate: &ImageCandidate,
        engine: &Arc<dyn OcrEngine>,
        settings: &Config,
        generation: u64,
    ) {
        if settings.cache.enabled
            && let Some(hit) = self
                .cache
                .lookup(&candidate.source_url, settings.cache.expiry_days)
        {
            tracing::debug!(index = candidate.sequence_index, "using cached translation");
            self.apply_success(candidate, Some(&hit), settings, generation);
            return;
        }

        let bytes = match self.page.image_bytes(candidate.handle).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return self.apply_failure(candidate, generation, &format!("image fetch: {e}"));
            }
        };

        let ocr = match engine.recognize(&bytes).await {
            Ok(ocr) => ocr,
            Err(e) => {
                return self.apply_failure(candidate, generation, &format!("OCR: {e}"));
            }
        };

        if ocr.is_blank() {
            // Nothing to show is not a failure: no render, no cache write.
            tracing::debug!(index = candidate.sequence_index, "no text detected");
            self.apply_success(candidate, None, settings, generation);
            return;
        }

        let translated = match translate_with_timeout(
            self.translator.as_ref(),
            &ocr.text,
            &settings.ocr.source_language,
            &settings.translator.target_language,
            Duration::from_secs(settings.translator.timeout_seconds),
        )
        .await
        {
            Ok(text) => text,
            Err(e) => {
                return self.apply_failure(candidate, generation, &format!("translation: {e}"));
            }
        };

        let result = TranslationResult {
            original_text: ocr.text,
            translated_text: translated,
            lines: ocr.lines,
        };

        if settings.cache.enabled
            && let Err(e) = self.cache.store(&candidate.source_url, &result).await
        {
            return self.apply_failure(candidate, generation, &format!("cache write: {e}"));
        }

        self.apply_success(candidate, Some(&result), settings, generation);
    }

    fn apply_success(
        &self,
        candidate: &ImageCandidate,
        result: Option<&TranslationResult>,
        settings: &Config,
        generation: u64,
    ) {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            tracing::debug!(
                index = candidate.sequence_index,
                "dropping result from stopped run"
            );
            return;
        }
        inner.stats.processed += 1;
        if let Some(result) = result {
            inner.rendered += 1;
            // The generation check and the sink call must not be separated
            // by a stop(); the renderer is invoked under the same lock.
            self.renderer.render(candidate, result, &settings.overlay);
        }
    }

    fn apply_failure(&self, candidate: &ImageCandidate, generation: u64, reason: &str) {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            return;
        }
        tracing::warn!(
            index = candidate.sequence_index,
            url = %candidate.source_url,
            "image failed: {reason}"
        );
        inner.stats.failed += 1;
        inner.failed.push(candidate.clone());
    }

    fn emit_with_stats(&self, status: RunStatus, percent: Option<u8>, message: Option<String>) {
        let stats = self.inner.lock().stats;
        self.progress.emit(ProgressEvent {
            status,
            percent,
            stats: Some(stats),
            showing_original: None,
            message,
        });
    }

    fn fail_run(&self, generation: u64, error: &RunError) {
        let stats = {
            let mut inner = self.inner.lock();
            if inner.generation != generation {
                return;
            }
            inner.status = RunStatus::Error;
            inner.last_error = Some(error.to_string());
            inner.stats
        };
        tracing::error!("translation run failed: {error}");
        self.progress.emit(ProgressEvent {
            status: RunStatus::Error,
            percent: None,
            stats: Some(stats),
            showing_original: None,
            message: Some(error.to_string()),
        });
    }

    /// Tear down the run: overlays removed, engine released, state back to
    /// `Idle`. Safe to call at any time, any number of times. In-flight work
    /// from the stopped run fails its generation check and is discarded.
    pub async fn stop(&self) {
        {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            inner.status = RunStatus::Idle;
            inner.showing_original = false;
            inner.stats = RunStats::default();
            inner.failed.clear();
            inner.rendered = 0;
            inner.last_error = None;
        }
        self.engine.release().await;
        self.renderer.remove_all();
        self.progress.emit(ProgressEvent::status(RunStatus::Idle));
    }

    /// Presentation switch over already-rendered overlays; stats untouched.
    pub fn toggle_view(&self) -> bool {
        let (status, showing) = {
            let mut inner = self.inner.lock();
            inner.showing_original = !inner.showing_original;
            (inner.status, inner.showing_original)
        };
        self.renderer.set_showing_original(showing);
        self.progress.emit(ProgressEvent {
            status,
            percent: None,
            stats: None,
            showing_original: Some(showing),
            message: None,
        });
        showing
    }

    /// Re-attempt only the images that failed, as fresh waves through the
    /// normal per-item path. A no-op when nothing failed or a run is active.
    pub async fn retry_failed(&self, settings: Config) {
        let (retries, generation) = {
            let mut inner = self.inner.lock();
            if inner.is_running() {
                return;
            }
            if inner.failed.is_empty() {
                tracing::debug!("no failed images to retry");
                return;
            }
            let retries = std::mem::take(&mut inner.failed);
            inner.stats.failed -= retries.len();
            inner.status = RunStatus::Processing;
            (retries, inner.generation)
        };
        tracing::info!(count = retries.len(), "retrying failed images");

        let engine = match self.acquire_engine(&settings).await {
            Ok(engine) => engine,
            Err(e) => {
                self.fail_run(generation, &e);
                return;
            }
        };

        self.process_waves(&retries, &engine, &settings, generation)
            .await;

        let mut inner = self.inner.lock();
        if inner.generation != generation {
            return;
        }
        inner.status = RunStatus::Complete;
        let stats = inner.stats;
        drop(inner);
        self.progress.emit(ProgressEvent {
            status: RunStatus::Complete,
            percent: Some(100),
            stats: Some(stats),
            showing_original: None,
            message: None,
        });
    }

    /// Snapshot for the pull path; always answerable from owned state.
    pub fn state(&self) -> RunState {
        let inner = self.inner.lock();
        RunState {
            is_active: inner.status != RunStatus::Idle,
            is_processing: inner.is_running(),
            showing_original: inner.showing_original,
            has_translations: inner.rendered > 0,
            status: inner.status,
            stats: inner.stats,
            last_error: inner.last_error.clone(),
        }
    }
}

impl RunInner {
    fn is_running(&self) -> bool {
        matches!(self.status, RunStatus::Discovering | RunStatus::Processing)
    }
}
