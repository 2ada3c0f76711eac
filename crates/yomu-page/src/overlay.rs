use yomu_config::overlay::OverlayConfig;
use yomu_types::{ImageCandidate, TranslationResult};

/// Sink for rendered translations.
///
/// Every method is best-effort: implementations must tolerate targets that
/// no longer exist (page mutated underneath, overlay already removed).
pub trait OverlayRenderer: Send + Sync {
    fn render(
        &self,
        candidate: &ImageCandidate,
        result: &TranslationResult,
        overlay: &OverlayConfig,
    );

    /// Tear down every overlay on the page.
    fn remove_all(&self);

    /// Presentation switch between original and translated view.
    fn set_showing_original(&self, showing_original: bool);
}
