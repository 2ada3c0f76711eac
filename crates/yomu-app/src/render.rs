use yomu_config::overlay::OverlayConfig;
use yomu_page::OverlayRenderer;
use yomu_types::{ImageCandidate, TranslationResult};

/// Overlay sink for headless runs: translations go to the log instead of a
/// document.
pub struct LogRenderer;

impl OverlayRenderer for LogRenderer {
    fn render(
        &self,
        candidate: &ImageCandidate,
        result: &TranslationResult,
        _overlay: &OverlayConfig,
    ) {
        tracing::info!(
            index = candidate.sequence_index,
            url = %candidate.source_url,
            "{} -> {}",
            truncate(&result.original_text, 40),
            truncate(&result.translated_text, 60),
        );
    }

    fn remove_all(&self) {
        tracing::debug!("overlays removed");
    }

    fn set_showing_original(&self, showing_original: bool) {
        tracing::debug!(showing_original, "view toggled");
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{cut}…")
    }
}
