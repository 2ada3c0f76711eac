use yomu_types::ImageCandidate;

use crate::surface::PageSurface;

/// Scan the page for eligible images, in document order.
///
/// An image qualifies when it is fully loaded, has positive natural
/// dimensions, covers at least `min_area` pixels², and is visible.
/// `sequence_index` is the candidate's 0-based rank in the returned sequence.
pub fn discover(page: &dyn PageSurface, min_area: u64) -> Vec<ImageCandidate> {
    page.images()
        .into_iter()
        .filter(|img| {
            img.complete
                && img.natural_width > 0
                && img.natural_height > 0
                && img.natural_width as u64 * img.natural_height as u64 >= min_area
                && img.visible
        })
        .enumerate()
        .map(|(sequence_index, img)| ImageCandidate {
            handle: img.handle,
            sequence_index,
            width: img.natural_width,
            height: img.natural_height,
            source_url: img.source_url,
        })
        .collect()
}
