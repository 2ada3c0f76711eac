use yomu_page::{PageError, PageSurface, discover};
use yomu_types::ImageHandle;

use crate::snapshot::SnapshotPage;

use super::scratch_dir;

const SNAPSHOT: &str = r#"[
    {"url": "https://example.com/page1.png", "width": 800, "height": 1200, "data": "page1.bin"},
    {"url": "https://example.com/banner.png", "width": 468, "height": 60, "visible": false},
    {"url": "https://example.com/icon.png", "width": 32, "height": 32, "data": "missing.bin"}
]"#;

async fn write_snapshot() -> (std::path::PathBuf, SnapshotPage) {
    let dir = scratch_dir("snapshot");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let path = dir.join("page.json");
    std::fs::write(&path, SNAPSHOT).unwrap();
    std::fs::write(dir.join("page1.bin"), b"png bytes").unwrap();

    let page = SnapshotPage::load(&path).await.unwrap();
    (dir, page)
}

#[tokio::test]
async fn snapshot_images_keep_document_order() {
    let (dir, page) = write_snapshot().await;

    let images = page.images();
    assert_eq!(images.len(), 3);
    assert_eq!(images[0].source_url, "https://example.com/page1.png");
    assert!(!images[1].visible);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn snapshot_feeds_discovery() {
    let (dir, page) = write_snapshot().await;

    // The hidden banner and the tiny icon are both excluded.
    let candidates = discover(&page, 10_000);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].handle, ImageHandle(0));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn image_bytes_come_from_the_data_file() {
    let (dir, page) = write_snapshot().await;

    let bytes = page.image_bytes(ImageHandle(0)).await.unwrap();
    assert_eq!(bytes, b"png bytes");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn missing_data_is_a_fetch_error() {
    let (dir, page) = write_snapshot().await;

    // Entry without a data path.
    assert!(matches!(
        page.image_bytes(ImageHandle(1)).await,
        Err(PageError::UnknownHandle)
    ));
    // Entry whose data file is gone.
    assert!(matches!(
        page.image_bytes(ImageHandle(2)).await,
        Err(PageError::Fetch(_))
    ));

    let _ = std::fs::remove_dir_all(&dir);
}
