mod discovery;
mod overlay;
mod surface;

pub use discovery::discover;
pub use overlay::OverlayRenderer;
pub use surface::{PageError, PageImage, PageSurface};
