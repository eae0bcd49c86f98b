slint::include_modules!();

pub mod loader;
pub mod page;
pub mod palette;

pub use loader::{ImageLoader, ImageSource, LoadError};
pub use page::{to_slint_image, SlintPage};
pub use palette::{ColorThief, ExtractError};

pub fn create_window() -> anyhow::Result<MainWindow> {
    Ok(MainWindow::new()?)
}
