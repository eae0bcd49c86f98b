pub mod color;
pub mod config;
pub mod confetti;
pub mod error;
pub mod extract;
pub mod page;
pub mod random;

pub use color::{to_rgb_strings, Color, ParseColorError};
pub use config::{ConfettiSettings, ExtractionSettings, LoaderSettings, Settings, Span, DEFAULT_CONFETTI_COLORS, DEFAULT_INITIAL_IMAGE};
pub use confetti::{fire_confetti, fire_confetti_with, ConfettiLauncher, ConfettiOptions, Origin};
pub use error::SetupError;
pub use extract::ColorExtractor;
pub use page::{ConfettiPage, ImageElement, InputElement, Page, PageEvent};
pub use random::{random_in_range, random_in_range_with};
