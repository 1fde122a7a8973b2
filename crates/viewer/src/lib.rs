//! Full-size media viewer for chat embeds.

mod controls;
mod download;
mod error;
mod host;
mod layout;
mod media;
mod viewer;

pub use controls::{CONTROL_STYLES, Control, ControlBox, PackType, ViewerAction};
pub use download::{DownloadOutcome, Notice, save_to_path};
pub use error::ViewerError;
pub use host::{DesktopHost, ViewerHost, open_with_system};
pub use layout::{Adjustment, Fit, Size, fit_to_viewport};
pub use media::{MediaKind, file_name};
pub use viewer::{MIN_WINDOW_SIZE, Viewer};
