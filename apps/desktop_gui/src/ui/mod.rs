//! UI layer for desktop GUI: app shell, layout chrome, pages, and the image carousel overlay.

pub mod app;
pub mod carousel_view;
pub mod layout;
pub mod pages;

pub use app::{DesktopGuiApp, StartupConfig};
