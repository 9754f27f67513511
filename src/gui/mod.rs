//! GUI module - application shell and tab views

mod app;
pub mod tabs;

pub use app::{HouseScopeApp, Tab, UserSettings};
