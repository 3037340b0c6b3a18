#![warn(clippy::all, clippy::pedantic)]

pub mod components_tests;
pub mod config_loader_tests;
pub mod config_tests;
pub mod integration_tests;
pub mod time_tests;
pub mod ui_tests;
