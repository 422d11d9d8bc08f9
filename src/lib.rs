pub mod api;
pub mod config;
pub mod logging;
pub mod providers;
pub mod state;
pub mod storage;
pub mod theme;
pub mod types;
pub mod ui;
pub mod views;
