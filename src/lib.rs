// Library surface for headless/integration tests and reuse.
// main.rs only parses the command line and owns the terminal.
pub mod app;
pub mod app_dirs;
pub mod catalog;
pub mod config;
pub mod generator;
pub mod logging;
pub mod position;
pub mod results_log;
pub mod runtime;
pub mod settings;
pub mod sum;
pub mod timer;
pub mod ui;
