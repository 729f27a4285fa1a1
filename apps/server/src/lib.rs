#![cfg_attr(not(test), deny(clippy::expect_used, clippy::unwrap_used, clippy::panic, clippy::todo, clippy::unimplemented))]

pub mod ai;
pub mod bot_driver;
pub mod config;
pub mod domain;
pub mod entities;
pub mod engine;
pub mod error;
pub mod errors;
pub mod persistence;
pub mod registry;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod ws;

pub use error::AppError;
pub use errors::ErrorCode;
pub use registry::SessionRegistry;
pub use state::app_state::AppState;

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
