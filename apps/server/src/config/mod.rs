//! Environment-driven configuration. Every knob here fails fast at startup
//! rather than falling back silently once the server is serving traffic.

pub mod db;
pub mod settings;
