pub mod config;
pub mod tracing;
pub mod wiring;

pub use self::config::{load_config, API_KEY_ENV};
pub use self::tracing::init_tracing_subscriber;
pub use self::wiring::{wire_services, wire_services_with, AppServices};
