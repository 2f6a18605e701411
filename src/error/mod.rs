mod app;
mod config;
mod probe;
mod validation;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use probe::ProbeError;
pub use validation::ValidationError;
