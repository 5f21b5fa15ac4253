//! Shared domain types for the brand map service: the validated brand
//! descriptor, application configuration, and their error types.

pub mod app_config;
mod config;
pub mod descriptor;
mod error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use descriptor::{BrandDescriptor, BrandMapRequest};
pub use error::{ConfigError, FieldError, ValidationErrors};
