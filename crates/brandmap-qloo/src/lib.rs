//! Client for the Qloo cultural-insights API.
//!
//! [`QlooClient`] wraps the REST endpoints with typed requests. The
//! [`CulturalInsights`] trait is the capability surface the brand map pipeline
//! consumes; `QlooClient`'s implementation degrades every failure (missing
//! key, timeout, HTTP error, bad body) to an empty result.

pub mod client;
pub mod error;
pub mod insights;
pub mod types;

pub use client::QlooClient;
pub use error::QlooError;
pub use insights::CulturalInsights;
pub use types::{DateRange, Entity, EntityType, Signal};
