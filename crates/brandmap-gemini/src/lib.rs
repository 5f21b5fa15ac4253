//! Generative-text collaborator for the brand map service.
//!
//! [`TextGenerator`] is the capability the pipeline consumes. Its contract is
//! "text or nothing": every failure yields an empty string, never an error.
//! [`GeminiClient`] implements it over the Gemini `generateContent` REST
//! endpoint.

pub mod client;
pub mod error;
pub mod generator;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use generator::{BlockingTextGenerator, TextGenerator};
