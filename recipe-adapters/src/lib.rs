//! Generative text adapters used by the recipe generator.
//!
//! Providers implement the [`traits::GenerationAdapter`] interface; the
//! [`gemini`] module talks to Google's `generateContent` API.

#![warn(missing_docs, clippy::pedantic)]

pub mod gemini;
pub mod traits;

mod http_client;

pub use gemini::{GeminiAdapter, GeminiConfig};
pub use traits::{AdapterError, AdapterMetadata, AdapterResult, GenerationAdapter};
