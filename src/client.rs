//! GPT-SoVITS HTTP client.
//!
//! Synthesis calls live in `core`, server administration (control, weights) in `admin`.

mod admin;
pub mod builder;
pub mod core;

pub use builder::{SynthesisClientBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use self::core::SynthesisClient;
