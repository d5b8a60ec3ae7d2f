//! # gpt-sovits-client
//!
//! GPT-SoVITS 推理服务的异步 Rust 客户端：把 `/tts`、`/control`、`/set_gpt_weights`、
//! `/set_sovits_weights` 封装为类型化的函数调用。
//!
//! Async client for the GPT-SoVITS text-to-speech inference server's HTTP API.
//!
//! ## Overview
//!
//! The client marshals typed requests into JSON bodies or percent-encoded query strings,
//! performs one HTTP round trip per call, and hands back the server's bytes untouched.
//! Synthesis happens entirely on the server; audio is never decoded here.
//!
//! - **Synthesis**: [`SynthesisClient::synthesize`] and friends return the status code and
//!   raw body for every HTTP status, so callers decide what a 400 means.
//! - **Streaming**: [`SynthesisClient::synthesize_stream`] forwards body chunks as they
//!   arrive for `streaming_mode` requests.
//! - **Administration**: control commands and GPT/SoVITS weight swaps succeed only on the
//!   statuses the server uses for success and fail with [`Error::Remote`] otherwise.
//!
//! No call is retried. A [`SynthesisClient`] is cheap to clone and safe to share.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gpt_sovits_client::{SynthesisClient, SynthesisRequest};
//!
//! #[tokio::main]
//! async fn main() -> gpt_sovits_client::Result<()> {
//!     let client = SynthesisClient::new("http://127.0.0.1:9880")?;
//!
//!     let request = SynthesisRequest::new("你好，世界", "zh", "ref.wav", "zh")
//!         .with_prompt_text("参考音频的文本");
//!     let audio = client.synthesize(&request).await?.into_audio()?;
//!     std::fs::write("out.wav", &audio)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`SynthesisClient`] and its builder |
//! | [`types`] | Wire types for every endpoint |
//! | [`transport`] | reqwest-based HTTP transport |
//! | [`error`] | Unified error type |

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{SynthesisClient, SynthesisClientBuilder};
pub use error::{Error, ErrorContext};
pub use types::{
    ControlCommand, MediaType, SynthesisRequest, SynthesisResult, TextSplitMethod,
    WeightsTarget, WeightsUpdate,
};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A pinned, boxed stream of fallible items (used for streamed audio bodies).
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;
