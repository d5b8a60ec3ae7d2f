//! 请求与响应类型：`/tts`、`/control`、`/set_*_weights` 的线上数据结构。
//!
//! Wire types for the GPT-SoVITS HTTP API.

pub mod control;
pub mod request;
pub mod response;

pub use control::{ControlCommand, ControlRequest, WeightsTarget, WeightsUpdate};
pub use request::{MediaType, SynthesisRequest, TextSplitMethod};
pub use response::SynthesisResult;
