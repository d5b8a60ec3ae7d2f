//! Payloads for the `/control` and `/set_*_weights` endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, ErrorContext};

/// Process-level command understood by the server's `/control` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlCommand {
    Restart,
    Exit,
}

impl ControlCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restart => "restart",
            Self::Exit => "exit",
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restart" => Ok(Self::Restart),
            "exit" => Ok(Self::Exit),
            other => Err(Error::validation_with_context(
                format!("unknown control command '{}'", other),
                ErrorContext::new()
                    .with_field_path("command")
                    .with_details("expected restart or exit")
                    .with_source("parse"),
            )),
        }
    }
}

/// `{"command": "restart"|"exit"}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlRequest {
    pub command: ControlCommand,
}

/// `{"weights_path": "..."}`: checkpoint path on the server's filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightsUpdate {
    pub weights_path: String,
}

impl WeightsUpdate {
    pub fn new(weights_path: impl Into<String>) -> Self {
        Self {
            weights_path: weights_path.into(),
        }
    }
}

/// Which model component a weights update swaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightsTarget {
    /// Text-to-semantic language model.
    Gpt,
    /// SoVITS vocoder.
    Sovits,
}

impl WeightsTarget {
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            Self::Gpt => "/set_gpt_weights",
            Self::Sovits => "/set_sovits_weights",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Gpt => "GPT",
            Self::Sovits => "SoVITS",
        }
    }
}
