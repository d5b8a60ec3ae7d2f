//! Result of a `/tts` call.

use bytes::Bytes;

use crate::{Error, Result};

/// Status code and verbatim body returned by `/tts`.
///
/// On success `audio` holds the encoded stream in the requested media type; on failure
/// it holds the server's JSON error body and `error` carries the same text.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    pub status: u16,
    pub audio: Bytes,
    pub error: Option<String>,
    pub(crate) endpoint: String,
}

impl SynthesisResult {
    pub(crate) fn from_response(status: u16, body: Bytes, endpoint: impl Into<String>) -> Self {
        let error = if (200..300).contains(&status) {
            None
        } else {
            Some(String::from_utf8_lossy(&body).into_owned())
        };
        Self {
            status,
            audio: body,
            error,
            endpoint: endpoint.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Audio bytes, or [`Error::Remote`] when the server reported a failure.
    pub fn into_audio(self) -> Result<Bytes> {
        match self.error {
            None => Ok(self.audio),
            Some(message) => Err(Error::Remote {
                status: self.status,
                endpoint: self.endpoint,
                message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_keeps_bytes() {
        let r = SynthesisResult::from_response(200, Bytes::from_static(b"RIFF"), "/tts");
        assert!(r.is_success());
        assert_eq!(r.into_audio().unwrap(), Bytes::from_static(b"RIFF"));
    }

    #[test]
    fn failure_exposes_body_as_error() {
        let body = r#"{"message":"text is required"}"#;
        let r = SynthesisResult::from_response(400, Bytes::from(body), "/tts");
        assert!(!r.is_success());
        assert_eq!(r.error.as_deref(), Some(body));
        assert_eq!(r.audio, Bytes::from(body));
        let err = r.into_audio().unwrap_err();
        assert_eq!(err.status(), Some(400));
    }
}
