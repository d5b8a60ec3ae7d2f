use bytes::Bytes;
use futures::StreamExt;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::client::builder::SynthesisClientBuilder;
use crate::transport::HttpTransport;
use crate::types::{MediaType, SynthesisRequest, SynthesisResult, TextSplitMethod};
use crate::{BoxStream, Error, Result};

pub(crate) const TTS_PATH: &str = "/tts";

/// Client for a remote GPT-SoVITS inference server.
///
/// Cheap to clone; clones share one connection pool and can be used from many tasks
/// at once. Each method is a single HTTP round trip bounded by the configured timeout.
/// Dropping a returned future cancels the request; wrap a call in
/// `tokio::time::timeout` for a deadline tighter than the client-wide one.
#[derive(Debug, Clone)]
pub struct SynthesisClient {
    pub(crate) transport: HttpTransport,
}

impl SynthesisClient {
    /// Client for `base_url` with the default 60 second timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        SynthesisClientBuilder::new().base_url(base_url).build()
    }

    pub fn builder() -> SynthesisClientBuilder {
        SynthesisClientBuilder::new()
    }

    pub(crate) fn from_transport(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Normalized base URL (always ends with `/`).
    pub fn base_url(&self) -> &str {
        self.transport.base_url().as_str()
    }

    /// POST `request` as JSON to `/tts`.
    ///
    /// Any HTTP status is returned as data: on 200 `audio` is the encoded stream, on 400
    /// it is the server's JSON error body. Only transport and encoding failures are `Err`.
    #[instrument(name = "sovits_call", skip_all, fields(endpoint = "tts", method = "POST", request_id = %Uuid::new_v4()))]
    pub async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResult> {
        debug!(
            text_lang = %request.text_lang,
            media_type = %request.media_type,
            streaming = request.streaming_mode,
            "synthesis request"
        );
        let raw = self.transport.post_json(TTS_PATH, request).await?;
        Ok(SynthesisResult::from_response(raw.status, raw.body, TTS_PATH))
    }

    /// [`synthesize`](Self::synthesize) with the fixed settings of the quick path:
    /// `cut5` splitting, batch size 1, WAV output, no streaming.
    pub async fn synthesize_simple(
        &self,
        text: &str,
        text_lang: &str,
        ref_audio_path: &str,
        prompt_lang: &str,
        prompt_text: &str,
    ) -> Result<SynthesisResult> {
        let request = simple_request(text, text_lang, ref_audio_path, prompt_lang, prompt_text);
        self.synthesize(&request).await
    }

    /// GET `/tts` with caller-supplied query parameters.
    ///
    /// Parameters are sent in iteration order and percent-encoded, so non-ASCII text
    /// arrives intact.
    pub async fn synthesize_via_query<I, K, V>(&self, params: I) -> Result<SynthesisResult>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<(K, V)> = params.into_iter().collect();
        self.get_tts(&pairs).await
    }

    #[instrument(name = "sovits_call", skip_all, fields(endpoint = "tts", method = "GET", request_id = %Uuid::new_v4()))]
    async fn get_tts<K, V>(&self, pairs: &[(K, V)]) -> Result<SynthesisResult>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        debug!(params = pairs.len(), "synthesis request");
        let raw = self.transport.get_query(TTS_PATH, pairs).await?;
        Ok(SynthesisResult::from_response(raw.status, raw.body, TTS_PATH))
    }

    /// GET `/tts` with every field of a typed request flattened into the query string.
    pub async fn synthesize_via_get(&self, request: &SynthesisRequest) -> Result<SynthesisResult> {
        self.synthesize_via_query(request.to_query_pairs()).await
    }

    /// POST `request` and expose the audio body as it arrives.
    ///
    /// Meant for `streaming_mode` requests; chunks are forwarded unopened. A non-2xx
    /// status is drained and reported as [`Error::Remote`] before any chunk is yielded.
    #[instrument(name = "sovits_call", skip_all, fields(endpoint = "tts", method = "POST", request_id = %Uuid::new_v4()))]
    pub async fn synthesize_stream(
        &self,
        request: &SynthesisRequest,
    ) -> Result<BoxStream<'static, Bytes>> {
        let (status, mut stream) = self.transport.post_json_stream(TTS_PATH, request).await?;
        if !(200..300).contains(&status) {
            let mut body = Vec::new();
            while let Some(chunk) = stream.next().await {
                body.extend_from_slice(&chunk?);
            }
            warn!(status, "streaming synthesis rejected");
            return Err(Error::remote(status, TTS_PATH, &body));
        }
        debug!(status, "streaming synthesis started");
        Ok(stream)
    }
}

fn simple_request(
    text: &str,
    text_lang: &str,
    ref_audio_path: &str,
    prompt_lang: &str,
    prompt_text: &str,
) -> SynthesisRequest {
    let mut request = SynthesisRequest::new(text, text_lang, ref_audio_path, prompt_lang)
        .with_prompt_text(prompt_text);
    request.text_split_method = TextSplitMethod::Cut5;
    request.batch_size = 1;
    request.media_type = MediaType::Wav;
    request.streaming_mode = false;
    request
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_request_forces_quick_path_settings() {
        let req = simple_request("hello", "en", "ref.wav", "en", "");
        assert_eq!(req.text_split_method, TextSplitMethod::Cut5);
        assert_eq!(req.batch_size, 1);
        assert_eq!(req.media_type, MediaType::Wav);
        assert!(!req.streaming_mode);
        assert_eq!(req.text, "hello");
        assert_eq!(req.ref_audio_path, "ref.wav");
        assert_eq!(req.top_k, 5);
        assert_eq!(req.seed, -1);
    }

    #[test]
    fn client_is_shareable_across_tasks() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<SynthesisClient>();
    }
}
