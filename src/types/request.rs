//! Synthesis request payload for the `/tts` endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, ErrorContext};

/// Output container the server encodes audio into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Wav,
    Raw,
    Ogg,
    Aac,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Raw => "raw",
            Self::Ogg => "ogg",
            Self::Aac => "aac",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Raw => "audio/pcm",
            Self::Ogg => "audio/ogg",
            Self::Aac => "audio/aac",
        }
    }

    /// File extension used when saving output to disk.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Raw => "pcm",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wav" => Ok(Self::Wav),
            "raw" => Ok(Self::Raw),
            "ogg" => Ok(Self::Ogg),
            "aac" => Ok(Self::Aac),
            other => Err(Error::validation_with_context(
                format!("unsupported media type '{}'", other),
                ErrorContext::new()
                    .with_field_path("media_type")
                    .with_details("expected one of wav, raw, ogg, aac")
                    .with_source("parse"),
            )),
        }
    }
}

/// Server-side text segmentation strategy.
///
/// `cut0` leaves the text whole; `cut1`..`cut5` split by sentence count,
/// length, Chinese punctuation, English punctuation, and any punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSplitMethod {
    Cut0,
    Cut1,
    Cut2,
    Cut3,
    Cut4,
    #[default]
    Cut5,
}

impl TextSplitMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cut0 => "cut0",
            Self::Cut1 => "cut1",
            Self::Cut2 => "cut2",
            Self::Cut3 => "cut3",
            Self::Cut4 => "cut4",
            Self::Cut5 => "cut5",
        }
    }
}

impl fmt::Display for TextSplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextSplitMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cut0" => Ok(Self::Cut0),
            "cut1" => Ok(Self::Cut1),
            "cut2" => Ok(Self::Cut2),
            "cut3" => Ok(Self::Cut3),
            "cut4" => Ok(Self::Cut4),
            "cut5" => Ok(Self::Cut5),
            other => Err(Error::validation_with_context(
                format!("unsupported text split method '{}'", other),
                ErrorContext::new()
                    .with_field_path("text_split_method")
                    .with_details("expected cut0..cut5")
                    .with_source("parse"),
            )),
        }
    }
}

/// Body of a `/tts` call.
///
/// Field names are the server's wire keys. Nothing here is validated client side;
/// the server rejects bad combinations with HTTP 400.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub text_lang: String,
    pub ref_audio_path: String,
    /// Extra reference clips blended into the voice timbre.
    #[serde(default)]
    pub aux_ref_audio_paths: Vec<String>,
    #[serde(default)]
    pub prompt_text: String,
    pub prompt_lang: String,
    pub top_k: i32,
    pub top_p: f64,
    pub temperature: f64,
    pub text_split_method: TextSplitMethod,
    pub batch_size: i32,
    pub batch_threshold: f64,
    pub split_bucket: bool,
    pub speed_factor: f64,
    pub fragment_interval: f64,
    pub seed: i64,
    pub media_type: MediaType,
    pub streaming_mode: bool,
    pub parallel_infer: bool,
    pub repetition_penalty: f64,
    /// V3 vocoder only.
    pub sample_steps: i32,
    /// V3 vocoder only.
    pub super_sampling: bool,
}

impl SynthesisRequest {
    /// Request populated with the server's documented defaults.
    pub fn new(
        text: impl Into<String>,
        text_lang: impl Into<String>,
        ref_audio_path: impl Into<String>,
        prompt_lang: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            text_lang: text_lang.into(),
            ref_audio_path: ref_audio_path.into(),
            aux_ref_audio_paths: Vec::new(),
            prompt_text: String::new(),
            prompt_lang: prompt_lang.into(),
            top_k: 5,
            top_p: 1.0,
            temperature: 1.0,
            text_split_method: TextSplitMethod::Cut5,
            batch_size: 1,
            batch_threshold: 0.75,
            split_bucket: true,
            speed_factor: 1.0,
            fragment_interval: 0.3,
            seed: -1,
            media_type: MediaType::Wav,
            streaming_mode: false,
            parallel_infer: true,
            repetition_penalty: 1.35,
            sample_steps: 32,
            super_sampling: false,
        }
    }

    pub fn with_prompt_text(mut self, prompt_text: impl Into<String>) -> Self {
        self.prompt_text = prompt_text.into();
        self
    }

    pub fn with_aux_ref_audio_paths(mut self, paths: Vec<String>) -> Self {
        self.aux_ref_audio_paths = paths;
        self
    }

    pub fn with_sampling(mut self, top_k: i32, top_p: f64, temperature: f64) -> Self {
        self.top_k = top_k;
        self.top_p = top_p;
        self.temperature = temperature;
        self
    }

    pub fn with_repetition_penalty(mut self, penalty: f64) -> Self {
        self.repetition_penalty = penalty;
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_text_split_method(mut self, method: TextSplitMethod) -> Self {
        self.text_split_method = method;
        self
    }

    pub fn with_batching(mut self, batch_size: i32, batch_threshold: f64, split_bucket: bool) -> Self {
        self.batch_size = batch_size;
        self.batch_threshold = batch_threshold;
        self.split_bucket = split_bucket;
        self
    }

    pub fn with_speed_factor(mut self, speed: f64) -> Self {
        self.speed_factor = speed;
        self
    }

    pub fn with_fragment_interval(mut self, interval: f64) -> Self {
        self.fragment_interval = interval;
        self
    }

    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = media_type;
        self
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming_mode = streaming;
        self
    }

    pub fn with_parallel_infer(mut self, parallel: bool) -> Self {
        self.parallel_infer = parallel;
        self
    }

    /// Settings only honoured by the V3 vocoder.
    pub fn with_v3(mut self, sample_steps: i32, super_sampling: bool) -> Self {
        self.sample_steps = sample_steps;
        self.super_sampling = super_sampling;
        self
    }

    /// Flatten into `(key, value)` pairs for the GET form of `/tts`.
    ///
    /// Pairs follow field declaration order. Each auxiliary reference path repeats the
    /// `aux_ref_audio_paths` key; an empty list contributes nothing.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("text", self.text.clone()),
            ("text_lang", self.text_lang.clone()),
            ("ref_audio_path", self.ref_audio_path.clone()),
        ];
        for path in &self.aux_ref_audio_paths {
            pairs.push(("aux_ref_audio_paths", path.clone()));
        }
        pairs.extend([
            ("prompt_text", self.prompt_text.clone()),
            ("prompt_lang", self.prompt_lang.clone()),
            ("top_k", self.top_k.to_string()),
            ("top_p", self.top_p.to_string()),
            ("temperature", self.temperature.to_string()),
            ("text_split_method", self.text_split_method.to_string()),
            ("batch_size", self.batch_size.to_string()),
            ("batch_threshold", self.batch_threshold.to_string()),
            ("split_bucket", self.split_bucket.to_string()),
            ("speed_factor", self.speed_factor.to_string()),
            ("fragment_interval", self.fragment_interval.to_string()),
            ("seed", self.seed.to_string()),
            ("media_type", self.media_type.to_string()),
            ("streaming_mode", self.streaming_mode.to_string()),
            ("parallel_infer", self.parallel_infer.to_string()),
            ("repetition_penalty", self.repetition_penalty.to_string()),
            ("sample_steps", self.sample_steps.to_string()),
            ("super_sampling", self.super_sampling.to_string()),
        ]);
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SynthesisRequest {
        SynthesisRequest::new("你好，世界", "zh", "ref.wav", "zh")
            .with_prompt_text("参考文本")
            .with_aux_ref_audio_paths(vec!["a.wav".into(), "b.wav".into()])
            .with_sampling(15, 0.8, 0.6)
            .with_seed(42)
            .with_media_type(MediaType::Ogg)
            .with_v3(16, true)
    }

    #[test]
    fn json_uses_wire_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        let obj = value.as_object().unwrap();
        for key in [
            "text",
            "text_lang",
            "ref_audio_path",
            "aux_ref_audio_paths",
            "prompt_text",
            "prompt_lang",
            "top_k",
            "top_p",
            "temperature",
            "text_split_method",
            "batch_size",
            "batch_threshold",
            "split_bucket",
            "speed_factor",
            "fragment_interval",
            "seed",
            "media_type",
            "streaming_mode",
            "parallel_infer",
            "repetition_penalty",
            "sample_steps",
            "super_sampling",
        ] {
            assert!(obj.contains_key(key), "missing key {}", key);
        }
        assert_eq!(obj.len(), 22);
        assert_eq!(value["media_type"], "ogg");
        assert_eq!(value["text_split_method"], "cut5");
        assert_eq!(value["aux_ref_audio_paths"][1], "b.wav");
    }

    #[test]
    fn json_round_trip_is_lossless() {
        let req = sample();
        let encoded = serde_json::to_string(&req).unwrap();
        let decoded: SynthesisRequest = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn new_applies_server_defaults() {
        let req = SynthesisRequest::new("hello", "en", "ref.wav", "en");
        assert_eq!(req.top_k, 5);
        assert_eq!(req.batch_size, 1);
        assert_eq!(req.seed, -1);
        assert_eq!(req.media_type, MediaType::Wav);
        assert_eq!(req.text_split_method, TextSplitMethod::Cut5);
        assert!(!req.streaming_mode);
        assert!(req.parallel_infer);
        assert!(req.prompt_text.is_empty());
    }

    #[test]
    fn query_pairs_repeat_aux_paths_in_order() {
        let pairs = sample().to_query_pairs();
        assert_eq!(pairs[0], ("text", "你好，世界".to_string()));
        let aux: Vec<&str> = pairs
            .iter()
            .filter(|(k, _)| *k == "aux_ref_audio_paths")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(aux, vec!["a.wav", "b.wav"]);
        assert!(pairs.contains(&("super_sampling", "true".to_string())));
        assert!(pairs.contains(&("media_type", "ogg".to_string())));

        let bare = SynthesisRequest::new("hi", "en", "r.wav", "en").to_query_pairs();
        assert!(bare.iter().all(|(k, _)| *k != "aux_ref_audio_paths"));
        assert_eq!(bare.len(), 21);
    }

    #[test]
    fn media_type_parsing() {
        assert_eq!("AAC".parse::<MediaType>().unwrap(), MediaType::Aac);
        assert_eq!(MediaType::Raw.extension(), "pcm");
        assert_eq!(MediaType::Raw.mime_type(), "audio/pcm");
        assert_eq!(MediaType::Ogg.mime_type(), "audio/ogg");
        let err = "mp3".parse::<MediaType>().unwrap_err();
        assert!(err.to_string().contains("mp3"));
        assert!(err.to_string().contains("source: parse"));
    }

    #[test]
    fn split_method_parsing() {
        assert_eq!("cut0".parse::<TextSplitMethod>().unwrap(), TextSplitMethod::Cut0);
        assert!("cut9".parse::<TextSplitMethod>().is_err());
    }
}
