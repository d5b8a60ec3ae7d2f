//! Benchmarks for request encoding
//!
//! This benchmark measures:
//! - SynthesisRequest to JSON body serialization
//! - Query-string flattening for the GET form of /tts

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use gpt_sovits_client::{MediaType, SynthesisRequest};

fn request_with_text(chars: usize) -> SynthesisRequest {
    let text: String = "春眠不觉晓，处处闻啼鸟。".chars().cycle().take(chars).collect();
    SynthesisRequest::new(text, "zh", "ref/voice.wav", "zh")
        .with_prompt_text("夜来风雨声，花落知多少。")
        .with_aux_ref_audio_paths(vec!["ref/aux1.wav".into(), "ref/aux2.wav".into()])
        .with_media_type(MediaType::Ogg)
}

fn bench_json_body(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_body");
    for chars in [32usize, 512, 4096] {
        let request = request_with_text(chars);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(chars), &request, |b, req| {
            b.iter(|| serde_json::to_vec(black_box(req)).unwrap())
        });
    }
    group.finish();
}

fn bench_query_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_string");
    for chars in [32usize, 512, 4096] {
        let request = request_with_text(chars);
        group.bench_with_input(BenchmarkId::from_parameter(chars), &request, |b, req| {
            b.iter(|| {
                let pairs = black_box(req).to_query_pairs();
                let mut url = url::Url::parse("http://127.0.0.1:9880/tts").unwrap();
                url.query_pairs_mut().extend_pairs(pairs.iter());
                url
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_json_body, bench_query_pairs);
criterion_main!(benches);
