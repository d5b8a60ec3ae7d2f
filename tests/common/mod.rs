//! Shared mock-server setup for integration tests.

use gpt_sovits_client::SynthesisClient;
use mockito::{Server, ServerGuard};
use std::time::Duration;

/// A fresh mock server plus a client pointed at it.
pub async fn mock_server() -> (ServerGuard, SynthesisClient) {
    let server = Server::new_async().await;
    let client = SynthesisClient::builder()
        .base_url(server.url())
        .timeout(Duration::from_secs(10))
        .build()
        .expect("client builds against mock server");
    (server, client)
}

/// First bytes of a 16-bit mono WAV file.
#[allow(dead_code)]
pub const WAV_HEADER: &[u8] = &[
    0x52, 0x49, 0x46, 0x46, 0x24, 0x08, 0x00, 0x00, 0x57, 0x41, 0x56, 0x45, 0x66, 0x6d, 0x74, 0x20,
];
