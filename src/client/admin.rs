//! Server administration: process control and runtime weight swaps.

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::client::core::SynthesisClient;
use crate::transport::RawResponse;
use crate::types::{ControlCommand, ControlRequest, WeightsTarget, WeightsUpdate};
use crate::{Error, Result};

const CONTROL_PATH: &str = "/control";

impl SynthesisClient {
    /// POST `{"command": ...}` to `/control`. Succeeds on 200 or 204.
    ///
    /// `exit` and `restart` usually drop the connection before a response arrives;
    /// that surfaces as a transport error.
    #[instrument(name = "sovits_call", skip_all, fields(endpoint = "control", method = "POST", command = %command, request_id = %Uuid::new_v4()))]
    pub async fn send_control_command(&self, command: ControlCommand) -> Result<()> {
        let raw = self
            .transport
            .post_json(CONTROL_PATH, &ControlRequest { command })
            .await?;
        expect_control_ack(raw)
    }

    /// GET `/control?command=...`. Succeeds on 200 or 204.
    #[instrument(name = "sovits_call", skip_all, fields(endpoint = "control", method = "GET", command = %command, request_id = %Uuid::new_v4()))]
    pub async fn send_control_command_via_get(&self, command: ControlCommand) -> Result<()> {
        let raw = self
            .transport
            .get_query(CONTROL_PATH, &[("command", command.as_str())])
            .await?;
        expect_control_ack(raw)
    }

    /// Load a GPT (text-to-semantic) checkpoint on the server. Succeeds only on 200.
    pub async fn update_gpt_weights(&self, weights_path: &str) -> Result<()> {
        self.update_weights(WeightsTarget::Gpt, weights_path).await
    }

    pub async fn update_gpt_weights_via_get(&self, weights_path: &str) -> Result<()> {
        self.update_weights_via_get(WeightsTarget::Gpt, weights_path).await
    }

    /// Load a SoVITS (vocoder) checkpoint on the server. Succeeds only on 200.
    pub async fn update_sovits_weights(&self, weights_path: &str) -> Result<()> {
        self.update_weights(WeightsTarget::Sovits, weights_path).await
    }

    pub async fn update_sovits_weights_via_get(&self, weights_path: &str) -> Result<()> {
        self.update_weights_via_get(WeightsTarget::Sovits, weights_path).await
    }

    #[instrument(name = "sovits_call", skip_all, fields(endpoint = target.endpoint_path(), method = "POST", request_id = %Uuid::new_v4()))]
    pub async fn update_weights(&self, target: WeightsTarget, weights_path: &str) -> Result<()> {
        let raw = self
            .transport
            .post_json(target.endpoint_path(), &WeightsUpdate::new(weights_path))
            .await?;
        expect_weights_loaded(target, weights_path, raw)
    }

    #[instrument(name = "sovits_call", skip_all, fields(endpoint = target.endpoint_path(), method = "GET", request_id = %Uuid::new_v4()))]
    pub async fn update_weights_via_get(
        &self,
        target: WeightsTarget,
        weights_path: &str,
    ) -> Result<()> {
        let raw = self
            .transport
            .get_query(target.endpoint_path(), &[("weights_path", weights_path)])
            .await?;
        expect_weights_loaded(target, weights_path, raw)
    }
}

fn expect_control_ack(raw: RawResponse) -> Result<()> {
    match raw.status {
        200 | 204 => Ok(()),
        status => {
            warn!(status, body = %raw.body_text(), "control command rejected");
            Err(Error::remote(status, CONTROL_PATH, &raw.body))
        }
    }
}

fn expect_weights_loaded(target: WeightsTarget, weights_path: &str, raw: RawResponse) -> Result<()> {
    if raw.status == 200 {
        info!(component = target.label(), weights_path, "weights loaded");
        return Ok(());
    }
    warn!(
        component = target.label(),
        status = raw.status,
        body = %raw.body_text(),
        "weights update rejected"
    );
    Err(Error::remote(raw.status, target.endpoint_path(), &raw.body))
}
