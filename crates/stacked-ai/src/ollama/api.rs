//! TextGenerator trait implementation for GenerationClient.

use async_trait::async_trait;
use stacked_common::new_correlation_id;
use tracing::{debug, info, Instrument};

use crate::retry::run_with_retry;
use crate::{AiError, GenerationRequest, TextGenerator};

use super::client::GenerationClient;

#[async_trait]
impl TextGenerator for GenerationClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, AiError> {
        let span = tracing::info_span!(
            "generate",
            request_id = %new_correlation_id(),
            model = %request.model
        );

        async {
            debug!(prompt_len = request.prompt.len(), "chat request");
            let reply = run_with_retry(&self.config.retry, |_| self.attempt(request)).await?;
            info!(reply_len = reply.len(), "chat reply received");
            Ok(reply)
        }
        .instrument(span)
        .await
    }
}
