use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::llm::{build_system_prompt, build_user_prompt, LlmClient};
use crate::models::StageSpec;

/// Runs one stage against a generative model and returns its raw text
#[async_trait]
pub trait StageExecutor: Send + Sync {
    async fn execute(&self, spec: &StageSpec) -> Result<String>;
}

#[async_trait]
impl StageExecutor for LlmClient {
    async fn execute(&self, spec: &StageSpec) -> Result<String> {
        let system = build_system_prompt(&spec.agent);
        let user = build_user_prompt(spec);
        debug!(stage = %spec.kind, "System prompt:\n{}", system);
        debug!(stage = %spec.kind, "User prompt:\n{}", user);

        self.send_message(&system, &user).await
    }
}
