//! Scripted model client for driving the orchestrator without a network.

use async_trait::async_trait;
use futures::channel::oneshot;
use skyinsight::error::ApiError;
use skyinsight::provider::ModelClient;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Text that only the reference prompt contains.
const REFERENCES_MARKER: &str = "academic references";

/// One scripted reply to a `generate` call.
pub enum Reply {
    Text(String),
    Fail(String),
    /// Resolves when the paired sender fires
    Gate(oneshot::Receiver<Result<String, String>>),
}

pub fn ok(text: &str) -> Reply {
    Reply::Text(text.to_string())
}

pub fn fail(message: &str) -> Reply {
    Reply::Fail(message.to_string())
}

pub fn gate() -> (oneshot::Sender<Result<String, String>>, Reply) {
    let (tx, rx) = oneshot::channel();
    (tx, Reply::Gate(rx))
}

/// Replies are queued per prompt kind and consumed in dispatch order.
pub struct ScriptedClient {
    narrative: Mutex<VecDeque<Reply>>,
    references: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            narrative: Mutex::new(VecDeque::new()),
            references: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn narrative(self, reply: Reply) -> Self {
        self.narrative.lock().unwrap().push_back(reply);
        self
    }

    pub fn references(self, reply: Reply) -> Self {
        self.references.lock().unwrap().push_back(reply);
        self
    }

    /// Every prompt received so far, in dispatch order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let queue = if prompt.contains(REFERENCES_MARKER) {
            &self.references
        } else {
            &self.narrative
        };
        let reply = queue.lock().unwrap().pop_front();

        let outcome = match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(message)) => Err(message),
            Some(Reply::Gate(rx)) => rx
                .await
                .unwrap_or_else(|_| Err("gate dropped".to_string())),
            None => Err("script exhausted".to_string()),
        };
        outcome.map_err(ApiError::ProviderRequestFailed)
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}
