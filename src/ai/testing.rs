use crate::ai::traits::{ModelBackend, TextStream};
use crate::ai::types::ImageAttachment;
use crate::error::{MarketError, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub(crate) enum Step {
    Text(&'static str),
    Fail,
}

/// Offline backend replaying canned replies
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    pub steps: Vec<Step>,
    pub json_reply: Option<String>,
    pub refuse_stream: bool,
    pub prompts: Mutex<Vec<String>>,
    pub images: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn streaming(steps: Vec<Step>) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    pub fn replying_json(reply: impl Into<String>) -> Self {
        Self {
            json_reply: Some(reply.into()),
            ..Self::default()
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    async fn stream_text(
        &self,
        prompt: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<TextStream> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(image) = image {
            self.images.lock().unwrap().push(image.mime_type.clone());
        }
        if self.refuse_stream {
            return Err(MarketError::Transport("connection refused".to_string()));
        }

        let items: Vec<Result<String>> = self
            .steps
            .iter()
            .map(|step| match step {
                Step::Text(text) => Ok(text.to_string()),
                Step::Fail => Err(MarketError::Model {
                    status: 500,
                    message: "internal".to_string(),
                }),
            })
            .collect();
        Ok(stream::iter(items).boxed())
    }

    async fn generate_json(&self, prompt: &str, _schema: &serde_json::Value) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.json_reply
            .clone()
            .ok_or_else(|| MarketError::Transport("connection reset".to_string()))
    }
}
