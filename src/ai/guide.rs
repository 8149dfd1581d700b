use crate::ai::traits::ModelBackend;
use crate::ai::types::ImageAttachment;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub const UNAVAILABLE_NOTICE: &str =
    "The AI Guide is currently unavailable. The API Key is missing.";
pub const ERROR_NOTICE: &str = "Sorry, I encountered an error. Please try again.";

const FRAGMENT_BUFFER: usize = 32;

/// Conversational farming assistant backed by the hosted model
#[derive(Clone)]
pub struct AiGuide {
    backend: Option<Arc<dyn ModelBackend>>,
}

impl AiGuide {
    pub fn new(backend: Option<Arc<dyn ModelBackend>>) -> Self {
        Self { backend }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Ask a question. Fragments of the reply arrive on the returned stream.
    ///
    /// Without a backend the stream carries only [`UNAVAILABLE_NOTICE`]. A
    /// failure at any point ends the stream with [`ERROR_NOTICE`]. Dropping
    /// the stream stops the request.
    pub fn ask(&self, prompt: impl Into<String>, image: Option<ImageAttachment>) -> GuideStream {
        let (tx, rx) = mpsc::channel(FRAGMENT_BUFFER);

        match &self.backend {
            None => {
                // capacity is non-zero, so this cannot fail
                let _ = tx.try_send(UNAVAILABLE_NOTICE.to_string());
            }
            Some(backend) => {
                let backend = Arc::clone(backend);
                let prompt = prompt.into();
                tokio::spawn(produce(backend, prompt, image, tx));
            }
        }

        GuideStream { rx }
    }
}

async fn produce(
    backend: Arc<dyn ModelBackend>,
    prompt: String,
    image: Option<ImageAttachment>,
    tx: mpsc::Sender<String>,
) {
    info!(chars = prompt.len(), with_image = image.is_some(), "AI Guide request");

    let opened = tokio::select! {
        _ = tx.closed() => {
            debug!("Guide consumer dropped before reply started");
            return;
        }
        opened = backend.stream_text(&prompt, image.as_ref()) => opened,
    };

    let mut fragments = match opened {
        Ok(fragments) => fragments,
        Err(e) => {
            warn!(error = %e, "AI Guide request failed");
            let _ = tx.send(ERROR_NOTICE.to_string()).await;
            return;
        }
    };

    let mut sent = 0usize;
    loop {
        let next = tokio::select! {
            _ = tx.closed() => {
                debug!(sent, "Guide consumer dropped mid-reply");
                return;
            }
            next = fragments.next() => next,
        };

        match next {
            Some(Ok(fragment)) => {
                if fragment.is_empty() {
                    continue;
                }
                if tx.send(fragment).await.is_err() {
                    return;
                }
                sent += 1;
            }
            Some(Err(e)) => {
                warn!(error = %e, sent, "AI Guide stream failed");
                let _ = tx.send(ERROR_NOTICE.to_string()).await;
                return;
            }
            None => {
                debug!(sent, "AI Guide reply complete");
                return;
            }
        }
    }
}

/// Receiving end of a guide reply
pub struct GuideStream {
    rx: mpsc::Receiver<String>,
}

impl GuideStream {
    pub async fn next_fragment(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Drain the whole reply into one string
    pub async fn collect_text(mut self) -> String {
        let mut text = String::new();
        while let Some(fragment) = self.next_fragment().await {
            text.push_str(&fragment);
        }
        text
    }
}

impl Stream for GuideStream {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<String>> {
        self.rx.poll_recv(cx)
    }
}
