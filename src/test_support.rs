//! Shared test support utilities
//!
//! Provides `ScriptedGenerator`, a `TextGenerator` that replays canned
//! results, for use in unit and integration tests.

use crate::error::GenerationError;
use crate::port::{TextGenerator, TextRequest};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use tokio::sync::oneshot;

struct Scripted {
    gate: Option<oneshot::Receiver<()>>,
    result: Result<String, GenerationError>,
}

/// Generator that answers calls in order from a script.
///
/// A gated entry does not resolve until its sender fires (or is dropped),
/// which lets tests control completion order of overlapping calls.
#[derive(Default)]
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<TextRequest>>,
}

impl ScriptedGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn respond_ok(self, text: impl Into<String>) -> Self {
        self.push(None, Ok(text.into()))
    }

    #[must_use]
    pub fn respond_err(self, error: GenerationError) -> Self {
        self.push(None, Err(error))
    }

    /// Next call resolves with `text` once the returned sender fires.
    #[must_use]
    pub fn respond_ok_when_released(self, text: impl Into<String>) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        (self.push(Some(rx), Ok(text.into())), tx)
    }

    fn push(
        self,
        gate: Option<oneshot::Receiver<()>>,
        result: Result<String, GenerationError>,
    ) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Scripted { gate, result });
        self
    }

    /// Every request received so far, in call order.
    pub fn requests(&self) -> Vec<TextRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate<'a>(
        &'a self,
        request: &'a TextRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        Box::pin(async move {
            let Some(Scripted { gate, result }) = next else {
                return Err(GenerationError::MalformedResponse(
                    "scripted generator has no response left".into(),
                ));
            };
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            result
        })
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
