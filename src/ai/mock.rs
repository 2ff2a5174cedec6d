use super::{GenerationService, TextStream};
use crate::models::GenerationRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

enum MockOutcome {
    Chunks(Vec<String>),
    Failure { status: Option<u16>, message: String },
}

/// Scriptable generation client for tests.
///
/// Outcomes are consumed in FIFO order, one per call; an exhausted script
/// yields an empty stream. Clones share the script and call counter.
#[derive(Clone)]
pub struct MockGenerationClient {
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockGenerationClient {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_chunk_response(self, chunks: Vec<&str>) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(MockOutcome::Chunks(
                chunks.into_iter().map(String::from).collect(),
            ));
        self
    }

    pub fn with_failure(self, status: Option<u16>, message: &str) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(MockOutcome::Failure {
                status,
                message: message.to_string(),
            });
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationService for MockGenerationClient {
    async fn stream_generate(&self, _request: &GenerationRequest) -> Result<TextStream> {
        *self.call_count.lock().unwrap() += 1;

        let outcome = self.outcomes.lock().unwrap().pop_front();
        match outcome {
            Some(MockOutcome::Failure { status, message }) => {
                Err(Error::ai_provider(status, message))
            }
            Some(MockOutcome::Chunks(chunks)) => Ok(Box::pin(futures::stream::iter(
                chunks.into_iter().map(Ok::<String, Error>),
            ))),
            None => Ok(Box::pin(futures::stream::empty())),
        }
    }
}
