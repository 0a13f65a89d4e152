//! Source of the chat list.

use std::future::Future;
use std::time::Duration;

use crate::error::{ErrorCode, UseCaseError};

/// Loads chats from wherever they live (network, disk, memory).
///
/// Failures come back as [`UseCaseError`]; the feature turns them into
/// a failure change instead of propagating them.
pub trait ChatsUseCase: Send + Sync + 'static {
    fn load_chats(&self) -> impl Future<Output = Result<Vec<String>, UseCaseError>> + Send;
}

/// Fixed chat list served after a simulated delay.
#[derive(Debug, Clone)]
pub struct InMemoryChats {
    chats: Vec<String>,
    delay: Duration,
    failure: Option<ErrorCode>,
}

impl InMemoryChats {
    pub fn new<I, S>(chats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chats: chats.into_iter().map(Into::into).collect(),
            delay: Duration::ZERO,
            failure: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make every load fail with `code`.
    pub fn failing(mut self, code: ErrorCode) -> Self {
        self.failure = Some(code);
        self
    }
}

impl ChatsUseCase for InMemoryChats {
    async fn load_chats(&self) -> Result<Vec<String>, UseCaseError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.failure {
            Some(code) => Err(UseCaseError::new("load_chats", code, "simulated failure")),
            None => Ok(self.chats.clone()),
        }
    }
}
