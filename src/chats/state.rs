//! State for the chat list.

use crate::error::ErrorCode;
use crate::mvi::UiState;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatsState {
    pub chats: Vec<String>,
    /// Code of the last failed load, until dismissed or a load succeeds.
    pub error: Option<ErrorCode>,
}

impl UiState for ChatsState {}

impl ChatsState {
    pub fn with_chats<I, S>(chats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chats: chats.into_iter().map(Into::into).collect(),
            error: None,
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}
