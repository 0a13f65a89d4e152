//! Changes for the chat list.

use crate::error::ErrorCode;
use crate::mvi::Change;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatsChange {
    SuccessLoadingChats(Vec<String>),
    FailureLoadingChats(ErrorCode),
    ErrorDismissed,
}

impl Change for ChatsChange {}
