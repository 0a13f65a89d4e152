//! Actions for the chat list.

use crate::mvi::Action;

/// Actions the chat list renderer can dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatsAction {
    /// Fetch the chat list in the background.
    LoadChats,

    /// Hide the error from the last failed load.
    DismissError,
}

impl Action for ChatsAction {}
