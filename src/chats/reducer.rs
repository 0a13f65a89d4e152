//! Reducer for the chat list.

use std::sync::Arc;

use crate::mvi::Reducer;

use super::change::ChatsChange;
use super::state::ChatsState;

/// Reducer for chat list state transitions.
///
/// Hands back the current `Arc` whenever a change would leave the state as
/// it is, so the store skips publication.
pub struct ChatsReducer;

impl Reducer for ChatsReducer {
    type State = ChatsState;
    type Change = ChatsChange;

    fn reduce(state: &Arc<Self::State>, change: Self::Change) -> Arc<Self::State> {
        match change {
            ChatsChange::SuccessLoadingChats(chats) => {
                if state.chats == chats && state.error.is_none() {
                    Arc::clone(state)
                } else {
                    Arc::new(ChatsState { chats, error: None })
                }
            }

            ChatsChange::FailureLoadingChats(code) => {
                if state.error == Some(code) {
                    Arc::clone(state)
                } else {
                    // Keep whatever was loaded before; only the error changes.
                    Arc::new(ChatsState {
                        chats: state.chats.clone(),
                        error: Some(code),
                    })
                }
            }

            ChatsChange::ErrorDismissed => match state.error {
                None => Arc::clone(state),
                Some(_) => Arc::new(ChatsState {
                    chats: state.chats.clone(),
                    error: None,
                }),
            },
        }
    }
}
