//! Chat list feature.
//!
//! # Architecture
//!
//! Uses MVI (Model-View-Intent) pattern:
//! - `state.rs` - Chat list and last load error
//! - `action.rs` - Requests from the renderer (LoadChats, DismissError)
//! - `change.rs` - Outcomes of background work
//! - `reducer.rs` - State transitions (pure, no side effects)
//! - `feature.rs` - Maps actions to background work
//! - `use_case.rs` - Source of chats

mod action;
mod change;
mod feature;
mod reducer;
mod state;
mod use_case;

pub use action::ChatsAction;
pub use change::ChatsChange;
pub use feature::ChatsFeature;
pub use reducer::ChatsReducer;
pub use state::ChatsState;
pub use use_case::{ChatsUseCase, InMemoryChats};
