//! Model-View-Intent (MVI) primitives.
//!
//! Base traits for unidirectional data flow between a store and the
//! single renderer subscribed to it.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Effects ──→ Change ──→ Reducer ──→ State ──→ Subscriber
//!    ↑                                                        │
//!    └────────────────────────────────────────────────────────┘
//! ```
//!
//! - **State**: Immutable snapshot of everything the subscriber renders
//! - **Action**: User intent or system event, never applied to state directly
//! - **Change**: Outcome of asynchronous work, the only input to a reducer
//! - **Reducer**: Pure function that computes the next state from a change

mod action;
mod change;
mod reducer;
mod state;

pub use action::Action;
pub use change::Change;
pub use reducer::Reducer;
pub use state::UiState;
