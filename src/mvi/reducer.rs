//! Reducer trait for MVI architecture.

use std::sync::Arc;

use super::change::Change;
use super::state::UiState;

/// Reducer transforms state based on changes.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure function: (State, Change) -> State
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: UiState;

    /// The change type this reducer handles.
    type Change: Change;

    /// Process a change and return the new state.
    ///
    /// Returning `Arc::clone(state)` means "no transition": the store
    /// compares the result by pointer and skips publication.
    fn reduce(state: &Arc<Self::State>, change: Self::Change) -> Arc<Self::State>;
}
