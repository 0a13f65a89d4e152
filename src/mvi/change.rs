//! Base trait for changes in MVI architecture.

use std::fmt::Debug;

/// Marker trait for change objects.
///
/// A change is a fact about finished work ("chats loaded", "load failed
/// with code X"). Each feature declares a closed enum of changes so the
/// reducer can match them exhaustively.
pub trait Change: Debug + Send + 'static {}
