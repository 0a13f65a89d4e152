//! Base trait for actions in MVI architecture.

use std::fmt::Debug;

/// Marker trait for action objects.
///
/// Actions represent:
/// - User actions (button clicks, key presses)
/// - System events (lifecycle callbacks, timers)
///
/// Actions are handled by a feature, which may launch background work.
/// They never touch state; only changes do.
pub trait Action: Debug + Send + 'static {}
