//! Base trait for UI state in MVI architecture.

use std::fmt::Debug;

/// Marker trait for UI state objects.
///
/// States should be:
/// - Immutable (shared as `Arc<Self>`, replaced wholesale)
/// - Self-contained (all data needed to render the view)
/// - Comparable (PartialEq for value-based no-op detection)
pub trait UiState: Clone + PartialEq + Default + Debug + Send + Sync + 'static {}
