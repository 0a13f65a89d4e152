pub mod chats;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod mvi;
pub mod store;

pub use dispatch::{CurrentThreadDispatchers, DispatcherProvider, RuntimeDispatchers};
pub use error::{ErrorCode, RegistrationError, UseCaseError};
pub use lifecycle::{Lifecycle, LifecycleHandle};
pub use store::{Effects, Feature, Store, StoreBuilder, Subscriber, Transition};
