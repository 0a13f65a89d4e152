use std::sync::Arc;

use crate::mvi::Reducer;
use crate::store::{Effects, Feature};

use super::action::ChatsAction;
use super::change::ChatsChange;
use super::reducer::ChatsReducer;
use super::state::ChatsState;
use super::use_case::ChatsUseCase;

/// Chat list feature backed by a [`ChatsUseCase`].
pub struct ChatsFeature<U> {
    use_case: Arc<U>,
}

impl<U: ChatsUseCase> ChatsFeature<U> {
    pub fn new(use_case: U) -> Self {
        Self {
            use_case: Arc::new(use_case),
        }
    }
}

impl<U: ChatsUseCase> Reducer for ChatsFeature<U> {
    type State = ChatsState;
    type Change = ChatsChange;

    fn reduce(state: &Arc<Self::State>, change: Self::Change) -> Arc<Self::State> {
        ChatsReducer::reduce(state, change)
    }
}

impl<U: ChatsUseCase> Feature for ChatsFeature<U> {
    type Action = ChatsAction;

    fn on_action(&self, action: Self::Action, effects: &Effects<Self>) {
        match action {
            ChatsAction::LoadChats => {
                let use_case = Arc::clone(&self.use_case);
                let effects_for_task = effects.clone();
                effects.launch_io(async move {
                    let change = match use_case.load_chats().await {
                        Ok(chats) => ChatsChange::SuccessLoadingChats(chats),
                        Err(err) => {
                            tracing::warn!(error = %err, "Loading chats failed");
                            ChatsChange::FailureLoadingChats(err.code())
                        }
                    };
                    effects_for_task.dispatch_change(change).await;
                });
            }
            ChatsAction::DismissError => {
                let effects_for_task = effects.clone();
                effects.launch(async move {
                    effects_for_task
                        .dispatch_change(ChatsChange::ErrorDismissed)
                        .await;
                });
            }
        }
    }

    fn on_state_transition(&self, old: &Arc<ChatsState>, new: &Arc<ChatsState>) {
        tracing::debug!(
            before = old.chats.len(),
            after = new.chats.len(),
            error = ?new.error,
            "Chats state changed"
        );
    }

    fn on_detach(&self) {
        tracing::info!("Chats renderer detached, cancelling pending loads");
    }
}
