//! Translates user intents into store calls and owns the transient screen
//! state: editing selection, submit gating and the notification slot.

use std::sync::Arc;

use shared::domain::{User, UserDraft, UserId};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};

use crate::{
    config::ClientSettings,
    error::{TransportError, ValidationError},
    notification::{Notification, NotificationSlot},
    store::{MutationKind, QueryView, UserStore},
    validation::validate,
    ScreenEvent,
};

const CREATED_MESSAGE: &str = "Usuário criado com sucesso!";
const UPDATED_MESSAGE: &str = "Usuário atualizado com sucesso!";
const DELETED_MESSAGE: &str = "Usuário excluído com sucesso!";
const CREATE_FAILED_MESSAGE: &str = "Erro ao criar usuário";
const UPDATE_FAILED_MESSAGE: &str = "Erro ao atualizar usuário";
const DELETE_FAILED_MESSAGE: &str = "Erro ao excluir usuário";

/// Which record, if any, the form is currently targeting.
///
/// Holds a copy of the record taken when editing was requested; it is not
/// refreshed by later resyncs or cleared by deleting that record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditingSelection {
    #[default]
    Creating,
    Editing(User),
}

impl EditingSelection {
    pub fn editing(&self) -> Option<&User> {
        match self {
            Self::Creating => None,
            Self::Editing(user) => Some(user),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The stored record, unless the server answered with an empty success.
    Created(Option<User>),
    Updated(Option<User>),
    /// Input failed validation; nothing was sent and no notification posted.
    Rejected(ValidationError),
    /// The remote call failed; an error notification has been posted.
    Failed(TransportError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Failed(TransportError),
}

/// Everything a renderer needs to draw the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub users: QueryView,
    pub is_submitting: bool,
    pub has_error: bool,
    pub editing: EditingSelection,
    pub notification: Notification,
}

pub struct InteractionCoordinator {
    store: Arc<UserStore>,
    editing: Mutex<EditingSelection>,
    notifications: NotificationSlot,
    events: broadcast::Sender<ScreenEvent>,
}

impl InteractionCoordinator {
    pub fn new(store: Arc<UserStore>, settings: &ClientSettings) -> Arc<Self> {
        let events = store.event_sender();
        Arc::new(Self {
            notifications: NotificationSlot::new(settings.notification_auto_hide, events.clone()),
            store,
            editing: Mutex::new(EditingSelection::Creating),
            events,
        })
    }

    pub fn store(&self) -> &Arc<UserStore> {
        &self.store
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ScreenEvent> {
        self.events.subscribe()
    }

    pub async fn request_edit(&self, user: User) {
        self.set_editing(EditingSelection::Editing(user)).await;
    }

    pub async fn cancel_edit(&self) {
        self.set_editing(EditingSelection::Creating).await;
    }

    pub async fn editing(&self) -> EditingSelection {
        self.editing.lock().await.clone()
    }

    /// Validates, then creates or updates depending on the draft variant.
    ///
    /// A successful update returns the form to creating; a failure of either
    /// kind leaves the editing selection untouched so the user can retry.
    pub async fn save(&self, draft: UserDraft) -> SaveOutcome {
        if let Err(err) = validate(draft.name(), draft.email()) {
            debug!(update = draft.is_update(), "users: save rejected: {err}");
            return SaveOutcome::Rejected(err);
        }

        match draft.normalized() {
            UserDraft::New(user) => match self.store.create(user).await {
                Ok(created) => {
                    info!(user_id = created.as_ref().map(|user| user.id.0), "users: created");
                    self.notifications
                        .show(Notification::success(CREATED_MESSAGE))
                        .await;
                    SaveOutcome::Created(created)
                }
                Err(err) => {
                    self.notify_failure(&err, CREATE_FAILED_MESSAGE).await;
                    SaveOutcome::Failed(err)
                }
            },
            UserDraft::Existing(user) => match self.store.update(user).await {
                Ok(updated) => {
                    info!(user_id = updated.as_ref().map(|user| user.id.0), "users: updated");
                    self.set_editing(EditingSelection::Creating).await;
                    self.notifications
                        .show(Notification::success(UPDATED_MESSAGE))
                        .await;
                    SaveOutcome::Updated(updated)
                }
                Err(err) => {
                    self.notify_failure(&err, UPDATE_FAILED_MESSAGE).await;
                    SaveOutcome::Failed(err)
                }
            },
        }
    }

    /// Deletes without consulting or clearing the editing selection.
    pub async fn delete(&self, id: UserId) -> DeleteOutcome {
        match self.store.delete(id).await {
            Ok(()) => {
                info!(user_id = id.0, "users: deleted");
                self.notifications
                    .show(Notification::success(DELETED_MESSAGE))
                    .await;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                self.notify_failure(&err, DELETE_FAILED_MESSAGE).await;
                DeleteOutcome::Failed(err)
            }
        }
    }

    /// Create or update outstanding. Deletes do not gate the form.
    pub async fn is_submitting(&self) -> bool {
        self.store.is_pending(MutationKind::Create).await
            || self.store.is_pending(MutationKind::Update).await
    }

    pub async fn has_error(&self) -> bool {
        self.store.has_error().await
    }

    pub async fn notification(&self) -> Notification {
        self.notifications.current().await
    }

    pub async fn dismiss_notification(&self) {
        self.notifications.dismiss().await;
    }

    pub async fn view(&self) -> ScreenView {
        ScreenView {
            users: self.store.view().await,
            is_submitting: self.is_submitting().await,
            has_error: self.has_error().await,
            editing: self.editing().await,
            notification: self.notification().await,
        }
    }

    async fn set_editing(&self, next: EditingSelection) {
        {
            let mut editing = self.editing.lock().await;
            if *editing == next {
                return;
            }
            *editing = next.clone();
        }
        let _ = self.events.send(ScreenEvent::EditingChanged(next));
    }

    async fn notify_failure(&self, err: &TransportError, fallback: &str) {
        let message = match err.message() {
            "" => fallback.to_string(),
            message => message.to_string(),
        };
        self.notifications.show(Notification::error(message)).await;
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
