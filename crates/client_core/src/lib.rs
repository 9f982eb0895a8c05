//! Client-side synchronization and interaction state for the users screen.
//!
//! [`remote::UserCollection`] talks to the remote collection,
//! [`store::UserStore`] owns the cached snapshot and the mutation slots, and
//! [`coordinator::InteractionCoordinator`] turns user intents into store calls
//! plus editing-selection and notification updates. Renderers read
//! [`coordinator::ScreenView`] and listen on [`ScreenEvent`].

pub mod config;
pub mod coordinator;
pub mod error;
pub mod listing;
pub mod notification;
pub mod remote;
pub mod store;
pub mod validation;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

pub use config::{load_settings, ClientSettings};
pub use coordinator::{
    DeleteOutcome, EditingSelection, InteractionCoordinator, SaveOutcome, ScreenView,
};
pub use error::{ConfigError, TransportError, ValidationError};
pub use notification::{Notification, Severity};
pub use remote::{HttpUserCollection, UserCollection};
pub use store::{MutationKind, MutationState, QueryView, UserStore};
pub use validation::validate;

/// Change notifications for renderers observing the screen state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    /// The read state changed: a fetch started, or a snapshot/error landed.
    SnapshotChanged,
    MutationChanged(MutationKind),
    EditingChanged(EditingSelection),
    NotificationChanged(Notification),
}
