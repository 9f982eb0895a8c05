//! Cached snapshot of the remote user collection plus the three mutation
//! slots that resync it.

use std::{future::Future, sync::Arc, time::Instant};

use shared::domain::{NewUser, User, UserId};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::{error::TransportError, remote::UserCollection, ScreenEvent};

/// Read-path state as exposed to renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryView {
    pub data: Vec<User>,
    /// True only while no snapshot has ever been loaded.
    pub is_loading: bool,
    pub is_fetching: bool,
    pub is_error: bool,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationState {
    in_flight: usize,
    error: Option<TransportError>,
}

impl MutationState {
    pub fn is_pending(&self) -> bool {
        self.in_flight > 0
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&TransportError> {
        self.error.as_ref()
    }
}

#[derive(Default)]
struct QueryState {
    data: Vec<User>,
    synced_at: Option<Instant>,
    stale: bool,
    fetching: usize,
    error: Option<TransportError>,
}

impl QueryState {
    fn view(&self) -> QueryView {
        QueryView {
            data: self.data.clone(),
            is_loading: self.synced_at.is_none() && (self.fetching > 0 || self.error.is_none()),
            is_fetching: self.fetching > 0,
            is_error: self.error.is_some(),
            error_message: self.error.as_ref().map(|err| err.message().to_string()),
        }
    }

    fn needs_fetch(&self) -> bool {
        self.fetching == 0 && (self.synced_at.is_none() || self.stale)
    }
}

#[derive(Default)]
struct Mutations {
    create: MutationState,
    update: MutationState,
    delete: MutationState,
}

impl Mutations {
    fn slot(&self, kind: MutationKind) -> &MutationState {
        match kind {
            MutationKind::Create => &self.create,
            MutationKind::Update => &self.update,
            MutationKind::Delete => &self.delete,
        }
    }

    fn slot_mut(&mut self, kind: MutationKind) -> &mut MutationState {
        match kind {
            MutationKind::Create => &mut self.create,
            MutationKind::Update => &mut self.update,
            MutationKind::Delete => &mut self.delete,
        }
    }
}

/// Sole owner and writer of the cached user snapshot.
///
/// The snapshot is only ever replaced wholesale by a successful `list()`;
/// mutations never patch it locally, they resync after succeeding.
pub struct UserStore {
    remote: Arc<dyn UserCollection>,
    query: RwLock<QueryState>,
    mutations: RwLock<Mutations>,
    events: broadcast::Sender<ScreenEvent>,
}

impl UserStore {
    pub fn new(remote: Arc<dyn UserCollection>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            remote,
            query: RwLock::new(QueryState::default()),
            mutations: RwLock::new(Mutations::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ScreenEvent> {
        self.events.subscribe()
    }

    pub(crate) fn event_sender(&self) -> broadcast::Sender<ScreenEvent> {
        self.events.clone()
    }

    /// Current read state without touching the network.
    pub async fn view(&self) -> QueryView {
        self.query.read().await.view()
    }

    /// Fetches on first access or after invalidation, then returns the read
    /// state. When a fetch is already outstanding the last-known snapshot is
    /// returned as is.
    pub async fn read(&self) -> QueryView {
        let needs_fetch = self.query.read().await.needs_fetch();
        if needs_fetch {
            if let Err(err) = self.resync().await {
                debug!("users: read could not refresh the snapshot: {err}");
            }
        }
        self.view().await
    }

    /// Unconditionally re-fetches the collection. Concurrent resyncs are not
    /// serialized: whichever completes last defines the snapshot.
    pub async fn resync(&self) -> Result<(), TransportError> {
        self.query.write().await.fetching += 1;
        self.publish(ScreenEvent::SnapshotChanged);

        let result = self.remote.list().await;

        let outcome = {
            let mut query = self.query.write().await;
            query.fetching -= 1;
            match result {
                Ok(users) => {
                    debug!(count = users.len(), "users: snapshot replaced");
                    query.data = users;
                    query.synced_at = Some(Instant::now());
                    query.stale = false;
                    query.error = None;
                    Ok(())
                }
                Err(err) => {
                    warn!("users: resync failed, keeping previous snapshot: {err}");
                    query.error = Some(err.clone());
                    Err(err)
                }
            }
        };
        self.publish(ScreenEvent::SnapshotChanged);
        outcome
    }

    /// Marks the snapshot stale and resyncs it.
    pub async fn invalidate(&self) {
        self.query.write().await.stale = true;
        if let Err(err) = self.resync().await {
            debug!("users: resync after invalidation failed: {err}");
        }
    }

    /// `None` when the server acknowledged without echoing the record.
    pub async fn create(&self, user: NewUser) -> Result<Option<User>, TransportError> {
        let remote = Arc::clone(&self.remote);
        self.run_mutation(MutationKind::Create, async move { remote.create(&user).await })
            .await
    }

    pub async fn update(&self, user: User) -> Result<Option<User>, TransportError> {
        let remote = Arc::clone(&self.remote);
        self.run_mutation(MutationKind::Update, async move { remote.update(&user).await })
            .await
    }

    pub async fn delete(&self, id: UserId) -> Result<(), TransportError> {
        let remote = Arc::clone(&self.remote);
        self.run_mutation(MutationKind::Delete, async move { remote.delete(id).await })
            .await
    }

    pub async fn mutation(&self, kind: MutationKind) -> MutationState {
        self.mutations.read().await.slot(kind).clone()
    }

    pub async fn is_pending(&self, kind: MutationKind) -> bool {
        self.mutations.read().await.slot(kind).is_pending()
    }

    /// True when the read path or any mutation slot holds an error.
    pub async fn has_error(&self) -> bool {
        let read_failed = self.query.read().await.error.is_some();
        let mutations = self.mutations.read().await;
        read_failed
            || mutations.create.is_error()
            || mutations.update.is_error()
            || mutations.delete.is_error()
    }

    /// The slot stays pending until the follow-up resync has settled.
    async fn run_mutation<T, F>(&self, kind: MutationKind, op: F) -> Result<T, TransportError>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        {
            let mut mutations = self.mutations.write().await;
            let slot = mutations.slot_mut(kind);
            slot.in_flight += 1;
            slot.error = None;
        }
        self.publish(ScreenEvent::MutationChanged(kind));

        let result = op.await;
        match &result {
            Ok(_) => {
                info!(mutation = kind.as_str(), "users: mutation succeeded");
                self.invalidate().await;
            }
            Err(err) => warn!(mutation = kind.as_str(), "users: mutation failed: {err}"),
        }

        {
            let mut mutations = self.mutations.write().await;
            let slot = mutations.slot_mut(kind);
            slot.in_flight = slot.in_flight.saturating_sub(1);
            slot.error = result.as_ref().err().cloned();
        }
        self.publish(ScreenEvent::MutationChanged(kind));

        result
    }

    fn publish(&self, event: ScreenEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
