//! Fixtures shared by the store, coordinator and HTTP client tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use shared::{
    domain::{NewUser, User, UserId, UserStatus},
    error::ApiError,
};
use tokio::{
    net::TcpListener,
    sync::{Mutex, Notify},
};

use crate::{error::TransportError, remote::UserCollection};

pub(crate) fn user(id: i64, name: &str, email: &str, status: UserStatus) -> User {
    User {
        id: UserId(id),
        name: name.to_string(),
        email: email.to_string(),
        status,
    }
}

pub(crate) fn joao() -> User {
    user(1, "João", "joao@x.com", UserStatus::Active)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    List,
    Create(NewUser),
    Update(User),
    Delete(UserId),
}

/// In-memory [`UserCollection`] that records calls, can fail the next call of
/// a given kind, and can hold a call until its gate is opened.
#[derive(Default)]
pub(crate) struct ScriptedCollection {
    users: Mutex<Vec<User>>,
    next_id: Mutex<i64>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<Op, Vec<TransportError>>>,
    gates: Mutex<HashMap<Op, Arc<Notify>>>,
    next_gates: Mutex<HashMap<Op, VecDeque<Arc<Notify>>>>,
}

impl ScriptedCollection {
    pub(crate) fn with_users(users: Vec<User>) -> Arc<Self> {
        let next_id = users.iter().map(|user| user.id.0).max().unwrap_or(0);
        Arc::new(Self {
            users: Mutex::new(users),
            next_id: Mutex::new(next_id),
            ..Self::default()
        })
    }

    pub(crate) async fn fail_next(&self, op: Op, err: TransportError) {
        self.failures.lock().await.entry(op).or_default().push(err);
    }

    /// Holds every subsequent `op` call until the returned gate is notified.
    pub(crate) async fn gate(&self, op: Op) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().await.insert(op, Arc::clone(&gate));
        gate
    }

    /// Holds only the next `op` call; queued ahead of any [`Self::gate`].
    pub(crate) async fn gate_next(&self, op: Op) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.next_gates
            .lock()
            .await
            .entry(op)
            .or_default()
            .push_back(Arc::clone(&gate));
        gate
    }

    pub(crate) async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub(crate) async fn users(&self) -> Vec<User> {
        self.users.lock().await.clone()
    }

    async fn enter(&self, op: Op, call: Call) -> Result<(), TransportError> {
        self.calls.lock().await.push(call);
        let one_shot = self
            .next_gates
            .lock()
            .await
            .get_mut(&op)
            .and_then(VecDeque::pop_front);
        let gate = match one_shot {
            Some(gate) => Some(gate),
            None => self.gates.lock().await.get(&op).cloned(),
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let failure = self
            .failures
            .lock()
            .await
            .get_mut(&op)
            .and_then(|queue| (!queue.is_empty()).then(|| queue.remove(0)));
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserCollection for ScriptedCollection {
    /// Answers with the collection as it was when the call arrived.
    async fn list(&self) -> Result<Vec<User>, TransportError> {
        let users = self.users.lock().await.clone();
        self.enter(Op::List, Call::List).await?;
        Ok(users)
    }

    async fn create(&self, user: &NewUser) -> Result<Option<User>, TransportError> {
        self.enter(Op::Create, Call::Create(user.clone())).await?;
        let mut next_id = self.next_id.lock().await;
        *next_id += 1;
        let created = user.clone().with_id(UserId(*next_id));
        self.users.lock().await.push(created.clone());
        Ok(Some(created))
    }

    async fn update(&self, user: &User) -> Result<Option<User>, TransportError> {
        self.enter(Op::Update, Call::Update(user.clone())).await?;
        let mut users = self.users.lock().await;
        match users.iter_mut().find(|existing| existing.id == user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(Some(user.clone()))
            }
            None => Err(TransportError::from_status(404, Some("Not Found"), None)),
        }
    }

    async fn delete(&self, id: UserId) -> Result<(), TransportError> {
        self.enter(Op::Delete, Call::Delete(id)).await?;
        self.users.lock().await.retain(|user| user.id != id);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct UsersServerState {
    pub(crate) users: Arc<Mutex<Vec<User>>>,
    pub(crate) next_id: Arc<Mutex<i64>>,
}

pub(crate) async fn list_users(State(state): State<UsersServerState>) -> Json<Vec<User>> {
    Json(state.users.lock().await.clone())
}

async fn create_user(
    State(state): State<UsersServerState>,
    Json(new_user): Json<NewUser>,
) -> Response {
    let mut users = state.users.lock().await;
    if users.iter().any(|user| user.email == new_user.email) {
        return (StatusCode::CONFLICT, Json(ApiError::new("E-mail duplicado"))).into_response();
    }
    let mut next_id = state.next_id.lock().await;
    *next_id += 1;
    let created = new_user.with_id(UserId(*next_id));
    users.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update_user(
    State(state): State<UsersServerState>,
    Path(id): Path<i64>,
    Json(user): Json<User>,
) -> Response {
    let mut users = state.users.lock().await;
    match users.iter_mut().find(|existing| existing.id.0 == id) {
        Some(existing) => {
            *existing = user.clone();
            Json(user).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_user(State(state): State<UsersServerState>, Path(id): Path<i64>) -> StatusCode {
    let mut users = state.users.lock().await;
    let before = users.len();
    users.retain(|user| user.id.0 != id);
    if users.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

/// Serves `/users` backed by an in-memory vector.
pub(crate) async fn spawn_users_server(seed: Vec<User>) -> (String, UsersServerState) {
    let next_id = seed.iter().map(|user| user.id.0).max().unwrap_or(0);
    let state = UsersServerState {
        users: Arc::new(Mutex::new(seed)),
        next_id: Arc::new(Mutex::new(next_id)),
    };
    let app = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", put(update_user).delete(delete_user))
        .with_state(state.clone());
    (spawn_router(app).await, state)
}

pub(crate) async fn spawn_router(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}
