use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};

use crate::ScreenEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Success,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Transient user-facing message. Hiding keeps the last message and severity
/// so a renderer can animate it out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Notification {
    pub visible: bool,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            visible: true,
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            visible: true,
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

#[derive(Default)]
struct SlotState {
    current: Notification,
    generation: u64,
    hide_timer: Option<JoinHandle<()>>,
}

/// Single-slot notification holder: every `show` overwrites the previous
/// value, no history is kept.
pub(crate) struct NotificationSlot {
    state: Arc<Mutex<SlotState>>,
    auto_hide: Option<Duration>,
    events: broadcast::Sender<ScreenEvent>,
}

impl NotificationSlot {
    pub(crate) fn new(auto_hide: Option<Duration>, events: broadcast::Sender<ScreenEvent>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SlotState::default())),
            auto_hide,
            events,
        }
    }

    pub(crate) async fn current(&self) -> Notification {
        self.state.lock().await.current.clone()
    }

    pub(crate) async fn show(&self, notification: Notification) {
        {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.current = notification.clone();
            if let Some(timer) = state.hide_timer.take() {
                timer.abort();
            }

            if let Some(delay) = self.auto_hide {
                let generation = state.generation;
                let slot = Arc::clone(&self.state);
                let events = self.events.clone();
                state.hide_timer = Some(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    hide(&slot, &events, Some(generation)).await;
                }));
            }
        }
        let _ = self
            .events
            .send(ScreenEvent::NotificationChanged(notification));
    }

    pub(crate) async fn dismiss(&self) {
        hide(&self.state, &self.events, None).await;
    }
}

/// Hides the current notification. With `Some(generation)`, only if no newer
/// notification has been shown since.
async fn hide(
    state: &Mutex<SlotState>,
    events: &broadcast::Sender<ScreenEvent>,
    generation: Option<u64>,
) {
    let hidden = {
        let mut guard = state.lock().await;
        if generation.is_some_and(|generation| generation != guard.generation)
            || !guard.current.visible
        {
            return;
        }
        guard.current.visible = false;
        if generation.is_none() {
            if let Some(timer) = guard.hide_timer.take() {
                timer.abort();
            }
        } else {
            guard.hide_timer = None;
        }
        guard.current.clone()
    };
    let _ = events.send(ScreenEvent::NotificationChanged(hidden));
}
