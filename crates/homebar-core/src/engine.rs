// ── Menu engine ──
//
// Owns the menu for its whole lifetime. A single owner task holds the
// `MenuState`; every input (provider callbacks, menu opening, user
// activations) is marshalled onto that task through one bounded channel
// and processed in arrival order. Renderers read immutable views
// published through a `watch` channel.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::MenuConfig;
use crate::error::CoreError;
use crate::menu::{NodeId, Outcome};
use crate::model::{CharacteristicId, CharacteristicUpdate};
use crate::provider::{HomeProvider, MessageBus};
use crate::state::{MenuState, MenuView};
use crate::stream::ViewStream;

const EVENT_CHANNEL_SIZE: usize = 256;

// ── Events ───────────────────────────────────────────────────────

#[derive(Debug)]
enum Event {
    Rebuild,
    SetConfig(MenuConfig),
    Apply(CharacteristicUpdate),
    SetReachable {
        id: CharacteristicId,
        reachable: bool,
    },
    MenuWillOpen,
    Activate {
        generation: u64,
        node: NodeId,
    },
    PreferencesClosed,
    /// Barrier: answered once every earlier event has been processed.
    Flush(oneshot::Sender<()>),
}

// ── EventSender ──────────────────────────────────────────────────

/// Cloneable, non-blocking handle for feeding events to the engine from
/// any context. Sends fail fast when the queue is full or the engine has
/// stopped.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<Event>,
}

impl EventSender {
    fn push(&self, event: Event) -> Result<(), CoreError> {
        self.tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => CoreError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => CoreError::EngineStopped,
        })
    }

    /// Re-read the home snapshot and replace the menu.
    pub fn rebuild(&self) -> Result<(), CoreError> {
        self.push(Event::Rebuild)
    }

    /// Swap the build config and rebuild.
    pub fn set_config(&self, config: MenuConfig) -> Result<(), CoreError> {
        self.push(Event::SetConfig(config))
    }

    /// A characteristic changed value.
    pub fn apply(&self, update: CharacteristicUpdate) -> Result<(), CoreError> {
        self.push(Event::Apply(update))
    }

    pub fn set_reachable(&self, id: CharacteristicId, reachable: bool) -> Result<(), CoreError> {
        self.push(Event::SetReachable { id, reachable })
    }

    /// The menu is about to be shown.
    pub fn menu_will_open(&self) -> Result<(), CoreError> {
        self.push(Event::MenuWillOpen)
    }

    /// The user picked `node` from the view with `generation`.
    pub fn activate(&self, generation: u64, node: NodeId) -> Result<(), CoreError> {
        self.push(Event::Activate { generation, node })
    }

    pub fn preferences_closed(&self) -> Result<(), CoreError> {
        self.push(Event::PreferencesClosed)
    }
}

// ── Engine ───────────────────────────────────────────────────────

/// The menu synchronization engine.
///
/// Cheaply cloneable via `Arc<EngineInner>`. Create with
/// [`new()`](Self::new), then [`start()`](Self::start) to build the first
/// generation and spawn the owner task.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    config: MenuConfig,
    provider: Arc<dyn HomeProvider>,
    bus: Arc<dyn MessageBus>,
    events: EventSender,
    events_rx: Mutex<Option<mpsc::Receiver<Event>>>,
    view: watch::Sender<Arc<MenuView>>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Engine {
    /// Create an engine. Does NOT build or spawn anything.
    pub fn new(
        config: MenuConfig,
        provider: Arc<dyn HomeProvider>,
        bus: Arc<dyn MessageBus>,
    ) -> Self {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_SIZE);
        let (view, _) = watch::channel(Arc::new(MenuView::empty()));

        Self {
            inner: Arc::new(EngineInner {
                config,
                provider,
                bus,
                events: EventSender { tx },
                events_rx: Mutex::new(Some(rx)),
                view,
                cancel: CancellationToken::new(),
                task: Mutex::new(None),
            }),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Build the first generation, publish it, and spawn the owner task.
    ///
    /// A failing snapshot is logged and leaves the empty view in place; a
    /// later `rebuild` can recover.
    pub async fn start(&self) -> Result<(), CoreError> {
        let Some(rx) = self.inner.events_rx.lock().await.take() else {
            return Err(CoreError::Internal("menu engine already started".into()));
        };

        let mut state = MenuState::new(self.inner.config);
        rebuild(&mut state, &*self.inner.provider, &*self.inner.bus);
        publish(&self.inner.view, &state);

        let handle = tokio::spawn(owner_task(
            state,
            rx,
            Arc::clone(&self.inner.provider),
            Arc::clone(&self.inner.bus),
            self.inner.view.clone(),
            self.inner.cancel.clone(),
        ));
        *self.inner.task.lock().await = Some(handle);

        info!("menu engine started");
        Ok(())
    }

    /// Stop the owner task and wait for it. Further sends fail with
    /// [`CoreError::EngineStopped`].
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        if let Some(handle) = self.inner.task.lock().await.take() {
            let _ = handle.await;
        }
        debug!("menu engine shut down");
    }

    // ── Events ───────────────────────────────────────────────────

    pub fn sender(&self) -> EventSender {
        self.inner.events.clone()
    }

    /// Wait until every event sent before this call has been processed.
    pub async fn flush(&self) -> Result<(), CoreError> {
        if self.inner.task.lock().await.is_none() {
            return Err(CoreError::EngineStopped);
        }
        let (tx, rx) = oneshot::channel();
        self.inner
            .events
            .tx
            .send(Event::Flush(tx))
            .await
            .map_err(|_| CoreError::EngineStopped)?;
        rx.await.map_err(|_| CoreError::EngineStopped)
    }

    // ── State observation ────────────────────────────────────────

    /// Latest published view.
    pub fn view(&self) -> Arc<MenuView> {
        self.inner.view.borrow().clone()
    }

    pub fn subscribe(&self) -> ViewStream {
        ViewStream::new(self.inner.view.subscribe())
    }
}

// ── Owner task ───────────────────────────────────────────────────

async fn owner_task(
    mut state: MenuState,
    mut rx: mpsc::Receiver<Event>,
    provider: Arc<dyn HomeProvider>,
    bus: Arc<dyn MessageBus>,
    view: watch::Sender<Arc<MenuView>>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            event = rx.recv() => {
                let Some(event) = event else { break };
                if handle_event(&mut state, event, &*provider, &*bus) {
                    publish(&view, &state);
                }
            }
        }
    }
    info!(generation = state.generation(), "menu engine stopped");
}

/// Process one event. Returns whether the menu changed.
fn handle_event(
    state: &mut MenuState,
    event: Event,
    provider: &dyn HomeProvider,
    bus: &dyn MessageBus,
) -> bool {
    match event {
        Event::Rebuild => rebuild(state, provider, bus),
        Event::SetConfig(config) => {
            state.set_config(config);
            rebuild(state, provider, bus)
        }
        Event::Apply(update) => state.apply(&update) > 0,
        Event::SetReachable { id, reachable } => state.set_reachable(id, reachable) > 0,
        Event::MenuWillOpen => {
            if let Some(request) = state.pending_reload() {
                debug!(?request, "reloading unreachable characteristics");
                if let Err(e) = provider.submit(request) {
                    warn!(error = %e, "reload request failed (non-fatal)");
                }
            }
            false
        }
        Event::Activate { generation, node } => {
            match state.activate(generation, node, provider, bus) {
                Ok(Some(Outcome::Requested(n))) => {
                    debug!(%node, requests = n, "activation relayed");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, %node, "activation failed (non-fatal)"),
            }
            false
        }
        Event::PreferencesClosed => {
            state.preferences_closed();
            false
        }
        Event::Flush(done) => {
            let _ = done.send(());
            false
        }
    }
}

fn rebuild(state: &mut MenuState, provider: &dyn HomeProvider, bus: &dyn MessageBus) -> bool {
    match provider.snapshot() {
        Ok(snapshot) => {
            if state.rebuild(&snapshot) {
                info!("home is empty, signaling first run");
                bus.first_run();
            }
            true
        }
        Err(e) => {
            warn!(error = %e, "home snapshot failed, keeping current menu");
            false
        }
    }
}

fn publish(view: &watch::Sender<Arc<MenuView>>, state: &MenuState) {
    view.send_replace(Arc::new(state.view()));
}
