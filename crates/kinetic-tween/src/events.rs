//! Tween lifecycle events, listener registry and deferred commands.
//!
//! Listeners run synchronously while the scheduler is iterating its
//! registry, so they cannot mutate it directly. Instead each callback
//! receives a [`Commands`] queue; control requests pushed there are applied
//! after the current tick's iteration completes. Events are observed this
//! tick, their effects become visible next tick.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::target::Target;
use crate::tween::TweenId;

/// Lifecycle event names a tween can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweenEvent {
    /// First due tick after scheduling.
    Start,
    /// Every tick that recomputed the target.
    Update,
    /// A repeat cycle rewound in the forward direction.
    Repeat,
    /// A yoyo cycle flipped into the reverse direction, or an explicit
    /// direction flip.
    Reverse,
    /// The tween finished and left the registry.
    Complete,
    /// The tween was stopped before completing.
    Stop,
    Pause,
    Play,
    Seek,
    Restart,
}

/// Identifier handed out by `on`/`once` so a listener can be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u64);

impl ListenerId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// A registered callback.
type Callback = Box<dyn FnMut(TweenEvent, &Target, &mut Commands) + Send>;

struct Listener {
    id: ListenerId,
    once: bool,
    callback: Callback,
}

/// Per-tween listener multimap.
#[derive(Default)]
pub struct Listeners {
    map: HashMap<TweenEvent, Vec<Listener>>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: usize = self.map.values().map(Vec::len).sum();
        f.debug_struct("Listeners").field("count", &total).finish()
    }
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for an event; returns its removal id.
    pub fn on(
        &mut self,
        event: TweenEvent,
        callback: impl FnMut(TweenEvent, &Target, &mut Commands) + Send + 'static,
    ) -> ListenerId {
        self.insert(event, false, Box::new(callback))
    }

    /// Register a listener that is dropped after its first invocation.
    pub fn once(
        &mut self,
        event: TweenEvent,
        callback: impl FnMut(TweenEvent, &Target, &mut Commands) + Send + 'static,
    ) -> ListenerId {
        self.insert(event, true, Box::new(callback))
    }

    /// Remove a listener. Unknown ids and unregistered events are no-ops.
    pub fn off(&mut self, event: TweenEvent, id: ListenerId) {
        if let Some(list) = self.map.get_mut(&event) {
            list.retain(|l| l.id != id);
        }
    }

    fn insert(&mut self, event: TweenEvent, once: bool, callback: Callback) -> ListenerId {
        let id = ListenerId::next();
        self.map
            .entry(event)
            .or_default()
            .push(Listener { id, once, callback });
        id
    }

    /// Invoke all listeners for an event; `once` listeners are retired.
    pub(crate) fn fire(&mut self, event: TweenEvent, target: &Target, commands: &mut Commands) {
        let Some(list) = self.map.get_mut(&event) else {
            return;
        };
        for listener in list.iter_mut() {
            (listener.callback)(event, target, commands);
        }
        list.retain(|l| !l.once);
    }

    /// Number of listeners registered for an event.
    pub fn count(&self, event: TweenEvent) -> usize {
        self.map.get(&event).map_or(0, Vec::len)
    }
}

/// A deferred control request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Start { id: TweenId, time: Option<f64> },
    Stop { id: TweenId },
    Pause { id: TweenId },
    Play { id: TweenId },
    Seek { id: TweenId, ms: f64, keep_playing: bool },
    Remove { id: TweenId },
    Restart { id: TweenId, no_delay: bool },
}

/// Queue of control requests applied after the current tick's iteration.
#[derive(Debug, Default)]
pub struct Commands {
    queue: Vec<Command>,
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, id: TweenId) {
        self.queue.push(Command::Start { id, time: None });
    }

    /// Start at an explicit scheduler time (used for chain handoff).
    pub fn start_at(&mut self, id: TweenId, time: f64) {
        self.queue.push(Command::Start { id, time: Some(time) });
    }

    pub fn stop(&mut self, id: TweenId) {
        self.queue.push(Command::Stop { id });
    }

    pub fn pause(&mut self, id: TweenId) {
        self.queue.push(Command::Pause { id });
    }

    pub fn play(&mut self, id: TweenId) {
        self.queue.push(Command::Play { id });
    }

    pub fn seek(&mut self, id: TweenId, ms: f64, keep_playing: bool) {
        self.queue.push(Command::Seek { id, ms, keep_playing });
    }

    pub fn remove(&mut self, id: TweenId) {
        self.queue.push(Command::Remove { id });
    }

    pub fn restart(&mut self, id: TweenId, no_delay: bool) {
        self.queue.push(Command::Restart { id, no_delay });
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.queue)
    }
}

static_assertions::assert_impl_all!(Listeners: Send);
