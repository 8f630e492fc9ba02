//! Self-driving scheduler handle.
//!
//! A plain [`Scheduler`] is host-driven: something must call `update` every
//! frame. `SharedScheduler` wraps one in a cheaply-cloneable handle and,
//! when auto-play is enabled, spawns a stepping thread the first time a
//! tween is started while the registry is idle. The thread updates at the
//! configured frame interval and exits as soon as the registry empties, so
//! an idle scheduler costs no wake-ups; starting new work later spawns a
//! fresh loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

use crate::config::SchedulerConfig;
use crate::events::{Commands, ListenerId, TweenEvent};
use crate::scheduler::Scheduler;
use crate::target::Target;
use crate::tween::{Tween, TweenId};

/// A shared, optionally self-driving scheduler handle.
#[derive(Debug, Clone)]
pub struct SharedScheduler {
    inner: Arc<Mutex<Scheduler>>,
    config: SchedulerConfig,
    driving: Arc<AtomicBool>,
}

impl Default for SharedScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl SharedScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        let mut scheduler = Scheduler::new();
        scheduler.set_auto_play(config.auto_play);
        Self {
            inner: Arc::new(Mutex::new(scheduler)),
            config,
            driving: Arc::new(AtomicBool::new(false)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Scheduler> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a closure against the owned scheduler.
    pub fn with<R>(&self, f: impl FnOnce(&mut Scheduler) -> R) -> R {
        f(&mut self.lock())
    }

    /// Register a tween; it stays idle until started.
    pub fn add(&self, tween: Tween) -> TweenId {
        self.lock().add(tween)
    }

    /// Start a tween; spawns the driver loop when auto-play is on and no
    /// loop is currently running.
    pub fn start(&self, id: TweenId) {
        {
            let mut scheduler = self.lock();
            let now = scheduler.now();
            scheduler.start(id, Some(now));
        }
        if self.config.auto_play {
            self.spawn_driver();
        }
    }

    pub fn stop(&self, id: TweenId) {
        self.lock().stop(id);
    }

    pub fn pause(&self, id: TweenId) {
        self.lock().pause(id);
    }

    pub fn play(&self, id: TweenId) {
        self.lock().play(id);
    }

    pub fn remove_all(&self) {
        self.lock().remove_all();
    }

    pub fn on(
        &self,
        id: TweenId,
        event: TweenEvent,
        callback: impl FnMut(TweenEvent, &Target, &mut Commands) + Send + 'static,
    ) -> Option<ListenerId> {
        self.lock().on(id, event, callback)
    }

    /// Whether the stepping thread is currently alive.
    pub fn is_driving(&self) -> bool {
        self.driving.load(Ordering::SeqCst)
    }

    /// Step the scheduler on the current thread until the registry empties.
    ///
    /// The manual-driving alternative to auto-play, useful for hosts that
    /// already own a loop and for deterministic shutdown in tests.
    pub fn run_until_idle(&self) {
        let interval = Duration::from_secs_f64(self.config.frame_interval_ms / 1000.0);
        loop {
            let more = {
                let mut scheduler = self.lock();
                let now = scheduler.now();
                scheduler.update(Some(now), false)
            };
            if !more {
                return;
            }
            std::thread::sleep(interval);
        }
    }

    fn spawn_driver(&self) {
        if self.driving.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!("starting tween driver loop");
        let handle = self.clone();
        std::thread::spawn(move || {
            loop {
                handle.run_until_idle();
                handle.driving.store(false, Ordering::SeqCst);
                // A start may have landed between observing idle and
                // parking; pick it up instead of leaving it undriven.
                if handle.with(|s| s.has_active())
                    && !handle.driving.swap(true, Ordering::SeqCst)
                {
                    continue;
                }
                break;
            }
            debug!("tween driver loop idle");
        });
    }
}
