//! Owning tween scheduler.
//!
//! A `Scheduler` is an explicit instance owned by the host (one per window,
//! one per test — there is no process-global registry). It owns every tween
//! handed to [`add`](Scheduler::add) and drives them from
//! [`update`](Scheduler::update), which the host calls once per frame with
//! the current time, or with `None` to use the scheduler's monotonic clock.
//!
//! # Reentrancy
//!
//! Each tick iterates a snapshot of the active list, and listener callbacks
//! queue control requests on a [`Commands`] buffer instead of touching the
//! registry directly. Queued requests are applied after the iteration, so
//! events are observed this tick and their effects become visible next tick.
//!
//! # Usage
//!
//! ```
//! use kinetic_tween::{Scheduler, Target, Tween};
//!
//! let target = Target::with([("x", 0.0)]);
//! let mut scheduler = Scheduler::new();
//! let id = scheduler.add(Tween::new(&target).to([("x", 100.0)], 1000.0));
//! scheduler.start(id, None);
//!
//! scheduler.update(Some(0.0), false);
//! scheduler.update(Some(500.0), false);
//! assert_eq!(target.number("x"), Some(50.0));
//! ```

use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::warn;

use crate::events::{Command, Commands, ListenerId, TweenEvent};
use crate::target::Target;
use crate::tween::{Tween, TweenId, TweenState};

/// Owns registered tweens and advances the active ones each tick.
#[derive(Debug)]
pub struct Scheduler {
    tweens: HashMap<TweenId, Tween>,
    /// Active ids in insertion order. A tween appears at most once.
    active: Vec<TweenId>,
    /// Current time cursor, set by the last `update`.
    time: f64,
    origin: Instant,
    auto_play: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            tweens: HashMap::new(),
            active: Vec::new(),
            time: 0.0,
            origin: Instant::now(),
            auto_play: false,
        }
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds elapsed since this scheduler was created.
    pub fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    /// The time cursor of the most recent update.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Whether adding a tween should kick off a self-driving loop.
    ///
    /// The flag is consulted by the shared driver handle; a plain scheduler
    /// is always host-driven.
    pub fn set_auto_play(&mut self, auto_play: bool) {
        self.auto_play = auto_play;
    }

    pub fn auto_play(&self) -> bool {
        self.auto_play
    }

    // ------------------------------------------------------------------
    // Registry
    // ------------------------------------------------------------------

    /// Take ownership of a tween. It stays idle until started.
    pub fn add(&mut self, tween: Tween) -> TweenId {
        let id = tween.id();
        self.tweens.insert(id, tween);
        id
    }

    /// Drop a tween entirely, active or not.
    pub fn remove(&mut self, id: TweenId) {
        self.deactivate(id);
        self.tweens.remove(&id);
    }

    /// Clear every tween and reset the active list.
    pub fn remove_all(&mut self) {
        self.active.clear();
        self.tweens.clear();
    }

    /// Active tween ids, in insertion order.
    pub fn get_all(&self) -> Vec<TweenId> {
        self.active.clone()
    }

    /// Whether any tween is currently registered as active.
    pub fn has_active(&self) -> bool {
        !self.active.is_empty()
    }

    // ------------------------------------------------------------------
    // Control
    // ------------------------------------------------------------------

    /// Schedule a tween to start at `time` (or the current cursor) plus its
    /// configured delay.
    pub fn start(&mut self, id: TweenId, time: Option<f64>) {
        let mut commands = Commands::new();
        self.exec_start(id, time, &mut commands);
        self.apply_commands(commands);
    }

    /// Stop a tween and, recursively, its chained successors.
    ///
    /// `complete` is never fired by a stop.
    pub fn stop(&mut self, id: TweenId) {
        let mut commands = Commands::new();
        self.exec_stop(id, &mut commands);
        self.apply_commands(commands);
    }

    /// Freeze a tween, preserving its elapsed offset. Idempotent.
    pub fn pause(&mut self, id: TweenId) {
        let mut commands = Commands::new();
        self.exec_pause(id, &mut commands);
        self.apply_commands(commands);
    }

    /// Resume a paused tween. Idempotent.
    pub fn play(&mut self, id: TweenId) {
        let mut commands = Commands::new();
        self.exec_play(id, &mut commands);
        self.apply_commands(commands);
    }

    /// Align a tween's internal clock to `ms` within [0, duration].
    ///
    /// Pauses afterwards unless `keep_playing`.
    pub fn seek(&mut self, id: TweenId, ms: f64, keep_playing: bool) {
        let mut commands = Commands::new();
        self.exec_seek(id, ms, keep_playing, &mut commands);
        self.apply_commands(commands);
    }

    /// Jump straight to the end of the current cycle.
    pub fn end(&mut self, id: TweenId) {
        let Some(tween) = self.tweens.get_mut(&id) else {
            warn!(?id, "end on unknown tween");
            return;
        };
        let final_time = tween.start_time() + tween.duration_ms();
        let mut commands = Commands::new();
        let keep = tween.tick(final_time, &mut commands);
        if !keep {
            self.deactivate(id);
        }
        self.apply_commands(commands);
    }

    /// Flip a tween's direction mid-flight.
    pub fn reverse(&mut self, id: TweenId) {
        let time = self.time;
        let mut commands = Commands::new();
        if let Some(tween) = self.tweens.get_mut(&id) {
            tween.reverse_now(time, &mut commands);
        } else {
            warn!(?id, "reverse on unknown tween");
        }
        self.apply_commands(commands);
    }

    /// Reset a tween and run it again from its configured values.
    pub fn restart(&mut self, id: TweenId, no_delay: bool) {
        let mut commands = Commands::new();
        self.exec_restart(id, no_delay, &mut commands);
        self.apply_commands(commands);
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    pub fn state(&self, id: TweenId) -> Option<TweenState> {
        self.tweens.get(&id).map(Tween::state)
    }

    pub fn is_playing(&self, id: TweenId) -> bool {
        self.tweens.get(&id).is_some_and(Tween::is_playing)
    }

    pub fn is_started(&self, id: TweenId) -> bool {
        self.tweens.get(&id).is_some_and(Tween::is_started)
    }

    /// Register a listener on an owned tween.
    pub fn on(
        &mut self,
        id: TweenId,
        event: TweenEvent,
        callback: impl FnMut(TweenEvent, &Target, &mut Commands) + Send + 'static,
    ) -> Option<ListenerId> {
        self.tweens
            .get_mut(&id)
            .map(|t| t.add_listener(event, false, callback))
    }

    /// Register a one-shot listener on an owned tween.
    pub fn once(
        &mut self,
        id: TweenId,
        event: TweenEvent,
        callback: impl FnMut(TweenEvent, &Target, &mut Commands) + Send + 'static,
    ) -> Option<ListenerId> {
        self.tweens
            .get_mut(&id)
            .map(|t| t.add_listener(event, true, callback))
    }

    /// Remove a listener. Unknown ids are a no-op.
    pub fn off(&mut self, id: TweenId, event: TweenEvent, listener: ListenerId) {
        if let Some(tween) = self.tweens.get_mut(&id) {
            tween.listeners_mut().off(event, listener);
        }
    }

    // ------------------------------------------------------------------
    // Ticking
    // ------------------------------------------------------------------

    /// Advance every active tween to `time` (or the monotonic clock).
    ///
    /// Finished tweens leave the active list unless `preserve` is set.
    /// Returns whether any tweens remain active.
    pub fn update(&mut self, time: Option<f64>, preserve: bool) -> bool {
        let t = time.unwrap_or_else(|| self.now());
        self.time = t;

        // Snapshot: listeners may add or remove tweens during the walk.
        let snapshot = self.active.clone();
        let mut commands = Commands::new();
        for id in snapshot {
            let keep = match self.tweens.get_mut(&id) {
                Some(tween) => tween.tick(t, &mut commands),
                None => false,
            };
            if !keep && !preserve {
                self.deactivate(id);
            }
        }
        self.apply_commands(commands);

        !self.active.is_empty()
    }

    fn activate(&mut self, id: TweenId) {
        if !self.active.contains(&id) {
            self.active.push(id);
        }
    }

    fn deactivate(&mut self, id: TweenId) {
        self.active.retain(|&other| other != id);
    }

    /// Drain the command queue, including commands queued while applying.
    fn apply_commands(&mut self, mut commands: Commands) {
        while !commands.is_empty() {
            for command in commands.drain() {
                match command {
                    Command::Start { id, time } => self.exec_start(id, time, &mut commands),
                    Command::Stop { id } => self.exec_stop(id, &mut commands),
                    Command::Pause { id } => self.exec_pause(id, &mut commands),
                    Command::Play { id } => self.exec_play(id, &mut commands),
                    Command::Seek { id, ms, keep_playing } => {
                        self.exec_seek(id, ms, keep_playing, &mut commands);
                    }
                    Command::Remove { id } => self.remove(id),
                    Command::Restart { id, no_delay } => {
                        self.exec_restart(id, no_delay, &mut commands);
                    }
                }
            }
        }
    }

    fn exec_start(&mut self, id: TweenId, time: Option<f64>, _commands: &mut Commands) {
        let start = time.unwrap_or(self.time);
        match self.tweens.get_mut(&id) {
            Some(tween) => {
                tween.start_at(start);
                self.activate(id);
            }
            None => warn!(?id, "start on unknown tween"),
        }
    }

    fn exec_stop(&mut self, id: TweenId, commands: &mut Commands) {
        // Recursive over the chain; a visited set bounds accidental cycles.
        let mut pending = vec![id];
        let mut visited = HashSet::new();
        while let Some(next) = pending.pop() {
            if !visited.insert(next) {
                continue;
            }
            if let Some(tween) = self.tweens.get_mut(&next) {
                let successors = tween.stop_now(commands);
                self.deactivate(next);
                pending.extend(successors);
            }
        }
    }

    fn exec_pause(&mut self, id: TweenId, commands: &mut Commands) {
        let time = self.time;
        if let Some(tween) = self.tweens.get_mut(&id) {
            // Paused tweens leave the active list so an otherwise-idle
            // scheduler reports no work; play() re-adds them.
            if tween.pause_at(time, commands) {
                self.deactivate(id);
            }
        }
    }

    fn exec_play(&mut self, id: TweenId, commands: &mut Commands) {
        let time = self.time;
        if let Some(tween) = self.tweens.get_mut(&id) {
            if tween.resume_at(time, commands) {
                self.activate(id);
            }
        }
    }

    fn exec_seek(&mut self, id: TweenId, ms: f64, keep_playing: bool, commands: &mut Commands) {
        let time = self.time;
        let Some(tween) = self.tweens.get_mut(&id) else {
            return;
        };
        tween.seek_to(time, ms, commands);
        if !keep_playing {
            self.exec_pause(id, commands);
        }
    }

    fn exec_restart(&mut self, id: TweenId, no_delay: bool, commands: &mut Commands) {
        let time = self.time;
        match self.tweens.get_mut(&id) {
            Some(tween) => {
                tween.restart_at(time, no_delay, commands);
                self.activate(id);
            }
            None => warn!(?id, "restart on unknown tween"),
        }
    }
}

static_assertions::assert_impl_all!(Scheduler: Send);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::track::TrackInterpolation;
    use crate::tween::RepeatCount;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event_counter(
        scheduler: &mut Scheduler,
        id: TweenId,
        event: TweenEvent,
    ) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let hits = count.clone();
        scheduler.on(id, event, move |_, _, _| {
            hits.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    fn linear_tween(target: &Target, to: f64, duration: f64) -> Tween {
        Tween::new(target)
            .to([("x", to)], duration)
            .easing(Easing::Linear)
    }

    #[test]
    fn test_linear_progression_and_single_complete() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(linear_tween(&target, 100.0, 1000.0));
        let completes = event_counter(&mut scheduler, id, TweenEvent::Complete);

        scheduler.start(id, None);
        scheduler.update(Some(0.0), false);
        assert_eq!(target.number("x"), Some(0.0));

        scheduler.update(Some(500.0), false);
        assert_eq!(target.number("x"), Some(50.0));

        scheduler.update(Some(1000.0), false);
        assert_eq!(target.number("x"), Some(100.0));
        assert_eq!(completes.load(Ordering::SeqCst), 1);

        // The tween left the registry; nothing remains to drive.
        assert!(!scheduler.update(Some(2000.0), false));
    }

    #[test]
    fn test_start_fires_exactly_once() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(linear_tween(&target, 10.0, 100.0));
        let starts = event_counter(&mut scheduler, id, TweenEvent::Start);

        scheduler.start(id, None);
        scheduler.update(Some(0.0), false);
        scheduler.update(Some(10.0), false);
        scheduler.update(Some(20.0), false);
        assert_eq!(starts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delay_keeps_tween_pending() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(linear_tween(&target, 10.0, 100.0).delay(500.0));

        scheduler.start(id, Some(0.0));
        assert!(scheduler.update(Some(100.0), false));
        assert_eq!(target.number("x"), Some(0.0));
        assert!(!scheduler.is_started(id));

        scheduler.update(Some(550.0), false);
        assert!(scheduler.is_started(id));
        assert_eq!(target.number("x"), Some(5.0));
    }

    #[test]
    fn test_easing_shapes_progress() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(
            Tween::new(&target)
                .to([("x", 100.0)], 1000.0)
                .easing(Easing::QuadraticIn),
        );
        scheduler.start(id, Some(0.0));
        scheduler.update(Some(500.0), false);
        assert_eq!(target.number("x"), Some(25.0));
    }

    #[test]
    fn test_yoyo_parity_and_events() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(
            linear_tween(&target, 10.0, 1000.0)
                .repeat(RepeatCount::Count { count: 2 })
                .yoyo(true),
        );
        let repeats = event_counter(&mut scheduler, id, TweenEvent::Repeat);
        let reverses = event_counter(&mut scheduler, id, TweenEvent::Reverse);
        let completes = event_counter(&mut scheduler, id, TweenEvent::Complete);

        scheduler.start(id, Some(0.0));
        scheduler.update(Some(0.0), false);

        scheduler.update(Some(1000.0), false);
        assert_eq!(target.number("x"), Some(10.0));

        scheduler.update(Some(2000.0), false);
        assert_eq!(target.number("x"), Some(0.0));

        scheduler.update(Some(3000.0), false);
        // Two repeats ping-pong back to the original direction.
        assert_eq!(target.number("x"), Some(10.0));

        assert_eq!(reverses.load(Ordering::SeqCst), 1);
        assert_eq!(repeats.load(Ordering::SeqCst), 1);
        assert_eq!(completes.load(Ordering::SeqCst), 1);
        assert!(!scheduler.has_active());
    }

    #[test]
    fn test_repeat_without_yoyo_restarts_from_origin() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler
            .add(linear_tween(&target, 10.0, 1000.0).repeat(RepeatCount::Count { count: 1 }));

        scheduler.start(id, Some(0.0));
        scheduler.update(Some(1000.0), false);
        assert_eq!(target.number("x"), Some(10.0));

        // Second cycle runs 0 -> 10 again.
        scheduler.update(Some(1500.0), false);
        assert_eq!(target.number("x"), Some(5.0));
        scheduler.update(Some(2000.0), false);
        assert_eq!(target.number("x"), Some(10.0));
        assert!(!scheduler.has_active());
    }

    #[test]
    fn test_relative_end_accumulates_across_repeats() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(
            Tween::new(&target)
                .to([("x", "+10")], 1000.0)
                .easing(Easing::Linear)
                .repeat(RepeatCount::Count { count: 1 }),
        );
        scheduler.start(id, Some(0.0));
        scheduler.update(Some(1000.0), false);
        assert_eq!(target.number("x"), Some(10.0));

        scheduler.update(Some(2000.0), false);
        assert_eq!(target.number("x"), Some(20.0));
    }

    #[test]
    fn test_infinite_repeat_stays_active() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(linear_tween(&target, 10.0, 100.0).repeat(RepeatCount::Infinite));
        scheduler.start(id, Some(0.0));
        for i in 0..50 {
            assert!(scheduler.update(Some(f64::from(i) * 100.0), false));
        }
        assert!(scheduler.is_playing(id));
    }

    #[test]
    fn test_track_end_value_through_scheduler() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(
            Tween::new(&target)
                .to([("x", vec![10.0, 20.0])], 1000.0)
                .easing(Easing::Linear)
                .interpolation(TrackInterpolation::Linear),
        );
        scheduler.start(id, Some(0.0));
        // Track is [0, 10, 20] after the start value is prepended.
        scheduler.update(Some(250.0), false);
        assert_eq!(target.number("x"), Some(5.0));
        scheduler.update(Some(1000.0), false);
        assert_eq!(target.number("x"), Some(20.0));
    }

    #[test]
    fn test_remove_all_empties_registry() {
        let target = Target::with([("x", 0.0), ("y", 0.0)]);
        let mut scheduler = Scheduler::new();
        for _ in 0..3 {
            let id = scheduler.add(linear_tween(&target, 10.0, 1000.0));
            scheduler.start(id, Some(0.0));
        }
        assert_eq!(scheduler.get_all().len(), 3);

        scheduler.remove_all();
        assert!(scheduler.get_all().is_empty());
        assert!(!scheduler.update(Some(100.0), false));
    }

    #[test]
    fn test_pause_is_idempotent() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(linear_tween(&target, 100.0, 1000.0));
        let pauses = event_counter(&mut scheduler, id, TweenEvent::Pause);

        scheduler.start(id, Some(0.0));
        scheduler.update(Some(500.0), false);
        scheduler.pause(id);
        scheduler.pause(id);
        assert_eq!(pauses.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.state(id), Some(TweenState::Paused));
    }

    #[test]
    fn test_pause_preserves_elapsed_offset() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(linear_tween(&target, 100.0, 1000.0));

        scheduler.start(id, Some(0.0));
        scheduler.update(Some(400.0), false);
        assert_eq!(target.number("x"), Some(40.0));

        scheduler.pause(id);
        // Paused tweens leave the active list; time passes while frozen.
        assert!(!scheduler.update(Some(900.0), false));
        assert_eq!(target.number("x"), Some(40.0));

        scheduler.play(id);
        // 400ms of progress carried over: 600ms of runway left.
        scheduler.update(Some(1000.0), false);
        assert_eq!(target.number("x"), Some(50.0));
        scheduler.update(Some(1500.0), false);
        assert_eq!(target.number("x"), Some(100.0));
    }

    #[test]
    fn test_stop_skips_complete_and_stops_chain() {
        let target = Target::with([("x", 0.0), ("y", 0.0)]);
        let mut scheduler = Scheduler::new();
        let follow = scheduler.add(
            Tween::new(&target)
                .to([("y", 5.0)], 1000.0)
                .easing(Easing::Linear),
        );
        let lead = scheduler.add(linear_tween(&target, 100.0, 1000.0).chain([follow]));

        let completes = event_counter(&mut scheduler, lead, TweenEvent::Complete);
        let stops = event_counter(&mut scheduler, lead, TweenEvent::Stop);
        let follow_stops = event_counter(&mut scheduler, follow, TweenEvent::Stop);

        scheduler.start(lead, Some(0.0));
        scheduler.start(follow, Some(0.0));
        scheduler.update(Some(100.0), false);

        scheduler.stop(lead);
        assert_eq!(completes.load(Ordering::SeqCst), 0);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert_eq!(follow_stops.load(Ordering::SeqCst), 1);
        assert!(!scheduler.has_active());
    }

    #[test]
    fn test_chain_starts_at_predecessor_end_time() {
        let target = Target::with([("x", 0.0), ("y", 0.0)]);
        let mut scheduler = Scheduler::new();
        let follow = scheduler.add(
            Tween::new(&target)
                .to([("y", 100.0)], 1000.0)
                .easing(Easing::Linear),
        );
        let lead = scheduler.add(linear_tween(&target, 100.0, 1000.0).chain([follow]));

        scheduler.start(lead, Some(0.0));
        scheduler.update(Some(1000.0), false);
        assert!(scheduler.is_playing(follow));

        // The successor's clock began at the predecessor's end (t = 1000).
        scheduler.update(Some(1500.0), false);
        assert_eq!(target.number("y"), Some(50.0));
    }

    #[test]
    fn test_seek_aligns_clock() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(linear_tween(&target, 100.0, 1000.0));
        let seeks = event_counter(&mut scheduler, id, TweenEvent::Seek);

        scheduler.start(id, Some(0.0));
        scheduler.update(Some(100.0), false);

        scheduler.seek(id, 750.0, true);
        scheduler.update(Some(100.0), false);
        assert_eq!(target.number("x"), Some(75.0));
        assert_eq!(seeks.load(Ordering::SeqCst), 1);
        assert!(scheduler.is_playing(id));

        // Seeking without keep_playing pauses.
        scheduler.seek(id, 250.0, false);
        assert_eq!(scheduler.state(id), Some(TweenState::Paused));
    }

    #[test]
    fn test_seek_clamps_to_duration() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(linear_tween(&target, 100.0, 1000.0));
        scheduler.start(id, Some(0.0));
        scheduler.update(Some(0.0), false);

        scheduler.seek(id, 5000.0, true);
        scheduler.update(Some(0.0), false);
        assert_eq!(target.number("x"), Some(100.0));
    }

    #[test]
    fn test_end_jumps_to_final_value() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(linear_tween(&target, 100.0, 1000.0));
        let completes = event_counter(&mut scheduler, id, TweenEvent::Complete);

        scheduler.start(id, Some(0.0));
        scheduler.update(Some(10.0), false);

        scheduler.end(id);
        assert_eq!(target.number("x"), Some(100.0));
        assert_eq!(completes.load(Ordering::SeqCst), 1);
        assert!(!scheduler.has_active());
    }

    #[test]
    fn test_restart_runs_again() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(linear_tween(&target, 100.0, 1000.0));
        let restarts = event_counter(&mut scheduler, id, TweenEvent::Restart);

        scheduler.start(id, Some(0.0));
        scheduler.update(Some(1000.0), false);
        assert!(!scheduler.has_active());

        scheduler.update(Some(2000.0), false);
        scheduler.restart(id, true);
        scheduler.update(Some(2500.0), false);
        // Restart re-snapshots the (now 100) start value; x stays until the
        // relative clock advances, then animates toward the same end.
        assert!(scheduler.is_playing(id));
        assert_eq!(restarts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reverse_mirrors_remaining_time() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(linear_tween(&target, 100.0, 1000.0));

        scheduler.start(id, Some(0.0));
        scheduler.update(Some(250.0), false);
        assert_eq!(target.number("x"), Some(25.0));

        scheduler.reverse(id);
        // Direction flipped at 25% elapsed; the mirrored clock reads 75%,
        // now running 100 -> 0, so the value keeps moving from 25 toward 0.
        scheduler.update(Some(1000.0), false);
        assert_eq!(target.number("x"), Some(0.0));
    }

    #[test]
    fn test_listener_commands_apply_after_iteration() {
        let target = Target::with([("x", 0.0), ("y", 0.0)]);
        let mut scheduler = Scheduler::new();
        let other = scheduler.add(
            Tween::new(&target)
                .to([("y", 100.0)], 1000.0)
                .easing(Easing::Linear),
        );
        let id = scheduler.add(linear_tween(&target, 100.0, 100.0));

        // When `id` completes, its listener stops `other` mid-iteration.
        scheduler.on(id, TweenEvent::Complete, move |_, _, commands| {
            commands.stop(other);
        });

        scheduler.start(id, Some(0.0));
        scheduler.start(other, Some(0.0));
        scheduler.update(Some(100.0), false);

        assert_eq!(scheduler.state(other), Some(TweenState::Stopped));
        assert!(!scheduler.has_active());
    }

    #[test]
    fn test_control_on_unknown_id_is_noop() {
        let mut scheduler = Scheduler::new();
        let ghost = TweenId(u64::MAX);
        scheduler.start(ghost, None);
        scheduler.stop(ghost);
        scheduler.pause(ghost);
        scheduler.end(ghost);
        assert!(!scheduler.is_playing(ghost));
        assert_eq!(scheduler.state(ghost), None);
    }

    #[test]
    fn test_update_with_preserve_keeps_finished_tween() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(linear_tween(&target, 100.0, 100.0));
        scheduler.start(id, Some(0.0));

        assert!(scheduler.update(Some(200.0), true));
        assert_eq!(scheduler.get_all(), vec![id]);
        assert_eq!(scheduler.state(id), Some(TweenState::Completed));
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let target = Target::with([("x", 0.0)]);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(linear_tween(&target, 100.0, 0.0));
        scheduler.start(id, Some(0.0));
        scheduler.update(Some(0.0), false);
        assert_eq!(target.number("x"), Some(100.0));
        assert!(!scheduler.has_active());
    }
}
