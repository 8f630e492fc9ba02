//! Tween state machine and fluent builder.
//!
//! A `Tween` animates named numeric properties of a shared [`Target`] from a
//! start snapshot toward an end-value map. It is configured standalone with
//! the builder surface below, then handed to a
//! [`Scheduler`](crate::scheduler::Scheduler), which owns it and drives its
//! lifecycle:
//!
//! ```text
//! Idle -> Scheduled -> Running -> { Completed, Stopped, Paused -> Running }
//! ```
//!
//! End values come in three live shapes plus an inert one:
//! - absolute numbers,
//! - relative strings (`"+10"` / `"-10"`), added to the start value and
//!   accumulating across repeats,
//! - keyframe tracks (`Vec<f64>`), fed through the configured
//!   [`TrackInterpolation`] with the start value prepended at start time,
//! - anything else is carried but never written (defensive no-op).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use kinetic_interp::Value;

use crate::easing::Easing;
use crate::events::{Commands, ListenerId, Listeners, TweenEvent};
use crate::target::Target;
use crate::track::TrackInterpolation;

/// Unique identifier for a tween instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TweenId(pub u64);

impl TweenId {
    /// Generate a new unique tween ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TweenId {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle state of a tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweenState {
    /// Registered but not yet started.
    Idle,
    /// Started, waiting for its first due tick.
    Scheduled,
    /// Advancing every tick.
    Running,
    /// Frozen; elapsed offset is preserved for resume.
    Paused,
    /// Reached the end of its final cycle.
    Completed,
    /// Stopped before completing; `complete` never fired.
    Stopped,
}

/// How many extra cycles a tween runs after its first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RepeatCount {
    /// A fixed number of rewinds.
    Count { count: u32 },
    /// Rewind forever.
    Infinite,
}

impl Default for RepeatCount {
    fn default() -> Self {
        Self::Count { count: 0 }
    }
}

impl RepeatCount {
    fn has_remaining(self) -> bool {
        match self {
            Self::Infinite => true,
            Self::Count { count } => count > 0,
        }
    }

    fn decrement(&mut self) {
        if let Self::Count { count } = self {
            *count = count.saturating_sub(1);
        }
    }
}

/// A per-property end value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EndValue {
    /// Animate to this number.
    Absolute { value: f64 },
    /// Animate to `start + offset`; offsets accumulate across repeats.
    Relative { offset: f64 },
    /// Animate along these control points.
    Track { points: Vec<f64> },
    /// Carried but never written to the target.
    Opaque { value: Value },
}

impl From<f64> for EndValue {
    fn from(value: f64) -> Self {
        Self::Absolute { value }
    }
}

impl From<Vec<f64>> for EndValue {
    fn from(points: Vec<f64>) -> Self {
        Self::Track { points }
    }
}

impl From<&str> for EndValue {
    /// A leading `+` or `-` marks a relative offset; other numeric text is
    /// absolute; anything else is opaque.
    fn from(s: &str) -> Self {
        let t = s.trim();
        if let Some(rest) = t.strip_prefix('+') {
            if let Ok(offset) = rest.parse::<f64>() {
                return Self::Relative { offset };
            }
        } else if t.starts_with('-') {
            if let Ok(offset) = t.parse::<f64>() {
                return Self::Relative { offset };
            }
        } else if let Ok(value) = t.parse::<f64>() {
            return Self::Absolute { value };
        }
        Self::Opaque {
            value: Value::from(s),
        }
    }
}

impl From<Value> for EndValue {
    fn from(v: Value) -> Self {
        match &v {
            Value::Number { value } => Self::Absolute { value: *value },
            Value::Str { value } => Self::from(value.as_str()),
            Value::Array { items } => {
                let numbers: Option<Vec<f64>> = items.iter().map(Value::as_number).collect();
                match numbers {
                    Some(points) => Self::Track { points },
                    None => Self::Opaque { value: v },
                }
            }
            _ => Self::Opaque { value: v },
        }
    }
}

/// Bulk configuration applied by [`Tween::to_spec`]; every populated field
/// is applied as the corresponding builder call.
#[derive(Debug, Clone, Default)]
pub struct TweenSpec {
    pub duration_ms: Option<f64>,
    pub delay_ms: Option<f64>,
    pub repeat: Option<RepeatCount>,
    pub repeat_delay_ms: Option<f64>,
    pub reverse_delay_ms: Option<f64>,
    pub yoyo: Option<bool>,
    pub easing: Option<Easing>,
    pub interpolation: Option<TrackInterpolation>,
}

/// A stateful, time-scoped animation of a target's properties.
#[derive(Debug)]
pub struct Tween {
    id: TweenId,
    target: Target,
    /// End map as configured; cloned into `values_end` on every (re)start.
    config_end: HashMap<String, EndValue>,
    values_end: HashMap<String, EndValue>,
    values_start: HashMap<String, f64>,
    values_start_repeat: HashMap<String, f64>,
    duration_ms: f64,
    delay_ms: f64,
    repeat: RepeatCount,
    repeat_remaining: RepeatCount,
    repeat_delay_ms: Option<f64>,
    reverse_delay_ms: Option<f64>,
    yoyo: bool,
    reversed: bool,
    easing: Easing,
    interpolation: TrackInterpolation,
    chain: Vec<TweenId>,
    listeners: Listeners,
    state: TweenState,
    start_time: f64,
    pause_start: f64,
    start_fired: bool,
}

impl Tween {
    /// Create an idle tween over a shared target.
    pub fn new(target: &Target) -> Self {
        Self {
            id: TweenId::new(),
            target: target.clone(),
            config_end: HashMap::new(),
            values_end: HashMap::new(),
            values_start: HashMap::new(),
            values_start_repeat: HashMap::new(),
            duration_ms: 1000.0,
            delay_ms: 0.0,
            repeat: RepeatCount::default(),
            repeat_remaining: RepeatCount::default(),
            repeat_delay_ms: None,
            reverse_delay_ms: None,
            yoyo: false,
            reversed: false,
            easing: Easing::default(),
            interpolation: TrackInterpolation::default(),
            chain: Vec::new(),
            listeners: Listeners::new(),
            state: TweenState::Idle,
            start_time: 0.0,
            pause_start: 0.0,
            start_fired: false,
        }
    }

    pub fn id(&self) -> TweenId {
        self.id
    }

    // ------------------------------------------------------------------
    // Fluent configuration
    // ------------------------------------------------------------------

    /// Set end values and duration in one call.
    pub fn to<I, K, V>(mut self, props: I, duration_ms: f64) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<EndValue>,
    {
        for (key, value) in props {
            self.config_end.insert(key.into(), value.into());
        }
        self.duration(duration_ms)
    }

    /// Set end values and apply a bulk [`TweenSpec`].
    pub fn to_spec<I, K, V>(mut self, props: I, spec: TweenSpec) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<EndValue>,
    {
        for (key, value) in props {
            self.config_end.insert(key.into(), value.into());
        }
        if let Some(ms) = spec.duration_ms {
            self = self.duration(ms);
        }
        if let Some(ms) = spec.delay_ms {
            self = self.delay(ms);
        }
        if let Some(repeat) = spec.repeat {
            self = self.repeat(repeat);
        }
        if let Some(ms) = spec.repeat_delay_ms {
            self = self.repeat_delay(ms);
        }
        if let Some(ms) = spec.reverse_delay_ms {
            self = self.reverse_delay(ms);
        }
        if let Some(yoyo) = spec.yoyo {
            self = self.yoyo(yoyo);
        }
        if let Some(easing) = spec.easing {
            self = self.easing(easing);
        }
        if let Some(interpolation) = spec.interpolation {
            self = self.interpolation(interpolation);
        }
        self
    }

    /// Set the cycle duration in milliseconds.
    ///
    /// # Panics
    /// Panics on NaN, infinite or negative input.
    pub fn duration(mut self, ms: f64) -> Self {
        assert!(
            ms.is_finite() && ms >= 0.0,
            "duration must be a finite, non-negative millisecond count"
        );
        self.duration_ms = ms;
        self
    }

    /// Set the delay before the first cycle.
    ///
    /// # Panics
    /// Panics on NaN, infinite or negative input.
    pub fn delay(mut self, ms: f64) -> Self {
        assert!(
            ms.is_finite() && ms >= 0.0,
            "delay must be a finite, non-negative millisecond count"
        );
        self.delay_ms = ms;
        self
    }

    /// Set how many extra cycles run after the first.
    pub fn repeat(mut self, count: RepeatCount) -> Self {
        self.repeat = count;
        self.repeat_remaining = count;
        self
    }

    /// Delay applied when rewinding forward.
    pub fn repeat_delay(mut self, ms: f64) -> Self {
        assert!(
            ms.is_finite() && ms >= 0.0,
            "repeat delay must be a finite, non-negative millisecond count"
        );
        self.repeat_delay_ms = Some(ms);
        self
    }

    /// Delay applied when a yoyo cycle flips into reverse.
    pub fn reverse_delay(mut self, ms: f64) -> Self {
        assert!(
            ms.is_finite() && ms >= 0.0,
            "reverse delay must be a finite, non-negative millisecond count"
        );
        self.reverse_delay_ms = Some(ms);
        self
    }

    /// Alternate direction on every repeat cycle.
    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Interpolation mode for keyframe-track end values.
    pub fn interpolation(mut self, interpolation: TrackInterpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Successor tweens started when this one completes.
    ///
    /// Chaining a tween into its own ancestry is undefined behavior: the
    /// cycle is not detected.
    pub fn chain(mut self, ids: impl IntoIterator<Item = TweenId>) -> Self {
        self.chain.extend(ids);
        self
    }

    /// Register a listener (fluent form; the listener id is discarded).
    pub fn on(
        mut self,
        event: TweenEvent,
        callback: impl FnMut(TweenEvent, &Target, &mut Commands) + Send + 'static,
    ) -> Self {
        self.listeners.on(event, callback);
        self
    }

    /// Register a one-shot listener (fluent form).
    pub fn once(
        mut self,
        event: TweenEvent,
        callback: impl FnMut(TweenEvent, &Target, &mut Commands) + Send + 'static,
    ) -> Self {
        self.listeners.once(event, callback);
        self
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    pub fn state(&self) -> TweenState {
        self.state
    }

    /// Scheduled or running.
    pub fn is_playing(&self) -> bool {
        matches!(self.state, TweenState::Scheduled | TweenState::Running)
    }

    /// Whether the first due tick has fired `start`.
    pub fn is_started(&self) -> bool {
        self.start_fired
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub(crate) fn start_time(&self) -> f64 {
        self.start_time
    }

    pub(crate) fn listeners_mut(&mut self) -> &mut Listeners {
        &mut self.listeners
    }

    /// Register a listener post-construction, returning its removal id.
    pub(crate) fn add_listener(
        &mut self,
        event: TweenEvent,
        once: bool,
        callback: impl FnMut(TweenEvent, &Target, &mut Commands) + Send + 'static,
    ) -> ListenerId {
        if once {
            self.listeners.once(event, callback)
        } else {
            self.listeners.on(event, callback)
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle, driven by the scheduler
    // ------------------------------------------------------------------

    /// Schedule the tween: compute its start time and snapshot start values.
    ///
    /// Properties missing from the target, or non-numeric there, get no
    /// start snapshot and are skipped during ticks. Keyframe tracks have the
    /// start value prepended, so the track animates from the current state.
    pub(crate) fn start_at(&mut self, time: f64) {
        self.start_time = time + self.delay_ms;
        self.start_fired = false;
        self.reversed = false;
        self.repeat_remaining = self.repeat;

        let mut runtime_end = HashMap::new();
        let mut starts = HashMap::new();
        for (prop, end) in &self.config_end {
            let start = self.target.number(prop);
            match end {
                EndValue::Track { points } => {
                    if points.is_empty() {
                        continue;
                    }
                    if let Some(s) = start {
                        let mut prepended = Vec::with_capacity(points.len() + 1);
                        prepended.push(s);
                        prepended.extend_from_slice(points);
                        runtime_end
                            .insert(prop.clone(), EndValue::Track { points: prepended });
                        starts.insert(prop.clone(), s);
                    }
                }
                other => {
                    runtime_end.insert(prop.clone(), other.clone());
                    if let Some(s) = start {
                        starts.insert(prop.clone(), s);
                    }
                }
            }
        }
        self.values_end = runtime_end;
        self.values_start = starts.clone();
        self.values_start_repeat = starts;
        self.state = TweenState::Scheduled;
    }

    /// Advance to `time`. Returns whether the tween stays registered.
    pub(crate) fn tick(&mut self, time: f64, commands: &mut Commands) -> bool {
        match self.state {
            TweenState::Idle | TweenState::Completed | TweenState::Stopped => return false,
            TweenState::Paused => return true,
            TweenState::Scheduled | TweenState::Running => {}
        }
        if time < self.start_time {
            // Not yet due; stays pending.
            return true;
        }

        if !self.start_fired {
            self.start_fired = true;
            self.state = TweenState::Running;
            self.listeners.fire(TweenEvent::Start, &self.target, commands);
        }

        let elapsed = if self.duration_ms > 0.0 {
            ((time - self.start_time) / self.duration_ms).min(1.0)
        } else {
            1.0
        };
        let value = self.easing.apply(elapsed);

        for (prop, end) in &self.values_end {
            let Some(&start) = self.values_start.get(prop) else {
                continue;
            };
            let next = match end {
                EndValue::Absolute { value: end_value } => start + (end_value - start) * value,
                EndValue::Relative { offset } => start + offset * value,
                EndValue::Track { points } => self.interpolation.apply(points, value),
                EndValue::Opaque { .. } => continue,
            };
            self.target.set(prop.clone(), next);
        }
        self.listeners.fire(TweenEvent::Update, &self.target, commands);

        if elapsed < 1.0 {
            return true;
        }

        if self.repeat_remaining.has_remaining() {
            self.repeat_remaining.decrement();
            self.rewind();
            let next_delay = if self.reversed {
                self.reverse_delay_ms
                    .or(self.repeat_delay_ms)
                    .unwrap_or(self.delay_ms)
            } else {
                self.repeat_delay_ms.unwrap_or(self.delay_ms)
            };
            self.start_time = time + next_delay;
            let event = if self.reversed {
                TweenEvent::Reverse
            } else {
                TweenEvent::Repeat
            };
            self.listeners.fire(event, &self.target, commands);
            return true;
        }

        self.state = TweenState::Completed;
        self.listeners
            .fire(TweenEvent::Complete, &self.target, commands);
        let chain_start = self.start_time + self.duration_ms;
        for &successor in &self.chain {
            commands.start_at(successor, chain_start);
        }
        self.repeat_remaining = self.repeat;
        false
    }

    /// Rewind for another cycle: accumulate relative ends, ping-pong under
    /// yoyo, and re-seed the start snapshot.
    fn rewind(&mut self) {
        let keys: Vec<String> = self.values_start_repeat.keys().cloned().collect();
        for prop in keys {
            let start_repeat = self.values_start_repeat[&prop];
            match self.values_end.get(&prop).cloned() {
                Some(EndValue::Relative { offset }) => {
                    if self.yoyo {
                        // Resolve once to absolute, then ping-pong.
                        self.values_end
                            .insert(prop.clone(), EndValue::Absolute { value: start_repeat });
                        self.values_start_repeat
                            .insert(prop.clone(), start_repeat + offset);
                    } else {
                        self.values_start_repeat
                            .insert(prop.clone(), start_repeat + offset);
                    }
                }
                Some(EndValue::Absolute { value }) => {
                    if self.yoyo {
                        self.values_end
                            .insert(prop.clone(), EndValue::Absolute { value: start_repeat });
                        self.values_start_repeat.insert(prop.clone(), value);
                    }
                }
                Some(EndValue::Track { mut points }) => {
                    if self.yoyo {
                        points.reverse();
                        self.values_end
                            .insert(prop.clone(), EndValue::Track { points });
                    }
                }
                _ => {}
            }
            self.values_start
                .insert(prop.clone(), self.values_start_repeat[&prop]);
        }
        if self.yoyo {
            self.reversed = !self.reversed;
        }
    }

    /// Freeze at `time`. Returns false when already frozen or inactive.
    pub(crate) fn pause_at(&mut self, time: f64, commands: &mut Commands) -> bool {
        if !matches!(self.state, TweenState::Scheduled | TweenState::Running) {
            return false;
        }
        self.pause_start = time;
        self.state = TweenState::Paused;
        self.listeners.fire(TweenEvent::Pause, &self.target, commands);
        true
    }

    /// Resume at `time`, folding the paused span back into the start time.
    pub(crate) fn resume_at(&mut self, time: f64, commands: &mut Commands) -> bool {
        if self.state != TweenState::Paused {
            return false;
        }
        self.start_time += time - self.pause_start;
        self.state = if self.start_fired {
            TweenState::Running
        } else {
            TweenState::Scheduled
        };
        self.listeners.fire(TweenEvent::Play, &self.target, commands);
        true
    }

    /// Stop without completing. Returns the chained successors to stop.
    pub(crate) fn stop_now(&mut self, commands: &mut Commands) -> Vec<TweenId> {
        if !matches!(
            self.state,
            TweenState::Scheduled | TweenState::Running | TweenState::Paused
        ) {
            return Vec::new();
        }
        self.state = TweenState::Stopped;
        self.listeners.fire(TweenEvent::Stop, &self.target, commands);
        self.chain.clone()
    }

    /// Align the internal clock to read `clamp(ms, 0, duration)` at `time`.
    ///
    /// The caller is responsible for pausing afterwards when the seek is not
    /// meant to keep playing.
    pub(crate) fn seek_to(&mut self, time: f64, ms: f64, commands: &mut Commands) {
        let clamped = ms.clamp(0.0, self.duration_ms);
        self.start_time = time - clamped;
        if self.state == TweenState::Paused {
            self.pause_start = time;
        }
        self.listeners.fire(TweenEvent::Seek, &self.target, commands);
    }

    /// Flip direction mid-flight: swap endpoints and mirror remaining time.
    pub(crate) fn reverse_now(&mut self, time: f64, commands: &mut Commands) {
        let keys: Vec<String> = self.values_start_repeat.keys().cloned().collect();
        for prop in keys {
            let start_repeat = self.values_start_repeat[&prop];
            match self.values_end.get(&prop).cloned() {
                Some(EndValue::Absolute { value }) => {
                    self.values_end
                        .insert(prop.clone(), EndValue::Absolute { value: start_repeat });
                    self.values_start_repeat.insert(prop.clone(), value);
                }
                Some(EndValue::Relative { offset }) => {
                    self.values_end
                        .insert(prop.clone(), EndValue::Absolute { value: start_repeat });
                    self.values_start_repeat
                        .insert(prop.clone(), start_repeat + offset);
                }
                Some(EndValue::Track { mut points }) => {
                    points.reverse();
                    self.values_end
                        .insert(prop.clone(), EndValue::Track { points });
                }
                _ => {}
            }
            self.values_start
                .insert(prop.clone(), self.values_start_repeat[&prop]);
        }
        self.reversed = !self.reversed;

        if self.start_fired && matches!(self.state, TweenState::Running | TweenState::Paused) {
            let elapsed_ms = (time - self.start_time).clamp(0.0, self.duration_ms);
            self.start_time = time - (self.duration_ms - elapsed_ms);
        }
        self.listeners
            .fire(TweenEvent::Reverse, &self.target, commands);
    }

    /// Reset and schedule another run from the configured end map.
    pub(crate) fn restart_at(&mut self, time: f64, no_delay: bool, commands: &mut Commands) {
        let base = if no_delay { time - self.delay_ms } else { time };
        self.start_at(base);
        self.listeners
            .fire(TweenEvent::Restart, &self.target, commands);
    }
}
