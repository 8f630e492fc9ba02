//! Time-driven tween scheduling.
//!
//! This crate animates named numeric properties of shared [`Target`]s:
//!
//! - **Tween**: per-animation state machine with a fluent builder —
//!   duration, delay, repeat (finite or infinite), repeat/reverse delays,
//!   yoyo, easing, keyframe-track interpolation, chaining and lifecycle
//!   listeners
//! - **Scheduler**: host-owned registry that advances active tweens each
//!   tick, with reentrancy-safe listener commands
//! - **SharedScheduler**: cloneable handle with an optional self-driving
//!   frame loop configured by [`SchedulerConfig`]
//!
//! # Usage
//!
//! ```
//! use kinetic_tween::{Easing, Scheduler, Target, Tween};
//!
//! let target = Target::with([("x", 0.0)]);
//! let mut scheduler = Scheduler::new();
//! let id = scheduler.add(
//!     Tween::new(&target)
//!         .to([("x", 100.0)], 1000.0)
//!         .easing(Easing::Linear),
//! );
//! scheduler.start(id, Some(0.0));
//! scheduler.update(Some(500.0), false);
//! assert_eq!(target.number("x"), Some(50.0));
//! ```

pub mod config;
pub mod driver;
pub mod easing;
pub mod events;
pub mod scheduler;
pub mod target;
pub mod track;
pub mod tween;

pub use config::{ConfigError, SchedulerConfig};
pub use driver::SharedScheduler;
pub use easing::Easing;
pub use events::{Command, Commands, ListenerId, Listeners, TweenEvent};
pub use scheduler::Scheduler;
pub use target::Target;
pub use track::TrackInterpolation;
pub use tween::{EndValue, RepeatCount, Tween, TweenId, TweenSpec, TweenState};
