//! Kinetic: value interpolation and tween scheduling.
//!
//! Facade over the two engine crates:
//!
//! - [`interp`]: shape-dispatched interpolators for numbers, colors,
//!   strings, arrays, records, 2D transforms and zoom paths
//! - [`tween`]: the time-driven tween scheduler with easing, repeat/yoyo,
//!   chaining and lifecycle events
//!
//! The commonly-used types are re-exported at the crate root.

pub use kinetic_interp as interp;
pub use kinetic_tween as tween;

pub use kinetic_interp::{Interpolator, Registry, Rgb, Value};
pub use kinetic_tween::{
    Easing, Scheduler, SchedulerConfig, SharedScheduler, Target, TrackInterpolation, Tween,
    TweenEvent, TweenId,
};
