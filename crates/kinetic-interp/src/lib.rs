//! Shape-dispatched value interpolation.
//!
//! This crate builds pure progress-to-value functions ("interpolators")
//! between two endpoint values of matching shape:
//!
//! - **Numbers**: plain linear blend, with a rounding variant
//! - **Colors**: channel-wise RGB blend re-encoded as `#rrggbb`
//! - **Strings**: embedded numeric tokens blended in place
//! - **Arrays / records**: element-wise and per-key recursion
//! - **2D transforms**: decomposed termwise blend with shortest-arc rotation
//! - **Zoom views**: van Wijk constant-perceptual-speed pan/zoom paths
//!
//! Generic dispatch goes through [`Registry`], an ordered probe list where
//! the most recently registered probe wins, so hosts can override or extend
//! the built-in chain.
//!
//! # Usage
//!
//! ```
//! use kinetic_interp::{Registry, Value};
//!
//! let registry = Registry::new();
//! let f = registry.interpolate(&Value::from("red"), &Value::from("blue"));
//! assert_eq!(f.eval(0.5), Value::from("#800080"));
//! ```

pub mod color;
pub mod number;
pub mod registry;
pub mod string;
pub mod transform;
pub mod value;
pub mod zoom;

pub use color::{ColorParseError, Hsl, Rgb, rgb};
pub use number::{number, round};
pub use registry::{Interpolator, Probe, Registry};
pub use string::string;
pub use transform::{DecomposedTransform, Transform2D, transform};
pub use value::Value;
pub use zoom::{ZoomInterpolator, ZoomView, zoom};
