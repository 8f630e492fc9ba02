//! Generic interpolation dispatch over an open probe registry.
//!
//! The registry holds an ordered, mutable list of probes consulted
//! most-recently-registered first, so user probes override the built-in
//! chain. A probe inspects the endpoint pair and either claims it by
//! returning an interpolator or passes. The built-in chain classifies the
//! target endpoint by shape: zoom view, transform, color (value or parseable
//! string), array, record, then number or string.
//!
//! Interpolators are pure: all sub-interpolators for nested shapes are built
//! eagerly at construction, so probe overrides apply at every depth and
//! evaluation never needs the registry again.
//!
//! # Usage
//!
//! ```
//! use kinetic_interp::{Registry, Value};
//!
//! let registry = Registry::new();
//! let f = registry.interpolate(&Value::from(0.0), &Value::from(10.0));
//! assert_eq!(f.eval(0.5), Value::from(5.0));
//! ```

use std::collections::HashMap;

use crate::color::{self, Rgb};
use crate::number::{self, format_number};
use crate::string;
use crate::transform;
use crate::value::Value;
use crate::zoom::ZoomInterpolator;

/// A pure progress-to-value function, closed over its endpoints.
pub struct Interpolator {
    f: Box<dyn Fn(f64) -> Value + Send + Sync>,
}

impl Interpolator {
    /// Wrap a closure as an interpolator.
    pub fn new(f: impl Fn(f64) -> Value + Send + Sync + 'static) -> Self {
        Self { f: Box::new(f) }
    }

    /// An interpolator that ignores progress and always yields `value`.
    pub fn constant(value: Value) -> Self {
        Self::new(move |_| value.clone())
    }

    /// Evaluate at progress `t`.
    pub fn eval(&self, t: f64) -> Value {
        (self.f)(t)
    }
}

impl std::fmt::Debug for Interpolator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Interpolator")
    }
}

/// A shape detector: claims an endpoint pair or passes.
pub type Probe = Box<dyn Fn(&Registry, &Value, &Value) -> Option<Interpolator> + Send + Sync>;

/// Ordered probe registry with the built-in chain preinstalled.
pub struct Registry {
    probes: Vec<Probe>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            probes: vec![Box::new(default_probe)],
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("probes", &self.probes.len())
            .finish()
    }
}

impl Registry {
    /// Create a registry with the built-in dispatch chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a probe. Probes are consulted most-recently-added first, so
    /// a new probe overrides earlier ones for the shapes it claims.
    pub fn register(
        &mut self,
        probe: impl Fn(&Registry, &Value, &Value) -> Option<Interpolator> + Send + Sync + 'static,
    ) {
        self.probes.push(Box::new(probe));
    }

    /// Build an interpolator for the endpoint pair.
    ///
    /// Falls back to a constant of `b` if every probe passes (the built-in
    /// chain is total, so this only happens when it has been removed).
    pub fn interpolate(&self, a: &Value, b: &Value) -> Interpolator {
        for probe in self.probes.iter().rev() {
            if let Some(interp) = probe(self, a, b) {
                return interp;
            }
        }
        Interpolator::constant(b.clone())
    }

    /// Element-wise array interpolation.
    ///
    /// Elements up to the shorter length are interpolated pairwise; surplus
    /// elements of the longer input are copied verbatim at their original
    /// indices, so the result length always equals the longer input.
    pub fn array(&self, a: &[Value], b: &[Value]) -> Interpolator {
        let shared = a.len().min(b.len());
        let blended: Vec<Interpolator> = (0..shared)
            .map(|i| self.interpolate(&a[i], &b[i]))
            .collect();
        let surplus: Vec<Value> = if a.len() > b.len() {
            a[shared..].to_vec()
        } else {
            b[shared..].to_vec()
        };

        Interpolator::new(move |t| {
            let mut items: Vec<Value> = blended.iter().map(|f| f.eval(t)).collect();
            items.extend(surplus.iter().cloned());
            Value::Array { items }
        })
    }

    /// Per-key record interpolation.
    ///
    /// Keys present on both sides are interpolated; keys on only one side
    /// are carried as constants from that side, preferring `a`'s value when
    /// only `a` has the key.
    pub fn record(
        &self,
        a: &HashMap<String, Value>,
        b: &HashMap<String, Value>,
    ) -> Interpolator {
        let mut blended: Vec<(String, Interpolator)> = Vec::new();
        let mut constants: Vec<(String, Value)> = Vec::new();

        for (key, av) in a {
            match b.get(key) {
                Some(bv) => blended.push((key.clone(), self.interpolate(av, bv))),
                None => constants.push((key.clone(), av.clone())),
            }
        }
        for (key, bv) in b {
            if !a.contains_key(key) {
                constants.push((key.clone(), bv.clone()));
            }
        }

        Interpolator::new(move |t| {
            let mut fields: HashMap<String, Value> = constants.iter().cloned().collect();
            for (key, f) in &blended {
                fields.insert(key.clone(), f.eval(t));
            }
            Value::Record { fields }
        })
    }
}

/// The built-in classification chain.
fn default_probe(registry: &Registry, a: &Value, b: &Value) -> Option<Interpolator> {
    // Zoom and transform variants dispatch on their tags directly.
    if let (Some(za), Some(zb)) = (a.as_zoom(), b.as_zoom()) {
        let path = ZoomInterpolator::new(za, zb);
        return Some(Interpolator::new(move |t| Value::Zoom {
            view: path.eval(t),
        }));
    }
    if b.as_transform().is_some() {
        let ma = a.as_transform().unwrap_or_default();
        let mb = b.as_transform().unwrap_or_default();
        let f = transform::between(ma, mb);
        return Some(Interpolator::new(move |t| Value::Str { value: f(t) }));
    }

    // Color values, or strings that parse as colors.
    if let Some(cb) = color_endpoint(b) {
        let ca = color_endpoint(a).unwrap_or_default();
        let f = color::rgb(ca, cb);
        return Some(Interpolator::new(move |t| Value::Str { value: f(t) }));
    }

    if let Some(items_b) = b.as_array() {
        let empty: &[Value] = &[];
        let items_a = a.as_array().unwrap_or(empty);
        return Some(registry.array(items_a, items_b));
    }

    if let Some(fields_b) = b.as_record() {
        static EMPTY: std::sync::LazyLock<HashMap<String, Value>> =
            std::sync::LazyLock::new(HashMap::new);
        let fields_a = a.as_record().unwrap_or(&EMPTY);
        return Some(registry.record(fields_a, fields_b));
    }

    if let Some(nb) = b.as_number() {
        let na = numeric_endpoint(a);
        let f = number::number(na, nb);
        return Some(Interpolator::new(move |t| Value::Number { value: f(t) }));
    }

    // Anything else lands in string interpolation.
    let sa = stringy_endpoint(a);
    let sb = stringy_endpoint(b);
    let f = string::string(&sa, &sb);
    Some(Interpolator::new(move |t| Value::Str { value: f(t) }))
}

fn color_endpoint(v: &Value) -> Option<Rgb> {
    match v {
        Value::Color { rgb } => Some(*rgb),
        Value::Str { value } => Rgb::parse(value),
        _ => None,
    }
}

fn numeric_endpoint(v: &Value) -> f64 {
    match v {
        Value::Number { value } => *value,
        Value::Str { value } => value.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

fn stringy_endpoint(v: &Value) -> String {
    match v {
        Value::Str { value } => value.clone(),
        Value::Number { value } => format_number(*value),
        other => format!("{other:?}"),
    }
}

static_assertions::assert_impl_all!(Registry: Send, Sync);
static_assertions::assert_impl_all!(Interpolator: Send, Sync);
