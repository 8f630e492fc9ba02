//! Smooth pan-and-zoom interpolation between viewport descriptors.
//!
//! Implements the van Wijk / Nuij smooth zooming path: the view translates
//! and scales along a hyperbolic trajectory so perceived velocity stays
//! constant, parameterized by a fixed expansion rate `rho = sqrt(2)`. The
//! interpolator exposes a recommended duration derived from the path's total
//! arc length, so callers can drive an animation at constant perceptual
//! speed.
//!
//! When the two view centers coincide the discriminant collapses; the path
//! degenerates to a pure exponential change of width.

use serde::{Deserialize, Serialize};

/// Fixed expansion rate of the zoom trajectory.
const RHO: f64 = std::f64::consts::SQRT_2;
const RHO2: f64 = 2.0;
const RHO4: f64 = 4.0;

/// Minimum center distance treated as a real pan.
const MIN_PAN_DISTANCE: f64 = 1e-6;

/// A viewport: center point plus visible width (zoom scale proxy).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomView {
    pub cx: f64,
    pub cy: f64,
    pub width: f64,
}

impl ZoomView {
    pub fn new(cx: f64, cy: f64, width: f64) -> Self {
        Self { cx, cy, width }
    }
}

/// Precomputed zoom path between two views.
#[derive(Debug, Clone, Copy)]
pub struct ZoomInterpolator {
    start: ZoomView,
    dx: f64,
    dy: f64,
    d1: f64,
    r0: f64,
    cosh_r0: f64,
    sinh_r0: f64,
    /// Normalized path length; progress `t` maps to arc position `t * s`.
    s: f64,
    degenerate: bool,
    /// Recommended animation duration in milliseconds.
    pub duration_ms: f64,
}

impl ZoomInterpolator {
    /// Build the path from view `a` to view `b`.
    pub fn new(a: ZoomView, b: ZoomView) -> Self {
        let w0 = a.width;
        let w1 = b.width;
        let dx = b.cx - a.cx;
        let dy = b.cy - a.cy;
        let d2 = dx * dx + dy * dy;
        let d1 = d2.sqrt();

        if d1 < MIN_PAN_DISTANCE {
            // Coincident centers: exponential width ramp, no hyperbolic arc.
            let s = (w1 / w0).ln() / RHO;
            return Self {
                start: a,
                dx,
                dy,
                d1,
                r0: 0.0,
                cosh_r0: 1.0,
                sinh_r0: 0.0,
                s,
                degenerate: true,
                duration_ms: (s * 1000.0).abs(),
            };
        }

        let b0 = (w1 * w1 - w0 * w0 + RHO4 * d2) / (2.0 * w0 * RHO2 * d1);
        let b1 = (w1 * w1 - w0 * w0 - RHO4 * d2) / (2.0 * w1 * RHO2 * d1);
        let r0 = ((b0 * b0 + 1.0).sqrt() - b0).ln();
        let r1 = ((b1 * b1 + 1.0).sqrt() - b1).ln();
        let s = (r1 - r0) / RHO;

        Self {
            start: a,
            dx,
            dy,
            d1,
            r0,
            cosh_r0: r0.cosh(),
            sinh_r0: r0.sinh(),
            s,
            degenerate: false,
            duration_ms: (s * 1000.0).abs(),
        }
    }

    /// Evaluate the path at progress `t` in [0, 1].
    pub fn eval(&self, t: f64) -> ZoomView {
        let w0 = self.start.width;
        let arc = t * self.s;

        if self.degenerate {
            return ZoomView {
                cx: self.start.cx + t * self.dx,
                cy: self.start.cy + t * self.dy,
                width: w0 * (RHO * arc).exp(),
            };
        }

        let u = w0 / (RHO2 * self.d1)
            * (self.cosh_r0 * (RHO * arc + self.r0).tanh() - self.sinh_r0);
        ZoomView {
            cx: self.start.cx + u * self.dx,
            cy: self.start.cy + u * self.dy,
            width: w0 * self.cosh_r0 / (RHO * arc + self.r0).cosh(),
        }
    }
}

/// Convenience wrapper returning a closure over the precomputed path.
pub fn zoom(a: ZoomView, b: ZoomView) -> impl Fn(f64) -> ZoomView + Send + Sync {
    let path = ZoomInterpolator::new(a, b);
    move |t| path.eval(t)
}
