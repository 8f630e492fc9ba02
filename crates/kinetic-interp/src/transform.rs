//! 2D affine transforms: parsing, decomposition, interpolation.
//!
//! A transform string is parsed into a 2x3 affine matrix, decomposed into
//! translate/rotate/skew-X/scale components, and interpolated termwise. The
//! output is rebuilt piecewise so identity components are omitted.
//!
//! Decomposition is a Gram-Schmidt pass over the two basis columns:
//! normalize the first column for x-scale, remove its projection from the
//! second to expose the shear, normalize the remainder for y-scale, and
//! flip sign/rotation when the signed area shows a reflection.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::warn;

use crate::number::format_number;

/// A 2D affine transformation matrix.
///
/// Stored as a 2x3 matrix (the bottom row [0, 0, 1] is implicit):
/// ```text
/// | a  c  tx |
/// | b  d  ty |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// A translation transform.
    pub fn translate(tx: f64, ty: f64) -> Self {
        Self { tx, ty, ..Self::identity() }
    }

    /// A non-uniform scale transform.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::identity()
        }
    }

    /// A rotation transform from degrees.
    pub fn rotate_deg(angle_deg: f64) -> Self {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// A horizontal skew transform from degrees.
    pub fn skew_x_deg(angle_deg: f64) -> Self {
        Self {
            c: angle_deg.to_radians().tan(),
            ..Self::identity()
        }
    }

    /// A vertical skew transform from degrees.
    pub fn skew_y_deg(angle_deg: f64) -> Self {
        Self {
            b: angle_deg.to_radians().tan(),
            ..Self::identity()
        }
    }

    /// Compose this transform with another (`self * other`).
    ///
    /// The resulting transform applies `other` first, then `self`.
    pub fn then(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            tx: self.a * other.tx + self.c * other.ty + self.tx,
            ty: self.b * other.tx + self.d * other.ty + self.ty,
        }
    }

    /// Apply this transform to a point.
    pub fn apply_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    /// Parse a CSS-style transform string.
    ///
    /// Accepts a whitespace-separated list of `matrix`, `translate`,
    /// `rotate`, `scale`, `skewX` and `skewY` functions, composed left to
    /// right. Angle arguments may carry a `deg` suffix, lengths a `px`
    /// suffix. Returns `None` when the string contains no recognizable
    /// function or a function has the wrong arity.
    pub fn parse(input: &str) -> Option<Self> {
        static FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"([a-zA-Z]+)\s*\(([^)]*)\)").expect("static pattern compiles")
        });

        let mut result = Self::identity();
        let mut seen = false;
        for cap in FUNCTION.captures_iter(input) {
            let name = cap[1].to_ascii_lowercase();
            let args: Vec<f64> = cap[2]
                .split([',', ' '])
                .filter(|s| !s.is_empty())
                .map(parse_scalar)
                .collect::<Option<Vec<_>>>()?;
            let m = match (name.as_str(), args.as_slice()) {
                ("matrix", [a, b, c, d, tx, ty]) => Self {
                    a: *a,
                    b: *b,
                    c: *c,
                    d: *d,
                    tx: *tx,
                    ty: *ty,
                },
                ("translate", [x]) => Self::translate(*x, 0.0),
                ("translate", [x, y]) => Self::translate(*x, *y),
                ("rotate", [deg]) => Self::rotate_deg(*deg),
                ("scale", [s]) => Self::scale(*s, *s),
                ("scale", [x, y]) => Self::scale(*x, *y),
                ("skewx", [deg]) => Self::skew_x_deg(*deg),
                ("skewy", [deg]) => Self::skew_y_deg(*deg),
                _ => return None,
            };
            result = result.then(&m);
            seen = true;
        }
        seen.then_some(result)
    }

    /// Parse a transform string, falling back to identity on failure.
    pub fn parse_or_identity(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::identity();
        }
        Self::parse(trimmed).unwrap_or_else(|| {
            warn!(input, "unparseable transform, falling back to identity");
            Self::identity()
        })
    }

    /// Decompose into translate, rotation, skew-X and scale components.
    pub fn decompose(&self) -> DecomposedTransform {
        let mut r0 = [self.a, self.b];
        let mut r1 = [self.c, self.d];

        let mut kx = normalize(&mut r0);
        let mut skew = dot(r0, r1);
        combine(&mut r1, r0, -skew);
        let ky = normalize(&mut r1);

        // Negative signed area means a reflection; fold it into x-scale.
        if r0[0] * r1[1] < r1[0] * r0[1] {
            r0[0] = -r0[0];
            r0[1] = -r0[1];
            kx = -kx;
            skew = -skew;
        }

        DecomposedTransform {
            translate_x: self.tx,
            translate_y: self.ty,
            rotate_deg: r0[1].atan2(r0[0]).to_degrees(),
            skew_x_deg: if ky != 0.0 {
                skew.atan2(ky).to_degrees()
            } else {
                0.0
            },
            scale_x: kx,
            scale_y: ky,
        }
    }
}

/// Decomposed 2D transform components.
///
/// Angles are in degrees so the rebuilt string reads like its input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecomposedTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub rotate_deg: f64,
    pub skew_x_deg: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

fn dot(a: [f64; 2], b: [f64; 2]) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

fn normalize(v: &mut [f64; 2]) -> f64 {
    let k = (v[0] * v[0] + v[1] * v[1]).sqrt();
    if k > 0.0 {
        v[0] /= k;
        v[1] /= k;
    }
    k
}

fn combine(v: &mut [f64; 2], u: [f64; 2], k: f64) {
    v[0] += u[0] * k;
    v[1] += u[1] * k;
}

fn parse_scalar(raw: &str) -> Option<f64> {
    raw.trim()
        .trim_end_matches("deg")
        .trim_end_matches("px")
        .parse()
        .ok()
}

/// One segment of the rebuilt transform string.
enum Seg {
    Literal(String),
    Blend { a: f64, b: f64 },
}

/// Interpolate between two transform strings.
///
/// Output is built piecewise: `translate(...)` appears only when either
/// endpoint is non-origin or the two differ (interpolated termwise);
/// `rotate`, `skewX` and `scale` are appended only when non-identity or
/// differing. Rotation always takes the shorter arc: when the delta exceeds
/// 180 degrees the smaller endpoint is wrapped by 360 before blending.
///
/// Unparseable endpooints degrade to the identity transform.
pub fn transform(a: &str, b: &str) -> Box<dyn Fn(f64) -> String + Send + Sync> {
    between(
        Transform2D::parse_or_identity(a),
        Transform2D::parse_or_identity(b),
    )
}

/// Interpolate between two already-parsed transforms.
pub fn between(a: Transform2D, b: Transform2D) -> Box<dyn Fn(f64) -> String + Send + Sync> {
    let ta = a.decompose();
    let tb = b.decompose();
    let segs = build_segments(&ta, &tb);

    Box::new(move |t| {
        let mut out = String::new();
        for seg in &segs {
            match seg {
                Seg::Literal(text) => out.push_str(text),
                Seg::Blend { a, b } => out.push_str(&format_number(a + (b - a) * t)),
            }
        }
        out
    })
}

fn build_segments(ta: &DecomposedTransform, tb: &DecomposedTransform) -> Vec<Seg> {
    let mut segs: Vec<Seg> = Vec::new();
    let lit = |segs: &mut Vec<Seg>, text: String| segs.push(Seg::Literal(text));
    let blend = |segs: &mut Vec<Seg>, a: f64, b: f64| segs.push(Seg::Blend { a, b });

    if ta.translate_x != tb.translate_x || ta.translate_y != tb.translate_y {
        lit(&mut segs, "translate(".into());
        blend(&mut segs, ta.translate_x, tb.translate_x);
        lit(&mut segs, ",".into());
        blend(&mut segs, ta.translate_y, tb.translate_y);
        lit(&mut segs, ")".into());
    } else if tb.translate_x != 0.0 || tb.translate_y != 0.0 {
        lit(
            &mut segs,
            format!(
                "translate({},{})",
                format_number(tb.translate_x),
                format_number(tb.translate_y)
            ),
        );
    }

    let (mut ra, mut rb) = (ta.rotate_deg, tb.rotate_deg);
    if ra != rb {
        // Shortest angular path: wrap the smaller endpoint by a full turn.
        if ra - rb > 180.0 {
            rb += 360.0;
        } else if rb - ra > 180.0 {
            ra += 360.0;
        }
        lit(&mut segs, "rotate(".into());
        blend(&mut segs, ra, rb);
        lit(&mut segs, ")".into());
    } else if rb != 0.0 {
        lit(&mut segs, format!("rotate({})", format_number(rb)));
    }

    if ta.skew_x_deg != tb.skew_x_deg {
        lit(&mut segs, "skewX(".into());
        blend(&mut segs, ta.skew_x_deg, tb.skew_x_deg);
        lit(&mut segs, ")".into());
    } else if tb.skew_x_deg != 0.0 {
        lit(&mut segs, format!("skewX({})", format_number(tb.skew_x_deg)));
    }

    if ta.scale_x != tb.scale_x || ta.scale_y != tb.scale_y {
        lit(&mut segs, "scale(".into());
        blend(&mut segs, ta.scale_x, tb.scale_x);
        lit(&mut segs, ",".into());
        blend(&mut segs, ta.scale_y, tb.scale_y);
        lit(&mut segs, ")".into());
    } else if tb.scale_x != 1.0 || tb.scale_y != 1.0 {
        lit(
            &mut segs,
            format!(
                "scale({},{})",
                format_number(tb.scale_x),
                format_number(tb.scale_y)
            ),
        );
    }

    segs
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_parse_function_list() {
        let m = Transform2D::parse("translate(10, 20) scale(2)").unwrap();
        assert_eq!(m.apply_point(1.0, 1.0), (12.0, 22.0));

        let m = Transform2D::parse("matrix(1, 0, 0, 1, 5, 6)").unwrap();
        assert_eq!((m.tx, m.ty), (5.0, 6.0));
    }

    #[test]
    fn test_parse_units_and_case() {
        let m = Transform2D::parse("rotate(90deg)").unwrap();
        let (x, y) = m.apply_point(1.0, 0.0);
        assert!(approx_eq(x, 0.0));
        assert!(approx_eq(y, 1.0));

        assert!(Transform2D::parse("skewX(10deg) SKEWY(0deg)").is_some());
        assert!(Transform2D::parse("translate(10px, 20px)").is_some());
    }

    #[test]
    fn test_parse_failure_falls_back_to_identity() {
        assert!(Transform2D::parse("frobnicate(1)").is_none());
        assert!(Transform2D::parse("garbage").is_none());
        assert_eq!(
            Transform2D::parse_or_identity("garbage"),
            Transform2D::identity()
        );
        assert_eq!(Transform2D::parse_or_identity(""), Transform2D::identity());
    }

    #[test]
    fn test_decompose_simple() {
        let d = Transform2D::parse("translate(3,4) rotate(30deg) scale(2,5)")
            .unwrap()
            .decompose();
        assert!(approx_eq(d.translate_x, 3.0));
        assert!(approx_eq(d.translate_y, 4.0));
        assert!(approx_eq(d.rotate_deg, 30.0));
        assert!(approx_eq(d.scale_x, 2.0));
        assert!(approx_eq(d.scale_y, 5.0));
        assert!(approx_eq(d.skew_x_deg, 0.0));
    }

    #[test]
    fn test_decompose_skew() {
        let d = Transform2D::parse("skewX(20deg)").unwrap().decompose();
        assert!(approx_eq(d.skew_x_deg, 20.0));
        assert!(approx_eq(d.rotate_deg, 0.0));
        assert!(approx_eq(d.scale_x, 1.0));
    }

    #[test]
    fn test_decompose_reflection() {
        // A mirror flip must surface as negative x-scale, not a bogus angle.
        let d = Transform2D::scale(-1.0, 1.0).decompose();
        assert!(d.scale_x < 0.0);
        assert!(approx_eq(d.scale_y, 1.0));
    }

    #[test]
    fn test_interpolate_translate_only() {
        let f = transform("translate(0,0)", "translate(10,20)");
        assert_eq!(f(0.0), "translate(0,0)");
        assert_eq!(f(0.5), "translate(5,10)");
        assert_eq!(f(1.0), "translate(10,20)");
    }

    #[test]
    fn test_identity_components_are_omitted() {
        let f = transform("translate(10,20)", "translate(10,20)");
        assert_eq!(f(0.5), "translate(10,20)");

        let f = transform("", "");
        assert_eq!(f(0.5), "");
    }

    #[test]
    fn test_shortest_rotation_arc() {
        // 370deg wraps so the blend runs 0 -> 10, not 0 -> 370.
        let f = transform("translate(0,0)", "translate(10,20) rotate(370deg)");
        let mid = f(0.5);
        assert!(mid.contains("rotate(5)"), "got {mid}");
        assert!(mid.contains("translate(5,10)"));
    }

    #[test]
    fn test_shortest_arc_wraps_downward() {
        let f = transform("rotate(350deg)", "rotate(10deg)");
        // -10 -> 10 via the short way: midpoint 0.
        let mid = f(0.5);
        assert!(mid.contains("rotate(0)") || !mid.contains("rotate"), "got {mid}");
    }

    #[test]
    fn test_wrap_applies_past_half_turn() {
        // -170 vs 170 is a 340-degree walk the long way; wrapping the
        // smaller endpoint runs 190 -> 170 instead.
        let f = transform("rotate(-170deg)", "rotate(170deg)");
        let mid = f(0.5);
        assert!(mid.contains("rotate(180)"), "got {mid}");
    }

    #[test]
    fn test_scale_blend() {
        let f = transform("scale(1,1)", "scale(3,5)");
        assert_eq!(f(0.5), "scale(2,3)");
    }
}
