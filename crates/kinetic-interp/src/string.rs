//! String interpolation over embedded numeric tokens.
//!
//! Both strings are scanned left-to-right with synchronized cursors for
//! tokens matching a signed float with optional exponent. Literal runs are
//! preserved verbatim, runs whose token text is byte-identical in both
//! strings stay constant, and runs whose numbers differ become per-token
//! numeric interpolators. Any suffix of the target string past its last
//! matched number is appended as a literal.
//!
//! ```
//! let f = kinetic_interp::string::string("a: 1px", "a: 10px");
//! assert_eq!(f(0.5), "a: 5.5px");
//! ```

use regex::Regex;
use std::sync::LazyLock;

use crate::number::format_number;

/// Signed float with optional exponent.
static NUMBER_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?(?:\d+\.?\d*|\.?\d+)(?:[eE][-+]?\d+)?").expect("static pattern compiles")
});

enum Piece {
    Literal(String),
    Blend { a: f64, b: f64 },
}

/// Build the piece list: alternating literal runs and blended tokens,
/// with adjacent literals coalesced.
fn scan(a: &str, b: &str) -> Vec<Piece> {
    let mut pieces: Vec<Piece> = Vec::new();
    let push_literal = |pieces: &mut Vec<Piece>, text: &str| {
        if text.is_empty() {
            return;
        }
        if let Some(Piece::Literal(last)) = pieces.last_mut() {
            last.push_str(text);
        } else {
            pieces.push(Piece::Literal(text.to_string()));
        }
    };

    let mut a_tokens = NUMBER_TOKEN.find_iter(a);
    let mut b_cursor = 0usize;
    for bm in NUMBER_TOKEN.find_iter(b) {
        let Some(am) = a_tokens.next() else { break };
        if bm.start() > b_cursor {
            push_literal(&mut pieces, &b[b_cursor..bm.start()]);
        }
        if am.as_str() == bm.as_str() {
            // Identical token text stays constant.
            push_literal(&mut pieces, bm.as_str());
        } else {
            match (am.as_str().parse::<f64>(), bm.as_str().parse::<f64>()) {
                (Ok(av), Ok(bv)) => pieces.push(Piece::Blend { a: av, b: bv }),
                _ => push_literal(&mut pieces, bm.as_str()),
            }
        }
        b_cursor = bm.end();
    }
    if b_cursor < b.len() {
        push_literal(&mut pieces, &b[b_cursor..]);
    }
    pieces
}

/// Interpolate between two strings with embedded numbers.
///
/// When at most one token differs, a single-splice fast path avoids the
/// general join machinery.
pub fn string(a: &str, b: &str) -> Box<dyn Fn(f64) -> String + Send + Sync> {
    let pieces = scan(a, b);
    let blends = pieces
        .iter()
        .filter(|p| matches!(p, Piece::Blend { .. }))
        .count();

    if blends == 0 {
        // Nothing varies: the result is always the target string.
        let constant = b.to_string();
        return Box::new(move |_| constant.clone());
    }

    if blends == 1 && pieces.len() <= 3 {
        // Fast path: prefix + one number + suffix.
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut endpoints = (0.0, 0.0);
        let mut seen_blend = false;
        for piece in &pieces {
            match piece {
                Piece::Literal(text) if !seen_blend => prefix.push_str(text),
                Piece::Literal(text) => suffix.push_str(text),
                Piece::Blend { a, b } => {
                    endpoints = (*a, *b);
                    seen_blend = true;
                }
            }
        }
        let (av, bv) = endpoints;
        let d = bv - av;
        return Box::new(move |t| format!("{prefix}{}{suffix}", format_number(av + d * t)));
    }

    Box::new(move |t| {
        let mut out = String::new();
        for piece in &pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Blend { a, b } => out.push_str(&format_number(a + (b - a) * t)),
            }
        }
        out
    })
}
