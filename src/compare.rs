// numtower: a polymorphic numeric tower
//
// compare.rs
//
// Top-level comparison (Component K): a transitive `NumCmp` over mixed
// exact/inexact reals that never loses precision by coercing blindly to
// `f64`, plus the usual relational/min/max surface.

use std::cmp::Ordering;

use rug::Integer;

use crate::number::Number;
use crate::rational::num_den;
use crate::round::flonum_to_exact;

/// `NumCmp(x, y)`: `None` whenever either side is NaN (or a non-real
/// Compnum is compared, which has no total order); `Some(Ordering)`
/// otherwise. Mixed exact/inexact comparisons convert the *inexact* side
/// to an exact rational rather than the exact side to `f64`, so a huge
/// exact integer compared against a finite flonum is never corrupted by
/// a lossy coercion.
pub fn num_cmp(x: &Number, y: &Number) -> Option<Ordering> {
    match (x, y) {
        (Number::Compnum(..), _) | (_, Number::Compnum(..)) => None,

        (a, b) if a.is_exact() && b.is_exact() => Some(exact_cmp(a, b)),

        (Number::Flonum(fx), Number::Flonum(fy)) => fx.partial_cmp(fy),

        (Number::Flonum(f), exact) => flonum_exact_cmp(*f, exact).map(Ordering::reverse),
        (exact, Number::Flonum(f)) => flonum_exact_cmp(*f, exact),

        _ => unreachable!("exhaustive over Number's five variants"),
    }
}

fn exact_cmp(a: &Number, b: &Number) -> Ordering {
    let (an, ad) = num_den(a).expect("exact_cmp requires exact operands");
    let (bn, bd) = num_den(b).expect("exact_cmp requires exact operands");
    // ad, bd > 0 by the Ratnum invariant, so cross-multiplying preserves order.
    Integer::from(&an * &bd).cmp(&Integer::from(&bn * &ad))
}

/// Compares a flonum `f` against an exact real `exact`, returning the
/// ordering of `f` relative to `exact` (i.e. `f.cmp(exact)`).
fn flonum_exact_cmp(f: f64, exact: &Number) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    if f.is_infinite() {
        return Some(if f > 0.0 { Ordering::Greater } else { Ordering::Less });
    }
    let f_exact = flonum_to_exact(f).expect("finite flonum always has an exact form");
    Some(exact_cmp(&f_exact, exact))
}

/// `x = y` (NaN-aware: `NaN = anything` is always false). Complex numbers
/// compare component-wise.
pub fn num_eq(x: &Number, y: &Number) -> bool {
    match (x, y) {
        (Number::Compnum(xr, xi), Number::Compnum(yr, yi)) => xr == yr && xi == yi,
        (Number::Compnum(_, _), _) | (_, Number::Compnum(_, _)) => false,
        _ => num_cmp(x, y) == Some(Ordering::Equal),
    }
}

pub fn num_lt(x: &Number, y: &Number) -> bool {
    num_cmp(x, y) == Some(Ordering::Less)
}

pub fn num_le(x: &Number, y: &Number) -> bool {
    matches!(num_cmp(x, y), Some(Ordering::Less) | Some(Ordering::Equal))
}

pub fn num_gt(x: &Number, y: &Number) -> bool {
    num_cmp(x, y) == Some(Ordering::Greater)
}

pub fn num_ge(x: &Number, y: &Number) -> bool {
    matches!(num_cmp(x, y), Some(Ordering::Greater) | Some(Ordering::Equal))
}

/// `Min(x, y)`: inherits `NumCmp`'s contagion — if either argument is
/// inexact, the result is coerced to inexact even if it is numerically
/// equal to the exact argument.
pub fn num_min<'a>(x: &'a Number, y: &'a Number) -> Option<Number> {
    let ord = num_cmp(x, y)?;
    let smaller = if ord == Ordering::Greater { y } else { x };
    if x.is_inexact() || y.is_inexact() {
        Some(Number::Flonum(smaller.to_f64_lossy()))
    } else {
        Some(smaller.clone())
    }
}

/// `Max(x, y)`: see [`num_min`].
pub fn num_max<'a>(x: &'a Number, y: &'a Number) -> Option<Number> {
    let ord = num_cmp(x, y)?;
    let larger = if ord == Ordering::Less { y } else { x };
    if x.is_inexact() || y.is_inexact() {
        Some(Number::Flonum(larger.to_f64_lossy()))
    } else {
        Some(larger.clone())
    }
}
