// numtower: a polymorphic numeric tower
//
// round.rs
//
// Rounding and exact/inexact conversion (Component G).

use rug::Integer;

use crate::error::{NumError, NumResult};
use crate::ieee754::decode_flonum;
use crate::number::{make_integer_from_bignum, Number};
use crate::rational::num_den;

/// The four directed rounding modes `Round` supports. `Round` is distinct
/// from the binary64 rounding used internally by the printer/reader
/// (round-half-to-even only), which lives in [`crate::printer`] and
/// [`crate::reader`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundMode {
    Floor,
    Ceiling,
    Truncate,
    Round,
}

/// `Round(x, mode)`. Integers are returned unchanged; ratnums are rounded
/// via truncating quotient/remainder adjusted by mode; flonums go through
/// libm `floor`/`ceil`/`trunc` plus a local round-half-to-even (never
/// `round(3)`, which rounds halves away from zero).
pub fn round(x: &Number, mode: RoundMode) -> NumResult<Number> {
    match x {
        Number::Fixint(_) | Number::Bignum(_) => Ok(x.clone()),
        Number::Ratnum(_, _) => round_ratnum(x, mode),
        Number::Flonum(f) => Ok(Number::Flonum(round_f64(*f, mode))),
        Number::Compnum(_, _) => Err(NumError::ty("round requires a real number")),
    }
}

fn round_ratnum(x: &Number, mode: RoundMode) -> NumResult<Number> {
    let (n, d) = num_den(x)?;
    let q = Integer::from(&n / &d);
    let r = Integer::from(&n % &d); // truncating remainder, sign of n

    if r.is_zero() {
        return Ok(make_integer_from_bignum(q));
    }

    let neg = n.cmp0() == std::cmp::Ordering::Less;
    let adjusted = match mode {
        RoundMode::Truncate => q,
        RoundMode::Floor => {
            if neg {
                q - 1
            } else {
                q
            }
        }
        RoundMode::Ceiling => {
            if neg {
                q
            } else {
                q + 1
            }
        }
        RoundMode::Round => {
            let twice_r = Integer::from(&r * 2).abs();
            match twice_r.cmp(&d) {
                std::cmp::Ordering::Less => q,
                std::cmp::Ordering::Greater => {
                    if neg {
                        q - 1
                    } else {
                        q + 1
                    }
                }
                std::cmp::Ordering::Equal => {
                    // tie: round to even
                    if q.is_even() {
                        q
                    } else if neg {
                        q - 1
                    } else {
                        q + 1
                    }
                }
            }
        }
    };
    Ok(make_integer_from_bignum(adjusted))
}

fn round_f64(f: f64, mode: RoundMode) -> f64 {
    let r = match mode {
        RoundMode::Floor => f.floor(),
        RoundMode::Ceiling => f.ceil(),
        RoundMode::Truncate => f.trunc(),
        RoundMode::Round => round_half_to_even_f64(f),
    };
    if r == 0.0 {
        0.0 // never emit -0.0
    } else {
        r
    }
}

/// Round-half-to-even for a finite `f64`, used in place of libm `round(3)`
/// (which rounds ties away from zero).
fn round_half_to_even_f64(f: f64) -> f64 {
    if !f.is_finite() {
        return f;
    }
    let floor = f.floor();
    let diff = f - floor;
    if diff < 0.5 {
        floor
    } else if diff > 0.5 {
        floor + 1.0
    } else if (floor as i64) % 2 == 0 {
        floor
    } else {
        floor + 1.0
    }
}

/// `Exact(x)`: converts a flonum to the exact rational/integer it denotes.
/// NaN and infinities are domain errors; an integral value goes through
/// [`crate::ieee754::decode_flonum`] to build an exact integer directly;
/// a fractional value delegates to [`crate::dispatch::HostDispatch::real_to_rational`].
pub fn exact(x: &Number) -> NumResult<Number> {
    match x {
        Number::Fixint(_) | Number::Bignum(_) | Number::Ratnum(_, _) => Ok(x.clone()),
        Number::Flonum(f) => flonum_to_exact(*f),
        Number::Compnum(_, _) => Err(NumError::domain("exact: complex numbers have no exact representation")),
    }
}

pub(crate) fn flonum_to_exact(f: f64) -> NumResult<Number> {
    if f.is_nan() || f.is_infinite() {
        return Err(NumError::domain("exact: cannot exactly represent NaN or infinity"));
    }
    if f.fract() == 0.0 {
        return Ok(make_integer_from_bignum(Integer::from_f64(f).expect("integral flonum must convert")));
    }
    match decode_flonum(f) {
        crate::ieee754::Decoded::Finite { sign, f: mant, e } => {
            let dispatch = crate::dispatch::DefaultHost;
            crate::dispatch::HostDispatch::real_to_rational(&dispatch, sign, &mant, e)
        }
        _ => unreachable!("fract() != 0.0 implies Decoded::Finite"),
    }
}

/// `Inexact(x)`: coerces any real number to a [`Number::Flonum`].
pub fn inexact(x: &Number) -> NumResult<Number> {
    if !x.is_real() {
        return Err(NumError::ty("inexact requires a real number"));
    }
    Ok(Number::Flonum(x.to_f64_lossy()))
}
