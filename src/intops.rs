// numtower: a polymorphic numeric tower
//
// intops.rs
//
// Exact integer operations (Component F): quotient/modulo, gcd, exact
// exponentiation with a shared powers-of-ten table, arithmetic shift, and
// two's-complement bitwise logic.

use std::sync::OnceLock;

use rug::ops::Pow;
use rug::Integer;

use crate::error::{NumError, NumResult};
use crate::number::{make_integer_from_bignum, Number};
use crate::util::bitmask;

/// Upper bound on the magnitude of a shift or exponent that [`ash`] and
/// [`exact_integer_expt`] will act on. A single call with a shift/exponent
/// past this would attempt to allocate a bignum hundreds of megabytes wide
/// from one user-supplied integer; rejecting it up front costs nothing for
/// every legitimate caller, which never approaches this magnitude.
const ASH_MAX_SHIFT: i64 = 1 << 24;

fn require_integer(x: &Number, who: &str) -> NumResult<Integer> {
    if x.is_integer() {
        Ok(x.to_integer())
    } else {
        Err(NumError::ty(format!("{who} requires an exact integer")))
    }
}

/// `Quotient(n, d)`: truncating integer division.
pub fn quotient(n: &Number, d: &Number) -> NumResult<Number> {
    let n = require_integer(n, "quotient")?;
    let d = require_integer(d, "quotient")?;
    if d.is_zero() {
        return Err(NumError::domain("quotient: division by zero"));
    }
    Ok(make_integer_from_bignum(n / d))
}

/// `Modulo(n, d, remp)`: `remp = true` gives the truncating remainder
/// (result takes the sign of `n`, matching Rust's own `%`); `remp = false`
/// gives the floored modulo (result takes the sign of `d`).
pub fn modulo(n: &Number, d: &Number, remp: bool) -> NumResult<Number> {
    let n = require_integer(n, "modulo")?;
    let d = require_integer(d, "modulo")?;
    if d.is_zero() {
        return Err(NumError::domain("modulo: division by zero"));
    }
    if remp {
        Ok(make_integer_from_bignum(Integer::from(&n % &d)))
    } else {
        let r = Integer::from(&n % &d);
        let needs_adjust = !r.is_zero() && (r.cmp0() == std::cmp::Ordering::Less) != (d.cmp0() == std::cmp::Ordering::Less);
        Ok(make_integer_from_bignum(if needs_adjust { r + d } else { r }))
    }
}

/// `Gcd(a, b)`: always nonnegative.
pub fn gcd(a: &Number, b: &Number) -> NumResult<Number> {
    let a = require_integer(a, "gcd")?;
    let b = require_integer(b, "gcd")?;
    Ok(make_integer_from_bignum(a.gcd(&b)))
}

/// Lazily-grown table of powers of ten, shared across every
/// [`exact_integer_expt`] call in the process. Each refinement (printer
/// digit generation, decimal parsing, `expt` with a base of 10) only ever
/// asks for a longer prefix of the same sequence, so growing in place
/// avoids recomputing powers already paid for by an earlier caller.
static POW10: OnceLock<std::sync::Mutex<Vec<Integer>>> = OnceLock::new();

fn pow10(n: u32) -> Integer {
    let table = POW10.get_or_init(|| std::sync::Mutex::new(vec![Integer::from(1)]));
    let mut table = table.lock().expect("pow10 table poisoned");
    while table.len() <= n as usize {
        let next = Integer::from(table.last().unwrap() * 10);
        table.push(next);
    }
    table[n as usize].clone()
}

/// `ExactIntegerExpt(base, e)`: exact exponentiation by repeated squaring,
/// with a fast path through the shared [`pow10`] table when `base == 10`.
pub fn exact_integer_expt(base: &Number, e: i64) -> NumResult<Number> {
    if e.unsigned_abs() > ASH_MAX_SHIFT as u64 {
        return Err(NumError::range("exact_integer_expt: exponent magnitude exceeds implementation limit"));
    }

    let base_int = require_integer(base, "exact_integer_expt")?;

    if e < 0 {
        if base_int.is_zero() {
            return Err(NumError::domain("exact_integer_expt: zero base, negative exponent"));
        }
        let pos = exact_integer_expt(base, -e)?;
        return crate::rational::rational_recip(&pos);
    }

    if base_int == *Integer::ONE || e == 0 {
        return Ok(Number::one());
    }
    if base_int == Integer::from(10) {
        return Ok(make_integer_from_bignum(pow10(e as u32)));
    }

    Ok(make_integer_from_bignum(base_int.pow(e as u32)))
}

/// `Ash(x, shift)`: arithmetic shift. Positive `shift` multiplies by
/// `2^shift`; negative `shift` divides by `2^(-shift)`, rounding toward
/// negative infinity (an arithmetic right shift, not a truncating one).
pub fn ash(x: &Number, shift: i64) -> NumResult<Number> {
    if shift.unsigned_abs() > ASH_MAX_SHIFT as u64 {
        return Err(NumError::range("ash: shift magnitude exceeds implementation limit"));
    }

    let x = require_integer(x, "ash")?;
    if shift >= 0 {
        Ok(make_integer_from_bignum(x << (shift as u32)))
    } else {
        Ok(make_integer_from_bignum(Integer::from(x >> ((-shift) as u32))))
    }
}

/// `LogNot(x)`: two's-complement bitwise NOT, i.e. `-x - 1`.
pub fn lognot(x: &Number) -> NumResult<Number> {
    let x = require_integer(x, "lognot")?;
    Ok(make_integer_from_bignum(!x))
}

/// `LogAnd(x, y)`: two's-complement bitwise AND over arbitrary-width
/// integers (negative values are treated as an infinite run of one-bits).
pub fn logand(x: &Number, y: &Number) -> NumResult<Number> {
    let x = require_integer(x, "logand")?;
    let y = require_integer(y, "logand")?;
    Ok(make_integer_from_bignum(x & y))
}

/// `LogIor(x, y)`: two's-complement bitwise inclusive OR.
pub fn logior(x: &Number, y: &Number) -> NumResult<Number> {
    let x = require_integer(x, "logior")?;
    let y = require_integer(y, "logior")?;
    Ok(make_integer_from_bignum(x | y))
}

/// `LogXor(x, y)`: two's-complement bitwise exclusive OR.
pub fn logxor(x: &Number, y: &Number) -> NumResult<Number> {
    let x = require_integer(x, "logxor")?;
    let y = require_integer(y, "logxor")?;
    Ok(make_integer_from_bignum(x ^ y))
}

/// Extracts the low `n` bits of `x` (two's-complement) as a nonnegative
/// integer, used by the printer and by [`crate::bignum::get_integer_umod64`]'s
/// wider-than-64-bit siblings.
pub fn bit_field(x: &Number, n: u32) -> NumResult<Integer> {
    let x = require_integer(x, "bit_field")?;
    Ok(x & bitmask(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotient_truncates_toward_zero() {
        assert_eq!(quotient(&Number::Fixint(-7), &Number::Fixint(2)).unwrap(), Number::Fixint(-3));
    }

    #[test]
    fn modulo_truncating_takes_sign_of_dividend() {
        let r = modulo(&Number::Fixint(-7), &Number::Fixint(2), true).unwrap();
        assert_eq!(r, Number::Fixint(-1));
    }

    #[test]
    fn modulo_floored_takes_sign_of_divisor() {
        let r = modulo(&Number::Fixint(-7), &Number::Fixint(2), false).unwrap();
        assert_eq!(r, Number::Fixint(1));
    }

    #[test]
    fn modulo_floored_exact_multiple_is_zero() {
        let r = modulo(&Number::Fixint(-8), &Number::Fixint(2), false).unwrap();
        assert_eq!(r, Number::Fixint(0));
    }

    #[test]
    fn gcd_is_nonnegative() {
        assert_eq!(gcd(&Number::Fixint(-12), &Number::Fixint(18)).unwrap(), Number::Fixint(6));
    }

    #[test]
    fn division_by_zero_is_domain_error() {
        assert!(quotient(&Number::Fixint(1), &Number::Fixint(0)).is_err());
        assert!(modulo(&Number::Fixint(1), &Number::Fixint(0), true).is_err());
    }

    #[test]
    fn expt_negative_exponent_gives_ratnum() {
        let r = exact_integer_expt(&Number::Fixint(2), -3).unwrap();
        assert_eq!(r, crate::rational::make_rational(Integer::from(1), Integer::from(8)).unwrap());
    }

    #[test]
    fn expt_base_ten_uses_shared_table() {
        assert_eq!(exact_integer_expt(&Number::Fixint(10), 5).unwrap(), Number::Fixint(100_000));
    }

    #[test]
    fn ash_left_and_right() {
        assert_eq!(ash(&Number::Fixint(1), 4).unwrap(), Number::Fixint(16));
        assert_eq!(ash(&Number::Fixint(-5), -1).unwrap(), Number::Fixint(-3)); // floor(-5/2) = -3
    }

    #[test]
    fn ash_rejects_a_shift_past_the_ceiling() {
        assert!(ash(&Number::Fixint(1), ASH_MAX_SHIFT + 1).is_err());
        assert!(ash(&Number::Fixint(1), -(ASH_MAX_SHIFT + 1)).is_err());
        assert!(ash(&Number::Fixint(1), ASH_MAX_SHIFT).is_ok());
    }

    #[test]
    fn expt_rejects_an_exponent_past_the_ceiling() {
        assert!(exact_integer_expt(&Number::Fixint(2), ASH_MAX_SHIFT + 1).is_err());
        assert!(exact_integer_expt(&Number::Fixint(2), -(ASH_MAX_SHIFT + 1)).is_err());
    }

    #[test]
    fn lognot_is_negate_and_decrement() {
        assert_eq!(lognot(&Number::Fixint(0)).unwrap(), Number::Fixint(-1));
        assert_eq!(lognot(&Number::Fixint(-1)).unwrap(), Number::Fixint(0));
    }

    #[test]
    fn bitwise_ops_match_twos_complement() {
        assert_eq!(logand(&Number::Fixint(6), &Number::Fixint(3)).unwrap(), Number::Fixint(2));
        assert_eq!(logior(&Number::Fixint(6), &Number::Fixint(1)).unwrap(), Number::Fixint(7));
        assert_eq!(logxor(&Number::Fixint(6), &Number::Fixint(3)).unwrap(), Number::Fixint(5));
    }
}
