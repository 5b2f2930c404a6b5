// numtower: a polymorphic numeric tower
//
// ops.rs
//
// Generic arithmetic dispatch (Component E) and the three-flavor division
// kernel (Component F, Div). A single "tower level" governs coercion: the
// result lives at the highest level either operand occupies, and every
// kernel below that level is just the rational/complex arithmetic already
// built in `rational.rs`/`complex.rs`.

use rug::Integer;

use crate::error::NumResult;
use crate::number::{make_integer_from_bignum, Number};
use crate::rational::{rational_add, rational_div, rational_mul, rational_neg, rational_recip, rational_sub};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Level {
    Int,
    Rat,
    Flo,
    Comp,
}

fn level(x: &Number) -> Level {
    match x {
        Number::Fixint(_) | Number::Bignum(_) => Level::Int,
        Number::Ratnum(_, _) => Level::Rat,
        Number::Flonum(_) => Level::Flo,
        Number::Compnum(_, _) => Level::Comp,
    }
}

fn as_complex(x: &Number) -> (f64, f64) {
    match x {
        Number::Compnum(r, i) => (*r, *i),
        _ => (x.to_f64_lossy(), 0.0),
    }
}

/// `x + y`.
pub fn add(x: &Number, y: &Number) -> NumResult<Number> {
    if x.is_exact() && x.is_zero() {
        return Ok(y.clone());
    }
    if y.is_exact() && y.is_zero() {
        return Ok(x.clone());
    }
    match level(x).max(level(y)) {
        Level::Int => Ok(make_integer_from_bignum(x.to_integer() + y.to_integer())),
        Level::Rat => rational_add(x, y),
        Level::Flo => Ok(Number::Flonum(x.to_f64_lossy() + y.to_f64_lossy())),
        Level::Comp => {
            let (xr, xi) = as_complex(x);
            let (yr, yi) = as_complex(y);
            crate::complex::make_complex(&Number::Flonum(xr + yr), &Number::Flonum(xi + yi))
        }
    }
}

/// `x - y`.
pub fn sub(x: &Number, y: &Number) -> NumResult<Number> {
    if y.is_exact() && y.is_zero() {
        return Ok(x.clone());
    }
    match level(x).max(level(y)) {
        Level::Int => Ok(make_integer_from_bignum(x.to_integer() - y.to_integer())),
        Level::Rat => rational_sub(x, y),
        Level::Flo => Ok(Number::Flonum(x.to_f64_lossy() - y.to_f64_lossy())),
        Level::Comp => {
            let (xr, xi) = as_complex(x);
            let (yr, yi) = as_complex(y);
            crate::complex::make_complex(&Number::Flonum(xr - yr), &Number::Flonum(xi - yi))
        }
    }
}

/// `-x`.
pub fn neg(x: &Number) -> NumResult<Number> {
    match x {
        Number::Fixint(_) | Number::Bignum(_) => Ok(make_integer_from_bignum(-x.to_integer())),
        Number::Ratnum(_, _) => rational_neg(x),
        Number::Flonum(f) => Ok(Number::Flonum(-f)),
        Number::Compnum(r, i) => Ok(Number::Compnum(-r, -i)),
    }
}

/// `x * y`. `0 * inexact` is a contagion exception: the result is exact
/// zero rather than an inexact zero, matching the source language's
/// semantics rather than naive IEEE contagion.
pub fn mul(x: &Number, y: &Number) -> NumResult<Number> {
    if (x.is_exact() && x.is_zero()) || (y.is_exact() && y.is_zero()) {
        return Ok(Number::zero());
    }
    if x.is_exact() && matches!(x, Number::Fixint(1)) {
        return Ok(y.clone());
    }
    if y.is_exact() && matches!(y, Number::Fixint(1)) {
        return Ok(x.clone());
    }
    match level(x).max(level(y)) {
        Level::Int => Ok(make_integer_from_bignum(x.to_integer() * y.to_integer())),
        Level::Rat => rational_mul(x, y),
        Level::Flo => Ok(Number::Flonum(x.to_f64_lossy() * y.to_f64_lossy())),
        Level::Comp => {
            let (xr, xi) = as_complex(x);
            let (yr, yi) = as_complex(y);
            let re = xr * yr - xi * yi;
            let im = xr * yi + xi * yr;
            crate::complex::make_complex(&Number::Flonum(re), &Number::Flonum(im))
        }
    }
}

/// The three flavors of `Div` (§4.F): `Exact` keeps the result exact
/// whenever both operands are, `Inexact` always returns a Flonum/Compnum,
/// and `Compat` is the legacy flavor that stays exact only when the exact
/// quotient happens to be a whole integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DivFlavor {
    Exact,
    Inexact,
    Compat,
}

/// `x / y` under `flavor`. The default top-level `/` should use
/// [`DivFlavor::Exact`] when both operands are exact and
/// [`DivFlavor::Inexact`] is implied automatically whenever either operand
/// already is; `flavor` only changes behavior for the all-exact case.
pub fn div(x: &Number, y: &Number, flavor: DivFlavor) -> NumResult<Number> {
    let both_exact = x.is_exact() && y.is_exact();

    if !both_exact || flavor == DivFlavor::Inexact {
        return complex_or_real_div(x, y);
    }

    // both_exact && flavor is Exact or Compat
    let exact_result = rational_div(x, y)?;
    if flavor == DivFlavor::Compat {
        if exact_result.is_integer() {
            Ok(exact_result)
        } else {
            Ok(Number::Flonum(exact_result.to_f64_lossy()))
        }
    } else {
        Ok(exact_result)
    }
}

fn complex_or_real_div(x: &Number, y: &Number) -> NumResult<Number> {
    if level(x) == Level::Comp || level(y) == Level::Comp {
        let (xr, xi) = as_complex(x);
        let (yr, yi) = as_complex(y);
        let denom = yr * yr + yi * yi;
        let re = (xr * yr + xi * yi) / denom;
        let im = (xi * yr - xr * yi) / denom;
        crate::complex::make_complex(&Number::Flonum(re), &Number::Flonum(im))
    } else {
        // Plain f64 division already implements IEEE-754 semantics for
        // division by (signed) zero: the sign of the zero divisor flows
        // into the sign of the resulting infinity, and exact-zero-over-zero
        // is NaN, exactly as specified.
        Ok(Number::Flonum(x.to_f64_lossy() / y.to_f64_lossy()))
    }
}

/// `1 / x`, as a convenience wrapper (used by `ExactIntegerExpt`'s
/// negative-exponent case and available to callers directly).
pub fn recip(x: &Number) -> NumResult<Number> {
    match x {
        Number::Fixint(_) | Number::Bignum(_) | Number::Ratnum(_, _) => rational_recip(x),
        Number::Flonum(f) => Ok(Number::Flonum(1.0 / f)),
        Number::Compnum(_, _) => div(&Number::Flonum(1.0), x, DivFlavor::Inexact),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_respects_exact_zero_identity() {
        let flo = Number::Flonum(3.5);
        assert_eq!(add(&Number::zero(), &flo).unwrap(), Number::Flonum(3.5));
    }

    #[test]
    fn mul_zero_times_inexact_is_exact_zero() {
        let r = mul(&Number::zero(), &Number::Flonum(f64::NAN)).unwrap();
        assert!(matches!(r, Number::Fixint(0)));
    }

    #[test]
    fn add_promotes_to_ratnum() {
        let half = crate::rational::make_rational(Integer::from(1), Integer::from(2)).unwrap();
        let r = add(&Number::Fixint(1), &half).unwrap();
        let expected = crate::rational::make_rational(Integer::from(3), Integer::from(2)).unwrap();
        assert_eq!(r, expected);
    }

    #[test]
    fn exact_division_by_zero_errors() {
        assert!(div(&Number::Fixint(1), &Number::zero(), DivFlavor::Exact).is_err());
    }

    #[test]
    fn inexact_division_by_zero_is_signed_infinity() {
        let r = div(&Number::Fixint(1), &Number::Flonum(-0.0), DivFlavor::Inexact).unwrap();
        assert!(matches!(r, Number::Flonum(f) if f == f64::NEG_INFINITY));
    }

    #[test]
    fn compat_division_demotes_whole_quotient() {
        let r = div(&Number::Fixint(6), &Number::Fixint(3), DivFlavor::Compat).unwrap();
        assert!(matches!(r, Number::Fixint(2)));
    }

    #[test]
    fn compat_division_coerces_nonwhole_quotient_to_flonum() {
        let r = div(&Number::Fixint(1), &Number::Fixint(3), DivFlavor::Compat).unwrap();
        assert!(matches!(r, Number::Flonum(f) if (f - 1.0/3.0).abs() < 1e-15));
    }

    #[test]
    fn complex_multiply_matches_formula() {
        let a = Number::Compnum(1.0, 2.0);
        let b = Number::Compnum(3.0, -1.0);
        let r = mul(&a, &b).unwrap();
        assert!(matches!(r, Number::Compnum(re, im) if re == 5.0 && im == 5.0));
    }

    #[test]
    fn neg_of_ratnum() {
        let half = crate::rational::make_rational(Integer::from(1), Integer::from(2)).unwrap();
        let negated = neg(&half).unwrap();
        let expected = crate::rational::make_rational(Integer::from(-1), Integer::from(2)).unwrap();
        assert_eq!(negated, expected);
    }
}
