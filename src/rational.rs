// numtower: a polymorphic numeric tower
//
// rational.rs
//
// The rational core (Component C): construction, reduction, and the
// lowest-terms arithmetic formulas with gcd short-circuits.

use rug::Integer;

use crate::error::{NumError, NumResult};
use crate::number::{make_integer_from_bignum, Number};

/// Splits any exact rational number into `(numerator, denominator)`,
/// with `denominator = 1` for integers.
pub fn num_den(x: &Number) -> NumResult<(Integer, Integer)> {
    match x {
        Number::Fixint(i) => Ok((Integer::from(*i), Integer::from(1))),
        Number::Bignum(b) => Ok((b.clone(), Integer::from(1))),
        Number::Ratnum(n, d) => Ok((n.to_integer(), d.to_integer())),
        _ => Err(NumError::ty("num_den requires an exact rational number")),
    }
}

/// `MakeRatnum(n, d)`: the raw constructor. Performs no reduction or sign
/// normalization; only checks that both arguments are exact integers and
/// that `d` is nonzero. Used internally by [`make_rational`] and by callers
/// that have already established lowest terms themselves.
pub fn make_ratnum(n: Integer, d: Integer) -> NumResult<Number> {
    if d.is_zero() {
        return Err(NumError::domain("make_ratnum: zero denominator"));
    }
    Ok(Number::Ratnum(
        Box::new(make_integer_from_bignum(n)),
        Box::new(make_integer_from_bignum(d)),
    ))
}

/// `MakeRational(n, d)`: the canonicalizing constructor. Normalizes the
/// sign so the denominator is positive, reduces by the gcd, and demotes to
/// an integer when the reduced denominator is 1.
pub fn make_rational(mut n: Integer, mut d: Integer) -> NumResult<Number> {
    if d.is_zero() {
        return Err(NumError::domain("make_rational: zero denominator"));
    }
    if d.cmp0() == std::cmp::Ordering::Less {
        n = -n;
        d = -d;
    }
    if n.is_zero() {
        return Ok(Number::zero());
    }
    let g = n.clone().gcd(&d);
    if g != *Integer::ONE {
        n /= &g;
        d /= &g;
    }
    if d == *Integer::ONE {
        Ok(make_integer_from_bignum(n))
    } else {
        Ok(Number::Ratnum(
            Box::new(make_integer_from_bignum(n)),
            Box::new(make_integer_from_bignum(d)),
        ))
    }
}

/// `ReduceRational(r)`: idempotent canonicalization of any exact rational
/// (a no-op for values that are already canonical, which includes every
/// `Number::Ratnum` constructed via [`make_rational`]).
pub fn reduce_rational(r: &Number) -> NumResult<Number> {
    let (n, d) = num_den(r)?;
    make_rational(n, d)
}

/// Exact rational addition, `x + y`, via the gcd-accelerated formula
/// (the same cross-cancellation GMP's `mpq_add` uses): for `x = a/b`,
/// `y = c/d`, let `g = gcd(b, d)`. If `g = 1` the naive cross-multiply is
/// already in lowest terms up to a possible common factor with `g`; when
/// `g > 1`, a second gcd on the partial numerator avoids the blow-up of
/// always forming `b*d`.
pub fn rational_add(x: &Number, y: &Number) -> NumResult<Number> {
    let (a, b) = num_den(x)?;
    let (c, d) = num_den(y)?;

    if b == *Integer::ONE && d == *Integer::ONE {
        return make_rational(a + c, Integer::from(1));
    }

    let g = b.clone().gcd(&d);
    if g == *Integer::ONE {
        let num = Integer::from(&a * &d) + Integer::from(&c * &b);
        let den = a_mul(&b, &d);
        make_rational(num, den)
    } else {
        let b1 = Integer::from(&b / &g);
        let d1 = Integer::from(&d / &g);
        let t = Integer::from(&a * &d1) + Integer::from(&c * &b1);
        let g2 = t.clone().gcd(&g);
        let num = if g2 == *Integer::ONE { t } else { Integer::from(&t / &g2) };
        let den = if g2 == *Integer::ONE { a_mul(&b1, &d) } else { a_mul(&b1, &Integer::from(&d / &g2)) };
        make_rational(num, den)
    }
}

fn a_mul(x: &Integer, y: &Integer) -> Integer {
    Integer::from(x * y)
}

/// Exact rational subtraction, `x - y`.
pub fn rational_sub(x: &Number, y: &Number) -> NumResult<Number> {
    rational_add(x, &rational_neg(y)?)
}

/// Exact rational negation.
pub fn rational_neg(x: &Number) -> NumResult<Number> {
    let (n, d) = num_den(x)?;
    make_rational(-n, d)
}

/// Exact rational multiplication, `x * y`, with cross-cancellation before
/// multiplying (`gcd(a, d)` and `gcd(c, b)`) so the intermediate products
/// stay as small as possible.
pub fn rational_mul(x: &Number, y: &Number) -> NumResult<Number> {
    let (mut a, mut b) = num_den(x)?;
    let (mut c, mut d) = num_den(y)?;

    let g1 = a.clone().gcd(&d);
    if g1 != *Integer::ONE {
        a /= &g1;
        d /= &g1;
    }
    let g2 = c.clone().gcd(&b);
    if g2 != *Integer::ONE {
        c /= &g2;
        b /= &g2;
    }

    make_rational(a_mul(&a, &c), a_mul(&b, &d))
}

/// Exact rational reciprocal, `1 / x`. Errors on exact zero (§4.C
/// invariant 5: division by exact zero is a domain error).
pub fn rational_recip(x: &Number) -> NumResult<Number> {
    let (n, d) = num_den(x)?;
    if n.is_zero() {
        return Err(NumError::domain("rational_recip: division by exact zero"));
    }
    make_rational(d, n)
}

/// Exact rational division, `x / y`.
pub fn rational_div(x: &Number, y: &Number) -> NumResult<Number> {
    rational_mul(x, &rational_recip(y)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_rational_reduces_and_normalizes_sign() {
        let r = make_rational(Integer::from(4), Integer::from(-8)).unwrap();
        match r {
            Number::Ratnum(n, d) => {
                assert_eq!(n.to_integer(), Integer::from(-1));
                assert_eq!(d.to_integer(), Integer::from(2));
            }
            other => panic!("expected Ratnum, got {other:?}"),
        }
    }

    #[test]
    fn make_rational_demotes_when_denominator_is_one() {
        let r = make_rational(Integer::from(6), Integer::from(3)).unwrap();
        assert!(matches!(r, Number::Fixint(2)));
    }

    #[test]
    fn make_rational_rejects_zero_denominator() {
        assert!(make_rational(Integer::from(1), Integer::from(0)).is_err());
    }

    #[test]
    fn one_third_plus_one_sixth_is_one_half() {
        let third = make_rational(Integer::from(1), Integer::from(3)).unwrap();
        let sixth = make_rational(Integer::from(1), Integer::from(6)).unwrap();
        let sum = rational_add(&third, &sixth).unwrap();
        let half = make_rational(Integer::from(1), Integer::from(2)).unwrap();
        assert_eq!(num_den(&sum).unwrap(), num_den(&half).unwrap());
    }

    #[test]
    fn division_identity() {
        let a = make_rational(Integer::from(22), Integer::from(7)).unwrap();
        let b = make_rational(Integer::from(3), Integer::from(5)).unwrap();
        let q = rational_div(&a, &b).unwrap();
        let back = rational_mul(&q, &b).unwrap();
        assert_eq!(num_den(&back).unwrap(), num_den(&a).unwrap());
    }

    #[test]
    fn reciprocal_of_zero_is_domain_error() {
        assert!(rational_recip(&Number::zero()).is_err());
    }

    #[test]
    fn no_ratnum_ever_has_denominator_one() {
        for (n, d) in [(2, 4), (10, 5), (-3, 1), (0, 7)] {
            let r = make_rational(Integer::from(n), Integer::from(d)).unwrap();
            if let Number::Ratnum(_, den) = &r {
                assert_ne!(den.to_integer(), Integer::from(1));
            }
        }
    }
}
