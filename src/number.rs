// numtower: a polymorphic numeric tower
//
// number.rs
//
// The `Number` tagged sum and its tower predicates.

use rug::Integer;

/// The Fixint width: `word_bits - 2`, leaving two bits of headroom so that
/// negation of `FIX_MIN` never overflows an `i64`. See the design note in
/// `SPEC_FULL.md` §9.
pub const FIX_BITS: u32 = 62;

/// Largest representable Fixint.
pub const FIX_MAX: i64 = (1i64 << (FIX_BITS - 1)) - 1;

/// Smallest representable Fixint.
pub const FIX_MIN: i64 = -(1i64 << (FIX_BITS - 1));

/// A value of the numeric tower: Fixint, Bignum, Ratnum, Flonum, or Compnum.
///
/// Numbers are immutable after construction; only value equality is
/// observable. The `Bignum` and `Ratnum` arms are backed by `rug::Integer`,
/// which plays the role of the "opaque arbitrary-precision integer engine"
/// that `SPEC_FULL.md` treats as an external collaborator (§6): this crate
/// only ever calls the narrow operation set published there.
#[derive(Clone, Debug)]
pub enum Number {
    /// A signed machine word in `[FIX_MIN, FIX_MAX]`.
    Fixint(i64),
    /// An arbitrary-precision integer that does not fit in a Fixint.
    /// Always normalized: never in `[FIX_MIN, FIX_MAX]`.
    Bignum(Integer),
    /// An exact rational `numerator / denominator` in lowest terms, with
    /// `denominator > 0` and `denominator != 1`. Both arms are always
    /// Fixint or Bignum.
    Ratnum(Box<Number>, Box<Number>),
    /// A binary64 floating-point value.
    Flonum(f64),
    /// A rectangular complex number with `imag != 0.0`.
    Compnum(f64, f64),
}

impl Number {
    /// Constructs the canonical exact zero.
    pub fn zero() -> Self {
        Number::Fixint(0)
    }

    /// Constructs the canonical exact one.
    pub fn one() -> Self {
        Number::Fixint(1)
    }

    /// True for Fixint, Bignum, or Ratnum (the exact numbers).
    pub fn is_exact(&self) -> bool {
        matches!(self, Number::Fixint(_) | Number::Bignum(_) | Number::Ratnum(_, _))
    }

    /// True for Flonum or Compnum (the inexact numbers).
    pub fn is_inexact(&self) -> bool {
        !self.is_exact()
    }

    /// True for Fixint, Bignum, or a Flonum with zero fractional part.
    pub fn is_integer(&self) -> bool {
        match self {
            Number::Fixint(_) | Number::Bignum(_) => true,
            Number::Ratnum(_, _) => false,
            Number::Flonum(f) => f.is_finite() && f.fract() == 0.0,
            Number::Compnum(_, _) => false,
        }
    }

    /// True for any Integer or Ratnum, or a finite Flonum.
    pub fn is_rational(&self) -> bool {
        match self {
            Number::Compnum(_, _) => false,
            Number::Flonum(f) => f.is_finite(),
            _ => true,
        }
    }

    /// True for any Rational or Flonum (i.e. not Compnum).
    pub fn is_real(&self) -> bool {
        !matches!(self, Number::Compnum(_, _))
    }

    /// True for Compnum.
    pub fn is_complex(&self) -> bool {
        matches!(self, Number::Compnum(_, _))
    }

    /// True if this number is exactly zero (for Flonum, `+0.0` or `-0.0`).
    pub fn is_zero(&self) -> bool {
        match self {
            Number::Fixint(i) => *i == 0,
            Number::Bignum(b) => *b == 0,
            Number::Ratnum(_, _) => false, // ratnums are never zero; zero demotes to Fixint(0)
            Number::Flonum(f) => *f == 0.0,
            Number::Compnum(_, _) => false, // compnums never have a zero imaginary part
        }
    }

    /// True if this number is negative (NaN is never negative).
    pub fn is_negative(&self) -> bool {
        match self {
            Number::Fixint(i) => *i < 0,
            Number::Bignum(b) => *b < 0,
            Number::Ratnum(n, _) => n.is_negative(),
            Number::Flonum(f) => *f < 0.0,
            Number::Compnum(r, _) => *r < 0.0,
        }
    }

    /// Returns the sign as `-1`, `0`, or `1` for exact integers and
    /// ratnums; `None` for Flonum/Compnum, where "sign" is not a total
    /// function (consider `-0.0` or `NaN`).
    pub fn sign(&self) -> Option<i32> {
        match self {
            Number::Fixint(i) => Some(i.signum() as i32),
            Number::Bignum(b) => Some(b.cmp0() as i32),
            Number::Ratnum(n, _) => n.sign(),
            _ => None,
        }
    }

    /// Widens this number's exact integer value to an owned `rug::Integer`.
    /// Panics if called on a non-integer Number; callers must check
    /// [`Number::is_integer`] first.
    pub fn to_integer(&self) -> Integer {
        match self {
            Number::Fixint(i) => Integer::from(*i),
            Number::Bignum(b) => b.clone(),
            Number::Flonum(f) if f.is_finite() && f.fract() == 0.0 => {
                Integer::from_f64(*f).expect("integral flonum must convert")
            }
            _ => panic!("to_integer called on a non-integer Number"),
        }
    }

    /// Returns true if this exact integer is odd.
    pub fn is_odd_integer(&self) -> bool {
        match self {
            Number::Fixint(i) => i % 2 != 0,
            Number::Bignum(b) => b.is_odd(),
            _ => false,
        }
    }

    /// Coerces any real number to `f64`, losing precision for large exact
    /// values. Ratnums go through the precision-preserving path in
    /// [`crate::double::rational_to_f64`].
    pub fn to_f64_lossy(&self) -> f64 {
        match self {
            Number::Fixint(i) => *i as f64,
            Number::Bignum(b) => b.to_f64(),
            Number::Ratnum(n, d) => crate::double::rational_to_f64(&n.to_integer(), &d.to_integer()),
            Number::Flonum(f) => *f,
            Number::Compnum(r, _) => *r,
        }
    }
}

/// Constructs a [`Number::Bignum`], demoting to [`Number::Fixint`] when the
/// value fits. This is the canonicalization point every bignum-producing
/// operation must route through (invariant 1 in `SPEC_FULL.md` §3).
pub fn make_integer_from_bignum(b: Integer) -> Number {
    if let Some(i) = b.to_i64() {
        if (FIX_MIN..=FIX_MAX).contains(&i) {
            return Number::Fixint(i);
        }
    }
    Number::Bignum(b)
}

/// `MakeInteger(x)`: Fixint if `x` is in range, else a promoted Bignum.
pub fn make_integer(x: i64) -> Number {
    if (FIX_MIN..=FIX_MAX).contains(&x) {
        Number::Fixint(x)
    } else {
        Number::Bignum(Integer::from(x))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        crate::compare::num_eq(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixint_bounds_dont_overflow_on_negate() {
        assert_eq!(FIX_MIN.checked_neg(), None, "FIX_MIN must overflow i64::neg");
        // but FIX_MIN sits strictly inside i64's range, so this is fine:
        assert!(FIX_MIN > i64::MIN);
        assert!(FIX_MAX < i64::MAX);
    }

    #[test]
    fn make_integer_demotes_in_range() {
        assert!(matches!(make_integer(42), Number::Fixint(42)));
        assert!(matches!(make_integer(FIX_MAX), Number::Fixint(_)));
    }

    #[test]
    fn make_integer_from_bignum_demotes() {
        let small = Integer::from(7);
        assert!(matches!(make_integer_from_bignum(small), Number::Fixint(7)));

        let huge = Integer::from(FIX_MAX) + Integer::from(1);
        assert!(matches!(make_integer_from_bignum(huge), Number::Bignum(_)));
    }

    #[test]
    fn tower_predicates() {
        let fixint = Number::Fixint(3);
        assert!(fixint.is_exact());
        assert!(fixint.is_integer());
        assert!(fixint.is_rational());
        assert!(fixint.is_real());
        assert!(!fixint.is_complex());

        let flo = Number::Flonum(1.5);
        assert!(flo.is_inexact());
        assert!(!flo.is_integer());

        let comp = Number::Compnum(1.0, 2.0);
        assert!(comp.is_inexact());
        assert!(comp.is_complex());
        assert!(!comp.is_real());
    }
}
