// numtower: a polymorphic numeric tower
//
// dispatch.rs
//
// The host extension surface (Component E/§6): the generic-dispatch
// fallback for non-numeric operands and the `real->rational` hook that
// `Exact` delegates to for a fractional flonum. This is the only place an
// embedder needs to plug in to extend the tower past what this crate
// defines on its own.

use rug::Integer;

use crate::error::{NumError, NumResult};
use crate::number::Number;

/// The host hooks the numeric tower falls through to. A crate embedding
/// this tower inside a larger runtime (with its own generic-function
/// dispatch or its own simplest-rational search) implements this trait
/// and threads it through instead of [`DefaultHost`].
pub trait HostDispatch {
    /// Called when `+` is asked to add a `Number` to something this crate
    /// does not know how to interpret as a number. The default reports a
    /// type error, since this crate has no notion of non-numeric operands
    /// on its own.
    fn generic_add(&self, _lhs: &Number, _rhs_repr: &str) -> NumResult<Number> {
        Err(NumError::ty("generic_+: non-numeric operand"))
    }

    fn generic_sub(&self, _lhs: &Number, _rhs_repr: &str) -> NumResult<Number> {
        Err(NumError::ty("generic_-: non-numeric operand"))
    }

    fn generic_mul(&self, _lhs: &Number, _rhs_repr: &str) -> NumResult<Number> {
        Err(NumError::ty("generic_*: non-numeric operand"))
    }

    fn generic_div(&self, _lhs: &Number, _rhs_repr: &str) -> NumResult<Number> {
        Err(NumError::ty("generic_/: non-numeric operand"))
    }

    /// Builds the exact rational a fractional flonum `sign * mant * 2^e`
    /// denotes. The default builds the exact dyadic value directly; a
    /// host with a Stern-Brocot simplest-rational search overrides this to
    /// return the simplest rational within one ulp instead.
    fn real_to_rational(&self, sign: bool, mant: &Integer, e: i32) -> NumResult<Number> {
        let n = if sign { -mant.clone() } else { mant.clone() };
        if e >= 0 {
            crate::rational::make_rational(n << (e as u32), Integer::from(1))
        } else {
            crate::rational::make_rational(n, Integer::from(1) << ((-e) as u32))
        }
    }
}

/// The no-embedding-host default: non-numeric operands are always a type
/// error, and `real->rational` builds the exact dyadic value.
pub struct DefaultHost;

impl HostDispatch for DefaultHost {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_host_rejects_generic_dispatch() {
        let host = DefaultHost;
        let err = host.generic_add(&Number::Fixint(1), "<opaque>").unwrap_err();
        assert!(matches!(err, NumError::Type(_)));
    }

    #[test]
    fn real_to_rational_builds_exact_dyadic_value() {
        let host = DefaultHost;
        // 0.5 decodes to mant=1, e=-1 (before the +2^52 bias is stripped by the caller);
        // here we exercise the raw formula directly: mant=3, e=-2 => 3/4.
        let r = host.real_to_rational(false, &Integer::from(3), -2).unwrap();
        assert_eq!(r, crate::rational::make_rational(Integer::from(3), Integer::from(4)).unwrap());
    }

    #[test]
    fn real_to_rational_honors_sign() {
        let host = DefaultHost;
        let r = host.real_to_rational(true, &Integer::from(1), -1).unwrap();
        assert_eq!(r, crate::rational::make_rational(Integer::from(-1), Integer::from(2)).unwrap());
    }
}
