// numtower: a polymorphic numeric tower
//
// bignum.rs
//
// The Fixint/Bignum bridge (Component B): clamped extraction to machine
// widths and unsigned-modulus extraction for the bitwise log-ops.
//
// `rug::Integer` plays the role of the external bignum engine from
// `SPEC_FULL.md` §6; every operation below is expressed in terms of the
// narrow method set that contract exposes (`to_i64`, `significant_bits`,
// shifts, `&`), never GMP internals.

use rug::Integer;

use crate::error::{NumError, NumResult};
use crate::number::Number;

/// Controls the behavior of [`get_i64_clamp`] (and its sibling width
/// extractors) when the source value is out of range for the target width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClampPolicy {
    /// Return the out-of-range value unclamped (only sound when the caller
    /// has already range-checked); used internally by the other policies.
    None,
    /// Saturate only values above the target's maximum.
    Hi,
    /// Saturate only values below the target's minimum.
    Lo,
    /// Saturate in both directions.
    Both,
    /// Raise [`NumError::Range`] instead of saturating.
    Error,
}

fn apply_clamp(
    val: &Integer,
    lo: i128,
    hi: i128,
    policy: ClampPolicy,
) -> NumResult<(i128, bool)> {
    if *val < lo {
        match policy {
            ClampPolicy::Lo | ClampPolicy::Both => Ok((lo, true)),
            ClampPolicy::Error => Err(NumError::range("value below representable minimum")),
            ClampPolicy::None | ClampPolicy::Hi => Ok((val.to_i128_wrapping(), true)),
        }
    } else if *val > hi {
        match policy {
            ClampPolicy::Hi | ClampPolicy::Both => Ok((hi, true)),
            ClampPolicy::Error => Err(NumError::range("value above representable maximum")),
            ClampPolicy::None | ClampPolicy::Lo => Ok((val.to_i128_wrapping(), true)),
        }
    } else {
        Ok((val.to_i128().expect("already range-checked against i128 bounds"), false))
    }
}

/// Extracts `x` as an `i64`, honoring `policy` for out-of-range values.
/// Returns `(value, out_of_range)`.
pub fn get_i64_clamp(x: &Number, policy: ClampPolicy) -> NumResult<(i64, bool)> {
    let int = match x {
        Number::Fixint(i) => Integer::from(*i),
        Number::Bignum(b) => b.clone(),
        Number::Flonum(f) if f.is_finite() && f.fract() == 0.0 => {
            Integer::from_f64(*f).expect("integral flonum must convert")
        }
        _ => return Err(NumError::ty("get_i64_clamp requires an exact or integral-valued number")),
    };
    let (v, oor) = apply_clamp(&int, i64::MIN as i128, i64::MAX as i128, policy)?;
    Ok((v as i64, oor))
}

/// Extracts `x` as a `u64`, honoring `policy` for out-of-range values.
pub fn get_u64_clamp(x: &Number, policy: ClampPolicy) -> NumResult<(u64, bool)> {
    let int = match x {
        Number::Fixint(i) => Integer::from(*i),
        Number::Bignum(b) => b.clone(),
        _ => return Err(NumError::ty("get_u64_clamp requires an exact integer")),
    };
    let (v, oor) = apply_clamp(&int, 0, u64::MAX as i128, policy)?;
    Ok((v as u64, oor))
}

macro_rules! narrow_clamp {
    ($name:ident, $ty:ty) => {
        /// Extracts `x` into `
        #[doc = stringify!($ty)]
        /// `, honoring `policy` for out-of-range values.
        pub fn $name(x: &Number, policy: ClampPolicy) -> NumResult<($ty, bool)> {
            let int = match x {
                Number::Fixint(i) => Integer::from(*i),
                Number::Bignum(b) => b.clone(),
                _ => {
                    return Err(NumError::ty(concat!(
                        stringify!($name),
                        " requires an exact integer"
                    )))
                }
            };
            let (v, oor) = apply_clamp(&int, <$ty>::MIN as i128, <$ty>::MAX as i128, policy)?;
            Ok((v as $ty, oor))
        }
    };
}

narrow_clamp!(get_i32_clamp, i32);
narrow_clamp!(get_i16_clamp, i16);
narrow_clamp!(get_i8_clamp, i8);

macro_rules! narrow_clamp_unsigned {
    ($name:ident, $ty:ty) => {
        pub fn $name(x: &Number, policy: ClampPolicy) -> NumResult<($ty, bool)> {
            let int = match x {
                Number::Fixint(i) => Integer::from(*i),
                Number::Bignum(b) => b.clone(),
                _ => {
                    return Err(NumError::ty(concat!(
                        stringify!($name),
                        " requires an exact integer"
                    )))
                }
            };
            let (v, oor) = apply_clamp(&int, 0, <$ty>::MAX as i128, policy)?;
            Ok((v as $ty, oor))
        }
    };
}

narrow_clamp_unsigned!(get_u32_clamp, u32);
narrow_clamp_unsigned!(get_u16_clamp, u16);
narrow_clamp_unsigned!(get_u8_clamp, u8);

/// `GetIntegerUMod(x)`: `x mod 2^64`, the two's-complement wrap used by the
/// bitwise log-ops fast path.
pub fn get_integer_umod64(x: &Number) -> NumResult<u64> {
    let int = match x {
        Number::Fixint(i) => Integer::from(*i),
        Number::Bignum(b) => b.clone(),
        _ => return Err(NumError::ty("get_integer_umod64 requires an exact integer")),
    };
    let masked = int & crate::util::bitmask(64);
    Ok(masked.to_u64_wrapping())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_saturates_both_directions() {
        let big = Number::Bignum(Integer::from(i64::MAX) + Integer::from(100));
        let (v, oor) = get_i32_clamp(&big, ClampPolicy::Both).unwrap();
        assert_eq!(v, i32::MAX);
        assert!(oor);

        let small = Number::Bignum(Integer::from(i64::MIN) - Integer::from(100));
        let (v, oor) = get_i32_clamp(&small, ClampPolicy::Both).unwrap();
        assert_eq!(v, i32::MIN);
        assert!(oor);
    }

    #[test]
    fn clamp_error_policy_raises() {
        let big = Number::Fixint(i64::from(i32::MAX) + 1);
        let err = get_i32_clamp(&big, ClampPolicy::Error).unwrap_err();
        assert!(matches!(err, NumError::Range(_)));
    }

    #[test]
    fn in_range_is_exact_and_unflagged() {
        let n = Number::Fixint(42);
        let (v, oor) = get_i32_clamp(&n, ClampPolicy::Error).unwrap();
        assert_eq!(v, 42);
        assert!(!oor);
    }

    #[test]
    fn umod_wraps_negative_twos_complement() {
        let n = Number::Fixint(-1);
        assert_eq!(get_integer_umod64(&n).unwrap(), u64::MAX);
    }
}
