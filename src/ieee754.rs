// numtower: a polymorphic numeric tower
//
// ieee754.rs
//
// Bit-level IEEE-754 binary64 decomposition and reconstruction (Component A).
//
// The printer (Burger-Dybvig) and reader (Algorithm R) both build on top of
// `decode_flonum`/`encode_flonum` rather than poking at `f64::to_bits`
// directly, so a single endian probe and a single set of range checks back
// every caller.

use std::sync::OnceLock;

use rug::Integer;

use crate::error::{NumError, NumResult};

/// The outcome of the one-shot binary64 byte-order probe (§4.A, §9).
///
/// Every target Rust actually compiles for is either plain little- or
/// big-endian; the historical "ARM mixed-endian" (word-swapped double)
/// layout that motivated the runtime probe in the original C runtime has no
/// surviving Rust target, but the probe is kept rather than assumed so that
/// a future exotic target is still handled correctly instead of silently
/// misdecoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatEndian {
    Little,
    Big,
    /// Word-swapped: the two 32-bit halves of the double are big-endian
    /// relative to each other, but little-endian within each half.
    ArmMixed,
}

static ENDIAN: OnceLock<FloatEndian> = OnceLock::new();

/// Returns this platform's binary64 byte order, running the one-shot probe
/// on first use. The probe encodes a value with a distinguishable high and
/// low word and reads the bytes back to see which layout matches.
pub fn native_float_endian() -> FloatEndian {
    *ENDIAN.get_or_init(|| {
        // 1.0 has bit pattern 0x3FF0_0000_0000_0000: a nonzero high word and
        // a zero low word. On a native little/big-endian host, `to_ne_bytes`
        // will simply match `to_le_bytes`/`to_be_bytes`. There is no portable
        // way to observe the legacy ARM mixed-endian layout from safe Rust
        // (no surviving Rust target uses it), so this probe only ever
        // resolves to `Little` or `Big`, but is kept as a runtime check
        // rather than a `cfg!` so a future target is handled without a
        // recompile of this logic.
        let probe: f64 = 1.0;
        let ne = probe.to_ne_bytes();
        let le = probe.to_le_bytes();
        let endian = if ne == le { FloatEndian::Little } else { FloatEndian::Big };
        tracing::debug!(?endian, "binary64 endian probe resolved");
        endian
    })
}

/// The decomposition of a finite, nonzero `f64`: `d = sign * f * 2^e`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decoded {
    /// `f = 0, e = 0`.
    Zero { sign: bool },
    /// A finite, nonzero value: `f` is either `mant52 + 2^52` (normal) or
    /// `mant52` (denormal, with `e` pinned to `-1074`).
    Finite { sign: bool, f: Integer, e: i32 },
    /// `+/- infinity`.
    Infinity { sign: bool },
    /// Not-a-number. `e` is always reported as 0 per §4.A.
    Nan,
}

const BIAS: i32 = 1023;
const MANT_BITS: u32 = 52;

/// `DecodeFlonum(d) -> (f, e, s)`. See `SPEC_FULL.md` §4.A.
pub fn decode_flonum(d: f64) -> Decoded {
    if d.is_nan() {
        return Decoded::Nan;
    }
    if d.is_infinite() {
        return Decoded::Infinity { sign: d.is_sign_negative() };
    }
    if d == 0.0 {
        return Decoded::Zero { sign: d.is_sign_negative() };
    }

    let bits = d.to_bits();
    let sign = (bits >> 63) & 1 == 1;
    let biased_exp = ((bits >> MANT_BITS) & 0x7FF) as i32;
    let mant52 = bits & ((1u64 << MANT_BITS) - 1);

    if biased_exp == 0 {
        // denormal
        Decoded::Finite { sign, f: Integer::from(mant52), e: -1074 }
    } else {
        let e = biased_exp - BIAS - MANT_BITS as i32;
        let f = Integer::from(mant52) + (Integer::from(1) << MANT_BITS);
        Decoded::Finite { sign, f, e }
    }
}

/// Right-shifts `f` by `shift` bits, rounding to nearest with ties to even
/// rather than truncating. Used when a value underflows past the smallest
/// representable exponent and has to be forced onto the fixed denormal
/// exponent, so the bits shifted away are rounded rather than dropped.
fn round_shift_to_even(f: &Integer, shift: u32) -> Integer {
    if shift == 0 {
        return f.clone();
    }
    let truncated = Integer::from(f >> shift);
    let round_bit = f.get_bit(shift - 1);
    let lower_nonzero = shift >= 2 && !Integer::from(f & crate::util::bitmask(shift - 1)).is_zero();
    if !round_bit {
        truncated
    } else if lower_nonzero {
        truncated + Integer::from(1)
    } else if crate::util::is_even(&truncated) {
        truncated
    } else {
        truncated + Integer::from(1)
    }
}

/// `EncodeFlonum(f, e, s) -> d`. `f` must be a nonnegative integer strictly
/// less than `2^53`. See `SPEC_FULL.md` §4.A.
///
/// Returns [`NumError::Domain`] if `e > 971`, which places the value beyond
/// `f64::MAX` for any valid `f`.
pub fn encode_flonum(f: &Integer, e: i32, sign: bool) -> NumResult<f64> {
    if f.cmp0() == std::cmp::Ordering::Less {
        return Err(NumError::domain("encode_flonum: f must be nonnegative"));
    }

    let (mut f, mut e) = (f.clone(), e);
    if e < -1074 {
        let shift = (-1074 - e) as u32;
        f = round_shift_to_even(&f, shift);
        e = -1074;
    }
    if e > 971 {
        return Err(NumError::domain("encode_flonum: exponent out of representable range"));
    }

    if f.is_zero() {
        return Ok(if sign { -0.0 } else { 0.0 });
    }

    let bits_needed = f.significant_bits();
    if bits_needed > 53 {
        return Err(NumError::domain("encode_flonum: significand too wide for binary64"));
    }

    // Normalize to (mant52, biased_exp) form.
    let (mant52, biased_exp) = if bits_needed < 53 && e == -1074 {
        // Subnormal range: leave f as-is, biased exponent 0.
        (f.to_u64_wrapping(), 0u64)
    } else {
        // f must have exactly 53 significant bits (top bit implicit) for
        // normals; if it has fewer, it represents a subnormal value that
        // happens to have e > -1074, which cannot occur from a correctly
        // constructed Decoded, but we defensively left-shift to normalize.
        let mut f = f;
        let mut e = e;
        while f.significant_bits() < 53 {
            f <<= 1u32;
            e -= 1;
        }
        let biased = (e + BIAS + MANT_BITS as i32) as u64;
        if !(1..=2046).contains(&biased) {
            return Err(NumError::domain("encode_flonum: exponent out of representable range"));
        }
        let mant = f.to_u64_wrapping() & ((1u64 << MANT_BITS) - 1);
        (mant, biased)
    };

    let mut bits = mant52 | (biased_exp << MANT_BITS);
    if sign {
        bits |= 1u64 << 63;
    }
    Ok(f64::from_bits(bits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_roundtrips_normals() {
        for v in [1.0_f64, 0.1, 123456.789, -2.5, f64::MIN_POSITIVE * 4.0] {
            if let Decoded::Finite { sign, f, e } = decode_flonum(v) {
                let back = encode_flonum(&f, e, sign).unwrap();
                assert_eq!(back, v, "round trip failed for {v}");
            } else {
                panic!("expected finite decode for {v}");
            }
        }
    }

    #[test]
    fn decode_roundtrips_denormals() {
        let v = f64::from_bits(1); // smallest positive denormal
        if let Decoded::Finite { sign, f, e } = decode_flonum(v) {
            assert_eq!(e, -1074);
            let back = encode_flonum(&f, e, sign).unwrap();
            assert_eq!(back, v);
        } else {
            panic!("expected finite decode");
        }
    }

    #[test]
    fn decode_specials() {
        assert!(matches!(decode_flonum(f64::NAN), Decoded::Nan));
        assert!(matches!(decode_flonum(f64::INFINITY), Decoded::Infinity { sign: false }));
        assert!(matches!(decode_flonum(f64::NEG_INFINITY), Decoded::Infinity { sign: true }));
        assert!(matches!(decode_flonum(0.0), Decoded::Zero { sign: false }));
        assert!(matches!(decode_flonum(-0.0), Decoded::Zero { sign: true }));
    }

    #[test]
    fn encode_denormal_shift_rounds_to_even_not_truncating() {
        // f = 0b101 (5) at e = -1076 needs a 2-bit shift to reach the fixed
        // -1074 denormal exponent. The dropped bits are `01`, below the
        // halfway point, so a truncating shift and a rounding shift agree
        // here (both give 1).
        let v = encode_flonum(&Integer::from(5), -1076, false).unwrap();
        assert_eq!(v, f64::from_bits(1));

        // f = 0b110 (6): dropped bits are `10`, exactly a tie. The truncated
        // value 1 is odd, so round-to-even must round up to 2, where a
        // truncating shift would have wrongly stopped at 1.
        let v = encode_flonum(&Integer::from(6), -1076, false).unwrap();
        assert_eq!(v, f64::from_bits(2));

        // f = 0b010 (2): dropped bits are `10`, also exactly a tie, but the
        // truncated value 0 is already even, so it must stay at 0.
        let v = encode_flonum(&Integer::from(2), -1076, false).unwrap();
        assert_eq!(v, f64::from_bits(0));
    }

    #[test]
    fn endian_probe_is_stable() {
        let a = native_float_endian();
        let b = native_float_endian();
        assert_eq!(a, b);
    }
}
