// numtower: a polymorphic numeric tower
//
// double.rs
//
// Precision-preserving Ratnum -> f64 conversion (Component H), the part
// of the tower where a careless implementation silently loses a ulp.

use rug::Integer;

use crate::ieee754::encode_flonum;
use crate::util::bitmask;

/// `GetDouble` specialized to a ratnum's `(numerator, denominator)` pair.
/// Naive `n.to_f64() / d.to_f64()` is wrong whenever either operand
/// exceeds 53 significant bits: the division can introduce a second
/// rounding that the correctly-rounded answer never would have.
pub fn rational_to_f64(n: &Integer, d: &Integer) -> f64 {
    if n.is_zero() {
        return 0.0;
    }

    let sign = (n.cmp0() == std::cmp::Ordering::Less) != (d.cmp0() == std::cmp::Ordering::Less);
    let n_abs = n.clone().abs();
    let d_abs = d.clone().abs();

    let hi_n = n_abs.significant_bits();
    let hi_d = d_abs.significant_bits();

    // Both operands fit exactly in a double; IEEE division is itself
    // correctly rounded, so there's nothing left to do.
    if hi_n <= 53 && hi_d <= 53 {
        let v = n_abs.to_f64() / d_abs.to_f64();
        return if sign { -v } else { v };
    }

    let diff = hi_n as i64 - hi_d as i64;
    let shift_i = 54 - diff;
    let shift = if shift_i > 0 { shift_i as u32 } else { 0 };

    let shifted_n = Integer::from(&n_abs << shift);
    let q = Integer::from(&shifted_n / &d_abs);
    let rem = Integer::from(&shifted_n % &d_abs);

    let hi_q = q.significant_bits();

    // `q` approximates the true value shifted left by `shift` bits, so
    // dropping `extra` low bits off `q` leaves a mantissa whose value is
    // `mant * 2^(extra - shift)`. Normally `extra` is chosen to leave 53
    // bits (binary64's full precision), but if the unbiased exponent that
    // would produce falls below the normal range's floor of -1022, the
    // result has to land on the fixed -1074 denormal exponent instead,
    // which leaves room for fewer than 53 significant bits. Rounding
    // straight to that narrower width here -- rather than rounding to 53
    // bits and letting the denormal shift in `encode_flonum` truncate a
    // second time -- avoids double-rounding a value that sits near a tie
    // boundary in the denormal range.
    let normalized_exp = hi_q as i64 - 1 - shift as i64;
    let target_bits: u32 = if normalized_exp >= -1022 {
        53
    } else {
        (1075 + normalized_exp).clamp(0, 53) as u32
    };
    let extra = hi_q.saturating_sub(target_bits);

    let (mut mant, mut exp) = if extra == 0 {
        (q, -(shift as i32))
    } else {
        tracing::trace!(extra, target_bits, "rational_to_f64 refining past the trivial bit-width path");
        let truncated = Integer::from(&q >> extra);
        let round_bit = q.get_bit(extra - 1);
        let lower_nonzero = extra >= 2 && !Integer::from(&q & bitmask(extra - 1)).is_zero();
        let sticky = lower_nonzero || !rem.is_zero();

        let rounded = if !round_bit {
            truncated
        } else if sticky {
            truncated + Integer::from(1)
        } else if crate::util::is_even(&truncated) {
            truncated
        } else {
            truncated + Integer::from(1)
        };
        (rounded, extra as i32 - shift as i32)
    };

    // Rounding up may have carried one bit past the intended width. In the
    // full-precision (53-bit) case that overflows binary64's mantissa and
    // must be renormalized; in the denormal case (`target_bits < 53`) a
    // carry simply means the value crossed into the smallest normal, which
    // `encode_flonum` already represents correctly as a 53-bit mantissa at
    // exponent -1074, so no further shift is needed there.
    if target_bits == 53 && mant.significant_bits() > 53 {
        mant >>= 1u32;
        exp += 1;
    }

    match encode_flonum(&mant, exp, sign) {
        Ok(v) => v,
        Err(_) => {
            if sign {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        }
    }
}
