// numtower: a polymorphic numeric tower
//
// printer.rs
//
// Shortest round-trip float printer (Component I), Burger-Dybvig's
// free-format algorithm adapted to exact-integer arithmetic so that every
// digit generated is provably correct rather than an artifact of binary64
// rounding.

use rug::Integer;

use crate::ieee754::{decode_flonum, Decoded};
use crate::intops::exact_integer_expt;
use crate::number::Number;

/// How the printer places the decimal point and, when a fixed precision
/// is requested, how it rounds past the shortest representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrecisionMode {
    /// Stop at the shortest round-trip representation, using
    /// Burger-Dybvig's own digit-generation rounding.
    Shortest,
    /// Generate the shortest representation, then apply a commercial
    /// (round-half-up) rounding of the decimal string to a fixed number
    /// of fractional digits.
    Notational,
}

/// Builder-style configuration for [`print_flonum`], mirroring the
/// `Context::with_*` idiom used elsewhere in this crate.
#[derive(Clone, Debug)]
pub struct PrinterConfig {
    /// Smallest `k` (power-of-ten exponent of the leading digit) that is
    /// still rendered in positional notation; below this, scientific.
    pub exp_lo: i32,
    /// Largest `k` still rendered in positional notation.
    pub exp_hi: i32,
    /// Minimum width of the exponent field in scientific notation.
    pub exp_width: usize,
    /// `Some(p)` caps the output to `p` fractional digits; `None` prints
    /// the full shortest round-trip representation.
    pub precision: Option<usize>,
    pub precision_mode: PrecisionMode,
    pub use_upper: bool,
    pub show_plus: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        PrinterConfig {
            exp_lo: -3,
            exp_hi: 21,
            exp_width: 2,
            precision: None,
            precision_mode: PrecisionMode::Shortest,
            use_upper: false,
            show_plus: false,
        }
    }
}

impl PrinterConfig {
    pub fn with_exp_window(mut self, lo: i32, hi: i32) -> Self {
        self.exp_lo = lo;
        self.exp_hi = hi;
        self
    }

    pub fn with_precision(mut self, p: usize, mode: PrecisionMode) -> Self {
        self.precision = Some(p);
        self.precision_mode = mode;
        self
    }

    pub fn with_show_plus(mut self, show: bool) -> Self {
        self.show_plus = show;
        self
    }
}

/// `PrintFlonum(v, config)`. Specials render as `"+0.0"`/`"-0.0"`,
/// `"+inf.0"`/`"-inf.0"`, `"+nan.0"`.
pub fn print_flonum(v: f64, config: &PrinterConfig) -> String {
    match decode_flonum(v) {
        Decoded::Nan => "+nan.0".to_string(),
        Decoded::Infinity { sign } => if sign { "-inf.0" } else { "+inf.0" }.to_string(),
        Decoded::Zero { sign } => if sign { "-0.0" } else { "0.0" }.to_string(),
        Decoded::Finite { sign, f, e } => {
            let (digits, k) = generate_digits(&f, e, config);
            format_digits(&digits, k, sign, config)
        }
    }
}

/// Generates the shortest sequence of decimal digits `d_1 d_2 ... d_n`
/// such that `0.d_1 d_2 ... d_n * 10^k` round-trips back to the original
/// value, using Burger-Dybvig's scaled-integer free-format algorithm.
/// Returns `(digits, k)`.
fn generate_digits(f: &Integer, e: i32, config: &PrinterConfig) -> (Vec<u8>, i32) {
    let (mut r, mut s, mut mminus, mp2) = if e >= 0 {
        let be = Integer::from(1) << (e as u32);
        if *f == Integer::from(1) << 52u32 {
            (Integer::from(f * &be) << 2u32, Integer::from(4), be, true)
        } else {
            (Integer::from(f * &be) << 1u32, Integer::from(2), be, false)
        }
    } else {
        if *f == Integer::from(1) << 52u32 {
            (Integer::from(f) << 2u32, Integer::from(1) << ((-e + 2) as u32), Integer::from(1), true)
        } else {
            (Integer::from(f) << 1u32, Integer::from(1) << ((-e + 1) as u32), Integer::from(1), false)
        }
    };
    let mut mplus = if mp2 { Integer::from(&mminus * 2) } else { mminus.clone() };

    // Estimate k := ceil(log10(|v|) - 0.1).
    let approx = f.to_f64() * 2f64.powi(e);
    let mut k = (approx.abs().log10() - 0.1).ceil() as i32;

    if k >= 0 {
        s *= exact_integer_expt(&crate::number::make_integer(10), k as i64).expect("small expt").to_integer();
    } else {
        let scale = exact_integer_expt(&crate::number::make_integer(10), (-k) as i64).expect("small expt").to_integer();
        r *= &scale;
        mminus *= &scale;
        mplus = if mp2 { Integer::from(&mminus * 2) } else { mminus.clone() };
    }

    // Fixup: if r + m+ >= s (closed when the mantissa is even), bump k.
    let even = f.is_even();
    let fixup_holds = if even {
        Integer::from(&r + &mplus) >= s
    } else {
        Integer::from(&r + &mplus) > s
    };
    if fixup_holds {
        s *= 10;
        k += 1;
    }

    let mut digits = Vec::new();
    generate_shortest(&mut digits, &mut r, &s, &mut mminus, &mut mplus, mp2, even);

    match (config.precision, config.precision_mode) {
        // Shortest mode always stops at the boundary-tested digit sequence
        // above; a precision cap doesn't change its termination rule.
        (_, PrecisionMode::Shortest) | (None, _) => (digits, k),
        // Notational mode rounds *that* shortest sequence to the requested
        // width, rather than re-deriving digits via long division: the
        // exact binary value's decimal expansion past the shortest
        // representation is an artifact of the binary fraction, not part
        // of the number the shortest digits already round-trip to.
        (Some(p), PrecisionMode::Notational) => round_digits_to_precision(&digits, p, k),
    }
}

/// Rounds `digits` (with decimal point `k` places from the left, per
/// [`format_digits`]'s convention) to `p` *fractional* digits, using
/// commercial (round-half-up) rounding. Since `format_digits` renders
/// `digits.len() - k` digits after the decimal point, the digit array
/// itself must be rounded to length `p + k`. Pads with trailing zeros if
/// `digits` is already shorter than that. Returns the possibly-adjusted
/// `k`, since rounding `9...9` up carries into one more digit than the
/// target length allows.
fn round_digits_to_precision(digits: &[u8], p: usize, mut k: i32) -> (Vec<u8>, i32) {
    let target_len = (p as i64 + k as i64).max(0) as usize;

    if digits.len() <= target_len {
        let mut out = digits.to_vec();
        out.resize(target_len, 0);
        return (out, k);
    }

    let mut out = digits[..target_len].to_vec();
    if digits[target_len] >= 5 {
        let mut i = out.len();
        loop {
            if i == 0 {
                out.insert(0, 1);
                k += 1;
                out.truncate(target_len.max(1));
                break;
            }
            i -= 1;
            if out[i] == 9 {
                out[i] = 0;
            } else {
                out[i] += 1;
                break;
            }
        }
    }
    (out, k)
}

fn generate_shortest(
    digits: &mut Vec<u8>,
    r: &mut Integer,
    s: &Integer,
    mminus: &mut Integer,
    mplus: &mut Integer,
    mp2: bool,
    even: bool,
) {
    loop {
        *r *= 10;
        let (d, rem) = r.clone().div_rem(s.clone());
        *r = rem;
        *mminus *= 10;
        *mplus = if mp2 { Integer::from(&*mminus * 2) } else { mminus.clone() };

        let low = if even { *r <= *mminus } else { *r < *mminus };
        let high = if even { Integer::from(&*r + &*mplus) >= *s } else { Integer::from(&*r + &*mplus) > *s };

        let mut d = d.to_u32_wrapping() as u8;
        if low && !high {
            digits.push(d);
            break;
        } else if high && !low {
            digits.push(d + 1);
            break;
        } else if low && high {
            // tie: round to the digit closer to the true remaining value.
            if Integer::from(&*r * 2) >= *s {
                d += 1;
            }
            digits.push(d);
            break;
        } else {
            digits.push(d);
        }
    }
}

fn format_digits(digits: &[u8], k: i32, sign: bool, config: &PrinterConfig) -> String {
    let mut out = String::new();
    if sign {
        out.push('-');
    } else if config.show_plus {
        out.push('+');
    }

    let digit_char = |d: u8| -> char {
        let c = (b'0' + d) as char;
        if config.use_upper {
            c.to_ascii_uppercase()
        } else {
            c
        }
    };

    if k > config.exp_lo && k <= config.exp_hi {
        // Positional notation.
        if k <= 0 {
            out.push_str("0.");
            for _ in 0..(-k) {
                out.push('0');
            }
            for &d in digits {
                out.push(digit_char(d));
            }
        } else {
            let k = k as usize;
            for (i, &d) in digits.iter().enumerate() {
                if i == k {
                    out.push('.');
                }
                out.push(digit_char(d));
            }
            if digits.len() <= k {
                for _ in digits.len()..k {
                    out.push('0');
                }
                out.push_str(".0");
            }
        }
    } else {
        // Scientific notation: d.ddd e (k-1).
        out.push(digit_char(digits[0]));
        out.push('.');
        if digits.len() > 1 {
            for &d in &digits[1..] {
                out.push(digit_char(d));
            }
        } else {
            out.push('0');
        }
        out.push('e');
        let exp = k - 1;
        if exp >= 0 {
            out.push('+');
        } else {
            out.push('-');
        }
        let mag = exp.unsigned_abs();
        let mag_str = mag.to_string();
        for _ in mag_str.len()..config.exp_width {
            out.push('0');
        }
        out.push_str(&mag_str);
    }
    out
}

/// Convenience entry point for [`Number::Flonum`] values, erroring for
/// anything else (complex numbers print their two halves independently
/// at a higher layer, which is out of scope here).
pub fn print_number(n: &Number, config: &PrinterConfig) -> Option<String> {
    match n {
        Number::Flonum(f) => Some(print_flonum(*f, config)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_print(v: f64) -> String {
        print_flonum(v, &PrinterConfig::default())
    }

    #[test]
    fn prints_simple_integral_values() {
        assert_eq!(default_print(1.0), "1.0");
        assert_eq!(default_print(100.0), "100.0");
    }

    #[test]
    fn prints_shortest_roundtrip_for_tenth() {
        assert_eq!(default_print(0.1), "0.1");
    }

    #[test]
    fn prints_specials() {
        assert_eq!(default_print(f64::NAN), "+nan.0");
        assert_eq!(default_print(f64::INFINITY), "+inf.0");
        assert_eq!(default_print(f64::NEG_INFINITY), "-inf.0");
        assert_eq!(default_print(0.0), "0.0");
        assert_eq!(default_print(-0.0), "-0.0");
    }

    #[test]
    fn uses_scientific_notation_outside_window() {
        let s = default_print(1.0e30);
        assert!(s.contains('e'), "expected scientific notation, got {s}");
    }

    #[test]
    fn negative_values_carry_the_sign() {
        assert_eq!(default_print(-2.5), "-2.5");
    }

    #[test]
    fn notational_precision_pads_shortest_digits_with_zeros() {
        // 0.1's shortest digits are just "1" (k=0); printing it with 20
        // digits of notational precision must zero-pad that shortest
        // sequence, not continue the long division of the exact binary
        // value (which never terminates at "000...").
        let config = PrinterConfig::default().with_precision(20, PrecisionMode::Notational);
        assert_eq!(print_flonum(0.1, &config), "0.10000000000000000000");
    }

    #[test]
    fn notational_precision_rounds_half_up_past_shortest_digits() {
        // 2.5's shortest digits are "25" (k=1), matching exactly one
        // fractional digit, so p=1 leaves them unchanged...
        let config = PrinterConfig::default().with_precision(1, PrecisionMode::Notational);
        assert_eq!(print_flonum(2.5, &config), "2.5");

        // ...but p=0 rounds the "5" away entirely, carrying into the
        // integer part.
        let config = PrinterConfig::default().with_precision(0, PrecisionMode::Notational);
        assert_eq!(print_flonum(2.5, &config), "3.0");
    }

    #[test]
    fn notational_precision_carry_can_shift_the_decimal_point() {
        // 9.5 rounded to zero fractional digits carries the 9 up to 10,
        // which must shift the decimal point (k) rather than overflow the
        // fixed digit budget.
        let config = PrinterConfig::default().with_precision(0, PrecisionMode::Notational);
        assert_eq!(print_flonum(9.5, &config), "10.0");
    }

    #[test]
    fn shortest_mode_ignores_a_precision_cap() {
        // Setting `precision_mode: Shortest` explicitly (even alongside a
        // precision value) must still terminate via the boundary test, not
        // degrade into fixed-width rounding.
        let config = PrinterConfig::default().with_precision(20, PrecisionMode::Shortest);
        assert_eq!(print_flonum(0.1, &config), "0.1");
    }
}
