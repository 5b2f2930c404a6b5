// numtower: a polymorphic numeric tower
//
// reader.rs
//
// The full number-syntax grammar and the correctly-rounded decimal
// literal reader (Component J). Decimal-to-double conversion is routed
// through `crate::double::rational_to_f64` rather than a second,
// independently-maintained Algorithm R bisection: both solve exactly the
// same correctly-rounded-conversion problem, and §4.H's bit-level
// algorithm already is that solution (see DESIGN.md).

use rug::ops::Pow;
use rug::Integer;

use crate::complex::make_complex;
use crate::double::rational_to_f64;
use crate::error::{NumError, NumResult};
use crate::number::{make_integer_from_bignum, Number};
use crate::rational::make_rational;

/// Controls how [`parse_number`] resolves the contextual exactness and
/// strictness of literal parsing. Mirrors the `#e`/`#i`/strict-R7RS flags
/// this crate's number-syntax grammar names.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReaderConfig {
    /// Forces the result to a particular exactness regardless of what the
    /// literal's own syntax implies. `None` means "use whatever the
    /// literal itself specifies, defaulting to exact for integer/rational
    /// forms and inexact for decimal forms".
    pub force_exact: Option<bool>,
    /// When set, digit-group underscores are rejected even with an
    /// explicit radix/exactness prefix present.
    pub strict_r7rs: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Radix {
    Bin = 2,
    Oct = 8,
    Dec = 10,
    Hex = 16,
}

struct Scanner<'a> {
    s: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(s: &'a str) -> Self {
        Scanner { s: s.as_bytes(), pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.s.get(self.pos).copied()
    }

    fn peek_at(&self, off: usize) -> Option<u8> {
        self.s.get(self.pos + off).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eat(&mut self, c: u8) -> bool {
        if self.peek().map(|b| b.to_ascii_lowercase()) == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_str_ci(&mut self, lit: &str) -> bool {
        let lit = lit.as_bytes();
        if self.s.len() >= self.pos + lit.len()
            && self.s[self.pos..self.pos + lit.len()].eq_ignore_ascii_case(lit)
        {
            self.pos += lit.len();
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.s.len()
    }
}

/// Parses a single complete number literal, per the grammar in
/// `SPEC_FULL.md` §4.I/§4.J. Returns [`NumError::Parse`] on any malformed
/// input or trailing garbage.
pub fn parse_number(src: &str, config: &ReaderConfig) -> NumResult<Number> {
    let mut sc = Scanner::new(src);
    let (radix, exactness) = parse_prefix(&mut sc)?;
    let n = parse_complex(&mut sc, radix, exactness, config)?;
    if !sc.at_end() {
        return Err(NumError::parse(format!("trailing characters after number: {src:?}")));
    }
    Ok(n)
}

fn parse_prefix(sc: &mut Scanner) -> NumResult<(Radix, Option<bool>)> {
    let mut radix = None;
    let mut exactness = None;
    for _ in 0..2 {
        if sc.peek() != Some(b'#') {
            break;
        }
        let save = sc.pos;
        sc.bump();
        match sc.peek().map(|b| b.to_ascii_lowercase()) {
            Some(b'b') if radix.is_none() => {
                sc.bump();
                radix = Some(Radix::Bin);
            }
            Some(b'o') if radix.is_none() => {
                sc.bump();
                radix = Some(Radix::Oct);
            }
            Some(b'd') if radix.is_none() => {
                sc.bump();
                radix = Some(Radix::Dec);
            }
            Some(b'x') if radix.is_none() => {
                sc.bump();
                radix = Some(Radix::Hex);
            }
            Some(b'e') if exactness.is_none() => {
                sc.bump();
                exactness = Some(true);
            }
            Some(b'i') if exactness.is_none() => {
                sc.bump();
                exactness = Some(false);
            }
            _ => {
                sc.pos = save;
                break;
            }
        }
    }
    Ok((radix.unwrap_or(Radix::Dec), exactness))
}

fn parse_complex(sc: &mut Scanner, radix: Radix, exactness: Option<bool>, config: &ReaderConfig) -> NumResult<Number> {
    // [<real>] <sign> 'i' or [<real>] <sign> <ureal> 'i'
    let start = sc.pos;
    let real = parse_real(sc, radix, exactness, config);

    if let Ok(re) = &real {
        if sc.eat(b'@') {
            let angle = parse_real(sc, radix, exactness, config)?;
            let is_pi = sc.eat_str_ci("pi");
            return if is_pi {
                crate::complex::make_complex_polar_pi(re, &angle)
            } else {
                crate::complex::make_complex_polar(re, &angle)
            };
        }
    }

    // Try `[<real>] <sign> (<ureal>)? i`
    let after_real_pos = if real.is_ok() { sc.pos } else { start };
    let save = sc.pos;
    sc.pos = after_real_pos;
    if let Some(sign_byte) = sc.peek() {
        if sign_byte == b'+' || sign_byte == b'-' {
            let sign_pos = sc.pos;
            sc.bump();
            let imag = if sc.peek().map(|b| b.to_ascii_lowercase()) == Some(b'i') {
                sc.bump();
                Number::Fixint(1)
            } else {
                let mag = parse_ureal(sc, radix, exactness, config);
                if sc.eat(b'i') {
                    mag?
                } else {
                    sc.pos = save;
                    return real;
                }
            };
            let imag = if sign_byte == b'-' { crate::ops::neg(&imag)? } else { imag };
            let _ = sign_pos;
            let re = real.unwrap_or_else(|_| Number::zero());
            return make_complex(&re, &imag);
        }
    }
    sc.pos = save;
    real
}

fn parse_real(sc: &mut Scanner, radix: Radix, exactness: Option<bool>, config: &ReaderConfig) -> NumResult<Number> {
    let neg = match sc.peek() {
        Some(b'+') => {
            sc.bump();
            false
        }
        Some(b'-') => {
            sc.bump();
            true
        }
        _ => false,
    };

    if sc.eat_str_ci("inf.0") {
        return Ok(Number::Flonum(if neg { f64::NEG_INFINITY } else { f64::INFINITY }));
    }
    if sc.eat_str_ci("nan.0") {
        return Ok(Number::Flonum(f64::NAN));
    }

    let mag = parse_ureal(sc, radix, exactness, config)?;
    if neg {
        crate::ops::neg(&mag)
    } else {
        Ok(mag)
    }
}

fn parse_ureal(sc: &mut Scanner, radix: Radix, exactness: Option<bool>, config: &ReaderConfig) -> NumResult<Number> {
    if radix == Radix::Dec {
        parse_decimal_or_rational(sc, exactness, config)
    } else {
        let n = parse_uint(sc, radix, config)?;
        if sc.eat(b'/') {
            let d = parse_uint(sc, radix, config)?;
            make_rational(n, d)
        } else {
            Ok(make_integer_from_bignum(n))
        }
    }
}

fn digit_value(c: u8, radix: Radix) -> Option<u32> {
    let v = match c {
        b'0'..=b'9' => (c - b'0') as u32,
        b'a'..=b'f' => (c - b'a' + 10) as u32,
        b'A'..=b'F' => (c - b'A' + 10) as u32,
        _ => return None,
    };
    if v < radix as u32 {
        Some(v)
    } else {
        None
    }
}

/// Parses a run of digits (radix-specific), honoring trailing `#` as a
/// silent zero digit (flips contextual exactness to inexact via the
/// returned flag) and interior `_` separators when a prefix was present
/// and strict mode is off.
fn parse_digit_run(sc: &mut Scanner, radix: Radix, allow_underscore: bool) -> NumResult<(Integer, bool, usize)> {
    let mut acc = Integer::from(0);
    let mut count = 0usize;
    let mut saw_hash = false;
    let mut saw_digit = false;

    loop {
        match sc.peek() {
            Some(b'_') if allow_underscore && saw_digit => {
                sc.bump();
            }
            Some(b'#') if saw_digit => {
                sc.bump();
                acc *= radix as u32;
                saw_hash = true;
                count += 1;
            }
            Some(c) => {
                if let Some(v) = digit_value(c, radix) {
                    if saw_hash {
                        return Err(NumError::parse("digit after trailing '#' placeholder"));
                    }
                    sc.bump();
                    acc = acc * (radix as u32) + v;
                    saw_digit = true;
                    count += 1;
                } else {
                    break;
                }
            }
            None => break,
        }
    }

    if !saw_digit {
        return Err(NumError::parse("expected at least one digit"));
    }
    Ok((acc, saw_hash, count))
}

fn parse_uint(sc: &mut Scanner, radix: Radix, config: &ReaderConfig) -> NumResult<Integer> {
    let (v, _, _) = parse_digit_run(sc, radix, !config.strict_r7rs)?;
    Ok(v)
}

fn parse_decimal_or_rational(sc: &mut Scanner, exactness: Option<bool>, config: &ReaderConfig) -> NumResult<Number> {
    // Try uint '/' uint first; fall back to decimal on failure of the '/'.
    let start = sc.pos;
    let (int_part, hashed, _) = parse_digit_run(sc, Radix::Dec, !config.strict_r7rs)?;
    let mut contextual_inexact = hashed;

    if sc.eat(b'/') {
        let (den, hashed2, _) = parse_digit_run(sc, Radix::Dec, !config.strict_r7rs)?;
        contextual_inexact |= hashed2;
        let r = make_rational(int_part, den)?;
        return finalize_exactness(r, exactness, contextual_inexact);
    }

    // Not a ratio: re-scan as a decimal starting from the integer part
    // already consumed (sc.pos is just past int_part's digits).
    let mut frac_digits = 0i32;
    let mut mantissa = int_part;

    let _ = start;
    if sc.eat(b'.') {
        let frac_start = sc.pos;
        if let Ok((frac, hashed_frac, count)) = parse_digit_run(sc, Radix::Dec, !config.strict_r7rs) {
            contextual_inexact |= hashed_frac;
            mantissa = mantissa * Integer::from(10u32).pow(count as u32) + frac;
            frac_digits = count as i32;
        } else {
            sc.pos = frac_start;
        }
    }

    let mut exp: i32 = 0;
    if let Some(c) = sc.peek() {
        if matches!(c.to_ascii_lowercase(), b'e' | b's' | b'f' | b'd' | b'l') {
            let save = sc.pos;
            sc.bump();
            let exp_neg = match sc.peek() {
                Some(b'+') => {
                    sc.bump();
                    false
                }
                Some(b'-') => {
                    sc.bump();
                    true
                }
                _ => false,
            };
            match parse_digit_run(sc, Radix::Dec, !config.strict_r7rs) {
                Ok((e, _, _)) => {
                    let e: i32 = e.to_i32().unwrap_or(i32::MAX);
                    exp = if exp_neg { -e } else { e };
                }
                Err(_) => sc.pos = save,
            }
        }
    }

    let total_exp = exp - frac_digits;
    let resolved = resolve_exactness(exactness.or(config.force_exact), contextual_inexact);

    if total_exp.unsigned_abs() >= 325 {
        if resolved == Some(true) {
            return Err(NumError::domain("decimal exponent magnitude exceeds implementation limit"));
        }
        let v = if total_exp > 0 { f64::INFINITY } else { 0.0 };
        return Ok(Number::Flonum(if mantissa.cmp0() == std::cmp::Ordering::Less { -v } else { v }));
    }

    let looked_decimal = frac_digits > 0 || exp != 0;

    if resolved == Some(true) {
        build_exact_decimal(mantissa, total_exp)
    } else if resolved == Some(false) || looked_decimal {
        let v = build_inexact_decimal(&mantissa, total_exp);
        Ok(Number::Flonum(v))
    } else {
        Ok(make_integer_from_bignum(mantissa))
    }
}

fn build_exact_decimal(mantissa: Integer, exp: i32) -> NumResult<Number> {
    if exp >= 0 {
        Ok(make_integer_from_bignum(mantissa * Integer::from(10u32).pow(exp as u32)))
    } else {
        make_rational(mantissa, Integer::from(10u32).pow((-exp) as u32))
    }
}

fn build_inexact_decimal(mantissa: &Integer, exp: i32) -> f64 {
    if exp >= 0 {
        rational_to_f64(&(mantissa.clone() * Integer::from(10u32).pow(exp as u32)), &Integer::from(1))
    } else {
        rational_to_f64(mantissa, &Integer::from(10u32).pow((-exp) as u32))
    }
}

/// Resolves an explicit exactness marker (`#e`/`#i`, or a config-level
/// default standing in for one) against a trailing-`#` contextual
/// inexactness flag. An explicit marker always wins outright; the
/// contextual flag only applies when no explicit marker was given at all,
/// since a placeholder digit's uncertainty is superseded by the writer
/// saying what they meant.
fn resolve_exactness(explicit: Option<bool>, contextual_inexact: bool) -> Option<bool> {
    match explicit {
        Some(b) => Some(b),
        None if contextual_inexact => Some(false),
        None => None,
    }
}

fn finalize_exactness(n: Number, exactness: Option<bool>, contextual_inexact: bool) -> NumResult<Number> {
    match resolve_exactness(exactness, contextual_inexact) {
        Some(true) => crate::round::exact(&n),
        Some(false) => crate::round::inexact(&n),
        None => Ok(n),
    }
}
