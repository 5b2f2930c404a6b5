// numtower: a polymorphic numeric tower
//
// complex.rs
//
// The complex core (Component D): rectangular/polar construction and the
// accessors built on top of it.

use std::f64::consts::PI;

use crate::error::{NumError, NumResult};
use crate::number::Number;

/// `MakeComplex(re, im)`: builds a rectangular complex number, demoting to
/// a real when the imaginary part is (or reduces to) zero.
///
/// An exact zero imaginary part demotes immediately, keeping `re` exact.
/// An inexact imaginary part that happens to convert to `0.0` still
/// demotes, but the result is necessarily inexact (it has already lost
/// whatever exactness `re` had, since both halves of a `Compnum` share a
/// single numeric type).
pub fn make_complex(re: &Number, im: &Number) -> NumResult<Number> {
    if !re.is_real() || !im.is_real() {
        return Err(NumError::ty("make_complex requires two real arguments"));
    }
    if im.is_exact() && im.is_zero() {
        return Ok(re.clone());
    }
    let re_f = re.to_f64_lossy();
    let im_f = im.to_f64_lossy();
    if im_f == 0.0 {
        Ok(Number::Flonum(re_f))
    } else {
        Ok(Number::Compnum(re_f, im_f))
    }
}

/// `MakeComplexPolar(mag, angle)`: `mag * cos(angle) + i * mag * sin(angle)`.
pub fn make_complex_polar(mag: &Number, angle: &Number) -> NumResult<Number> {
    if !mag.is_real() || !angle.is_real() {
        return Err(NumError::ty("make_complex_polar requires two real arguments"));
    }
    let m = mag.to_f64_lossy();
    let a = angle.to_f64_lossy();
    make_complex(&Number::Flonum(m * a.cos()), &Number::Flonum(m * a.sin()))
}

/// `MakeComplexPolarPI(mag, turns)`: like [`make_complex_polar`], but the
/// angle is given as a multiple of pi (`angle = turns * PI`), and the
/// sin/cos evaluation is range-reduced against that multiple directly so
/// that quarter-turns land on exact `0.0`/`1.0`/`-1.0` instead of an
/// epsilon-sized residual from evaluating `sin`/`cos` on a floating-point
/// approximation of pi.
pub fn make_complex_polar_pi(mag: &Number, turns: &Number) -> NumResult<Number> {
    if !mag.is_real() || !turns.is_real() {
        return Err(NumError::ty("make_complex_polar_pi requires two real arguments"));
    }
    let m = mag.to_f64_lossy();
    let t = turns.to_f64_lossy();
    make_complex(&Number::Flonum(m * cos_pi(t)), &Number::Flonum(m * sin_pi(t)))
}

/// `cos(turns * PI)`, range-reduced so that quarter-integer `turns` produce
/// exact results.
pub fn cos_pi(turns: f64) -> f64 {
    sin_pi(turns + 0.5)
}

/// `sin(turns * PI)`, range-reduced modulo 2 and then snapped to the four
/// axis values at quarter turns before falling back to the library `sin`.
pub fn sin_pi(turns: f64) -> f64 {
    if !turns.is_finite() {
        return f64::NAN;
    }
    // Reduce to [0, 2).
    let mut t = turns % 2.0;
    if t < 0.0 {
        t += 2.0;
    }
    if t == 0.0 || t == 1.0 {
        return 0.0;
    }
    if t == 0.5 {
        return 1.0;
    }
    if t == 1.5 {
        return -1.0;
    }
    (t * PI).sin()
}

/// `RealPart(z)`.
pub fn real_part(z: &Number) -> NumResult<Number> {
    match z {
        Number::Compnum(r, _) => Ok(Number::Flonum(*r)),
        _ if z.is_real() => Ok(z.clone()),
        _ => Err(NumError::ty("real_part requires a complex or real number")),
    }
}

/// `ImagPart(z)`: for any real (non-complex) argument, the exact integer
/// zero, since a real number's imaginary part carries no inexactness of
/// its own.
pub fn imag_part(z: &Number) -> NumResult<Number> {
    match z {
        Number::Compnum(_, i) => Ok(Number::Flonum(*i)),
        _ if z.is_real() => Ok(Number::zero()),
        _ => Err(NumError::ty("imag_part requires a complex or real number")),
    }
}

/// `Conjugate(z)`.
pub fn conjugate(z: &Number) -> NumResult<Number> {
    match z {
        Number::Compnum(r, i) => Ok(Number::Compnum(*r, -*i)),
        _ if z.is_real() => Ok(z.clone()),
        _ => Err(NumError::ty("conjugate requires a complex or real number")),
    }
}

/// `Magnitude(z)`: the complex modulus, or `abs(z)` for a real argument.
pub fn magnitude(z: &Number) -> NumResult<Number> {
    match z {
        Number::Compnum(r, i) => Ok(Number::Flonum(r.hypot(*i))),
        _ if z.is_real() => Ok(Number::Flonum(z.to_f64_lossy().abs())),
        _ => Err(NumError::ty("magnitude requires a complex or real number")),
    }
}

/// `Angle(z)`: the complex argument in `(-PI, PI]`, or `0`/`PI` for a real
/// argument depending on sign.
pub fn angle(z: &Number) -> NumResult<Number> {
    match z {
        Number::Compnum(r, i) => Ok(Number::Flonum(i.atan2(*r))),
        _ if z.is_real() => {
            let v = z.to_f64_lossy();
            Ok(Number::Flonum(if v.is_sign_negative() && v != 0.0 { PI } else { 0.0 }))
        }
        _ => Err(NumError::ty("angle requires a complex or real number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_complex_demotes_exact_zero_imag() {
        let z = make_complex(&Number::Fixint(3), &Number::zero()).unwrap();
        assert!(matches!(z, Number::Fixint(3)));
    }

    #[test]
    fn make_complex_keeps_nonzero_imag() {
        let z = make_complex(&Number::Fixint(3), &Number::Fixint(4)).unwrap();
        assert!(matches!(z, Number::Compnum(r, i) if r == 3.0 && i == 4.0));
    }

    #[test]
    fn sin_pi_is_exact_at_quarter_turns() {
        assert_eq!(sin_pi(0.0), 0.0);
        assert_eq!(sin_pi(0.5), 1.0);
        assert_eq!(sin_pi(1.0), 0.0);
        assert_eq!(sin_pi(1.5), -1.0);
        assert_eq!(cos_pi(0.0), 1.0);
        assert_eq!(cos_pi(0.5), 0.0);
    }

    #[test]
    fn polar_pi_half_turn_is_purely_imaginary() {
        let z = make_complex_polar_pi(&Number::Fixint(1), &Number::Flonum(0.5)).unwrap();
        match z {
            Number::Compnum(r, i) => {
                assert!(r.abs() < 1e-12);
                assert!((i - 1.0).abs() < 1e-12);
            }
            other => panic!("expected Compnum, got {other:?}"),
        }
    }

    #[test]
    fn magnitude_of_three_four_is_five() {
        let z = Number::Compnum(3.0, 4.0);
        let m = magnitude(&z).unwrap();
        assert!(matches!(m, Number::Flonum(f) if (f - 5.0).abs() < 1e-12));
    }

    #[test]
    fn conjugate_negates_imag() {
        let z = Number::Compnum(1.0, 2.0);
        assert!(matches!(conjugate(&z).unwrap(), Number::Compnum(r, i) if r == 1.0 && i == -2.0));
    }

    #[test]
    fn real_imag_of_a_real_number() {
        let r = Number::Fixint(5);
        assert!(matches!(real_part(&r).unwrap(), Number::Fixint(5)));
        assert!(matches!(imag_part(&r).unwrap(), Number::Fixint(0)));
    }
}
