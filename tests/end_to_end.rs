// End-to-end scenarios exercising the numeric tower as a caller would:
// parse a literal, operate on it, print or compare the result.

use rug::Integer;

use numtower::reader::{parse_number, ReaderConfig};
use numtower::{ops, print_flonum, round, Number, PrinterConfig};

fn parse(s: &str) -> Number {
    parse_number(s, &ReaderConfig::default()).unwrap()
}

#[test]
fn ratnum_addition_reduces_to_lowest_terms() {
    let third = parse("1/3");
    let sixth = parse("1/6");
    let sum = ops::add(&third, &sixth).unwrap();
    assert_eq!(sum, parse("1/2"));
}

#[test]
fn print_of_one_tenth_is_shortest_and_parses_back_bit_exact() {
    let printed = print_flonum(0.1, &PrinterConfig::default());
    assert_eq!(printed, "0.1");
    let parsed = parse(&printed);
    assert!(matches!(parsed, Number::Flonum(f) if f.to_bits() == 0.1f64.to_bits()));
}

#[test]
fn rational_to_double_is_one_ulp_above_one_not_two() {
    let r = parse("3002399751580332/3002399751580331");
    let d = numtower::double::rational_to_f64(&Integer::from(3002399751580332i64), &Integer::from(3002399751580331i64));
    assert_eq!(d, f64::from_bits(1.0f64.to_bits() + 1));
    let _ = r;
}

#[test]
fn quotient_and_both_modulo_flavors() {
    assert_eq!(numtower::intops::quotient(&Number::Fixint(7), &Number::Fixint(-2)).unwrap(), Number::Fixint(-3));
    assert_eq!(numtower::intops::modulo(&Number::Fixint(7), &Number::Fixint(-2), false).unwrap(), Number::Fixint(-1));
    assert_eq!(numtower::intops::modulo(&Number::Fixint(7), &Number::Fixint(-2), true).unwrap(), Number::Fixint(1));
}

#[test]
fn ash_and_bitwise_ops() {
    assert_eq!(numtower::intops::ash(&Number::Fixint(-1), 3).unwrap(), Number::Fixint(-8));
    assert_eq!(numtower::intops::ash(&Number::Fixint(-8), -2).unwrap(), Number::Fixint(-2));
    assert_eq!(numtower::intops::lognot(&Number::Fixint(0)).unwrap(), Number::Fixint(-1));
    assert_eq!(numtower::intops::logand(&Number::Fixint(-1), &Number::Fixint(5)).unwrap(), Number::Fixint(5));
}

#[test]
fn exact_integer_expt_two_to_the_hundred() {
    let r = numtower::intops::exact_integer_expt(&Number::Fixint(2), 100).unwrap();
    let expected = Integer::from(1) << 100u32;
    assert_eq!(r.to_integer(), expected);
    assert_eq!(expected.to_string(), "1267650600228229401496703205376");
    assert_eq!(expected.to_string_radix(16), "10000000000000000000000000");
}

#[test]
fn huge_exponent_decimal_saturates_to_infinity_when_inexact() {
    let n = parse("1e400");
    assert!(matches!(n, Number::Flonum(f) if f == f64::INFINITY));
}

#[test]
fn huge_exponent_decimal_is_domain_error_when_forced_exact() {
    let err = parse_number("#e1e400", &ReaderConfig::default()).unwrap_err();
    assert!(matches!(err, numtower::NumError::Domain(_)));
}

#[test]
fn exact_vs_inexact_comparison_is_transitive_not_lossy() {
    // 2^53 + 1 is not exactly representable as f64 (2^53 rounds down to it),
    // so a naive f64 comparison would wrongly call these equal.
    let exact = numtower::number::make_integer_from_bignum((Integer::from(1) << 53u32) + Integer::from(1));
    let flo = Number::Flonum(2f64.powi(53));
    assert!(numtower::compare::num_gt(&exact, &flo));
}

#[test]
fn round_never_emits_negative_zero_flonum() {
    let r = round::round(&Number::Flonum(-0.2), round::RoundMode::Round).unwrap();
    assert!(matches!(r, Number::Flonum(f) if f == 0.0 && f.is_sign_positive()));
}

#[test]
fn canonical_forms_hold_after_construction() {
    let demoted_ratnum = numtower::rational::make_rational(Integer::from(6), Integer::from(3)).unwrap();
    assert!(!matches!(demoted_ratnum, Number::Ratnum(_, _)));

    let demoted_bignum = numtower::number::make_integer_from_bignum(Integer::from(5));
    assert!(matches!(demoted_bignum, Number::Fixint(5)));

    let demoted_compnum = numtower::complex::make_complex(&Number::Fixint(3), &Number::zero()).unwrap();
    assert!(!matches!(demoted_compnum, Number::Compnum(_, _)));
}
