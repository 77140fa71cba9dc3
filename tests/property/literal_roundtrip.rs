//! Property tests for the literal formatter: re-lexing an emitted literal
//! must reproduce the exact original value, bit-for-bit for floating point,
//! independent of any locale.

use proptest::prelude::*;

use pretender::args::LiteralValue;
use pretender::emit::format::format_literal;
use pretender::lexer::{lex, token::Token};

/// Lex one emitted literal back into a token.
fn relex(text: &str) -> Token {
    let tokens = lex(text, 0).expect("formatted literal must lex");
    assert_eq!(tokens.len(), 1, "'{text}' lexed into {} tokens", tokens.len());
    tokens.into_iter().next().unwrap().node
}

proptest! {
    #[test]
    fn ints_round_trip(n in 0i64..) {
        // Negative literals are emitted as a unary minus over the magnitude,
        // so only non-negative values lex back as a single token.
        prop_assert_eq!(relex(&format_literal(&LiteralValue::Int(n))), Token::IntLit(n));
    }

    #[test]
    fn longs_round_trip(n in 0i64..) {
        prop_assert_eq!(relex(&format_literal(&LiteralValue::Long(n))), Token::LongLit(n));
    }

    #[test]
    fn doubles_round_trip_bit_for_bit(
        v in proptest::num::f64::POSITIVE
            | proptest::num::f64::NORMAL
            | proptest::num::f64::SUBNORMAL
            | proptest::num::f64::ZERO
    ) {
        let text = format_literal(&LiteralValue::Double(v));
        match relex(&text) {
            Token::DoubleLit(back) => prop_assert_eq!(back.to_bits(), v.to_bits()),
            other => prop_assert!(false, "unexpected token {:?} for '{}'", other, text),
        }
    }

    #[test]
    fn floats_round_trip_bit_for_bit(
        v in proptest::num::f32::POSITIVE
            | proptest::num::f32::NORMAL
            | proptest::num::f32::SUBNORMAL
            | proptest::num::f32::ZERO
    ) {
        let text = format_literal(&LiteralValue::Float(v));
        match relex(&text) {
            Token::FloatLit(back) => prop_assert_eq!(back.to_bits(), v.to_bits()),
            other => prop_assert!(false, "unexpected token {:?} for '{}'", other, text),
        }
    }

    #[test]
    fn strings_round_trip(s in "[ -~]*") {
        let text = format_literal(&LiteralValue::Str(s.clone()));
        prop_assert_eq!(relex(&text), Token::StringLit(s));
    }

    #[test]
    fn strings_with_escapes_round_trip(s in proptest::collection::vec(
        prop_oneof![Just('"'), Just('\\'), Just('\n'), Just('\t'), Just('a'), Just('π')],
        0..12
    )) {
        let s: String = s.into_iter().collect();
        let text = format_literal(&LiteralValue::Str(s.clone()));
        prop_assert_eq!(relex(&text), Token::StringLit(s));
    }
}

#[test]
fn ieee_specials_are_named_constants() {
    assert_eq!(format_literal(&LiteralValue::Double(f64::NAN)), "double.NaN");
    assert_eq!(
        format_literal(&LiteralValue::Double(f64::INFINITY)),
        "double.PositiveInfinity"
    );
    assert_eq!(
        format_literal(&LiteralValue::Double(f64::NEG_INFINITY)),
        "double.NegativeInfinity"
    );
    assert_eq!(format_literal(&LiteralValue::Float(f32::NAN)), "float.NaN");
    assert_eq!(
        format_literal(&LiteralValue::Float(f32::NEG_INFINITY)),
        "float.NegativeInfinity"
    );
}

#[test]
fn decimal_text_is_preserved_exactly() {
    // Decimals carry their written digits; no binary rounding is allowed.
    let text = format_literal(&LiteralValue::Decimal("79228162514264.337593543950335".to_string()));
    assert_eq!(text, "79228162514264.337593543950335m");
    match relex(&text) {
        Token::DecimalLit(back) => assert_eq!(back, "79228162514264.337593543950335"),
        other => panic!("unexpected token {other:?}"),
    }
}
