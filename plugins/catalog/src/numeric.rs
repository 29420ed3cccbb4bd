use std::fmt;

use bitflags::bitflags;
use logfield_api::{ConvertError, Handler};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Value, json};

use crate::primitives::float;

// ═══════════════════════════════════════════════════════════════
//  Complex
// ═══════════════════════════════════════════════════════════════

/// A complex number with `f64` parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im.is_sign_negative() {
            write!(f, "{}-{}i", self.re, -self.im)
        } else {
            write!(f, "{}+{}i", self.re, self.im)
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Decimal
// ═══════════════════════════════════════════════════════════════

/// Sign, coefficient digits and exponent of a decimal.
///
/// `1.50` is digits `[1, 5, 0]` with exponent -2: trailing zeros carried by
/// the scale are kept.
pub fn decimal_parts(value: &Decimal) -> DecimalParts {
    DecimalParts {
        sign: u8::from(value.is_sign_negative()),
        digits: value
            .mantissa()
            .unsigned_abs()
            .to_string()
            .bytes()
            .map(|b| b - b'0')
            .collect(),
        exponent: -(value.scale() as i32),
    }
}

/// Digit-tuple form of a decimal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalParts {
    /// 0 for positive, 1 for negative.
    pub sign: u8,
    pub digits: Vec<u8>,
    pub exponent: i32,
}

// ═══════════════════════════════════════════════════════════════
//  Decimal context
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rounding {
    Ceiling,
    Down,
    Floor,
    HalfDown,
    #[default]
    HalfEven,
    HalfUp,
    Up,
    ZeroFiveUp,
}

impl Rounding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rounding::Ceiling => "ROUND_CEILING",
            Rounding::Down => "ROUND_DOWN",
            Rounding::Floor => "ROUND_FLOOR",
            Rounding::HalfDown => "ROUND_HALF_DOWN",
            Rounding::HalfEven => "ROUND_HALF_EVEN",
            Rounding::HalfUp => "ROUND_HALF_UP",
            Rounding::Up => "ROUND_UP",
            Rounding::ZeroFiveUp => "ROUND_05UP",
        }
    }
}

bitflags! {
    /// Exceptional conditions a decimal context can record or trap.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Signals: u16 {
        const CLAMPED = 1 << 0;
        const DIVISION_BY_ZERO = 1 << 1;
        const INEXACT = 1 << 2;
        const INVALID_OPERATION = 1 << 3;
        const OVERFLOW = 1 << 4;
        const ROUNDED = 1 << 5;
        const SUBNORMAL = 1 << 6;
        const UNDERFLOW = 1 << 7;
        const FLOAT_OPERATION = 1 << 8;
    }
}

fn signal_names(signals: Signals) -> Value {
    Value::Array(signals.iter_names().map(|(name, _)| Value::from(name)).collect())
}

/// Arithmetic settings for decimal operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalContext {
    pub precision: u32,
    pub rounding: Rounding,
    pub emin: i64,
    pub emax: i64,
    pub capitals: bool,
    pub clamp: bool,
    pub flags: Signals,
    pub traps: Signals,
}

impl Default for DecimalContext {
    fn default() -> Self {
        Self {
            precision: 28,
            rounding: Rounding::HalfEven,
            emin: -999_999,
            emax: 999_999,
            capitals: true,
            clamp: false,
            flags: Signals::empty(),
            traps: Signals::INVALID_OPERATION | Signals::DIVISION_BY_ZERO | Signals::OVERFLOW,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Handlers
// ═══════════════════════════════════════════════════════════════

/// Integer when the scale is zero, otherwise the nearest `f64`.
fn decimal(v: &Decimal) -> Result<Value, ConvertError> {
    let out_of_range = || ConvertError::range("Decimal", format!("{v} does not fit in 64 bits"));
    if v.scale() > 0 {
        return v.to_f64().map(float).ok_or_else(out_of_range);
    }
    if let Some(small) = v.to_i64() {
        return Ok(Value::from(small));
    }
    v.to_u64().map(Value::from).ok_or_else(out_of_range)
}

pub fn handlers() -> Vec<Handler> {
    vec![
        Handler::exact::<Complex, _>("complex", |v| Value::Array(vec![float(v.re), float(v.im)])),
        Handler::try_exact::<Decimal, _>("decimal", decimal),
        Handler::exact::<DecimalParts, _>("decimal_parts", |v| {
            json!({"sign": v.sign, "digits": v.digits, "exponent": v.exponent})
        }),
        Handler::exact::<DecimalContext, _>("decimal_context", |v| {
            json!({
                "prec": v.precision,
                "rounding": v.rounding.as_str(),
                "Emin": v.emin,
                "Emax": v.emax,
                "capitals": u8::from(v.capitals),
                "clamp": u8::from(v.clamp),
                "flags": signal_names(v.flags),
                "traps": signal_names(v.traps),
            })
        }),
    ]
}
