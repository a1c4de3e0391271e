//! Literal semantics: minimal-width inference, radix-preserving formatting
//! and two's-complement reinterpretation.

use std::fmt;

use cport_types::{FloatType, IntType, TypeEnv, TypeId};

use crate::error::LiteralError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Radix {
    Bin,
    Oct,
    Dec,
    Hex,
}

impl Radix {
    pub fn base(self) -> u32 {
        match self {
            Radix::Bin => 2,
            Radix::Oct => 8,
            Radix::Dec => 10,
            Radix::Hex => 16,
        }
    }
}

/// Integer constant.
///
/// The magnitude is stored apart from the sign, so the most negative
/// 64-bit value is representable and negation is always checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntLit {
    magnitude: u64,
    negative: bool,
    radix: Radix,
}

impl IntLit {
    pub fn zero() -> Self {
        Self::from_u64(0)
    }

    pub fn from_u64(value: u64) -> Self {
        Self::with_radix(value, false, Radix::Dec)
    }

    pub fn from_i64(value: i64) -> Self {
        Self::with_radix(value.unsigned_abs(), value < 0, Radix::Dec)
    }

    fn with_radix(magnitude: u64, negative: bool, radix: Radix) -> Self {
        Self {
            magnitude,
            negative: negative && magnitude != 0,
            radix,
        }
    }

    /// Parses legacy literal text: `u`/`l` suffixes are dropped, `0x`, `0b`
    /// and leading-`0` prefixes select the radix, and a leading `-` is
    /// accepted so formatted literals parse back.
    pub fn parse(text: &str) -> Result<Self, LiteralError> {
        let lower = text.trim().to_ascii_lowercase();
        let (negative, body) = match lower.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, lower.as_str()),
        };
        let body = body.trim_end_matches(['u', 'l']);
        if body.is_empty() {
            return Err(LiteralError::Empty);
        }
        let (radix, digits) = if let Some(d) = body.strip_prefix("0x") {
            (Radix::Hex, d)
        } else if let Some(d) = body.strip_prefix("0b") {
            (Radix::Bin, d)
        } else if body.len() > 1 && body.starts_with('0') {
            (Radix::Oct, &body[1..])
        } else {
            (Radix::Dec, body)
        };
        let magnitude = u64::from_str_radix(digits, radix.base()).map_err(|e| {
            use std::num::IntErrorKind;
            match e.kind() {
                IntErrorKind::PosOverflow => LiteralError::TooLarge(text.to_owned()),
                IntErrorKind::Empty => LiteralError::Empty,
                _ => LiteralError::InvalidDigits {
                    text: text.to_owned(),
                    radix: radix.base(),
                },
            }
        })?;
        if negative && magnitude > 1u64 << 63 {
            return Err(LiteralError::TooLarge(text.to_owned()));
        }
        Ok(Self::with_radix(magnitude, negative, radix))
    }

    pub fn magnitude(self) -> u64 {
        self.magnitude
    }

    pub fn is_negative(self) -> bool {
        self.negative
    }

    pub fn is_uint(self) -> bool {
        !self.negative
    }

    pub fn is_zero(self) -> bool {
        self.magnitude == 0
    }

    pub fn is_one(self) -> bool {
        self.magnitude == 1 && !self.negative
    }

    pub fn radix(self) -> Radix {
        self.radix
    }

    /// Smallest untyped integer holding the value: unsigned by magnitude
    /// for non-negative values, signed by range otherwise.
    pub fn min_type(self) -> IntType {
        let m = self.magnitude;
        if !self.negative {
            let size = match m {
                0..=0xff => 1,
                0x100..=0xffff => 2,
                0x1_0000..=0xffff_ffff => 4,
                _ => 8,
            };
            return IntType::untyped(size, false);
        }
        let size = match m {
            0..=0x80 => 1,
            0x81..=0x8000 => 2,
            0x8001..=0x8000_0000 => 4,
            _ => 8,
        };
        IntType::untyped(size, true)
    }

    /// Whether the value is representable in `t` without wrapping.
    pub fn fits(self, t: IntType) -> bool {
        if t.size() > 8 {
            return !self.negative || t.is_signed();
        }
        if self.negative {
            t.is_signed() && self.magnitude <= t.min_magnitude()
        } else {
            self.magnitude <= t.max_magnitude()
        }
    }

    /// Type of the literal in a context expecting `exp`: the expected
    /// integer type when the value fits, the minimal untyped type otherwise.
    pub fn ctype_in(self, env: &TypeEnv, exp: Option<TypeId>) -> TypeId {
        let min = self.min_type();
        if let Some(exp) = exp
            && let Some(t) = env.int_of(exp)
            && min.size() <= t.size()
            && self.fits(t)
        {
            return exp;
        }
        env.int_type(min)
    }

    pub fn to_i64(self) -> Option<i64> {
        if self.negative {
            0i64.checked_sub_unsigned(self.magnitude)
        } else {
            i64::try_from(self.magnitude).ok()
        }
    }

    /// Exact value; every literal fits.
    pub fn to_i128(self) -> i128 {
        let m = i128::from(self.magnitude);
        if self.negative { -m } else { m }
    }

    pub fn to_u64(self) -> Option<u64> {
        (!self.negative).then_some(self.magnitude)
    }

    /// Flips the sign. Fails when a non-negative magnitude exceeds
    /// `i64::MAX`.
    pub fn negate(self) -> Result<Self, LiteralError> {
        if self.negative {
            return Ok(Self::with_radix(self.magnitude, false, self.radix));
        }
        if self.magnitude > i64::MAX as u64 {
            return Err(LiteralError::CannotNegate(self.magnitude));
        }
        Ok(Self::with_radix(self.magnitude, true, self.radix))
    }

    /// Multiplies by a signed factor, `None` on 64-bit overflow.
    pub fn checked_mul(self, factor: i64) -> Option<Self> {
        let magnitude = self.magnitude.checked_mul(factor.unsigned_abs())?;
        Some(Self::with_radix(
            magnitude,
            self.negative != (factor < 0),
            self.radix,
        ))
    }

    /// Raw 64-bit two's-complement pattern.
    pub fn bit_pattern(self) -> u64 {
        if self.negative {
            self.magnitude.wrapping_neg()
        } else {
            self.magnitude
        }
    }

    /// Value a register of `width` bytes holds after storing this literal,
    /// read back as signed.
    pub fn overflow_as_signed(self, width: u32) -> Self {
        let Some(bits) = register_bits(width) else {
            return self;
        };
        let pattern = truncate(self.bit_pattern(), bits);
        let sign_bit = 1u64 << (bits - 1);
        if pattern & sign_bit == 0 {
            return Self::with_radix(pattern, false, self.radix);
        }
        let magnitude = truncate(pattern.wrapping_neg(), bits);
        let magnitude = if magnitude == 0 { sign_bit } else { magnitude };
        Self::with_radix(magnitude, true, self.radix)
    }

    /// Value a register of `width` bytes holds after storing this literal,
    /// read back as unsigned.
    pub fn overflow_as_unsigned(self, width: u32) -> Self {
        let Some(bits) = register_bits(width) else {
            return self;
        };
        Self::with_radix(truncate(self.bit_pattern(), bits), false, self.radix)
    }

    /// Value held after storing this literal into `t`, or `None` when no
    /// register has the width of `t`.
    pub fn wrap_to(self, t: IntType) -> Option<Self> {
        register_bits(t.size())?;
        Some(if t.is_signed() {
            self.overflow_as_signed(t.size())
        } else {
            self.overflow_as_unsigned(t.size())
        })
    }
}

fn register_bits(width: u32) -> Option<u32> {
    matches!(width, 1 | 2 | 4 | 8).then_some(width * 8)
}

fn truncate(v: u64, bits: u32) -> u64 {
    if bits >= 64 { v } else { v & ((1u64 << bits) - 1) }
}

impl fmt::Display for IntLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        let m = self.magnitude;
        match self.radix {
            Radix::Dec => write!(f, "{m}"),
            Radix::Hex => write!(f, "0x{m:x}"),
            Radix::Bin => write!(f, "0b{m:b}"),
            Radix::Oct => write!(f, "0{m:o}"),
        }
    }
}

/// Floating constant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatLit {
    value: f64,
}

impl FloatLit {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    /// Parses legacy text, dropping an `f`/`l` suffix on decimal forms.
    pub fn parse(text: &str) -> Result<Self, LiteralError> {
        let lower = text.trim().to_ascii_lowercase();
        let body = if lower.starts_with("0x") {
            lower.as_str()
        } else {
            lower.trim_end_matches(['f', 'l'])
        };
        body.parse::<f64>()
            .map(Self::new)
            .map_err(|_| LiteralError::InvalidFloat(text.to_owned()))
    }

    pub fn value(self) -> f64 {
        self.value
    }

    pub fn negate(self) -> Self {
        Self::new(-self.value)
    }

    pub fn is_zero(self) -> bool {
        self.value == 0.0
    }

    pub fn is_one(self) -> bool {
        self.value == 1.0
    }

    /// The expected type when it is a float, an untyped 64-bit float
    /// otherwise.
    pub fn ctype_in(self, env: &TypeEnv, exp: Option<TypeId>) -> TypeId {
        match exp {
            Some(exp) if env.kind(exp).is_float() => exp,
            _ => env.float_type(FloatType::untyped(8)),
        }
    }
}

impl fmt::Display for FloatLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.value;
        if v.is_nan() {
            return f.write_str("math.NaN()");
        }
        if v.is_infinite() {
            let sign = if v > 0.0 { 1 } else { -1 };
            return write!(f, "math.Inf({sign})");
        }
        // Debug always keeps a decimal point or an exponent
        write!(f, "{v:?}")
    }
}

/// String constant; `wide` for `L"..."` literals.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StringLit {
    value: String,
    wide: bool,
}

impl StringLit {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            wide: false,
        }
    }

    pub fn wide(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            wide: true,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_wide(&self) -> bool {
        self.wide
    }
}

impl fmt::Display for StringLit {
    /// Target string literal syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.value.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                '\0' => f.write_str("\\x00")?,
                c if (c as u32) < 0x20 || c as u32 == 0x7f => write!(f, "\\x{:02x}", c as u32)?,
                c => write!(f, "{c}")?,
            }
        }
        f.write_str("\"")
    }
}
