//! Exact decimal numbers.
//!
//! ASON numbers are kept at full precision: a literal is stored as an integer
//! coefficient and a power-of-ten scale, `value = coefficient * 10^-scale`.
//! Every `Number` is held in normal form (no trailing zeros in the
//! coefficient, zero is `0 * 10^0`). Equal values therefore have identical
//! representations and serialize identically, so `1`, `1.0` and `10e-1` are
//! the same number.

use crate::error::{AsonError, Result};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Padding zeros allowed before the canonical text switches to exponent form.
const MAX_PLAIN_ZEROS: u128 = 21;

/// An arbitrary-precision decimal number in normal form.
#[derive(Clone, Debug)]
pub struct Number {
    coefficient: Arc<BigInt>,
    scale: i64,
    /// Decimal digit count of the coefficient's magnitude (0 for zero).
    digits: usize,
}

impl Number {
    pub fn zero() -> Self {
        Self {
            coefficient: Arc::new(BigInt::zero()),
            scale: 0,
            digits: 0,
        }
    }

    /// Build a number from a coefficient and scale, normalizing it.
    pub fn from_parts(coefficient: BigInt, scale: i64) -> Result<Self> {
        let negative = coefficient.sign() == Sign::Minus;
        let digits = coefficient.magnitude().to_string();
        Self::from_digits(negative, &digits, scale)
            .ok_or_else(|| AsonError::InvalidNumber(format!("{coefficient}e{}", -(scale as i128))))
    }

    /// Parse a JSON-form number literal:
    /// `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`.
    ///
    /// Returns `None` if the text is not a well-formed literal or its
    /// exponent does not fit the scale range.
    pub(crate) fn parse_literal(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        let mut i = 0;
        let negative = bytes.first() == Some(&b'-');
        if negative {
            i += 1;
        }

        let int_start = i;
        match bytes.get(i) {
            Some(b'0') => i += 1,
            Some(b'1'..=b'9') => {
                while matches!(bytes.get(i), Some(b'0'..=b'9')) {
                    i += 1;
                }
            }
            _ => return None,
        }
        let int_digits = &text[int_start..i];

        let mut frac_digits = "";
        if bytes.get(i) == Some(&b'.') {
            i += 1;
            let start = i;
            while matches!(bytes.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
            if i == start {
                return None;
            }
            frac_digits = &text[start..i];
        }

        let mut exponent: i64 = 0;
        if matches!(bytes.get(i), Some(b'e' | b'E')) {
            i += 1;
            let exp_negative = match bytes.get(i) {
                Some(b'-') => {
                    i += 1;
                    true
                }
                Some(b'+') => {
                    i += 1;
                    false
                }
                _ => false,
            };
            let start = i;
            while matches!(bytes.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
            if i == start {
                return None;
            }
            exponent = text[start..i].parse::<i64>().ok()?;
            if exp_negative {
                exponent = -exponent;
            }
        }

        if i != bytes.len() {
            return None;
        }

        let scale = i64::try_from(frac_digits.len())
            .ok()?
            .checked_sub(exponent)?;
        let mut digits = String::with_capacity(int_digits.len() + frac_digits.len());
        digits.push_str(int_digits);
        digits.push_str(frac_digits);
        Self::from_digits(negative, &digits, scale)
    }

    /// Normalize a decimal digit string with the given scale.
    fn from_digits(negative: bool, digits: &str, scale: i64) -> Option<Self> {
        let significant = digits.trim_start_matches('0');
        if significant.is_empty() {
            return Some(Self::zero());
        }
        let trimmed = significant.trim_end_matches('0');
        let stripped = i64::try_from(significant.len() - trimmed.len()).ok()?;
        let scale = scale.checked_sub(stripped)?;
        let magnitude = BigUint::parse_bytes(trimmed.as_bytes(), 10)?;
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        Some(Self {
            coefficient: Arc::new(BigInt::from_biguint(sign, magnitude)),
            scale,
            digits: trimmed.len(),
        })
    }

    fn from_integer(negative: bool, magnitude: u64) -> Self {
        if magnitude == 0 {
            return Self::zero();
        }
        let mut magnitude = magnitude;
        let mut scale = 0i64;
        while magnitude % 10 == 0 {
            magnitude /= 10;
            scale -= 1;
        }
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        Self {
            coefficient: Arc::new(BigInt::from_biguint(sign, BigUint::from(magnitude))),
            scale,
            digits: magnitude.to_string().len(),
        }
    }

    /// The integer coefficient of the normal form.
    pub fn coefficient(&self) -> &BigInt {
        &self.coefficient
    }

    /// The power-of-ten scale of the normal form: `value = coefficient * 10^-scale`.
    pub fn scale(&self) -> i64 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.coefficient.sign() == Sign::Minus
    }

    /// True when the number has no fractional part.
    pub fn is_integer(&self) -> bool {
        self.scale <= 0
    }

    /// The exact value as an `i64`, if it is an integer in range.
    pub fn to_i64(&self) -> Option<i64> {
        if !self.is_integer() {
            return None;
        }
        let base = self.coefficient.to_i64()?;
        let zeros = u32::try_from(-(self.scale as i128)).ok()?;
        10i64.checked_pow(zeros)?.checked_mul(base)
    }

    /// The nearest `f64`. Lossy; out-of-range magnitudes become infinite.
    pub fn to_f64(&self) -> f64 {
        format!("{}e{}", self.coefficient, -(self.scale as i128))
            .parse::<f64>()
            .unwrap_or(f64::NAN)
    }

    /// Exponent of the most significant digit.
    fn adjusted_exponent(&self) -> i128 {
        self.digits as i128 - 1 - self.scale as i128
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        let by_exponent = self.adjusted_exponent().cmp(&other.adjusted_exponent());
        if by_exponent != Ordering::Equal {
            return by_exponent;
        }
        // Same leading exponent: the scale difference equals the digit-count
        // difference, so the alignment factor is bounded by the literal length.
        let a = self.coefficient.magnitude();
        let b = other.coefficient.magnitude();
        match self.scale.cmp(&other.scale) {
            Ordering::Equal => a.cmp(b),
            Ordering::Greater => {
                let shift = (self.scale as i128 - other.scale as i128) as usize;
                a.cmp(&(b * num_traits::pow(BigUint::from(10u8), shift)))
            }
            Ordering::Less => {
                let shift = (other.scale as i128 - self.scale as i128) as usize;
                (a * num_traits::pow(BigUint::from(10u8), shift)).cmp(b)
            }
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.coefficient.sign(), other.coefficient.sign());
        if a != b {
            return a.cmp(&b);
        }
        match a {
            Sign::NoSign => Ordering::Equal,
            Sign::Plus => self.cmp_magnitude(other),
            Sign::Minus => self.cmp_magnitude(other).reverse(),
        }
    }
}

/// Canonical text: plain decimal notation while padding stays short, then
/// `<coefficient>e<exponent>`. Always a valid JSON number.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        if self.is_negative() {
            f.write_str("-")?;
        }
        let digits = self.coefficient.magnitude().to_string();
        let scale = self.scale as i128;
        let len = digits.len() as i128;

        if scale <= 0 {
            let zeros = (-scale) as u128;
            if zeros <= MAX_PLAIN_ZEROS {
                f.write_str(&digits)?;
                for _ in 0..zeros {
                    f.write_str("0")?;
                }
                Ok(())
            } else {
                write!(f, "{digits}e{}", -scale)
            }
        } else if scale < len {
            let point = (len - scale) as usize;
            write!(f, "{}.{}", &digits[..point], &digits[point..])
        } else {
            let lead = (scale - len) as u128;
            if lead <= MAX_PLAIN_ZEROS {
                f.write_str("0.")?;
                for _ in 0..lead {
                    f.write_str("0")?;
                }
                f.write_str(&digits)
            } else {
                write!(f, "{digits}e-{scale}")
            }
        }
    }
}

impl FromStr for Number {
    type Err = AsonError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_literal(s).ok_or_else(|| AsonError::InvalidNumber(s.to_string()))
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::from_integer(n < 0, n.unsigned_abs())
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Self::from(i64::from(n))
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Self::from_integer(false, n)
    }
}

impl TryFrom<f64> for Number {
    type Error = AsonError;

    fn try_from(f: f64) -> Result<Self> {
        if !f.is_finite() {
            return Err(AsonError::InvalidNumber(f.to_string()));
        }
        // `{:e}` prints the shortest digits that round-trip through f64.
        format!("{f:e}").parse()
    }
}
