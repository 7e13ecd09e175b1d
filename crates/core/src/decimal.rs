//! Fixed-point decimal primitive
//!
//! `Decimal` is the fixed-point member of the primitive value set. It is a
//! plain `mantissa * 10^-scale` pair, kept normalized (no trailing zeros in
//! the fraction) so that `1.50` and `1.5` compare and hash equal.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Fixed-point decimal number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    /// Largest supported number of fractional digits
    pub const MAX_SCALE: u32 = 38;

    /// Zero
    pub const ZERO: Decimal = Decimal {
        mantissa: 0,
        scale: 0,
    };

    /// Create `mantissa * 10^-scale`
    ///
    /// Scales above `MAX_SCALE` are clamped by dropping excess digits.
    pub fn new(mantissa: i128, scale: u32) -> Self {
        let mut mantissa = mantissa;
        let mut scale = scale;
        while scale > Self::MAX_SCALE {
            mantissa /= 10;
            scale -= 1;
        }
        while scale > 0 && mantissa % 10 == 0 {
            mantissa /= 10;
            scale -= 1;
        }
        Decimal { mantissa, scale }
    }

    /// Unscaled integer value
    #[inline]
    pub const fn mantissa(&self) -> i128 {
        self.mantissa
    }

    /// Number of fractional digits
    #[inline]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Lossy conversion to a float
    pub fn to_f64(&self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }

    /// Mantissa rescaled to `scale`, if it fits
    fn rescaled(&self, scale: u32) -> Option<i128> {
        let factor = 10i128.checked_pow(scale.checked_sub(self.scale)?)?;
        self.mantissa.checked_mul(factor)
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        match (self.rescaled(scale), other.rescaled(scale)) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => self
                .to_f64()
                .partial_cmp(&other.to_f64())
                .unwrap_or(Ordering::Equal),
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
        } else {
            digits
        };
        let (int, frac) = padded.split_at(padded.len() - scale);
        let sign = if self.mantissa < 0 { "-" } else { "" };
        write!(f, "{}{}.{}", sign, int, frac)
    }
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Unconformable(format!("invalid decimal literal {:?}", s));
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (int, frac) = body.split_once('.').unwrap_or((body, ""));
        if int.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !int.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let scale = u32::try_from(frac.len()).map_err(|_| invalid())?;
        if scale > Self::MAX_SCALE {
            return Err(invalid());
        }
        let digits = format!("{}{}", int, frac);
        let magnitude: i128 = if digits.is_empty() {
            0
        } else {
            digits.parse().map_err(|_| invalid())?
        };
        let mantissa = if negative { -magnitude } else { magnitude };
        Ok(Decimal::new(mantissa, scale))
    }
}

impl TryFrom<String> for Decimal {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Decimal> for String {
    fn from(d: Decimal) -> Self {
        d.to_string()
    }
}

impl From<i64> for Decimal {
    fn from(i: i64) -> Self {
        Decimal::new(i as i128, 0)
    }
}
