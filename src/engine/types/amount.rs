use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::errors::RecordError;

/// Decimal places used for monetary fields (stamps, prices).
pub const MONEY_SCALE: u8 = 4;

/// Fixed-point number stored as `units / 10^scale`.
///
/// Sums are kept in integer units so that adding contributions in any order,
/// or in any grouping across shards, gives bit-identical totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount {
    units: i64,
    scale: u8,
}

impl Amount {
    pub const fn zero(scale: u8) -> Self {
        Self { units: 0, scale }
    }

    pub const fn from_units(units: i64, scale: u8) -> Self {
        Self { units, scale }
    }

    pub fn units(&self) -> i64 {
        self.units
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// Parses `text` as a number and rounds it to `scale` decimals.
    ///
    /// At scale 0 only whole numbers are accepted: `2.6` or `1e1` is malformed
    /// rather than rounded. `field` is only used to label the error.
    pub fn parse(field: &str, text: &str, scale: u8) -> Result<Self, RecordError> {
        let trimmed = text.trim();
        if let Ok(whole) = trimmed.parse::<i64>() {
            return whole
                .checked_mul(10i64.pow(scale as u32))
                .map(|units| Self { units, scale })
                .ok_or_else(|| RecordError::malformed(field, text, "value out of range"));
        }
        if scale == 0 {
            return Err(RecordError::malformed(field, text, "expected a whole number"));
        }

        let value: f64 = trimmed
            .parse()
            .map_err(|_| RecordError::malformed(field, text, "not a number"))?;
        if !value.is_finite() {
            return Err(RecordError::malformed(field, text, "not a finite number"));
        }
        let scaled = (value * 10f64.powi(scale as i32)).round();
        if scaled < i64::MIN as f64 || scaled > i64::MAX as f64 {
            return Err(RecordError::malformed(field, text, "value out of range"));
        }
        Ok(Self {
            units: scaled as i64,
            scale,
        })
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        debug_assert_eq!(self.scale, other.scale);
        self.units.checked_add(other.units).map(|units| Amount {
            units,
            scale: self.scale,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.units == 0
    }

    pub fn to_f64(&self) -> f64 {
        self.units as f64 / 10f64.powi(self.scale as i32)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.units);
        }
        let divisor = 10u64.pow(self.scale as u32);
        let magnitude = self.units.unsigned_abs();
        let sign = if self.units < 0 { "-" } else { "" };
        let whole = magnitude / divisor;
        let frac = magnitude % divisor;
        let digits = format!("{:0width$}", frac, width = self.scale as usize);
        let digits = digits.trim_end_matches('0');
        let digits = if digits.is_empty() { "0" } else { digits };
        write!(f, "{}{}.{}", sign, whole, digits)
    }
}
