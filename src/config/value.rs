// src/config/value.rs

//! Typed configuration values
//!
//! Values discovered in config files are always text. Schema defaults carry
//! their own type (flag or decimal), which decides how they are rendered.

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits kept by [`FixedDecimal`]
pub const DECIMAL_PLACES: u32 = 8;

/// One unit in the last place (1e-8)
const SCALE: i64 = 10_i64.pow(DECIMAL_PLACES);

/// Resolved configuration: key (no leading dashes) to value
pub type ConfigMapping = BTreeMap<String, ConfigValue>;

/// Fixed-point decimal with 8 fractional digits
///
/// Stored as a count of 1e-8 units, the same precision the node uses for
/// amounts, so `0.0001` and `0.00005430` survive without float rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedDecimal {
    units: i64,
}

impl FixedDecimal {
    /// Build from a raw count of 1e-8 units
    pub const fn from_units(units: i64) -> Self {
        Self { units }
    }

    /// Raw count of 1e-8 units
    pub const fn units(&self) -> i64 {
        self.units
    }
}

impl fmt::Display for FixedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.units < 0 { "-" } else { "" };
        let abs = self.units.unsigned_abs();
        let scale = SCALE as u64;
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            abs / scale,
            abs % scale,
            width = DECIMAL_PLACES as usize
        )
    }
}

impl FromStr for FixedDecimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidValue(format!("not a decimal: '{}'", s));

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if frac_part.len() > DECIMAL_PLACES as usize {
            return Err(Error::InvalidValue(format!(
                "'{}' has more than {} fractional digits",
                s, DECIMAL_PLACES
            )));
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: i64 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| invalid())?
        };
        let frac: i64 = if frac_part.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", frac_part, width = DECIMAL_PLACES as usize);
            padded.parse().map_err(|_| invalid())?
        };

        let units = whole
            .checked_mul(SCALE)
            .and_then(|w| w.checked_add(frac))
            .ok_or_else(|| Error::InvalidValue(format!("decimal out of range: '{}'", s)))?;

        Ok(Self {
            units: if negative { -units } else { units },
        })
    }
}

impl Serialize for FixedDecimal {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A configuration value tagged with how it should be written out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Text(String),
    Flag(bool),
    Decimal(FixedDecimal),
}

impl ConfigValue {
    /// Convenience constructor for text values
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Render the value the way it appears on the right of `key = `
    ///
    /// Flags become `1`/`0`, decimals always carry 8 fractional digits.
    pub fn render(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Flag(true) => "1".to_string(),
            Self::Flag(false) => "0".to_string(),
            Self::Decimal(d) => d.to_string(),
        }
    }

    /// The text payload, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<FixedDecimal> for ConfigValue {
    fn from(value: FixedDecimal) -> Self {
        Self::Decimal(value)
    }
}
