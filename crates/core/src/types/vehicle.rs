//! Numeric vehicle attributes and their display formatting.
//!
//! Form input arrives as text; these types own the parse rules (digits only,
//! four-digit year) and the grouped display used on grids and detail pages.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors from parsing a numeric vehicle field.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VehicleFieldError {
    #[error("value must be a whole number")]
    NotNumeric,
    #[error("year must be exactly 4 digits")]
    YearLength,
    #[error("value is out of range")]
    OutOfRange,
}

fn parse_digits(s: &str) -> Result<i64, VehicleFieldError> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VehicleFieldError::NotNumeric);
    }
    s.parse::<i64>().map_err(|_| VehicleFieldError::OutOfRange)
}

/// Formats a non-negative integer with comma thousands separators.
///
/// ```
/// assert_eq!(cse_motors_core::group_thousands(1_234_567), "1,234,567");
/// ```
#[must_use]
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// A four-digit model year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelYear(i32);

impl ModelYear {
    /// Parse a year that is exactly four ASCII digits.
    ///
    /// # Errors
    ///
    /// Returns `NotNumeric` for non-digit input and `YearLength` otherwise.
    pub fn parse(s: &str) -> Result<Self, VehicleFieldError> {
        let value = parse_digits(s)?;
        if s.trim().len() != 4 {
            return Err(VehicleFieldError::YearLength);
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| VehicleFieldError::OutOfRange)
    }

    #[must_use]
    pub const fn new(year: i32) -> Self {
        Self(year)
    }

    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ModelYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A price in whole US dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Parse a whole-dollar price (digits only).
    ///
    /// # Errors
    ///
    /// Returns an error if the input has anything besides digits.
    pub fn parse(s: &str) -> Result<Self, VehicleFieldError> {
        parse_digits(s).map(Self)
    }

    #[must_use]
    pub const fn new(dollars: i64) -> Self {
        Self(dollars)
    }

    #[must_use]
    pub const fn dollars(self) -> i64 {
        self.0
    }
}

/// Displays as `$25,000`.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", group_thousands(self.0))
    }
}

/// Odometer reading in miles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mileage(i64);

impl Mileage {
    /// Parse a mileage value (digits only).
    ///
    /// # Errors
    ///
    /// Returns an error if the input has anything besides digits.
    pub fn parse(s: &str) -> Result<Self, VehicleFieldError> {
        parse_digits(s).map(Self)
    }

    #[must_use]
    pub const fn new(miles: i64) -> Self {
        Self(miles)
    }

    #[must_use]
    pub const fn miles(self) -> i64 {
        self.0
    }
}

/// Displays as `12,345`.
impl fmt::Display for Mileage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&group_thousands(self.0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(25_000), "25,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(-4500), "-4,500");
    }

    #[test]
    fn test_year_parse() {
        assert_eq!(ModelYear::parse("2019").unwrap().value(), 2019);
        assert_eq!(ModelYear::parse("19"), Err(VehicleFieldError::YearLength));
        assert_eq!(ModelYear::parse("20190"), Err(VehicleFieldError::YearLength));
        assert_eq!(ModelYear::parse("20x9"), Err(VehicleFieldError::NotNumeric));
    }

    #[test]
    fn test_price_parse_and_display() {
        let price = Price::parse("25000").unwrap();
        assert_eq!(price.dollars(), 25_000);
        assert_eq!(price.to_string(), "$25,000");
        assert_eq!(Price::parse("25,000"), Err(VehicleFieldError::NotNumeric));
        assert_eq!(Price::parse("12.50"), Err(VehicleFieldError::NotNumeric));
    }

    #[test]
    fn test_mileage_display() {
        assert_eq!(Mileage::parse("12345").unwrap().to_string(), "12,345");
        assert_eq!(Mileage::parse(""), Err(VehicleFieldError::NotNumeric));
    }
}
