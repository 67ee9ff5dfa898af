//! Parsing and validation of the optional month filter shared by every report.

use serde::{Serialize, Serializer};
use time::Month;

use crate::Error;

/// A calendar month used to restrict transactions to those sold in that
/// month of any year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthFilter(Month);

impl MonthFilter {
    /// Create a filter for `month`.
    pub fn new(month: Month) -> Self {
        Self(month)
    }

    /// Parse the raw `month` query parameter.
    ///
    /// An absent or empty parameter means "no filter" and returns `Ok(None)`.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `raw` is present but is not a whole
    /// number between 1 and 12.
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, Error> {
        let raw = match raw.map(str::trim) {
            None | Some("") => return Ok(None),
            Some(raw) => raw,
        };

        let invalid = || Error::InvalidMonth(raw.to_owned());
        let number = raw.parse::<f64>().map_err(|_| invalid())?;

        if number.fract() != 0.0 || !(1.0..=12.0).contains(&number) {
            return Err(invalid());
        }

        Month::try_from(number as u8)
            .map(|month| Some(Self(month)))
            .map_err(|_| invalid())
    }

    /// The month number, 1 for January through 12 for December.
    pub fn number(self) -> u8 {
        self.0 as u8
    }
}

impl Serialize for MonthFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}
