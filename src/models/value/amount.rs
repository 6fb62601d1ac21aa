//! Fixed-point ledger amounts.
//!
//! Every quantity on the ledger is an integer count of stroops (1/10,000,000th
//! of a unit). Conversion from decimal text never goes through floating-point
//! multiplication; floats are first rendered to exactly 7 decimals.

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    constants::{AMOUNT_DECIMALS, STROOPS_PER_UNIT},
    models::{ValueError, XdrError},
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);
    pub const MAX: Amount = Amount(i64::MAX);

    pub const fn from_stroops(stroops: i64) -> Self {
        Self(stroops)
    }

    /// Unscaled integer value, as written on the wire.
    pub const fn stroops(&self) -> i64 {
        self.0
    }

    /// Builds an amount from a float, rounding to 7 decimals first.
    pub fn from_f64(value: f64) -> Result<Self, ValueError> {
        if !value.is_finite() {
            return Err(ValueError::InvalidAmount(format!(
                "amount must be finite, got {}",
                value
            )));
        }
        format!("{:.*}", AMOUNT_DECIMALS, value).parse()
    }

    /// Float view for display and arithmetic. Exact for every amount below
    /// 2^53 stroops, where the quotient is the float nearest the decimal.
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / STROOPS_PER_UNIT as f64
    }

    /// The scaled integer rendered as text, e.g. `1005000000` for 100.5.
    pub fn to_scaled_string(&self) -> String {
        self.0.to_string()
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

impl FromStr for Amount {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (integer, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (integer.is_empty() && fraction.is_empty())
            || !all_digits(integer)
            || !all_digits(fraction)
        {
            return Err(ValueError::InvalidAmount(format!("'{}' is not a decimal", s)));
        }
        if fraction.len() > AMOUNT_DECIMALS {
            return Err(ValueError::InvalidAmount(format!(
                "'{}' has more than {} decimal places",
                s, AMOUNT_DECIMALS
            )));
        }

        let out_of_range = || ValueError::AmountOutOfRange(s.to_string());

        let whole: i64 = if integer.is_empty() {
            0
        } else {
            integer.parse().map_err(|_| out_of_range())?
        };
        let padded = format!("{:0<width$}", fraction, width = AMOUNT_DECIMALS);
        let fractional: i64 = padded.parse().map_err(|_| out_of_range())?;

        let magnitude = whole
            .checked_mul(STROOPS_PER_UNIT)
            .and_then(|scaled| scaled.checked_add(fractional))
            .ok_or_else(out_of_range)?;

        Ok(Amount(if negative { -magnitude } else { magnitude }))
    }
}

impl TryFrom<f64> for Amount {
    type Error = ValueError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Amount::from_f64(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let scale = STROOPS_PER_UNIT as u64;
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            magnitude / scale,
            magnitude % scale,
            width = AMOUNT_DECIMALS
        )
    }
}

impl XdrEncode for Amount {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        writer.write_i64(self.0);
        Ok(())
    }
}

impl XdrDecode for Amount {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Amount(reader.read_i64()?))
    }
}

// Horizon renders amounts as decimal strings ("100.5000000").
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
