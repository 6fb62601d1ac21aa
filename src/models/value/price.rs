//! Exchange rates as ratios of two 32-bit integers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    models::{ValueError, XdrError},
    utils::deserialize_u32,
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

/// Relative tolerance used when approximating a float as a fraction.
pub const PRICE_APPROXIMATION_TOLERANCE: f64 = 1e-6;

const MAX_CONTINUED_FRACTION_TERMS: usize = 64;

/// Price of one unit of the selling asset in units of the buying asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    #[serde(alias = "N", deserialize_with = "deserialize_u32")]
    pub n: u32,
    #[serde(alias = "D", deserialize_with = "deserialize_u32")]
    pub d: u32,
}

impl Price {
    pub fn new(n: u32, d: u32) -> Result<Self, ValueError> {
        let price = Self { n, d };
        if !price.is_valid() {
            return Err(ValueError::InvalidPrice(format!(
                "denominator must be non-zero, got {}/{}",
                n, d
            )));
        }
        Ok(price)
    }

    /// Best rational approximation of `value` by continued fractions,
    /// stopping once `|value - n/d| <= value * 1e-6`.
    pub fn from_f64(value: f64) -> Result<Self, ValueError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValueError::InvalidPrice(format!(
                "price must be a positive finite number, got {}",
                value
            )));
        }

        let (mut h1, mut h2) = (1f64, 0f64);
        let (mut k1, mut k2) = (0f64, 1f64);
        let mut b = value;

        for _ in 0..MAX_CONTINUED_FRACTION_TERMS {
            let a = b.floor();
            (h1, h2) = (a * h1 + h2, h1);
            (k1, k2) = (a * k1 + k2, k1);

            if h1 > u32::MAX as f64 || k1 > u32::MAX as f64 {
                return Err(ValueError::InvalidPrice(format!(
                    "{} cannot be represented as a ratio of 32-bit integers",
                    value
                )));
            }

            let remainder = b - a;
            if k1 > 0.0 && (value - h1 / k1).abs() <= value * PRICE_APPROXIMATION_TOLERANCE {
                break;
            }
            if remainder == 0.0 {
                break;
            }
            b = 1.0 / remainder;
        }

        Price::new(h1 as u32, k1 as u32)
    }

    pub fn is_valid(&self) -> bool {
        self.d != 0
    }

    pub fn to_f64(&self) -> f64 {
        f64::from(self.n) / f64::from(self.d)
    }

    /// The same rate quoted from the other side of the pair.
    pub fn invert(&self) -> Result<Self, ValueError> {
        Price::new(self.d, self.n)
    }
}

impl TryFrom<f64> for Price {
    type Error = ValueError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Price::from_f64(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.n, self.d)
    }
}

impl XdrEncode for Price {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        writer.write_u32(self.n);
        writer.write_u32(self.d);
        Ok(())
    }
}

impl XdrDecode for Price {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Price {
            n: reader.read_u32()?,
            d: reader.read_u32()?,
        })
    }
}
