use std::fmt;

use crate::{
    models::XdrError,
    utils::datetime_from_ms,
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

/// Validity window of a transaction in Unix seconds; zero means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

impl TimeBounds {
    pub fn new(min_time: u64, max_time: u64) -> Self {
        Self { min_time, max_time }
    }

    /// Valid from now until `seconds` from now.
    pub fn expiring_in(seconds: u64) -> Self {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        Self {
            min_time: 0,
            max_time: now.saturating_add(seconds),
        }
    }
}

fn render(seconds: u64) -> String {
    i64::try_from(seconds)
        .ok()
        .filter(|s| *s > 0)
        .and_then(|s| s.checked_mul(1000))
        .and_then(datetime_from_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unbounded".to_string())
}

impl fmt::Display for TimeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", render(self.min_time), render(self.max_time))
    }
}

impl XdrEncode for TimeBounds {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        writer.write_u64(self.min_time);
        writer.write_u64(self.max_time);
        Ok(())
    }
}

impl XdrDecode for TimeBounds {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Self {
            min_time: reader.read_u64()?,
            max_time: reader.read_u64()?,
        })
    }
}
