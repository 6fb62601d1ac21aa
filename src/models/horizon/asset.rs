use serde::Deserialize;

use crate::models::{Asset, ValueError};

/// The `asset_type`/`asset_code`/`asset_issuer` triple embedded in records.
#[derive(Debug, Clone, Deserialize)]
pub struct HorizonAsset {
    pub asset_type: String,
    pub asset_code: Option<String>,
    pub asset_issuer: Option<String>,
}

impl HorizonAsset {
    pub fn to_asset(&self) -> Result<Asset, ValueError> {
        Asset::from_horizon(
            &self.asset_type,
            self.asset_code.as_deref(),
            self.asset_issuer.as_deref(),
        )
    }
}

pub(crate) fn parse_id(field: &str, value: &str) -> Result<i64, ValueError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValueError::InvalidRecord(format!("{} '{}' is not an integer", field, value)))
}

pub(crate) fn parse_timestamp(
    field: &str,
    value: &str,
) -> Result<chrono::DateTime<chrono::Utc>, ValueError> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| ValueError::InvalidRecord(format!("{} '{}': {}", field, value, e)))
}
