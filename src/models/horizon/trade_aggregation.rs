use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    constants::HORIZON_MAX_PAGE_LIMIT,
    models::{Amount, Asset, Order, Price, ValueError},
    utils::{datetime_from_ms, deserialize_i64},
};

/// Parameters of a `trade_aggregations` request. Times are Unix
/// milliseconds; the resolution must be one Horizon supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeAggregationQuery {
    pub base: Asset,
    pub counter: Asset,
    pub start_ms: i64,
    pub end_ms: i64,
    pub resolution_ms: i64,
    pub order: Order,
}

impl TradeAggregationQuery {
    pub fn new(base: Asset, counter: Asset, start_ms: i64, end_ms: i64, resolution_ms: i64) -> Self {
        Self {
            base,
            counter,
            start_ms,
            end_ms,
            resolution_ms,
            order: Order::Ascending,
        }
    }

    pub fn limit(&self) -> u32 {
        trade_aggregation_limit(
            self.start_ms,
            self.end_ms,
            self.resolution_ms,
            HORIZON_MAX_PAGE_LIMIT,
        )
    }

    pub fn query(&self) -> Vec<(String, String)> {
        let mut query = self.base.horizon_params("base");
        query.extend(self.counter.horizon_params("counter"));
        query.push(("start_time".to_string(), self.start_ms.to_string()));
        query.push(("end_time".to_string(), self.end_ms.to_string()));
        query.push(("resolution".to_string(), self.resolution_ms.to_string()));
        let limit = self.limit();
        if limit > 0 {
            query.push(("limit".to_string(), limit.to_string()));
        }
        query.push(("order".to_string(), self.order.to_string()));
        query
    }
}

/// Raw bucket from `trade_aggregations`.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeAggregationResponse {
    #[serde(deserialize_with = "deserialize_i64")]
    pub timestamp: i64,
    #[serde(deserialize_with = "deserialize_i64")]
    pub trade_count: i64,
    pub base_volume: String,
    pub counter_volume: String,
    pub avg: String,
    pub high_r: Price,
    pub low_r: Price,
    pub open_r: Price,
    pub close_r: Price,
}

/// Open/high/low/close summary of the trades in one resolution bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeAggregation {
    pub timestamp: DateTime<Utc>,
    pub trade_count: i64,
    pub base_volume: Amount,
    pub counter_volume: Amount,
    pub avg: f64,
    pub high: Price,
    pub low: Price,
    pub open: Price,
    pub close: Price,
}

impl TryFrom<TradeAggregationResponse> for TradeAggregation {
    type Error = ValueError;

    fn try_from(raw: TradeAggregationResponse) -> Result<Self, Self::Error> {
        let timestamp = datetime_from_ms(raw.timestamp).ok_or_else(|| {
            ValueError::InvalidRecord(format!("timestamp {} is out of range", raw.timestamp))
        })?;
        let avg = raw
            .avg
            .trim()
            .parse()
            .map_err(|_| ValueError::InvalidRecord(format!("avg '{}' is not a number", raw.avg)))?;

        Ok(Self {
            timestamp,
            trade_count: raw.trade_count,
            base_volume: raw.base_volume.parse()?,
            counter_volume: raw.counter_volume.parse()?,
            avg,
            high: raw.high_r,
            low: raw.low_r,
            open: raw.open_r,
            close: raw.close_r,
        })
    }
}

/// Number of buckets to request: one per resolution step, capped at the
/// page maximum.
pub fn trade_aggregation_limit(start_ms: i64, end_ms: i64, resolution_ms: i64, max: u32) -> u32 {
    if resolution_ms <= 0 || end_ms <= start_ms {
        return 0;
    }
    let buckets = ((end_ms - start_ms) as f64 / resolution_ms as f64).round();
    if buckets >= max as f64 {
        max
    } else {
        buckets as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregation_from_response() {
        let json = r#"{
            "timestamp": "1564132620000",
            "trade_count": "3",
            "base_volume": "120.0000000",
            "counter_volume": "25.1000000",
            "avg": "0.2091667",
            "high": "0.2100000",
            "high_r": {"N": 21, "D": 100},
            "low": "0.2000000",
            "low_r": {"N": 1, "D": 5},
            "open": "0.2000000",
            "open_r": {"N": 1, "D": 5},
            "close": "0.2100000",
            "close_r": {"N": 21, "D": 100}
        }"#;
        let raw: TradeAggregationResponse = serde_json::from_str(json).unwrap();
        let bucket = TradeAggregation::try_from(raw).unwrap();
        assert_eq!(bucket.timestamp.timestamp(), 1564132620);
        assert_eq!(bucket.trade_count, 3);
        assert_eq!(bucket.base_volume.to_string(), "120.0000000");
        assert_eq!(bucket.high, Price::new(21, 100).unwrap());
        assert_eq!(bucket.low, Price::new(1, 5).unwrap());
        assert!((bucket.avg - 0.2091667).abs() < 1e-12);
    }

    #[test]
    fn test_query() {
        let query = TradeAggregationQuery::new(Asset::Native, Asset::Native, 0, 3_600_000, 300_000);
        let params = query.query();
        assert!(params.contains(&("base_asset_type".to_string(), "native".to_string())));
        assert!(params.contains(&("counter_asset_type".to_string(), "native".to_string())));
        assert!(params.contains(&("resolution".to_string(), "300000".to_string())));
        assert!(params.contains(&("limit".to_string(), "12".to_string())));
        assert!(params.contains(&("order".to_string(), "asc".to_string())));
    }

    #[test]
    fn test_limit() {
        let minute = 60_000;
        assert_eq!(trade_aggregation_limit(0, 30 * minute, minute, 100), 30);
        assert_eq!(trade_aggregation_limit(0, 1000 * minute, minute, 100), 100);
        // rounds to the nearest bucket
        assert_eq!(trade_aggregation_limit(0, 90_000, minute, 100), 2);
        assert_eq!(trade_aggregation_limit(10, 0, minute, 100), 0);
    }
}
