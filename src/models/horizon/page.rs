use serde::Deserialize;

/// A page of records from a Horizon collection endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HorizonPage<T> {
    #[serde(rename = "_embedded")]
    pub embedded: HorizonEmbedded<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HorizonEmbedded<T> {
    pub records: Vec<T>,
}

impl<T> HorizonPage<T> {
    pub fn into_records(self) -> Vec<T> {
        self.embedded.records
    }
}

/// Link object as found under `_links`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HorizonLink {
    pub href: String,
}

/// Sort order for paged collection requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum Order {
    #[default]
    #[strum(serialize = "asc")]
    Ascending,
    #[strum(serialize = "desc")]
    Descending,
}

/// Cursor, limit and order of a paged request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
    pub order: Order,
}

impl PageRequest {
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(cursor) = &self.cursor {
            query.push(("cursor".to_string(), cursor.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        query.push(("order".to_string(), self.order.to_string()));
        query
    }
}
