use serde::{Deserialize, Serialize};

/// Server-reported pagination facts for one page of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    /// `None` when the page holds no items.
    pub from: Option<u64>,
    pub to: Option<u64>,
    /// Count of items matching the current filter.
    pub total: u64,
    /// Count ignoring the filter; some collections omit it.
    #[serde(rename = "total_no_filter", default, skip_serializing_if = "Option::is_none")]
    pub total_unfiltered: Option<u64>,
}

/// One page of a collection: `{ data: [...], meta: {...} }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// Single-entity responses are wrapped as `{ data: <entity> }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Data<T> {
    pub data: T,
}
