use serde::{Deserialize, Serialize};

/// Global summary served by `/admin-stats`. Counts are approximate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    #[serde(rename = "user")]
    pub users: u64,
    #[serde(rename = "menuItem")]
    pub menu_items: u64,
    #[serde(rename = "order")]
    pub orders: u64,
    pub revenue: f64,
}

/// One row of `/order-stats`. Catalog items without a category are grouped
/// under `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CategoryStat {
    #[serde(default)]
    pub category: Option<String>,
    pub quantity: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionCounts {
    pub users: u64,
    pub menu_items: u64,
    pub payments: u64,
}
