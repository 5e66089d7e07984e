use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Create payload in the backend's wire shape. Serialized once at capture
/// time; the queue replays the serialized form untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub article_code: String,
    pub supplier_id: String,
    pub material_id: String,
    pub pattern_id: String,
    pub size_id: String,
    pub surface_id: String,
    pub color_id: String,
    pub unit_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Stored product as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub article_code: String,
    pub supplier_id: String,
    pub material_id: String,
    pub pattern_id: String,
    pub size_id: String,
    pub surface_id: String,
    pub color_id: String,
    pub unit_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
}
