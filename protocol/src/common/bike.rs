//! Bike records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bike {
    pub id: i64,
    pub user_id: i64,
    pub manufacturer: String,
    pub model_name: String,
    #[serde(default)]
    pub model_code: Option<String>,
    #[serde(default)]
    pub model_year: Option<i32>,
    #[serde(default)]
    pub current_mileage: Option<i64>,
    /// Kept as sent by the server; formatted for display on demand
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(with = "crate::common::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::common::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Bike {
    /// "Manufacturer Model" label used in selectors and cards
    pub fn display_name(&self) -> String {
        format!("{} {}", self.manufacturer, self.model_name)
    }
}
