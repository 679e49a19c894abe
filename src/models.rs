use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// API-side identifier. The API is inconsistent about ids, so numbers and strings are both accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => ResourceId(text),
            Raw::Number(n) => ResourceId(n.to_string()),
        })
    }
}

/// Anything held in a screen collection, keyed by its API id.
pub trait Keyed {
    fn key(&self) -> Option<&ResourceId>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Draft,
    Published,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Published => "published",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(default, alias = "_id")]
    pub id: Option<ResourceId>,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: i64,
    #[serde(default, alias = "stock")]
    pub stock_quantity: i64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub additional_images: Vec<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Keyed for Product {
    fn key(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    #[default]
    Percentage,
    Fixed,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Discount {
    #[serde(default, alias = "_id")]
    pub id: Option<ResourceId>,
    pub code: String,
    #[serde(rename = "type", alias = "discount_type", default)]
    pub kind: DiscountType,
    pub value: u32,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub remaining_uses: Option<u32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub expires_at: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Keyed for Discount {
    fn key(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WorkshopStatus {
    #[default]
    Upcoming,
    InProgress,
    Completed,
    Cancelled,
}

impl WorkshopStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkshopStatus::Upcoming => "upcoming",
            WorkshopStatus::InProgress => "in-progress",
            WorkshopStatus::Completed => "completed",
            WorkshopStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "upcoming" => Some(WorkshopStatus::Upcoming),
            "in-progress" => Some(WorkshopStatus::InProgress),
            "completed" => Some(WorkshopStatus::Completed),
            "cancelled" => Some(WorkshopStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workshop {
    #[serde(default, alias = "_id")]
    pub id: Option<ResourceId>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub date: NaiveDate,
    /// `HH:MM`, 24-hour clock.
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub max_participants: u32,
    #[serde(default)]
    pub status: WorkshopStatus,
    #[serde(default)]
    pub registration_link: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Keyed for Workshop {
    fn key(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    pub user_name: String,
    pub user_email: String,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(default, alias = "_id")]
    pub id: Option<ResourceId>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PaymentMethodBreakdown {
    pub method: String,
    pub total: i64,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_revenue: i64,
    #[serde(default)]
    pub total_commission: i64,
    #[serde(default)]
    pub net_earnings: i64,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethodBreakdown>,
    /// Set when the figures were derived client-side from raw orders.
    #[serde(default)]
    pub estimated: bool,
}

impl DashboardSummary {
    pub fn is_empty(&self) -> bool {
        self.total_revenue == 0 && self.payment_methods.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRecord {
    #[serde(default, alias = "_id")]
    pub id: Option<ResourceId>,
    pub total_amount: i64,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum GatewayId {
    Gcash,
    Paymaya,
}

impl GatewayId {
    pub const ALL: [GatewayId; 2] = [GatewayId::Gcash, GatewayId::Paymaya];

    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayId::Gcash => "gcash",
            GatewayId::Paymaya => "paymaya",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GatewayId::Gcash => "GCash",
            GatewayId::Paymaya => "PayMaya",
        }
    }
}

impl fmt::Display for GatewayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GatewayId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gcash" => Ok(GatewayId::Gcash),
            "paymaya" | "maya" => Ok(GatewayId::Paymaya),
            other => Err(format!("unknown payment gateway `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewayConnection {
    pub gateway: GatewayId,
    pub connected: bool,
    pub phone: String,
    pub connected_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resource_id_accepts_numbers_and_strings() {
        let from_num: ResourceId = serde_json::from_value(json!(42)).unwrap();
        let from_str: ResourceId = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(from_num, from_str);
    }

    #[test]
    fn product_reads_legacy_field_names() {
        let product: Product = serde_json::from_value(json!({
            "_id": 7,
            "title": "Woven Basket",
            "price": 45000,
            "stock": 3,
            "is_featured": true
        }))
        .unwrap();
        assert_eq!(product.id, Some(ResourceId::new("7")));
        assert_eq!(product.name, "Woven Basket");
        assert_eq!(product.stock_quantity, 3);
        assert_eq!(product.status, ProductStatus::Draft);
        assert!(product.is_featured);
    }

    #[test]
    fn profile_uses_camel_case_on_the_wire() {
        let profile = SellerProfile {
            user_name: "Liza".into(),
            user_email: "liza@example.com".into(),
            contact_number: Some("09171234567".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["userName"], "Liza");
        assert_eq!(value["contactNumber"], "09171234567");
    }

    #[test]
    fn workshop_status_is_kebab_case() {
        let status: WorkshopStatus = serde_json::from_value(json!("in-progress")).unwrap();
        assert_eq!(status, WorkshopStatus::InProgress);
        assert_eq!(WorkshopStatus::parse(status.as_str()), Some(status));
    }
}
