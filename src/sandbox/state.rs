use std::{collections::HashMap, sync::Arc};

use chrono::{Duration, NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::{
    config::SandboxConfig,
    models::{
        Category, Discount, DiscountType, GatewayId, OrderRecord, Product, ProductStatus,
        ResourceId, SellerProfile, Workshop, WorkshopStatus,
    },
};

pub const SEED_EMAIL: &str = "seller@craftconnect.test";
pub const SEED_PASSWORD: &str = "sandbox123";

#[derive(Debug, Clone)]
pub struct Account {
    pub password: String,
    pub profile: SellerProfile,
    pub active: bool,
}

/// Everything the sandbox API serves. Lists are kept newest first.
#[derive(Debug, Default)]
pub struct Store {
    pub accounts: HashMap<String, Account>,
    pub products: Vec<Product>,
    pub discounts: Vec<Discount>,
    pub workshops: Vec<Workshop>,
    pub categories: Vec<Category>,
    pub orders: Vec<OrderRecord>,
    pub pending_otps: HashMap<(GatewayId, String), String>,
    /// When false the dashboard endpoint answers with an empty summary.
    pub publish_summary: bool,
}

#[derive(Clone)]
pub struct SandboxState {
    pub store: Arc<RwLock<Store>>,
    pub config: Arc<SandboxConfig>,
}

impl SandboxState {
    pub fn new(config: SandboxConfig, store: Store) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            config: Arc::new(config),
        }
    }

    /// A single seller with a small catalogue, like a freshly seeded dev database.
    pub fn seeded(config: SandboxConfig) -> Self {
        Self::new(config, seed_store())
    }

    pub async fn pending_otp(&self, gateway: GatewayId, phone: &str) -> Option<String> {
        self.store
            .read()
            .await
            .pending_otps
            .get(&(gateway, phone.to_string()))
            .cloned()
    }
}

pub fn seed_store() -> Store {
    let mut store = Store {
        publish_summary: true,
        ..Default::default()
    };

    store.accounts.insert(
        SEED_EMAIL.to_string(),
        Account {
            password: SEED_PASSWORD.to_string(),
            profile: SellerProfile {
                user_name: "Maria Santos".into(),
                user_email: SEED_EMAIL.into(),
                birthday: NaiveDate::from_ymd_opt(1990, 5, 12),
                contact_number: Some("09171234567".into()),
                address: Some("Vigan City, Ilocos Sur".into()),
                role: "seller".into(),
            },
            active: true,
        },
    );

    store.categories = ["Handicrafts", "Textiles & Weaving", "Bamboo Crafts"]
        .into_iter()
        .enumerate()
        .map(|(i, name)| Category {
            id: Some(ResourceId::new((i + 1).to_string())),
            name: name.to_string(),
        })
        .collect();

    let products = [
        ("Inabel Table Runner", "Handwoven Ilocano cotton", 85_000, 12, true),
        ("Burnay Clay Jar", "Traditional Vigan pottery", 120_000, 5, false),
        ("Rattan Coasters (set of 6)", "Hand-braided rattan", 35_000, 40, false),
    ];
    store.products = products
        .into_iter()
        .map(|(name, description, price, stock, featured)| Product {
            id: Some(ResourceId::generate()),
            name: name.to_string(),
            description: Some(description.to_string()),
            price,
            stock_quantity: stock,
            category: Some("Handicrafts".into()),
            tags: vec!["handmade".into()],
            image_url: None,
            additional_images: Vec::new(),
            video_url: None,
            status: ProductStatus::Published,
            is_featured: featured,
            created_at: Some(Utc::now()),
        })
        .collect();

    store.discounts.push(Discount {
        id: Some(ResourceId::generate()),
        code: "WELCOME10".into(),
        kind: DiscountType::Percentage,
        value: 10,
        usage_limit: Some(100),
        remaining_uses: Some(87),
        is_active: true,
        expires_at: None,
        created_at: Some(Utc::now()),
    });

    store.workshops.push(Workshop {
        id: Some(ResourceId::generate()),
        title: "Loom Weaving for Beginners".into(),
        description: Some("Learn the basics of inabel weaving".into()),
        location: Some("Vigan Heritage Village".into()),
        date: (Utc::now() + Duration::days(14)).date_naive(),
        time: Some("09:00".into()),
        max_participants: 15,
        status: WorkshopStatus::Upcoming,
        registration_link: None,
        image_url: None,
    });

    store.orders = vec![
        order(170_000, "gcash", "completed"),
        order(120_000, "cod", "completed"),
        order(35_000, "paymaya", "cancelled"),
    ];

    store
}

fn order(total_amount: i64, method: &str, status: &str) -> OrderRecord {
    OrderRecord {
        id: Some(ResourceId::generate()),
        total_amount,
        payment_method: Some(method.to_string()),
        status: status.to_string(),
        created_at: Some(Utc::now()),
    }
}
