use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct FeaturedToggleRequest {
    pub is_featured: bool,
}

/// Multipart field names expected by `POST /seller/products`.
pub mod fields {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const PRICE: &str = "price";
    pub const STOCK: &str = "stock_quantity";
    pub const CATEGORY: &str = "category";
    pub const TAGS: &str = "tags";
    pub const STATUS: &str = "status";
    pub const MAIN_IMAGE: &str = "image";
    pub const ADDITIONAL_IMAGES: &str = "additional_images";
    pub const VIDEO: &str = "video";
}
