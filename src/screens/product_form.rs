use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{
    client::ApiClient,
    dto::{
        products::fields,
        upload::{FileUpload, UploadForm},
    },
    error::{ClientError, ClientResult},
    models::{Category, Product, ProductStatus},
    validation::{
        MAX_ADDITIONAL_IMAGES, MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS, max_chars, require,
        validate_image, validate_video,
    },
};

/// Categories offered even when the API's category list is empty or down.
pub const FALLBACK_CATEGORIES: [&str; 8] = [
    "Handicrafts",
    "Home Decor",
    "Jewelry & Accessories",
    "Textiles & Weaving",
    "Pottery & Ceramics",
    "Woodwork",
    "Paintings & Prints",
    "Local Delicacies",
];

/// Persists a finished product form. The API client is the production saver.
#[async_trait]
pub trait ProductSaver: Send + Sync {
    async fn save_product(&self, upload: UploadForm) -> ClientResult<Product>;
}

#[async_trait]
impl ProductSaver for ApiClient {
    async fn save_product(&self, upload: UploadForm) -> ClientResult<Product> {
        self.create_product(upload).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImagePreview {
    pub file_name: String,
    pub size: usize,
    pub data_url: String,
}

impl ImagePreview {
    fn of(upload: &FileUpload) -> Self {
        Self {
            file_name: upload.file_name.clone(),
            size: upload.size(),
            data_url: format!("data:{};base64,{}", upload.mime, STANDARD.encode(&upload.bytes)),
        }
    }
}

/// Server categories first, then any fallback whose name the server did not
/// already supply. Names are compared case-insensitively.
pub fn merge_categories(server: &[Category]) -> Vec<Category> {
    let mut merged: Vec<Category> = Vec::with_capacity(server.len() + FALLBACK_CATEGORIES.len());
    for category in server {
        if !contains_name(&merged, &category.name) {
            merged.push(category.clone());
        }
    }
    for name in FALLBACK_CATEGORIES {
        if !contains_name(&merged, name) {
            merged.push(Category {
                id: None,
                name: name.to_string(),
            });
        }
    }
    merged
}

fn contains_name(categories: &[Category], name: &str) -> bool {
    let name = name.trim();
    categories
        .iter()
        .any(|c| c.name.trim().eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub title: String,
    pub description: String,
    pub price: i64,
    pub stock_quantity: i64,
    pub category: String,
    pub status: ProductStatus,
    tags: Vec<String>,
    main_image: Option<FileUpload>,
    additional_images: Vec<FileUpload>,
    video: Option<FileUpload>,
}

impl ProductForm {
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn main_image(&self) -> Option<&FileUpload> {
        self.main_image.as_ref()
    }

    pub fn additional_images(&self) -> &[FileUpload] {
        &self.additional_images
    }

    pub fn video(&self) -> Option<&FileUpload> {
        self.video.as_ref()
    }

    /// Called when Enter is pressed in the tag input. Exact duplicates and
    /// blank input are ignored.
    pub fn add_tag(&mut self, raw: &str) -> bool {
        let tag = raw.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    pub fn set_main_image(&mut self, upload: FileUpload) -> ClientResult<ImagePreview> {
        validate_image(&upload)?;
        let preview = ImagePreview::of(&upload);
        self.main_image = Some(upload);
        Ok(preview)
    }

    pub fn add_additional_image(&mut self, upload: FileUpload) -> ClientResult<ImagePreview> {
        if self.additional_images.len() >= MAX_ADDITIONAL_IMAGES {
            return Err(ClientError::validation(format!(
                "You can add up to {MAX_ADDITIONAL_IMAGES} additional images"
            )));
        }
        validate_image(&upload)?;
        let preview = ImagePreview::of(&upload);
        self.additional_images.push(upload);
        Ok(preview)
    }

    pub fn remove_additional_image(&mut self, index: usize) -> Option<FileUpload> {
        (index < self.additional_images.len()).then(|| self.additional_images.remove(index))
    }

    pub fn set_video(&mut self, upload: FileUpload) -> ClientResult<()> {
        validate_video(&upload)?;
        self.video = Some(upload);
        Ok(())
    }

    pub fn clear_video(&mut self) {
        self.video = None;
    }

    /// Maps the form onto the multipart field names the API expects.
    pub fn to_upload(&self) -> ClientResult<UploadForm> {
        require(&self.title, "Product title")?;
        max_chars(&self.title, MAX_TITLE_CHARS, "Product title")?;
        max_chars(&self.description, MAX_DESCRIPTION_CHARS, "Description")?;
        if self.price < 0 {
            return Err(ClientError::validation("Price cannot be negative"));
        }
        if self.stock_quantity < 0 {
            return Err(ClientError::validation("Stock cannot be negative"));
        }
        if self.main_image.is_none() {
            tracing::warn!(title = %self.title, "submitting product without a main image");
        }

        let tags = serde_json::to_string(&self.tags)
            .map_err(|e| ClientError::validation(e.to_string()))?;
        let mut upload = UploadForm::default()
            .text(fields::NAME, self.title.trim())
            .text(fields::DESCRIPTION, self.description.trim())
            .text(fields::PRICE, self.price.to_string())
            .text(fields::STOCK, self.stock_quantity.to_string())
            .text(fields::TAGS, tags)
            .text(fields::STATUS, self.status.as_str());
        if !self.category.trim().is_empty() {
            upload = upload.text(fields::CATEGORY, self.category.trim());
        }
        if let Some(image) = &self.main_image {
            upload = upload.file(fields::MAIN_IMAGE, image.clone());
        }
        for image in &self.additional_images {
            upload = upload.file(fields::ADDITIONAL_IMAGES, image.clone());
        }
        if let Some(video) = &self.video {
            upload = upload.file(fields::VIDEO, video.clone());
        }
        Ok(upload)
    }

    /// Hands the payload to `saver` and clears the form once it is saved.
    pub async fn submit(&mut self, saver: &dyn ProductSaver) -> ClientResult<Product> {
        let upload = self.to_upload()?;
        let product = saver.save_product(upload).await?;
        tracing::debug!(name = %product.name, "product saved");
        *self = ProductForm::default();
        Ok(product)
    }
}
