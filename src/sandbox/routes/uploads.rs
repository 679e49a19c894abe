use std::collections::HashMap;

use axum::extract::Multipart;

use crate::{dto::upload::FileUpload, sandbox::error::AppResult};

/// Text fields and files of a multipart body, grouped by field name.
#[derive(Debug, Default)]
pub struct ParsedUpload {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, Vec<FileUpload>>,
}

impl ParsedUpload {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Stand-in for a stored object URL.
    pub fn url_for(&self, name: &str) -> Option<String> {
        self.urls_for(name).into_iter().next()
    }

    pub fn urls_for(&self, name: &str) -> Vec<String> {
        self.files
            .get(name)
            .map(|files| {
                files
                    .iter()
                    .map(|f| format!("/uploads/{}-{}", uuid::Uuid::new_v4(), f.file_name))
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub async fn parse_multipart(mut multipart: Multipart) -> AppResult<ParsedUpload> {
    let mut parsed = ParsedUpload::default();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?.to_vec();
                parsed
                    .files
                    .entry(name)
                    .or_default()
                    .push(FileUpload::new(file_name, mime, bytes));
            }
            None => {
                let value = field.text().await?;
                parsed.fields.insert(name, value);
            }
        }
    }
    Ok(parsed)
}
