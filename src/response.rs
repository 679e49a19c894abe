use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

/// Pulls the `message` field out of an error body, if the body is JSON.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Normalises the list envelopes the API is known to return into a plain ordered list.
///
/// Accepted shapes, checked in order:
/// `[..]`, `{"<key>": [..]}`, `{"data": [..]}`, `{"data": {"<key>": [..]}}`,
/// `{"data": {"items": [..]}}`, `{"items": [..]}`. A `null` or missing payload is an
/// empty list.
pub fn normalize_list<T: DeserializeOwned>(body: Value, key: &str) -> ClientResult<Vec<T>> {
    let list = match body {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => Value::Array(items),
        Value::Object(mut outer) => {
            if let Some(found @ Value::Array(_)) = outer.remove(key) {
                found
            } else {
                match outer.remove("data") {
                    Some(found @ Value::Array(_)) => found,
                    Some(Value::Object(mut inner)) => match inner
                        .remove(key)
                        .or_else(|| inner.remove("items"))
                    {
                        Some(found @ Value::Array(_)) => found,
                        _ => return Err(unexpected_shape(key)),
                    },
                    Some(Value::Null) => return Ok(Vec::new()),
                    Some(_) => return Err(unexpected_shape(key)),
                    None => match outer.remove("items") {
                        Some(found @ Value::Array(_)) => found,
                        _ => return Err(unexpected_shape(key)),
                    },
                }
            }
        }
        _ => return Err(unexpected_shape(key)),
    };

    serde_json::from_value(list).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Unwraps a single entity from `{"data": {"<key>": {..}}}`, `{"data": {..}}`,
/// `{"<key>": {..}}` or the bare entity.
pub fn normalize_entity<T: DeserializeOwned>(body: Value, key: &str) -> ClientResult<T> {
    let entity = match body {
        Value::Object(mut outer) => {
            if let Some(Value::Object(mut data)) = outer.remove("data") {
                match data.remove(key) {
                    Some(inner @ Value::Object(_)) => inner,
                    Some(other) => {
                        data.insert(key.to_string(), other);
                        Value::Object(data)
                    }
                    None => Value::Object(data),
                }
            } else if let Some(inner @ Value::Object(_)) = outer.remove(key) {
                inner
            } else {
                outer.remove("message");
                outer.remove("meta");
                Value::Object(outer)
            }
        }
        Value::Null => {
            return Err(ClientError::Decode(format!("expected a {key}, got null")));
        }
        other => other,
    };

    serde_json::from_value(entity).map_err(|e| ClientError::Decode(e.to_string()))
}

fn unexpected_shape(key: &str) -> ClientError {
    ClientError::Decode(format!("unrecognised {key} list envelope"))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        code: String,
    }

    fn codes(items: Vec<Item>) -> Vec<String> {
        items.into_iter().map(|i| i.code).collect()
    }

    #[test]
    fn list_envelopes_normalize_to_the_same_order() {
        let shapes = [
            json!([{ "code": "A" }, { "code": "B" }]),
            json!({ "data": [{ "code": "A" }, { "code": "B" }] }),
            json!({ "discounts": [{ "code": "A" }, { "code": "B" }] }),
            json!({ "data": { "discounts": [{ "code": "A" }, { "code": "B" }] } }),
            json!({ "message": "OK", "data": { "items": [{ "code": "A" }, { "code": "B" }] } }),
        ];

        for shape in shapes {
            let items: Vec<Item> = normalize_list(shape, "discounts").expect("normalized");
            assert_eq!(codes(items), vec!["A", "B"]);
        }
    }

    #[test]
    fn null_payload_is_an_empty_list() {
        let items: Vec<Item> = normalize_list(json!({ "data": null }), "workshops").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn unknown_list_shape_is_a_decode_error() {
        let err = normalize_list::<Item>(json!({ "rows": [] }), "discounts").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn entity_envelopes_unwrap() {
        let wrapped: Item = normalize_entity(json!({ "data": { "code": "X" } }), "discount").unwrap();
        let keyed: Item =
            normalize_entity(json!({ "data": { "discount": { "code": "Y" } } }), "discount").unwrap();
        let bare: Item = normalize_entity(json!({ "code": "Z" }), "discount").unwrap();
        assert_eq!(wrapped.code, "X");
        assert_eq!(keyed.code, "Y");
        assert_eq!(bare.code, "Z");
    }

    #[test]
    fn error_message_reads_message_field() {
        assert_eq!(
            error_message(r#"{"message":"Code already exists"}"#).as_deref(),
            Some("Code already exists")
        );
        assert_eq!(error_message("<html>"), None);
    }
}
