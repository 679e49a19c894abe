use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};

use crate::{
    client::ApiClient,
    dto::discounts::CreateDiscountRequest,
    error::{ClientError, ClientResult},
    models::{Discount, DiscountType, ResourceId},
    scope::ViewScope,
    validation::{
        clamp_discount_value, generate_discount_code, is_valid_discount_code,
        normalize_discount_code,
    },
};

use super::{
    Confirm, LoadState, Outcome,
    collection::{Action, SharedCollection},
};

#[derive(Debug, Clone, PartialEq)]
pub struct DiscountForm {
    pub code: String,
    pub kind: DiscountType,
    value: u32,
    pub usage_limit: Option<u32>,
    pub expires_at: Option<NaiveDate>,
}

impl Default for DiscountForm {
    fn default() -> Self {
        Self {
            code: String::new(),
            kind: DiscountType::Percentage,
            value: 10,
            usage_limit: None,
            expires_at: None,
        }
    }
}

impl DiscountForm {
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Any entry is clamped into `[1, 100]`.
    pub fn set_value(&mut self, raw: i64) -> u32 {
        self.value = clamp_discount_value(raw);
        self.value
    }

    pub fn set_code(&mut self, raw: &str) {
        self.code = normalize_discount_code(raw);
    }

    pub fn generate_code(&mut self) -> &str {
        self.code = generate_discount_code(&mut rand::thread_rng());
        &self.code
    }

    pub fn validate(&self, today: NaiveDate) -> ClientResult<CreateDiscountRequest> {
        if self.code.is_empty() {
            return Err(ClientError::validation("Discount code is required"));
        }
        if !is_valid_discount_code(&self.code) {
            return Err(ClientError::validation(
                "Discount code must be 4-20 uppercase letters or digits",
            ));
        }
        if self.usage_limit == Some(0) {
            return Err(ClientError::validation("Usage limit must be at least 1"));
        }
        if let Some(expiry) = self.expires_at {
            if expiry < today {
                return Err(ClientError::validation("Expiry date is in the past"));
            }
        }
        Ok(CreateDiscountRequest {
            code: self.code.clone(),
            kind: self.kind,
            value: self.value,
            usage_limit: self.usage_limit,
            expires_at: self.expires_at,
        })
    }
}

pub struct DiscountScreen {
    client: ApiClient,
    confirm: Arc<dyn Confirm>,
    scope: ViewScope,
    discounts: SharedCollection<Discount>,
    form: Mutex<DiscountForm>,
}

impl DiscountScreen {
    pub fn new(client: ApiClient, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            client,
            confirm,
            scope: ViewScope::new(),
            discounts: SharedCollection::default(),
            form: Mutex::new(DiscountForm::default()),
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn discounts(&self) -> Vec<Discount> {
        self.discounts.snapshot()
    }

    pub fn state(&self) -> LoadState {
        self.discounts.state()
    }

    pub fn is_busy(&self, action: &Action) -> bool {
        self.discounts.is_busy(action)
    }

    pub fn form(&self) -> DiscountForm {
        self.form_lock().clone()
    }

    pub fn edit_form<R>(&self, edit: impl FnOnce(&mut DiscountForm) -> R) -> R {
        edit(&mut self.form_lock())
    }

    pub async fn load(&self) -> ClientResult<usize> {
        self.discounts
            .fetch(&self.scope, self.client.list_discounts())
            .await
    }

    /// Validates the form, creates the code and puts the server's copy first.
    pub async fn create(&self) -> ClientResult<Discount> {
        let payload = self.form_lock().validate(Utc::now().date_naive())?;
        let _busy = self.discounts.begin(Action::Create)?;
        let created = self
            .scope
            .run(self.client.create_discount(&payload))
            .await?;
        self.discounts.lock().prepend(created.clone());
        *self.form_lock() = DiscountForm::default();
        tracing::debug!(code = %created.code, "discount created");
        Ok(created)
    }

    pub async fn disable(&self, id: Option<&ResourceId>) -> ClientResult<Outcome> {
        let id = id.ok_or(ClientError::MissingId)?.clone();
        let already_inactive = self
            .discounts
            .lock()
            .get(&id)
            .is_some_and(|d| !d.is_active);
        if already_inactive {
            return Ok(Outcome::Unchanged);
        }
        let _busy = self.discounts.begin(Action::Disable(id.clone()))?;
        let updated = self.scope.run(self.client.disable_discount(&id)).await?;
        self.discounts.lock().update(&id, |d| {
            d.is_active = false;
            d.remaining_uses = updated.remaining_uses;
        });
        Ok(Outcome::Changed)
    }

    pub async fn delete(&self, id: Option<&ResourceId>) -> ClientResult<Outcome> {
        let client = &self.client;
        self.discounts
            .delete_confirmed(
                &self.scope,
                self.confirm.as_ref(),
                id,
                "Delete this discount code? This cannot be undone.",
                |id| async move { client.delete_discount(&id).await },
            )
            .await
    }

    fn form_lock(&self) -> std::sync::MutexGuard<'_, DiscountForm> {
        self.form
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn value_entry_is_clamped() {
        let mut form = DiscountForm::default();
        assert_eq!(form.set_value(150), 100);
        assert_eq!(form.set_value(0), 1);
        assert_eq!(form.value(), 1);
    }

    #[test]
    fn generated_code_passes_validation() {
        let mut form = DiscountForm::default();
        form.generate_code();
        let payload = form.validate(today()).unwrap();
        assert_eq!(payload.code.len(), 8);
        assert_eq!(payload.value, 10);
    }

    #[test]
    fn validation_rejects_bad_input() {
        let mut form = DiscountForm::default();
        assert!(form.validate(today()).is_err());

        form.set_code("ab");
        assert!(form.validate(today()).is_err());

        form.set_code("holiday-25");
        form.expires_at = NaiveDate::from_ymd_opt(2026, 1, 1);
        assert!(form.validate(today()).is_err());

        form.expires_at = Some(today());
        form.usage_limit = Some(0);
        assert!(form.validate(today()).is_err());

        form.usage_limit = Some(50);
        let payload = form.validate(today()).unwrap();
        assert_eq!(payload.code, "HOLIDAY25");
    }
}
