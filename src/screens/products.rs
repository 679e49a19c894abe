use std::sync::Arc;

use crate::{
    client::ApiClient,
    error::{ClientError, ClientResult},
    models::{Product, ResourceId},
    scope::ViewScope,
};

use super::{
    Confirm, LoadState, Outcome,
    collection::{Action, SharedCollection},
    product_form::ProductForm,
};

/// Seller product list with delete and the featured-product toggle.
pub struct ProductScreen {
    client: ApiClient,
    confirm: Arc<dyn Confirm>,
    scope: ViewScope,
    products: SharedCollection<Product>,
}

impl ProductScreen {
    pub fn new(client: ApiClient, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            client,
            confirm,
            scope: ViewScope::new(),
            products: SharedCollection::default(),
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn products(&self) -> Vec<Product> {
        self.products.snapshot()
    }

    pub fn featured(&self) -> Vec<Product> {
        self.products
            .lock()
            .items()
            .iter()
            .filter(|p| p.is_featured)
            .cloned()
            .collect()
    }

    pub fn state(&self) -> LoadState {
        self.products.state()
    }

    pub fn is_busy(&self, action: &Action) -> bool {
        self.products.is_busy(action)
    }

    pub async fn load(&self) -> ClientResult<usize> {
        self.products
            .fetch(&self.scope, self.client.list_products())
            .await
    }

    /// Saves the authoring form and puts the server's copy first. The form is
    /// reset only when the save succeeds.
    pub async fn create(&self, form: &mut ProductForm) -> ClientResult<Product> {
        let _busy = self.products.begin(Action::Create)?;
        let created = self.scope.run(form.submit(&self.client)).await?;
        self.products.lock().prepend(created.clone());
        tracing::debug!(name = %created.name, "product created");
        Ok(created)
    }

    /// Flips the featured flag once the API acknowledges it. A product without
    /// an id is rejected before any request is made.
    pub async fn toggle_featured(&self, id: Option<&ResourceId>) -> ClientResult<Outcome> {
        let id = id.ok_or(ClientError::MissingId)?.clone();
        let current = self
            .products
            .lock()
            .get(&id)
            .map(|p| p.is_featured)
            .ok_or(ClientError::NotFound)?;
        let target = !current;

        let _busy = self.products.begin(Action::Toggle(id.clone()))?;
        let acknowledged = self
            .scope
            .run(self.client.set_featured(&id, target))
            .await?;
        if acknowledged.is_featured != target {
            tracing::warn!(%id, target, "featured toggle not applied by the api");
            return Ok(Outcome::Unchanged);
        }
        self.products.lock().update(&id, |p| p.is_featured = target);
        tracing::debug!(%id, is_featured = target, "featured flag reconciled");
        Ok(Outcome::Changed)
    }

    pub async fn delete(&self, id: Option<&ResourceId>) -> ClientResult<Outcome> {
        let client = &self.client;
        self.products
            .delete_confirmed(
                &self.scope,
                self.confirm.as_ref(),
                id,
                "Delete this product? This cannot be undone.",
                |id| async move { client.delete_product(&id).await },
            )
            .await
    }
}
