use std::{
    collections::HashSet,
    future::Future,
    sync::{Mutex, MutexGuard},
};

use crate::{
    error::{ClientError, ClientResult},
    models::{Keyed, ResourceId},
    scope::ViewScope,
};

use super::{Confirm, Outcome};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored(String),
}

/// A mutating action that disables its control while in flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Delete(ResourceId),
    Toggle(ResourceId),
    Disable(ResourceId),
}

/// Ordered projection of a server-side collection.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    state: LoadState,
    busy: HashSet<Action>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            state: LoadState::Idle,
            busy: HashSet::new(),
        }
    }
}

impl<T: Keyed + Clone> Collection<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_busy(&self, action: &Action) -> bool {
        self.busy.contains(action)
    }

    pub fn get(&self, id: &ResourceId) -> Option<&T> {
        self.items.iter().find(|item| item.key() == Some(id))
    }

    /// Moves to `Loading` and hands back the state it replaced.
    pub fn start_loading(&mut self) -> LoadState {
        std::mem::replace(&mut self.state, LoadState::Loading)
    }

    /// Puts back a state saved by [`Collection::start_loading`].
    pub fn restore(&mut self, state: LoadState) {
        self.state = state;
    }

    /// Replaces the items with the server's list, keeping its order.
    pub fn loaded(&mut self, items: Vec<T>) {
        self.items = items;
        self.state = LoadState::Loaded;
    }

    /// Keeps the last known-good items.
    pub fn failed(&mut self, message: impl Into<String>) {
        self.state = LoadState::Errored(message.into());
    }

    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
    }

    pub fn remove(&mut self, id: &ResourceId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.key() != Some(id));
        self.items.len() != before
    }

    pub fn update(&mut self, id: &ResourceId, apply: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|item| item.key() == Some(id)) {
            Some(item) => {
                apply(item);
                true
            }
            None => false,
        }
    }

    fn begin(&mut self, action: Action) -> ClientResult<()> {
        if self.busy.insert(action) {
            Ok(())
        } else {
            Err(ClientError::Busy)
        }
    }
}

/// Screen-owned collection. The lock is never held across an await.
#[derive(Debug)]
pub struct SharedCollection<T> {
    inner: Mutex<Collection<T>>,
}

impl<T> Default for SharedCollection<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Collection::default()),
        }
    }
}

impl<T: Keyed + Clone> SharedCollection<T> {
    pub fn lock(&self) -> MutexGuard<'_, Collection<T>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.lock().items().to_vec()
    }

    pub fn state(&self) -> LoadState {
        self.lock().state().clone()
    }

    pub fn is_busy(&self, action: &Action) -> bool {
        self.lock().is_busy(action)
    }

    /// Marks `action` busy until the returned guard is dropped.
    pub fn begin(&self, action: Action) -> ClientResult<BusyGuard<'_, T>> {
        self.lock().begin(action.clone())?;
        Ok(BusyGuard {
            collection: self,
            action,
        })
    }

    /// `idle -> loading -> loaded | errored`. A cancelled fetch leaves state alone.
    pub async fn fetch<F>(&self, scope: &ViewScope, request: F) -> ClientResult<usize>
    where
        F: Future<Output = ClientResult<Vec<T>>>,
    {
        if scope.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        let previous = self.lock().start_loading();
        match scope.run(request).await {
            Ok(items) => {
                let count = items.len();
                self.lock().loaded(items);
                Ok(count)
            }
            Err(ClientError::Cancelled) => {
                self.lock().restore(previous);
                Err(ClientError::Cancelled)
            }
            Err(err) => {
                self.lock().failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Confirmed delete shared by every list screen: nothing is sent when the
    /// user declines, and the item is only dropped after the API agrees.
    pub async fn delete_confirmed<F, Fut>(
        &self,
        scope: &ViewScope,
        confirm: &dyn Confirm,
        id: Option<&ResourceId>,
        prompt: &str,
        request: F,
    ) -> ClientResult<Outcome>
    where
        F: FnOnce(ResourceId) -> Fut,
        Fut: Future<Output = ClientResult<()>>,
    {
        let id = id.ok_or(ClientError::MissingId)?.clone();
        if !confirm.confirm(prompt) {
            return Ok(Outcome::Unchanged);
        }
        let _busy = self.begin(Action::Delete(id.clone()))?;
        scope.run(request(id.clone())).await?;
        let removed = self.lock().remove(&id);
        tracing::debug!(%id, removed, "reconciled delete");
        Ok(Outcome::Changed)
    }
}

pub struct BusyGuard<'a, T: Keyed + Clone> {
    collection: &'a SharedCollection<T>,
    action: Action,
}

impl<T: Keyed + Clone> Drop for BusyGuard<'_, T> {
    fn drop(&mut self) {
        self.collection.lock().busy.remove(&self.action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: Option<ResourceId>,
        flag: bool,
    }

    impl Keyed for Row {
        fn key(&self) -> Option<&ResourceId> {
            self.id.as_ref()
        }
    }

    fn row(id: &str) -> Row {
        Row {
            id: Some(ResourceId::new(id)),
            flag: false,
        }
    }

    #[test]
    fn prepend_puts_new_items_first() {
        let mut collection = Collection::default();
        collection.loaded(vec![row("a"), row("b")]);
        collection.prepend(row("c"));
        let ids: Vec<_> = collection
            .items()
            .iter()
            .map(|r| r.id.clone().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn failed_load_keeps_previous_items() {
        let mut collection = Collection::default();
        collection.loaded(vec![row("a")]);
        collection.start_loading();
        collection.failed("boom");
        assert_eq!(collection.items().len(), 1);
        assert_eq!(collection.state(), &LoadState::Errored("boom".into()));
    }

    #[test]
    fn update_and_remove_by_id() {
        let mut collection = Collection::default();
        collection.loaded(vec![row("a"), row("b")]);
        assert!(collection.update(&ResourceId::new("b"), |r| r.flag = true));
        assert!(collection.get(&ResourceId::new("b")).unwrap().flag);
        assert!(collection.remove(&ResourceId::new("a")));
        assert!(!collection.remove(&ResourceId::new("a")));
        assert_eq!(collection.items().len(), 1);
    }

    #[test]
    fn busy_guard_rejects_duplicates_until_dropped() {
        let shared: SharedCollection<Row> = SharedCollection::default();
        let guard = shared.begin(Action::Create).unwrap();
        assert!(shared.is_busy(&Action::Create));
        assert!(matches!(shared.begin(Action::Create), Err(ClientError::Busy)));
        assert!(shared.begin(Action::Delete(ResourceId::new("a"))).is_ok());
        drop(guard);
        assert!(!shared.is_busy(&Action::Create));
    }

    #[tokio::test]
    async fn cancelled_fetch_keeps_the_previous_state() {
        let shared: SharedCollection<Row> = SharedCollection::default();
        let scope = ViewScope::new();
        shared.fetch(&scope, async { Ok(vec![row("a")]) }).await.unwrap();

        scope.cancel();
        let result = shared.fetch(&scope, async { Ok(Vec::new()) }).await;

        assert!(matches!(result, Err(ClientError::Cancelled)));
        assert_eq!(shared.state(), LoadState::Loaded);
        assert_eq!(shared.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn fetch_cancelled_in_flight_restores_state() {
        let shared: SharedCollection<Row> = SharedCollection::default();
        let scope = ViewScope::new();
        let handle = scope.handle();

        let result = shared
            .fetch(&scope, async move {
                handle.cancel();
                std::future::pending::<ClientResult<Vec<Row>>>().await
            })
            .await;

        assert!(matches!(result, Err(ClientError::Cancelled)));
        assert_eq!(shared.state(), LoadState::Idle);
    }

    #[tokio::test]
    async fn declined_delete_never_calls_the_api() {
        let shared: SharedCollection<Row> = SharedCollection::default();
        shared.lock().loaded(vec![row("a")]);
        let scope = ViewScope::new();
        let decline = |_: &str| false;

        let outcome = shared
            .delete_confirmed(&scope, &decline, Some(&ResourceId::new("a")), "Delete?", |_| async {
                Err(ClientError::validation("api must not be called"))
            })
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(shared.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn failed_delete_leaves_the_item() {
        let shared: SharedCollection<Row> = SharedCollection::default();
        shared.lock().loaded(vec![row("a")]);
        let scope = ViewScope::new();
        let accept = |_: &str| true;

        let result = shared
            .delete_confirmed(&scope, &accept, Some(&ResourceId::new("a")), "Delete?", |_| async {
                Err(ClientError::Api {
                    status: 500,
                    message: "boom".into(),
                })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(shared.snapshot().len(), 1);
        assert!(!shared.is_busy(&Action::Delete(ResourceId::new("a"))));
    }
}
