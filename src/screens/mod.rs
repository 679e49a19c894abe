//! Headless view models for the seller dashboard screens.
//!
//! Each screen owns its state exclusively and a [`ViewScope`](crate::scope::ViewScope);
//! every mutation reports an [`Outcome`] so callers can tell "changed" from
//! "unchanged" without diffing state.

pub mod collection;
pub mod dashboard;
pub mod discounts;
pub mod gateway;
pub mod product_form;
pub mod products;
pub mod profile;
pub mod workshops;

pub use collection::{Action, Collection, LoadState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
}

impl Outcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Outcome::Changed)
    }
}

/// Where the caller should go after an action completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Login,
}

/// Blocking yes/no confirmation shown before destructive actions.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
