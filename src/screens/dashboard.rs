use std::collections::BTreeMap;

use crate::{
    client::ApiClient,
    error::{ClientError, ClientResult},
    models::{DashboardSummary, OrderRecord, PaymentMethodBreakdown},
    scope::ViewScope,
};

use super::LoadState;

const UNKNOWN_METHOD: &str = "unknown";

pub struct DashboardScreen {
    client: ApiClient,
    scope: ViewScope,
    commission_rate: f64,
    state: LoadState,
    summary: Option<DashboardSummary>,
}

impl DashboardScreen {
    pub fn new(client: ApiClient, commission_rate: f64) -> Self {
        Self {
            client,
            scope: ViewScope::new(),
            commission_rate,
            state: LoadState::Idle,
            summary: None,
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn summary(&self) -> Option<&DashboardSummary> {
        self.summary.as_ref()
    }

    /// Loads the server summary. When the server has nothing yet, figures are
    /// estimated from the seller's orders and flagged as such.
    pub async fn load(&mut self) -> ClientResult<&DashboardSummary> {
        if self.scope.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        let previous = std::mem::replace(&mut self.state, LoadState::Loading);
        match self.fetch().await {
            Ok(summary) => {
                self.state = LoadState::Loaded;
                Ok(self.summary.insert(summary))
            }
            Err(ClientError::Cancelled) => {
                self.state = previous;
                Err(ClientError::Cancelled)
            }
            Err(err) => {
                self.state = LoadState::Errored(err.to_string());
                Err(err)
            }
        }
    }

    async fn fetch(&self) -> ClientResult<DashboardSummary> {
        let summary = self.scope.run(self.client.dashboard_summary()).await?;
        if !summary.is_empty() {
            return Ok(summary);
        }
        let orders = self.scope.run(self.client.seller_orders()).await?;
        if orders.is_empty() {
            return Ok(summary);
        }
        tracing::debug!(
            orders = orders.len(),
            rate = self.commission_rate,
            "server summary empty, estimating from orders"
        );
        Ok(estimate_summary(&orders, self.commission_rate))
    }
}

/// Client-side approximation of the server's figures. Cancelled orders are
/// ignored; commission is rounded to the nearest minor unit.
pub fn estimate_summary(orders: &[OrderRecord], commission_rate: f64) -> DashboardSummary {
    let mut by_method: BTreeMap<String, PaymentMethodBreakdown> = BTreeMap::new();
    let mut total_revenue = 0i64;
    let mut total_orders = 0u64;

    for order in orders
        .iter()
        .filter(|o| !o.status.eq_ignore_ascii_case("cancelled"))
    {
        total_revenue = total_revenue.saturating_add(order.total_amount);
        total_orders += 1;
        let method = order
            .payment_method
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(UNKNOWN_METHOD)
            .to_ascii_lowercase();
        let entry = by_method
            .entry(method.clone())
            .or_insert_with(|| PaymentMethodBreakdown {
                method,
                total: 0,
                count: 0,
            });
        entry.total = entry.total.saturating_add(order.total_amount);
        entry.count += 1;
    }

    let total_commission = (total_revenue as f64 * commission_rate).round() as i64;
    DashboardSummary {
        total_revenue,
        total_commission,
        net_earnings: total_revenue - total_commission,
        total_orders,
        payment_methods: by_method.into_values().collect(),
        estimated: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(amount: i64, method: Option<&str>, status: &str) -> OrderRecord {
        OrderRecord {
            id: None,
            total_amount: amount,
            payment_method: method.map(str::to_string),
            status: status.to_string(),
            created_at: None,
        }
    }

    #[test]
    fn estimate_groups_by_method_and_skips_cancelled() {
        let orders = vec![
            order(100_000, Some("GCash"), "completed"),
            order(50_000, Some("gcash"), "paid"),
            order(25_000, None, "paid"),
            order(999_999, Some("cod"), "cancelled"),
        ];
        let summary = estimate_summary(&orders, 0.02);
        assert!(summary.estimated);
        assert_eq!(summary.total_revenue, 175_000);
        assert_eq!(summary.total_commission, 3_500);
        assert_eq!(summary.net_earnings, 171_500);
        assert_eq!(summary.total_orders, 3);
        assert_eq!(summary.payment_methods.len(), 2);
        assert_eq!(summary.payment_methods[0].method, "gcash");
        assert_eq!(summary.payment_methods[0].count, 2);
        assert_eq!(summary.payment_methods[1].method, "unknown");
    }

    #[test]
    fn commission_rate_is_configurable() {
        let summary = estimate_summary(&[order(10_000, Some("cod"), "paid")], 0.05);
        assert_eq!(summary.total_commission, 500);
    }

    #[test]
    fn huge_totals_saturate_instead_of_overflowing() {
        let orders = vec![
            order(i64::MAX, Some("gcash"), "paid"),
            order(i64::MAX, Some("gcash"), "paid"),
        ];
        let summary = estimate_summary(&orders, 0.0);
        assert_eq!(summary.total_revenue, i64::MAX);
        assert_eq!(summary.payment_methods[0].total, i64::MAX);
    }

    fn unreachable_client() -> ApiClient {
        ApiClient::with_client(
            "http://127.0.0.1:9/api",
            crate::session::Session::in_memory(),
            reqwest::Client::new(),
        )
    }

    #[tokio::test]
    async fn load_on_a_cancelled_scope_keeps_state() {
        let mut screen = DashboardScreen::new(unreachable_client(), 0.02);
        screen.scope().cancel();

        assert!(matches!(screen.load().await, Err(ClientError::Cancelled)));
        assert_eq!(screen.state(), &LoadState::Idle);
        assert!(screen.summary().is_none());
    }

    #[tokio::test]
    async fn load_cancelled_in_flight_restores_state() {
        // Accepts connections into the backlog and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/api", listener.local_addr().unwrap());
        let client = ApiClient::with_client(
            &base,
            crate::session::Session::in_memory(),
            reqwest::Client::new(),
        );
        let mut screen = DashboardScreen::new(client, 0.02);
        let handle = screen.scope().handle();

        let (result, _) = tokio::join!(screen.load(), async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            handle.cancel();
        });

        assert!(matches!(result, Err(ClientError::Cancelled)));
        assert_eq!(screen.state(), &LoadState::Idle);
    }
}
