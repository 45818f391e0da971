// ── Orders ──
//
// Orders are read-only from the console; the view polls for new ones and
// keeps a running "new orders" alert until the operator acknowledges it.

use std::sync::Arc;

use super::ResourceView;
use crate::model::{Order, OrderStatus};
use crate::transport::Transport;

/// Status and free-text filter for the order list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    /// Case-insensitive match on customer name or order id.
    pub query: Option<String>,
}

impl OrderFilter {
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = (!query.trim().is_empty()).then_some(query);
        self
    }

    pub fn matches(&self, order: &Order) -> bool {
        if self.status.is_some_and(|s| s != order.status) {
            return false;
        }
        let Some(query) = &self.query else {
            return true;
        };
        let needle = query.trim().to_lowercase();
        order.customer.to_lowercase().contains(&needle)
            || order.id.to_string().to_lowercase().contains(&needle)
    }

    pub fn apply(&self, orders: &[Arc<Order>]) -> Vec<Arc<Order>> {
        orders.iter().filter(|o| self.matches(o)).cloned().collect()
    }
}

/// Accumulates new-order arrivals until acknowledged.
#[derive(Debug, Default, Clone)]
pub struct OrderAlerts {
    pending: Vec<Arc<Order>>,
}

impl OrderAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, arrivals: &[Arc<Order>]) {
        self.pending.extend(arrivals.iter().cloned());
    }

    /// Number of unacknowledged new orders.
    pub fn count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending(&self) -> &[Arc<Order>] {
        &self.pending
    }

    /// The newest pending order by `createdAt`. Orders without a usable
    /// timestamp rank below timestamped ones; ties go to the later arrival.
    pub fn latest(&self) -> Option<&Arc<Order>> {
        self.pending
            .iter()
            .enumerate()
            .max_by_key(|(seen, order)| (order.created_at_millis(), *seen))
            .map(|(_, order)| order)
    }

    /// Dismiss the alert, returning what it held, newest first.
    pub fn acknowledge(&mut self) -> Vec<Arc<Order>> {
        let mut orders: Vec<(usize, Arc<Order>)> =
            std::mem::take(&mut self.pending).into_iter().enumerate().collect();
        orders.sort_by_key(|(seen, order)| std::cmp::Reverse((order.created_at_millis(), *seen)));
        orders.into_iter().map(|(_, order)| order).collect()
    }

    /// "3 new orders | Latest: ORD-9 - ₹450"; `None` when nothing is
    /// pending.
    pub fn headline(&self) -> Option<String> {
        let latest = self.latest()?;
        let count = match self.pending.len() {
            1 => "1 new order".to_owned(),
            n => format!("{n} new orders"),
        };
        Some(format!("{count} | Latest: {} - ₹{}", latest.id, latest.total))
    }
}

impl<C: Transport + Clone> ResourceView<Order, C> {
    pub fn filtered(&self, filter: &OrderFilter) -> Vec<Arc<Order>> {
        filter.apply(&self.snapshot())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn order(id: &str, customer: &str, status: &str) -> Arc<Order> {
        Arc::new(
            serde_json::from_value(json!({
                "id": id,
                "customer": customer,
                "status": status,
            }))
            .unwrap(),
        )
    }

    fn placed(id: &str, total: f64, created_at: serde_json::Value) -> Arc<Order> {
        Arc::new(
            serde_json::from_value(json!({
                "id": id,
                "total": total,
                "createdAt": created_at,
            }))
            .unwrap(),
        )
    }

    fn orders() -> Vec<Arc<Order>> {
        vec![
            order("ORD-100", "Ayesha Khan", "Pending"),
            order("ORD-101", "Bilal Ahmed", "Shipped"),
            order("ORD-102", "ayesha malik", "Delivered"),
        ]
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert_eq!(OrderFilter::default().apply(&orders()).len(), 3);
    }

    #[test]
    fn query_is_case_insensitive_on_customer_and_id() {
        let by_name = OrderFilter::default().query("AYESHA").apply(&orders());
        assert_eq!(by_name.len(), 2);

        let by_id = OrderFilter::default().query("ord-101").apply(&orders());
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].customer, "Bilal Ahmed");
    }

    #[test]
    fn status_and_query_combine() {
        let hits = OrderFilter::default()
            .status(OrderStatus::Delivered)
            .query("ayesha")
            .apply(&orders());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.to_string(), "ORD-102");
    }

    #[test]
    fn blank_query_is_ignored() {
        assert_eq!(OrderFilter::default().query("  ").query, None);
    }

    #[test]
    fn alerts_accumulate_until_acknowledged() {
        let mut alerts = OrderAlerts::new();
        assert_eq!(alerts.headline(), None);

        alerts.record(&orders()[..1]);
        assert_eq!(
            alerts.headline().as_deref(),
            Some("1 new order | Latest: ORD-100 - ₹0")
        );
        alerts.record(&orders()[1..]);
        assert_eq!(
            alerts.headline().as_deref(),
            Some("3 new orders | Latest: ORD-102 - ₹0")
        );

        assert_eq!(alerts.acknowledge().len(), 3);
        assert_eq!(alerts.count(), 0);
        assert_eq!(alerts.latest(), None);
    }

    #[test]
    fn latest_follows_created_at_not_arrival_order() {
        let mut alerts = OrderAlerts::new();
        alerts.record(&[
            placed("ORD-7", 300.0, json!("2024-05-02T10:15:00Z")),
            placed("ORD-9", 450.0, json!("2024-05-02T11:40:00.000Z")),
            placed("ORD-8", 120.0, json!(1_714_640_000_000_i64)),
        ]);

        assert_eq!(alerts.latest().unwrap().id.to_string(), "ORD-9");
        assert_eq!(
            alerts.headline().as_deref(),
            Some("3 new orders | Latest: ORD-9 - ₹450")
        );

        let newest_first: Vec<String> = alerts
            .acknowledge()
            .iter()
            .map(|o| o.id.to_string())
            .collect();
        assert_eq!(newest_first, vec!["ORD-9", "ORD-7", "ORD-8"]);
    }
}
