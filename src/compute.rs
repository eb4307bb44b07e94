use crate::data::{CustomerId, EnrichedOrder, Month};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// How many customers make it to the leaderboard by default.
pub const TOP_CUSTOMERS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RevenueRow<K> {
    pub key: K,
    pub total_revenue: Decimal,
}

/// A two-column table: one key column (labelled `key_column`) and
/// `Total Revenue`. Rows come out of the aggregations in ascending key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RevenueSummary<K> {
    pub key_column: &'static str,
    pub rows: Vec<RevenueRow<K>>,
}

impl<K> RevenueSummary<K> {
    /// Revenue over every row; equals the revenue of the whole dataset for
    /// any of the three aggregations.
    pub fn total(&self) -> Decimal {
        self.rows.iter().map(|row| row.total_revenue).sum()
    }
}

pub(crate) fn by_month(orders: &[EnrichedOrder]) -> RevenueSummary<Month> {
    group_revenue(orders, "Month", |order| order.month)
}

pub(crate) fn by_product(orders: &[EnrichedOrder]) -> RevenueSummary<String> {
    group_revenue(orders, "Product Name", |order| order.product_name.clone())
}

pub(crate) fn by_customer(orders: &[EnrichedOrder]) -> RevenueSummary<CustomerId> {
    group_revenue(orders, "Customer ID", |order| order.customer_id.clone())
}

/// Sums `revenue` per key. The `BTreeMap` fixes the output order to the key's
/// `Ord`, which is what later tie-breaking in [`top_n`] relies on. Orders from
/// the preprocessor have a bounded `|revenue|` sum, so these additions can't
/// overflow.
fn group_revenue<K: Ord>(
    orders: &[EnrichedOrder],
    key_column: &'static str,
    key_fn: impl Fn(&EnrichedOrder) -> K,
) -> RevenueSummary<K> {
    let mut groups: BTreeMap<K, Decimal> = BTreeMap::new();
    for order in orders {
        *groups.entry(key_fn(order)).or_default() += order.revenue;
    }
    RevenueSummary {
        key_column,
        rows: groups
            .into_iter()
            .map(|(key, total_revenue)| RevenueRow { key, total_revenue })
            .collect(),
    }
}

/// The `n` rows with the highest revenue, highest first. The sort is stable so
/// equal totals keep the summary's order.
pub(crate) fn top_n<K: Clone>(summary: &RevenueSummary<K>, n: usize) -> RevenueSummary<K> {
    let mut rows = summary.rows.clone();
    rows.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
    rows.truncate(n);
    RevenueSummary {
        key_column: summary.key_column,
        rows,
    }
}

/// The four tables the binary prints, all computed from the same orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Report {
    pub monthly: RevenueSummary<Month>,
    pub products: RevenueSummary<String>,
    pub customers: RevenueSummary<CustomerId>,
    pub top: usize,
    pub top_customers: RevenueSummary<CustomerId>,
}

impl Report {
    pub fn build(orders: &[EnrichedOrder], top: usize) -> Self {
        let customers = by_customer(orders);
        Self {
            monthly: by_month(orders),
            products: by_product(orders),
            top_customers: top_n(&customers, top),
            customers,
            top,
        }
    }
}
