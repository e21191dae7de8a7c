//! Summary figures shown above the order list.

use itertools::Itertools;
use payrecon_sdk::objects::{PaymentRecord, PaymentStatus};
use rust_decimal::Decimal;
use serde::Serialize;

use super::OrderGroup;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentStatistics {
    /// Distinct orders.
    pub orders: usize,
    /// Notifications received, every status included.
    pub webhooks: usize,
    /// Sum of the amounts of orders whose latest status is `CONFIRMED`.
    pub confirmed_amount: Decimal,
}

impl PaymentStatistics {
    pub fn compute(groups: &[OrderGroup]) -> Self {
        Self {
            orders: groups.len(),
            webhooks: groups.iter().map(OrderGroup::deliveries).sum(),
            confirmed_amount: groups
                .iter()
                .filter(|g| g.latest_status == PaymentStatus::Confirmed)
                .map(|g| g.amount)
                .sum(),
        }
    }
}

/// Number of orders per latest status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub all: usize,
    /// One entry per well-known status, in [`PaymentStatus::KNOWN`] order,
    /// zero counts included.
    pub by_status: Vec<(PaymentStatus, usize)>,
    /// Orders whose latest status is outside the well-known set.
    pub other: usize,
}

impl StatusCounts {
    pub fn get(&self, status: &PaymentStatus) -> usize {
        self.by_status
            .iter()
            .find(|(s, _)| s == status)
            .map_or(0, |(_, n)| *n)
    }
}

pub fn status_counts(groups: &[OrderGroup]) -> StatusCounts {
    let counts = groups.iter().map(|g| &g.latest_status).counts();
    let by_status: Vec<(PaymentStatus, usize)> = PaymentStatus::KNOWN
        .into_iter()
        .map(|status| {
            let n = counts.get(&status).copied().unwrap_or(0);
            (status, n)
        })
        .collect();
    let known: usize = by_status.iter().map(|(_, n)| n).sum();

    StatusCounts {
        all: groups.len(),
        by_status,
        other: groups.len() - known,
    }
}

/// Distinct integration names in first-seen order.
pub fn unique_integrations(records: &[PaymentRecord]) -> Vec<&str> {
    records
        .iter()
        .filter_map(|r| r.integration_name.as_deref())
        .unique()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate;
    use crate::aggregator::tests::record;

    fn records() -> Vec<PaymentRecord> {
        let mut other_shop = record(5, "E", "DEADLINE_EXPIRED", "2025-01-15T08:00:00");
        other_shop.integration_name = Some("Kiosk".to_owned());
        vec![
            record(1, "A", "AUTHORIZED", "2025-01-15T10:00:00"),
            record(2, "A", "CONFIRMED", "2025-01-15T10:00:05"),
            record(3, "B", "AUTHORIZED", "2025-01-15T11:00:00"),
            record(4, "D", "CONFIRMED", "2025-01-15T09:00:00"),
            other_shop,
        ]
    }

    #[test]
    fn test_statistics() {
        let records = records();
        let stats = PaymentStatistics::compute(&aggregate(&records));
        assert_eq!(stats.orders, 4);
        assert_eq!(stats.webhooks, 5);
        assert_eq!(stats.confirmed_amount, Decimal::new(2000, 0));
    }

    #[test]
    fn test_statistics_of_nothing() {
        let stats = PaymentStatistics::compute(&[]);
        assert_eq!(stats.orders, 0);
        assert_eq!(stats.webhooks, 0);
        assert_eq!(stats.confirmed_amount, Decimal::ZERO);
    }

    #[test]
    fn test_status_counts() {
        let counts = status_counts(&aggregate(&records()));
        assert_eq!(counts.all, 4);
        assert_eq!(counts.get(&PaymentStatus::Confirmed), 2);
        assert_eq!(counts.get(&PaymentStatus::Authorized), 1);
        assert_eq!(counts.get(&PaymentStatus::Refunded), 0);
        assert_eq!(counts.other, 1);
        assert_eq!(counts.by_status.len(), PaymentStatus::KNOWN.len());
    }

    #[test]
    fn test_unique_integrations_first_seen_order() {
        let mut records = records();
        records.swap(0, 4);
        assert_eq!(unique_integrations(&records), vec!["Kiosk", "Shop"]);
    }
}
