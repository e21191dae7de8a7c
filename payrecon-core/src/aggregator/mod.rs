//! Grouping of payment notifications into orders.
//!
//! The backend stores one row per notification, so an order that went
//! through `AUTHORIZED` and then `CONFIRMED` shows up as two rows sharing
//! an order id. [`aggregate`] folds those rows into one [`OrderGroup`] per
//! order, keeping the full status history.
//!
//! Rows are grouped by order id, or by provider payment id when the order
//! id is empty. Every row lands in exactly one group. Groups are rebuilt
//! from scratch whenever the row list changes.

mod filter;
mod stats;

pub use filter::{ALL, PaymentQuery, Selection, filter};
pub use stats::{PaymentStatistics, StatusCounts, status_counts, unique_integrations};

use std::collections::HashMap;

use payrecon_sdk::objects::{PaymentRecord, PaymentStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use time::OffsetDateTime;
use tracing::debug;

use crate::utils::timestamp::parse_or_epoch;

/// How the latest status of a group is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatestStatusRule {
    /// The row with the greatest creation time wins. On ties the row seen
    /// first keeps the status.
    #[default]
    RunningMaximum,
    /// Every row created strictly after the group's first-seen row replaces
    /// the status, the last such row in input order winning. Legacy
    /// behaviour; picks the wrong status when rows are not in chronological
    /// order.
    FirstSeenReference,
}

/// One notification in an order's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusEntry {
    pub status: PaymentStatus,
    pub created_at: Option<String>,
    pub id: i64,
}

/// All notifications of one order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderGroup {
    /// Order id, or payment id when the order id is empty.
    pub key: String,
    pub order_id: Option<String>,
    pub payment_id: String,
    /// Taken from the first row; all rows of an order carry the same amount.
    pub amount: Decimal,
    /// History in input order, duplicates included.
    pub statuses: SmallVec<[StatusEntry; 4]>,
    pub latest_status: PaymentStatus,
    /// Raw creation time of the first row seen for this key.
    pub first_created_at: Option<String>,
    /// Parsed `first_created_at`; the Unix epoch when unparsable.
    #[serde(with = "time::serde::rfc3339")]
    pub first_seen_at: OffsetDateTime,
    pub pan: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub integration_name: Option<String>,
    pub provider_name: Option<String>,
    pub payments: Vec<PaymentRecord>,
    #[serde(skip)]
    latest_at: OffsetDateTime,
}

impl OrderGroup {
    fn start(key: &str, record: &PaymentRecord, created: OffsetDateTime) -> Self {
        Self {
            key: key.to_owned(),
            order_id: record.order_id.clone(),
            payment_id: record.payment_id.clone(),
            amount: record.amount,
            statuses: SmallVec::new(),
            latest_status: record.status.clone(),
            first_created_at: record.created_at.clone(),
            first_seen_at: created,
            pan: record.pan.clone(),
            customer_email: record.customer_email.clone(),
            customer_phone: record.customer_phone.clone(),
            integration_name: record.integration_name.clone(),
            provider_name: record.provider_name.clone(),
            payments: Vec::new(),
            latest_at: created,
        }
    }

    fn push(&mut self, record: &PaymentRecord, created: OffsetDateTime, rule: LatestStatusRule) {
        let reference = match rule {
            LatestStatusRule::RunningMaximum => self.latest_at,
            LatestStatusRule::FirstSeenReference => self.first_seen_at,
        };
        if created > reference {
            self.latest_status = record.status.clone();
            self.latest_at = created;
        }

        self.statuses.push(StatusEntry {
            status: record.status.clone(),
            created_at: record.created_at.clone(),
            id: record.id,
        });
        self.payments.push(record.clone());
    }

    /// Number of notifications received for this order.
    pub fn deliveries(&self) -> usize {
        self.payments.len()
    }

    /// Whether any notification of this order carried `status`.
    pub fn has_status(&self, status: &PaymentStatus) -> bool {
        self.statuses.iter().any(|entry| &entry.status == status)
    }
}

/// Group `records` into orders using [`LatestStatusRule::RunningMaximum`].
pub fn aggregate(records: &[PaymentRecord]) -> Vec<OrderGroup> {
    aggregate_with(records, LatestStatusRule::default())
}

/// Group `records` into orders, newest first-seen order first.
///
/// Groups with equal first-seen times keep the order in which their keys
/// first appeared.
pub fn aggregate_with(records: &[PaymentRecord], rule: LatestStatusRule) -> Vec<OrderGroup> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<OrderGroup> = Vec::new();

    for record in records {
        let key = record.group_key();
        let created = parse_or_epoch(record.created_at.as_deref());
        let slot = *slots.entry(key).or_insert_with(|| {
            groups.push(OrderGroup::start(key, record, created));
            groups.len() - 1
        });
        groups[slot].push(record, created, rule);
    }

    groups.sort_by(|a, b| b.first_seen_at.cmp(&a.first_seen_at));
    debug!(
        records = records.len(),
        orders = groups.len(),
        ?rule,
        "Aggregated payment notifications"
    );
    groups
}
