//! Search and selection over aggregated orders.

use payrecon_sdk::objects::PaymentStatus;

use super::OrderGroup;

/// Either everything, or exactly one value.
///
/// Parsed from the dashboard's filter values, where `"all"` is the
/// catch-all sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Exactly(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Exactly(expected) => expected == value,
        }
    }
}

/// The catch-all filter value.
pub const ALL: &str = "all";

impl From<&str> for Selection<PaymentStatus> {
    fn from(value: &str) -> Self {
        if value == ALL {
            Selection::All
        } else {
            Selection::Exactly(PaymentStatus::from(value))
        }
    }
}

impl From<&str> for Selection<String> {
    fn from(value: &str) -> Self {
        if value == ALL {
            Selection::All
        } else {
            Selection::Exactly(value.to_owned())
        }
    }
}

/// Filters applied to the order list. All of them must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentQuery {
    /// Free text, matched case-insensitively against payment id, order id,
    /// customer email and phone, and the amount.
    pub text: String,
    /// Compared with the order's latest status.
    pub status: Selection<PaymentStatus>,
    /// Compared with the integration display name.
    pub integration: Selection<String>,
}

impl PaymentQuery {
    pub fn matches(&self, group: &OrderGroup) -> bool {
        self.matches_text(group)
            && self.status.accepts(&group.latest_status)
            && match &group.integration_name {
                Some(name) => self.integration.accepts(name),
                None => self.integration.is_all(),
            }
    }

    fn matches_text(&self, group: &OrderGroup) -> bool {
        if self.text.is_empty() {
            return true;
        }
        let needle = self.text.to_lowercase();
        let contains = |field: &str| field.to_lowercase().contains(&needle);

        contains(&group.payment_id)
            || group.order_id.as_deref().is_some_and(contains)
            || group.customer_email.as_deref().is_some_and(contains)
            || group.customer_phone.as_deref().is_some_and(contains)
            || group.amount.normalize().to_string().contains(&needle)
    }
}

/// Orders matching `query`, in their original order.
pub fn filter<'a>(groups: &'a [OrderGroup], query: &PaymentQuery) -> Vec<&'a OrderGroup> {
    groups.iter().filter(|group| query.matches(group)).collect()
}
