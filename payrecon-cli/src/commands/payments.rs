//! `payrecon payments`: fetch notifications and show them grouped by order.

use anyhow::Context;
use clap::Args;
use payrecon_core::aggregator::{
    self, LatestStatusRule, OrderGroup, PaymentQuery, PaymentStatistics, Selection, StatusCounts,
};
use payrecon_core::utils::timestamp::display_timestamp;
use payrecon_sdk::objects::{ListPaymentsQuery, PaymentStatus};
use serde::Serialize;

use crate::output::{Table, money, or_dash, print_json};
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct PaymentsArgs {
    /// Search in payment id, order id, email, phone and amount
    #[arg(short, long, default_value = "")]
    search: String,

    /// Latest status to show, or `all`
    #[arg(long, default_value = aggregator::ALL)]
    status: String,

    /// Integration name to show, or `all`
    #[arg(long, default_value = aggregator::ALL)]
    integration: String,

    /// Only fetch notifications of this integration
    #[arg(long)]
    integration_id: Option<i64>,

    /// Rows to fetch (defaults to `payments.limit`)
    #[arg(long)]
    limit: Option<i64>,

    #[arg(long, default_value_t = 0)]
    offset: i64,

    /// Print the status history under each order
    #[arg(short, long)]
    expand: bool,

    /// Pick the latest status relative to the first-seen row
    #[arg(long)]
    legacy_latest_status: bool,

    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct PaymentsReport<'a> {
    total: i64,
    statistics: PaymentStatistics,
    status_counts: StatusCounts,
    integrations: Vec<&'a str>,
    orders: Vec<&'a OrderGroup>,
}

pub async fn run(state: &AppState, args: PaymentsArgs) -> anyhow::Result<()> {
    let query = ListPaymentsQuery {
        integration_id: args.integration_id,
        limit: args.limit.unwrap_or(state.config.page_limit),
        offset: args.offset,
        ..ListPaymentsQuery::new(state.owner_id())
    };
    let page = state
        .client
        .list_payments(&query)
        .await
        .context("failed to fetch payments")?;

    let rule = if args.legacy_latest_status {
        LatestStatusRule::FirstSeenReference
    } else {
        state.config.latest_status_rule
    };
    let groups = aggregator::aggregate_with(&page.payments, rule);

    let filter = PaymentQuery {
        text: args.search,
        status: Selection::<PaymentStatus>::from(args.status.as_str()),
        integration: Selection::<String>::from(args.integration.as_str()),
    };
    let visible = aggregator::filter(&groups, &filter);
    tracing::info!(
        rows = page.payments.len(),
        orders = groups.len(),
        shown = visible.len(),
        "Payments aggregated"
    );

    let report = PaymentsReport {
        total: page.total,
        statistics: PaymentStatistics::compute(&groups),
        status_counts: aggregator::status_counts(&groups),
        integrations: aggregator::unique_integrations(&page.payments),
        orders: visible,
    };

    if args.json {
        return print_json(&report);
    }
    print!("{}", render(&report, args.expand));
    Ok(())
}

fn render(report: &PaymentsReport<'_>, expand: bool) -> String {
    let stats = &report.statistics;
    let mut out = format!(
        "Orders: {}  Webhooks: {}  Confirmed: {}\n",
        stats.orders,
        stats.webhooks,
        money(stats.confirmed_amount)
    );

    let counts = &report.status_counts;
    let mut line = format!("all: {}", counts.all);
    for (status, n) in &counts.by_status {
        line.push_str(&format!("  {status}: {n}"));
    }
    if counts.other > 0 {
        line.push_str(&format!("  other: {}", counts.other));
    }
    out.push_str(&line);
    out.push_str("\n\n");

    if report.orders.is_empty() {
        out.push_str("No payments match.\n");
        return out;
    }

    let mut table = Table::new(vec![
        "ORDER", "PAYMENT", "AMOUNT", "STATUS", "WEBHOOKS", "CARD", "INTEGRATION", "CREATED",
    ]);
    for group in &report.orders {
        table.push(vec![
            group.key.clone(),
            group.payment_id.clone(),
            money(group.amount),
            group.latest_status.to_string(),
            group.deliveries().to_string(),
            or_dash(group.pan.as_deref()).to_owned(),
            or_dash(group.integration_name.as_deref()).to_owned(),
            display_timestamp(group.first_created_at.as_deref()),
        ]);
        if expand {
            for entry in &group.statuses {
                table.push(vec![
                    String::new(),
                    format!("#{}", entry.id),
                    String::new(),
                    entry.status.to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    display_timestamp(entry.created_at.as_deref()),
                ]);
            }
        }
    }
    out.push_str(&table.render());
    out
}
