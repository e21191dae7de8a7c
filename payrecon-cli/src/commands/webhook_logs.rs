//! `payrecon webhook-logs`: forwarding attempts to the owner's endpoint.

use anyhow::Context;
use clap::Args;
use payrecon_core::utils::timestamp::display_timestamp;
use payrecon_sdk::objects::{ForwardLogRecord, ListWebhookLogsQuery};

use crate::output::{Table, money, or_dash, print_json};
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct WebhookLogsArgs {
    #[arg(long)]
    integration_id: Option<i64>,

    #[arg(long)]
    limit: Option<i64>,

    /// Only show failed attempts
    #[arg(long)]
    failed: bool,

    #[arg(long)]
    json: bool,
}

pub async fn run(state: &AppState, args: WebhookLogsArgs) -> anyhow::Result<()> {
    let query = ListWebhookLogsQuery {
        owner_id: state.owner_id(),
        integration_id: args.integration_id,
        limit: args.limit.unwrap_or(state.config.page_limit),
    };
    let page = state
        .client
        .list_webhook_logs(&query)
        .await
        .context("failed to fetch webhook logs")?;

    let logs: Vec<&ForwardLogRecord> = page
        .logs
        .iter()
        .filter(|log| !args.failed || !log.is_success())
        .collect();

    if args.json {
        return print_json(&logs);
    }
    if logs.is_empty() {
        println!("No forwarding attempts.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        "TIME", "ORDER", "STATUS", "AMOUNT", "URL", "HTTP", "MS", "ERROR",
    ]);
    for log in logs {
        table.push(row(log));
    }
    print!("{}", table.render());
    Ok(())
}

fn row(log: &ForwardLogRecord) -> Vec<String> {
    let http = match log.status_code {
        Some(0) | None => "-".to_owned(),
        Some(code) => code.to_string(),
    };
    vec![
        display_timestamp(log.created_at.as_deref()),
        or_dash(log.order_id.as_deref().or(log.payment_id.as_deref())).to_owned(),
        log.payment_status
            .as_ref()
            .map_or_else(|| "-".to_owned(), ToString::to_string),
        log.amount.map_or_else(|| "-".to_owned(), money),
        log.forward_url.clone(),
        http,
        log.response_time_ms
            .map_or_else(|| "-".to_owned(), |ms| ms.to_string()),
        or_dash(log.error_message.as_deref()).to_owned(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_for_unanswered_attempt() {
        let log: ForwardLogRecord = serde_json::from_value(json!({
            "id": 1,
            "forward_url": "https://shop.example/hook",
            "status_code": 0,
            "error_message": "timeout",
            "order_id": 21050,
            "payment_status": "CONFIRMED"
        }))
        .unwrap();
        let cells = row(&log);
        assert_eq!(cells[1], "21050");
        assert_eq!(cells[2], "CONFIRMED");
        assert_eq!(cells[5], "-");
        assert_eq!(cells[7], "timeout");
    }
}
