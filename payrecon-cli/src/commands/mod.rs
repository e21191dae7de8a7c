//! Subcommands of the `payrecon` binary.

pub mod integrations;
pub mod payments;
pub mod receipts;
pub mod webhook_logs;
pub mod webhook_test;

use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List payment notifications grouped by order
    Payments(payments::PaymentsArgs),
    /// Manage integrations
    #[command(subcommand)]
    Integrations(integrations::IntegrationsCommand),
    /// List fiscal receipts
    Receipts(receipts::ReceiptsArgs),
    /// Import receipts from the fiscal data operator
    FetchOfd(receipts::FetchOfdArgs),
    /// List attempts to forward notifications
    WebhookLogs(webhook_logs::WebhookLogsArgs),
    /// Compute the webhook token of a payload
    Sign(webhook_test::SignArgs),
    /// Check the token of a received payload
    Verify(webhook_test::VerifyArgs),
    /// Sign a payload and POST it to a webhook URL
    SendTestWebhook(webhook_test::SendArgs),
}
