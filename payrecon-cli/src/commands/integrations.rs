//! `payrecon integrations`: list, create and update integrations.

use anyhow::{Context, bail};
use clap::{Args, Subcommand};
use payrecon_core::utils::timestamp::display_timestamp;
use payrecon_sdk::objects::{
    CreateIntegrationRequest, IntegrationsOverview, PaymentStatus, UpdateIntegrationRequest,
    UserIntegration, WebhookSettings,
};
use serde_json::{Map, Value};
use url::Url;

use crate::output::{Table, or_dash, print_json};
use crate::state::AppState;

#[derive(Debug, Subcommand)]
pub enum IntegrationsCommand {
    /// Show the provider catalogue and configured integrations
    List {
        #[arg(long)]
        json: bool,
    },
    /// Register a new integration
    Create(CreateArgs),
    /// Change an existing integration
    Update(UpdateArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Provider slug from the catalogue, e.g. `tbank`
    #[arg(long)]
    provider: String,

    #[arg(long)]
    name: String,

    /// Provider setting, repeatable
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    settings: Vec<(String, String)>,

    /// Do not store notifications with this status, repeatable
    #[arg(long, value_name = "STATUS")]
    disable_notify: Vec<String>,

    /// Forward every accepted notification to this URL
    #[arg(long)]
    forward_url: Option<Url>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[arg(long)]
    id: i64,

    #[arg(long)]
    name: Option<String>,

    /// Provider setting, repeatable; merged into the stored settings
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    settings: Vec<(String, String)>,

    /// Do not store notifications with this status, repeatable
    #[arg(long, value_name = "STATUS")]
    disable_notify: Vec<String>,

    /// Store notifications with this status again, repeatable
    #[arg(long, value_name = "STATUS")]
    enable_notify: Vec<String>,

    #[arg(long, conflicts_with = "clear_forward_url")]
    forward_url: Option<Url>,

    #[arg(long)]
    clear_forward_url: bool,
}

pub async fn run(state: &AppState, command: IntegrationsCommand) -> anyhow::Result<()> {
    match command {
        IntegrationsCommand::List { json } => list(state, json).await,
        IntegrationsCommand::Create(args) => create(state, args).await,
        IntegrationsCommand::Update(args) => update(state, args).await,
    }
}

async fn list(state: &AppState, json: bool) -> anyhow::Result<()> {
    let overview = state
        .client
        .list_integrations(state.owner_id())
        .await
        .context("failed to fetch integrations")?;
    if json {
        return print_json(&overview);
    }
    print!("{}", render(&overview));
    Ok(())
}

async fn create(state: &AppState, args: CreateArgs) -> anyhow::Result<()> {
    let mut webhook_settings = WebhookSettings::default();
    apply_switches(&mut webhook_settings, &args.disable_notify, false)?;

    let request = CreateIntegrationRequest {
        owner_id: state.owner_id(),
        provider_slug: args.provider,
        integration_name: args.name,
        config: config_map(args.settings),
        webhook_settings,
        forward_url: args.forward_url.map(String::from),
    };
    let created = state
        .client
        .create_integration(&request)
        .await
        .context("failed to create integration")?;

    tracing::info!(integration_id = created.integration_id, "Integration created");
    println!("Integration id: {}", created.integration_id);
    println!("Webhook URL:    {}", created.webhook_url);
    println!("Webhook token:  {}", created.webhook_token);
    Ok(())
}

async fn update(state: &AppState, args: UpdateArgs) -> anyhow::Result<()> {
    let overview = state
        .client
        .list_integrations(state.owner_id())
        .await
        .context("failed to fetch integrations")?;
    let Some(current) = overview.user_integrations.iter().find(|i| i.id == args.id) else {
        bail!("integration {} not found", args.id);
    };

    let request = update_request(state.owner_id(), current, args)?;
    let response = state
        .client
        .update_integration(&request)
        .await
        .context("failed to update integration")?;

    tracing::info!(integration_id = request.integration_id, "Integration updated");
    println!("{}", response.message.as_deref().unwrap_or("Integration updated"));
    Ok(())
}

/// Build the update body. The call always writes `forward_url`, so the
/// stored value is carried over unless it is replaced or cleared.
fn update_request(
    owner_id: i64,
    current: &UserIntegration,
    args: UpdateArgs,
) -> anyhow::Result<UpdateIntegrationRequest> {
    let config = if args.settings.is_empty() {
        None
    } else {
        let mut merged = current.config.as_object().cloned().unwrap_or_default();
        merged.extend(config_map(args.settings));
        Some(merged)
    };

    let webhook_settings = if args.disable_notify.is_empty() && args.enable_notify.is_empty() {
        None
    } else {
        let mut settings = current.webhook_settings.unwrap_or_default();
        apply_switches(&mut settings, &args.disable_notify, false)?;
        apply_switches(&mut settings, &args.enable_notify, true)?;
        Some(settings)
    };

    let forward_url = match (args.forward_url, args.clear_forward_url) {
        (Some(url), _) => Some(String::from(url)),
        (None, true) => None,
        (None, false) => current.forward_url.clone(),
    };

    Ok(UpdateIntegrationRequest {
        integration_id: current.id,
        owner_id,
        integration_name: args.name,
        config,
        webhook_settings,
        forward_url,
    })
}

fn apply_switches(
    settings: &mut WebhookSettings,
    statuses: &[String],
    enabled: bool,
) -> anyhow::Result<()> {
    for raw in statuses {
        let status = PaymentStatus::from(raw.to_ascii_uppercase());
        if !settings.set(&status, enabled) {
            bail!("status {raw} has no notification switch");
        }
    }
    Ok(())
}

fn config_map(pairs: Vec<(String, String)>) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect()
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

fn render(overview: &IntegrationsOverview) -> String {
    let mut out = String::new();
    for category in &overview.categories {
        out.push_str(&format!("{} ({})\n", category.name, category.slug));
        for provider in &category.providers {
            out.push_str(&format!("  {:<20} {}\n", provider.slug, provider.name));
        }
    }
    out.push('\n');

    if overview.user_integrations.is_empty() {
        out.push_str("No integrations configured.\n");
        return out;
    }
    let mut table = Table::new(vec![
        "ID", "NAME", "PROVIDER", "STATUS", "WEBHOOKS", "LAST WEBHOOK", "FORWARD",
    ]);
    for integration in &overview.user_integrations {
        table.push(vec![
            integration.id.to_string(),
            integration.display_name().to_owned(),
            integration.provider_slug.clone(),
            integration.status.clone(),
            integration.webhook_count.to_string(),
            display_timestamp(integration.last_webhook_at.as_deref()),
            or_dash(integration.forward_url.as_deref()).to_owned(),
        ]);
    }
    out.push_str(&table.render());
    out
}
