//! `payrecon receipts` and `payrecon fetch-ofd`.

use anyhow::Context;
use clap::{Args, ValueEnum};
use payrecon_core::utils::timestamp::display_timestamp;
use payrecon_sdk::objects::{
    FetchOfdReceiptsRequest, ListReceiptsQuery, ReceiptRecord, ReceiptSource,
};

use crate::output::{Table, money, or_dash, print_json};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Ofd,
    #[value(name = "cash_register")]
    CashRegister,
}

impl From<SourceArg> for ReceiptSource {
    fn from(value: SourceArg) -> Self {
        match value {
            SourceArg::Ofd => ReceiptSource::Ofd,
            SourceArg::CashRegister => ReceiptSource::CashRegister,
        }
    }
}

#[derive(Debug, Args)]
pub struct ReceiptsArgs {
    #[arg(long, value_enum)]
    source: Option<SourceArg>,

    /// Search in document id, document number, fiscal drive and integration
    #[arg(short, long, default_value = "")]
    search: String,

    #[arg(long)]
    limit: Option<i64>,

    #[arg(long, default_value_t = 0)]
    offset: i64,

    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct FetchOfdArgs {
    /// OFD integration to import from
    #[arg(long)]
    integration_id: i64,

    /// First day, `YYYY-MM-DD`
    #[arg(long)]
    from: Option<String>,

    /// Last day, `YYYY-MM-DD`
    #[arg(long)]
    to: Option<String>,
}

pub async fn list(state: &AppState, args: ReceiptsArgs) -> anyhow::Result<()> {
    let query = ListReceiptsQuery {
        owner_id: state.owner_id(),
        limit: args.limit.unwrap_or(state.config.page_limit),
        offset: args.offset,
        source: args.source.map(ReceiptSource::from),
    };
    let page = state
        .client
        .list_receipts(&query)
        .await
        .context("failed to fetch receipts")?;

    let receipts: Vec<&ReceiptRecord> = page
        .receipts
        .iter()
        .filter(|r| r.matches(&args.search))
        .collect();
    tracing::info!(total = page.total, shown = receipts.len(), "Receipts fetched");

    if args.json {
        return print_json(&receipts);
    }
    if receipts.is_empty() {
        println!("No receipts match.");
        return Ok(());
    }

    let shown = receipts.len();
    let mut table = Table::new(vec![
        "SOURCE", "DOC", "OPERATION", "TOTAL", "CASH", "CARD", "FN", "INTEGRATION", "DATE",
    ]);
    for receipt in receipts {
        table.push(vec![
            receipt.source.to_string(),
            or_dash(receipt.doc_number.as_deref().or(receipt.document_id.as_deref())).to_owned(),
            or_dash(receipt.operation_type.as_deref()).to_owned(),
            receipt.total_sum.map_or_else(|| "-".to_owned(), money),
            receipt.cash_sum.map_or_else(|| "-".to_owned(), money),
            receipt.ecash_sum.map_or_else(|| "-".to_owned(), money),
            or_dash(receipt.fn_number.as_deref()).to_owned(),
            or_dash(receipt.integration_name.as_deref()).to_owned(),
            display_timestamp(receipt.document_datetime.as_deref()),
        ]);
    }
    print!("{}", table.render());
    println!("{shown} of {} receipts", page.total);
    Ok(())
}

pub async fn fetch_ofd(state: &AppState, args: FetchOfdArgs) -> anyhow::Result<()> {
    let request = FetchOfdReceiptsRequest {
        integration_id: args.integration_id,
        date_from: args.from,
        date_to: args.to,
    };
    let result = state
        .client
        .fetch_ofd_receipts(&request)
        .await
        .context("OFD import failed")?;

    tracing::info!(
        integration_id = request.integration_id,
        inserted = result.inserted,
        "OFD import finished"
    );
    println!(
        "Imported {} new of {} receipts ({} .. {})",
        result.inserted,
        result.total_receipts,
        or_dash(result.date_from.as_deref()),
        or_dash(result.date_to.as_deref()),
    );
    Ok(())
}
