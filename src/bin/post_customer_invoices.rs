// Customer invoice batch tool
// Posts a configured number of randomized customer invoices, each
// committed independently. Rejected documents are reported, not fatal.
// Usage: cargo run --bin post-customer-invoices

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fipost::config;
use fipost::services::customer_invoice_service::{CustomerInvoiceService, PostOutcome};
use fipost::services::rfc::RfcClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "fipost=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let rfc_config = config::rfc_config_from_env()?;
    let options = config::batch_options_from_env()?;

    tracing::info!(
        "Posting {} customer invoices for company code {}",
        options.invoice_count,
        options.company_code
    );

    let client = RfcClient::new(rfc_config)?;
    let service = CustomerInvoiceService::new(client, options);

    let report = service.run().await?;

    for outcome in &report.outcomes {
        if let PostOutcome::Failed { reference, customer, .. } = outcome {
            tracing::warn!("Not committed: {} (customer {})", reference, customer);
        }
    }
    tracing::info!(
        "Done: {} posted, {} failed of {} attempted",
        report.posted,
        report.failed,
        report.attempted
    );

    Ok(())
}
