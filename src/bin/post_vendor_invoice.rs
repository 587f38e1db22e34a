// Vendor invoice posting tool
// Posts one non-PO vendor invoice and commits it.
// Usage: cargo run --bin post-vendor-invoice

use anyhow::Result;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fipost::config::{self, VendorInvoiceSettings};
use fipost::services::rfc::RfcClient;
use fipost::services::vendor_invoice_service::VendorInvoiceService;

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
    let settings = VendorInvoiceSettings::from_env()?;

    let client = RfcClient::new(rfc_config)?;
    let service = VendorInvoiceService::new(client);

    let invoice = settings.invoice(Utc::now().date_naive());
    tracing::info!(
        "Posting vendor invoice {} for {} {} (vendor {})",
        invoice.reference,
        invoice.gross_amount,
        invoice.currency,
        invoice.vendor
    );

    let posted = service.post(&invoice).await?;
    tracing::info!(
        "Committed invoice document {} / fiscal year {}",
        posted.document_number,
        posted.fiscal_year
    );

    Ok(())
}
