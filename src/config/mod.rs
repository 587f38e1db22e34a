// Runtime configuration
// Connection and posting parameters come from the environment (.env
// supported) instead of inline constants. Defaults mirror the values the
// tooling has always posted with; system-specific keys are required.

use std::env;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::incoming_invoice::{ExpenseLine, VendorInvoice};
use crate::services::customer_invoice_service::BatchOptions;
use crate::services::rfc::RfcConfig;

/// Connection settings for the RFC gateway.
pub fn rfc_config_from_env() -> Result<RfcConfig> {
    Ok(RfcConfig {
        host: env::var("SAP_ASHOST").unwrap_or_default(),
        system_number: env::var("SAP_SYSNR").unwrap_or_else(|_| "00".to_string()),
        system_id: env::var("SAP_SYSID").unwrap_or_else(|_| "ECC".to_string()),
        client: env::var("SAP_CLIENT").unwrap_or_else(|_| "100".to_string()),
        user: env::var("SAP_USER").context("SAP_USER not set")?,
        password: env::var("SAP_PASSWORD").context("SAP_PASSWORD not set")?,
        language: env::var("SAP_LANGUAGE").unwrap_or_else(|_| "EN".to_string()),
        gateway_url: env::var("SAP_GATEWAY_URL").ok(),
    })
}

/// Parameters of the single vendor invoice posting.
#[derive(Debug, Clone)]
pub struct VendorInvoiceSettings {
    pub company_code: String,
    pub currency: String,
    pub doc_type: String,
    pub vendor: String,
    pub gross_amount: Decimal,
    pub gl_account: String,
    pub tax_code: String,
    pub profit_center: String,
    pub cost_center: Option<String>,
    pub reference: String,
    pub line_text: String,
}

impl VendorInvoiceSettings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            company_code: env::var("FIPOST_COMPANY_CODE").unwrap_or_else(|_| "AUS".to_string()),
            currency: env::var("FIPOST_CURRENCY").unwrap_or_else(|_| "AUD".to_string()),
            doc_type: env::var("FIPOST_VENDOR_DOC_TYPE").unwrap_or_else(|_| "RE".to_string()),
            vendor: env::var("FIPOST_VENDOR").context("FIPOST_VENDOR not set")?,
            gross_amount: parse_decimal(
                &env::var("FIPOST_GROSS_AMOUNT").unwrap_or_else(|_| "1000".to_string()),
            )
            .context("FIPOST_GROSS_AMOUNT is not a decimal amount")?,
            gl_account: env::var("FIPOST_GL_ACCOUNT").context("FIPOST_GL_ACCOUNT not set")?,
            tax_code: env::var("FIPOST_TAX_CODE").unwrap_or_else(|_| "ZZ".to_string()),
            profit_center: env::var("FIPOST_PROFIT_CENTER")
                .context("FIPOST_PROFIT_CENTER not set")?,
            cost_center: env::var("FIPOST_COST_CENTER").ok(),
            reference: env::var("FIPOST_REFERENCE")
                .unwrap_or_else(|_| "INV-NONPO-0001".to_string()),
            line_text: env::var("FIPOST_LINE_TEXT")
                .unwrap_or_else(|_| "Non-PO expense".to_string()),
        })
    }

    /// The invoice these settings describe: one GL distribution line
    /// carrying the full gross amount, dated `today`.
    pub fn invoice(&self, today: NaiveDate) -> VendorInvoice {
        VendorInvoice {
            doc_type: self.doc_type.clone(),
            document_date: today,
            posting_date: today,
            company_code: self.company_code.clone(),
            currency: self.currency.clone(),
            gross_amount: self.gross_amount,
            vendor: self.vendor.clone(),
            reference: self.reference.clone(),
            payment_terms: None,
            baseline_date: None,
            lines: vec![ExpenseLine {
                gl_account: self.gl_account.clone(),
                amount: self.gross_amount,
                tax_code: self.tax_code.clone(),
                text: self.line_text.clone(),
                profit_center: self.profit_center.clone(),
                cost_center: self.cost_center.clone(),
            }],
        }
    }
}

/// Parameters of the randomized customer invoice batch.
pub fn batch_options_from_env() -> Result<BatchOptions> {
    Ok(BatchOptions {
        company_code: env::var("FIPOST_COMPANY_CODE").unwrap_or_else(|_| "AUS".to_string()),
        currency: env::var("FIPOST_CURRENCY").unwrap_or_else(|_| "AUD".to_string()),
        doc_type: env::var("FIPOST_CUSTOMER_DOC_TYPE").unwrap_or_else(|_| "DR".to_string()),
        revenue_account: env::var("FIPOST_REVENUE_ACCOUNT")
            .context("FIPOST_REVENUE_ACCOUNT not set")?,
        posting_user: env::var("SAP_USER").context("SAP_USER not set")?,
        invoice_count: env::var("FIPOST_INVOICE_COUNT")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .context("FIPOST_INVOICE_COUNT is not a number")?,
        amounts: parse_amounts(
            &env::var("FIPOST_AMOUNTS").unwrap_or_else(|_| "100,250,500,750,1000".to_string()),
        )?,
        max_pool_rows: match env::var("FIPOST_MAX_CUSTOMERS") {
            Ok(raw) => Some(raw.parse().context("FIPOST_MAX_CUSTOMERS is not a number")?),
            Err(_) => None,
        },
    })
}

fn parse_decimal(raw: &str) -> Result<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .with_context(|| format!("invalid decimal amount '{}'", raw))
}

/// Comma-separated discrete amount set, e.g. "100,250,500".
fn parse_amounts(raw: &str) -> Result<Vec<Decimal>> {
    raw.split(',')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(parse_decimal)
        .collect()
}
