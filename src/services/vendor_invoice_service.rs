// Vendor invoice posting
// Wraps BAPI_INCOMINGINVOICE_CREATE: marshal the header and line tables,
// invoke, inspect RETURN, and commit only when no message carries
// severity Error or Abort. No retry; an uncommitted failed call is left
// to the remote system's implicit rollback.

use thiserror::Error;

use crate::models::incoming_invoice::{AccountingItem, GlAccountItem, InvoiceHeader, VendorInvoice};
use crate::models::{sap_date, summarize, ReturnMessage, Severity};
use crate::services::rfc::{RfcClient, RfcError, RfcRequest};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum PostError {
    #[error("RFC call failed: {0}")]
    Rfc(#[from] RfcError),

    #[error("Invoice rejected: {}", summarize(.messages))]
    Rejected { messages: Vec<ReturnMessage> },
}

pub type Result<T> = std::result::Result<T, PostError>;

// ============================================================================
// Data Models
// ============================================================================

#[derive(Debug, Clone)]
pub struct PostedInvoice {
    pub document_number: String,
    pub fiscal_year: String,
    pub messages: Vec<ReturnMessage>,
}

// ============================================================================
// Vendor Invoice Service
// ============================================================================

pub struct VendorInvoiceService {
    client: RfcClient,
}

impl VendorInvoiceService {
    pub fn new(client: RfcClient) -> Self {
        Self { client }
    }

    /// Post and commit one vendor invoice. Any Error or Abort message in
    /// the RETURN table suppresses the commit and surfaces as `Rejected`.
    pub async fn post(&self, invoice: &VendorInvoice) -> Result<PostedInvoice> {
        let request = build_request(invoice)?;
        let response = self.client.call(&request).await?;
        let messages = response.return_messages()?;

        log_messages(&messages);

        if messages.iter().any(ReturnMessage::is_blocking) {
            return Err(PostError::Rejected { messages });
        }

        let document_number = response.export_str("INVOICEDOCNUMBER")?;
        let fiscal_year = response.export_str("FISCALYEAR")?;

        self.client.commit_transaction().await?;

        tracing::info!(
            "Created invoice document {} / fiscal year {}",
            document_number,
            fiscal_year
        );

        Ok(PostedInvoice {
            document_number,
            fiscal_year,
            messages,
        })
    }
}

fn log_messages(messages: &[ReturnMessage]) {
    for m in messages {
        match m.severity {
            Severity::Error | Severity::Abort => {
                tracing::error!("{}: {}", m.severity, m.message)
            }
            Severity::Warning => tracing::warn!("{}: {}", m.severity, m.message),
            Severity::Success | Severity::Info => {
                tracing::info!("{}: {}", m.severity, m.message)
            }
        }
    }
}

/// Marshal the domain invoice onto the BAPI structures. GL and
/// cost-assignment rows are linked by item numbers counted from 1.
fn build_request(invoice: &VendorInvoice) -> Result<RfcRequest> {
    let header = InvoiceHeader {
        invoice_ind: "X".to_string(),
        doc_type: invoice.doc_type.clone(),
        doc_date: sap_date(invoice.document_date),
        pstng_date: sap_date(invoice.posting_date),
        comp_code: invoice.company_code.clone(),
        currency: invoice.currency.clone(),
        gross_amount: invoice.gross_amount,
        vendor: invoice.vendor.clone(),
        ref_doc_no: invoice.reference.clone(),
        pmnttrms: invoice.payment_terms.clone(),
        bline_date: invoice.baseline_date.map(sap_date),
    };

    let mut gl_items = Vec::with_capacity(invoice.lines.len());
    let mut accounting_items = Vec::with_capacity(invoice.lines.len());
    for (index, line) in invoice.lines.iter().enumerate() {
        let item_no = (index + 1) as u32;
        gl_items.push(GlAccountItem {
            invoice_doc_item: item_no,
            gl_account: line.gl_account.clone(),
            item_amount: line.amount,
            tax_code: line.tax_code.clone(),
            item_text: line.text.clone(),
        });
        accounting_items.push(AccountingItem {
            invoice_doc_item: item_no,
            profit_ctr: line.profit_center.clone(),
            costcenter: line.cost_center.clone(),
        });
    }

    Ok(RfcRequest::new("BAPI_INCOMINGINVOICE_CREATE")
        .import("HEADERDATA", &header)?
        .table("GLACCOUNTDATA", &gl_items)?
        .table("ACCOUNTINGDATA", &accounting_items)?)
}

// ============================================================================
// Tests
// ============================================================================
