// Randomized customer invoice batch
// Synthesizes one-receivable/one-revenue accounting documents via
// BAPI_ACC_DOCUMENT_POST, each invoked and committed independently. A
// rejected document skips only its own commit; the loop continues and
// every outcome lands in the run report.

use chrono::{DateTime, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::acc_document::{
    CurrencyAmount, CustomerItem, DocumentHeader, GlItem, RECEIVABLE_ITEM, REVENUE_ITEM,
};
use crate::models::{sap_date, summarize, ReturnMessage};
use crate::services::customer_lookup_service::CustomerLookupService;
use crate::services::rfc::{RfcClient, RfcError, RfcRequest};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("RFC call failed: {0}")]
    Rfc(#[from] RfcError),

    #[error("No customers found for company code {0}")]
    EmptyCustomerPool(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, BatchError>;

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub company_code: String,
    pub currency: String,
    /// Accounting document type, e.g. "DR" for customer invoices.
    pub doc_type: String,
    pub revenue_account: String,
    pub posting_user: String,
    pub invoice_count: u32,
    /// Discrete sampling set for document amounts.
    pub amounts: Vec<Decimal>,
    /// Caps the customer-master read; `None` reads everything.
    pub max_pool_rows: Option<u32>,
}

impl BatchOptions {
    pub fn validate(&self) -> Result<()> {
        if self.company_code.is_empty() {
            return Err(BatchError::ConfigError("company_code is required".to_string()));
        }
        if self.revenue_account.is_empty() {
            return Err(BatchError::ConfigError("revenue_account is required".to_string()));
        }
        if self.amounts.is_empty() {
            return Err(BatchError::ConfigError("amounts must not be empty".to_string()));
        }
        // the reference layout carries a five-digit sequence
        if self.invoice_count > 99_999 {
            return Err(BatchError::ConfigError(
                "invoice_count must be at most 99999".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Run Report
// ============================================================================

/// Outcome of one posting attempt. A `Failed` outcome means the document
/// was rejected by the remote system and its commit was skipped.
#[derive(Debug, Clone)]
pub enum PostOutcome {
    Posted {
        reference: String,
        customer: String,
        amount: Decimal,
        document_key: String,
    },
    Failed {
        reference: String,
        customer: String,
        amount: Decimal,
        messages: Vec<ReturnMessage>,
    },
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub attempted: u32,
    pub posted: u32,
    pub failed: u32,
    pub outcomes: Vec<PostOutcome>,
}

// ============================================================================
// Reference Generation
// ============================================================================

/// External reference numbers for synthesized documents. REF_DOC_NO is 16
/// characters in SAP, so the layout is a ten-digit minute stamp plus a
/// zero-padded sequence: `YYMMDDHHMM-NNNNN`. The sequence makes references
/// unique for a whole run even when every document lands in the same
/// clock minute.
pub struct ReferenceGenerator {
    prefix: String,
    sequence: u32,
}

impl ReferenceGenerator {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            prefix: started_at.format("%y%m%d%H%M").to_string(),
            sequence: 0,
        }
    }

    pub fn next_reference(&mut self) -> String {
        self.sequence += 1;
        format!("{}-{:05}", self.prefix, self.sequence)
    }
}

// ============================================================================
// Customer Invoice Service
// ============================================================================

pub struct CustomerInvoiceService {
    client: RfcClient,
    lookup: CustomerLookupService,
    options: BatchOptions,
}

impl CustomerInvoiceService {
    pub fn new(client: RfcClient, options: BatchOptions) -> Self {
        Self {
            lookup: CustomerLookupService::new(client.clone()),
            client,
            options,
        }
    }

    /// Run the batch: fetch the customer pool once, then post
    /// `invoice_count` randomized documents sequentially. An empty pool is
    /// a fatal precondition; no posting call is issued.
    pub async fn run(&self) -> Result<BatchReport> {
        self.options.validate()?;

        let pool = self
            .lookup
            .customers_for_company(&self.options.company_code, self.options.max_pool_rows)
            .await?;

        if pool.is_empty() {
            return Err(BatchError::EmptyCustomerPool(self.options.company_code.clone()));
        }

        tracing::info!(
            "Sampling {} customers for company code {}",
            pool.len(),
            self.options.company_code
        );

        let posting_date = Utc::now().date_naive();
        let mut references = ReferenceGenerator::new(Utc::now());
        let mut rng = rand::thread_rng();
        let mut report = BatchReport::default();

        for _ in 0..self.options.invoice_count {
            let customer = pool
                .choose(&mut rng)
                .expect("pool checked non-empty")
                .clone();
            let amount = *self
                .options
                .amounts
                .choose(&mut rng)
                .expect("amounts validated non-empty");
            let reference = references.next_reference();

            report.attempted += 1;
            let outcome = self
                .post_document(&customer, amount, &reference, posting_date)
                .await?;

            match &outcome {
                PostOutcome::Posted { document_key, .. } => {
                    report.posted += 1;
                    tracing::info!(
                        "Posted document {} for customer {} ({} {})",
                        document_key,
                        customer,
                        amount,
                        self.options.currency
                    );
                }
                PostOutcome::Failed { messages, .. } => {
                    report.failed += 1;
                    tracing::error!(
                        "Posting failed for customer {}: {}",
                        customer,
                        summarize(messages)
                    );
                }
            }
            report.outcomes.push(outcome);
        }

        tracing::info!(
            "Batch finished: {} posted, {} failed of {} attempted",
            report.posted,
            report.failed,
            report.attempted
        );

        Ok(report)
    }

    /// Post one document. A blocking RETURN message yields a `Failed`
    /// outcome with the commit skipped; transport faults propagate and
    /// abort the run.
    async fn post_document(
        &self,
        customer: &str,
        amount: Decimal,
        reference: &str,
        posting_date: NaiveDate,
    ) -> Result<PostOutcome> {
        let request =
            build_document_request(&self.options, customer, amount, reference, posting_date)?;
        let response = self.client.call(&request).await?;
        let messages = response.return_messages()?;

        if messages.iter().any(ReturnMessage::is_blocking) {
            return Ok(PostOutcome::Failed {
                reference: reference.to_string(),
                customer: customer.to_string(),
                amount,
                messages,
            });
        }

        let document_key = response.export_str("OBJ_KEY")?;
        self.client.commit_transaction().await?;

        Ok(PostOutcome::Posted {
            reference: reference.to_string(),
            customer: customer.to_string(),
            amount,
            document_key,
        })
    }
}

/// One receivable line, one revenue line, and the signed amount pair,
/// linked by item number.
fn build_document_request(
    options: &BatchOptions,
    customer: &str,
    amount: Decimal,
    reference: &str,
    posting_date: NaiveDate,
) -> Result<RfcRequest> {
    let date = sap_date(posting_date);
    let header = DocumentHeader {
        username: options.posting_user.clone(),
        comp_code: options.company_code.clone(),
        doc_date: date.clone(),
        pstng_date: date,
        doc_type: options.doc_type.clone(),
        ref_doc_no: reference.to_string(),
        header_txt: format!("Billing run {}", reference),
    };

    let receivable = [CustomerItem {
        itemno_acc: RECEIVABLE_ITEM,
        customer: customer.to_string(),
    }];
    let revenue = [GlItem {
        itemno_acc: REVENUE_ITEM,
        gl_account: options.revenue_account.clone(),
        item_text: None,
    }];
    let amounts = CurrencyAmount::balanced_pair(&options.currency, amount);

    Ok(RfcRequest::new("BAPI_ACC_DOCUMENT_POST")
        .import("DOCUMENTHEADER", &header)?
        .table("ACCOUNTRECEIVABLE", &receivable)?
        .table("ACCOUNTGL", &revenue)?
        .table("CURRENCYAMOUNT", &amounts)?)
}

// ============================================================================
// Tests
// ============================================================================
