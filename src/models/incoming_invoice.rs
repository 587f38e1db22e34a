// BAPI_INCOMINGINVOICE_CREATE request records
// Field names, lengths, and formats are the BAPI's fixed interface; the
// serde renames must match the ABAP names exactly.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// HEADERDATA structure. Dates are SAP-internal YYYYMMDD strings.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceHeader {
    /// "X" marks an invoice, blank a credit memo.
    #[serde(rename = "INVOICE_IND")]
    pub invoice_ind: String,

    #[serde(rename = "DOC_TYPE")]
    pub doc_type: String,

    #[serde(rename = "DOC_DATE")]
    pub doc_date: String,

    #[serde(rename = "PSTNG_DATE")]
    pub pstng_date: String,

    #[serde(rename = "COMP_CODE")]
    pub comp_code: String,

    #[serde(rename = "CURRENCY")]
    pub currency: String,

    #[serde(rename = "GROSS_AMOUNT")]
    pub gross_amount: Decimal,

    /// Vendor account number (FK), zero-padded character key.
    #[serde(rename = "VENDOR")]
    pub vendor: String,

    #[serde(rename = "REF_DOC_NO")]
    pub ref_doc_no: String,

    #[serde(rename = "PMNTTRMS", skip_serializing_if = "Option::is_none")]
    pub pmnttrms: Option<String>,

    #[serde(rename = "BLINE_DATE", skip_serializing_if = "Option::is_none")]
    pub bline_date: Option<String>,
}

/// GLACCOUNTDATA row. Non-PO invoices are distributed over these lines.
#[derive(Debug, Clone, Serialize)]
pub struct GlAccountItem {
    #[serde(rename = "INVOICE_DOC_ITEM")]
    pub invoice_doc_item: u32,

    #[serde(rename = "GL_ACCOUNT")]
    pub gl_account: String,

    #[serde(rename = "ITEM_AMOUNT")]
    pub item_amount: Decimal,

    #[serde(rename = "TAX_CODE")]
    pub tax_code: String,

    #[serde(rename = "ITEM_TEXT")]
    pub item_text: String,
}

/// ACCOUNTINGDATA row, linked to its GL line by INVOICE_DOC_ITEM.
#[derive(Debug, Clone, Serialize)]
pub struct AccountingItem {
    #[serde(rename = "INVOICE_DOC_ITEM")]
    pub invoice_doc_item: u32,

    #[serde(rename = "PROFIT_CTR")]
    pub profit_ctr: String,

    #[serde(rename = "COSTCENTER", skip_serializing_if = "Option::is_none")]
    pub costcenter: Option<String>,
}

/// Invoice to post, in domain terms. The posting service marshals this
/// onto the BAPI structures above.
#[derive(Debug, Clone)]
pub struct VendorInvoice {
    pub doc_type: String,
    pub document_date: NaiveDate,
    pub posting_date: NaiveDate,
    pub company_code: String,
    pub currency: String,
    pub gross_amount: Decimal,
    pub vendor: String,
    pub reference: String,
    pub payment_terms: Option<String>,
    pub baseline_date: Option<NaiveDate>,
    pub lines: Vec<ExpenseLine>,
}

/// One GL distribution line with its cost assignment. The remote system
/// enforces that line amounts sum to the header gross amount.
#[derive(Debug, Clone)]
pub struct ExpenseLine {
    pub gl_account: String,
    pub amount: Decimal,
    pub tax_code: String,
    pub text: String,
    pub profit_center: String,
    pub cost_center: Option<String>,
}
