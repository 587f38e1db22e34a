// BAPI_ACC_DOCUMENT_POST request records
// One receivable line, one revenue line, and a parallel currency-amount
// table keyed by ITEMNO_ACC. Amounts are signed: debit positive, credit
// negative.

use rust_decimal::Decimal;
use serde::Serialize;

pub const RECEIVABLE_ITEM: u32 = 1;
pub const REVENUE_ITEM: u32 = 2;

/// DOCUMENTHEADER structure.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentHeader {
    #[serde(rename = "USERNAME")]
    pub username: String,

    #[serde(rename = "COMP_CODE")]
    pub comp_code: String,

    #[serde(rename = "DOC_DATE")]
    pub doc_date: String,

    #[serde(rename = "PSTNG_DATE")]
    pub pstng_date: String,

    #[serde(rename = "DOC_TYPE")]
    pub doc_type: String,

    #[serde(rename = "REF_DOC_NO")]
    pub ref_doc_no: String,

    #[serde(rename = "HEADER_TXT")]
    pub header_txt: String,
}

/// ACCOUNTRECEIVABLE row.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerItem {
    #[serde(rename = "ITEMNO_ACC")]
    pub itemno_acc: u32,

    /// Customer account number, zero-padded character key.
    #[serde(rename = "CUSTOMER")]
    pub customer: String,
}

/// ACCOUNTGL row.
#[derive(Debug, Clone, Serialize)]
pub struct GlItem {
    #[serde(rename = "ITEMNO_ACC")]
    pub itemno_acc: u32,

    #[serde(rename = "GL_ACCOUNT")]
    pub gl_account: String,

    #[serde(rename = "ITEM_TEXT", skip_serializing_if = "Option::is_none")]
    pub item_text: Option<String>,
}

/// CURRENCYAMOUNT row.
#[derive(Debug, Clone, Serialize)]
pub struct CurrencyAmount {
    #[serde(rename = "ITEMNO_ACC")]
    pub itemno_acc: u32,

    #[serde(rename = "CURRENCY")]
    pub currency: String,

    #[serde(rename = "AMT_DOCCUR")]
    pub amt_doccur: Decimal,
}

impl CurrencyAmount {
    /// Receivable/revenue amount pair netting to zero: the customer line
    /// carries the positive amount, the revenue line its exact negation.
    pub fn balanced_pair(currency: &str, amount: Decimal) -> [CurrencyAmount; 2] {
        [
            CurrencyAmount {
                itemno_acc: RECEIVABLE_ITEM,
                currency: currency.to_string(),
                amt_doccur: amount,
            },
            CurrencyAmount {
                itemno_acc: REVENUE_ITEM,
                currency: currency.to_string(),
                amt_doccur: -amount,
            },
        ]
    }
}
