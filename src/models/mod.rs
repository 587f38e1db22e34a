pub mod acc_document;
pub mod incoming_invoice;
pub mod return_message;

pub use return_message::{summarize, ReturnMessage, Severity};

use chrono::NaiveDate;

/// SAP internal date format (YYYYMMDD).
pub fn sap_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
