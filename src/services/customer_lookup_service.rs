// Customer master lookup
// Reads the customer numbers maintained for a company code through the
// generic table-read facility (RFC_READ_TABLE on KNB1). KUNNR is a
// character key; it stays a string so leading zeros survive.

use serde::{Deserialize, Serialize};

use crate::services::rfc::{Result, RfcClient, RfcRequest};

const QUERY_TABLE: &str = "KNB1";
const CUSTOMER_FIELD: &str = "KUNNR";
const DELIMITER: &str = "|";

#[derive(Debug, Clone, Serialize)]
struct QueryOption {
    #[serde(rename = "TEXT")]
    text: String,
}

#[derive(Debug, Clone, Serialize)]
struct QueryField {
    #[serde(rename = "FIELDNAME")]
    fieldname: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DataRow {
    #[serde(rename = "WA", default)]
    wa: String,
}

pub struct CustomerLookupService {
    client: RfcClient,
}

impl CustomerLookupService {
    pub fn new(client: RfcClient) -> Self {
        Self { client }
    }

    /// Customer numbers for one company code. `max_rows` caps the result
    /// set via ROWCOUNT; `None` reads the full customer master, which on a
    /// large system can be a very large result.
    pub async fn customers_for_company(
        &self,
        company_code: &str,
        max_rows: Option<u32>,
    ) -> Result<Vec<String>> {
        let mut request = RfcRequest::new("RFC_READ_TABLE")
            .import("QUERY_TABLE", &QUERY_TABLE)?
            .import("DELIMITER", &DELIMITER)?
            .table(
                "OPTIONS",
                &[QueryOption {
                    text: format!("BUKRS = '{}'", company_code),
                }],
            )?
            .table(
                "FIELDS",
                &[QueryField {
                    fieldname: CUSTOMER_FIELD.to_string(),
                }],
            )?;

        if let Some(rows) = max_rows {
            request = request.import("ROWCOUNT", &rows)?;
        }

        let response = self.client.call(&request).await?;
        let rows: Vec<DataRow> = response.table("DATA")?;
        let customers = parse_customer_rows(&rows);

        tracing::debug!(
            "Read {} customers for company code {}",
            customers.len(),
            company_code
        );

        Ok(customers)
    }
}

/// One KUNNR per row; single-field reads still carry the delimiter layout,
/// so split each work area and drop blank cells.
fn parse_customer_rows(rows: &[DataRow]) -> Vec<String> {
    rows.iter()
        .flat_map(|row| row.wa.split(DELIMITER))
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}
