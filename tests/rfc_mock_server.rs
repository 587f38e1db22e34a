// Mock SAP RFC Gateway for Testing
// Simulates the four remote functions the posting tools invoke.
// Run with: cargo test --test rfc_mock_server

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;

// ============================================================================
// Mock State
// ============================================================================

#[derive(Debug, Clone)]
pub struct PostedDocument {
    pub function: String,
    pub reference: String,
    /// (ITEMNO_ACC, AMT_DOCCUR) pairs as they arrived on the wire.
    pub amounts: Vec<(u64, String)>,
}

#[derive(Debug, Default)]
pub struct MockSapState {
    /// Vendor accounts BAPI_INCOMINGINVOICE_CREATE accepts.
    pub vendors: Vec<String>,
    /// Customer master rows RFC_READ_TABLE returns.
    pub customer_master: Vec<String>,
    /// Customer accounts BAPI_ACC_DOCUMENT_POST accepts.
    pub billable_customers: Vec<String>,
    pub posted_documents: Vec<PostedDocument>,
    pub post_attempts: u32,
    pub commit_count: u32,
    pub document_sequence: u32,
}

type SharedState = Arc<RwLock<MockSapState>>;

fn success_message(message: &str) -> Value {
    json!({"TYPE": "S", "ID": "RW", "NUMBER": "605", "MESSAGE": message})
}

fn error_message(message: &str) -> Value {
    json!({"TYPE": "E", "ID": "M8", "NUMBER": "286", "MESSAGE": message})
}

// ============================================================================
// Function Dispatch
// ============================================================================

async fn dispatch_rfc(
    State(state): State<SharedState>,
    Path(function): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    match function.as_str() {
        "BAPI_INCOMINGINVOICE_CREATE" => invoice_create(state, payload).await,
        "BAPI_ACC_DOCUMENT_POST" => acc_document_post(state, payload).await,
        "RFC_READ_TABLE" => read_table(state, payload).await,
        "BAPI_TRANSACTION_COMMIT" => transaction_commit(state).await,
        "RFC_PING" => Ok(Json(json!({}))),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn invoice_create(state: SharedState, payload: Value) -> Result<Json<Value>, StatusCode> {
    let mut state = state.write().await;
    state.post_attempts += 1;

    let header = &payload["IMPORT"]["HEADERDATA"];
    let vendor = header["VENDOR"].as_str().unwrap_or_default().to_string();
    let reference = header["REF_DOC_NO"].as_str().unwrap_or_default().to_string();

    if !state.vendors.contains(&vendor) {
        return Ok(Json(json!({
            "TABLES": {
                "RETURN": [error_message(&format!("Vendor {} does not exist", vendor))]
            }
        })));
    }

    let amounts = payload["TABLES"]["GLACCOUNTDATA"]
        .as_array()
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    (
                        row["INVOICE_DOC_ITEM"].as_u64().unwrap_or(0),
                        row["ITEM_AMOUNT"].as_str().unwrap_or_default().to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    state.document_sequence += 1;
    let document_number = format!("51056{:05}", state.document_sequence);
    state.posted_documents.push(PostedDocument {
        function: "BAPI_INCOMINGINVOICE_CREATE".to_string(),
        reference,
        amounts,
    });

    Ok(Json(json!({
        "EXPORT": {
            "INVOICEDOCNUMBER": document_number,
            "FISCALYEAR": "2026"
        },
        "TABLES": {
            "RETURN": [success_message("Document created")]
        }
    })))
}

async fn acc_document_post(state: SharedState, payload: Value) -> Result<Json<Value>, StatusCode> {
    let mut state = state.write().await;
    state.post_attempts += 1;

    let customer = payload["TABLES"]["ACCOUNTRECEIVABLE"][0]["CUSTOMER"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    let reference = payload["IMPORT"]["DOCUMENTHEADER"]["REF_DOC_NO"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    if !state.billable_customers.contains(&customer) {
        return Ok(Json(json!({
            "TABLES": {
                "RETURN": [error_message(&format!(
                    "Customer {} does not exist in company code", customer
                ))]
            }
        })));
    }

    let amounts = payload["TABLES"]["CURRENCYAMOUNT"]
        .as_array()
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    (
                        row["ITEMNO_ACC"].as_u64().unwrap_or(0),
                        row["AMT_DOCCUR"].as_str().unwrap_or_default().to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    state.document_sequence += 1;
    let object_key = format!("{:010}AUS2026", 1_800_000_000u64 + u64::from(state.document_sequence));
    state.posted_documents.push(PostedDocument {
        function: "BAPI_ACC_DOCUMENT_POST".to_string(),
        reference,
        amounts,
    });

    Ok(Json(json!({
        "EXPORT": {
            "OBJ_KEY": object_key
        },
        "TABLES": {
            "RETURN": [success_message("Document posted")]
        }
    })))
}

async fn read_table(state: SharedState, payload: Value) -> Result<Json<Value>, StatusCode> {
    let state = state.read().await;

    if payload["IMPORT"]["QUERY_TABLE"].as_str() != Some("KNB1") {
        return Err(StatusCode::NOT_FOUND);
    }

    let mut rows: Vec<Value> = state
        .customer_master
        .iter()
        .map(|customer| json!({"WA": customer}))
        .collect();

    if let Some(row_count) = payload["IMPORT"]["ROWCOUNT"].as_u64() {
        rows.truncate(row_count as usize);
    }

    Ok(Json(json!({
        "TABLES": {
            "DATA": rows
        }
    })))
}

async fn transaction_commit(state: SharedState) -> Result<Json<Value>, StatusCode> {
    let mut state = state.write().await;
    state.commit_count += 1;

    Ok(Json(json!({
        "TABLES": {
            "RETURN": []
        }
    })))
}

// ============================================================================
// Server Setup
// ============================================================================

pub fn create_rfc_mock_server(state: SharedState) -> Router {
    Router::new()
        .route("/rfc/:function", post(dispatch_rfc))
        .with_state(state)
}

pub async fn start_mock_gateway() -> (String, SharedState) {
    let state = Arc::new(RwLock::new(MockSapState {
        vendors: vec!["1100688617".to_string()],
        customer_master: vec!["0000000001".to_string(), "0000999999".to_string()],
        billable_customers: vec!["0000000001".to_string(), "0000999999".to_string()],
        ..MockSapState::default()
    }));

    let app = create_rfc_mock_server(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server time to start
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    (format!("http://{}", addr), state)
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use fipost::models::incoming_invoice::{ExpenseLine, VendorInvoice};
    use fipost::services::customer_invoice_service::{
        BatchError, BatchOptions, CustomerInvoiceService, PostOutcome,
    };
    use fipost::services::customer_lookup_service::CustomerLookupService;
    use fipost::services::rfc::{RfcClient, RfcConfig};
    use fipost::services::vendor_invoice_service::{PostError, VendorInvoiceService};

    fn rfc_client(gateway_url: &str) -> RfcClient {
        RfcClient::new(RfcConfig {
            host: String::new(),
            system_number: String::new(),
            system_id: "ECC".to_string(),
            client: "100".to_string(),
            user: "MYUSER".to_string(),
            password: "MYPASS".to_string(),
            language: "EN".to_string(),
            gateway_url: Some(gateway_url.to_string()),
        })
        .unwrap()
    }

    fn vendor_invoice(vendor: &str) -> VendorInvoice {
        VendorInvoice {
            doc_type: "RE".to_string(),
            document_date: NaiveDate::from_ymd_opt(2026, 8, 8).unwrap(),
            posting_date: NaiveDate::from_ymd_opt(2026, 8, 8).unwrap(),
            company_code: "AUS".to_string(),
            currency: "AUD".to_string(),
            gross_amount: dec!(1000),
            vendor: vendor.to_string(),
            reference: "INV-NONPO-0001".to_string(),
            payment_terms: None,
            baseline_date: None,
            lines: vec![ExpenseLine {
                gl_account: "00041000400".to_string(),
                amount: dec!(1000),
                tax_code: "ZZ".to_string(),
                text: "Non-PO expense".to_string(),
                profit_center: "100312au".to_string(),
                cost_center: None,
            }],
        }
    }

    fn batch_options(invoice_count: u32, amounts: Vec<Decimal>) -> BatchOptions {
        BatchOptions {
            company_code: "AUS".to_string(),
            currency: "AUD".to_string(),
            doc_type: "DR".to_string(),
            revenue_account: "0000800000".to_string(),
            posting_user: "MYUSER".to_string(),
            invoice_count,
            amounts,
            max_pool_rows: None,
        }
    }

    #[tokio::test]
    async fn vendor_invoice_posts_and_commits() {
        let (gateway_url, state) = start_mock_gateway().await;

        let service = VendorInvoiceService::new(rfc_client(&gateway_url));
        let posted = service.post(&vendor_invoice("1100688617")).await.unwrap();

        assert!(!posted.document_number.is_empty());
        assert_eq!(posted.fiscal_year, "2026");

        let state = state.read().await;
        assert_eq!(state.commit_count, 1);
        assert_eq!(state.posted_documents.len(), 1);
        assert_eq!(state.posted_documents[0].reference, "INV-NONPO-0001");
    }

    #[tokio::test]
    async fn rejected_vendor_invoice_never_commits() {
        let (gateway_url, state) = start_mock_gateway().await;

        let service = VendorInvoiceService::new(rfc_client(&gateway_url));
        let result = service.post(&vendor_invoice("9999999999")).await;

        match result {
            Err(PostError::Rejected { messages }) => {
                assert!(messages.iter().any(|m| m.is_blocking()));
            }
            other => panic!("expected rejection, got {:?}", other.map(|p| p.document_number)),
        }

        let state = state.read().await;
        assert_eq!(state.commit_count, 0);
        assert!(state.posted_documents.is_empty());
    }

    #[tokio::test]
    async fn batch_posts_one_balanced_document() {
        let (gateway_url, state) = start_mock_gateway().await;
        {
            let mut state = state.write().await;
            state.customer_master = vec!["0000000001".to_string()];
            state.billable_customers = vec!["0000000001".to_string()];
        }

        let service =
            CustomerInvoiceService::new(rfc_client(&gateway_url), batch_options(1, vec![dec!(500)]));
        let report = service.run().await.unwrap();

        assert_eq!(report.attempted, 1);
        assert_eq!(report.posted, 1);
        assert_eq!(report.failed, 0);
        match &report.outcomes[0] {
            PostOutcome::Posted { customer, amount, document_key, .. } => {
                assert_eq!(customer, "0000000001");
                assert_eq!(*amount, dec!(500));
                assert!(!document_key.is_empty());
            }
            other => panic!("expected posted outcome, got {:?}", other),
        }

        let state = state.read().await;
        assert_eq!(state.commit_count, 1);
        assert_eq!(state.posted_documents.len(), 1);

        let document = &state.posted_documents[0];
        assert_eq!(document.function, "BAPI_ACC_DOCUMENT_POST");
        let receivable: Decimal = document.amounts[0].1.parse().unwrap();
        let revenue: Decimal = document.amounts[1].1.parse().unwrap();
        assert_eq!(document.amounts[0].0, 1);
        assert_eq!(document.amounts[1].0, 2);
        assert_eq!(receivable, dec!(500.00));
        assert_eq!(revenue, dec!(-500.00));
        assert_eq!(receivable + revenue, Decimal::ZERO);
    }

    #[tokio::test]
    async fn empty_customer_pool_issues_no_posting_calls() {
        let (gateway_url, state) = start_mock_gateway().await;
        {
            let mut state = state.write().await;
            state.customer_master.clear();
        }

        let service =
            CustomerInvoiceService::new(rfc_client(&gateway_url), batch_options(5, vec![dec!(500)]));
        let result = service.run().await;

        assert!(matches!(result, Err(BatchError::EmptyCustomerPool(_))));

        let state = state.read().await;
        assert_eq!(state.post_attempts, 0);
        assert_eq!(state.commit_count, 0);
        assert!(state.posted_documents.is_empty());
    }

    #[tokio::test]
    async fn rejected_documents_skip_commit_and_the_loop_continues() {
        let (gateway_url, state) = start_mock_gateway().await;
        {
            let mut state = state.write().await;
            state.customer_master = vec!["0000000001".to_string()];
            // the master lists the customer, but posting rejects it
            state.billable_customers.clear();
        }

        let service =
            CustomerInvoiceService::new(rfc_client(&gateway_url), batch_options(3, vec![dec!(500)]));
        let report = service.run().await.unwrap();

        assert_eq!(report.attempted, 3);
        assert_eq!(report.posted, 0);
        assert_eq!(report.failed, 3);
        assert!(report
            .outcomes
            .iter()
            .all(|outcome| matches!(outcome, PostOutcome::Failed { .. })));

        let state = state.read().await;
        assert_eq!(state.post_attempts, 3);
        assert_eq!(state.commit_count, 0);
        assert!(state.posted_documents.is_empty());
    }

    #[tokio::test]
    async fn customer_lookup_preserves_leading_zeros() {
        let (gateway_url, _state) = start_mock_gateway().await;

        let lookup = CustomerLookupService::new(rfc_client(&gateway_url));
        let customers = lookup.customers_for_company("AUS", None).await.unwrap();

        assert_eq!(
            customers,
            vec!["0000000001".to_string(), "0000999999".to_string()]
        );
    }

    #[tokio::test]
    async fn customer_lookup_honors_the_row_cap() {
        let (gateway_url, _state) = start_mock_gateway().await;

        let lookup = CustomerLookupService::new(rfc_client(&gateway_url));
        let customers = lookup.customers_for_company("AUS", Some(1)).await.unwrap();

        assert_eq!(customers, vec!["0000000001".to_string()]);
    }

    #[tokio::test]
    async fn gateway_probe_round_trips() {
        let (gateway_url, _state) = start_mock_gateway().await;

        let client = rfc_client(&gateway_url);
        assert!(client.test_connection().await.unwrap());
    }
}
