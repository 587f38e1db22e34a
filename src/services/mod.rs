pub mod customer_invoice_service;
pub mod customer_lookup_service;
pub mod rfc;
pub mod vendor_invoice_service;

pub use customer_invoice_service::{
    BatchError, BatchOptions, BatchReport, CustomerInvoiceService, PostOutcome, ReferenceGenerator,
};
pub use customer_lookup_service::CustomerLookupService;
pub use vendor_invoice_service::{PostError, PostedInvoice, VendorInvoiceService};
