// RFC gateway module
// Exports the gateway client and its request/response wire shapes.

pub mod client;

pub use client::{Result, RfcClient, RfcConfig, RfcError, RfcRequest, RfcResponse};
