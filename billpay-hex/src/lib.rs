//! # Billpay Hex
//!
//! Application service layer and HTTP adapter for the bill-payment service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (the payment workflow)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `R: BillPaymentRepository`, allowing
//! different repository implementations to be injected.

pub mod inbound;
pub mod service;


pub use service::BillPaymentService;
