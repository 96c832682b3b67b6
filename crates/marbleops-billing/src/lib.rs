//! # marbleops-billing: Billing Layer for MarbleOps
//!
//! Wires the seller profile, calculation settings and logging around
//! `marbleops-core`, and turns failures into responses the dashboard can show.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  init_tracing()                      RUST_LOG or "info,marbleops=debug" │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BillingConfig::load(None)           defaults ◄ billing.toml ◄ env      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BillingService::new(config)         resolves seller state once         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  service.quote(buyer, items)  ──►  TaxQuote | ErrorResponse             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use marbleops_billing::{BillingConfig, BillingService, BuyerLocation};
//! use marbleops_core::{LineItem, Money};
//! use rust_decimal::Decimal;
//!
//! let service = BillingService::new(BillingConfig::default()).unwrap();
//! let items = vec![LineItem::new(Decimal::from(4), Money::from_rupees(2_500), 18)];
//!
//! let quote = service.quote(&BuyerLocation::StateCode("27".into()), &items).unwrap();
//! assert_eq!(quote.totals.total_cgst, Money::from_rupees(900));
//! assert_eq!(quote.totals.grand_total, Money::from_rupees(11_800));
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod service;

pub use config::{BillingConfig, SellerConfig, TaxSettings};
pub use error::{BillingError, BillingResult, ErrorCode, ErrorResponse};
pub use logging::{init_tracing, init_tracing_with, DEFAULT_LOG_FILTER};
pub use service::{BillingService, BuyerLocation, TaxQuote};
