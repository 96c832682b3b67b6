//! # marbleops-core: GST Tax Logic for MarbleOps
//!
//! Every number on a MarbleOps invoice, order, or payment receipt that
//! involves GST comes from this crate. Pure functions, zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MarbleOps Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard (web)                              │   │
//! │  │   Invoice form ──► Order form ──► PDF export ──► Reports        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              marbleops-billing (config, logging)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ marbleops-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌──────────┐          │   │
//! │  │   │  money  │  │   tax   │  │   gst   │  │ document │          │   │
//! │  │   │ paise   │  │ CGST/   │  │ GSTIN,  │  │ draft    │          │   │
//! │  │   │ math    │  │ SGST/   │  │ state   │  │ invoice/ │          │   │
//! │  │   │         │  │ IGST    │  │ codes   │  │ order    │          │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in integer paise
//! - [`types`] - Line items, breakdowns, totals, settings
//! - [`tax`] - The tax split calculator
//! - [`gst`] - GSTIN and state code helpers
//! - [`document`] - Editable invoice/order drafts
//! - [`validation`] - Input rules
//! - [`error`] - Error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, call it on every keystroke
//! 2. **Integer Money**: paise in i64; decimals only for quantities and sizes
//! 3. **One Error Kind**: bad input is the only failure, reported as `INVALID_INPUT`
//!
//! ## Example Usage
//!
//! ```rust
//! use marbleops_core::{compute_document_totals, LineItem, Money, PartyLocationPair};
//! use rust_decimal::Decimal;
//!
//! let parties = PartyLocationPair::new("27", "24"); // Maharashtra → Gujarat
//! let items = vec![LineItem::new(Decimal::from(10), Money::from_rupees(750), 18)];
//!
//! let totals = compute_document_totals(&items, parties.supply_type()).unwrap();
//! assert_eq!(totals.total_igst, Money::from_rupees(1350));
//! assert_eq!(totals.grand_total, Money::from_rupees(8850));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod document;
pub mod error;
pub mod gst;
pub mod money;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use document::{DocumentLine, TaxDocument};
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use gst::Gstin;
pub use money::Money;
pub use tax::{
    checked_supply_type, compute_document_totals, compute_line_breakdown, determine_supply_type,
    summarize_by_rate, TaxCalculator,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines on a single draft document.
///
/// ## Business Reason
/// Large project orders run to a few dozen slab lots; anything near this
/// limit is almost always a paste accident in the form.
pub const MAX_DOCUMENT_LINES: usize = 200;
