//! # Tax Split Calculator
//!
//! Turns line items plus a supply type into CGST/SGST/IGST amounts and
//! document totals.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  seller_state == buyer_state ?                                          │
//! │        │ yes → INTRA_STATE            │ no → INTER_STATE                │
//! │        ▼                              ▼                                 │
//! │  for each LineItem:                                                     │
//! │    validate (qty > 0, price ≥ 0, rate ∈ slabs, dims > 0)               │
//! │    taxable = unit_price × quantity [× length × width]   → paise        │
//! │    INTRA: cgst = sgst = taxable × rate/2     igst = 0                  │
//! │    INTER: igst = taxable × rate              cgst = sgst = 0           │
//! │    line_total = taxable + tax                                          │
//! │        │                                                                │
//! │        ▼ Σ                                                              │
//! │  unrounded = subtotal + cgst + sgst + igst                             │
//! │  grand_total = round(unrounded)   round_off = grand_total - unrounded  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Precision
//! - Taxable value is rounded to the paisa once per line.
//! - CGST and SGST are each computed at half the rate and rounded, so they are
//!   always equal; together they can differ from the full-rate tax by at most
//!   one paisa.
//! - The grand total is rounded per [`RoundingPolicy`].
//!
//! ## Example
//! ```rust
//! use marbleops_core::money::Money;
//! use marbleops_core::tax::{compute_document_totals, compute_line_breakdown};
//! use marbleops_core::types::{LineItem, SupplyType};
//! use rust_decimal::Decimal;
//!
//! let item = LineItem::new(Decimal::from(10), Money::from_rupees(750), 18);
//!
//! let line = compute_line_breakdown(&item, SupplyType::IntraState).unwrap();
//! assert_eq!(line.cgst, Money::from_rupees(675));
//! assert_eq!(line.line_total, Money::from_rupees(8850));
//!
//! let totals = compute_document_totals(&[item.clone(), item], SupplyType::IntraState).unwrap();
//! assert_eq!(totals.grand_total, Money::from_rupees(17_700));
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::gst::normalize_state_code;
use crate::money::Money;
use crate::types::{
    DocumentTotals, GstRate, LineItem, RateSummary, RoundingPolicy, SupplyType, TaxBreakdown,
    TaxMode,
};
use crate::validation::{validate_line_item, validate_state_code};

// =============================================================================
// Supply Type
// =============================================================================

/// Classifies a document by comparing state codes.
///
/// Codes are compared after trimming, upper-casing, and zero-padding single
/// digits, so `"7"` and `"07"` are the same state.
///
/// Callers pass validated codes: two blank codes compare equal here. Use
/// [`checked_supply_type`] for raw input.
///
/// ```rust
/// use marbleops_core::tax::determine_supply_type;
/// use marbleops_core::types::SupplyType;
///
/// assert_eq!(determine_supply_type("27", "27"), SupplyType::IntraState);
/// assert_eq!(determine_supply_type("27", "24"), SupplyType::InterState);
/// ```
pub fn determine_supply_type(seller_state_code: &str, buyer_state_code: &str) -> SupplyType {
    if normalize_state_code(seller_state_code) == normalize_state_code(buyer_state_code) {
        SupplyType::IntraState
    } else {
        SupplyType::InterState
    }
}

/// [`determine_supply_type`] for unvalidated input.
///
/// ## Errors
/// `InvalidInput(Required)` if either state code is blank.
///
/// ```rust
/// use marbleops_core::tax::checked_supply_type;
/// use marbleops_core::types::SupplyType;
///
/// assert_eq!(checked_supply_type("27", "24").unwrap(), SupplyType::InterState);
/// assert!(checked_supply_type("", "").is_err());
/// ```
pub fn checked_supply_type(seller_state_code: &str, buyer_state_code: &str) -> CoreResult<SupplyType> {
    validate_state_code("seller state code", seller_state_code)?;
    validate_state_code("buyer state code", buyer_state_code)?;
    Ok(determine_supply_type(seller_state_code, buyer_state_code))
}

// =============================================================================
// Calculator
// =============================================================================

/// Calculation settings for a document.
///
/// Cheap to copy; build one per document (or keep one from config) and call
/// it as often as the form changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculator {
    #[serde(default)]
    pub rounding: RoundingPolicy,
    #[serde(default)]
    pub tax_mode: TaxMode,
}

impl TaxCalculator {
    pub const fn new(rounding: RoundingPolicy, tax_mode: TaxMode) -> Self {
        TaxCalculator { rounding, tax_mode }
    }

    /// Computes the tax breakdown for one line.
    ///
    /// ## Errors
    /// `CoreError::InvalidInput` if quantity ≤ 0, unit price < 0, the rate is
    /// not a GST slab, a dimension is ≤ 0, or the value overflows.
    pub fn line_breakdown(&self, item: &LineItem, supply_type: SupplyType) -> CoreResult<TaxBreakdown> {
        let rate = validate_line_item(item)?;

        let gross = item
            .billable_quantity()
            .and_then(|factor| item.unit_price.scale(factor))
            .ok_or_else(|| ValidationError::Overflow {
                field: "taxable value".to_string(),
            })?;

        let taxable_value = match self.tax_mode {
            TaxMode::Exclusive => gross,
            TaxMode::Inclusive => gross.exclude_tax(rate.bps()),
        };

        split_tax(rate, supply_type, taxable_value).map_err(CoreError::from)
    }

    /// Computes every line, tagging failures with their index.
    pub fn breakdowns(&self, items: &[LineItem], supply_type: SupplyType) -> CoreResult<Vec<TaxBreakdown>> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                self.line_breakdown(item, supply_type)
                    .map_err(|e| CoreError::on_line(index, e))
            })
            .collect()
    }

    /// Computes document totals for a set of line items.
    ///
    /// An empty document totals to zero. Any invalid line rejects the whole
    /// computation.
    pub fn document_totals(&self, items: &[LineItem], supply_type: SupplyType) -> CoreResult<DocumentTotals> {
        let lines = self.breakdowns(items, supply_type)?;
        self.totals_from_breakdowns(&lines)
    }

    /// Aggregates already-computed lines.
    ///
    /// ## Errors
    /// `InvalidInput(Overflow)` if a sum leaves the `i64` paise range.
    pub fn totals_from_breakdowns(&self, lines: &[TaxBreakdown]) -> CoreResult<DocumentTotals> {
        let subtotal = document_sum(lines.iter().map(|l| l.taxable_value))?;
        let total_cgst = document_sum(lines.iter().map(|l| l.cgst))?;
        let total_sgst = document_sum(lines.iter().map(|l| l.sgst))?;
        let total_igst = document_sum(lines.iter().map(|l| l.igst))?;

        let unrounded = document_sum([subtotal, total_cgst, total_sgst, total_igst])?;
        let grand_total = match self.rounding {
            RoundingPolicy::Rupee => unrounded.round_to_rupee(),
            RoundingPolicy::Paisa => unrounded,
        };

        Ok(DocumentTotals {
            subtotal,
            total_cgst,
            total_sgst,
            total_igst,
            round_off: grand_total - unrounded,
            grand_total,
        })
    }

    /// Per-slab tax summary, ascending by rate. Slabs with no lines are omitted.
    pub fn rate_summary(&self, items: &[LineItem], supply_type: SupplyType) -> CoreResult<Vec<RateSummary>> {
        let lines = self.breakdowns(items, supply_type)?;
        summarize_breakdowns(&lines)
    }
}

/// Groups computed lines by GST slab.
///
/// ## Errors
/// `InvalidInput(Overflow)` if a slab's sum leaves the `i64` paise range.
pub fn summarize_breakdowns(lines: &[TaxBreakdown]) -> CoreResult<Vec<RateSummary>> {
    let mut summaries = Vec::new();

    for rate in GstRate::ALL {
        let slab: Vec<&TaxBreakdown> = lines.iter().filter(|l| l.gst_rate == rate).collect();
        if slab.is_empty() {
            continue;
        }
        // Keeps RateSummary::total_tax in range
        document_sum(slab.iter().map(|l| l.total_tax))?;

        summaries.push(RateSummary {
            gst_rate: rate,
            taxable_value: document_sum(slab.iter().map(|l| l.taxable_value))?,
            cgst: document_sum(slab.iter().map(|l| l.cgst))?,
            sgst: document_sum(slab.iter().map(|l| l.sgst))?,
            igst: document_sum(slab.iter().map(|l| l.igst))?,
        });
    }

    Ok(summaries)
}

fn document_sum<I>(values: I) -> CoreResult<Money>
where
    I: IntoIterator<Item = Money>,
{
    Money::checked_sum(values).ok_or_else(|| {
        CoreError::from(ValidationError::Overflow {
            field: "document total".to_string(),
        })
    })
}

fn split_tax(
    rate: GstRate,
    supply_type: SupplyType,
    taxable_value: Money,
) -> Result<TaxBreakdown, ValidationError> {
    let (cgst, sgst, igst) = match supply_type {
        SupplyType::IntraState => {
            let half = taxable_value.calculate_tax(rate.half_bps());
            (half, half, Money::zero())
        }
        SupplyType::InterState => (
            Money::zero(),
            Money::zero(),
            taxable_value.calculate_tax(rate.bps()),
        ),
    };
    let overflow = || ValidationError::Overflow {
        field: "line total".to_string(),
    };
    let total_tax = Money::checked_sum([cgst, sgst, igst]).ok_or_else(overflow)?;
    let line_total = taxable_value.checked_add(total_tax).ok_or_else(overflow)?;

    Ok(TaxBreakdown {
        gst_rate: rate,
        supply_type,
        taxable_value,
        cgst,
        sgst,
        igst,
        total_tax,
        line_total,
    })
}

// =============================================================================
// Free Functions (default settings)
// =============================================================================

/// [`TaxCalculator::line_breakdown`] with default settings
/// (exclusive prices, whole-rupee grand total).
pub fn compute_line_breakdown(item: &LineItem, supply_type: SupplyType) -> CoreResult<TaxBreakdown> {
    TaxCalculator::default().line_breakdown(item, supply_type)
}

/// [`TaxCalculator::document_totals`] with default settings.
pub fn compute_document_totals(items: &[LineItem], supply_type: SupplyType) -> CoreResult<DocumentTotals> {
    TaxCalculator::default().document_totals(items, supply_type)
}

/// [`TaxCalculator::rate_summary`] with default settings.
pub fn summarize_by_rate(items: &[LineItem], supply_type: SupplyType) -> CoreResult<Vec<RateSummary>> {
    TaxCalculator::default().rate_summary(items, supply_type)
}

// =============================================================================
// Unit Tests
// =============================================================================
