//! # Draft Tax Documents
//!
//! An invoice or order being edited in the dashboard.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Form Action              Document Operation        Recompute           │
//! │  ───────────              ──────────────────        ─────────           │
//! │                                                                         │
//! │  "Add row" ─────────────► add_line(item) ─────────► totals(&calc)       │
//! │                                                                         │
//! │  Edit qty / price ──────► update_line(id, item) ──► totals(&calc)       │
//! │                                                                         │
//! │  Delete row ────────────► remove_line(id) ────────► totals(&calc)       │
//! │                                                                         │
//! │  Change buyer ──────────► set_buyer_state(code) ──► totals(&calc)       │
//! │                                                                         │
//! │  Totals are never stored: every read recomputes from current lines.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::tax::{determine_supply_type, summarize_breakdowns, TaxCalculator};
use crate::types::{DocumentKind, DocumentTotals, LineItem, RateSummary, SupplyType, TaxBreakdown};
use crate::validation::{validate_line_item, validate_state_code};
use crate::MAX_DOCUMENT_LINES;

/// A line on a draft, with a stable id for edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLine {
    #[ts(as = "String")]
    pub line_id: Uuid,
    pub item: LineItem,
}

/// An invoice or order draft.
///
/// ## Invariants
/// - Every stored line passed validation when it was added or updated
/// - At most [`MAX_DOCUMENT_LINES`] lines
/// - Seller and buyer state codes are non-empty
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxDocument {
    pub kind: DocumentKind,

    /// Invoice / order number, once assigned.
    pub number: Option<String>,

    pub seller_state_code: String,

    pub buyer_state_code: String,

    pub lines: Vec<DocumentLine>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl TaxDocument {
    /// Creates an empty draft.
    ///
    /// ## Errors
    /// `InvalidInput` if either state code is empty.
    pub fn new(
        kind: DocumentKind,
        seller_state_code: impl Into<String>,
        buyer_state_code: impl Into<String>,
    ) -> CoreResult<Self> {
        let seller_state_code = seller_state_code.into();
        let buyer_state_code = buyer_state_code.into();
        validate_state_code("seller state code", &seller_state_code)?;
        validate_state_code("buyer state code", &buyer_state_code)?;

        Ok(TaxDocument {
            kind,
            number: None,
            seller_state_code,
            buyer_state_code,
            lines: Vec::new(),
            created_at: Utc::now(),
        })
    }

    /// Assigns a document number.
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    /// Changes the buyer (e.g. a different customer was picked).
    pub fn set_buyer_state(&mut self, buyer_state_code: impl Into<String>) -> CoreResult<()> {
        let code = buyer_state_code.into();
        validate_state_code("buyer state code", &code)?;
        self.buyer_state_code = code;
        Ok(())
    }

    /// Supply type for every line of this document.
    pub fn supply_type(&self) -> SupplyType {
        determine_supply_type(&self.seller_state_code, &self.buyer_state_code)
    }

    /// Appends a line and returns its id.
    ///
    /// ## Errors
    /// - `TooManyLines` at the line limit
    /// - `InvalidInput` if the item fails validation
    pub fn add_line(&mut self, item: LineItem) -> CoreResult<Uuid> {
        if self.lines.len() >= MAX_DOCUMENT_LINES {
            return Err(CoreError::TooManyLines {
                max: MAX_DOCUMENT_LINES,
            });
        }
        validate_line_item(&item)?;

        let line_id = Uuid::new_v4();
        self.lines.push(DocumentLine { line_id, item });
        Ok(line_id)
    }

    /// Replaces the item on an existing line.
    pub fn update_line(&mut self, line_id: Uuid, item: LineItem) -> CoreResult<()> {
        let index = self.position(line_id)?;
        validate_line_item(&item).map_err(|e| CoreError::InvalidLine { index, source: e })?;
        self.lines[index].item = item;
        Ok(())
    }

    /// Removes a line.
    pub fn remove_line(&mut self, line_id: Uuid) -> CoreResult<LineItem> {
        let index = self.position(line_id)?;
        Ok(self.lines.remove(index).item)
    }

    /// Removes all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line items in display order.
    pub fn items(&self) -> Vec<LineItem> {
        self.lines.iter().map(|l| l.item.clone()).collect()
    }

    /// Per-line tax, in display order.
    pub fn breakdowns(&self, calc: &TaxCalculator) -> CoreResult<Vec<TaxBreakdown>> {
        calc.breakdowns(&self.items(), self.supply_type())
    }

    /// Current totals.
    pub fn totals(&self, calc: &TaxCalculator) -> CoreResult<DocumentTotals> {
        let lines = self.breakdowns(calc)?;
        calc.totals_from_breakdowns(&lines)
    }

    /// Current per-slab summary.
    pub fn rate_summary(&self, calc: &TaxCalculator) -> CoreResult<Vec<RateSummary>> {
        let lines = self.breakdowns(calc)?;
        summarize_breakdowns(&lines)
    }

    fn position(&self, line_id: Uuid) -> CoreResult<usize> {
        self.lines
            .iter()
            .position(|l| l.line_id == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use rust_decimal_macros::dec;

    fn tiles() -> LineItem {
        LineItem::new(dec!(10), Money::from_rupees(750), 18)
    }

    #[test]
    fn test_new_requires_state_codes() {
        assert!(TaxDocument::new(DocumentKind::Invoice, "27", "").is_err());
        assert!(TaxDocument::new(DocumentKind::Order, "", "27").is_err());
    }

    #[test]
    fn test_add_and_total() {
        let mut doc = TaxDocument::new(DocumentKind::Invoice, "27", "27")
            .unwrap()
            .with_number("MO/2026-27/0042");
        doc.add_line(tiles()).unwrap();
        doc.add_line(tiles()).unwrap();

        let totals = doc.totals(&TaxCalculator::default()).unwrap();
        assert_eq!(totals.total_cgst, Money::from_rupees(1350));
        assert_eq!(totals.grand_total, Money::from_rupees(17_700));
        assert_eq!(doc.number.as_deref(), Some("MO/2026-27/0042"));
    }

    #[test]
    fn test_change_buyer_switches_to_igst() {
        let mut doc = TaxDocument::new(DocumentKind::Order, "27", "27").unwrap();
        doc.add_line(tiles()).unwrap();
        assert_eq!(doc.supply_type(), SupplyType::IntraState);

        doc.set_buyer_state("24").unwrap();
        assert_eq!(doc.supply_type(), SupplyType::InterState);

        let totals = doc.totals(&TaxCalculator::default()).unwrap();
        assert_eq!(totals.total_cgst, Money::zero());
        assert_eq!(totals.total_igst, Money::from_rupees(1350));

        assert!(doc.set_buyer_state(" ").is_err());
        assert_eq!(doc.buyer_state_code, "24");
    }

    #[test]
    fn test_update_and_remove() {
        let mut doc = TaxDocument::new(DocumentKind::Invoice, "27", "27").unwrap();
        let first = doc.add_line(tiles()).unwrap();
        let second = doc.add_line(tiles()).unwrap();

        doc.update_line(second, LineItem::new(dec!(1), Money::from_rupees(100), 5))
            .unwrap();
        let totals = doc.totals(&TaxCalculator::default()).unwrap();
        assert_eq!(totals.subtotal, Money::from_rupees(7600));

        let removed = doc.remove_line(first).unwrap();
        assert_eq!(removed, tiles());
        assert_eq!(doc.line_count(), 1);

        assert!(matches!(
            doc.remove_line(first),
            Err(CoreError::LineNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_edits_leave_document_unchanged() {
        let mut doc = TaxDocument::new(DocumentKind::Invoice, "27", "27").unwrap();
        assert!(doc.add_line(LineItem::new(dec!(0), Money::from_rupees(1), 5)).is_err());
        assert!(doc.is_empty());

        let id = doc.add_line(tiles()).unwrap();
        let err = doc
            .update_line(id, LineItem::new(dec!(1), Money::from_rupees(1), 13))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidLine { index: 0, .. }));
        assert_eq!(doc.items(), vec![tiles()]);
    }

    #[test]
    fn test_line_limit() {
        let mut doc = TaxDocument::new(DocumentKind::Invoice, "27", "29").unwrap();
        for _ in 0..MAX_DOCUMENT_LINES {
            doc.add_line(tiles()).unwrap();
        }
        assert!(matches!(
            doc.add_line(tiles()),
            Err(CoreError::TooManyLines { .. })
        ));

        doc.clear();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_rate_summary() {
        let mut doc = TaxDocument::new(DocumentKind::Invoice, "27", "27").unwrap();
        doc.add_line(tiles()).unwrap();
        doc.add_line(LineItem::new(dec!(1), Money::from_rupees(100), 5))
            .unwrap();

        let summary = doc.rate_summary(&TaxCalculator::default()).unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].cgst, Money::from_paise(250));
        assert_eq!(summary[1].sgst, Money::from_rupees(675));
    }
}
