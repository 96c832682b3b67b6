//! # Billing Service
//!
//! What the dashboard calls to price a document.
//!
//! ## Quote Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Dashboard Request                                                      │
//! │  { buyer: { gstin: "24AAACC1206D1ZM" }, items: [...] }                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  BuyerLocation::state_code() ──► seller state (from BillingConfig)      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  determine_supply_type ──► TaxCalculator::breakdowns                    │
//! │         │                                                               │
//! │         ├──► totals_from_breakdowns                                     │
//! │         └──► summarize_breakdowns                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  TaxQuote (JSON)   or   ErrorResponse { code: "INVALID_INPUT", ... }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use marbleops_core::tax::summarize_breakdowns;
use marbleops_core::validation::validate_state_code;
use marbleops_core::{
    determine_supply_type, CoreResult, DocumentKind, DocumentTotals, Gstin, LineItem,
    RateSummary, SupplyType, TaxBreakdown, TaxCalculator, TaxDocument,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::config::BillingConfig;
use crate::error::BillingResult;

// =============================================================================
// Request / Response Types
// =============================================================================

/// How the buyer's state is known.
///
/// ```json
/// { "stateCode": "24" }
/// { "gstin": "24AAACC1206D1ZM" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum BuyerLocation {
    /// Unregistered buyer; state picked from the address.
    StateCode(String),
    /// Registered buyer.
    Gstin(String),
}

impl BuyerLocation {
    /// Resolves the buyer's state code.
    ///
    /// ## Errors
    /// `InvalidInput` for an empty state code or an invalid GSTIN.
    pub fn state_code(&self) -> CoreResult<String> {
        match self {
            BuyerLocation::StateCode(code) => {
                validate_state_code("buyer state code", code)?;
                Ok(code.trim().to_string())
            }
            BuyerLocation::Gstin(raw) => Ok(Gstin::parse(raw)?.state_code().to_string()),
        }
    }
}

/// A priced document, ready for the form or the PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxQuote {
    pub supply_type: SupplyType,
    pub seller_state_code: String,
    pub buyer_state_code: String,
    /// One per input item, same order.
    pub lines: Vec<TaxBreakdown>,
    pub totals: DocumentTotals,
    pub rate_summary: Vec<RateSummary>,
}

// =============================================================================
// Service
// =============================================================================

/// Prices documents for the configured seller.
#[derive(Debug, Clone)]
pub struct BillingService {
    config: BillingConfig,
    seller_state_code: String,
    calculator: TaxCalculator,
}

impl BillingService {
    /// Creates the service.
    ///
    /// ## Errors
    /// `InvalidConfig` if the seller's state cannot be determined.
    pub fn new(config: BillingConfig) -> BillingResult<Self> {
        let seller_state_code = config.seller.resolved_state_code()?;
        let calculator = config.tax.calculator();

        info!(
            seller = %config.seller.name,
            state_code = %seller_state_code,
            rounding = ?calculator.rounding,
            tax_mode = ?calculator.tax_mode,
            "Billing service ready"
        );

        Ok(BillingService {
            config,
            seller_state_code,
            calculator,
        })
    }

    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    pub fn seller_state_code(&self) -> &str {
        &self.seller_state_code
    }

    pub fn calculator(&self) -> TaxCalculator {
        self.calculator
    }

    /// Supply type for a sale to this buyer.
    pub fn supply_type_for(&self, buyer: &BuyerLocation) -> BillingResult<SupplyType> {
        let buyer_state = buyer.state_code()?;
        Ok(determine_supply_type(&self.seller_state_code, &buyer_state))
    }

    /// Starts an empty draft for this buyer.
    pub fn new_document(&self, kind: DocumentKind, buyer: &BuyerLocation) -> BillingResult<TaxDocument> {
        let buyer_state = buyer.state_code()?;
        Ok(TaxDocument::new(kind, self.seller_state_code.clone(), buyer_state)?)
    }

    /// Prices a list of items for a buyer.
    ///
    /// ## Errors
    /// `Core(InvalidInput | InvalidLine)` if the buyer or any item is rejected.
    pub fn quote(&self, buyer: &BuyerLocation, items: &[LineItem]) -> BillingResult<TaxQuote> {
        let buyer_state = buyer.state_code().map_err(|e| {
            warn!(error = %e, "Buyer location rejected");
            e
        })?;
        self.price(buyer_state, items)
    }

    /// Prices a saved draft.
    pub fn quote_document(&self, document: &TaxDocument) -> BillingResult<TaxQuote> {
        if document.seller_state_code != self.seller_state_code {
            debug!(
                document_seller = %document.seller_state_code,
                configured_seller = %self.seller_state_code,
                "Document seller differs from configured seller"
            );
        }

        let supply_type = document.supply_type();
        let lines = document.breakdowns(&self.calculator).map_err(|e| {
            warn!(error = %e, "Document rejected");
            e
        })?;

        self.assemble(
            supply_type,
            document.seller_state_code.clone(),
            document.buyer_state_code.clone(),
            lines,
        )
    }

    fn price(&self, buyer_state_code: String, items: &[LineItem]) -> BillingResult<TaxQuote> {
        let supply_type = determine_supply_type(&self.seller_state_code, &buyer_state_code);

        let lines = self.calculator.breakdowns(items, supply_type).map_err(|e| {
            warn!(error = %e, "Quote rejected");
            e
        })?;

        self.assemble(supply_type, self.seller_state_code.clone(), buyer_state_code, lines)
    }

    fn assemble(
        &self,
        supply_type: SupplyType,
        seller_state_code: String,
        buyer_state_code: String,
        lines: Vec<TaxBreakdown>,
    ) -> BillingResult<TaxQuote> {
        let (totals, rate_summary) = self.summarize(&lines).map_err(|e| {
            warn!(error = %e, line_count = lines.len(), "Quote totals rejected");
            e
        })?;

        debug!(
            %supply_type,
            line_count = lines.len(),
            grand_total = %totals.grand_total,
            round_off = %totals.round_off,
            "Quote computed"
        );

        Ok(TaxQuote {
            supply_type,
            seller_state_code,
            buyer_state_code,
            lines,
            totals,
            rate_summary,
        })
    }

    fn summarize(&self, lines: &[TaxBreakdown]) -> CoreResult<(DocumentTotals, Vec<RateSummary>)> {
        let totals = self.calculator.totals_from_breakdowns(lines)?;
        Ok((totals, summarize_breakdowns(lines)?))
    }
}
