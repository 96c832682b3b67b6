//! # Domain Types
//!
//! Types that flow between the invoice/order forms, the tax calculator and
//! the PDF export.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUT (from forms)              OUTPUT (to display / PDF)              │
//! │  ┌─────────────────┐             ┌─────────────────┐                   │
//! │  │    LineItem     │ ──────────► │  TaxBreakdown   │  one per line     │
//! │  │  quantity       │             │  taxable_value  │                   │
//! │  │  unit_price     │             │  cgst/sgst/igst │                   │
//! │  │  gst_rate_%     │             │  line_total     │                   │
//! │  │  dimensions?    │             └────────┬────────┘                   │
//! │  └─────────────────┘                      │ Σ                          │
//! │  ┌─────────────────┐             ┌────────▼────────┐                   │
//! │  │PartyLocationPair│ ─► Supply   │ DocumentTotals  │  one per document │
//! │  │ seller / buyer  │    Type     │ round_off       │                   │
//! │  └─────────────────┘             │ grand_total     │                   │
//! │                                  └─────────────────┘                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is an ephemeral value: recomputed from current form
//! state, never persisted, no identity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// GST Rate
// =============================================================================

/// A GST slab.
///
/// Serialized as the plain percentage (`18`), which is what the dashboard's
/// rate dropdown sends. Anything outside the slab set fails to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum GstRate {
    Zero,
    Five,
    Twelve,
    Eighteen,
    TwentyEight,
}

impl GstRate {
    /// All slabs, ascending.
    pub const ALL: [GstRate; 5] = [
        GstRate::Zero,
        GstRate::Five,
        GstRate::Twelve,
        GstRate::Eighteen,
        GstRate::TwentyEight,
    ];

    /// Whole-number percentage.
    pub const fn percent(&self) -> u32 {
        match self {
            GstRate::Zero => 0,
            GstRate::Five => 5,
            GstRate::Twelve => 12,
            GstRate::Eighteen => 18,
            GstRate::TwentyEight => 28,
        }
    }

    /// Full rate in basis points (18% = 1800).
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.percent() * 100
    }

    /// Rate of each intra-state half (CGST or SGST) in basis points.
    ///
    /// Every slab percentage is a whole number, so halves are exact in bps
    /// (5% → 250 bps each).
    #[inline]
    pub const fn half_bps(&self) -> u32 {
        self.bps() / 2
    }

    /// Looks up a slab by percentage.
    pub fn from_percent(percent: u32) -> Option<Self> {
        GstRate::ALL.into_iter().find(|r| r.percent() == percent)
    }
}

impl TryFrom<u32> for GstRate {
    type Error = ValidationError;

    fn try_from(percent: u32) -> Result<Self, Self::Error> {
        GstRate::from_percent(percent).ok_or_else(|| ValidationError::NotAllowed {
            field: "GST rate".to_string(),
            allowed: GstRate::ALL
                .iter()
                .map(|r| format!("{}%", r.percent()))
                .collect(),
        })
    }
}

impl From<GstRate> for u32 {
    fn from(rate: GstRate) -> u32 {
        rate.percent()
    }
}

impl fmt::Display for GstRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

// =============================================================================
// Supply Type
// =============================================================================

/// Whether a sale crosses a state border.
///
/// ```text
/// seller 27 (Maharashtra) → buyer 27   INTRA_STATE   CGST + SGST
/// seller 27 (Maharashtra) → buyer 24   INTER_STATE   IGST
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplyType {
    /// Same state: tax split into CGST and SGST halves.
    IntraState,
    /// Different states: whole tax is IGST.
    InterState,
}

impl SupplyType {
    /// Returns true for IGST documents.
    #[inline]
    pub const fn is_inter_state(&self) -> bool {
        matches!(self, SupplyType::InterState)
    }
}

impl fmt::Display for SupplyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupplyType::IntraState => write!(f, "INTRA_STATE"),
            SupplyType::InterState => write!(f, "INTER_STATE"),
        }
    }
}

// =============================================================================
// Party Locations
// =============================================================================

/// Seller and buyer state codes for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PartyLocationPair {
    pub seller_state_code: String,
    pub buyer_state_code: String,
}

impl PartyLocationPair {
    pub fn new(seller_state_code: impl Into<String>, buyer_state_code: impl Into<String>) -> Self {
        PartyLocationPair {
            seller_state_code: seller_state_code.into(),
            buyer_state_code: buyer_state_code.into(),
        }
    }

    /// Builds a pair after checking neither state code is blank.
    ///
    /// ```rust
    /// use marbleops_core::PartyLocationPair;
    ///
    /// assert!(PartyLocationPair::try_new("27", "24").is_ok());
    /// assert!(PartyLocationPair::try_new("27", "  ").is_err());
    /// ```
    pub fn try_new(
        seller_state_code: impl Into<String>,
        buyer_state_code: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let pair = PartyLocationPair::new(seller_state_code, buyer_state_code);
        crate::validation::validate_state_code("seller state code", &pair.seller_state_code)?;
        crate::validation::validate_state_code("buyer state code", &pair.buyer_state_code)?;
        Ok(pair)
    }

    /// Classifies the pair. See [`crate::tax::determine_supply_type`]; a pair
    /// from [`new`](Self::new) is not checked for blank codes.
    pub fn supply_type(&self) -> SupplyType {
        crate::tax::determine_supply_type(&self.seller_state_code, &self.buyer_state_code)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// Slab dimensions for area-priced stock (price per sq ft / sq m).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Dimensions {
    #[ts(as = "String")]
    pub length: Decimal,
    #[ts(as = "String")]
    pub width: Decimal,
}

impl Dimensions {
    pub fn new(length: Decimal, width: Decimal) -> Self {
        Dimensions { length, width }
    }

    /// Area of one piece. `None` on decimal overflow.
    pub fn area(&self) -> Option<Decimal> {
        self.length.checked_mul(self.width)
    }
}

/// One row of an invoice or order form, as typed in.
///
/// `gst_rate_percent` is deliberately the raw number from the form; it is
/// checked against the slab set when the line is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Free text shown on the document ("Italian Statuario 18mm").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,

    /// HSN code for the tax summary (e.g. "6802").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub hsn_code: Option<String>,

    /// Number of pieces (or units, if not area-priced). Must be > 0.
    #[ts(as = "String")]
    pub quantity: Decimal,

    /// Price per unit, or per unit of area when `dimensions` is set.
    pub unit_price: Money,

    /// GST percentage; one of 0, 5, 12, 18, 28.
    pub gst_rate_percent: u32,

    /// When present, each piece is priced by area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub dimensions: Option<Dimensions>,
}

impl LineItem {
    /// Creates a count-priced line.
    pub fn new(quantity: Decimal, unit_price: Money, gst_rate_percent: u32) -> Self {
        LineItem {
            description: None,
            hsn_code: None,
            quantity,
            unit_price,
            gst_rate_percent,
            dimensions: None,
        }
    }

    /// Prices each piece by `length × width`.
    pub fn with_dimensions(mut self, length: Decimal, width: Decimal) -> Self {
        self.dimensions = Some(Dimensions::new(length, width));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_hsn_code(mut self, hsn_code: impl Into<String>) -> Self {
        self.hsn_code = Some(hsn_code.into());
        self
    }

    /// The multiplier applied to `unit_price`: quantity, or area × quantity.
    ///
    /// `None` on decimal overflow.
    pub fn billable_quantity(&self) -> Option<Decimal> {
        match self.dimensions {
            Some(dims) => dims.area()?.checked_mul(self.quantity),
            None => Some(self.quantity),
        }
    }
}

// =============================================================================
// Tax Breakdown
// =============================================================================

/// Computed tax for one line.
///
/// ## Invariants
/// - `IntraState`: `igst == 0`, `cgst == sgst`
/// - `InterState`: `cgst == sgst == 0`
/// - `total_tax == cgst + sgst + igst`
/// - `line_total == taxable_value + total_tax`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    #[ts(as = "u32")]
    pub gst_rate: GstRate,
    pub supply_type: SupplyType,
    pub taxable_value: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub igst: Money,
    pub total_tax: Money,
    pub line_total: Money,
}

// =============================================================================
// Document Totals
// =============================================================================

/// Aggregated totals for an invoice or order.
///
/// ## Invariant
/// `grand_total - round_off == subtotal + total_cgst + total_sgst + total_igst`
/// holds exactly (integer paise).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    pub subtotal: Money,
    pub total_cgst: Money,
    pub total_sgst: Money,
    pub total_igst: Money,
    /// Signed; negative when the total was rounded down.
    pub round_off: Money,
    pub grand_total: Money,
}

impl DocumentTotals {
    /// CGST + SGST + IGST.
    pub fn total_tax(&self) -> Money {
        self.total_cgst + self.total_sgst + self.total_igst
    }

    /// Subtotal plus tax, before round-off.
    pub fn unrounded_total(&self) -> Money {
        self.subtotal + self.total_tax()
    }
}

/// Per-slab rollup for the tax summary table on a GST invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RateSummary {
    #[ts(as = "u32")]
    pub gst_rate: GstRate,
    pub taxable_value: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub igst: Money,
}

impl RateSummary {
    pub fn total_tax(&self) -> Money {
        self.cgst + self.sgst + self.igst
    }
}

// =============================================================================
// Calculation Settings
// =============================================================================

/// Whether unit prices already include GST.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    /// Price + GST shown separately. What the invoice forms use.
    #[default]
    Exclusive,
    /// Price includes GST (counter sales); taxable value is backed out.
    Inclusive,
}

/// Granularity of the document grand total.
///
/// `billing.toml` and `MARBLEOPS_ROUNDING` accept the same words: `rupee`
/// (or `integer`), `paisa` (or `paise`, `none`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// Nearest whole rupee; the difference is shown as "Round Off".
    #[default]
    #[serde(alias = "integer")]
    Rupee,
    /// Keep paise; round-off is always zero.
    #[serde(alias = "paise", alias = "none")]
    Paisa,
}

impl FromStr for TaxMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exclusive" => Ok(TaxMode::Exclusive),
            "inclusive" => Ok(TaxMode::Inclusive),
            _ => Err(ValidationError::NotAllowed {
                field: "tax mode".to_string(),
                allowed: vec!["exclusive".to_string(), "inclusive".to_string()],
            }),
        }
    }
}

impl FromStr for RoundingPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rupee" | "integer" => Ok(RoundingPolicy::Rupee),
            "paisa" | "paise" | "none" => Ok(RoundingPolicy::Paisa),
            _ => Err(ValidationError::NotAllowed {
                field: "rounding".to_string(),
                allowed: vec!["rupee".to_string(), "paisa".to_string()],
            }),
        }
    }
}

// =============================================================================
// Document Kind
// =============================================================================

/// Which form a draft belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[default]
    Invoice,
    Order,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_gst_rate_bps() {
        assert_eq!(GstRate::Eighteen.bps(), 1800);
        assert_eq!(GstRate::Eighteen.half_bps(), 900);
        assert_eq!(GstRate::Five.half_bps(), 250);
        assert_eq!(GstRate::Zero.half_bps(), 0);
    }

    #[test]
    fn test_gst_rate_from_percent() {
        assert_eq!(GstRate::try_from(28).unwrap(), GstRate::TwentyEight);
        assert!(GstRate::try_from(3).is_err());
        assert!(GstRate::try_from(100).is_err());
    }

    #[test]
    fn test_gst_rate_serde_rejects_unknown_slab() {
        let rate: GstRate = serde_json::from_str("12").unwrap();
        assert_eq!(rate, GstRate::Twelve);
        assert_eq!(serde_json::to_string(&rate).unwrap(), "12");
        assert!(serde_json::from_str::<GstRate>("15").is_err());
    }

    #[test]
    fn test_supply_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&SupplyType::InterState).unwrap(),
            "\"INTER_STATE\""
        );
        assert_eq!(SupplyType::IntraState.to_string(), "INTRA_STATE");
    }

    #[test]
    fn test_line_item_from_dashboard_json() {
        let json = r#"{
            "description": "Statuario slab",
            "quantity": "2",
            "unitPrice": 45000,
            "gstRatePercent": 18,
            "dimensions": { "length": "8.5", "width": "5" }
        }"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.quantity, dec!(2));
        assert_eq!(item.unit_price, Money::from_rupees(450));
        assert_eq!(item.billable_quantity(), Some(dec!(85.0)));
        assert_eq!(item.hsn_code, None);
    }

    #[test]
    fn test_billable_quantity() {
        let plain = LineItem::new(dec!(3), Money::from_rupees(10), 5);
        assert_eq!(plain.billable_quantity(), Some(dec!(3)));

        let slab = plain.with_dimensions(dec!(5), dec!(4));
        assert_eq!(slab.billable_quantity(), Some(dec!(60)));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Rupee".parse::<RoundingPolicy>().unwrap(), RoundingPolicy::Rupee);
        assert_eq!("paise".parse::<RoundingPolicy>().unwrap(), RoundingPolicy::Paisa);
        assert!("cents".parse::<RoundingPolicy>().is_err());
        assert_eq!("inclusive".parse::<TaxMode>().unwrap(), TaxMode::Inclusive);
        assert!("both".parse::<TaxMode>().is_err());
    }

    #[test]
    fn test_policy_words_match_serde() {
        for (word, policy) in [
            ("rupee", RoundingPolicy::Rupee),
            ("integer", RoundingPolicy::Rupee),
            ("paisa", RoundingPolicy::Paisa),
            ("paise", RoundingPolicy::Paisa),
            ("none", RoundingPolicy::Paisa),
        ] {
            assert_eq!(word.parse::<RoundingPolicy>().unwrap(), policy);
            let from_json: RoundingPolicy = serde_json::from_str(&format!("\"{}\"", word)).unwrap();
            assert_eq!(from_json, policy, "{}", word);
        }
        assert_eq!(serde_json::to_string(&RoundingPolicy::Paisa).unwrap(), "\"paisa\"");
    }

    #[test]
    fn test_line_item_typescript_optional_fields() {
        let decl = LineItem::decl();
        assert!(decl.contains("description?: string"), "{}", decl);
        assert!(decl.contains("hsnCode?: string"), "{}", decl);
        assert!(decl.contains("dimensions?: Dimensions"), "{}", decl);
        assert!(!decl.contains("null"), "{}", decl);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(TaxMode::default(), TaxMode::Exclusive);
        assert_eq!(RoundingPolicy::default(), RoundingPolicy::Rupee);
        assert_eq!(DocumentKind::default(), DocumentKind::Invoice);
        assert_eq!(DocumentTotals::default().grand_total, Money::zero());
    }
}
