//! # GST Registry Helpers
//!
//! State codes and GSTIN parsing.
//!
//! ## GSTIN Layout
//! ```text
//!   2 7 A A P F U 0 9 3 9 F 1 Z V
//!   └┬┘ └────────┬────────┘ │ │ │
//!    │           │          │ │ └── check character (mod 36)
//!    │           │          │ └──── always 'Z'
//!    │           │          └────── registration number within the PAN
//!    │           └───────────────── PAN of the business
//!    └───────────────────────────── state code (27 = Maharashtra)
//! ```
//!
//! The state code prefix is what the dashboard uses to decide CGST+SGST vs
//! IGST when both parties are registered.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreResult, ValidationError};
use crate::types::PartyLocationPair;

const GSTIN_LEN: usize = 15;
const CHECKSUM_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// GST state and union-territory codes.
///
/// Includes the retired codes 25 and 28; registrations issued under them are
/// still in circulation.
pub const STATE_CODES: &[(&str, &str)] = &[
    ("01", "Jammu and Kashmir"),
    ("02", "Himachal Pradesh"),
    ("03", "Punjab"),
    ("04", "Chandigarh"),
    ("05", "Uttarakhand"),
    ("06", "Haryana"),
    ("07", "Delhi"),
    ("08", "Rajasthan"),
    ("09", "Uttar Pradesh"),
    ("10", "Bihar"),
    ("11", "Sikkim"),
    ("12", "Arunachal Pradesh"),
    ("13", "Nagaland"),
    ("14", "Manipur"),
    ("15", "Mizoram"),
    ("16", "Tripura"),
    ("17", "Meghalaya"),
    ("18", "Assam"),
    ("19", "West Bengal"),
    ("20", "Jharkhand"),
    ("21", "Odisha"),
    ("22", "Chhattisgarh"),
    ("23", "Madhya Pradesh"),
    ("24", "Gujarat"),
    ("25", "Daman and Diu"),
    ("26", "Dadra and Nagar Haveli and Daman and Diu"),
    ("27", "Maharashtra"),
    ("28", "Andhra Pradesh (before division)"),
    ("29", "Karnataka"),
    ("30", "Goa"),
    ("31", "Lakshadweep"),
    ("32", "Kerala"),
    ("33", "Tamil Nadu"),
    ("34", "Puducherry"),
    ("35", "Andaman and Nicobar Islands"),
    ("36", "Telangana"),
    ("37", "Andhra Pradesh"),
    ("38", "Ladakh"),
    ("96", "Foreign Country"),
    ("97", "Other Territory"),
];

/// Returns the state name for a GST state code, if known.
///
/// ```rust
/// use marbleops_core::gst::state_name;
///
/// assert_eq!(state_name("27"), Some("Maharashtra"));
/// assert_eq!(state_name("8"), Some("Rajasthan"));
/// assert_eq!(state_name("99"), None);
/// ```
pub fn state_name(code: &str) -> Option<&'static str> {
    let code = normalize_state_code(code);
    STATE_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Canonical form for comparison: trimmed, upper-case, single digits padded.
///
/// `" 7 "` and `"07"` are the same state; non-numeric codes ("MH") are only
/// trimmed and upper-cased.
pub fn normalize_state_code(code: &str) -> String {
    let code = code.trim().to_ascii_uppercase();
    if code.len() == 1 && code.as_bytes()[0].is_ascii_digit() {
        format!("0{}", code)
    } else {
        code
    }
}

// =============================================================================
// GSTIN
// =============================================================================

/// A syntactically valid GSTIN (checksum verified).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Gstin(String);

impl Gstin {
    /// Parses and validates a GSTIN.
    ///
    /// Accepts surrounding whitespace and lower case.
    ///
    /// ## Example
    /// ```rust
    /// use marbleops_core::gst::Gstin;
    ///
    /// let gstin = Gstin::parse("27aapfu0939f1zv").unwrap();
    /// assert_eq!(gstin.state_code(), "27");
    /// assert_eq!(gstin.pan(), "AAPFU0939F");
    ///
    /// assert!(Gstin::parse("27AAPFU0939F1ZA").is_err()); // bad check char
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim().to_ascii_uppercase();

        if value.is_empty() {
            return Err(ValidationError::Required {
                field: "GSTIN".to_string(),
            });
        }

        if value.len() != GSTIN_LEN || !value.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(invalid_gstin("must be 15 letters and digits"));
        }

        let bytes = value.as_bytes();

        if state_name(&value[0..2]).is_none() {
            return Err(invalid_gstin("unknown state code"));
        }

        let pan = &bytes[2..12];
        let pan_ok = pan[..5].iter().all(u8::is_ascii_alphabetic)
            && pan[5..9].iter().all(u8::is_ascii_digit)
            && pan[9].is_ascii_alphabetic();
        if !pan_ok {
            return Err(invalid_gstin("characters 3-12 must be a PAN"));
        }

        if bytes[13] != b'Z' {
            return Err(invalid_gstin("character 14 must be 'Z'"));
        }

        if checksum_char(&bytes[..14]) != bytes[14] {
            return Err(invalid_gstin("check character does not match"));
        }

        Ok(Gstin(value))
    }

    /// Two-digit state code prefix.
    pub fn state_code(&self) -> &str {
        &self.0[0..2]
    }

    /// The embedded PAN.
    pub fn pan(&self) -> &str {
        &self.0[2..12]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Mod-36 check character over the first 14 characters.
///
/// Odd positions (1-based) weigh 1, even positions weigh 2; each product is
/// folded as `p / 36 + p % 36` before summing.
fn checksum_char(body: &[u8]) -> u8 {
    let sum: u32 = body
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let value = CHECKSUM_ALPHABET
                .iter()
                .position(|c| c == b)
                .unwrap_or(0) as u32;
            let product = value * if i % 2 == 0 { 1 } else { 2 };
            product / 36 + product % 36
        })
        .sum();
    CHECKSUM_ALPHABET[((36 - sum % 36) % 36) as usize]
}

fn invalid_gstin(reason: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: "GSTIN".to_string(),
        reason: reason.to_string(),
    }
}

impl FromStr for Gstin {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gstin::parse(s)
    }
}

impl TryFrom<String> for Gstin {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Gstin::parse(&value)
    }
}

impl From<Gstin> for String {
    fn from(gstin: Gstin) -> String {
        gstin.0
    }
}

impl fmt::Display for Gstin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartyLocationPair {
    /// Builds the pair from two GSTINs (both parties registered).
    ///
    /// ```rust
    /// use marbleops_core::{PartyLocationPair, SupplyType};
    ///
    /// let pair = PartyLocationPair::from_gstins("27AAPFU0939F1ZV", "24AAACC1206D1ZM").unwrap();
    /// assert_eq!(pair.supply_type(), SupplyType::InterState);
    /// ```
    pub fn from_gstins(seller: &str, buyer: &str) -> CoreResult<Self> {
        let seller = Gstin::parse(seller)?;
        let buyer = Gstin::parse(buyer)?;
        Ok(PartyLocationPair::new(seller.state_code(), buyer.state_code()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SupplyType;

    #[test]
    fn test_valid_gstins() {
        for raw in ["27AAPFU0939F1ZV", "29AAGCB7383J1Z4", "24AAACC1206D1ZM"] {
            let gstin = Gstin::parse(raw).unwrap();
            assert_eq!(gstin.as_str(), raw);
        }
    }

    #[test]
    fn test_retired_state_codes_still_parse() {
        assert_eq!(state_name("25"), Some("Daman and Diu"));
        assert!(state_name("28").is_some());

        let daman = Gstin::parse("25AAPFU0939F1ZZ").unwrap();
        assert_eq!(daman.state_code(), "25");
        let andhra = Gstin::parse("28AAPFU0939F1ZT").unwrap();
        assert_eq!(andhra.state_code(), "28");

        // Pre-division Andhra and present-day Andhra are different states
        let pair = PartyLocationPair::from_gstins(andhra.as_str(), "37AAPFU0939F1ZU").unwrap();
        assert_eq!(pair.supply_type(), SupplyType::InterState);
    }

    #[test]
    fn test_checksum_mismatch() {
        let err = Gstin::parse("07AAACR5055K1Z8").unwrap_err();
        assert!(err.to_string().contains("check character"));
    }

    #[test]
    fn test_structural_failures() {
        assert!(matches!(
            Gstin::parse("   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(Gstin::parse("27AAPFU0939F1Z").is_err()); // 14 chars
        assert!(Gstin::parse("99AAPFU0939F1ZV").is_err()); // unknown state
        assert!(Gstin::parse("271APFU0939F1ZV").is_err()); // PAN starts with digit
        assert!(Gstin::parse("27AAPFU0939F1YV").is_err()); // no 'Z'
        assert!(Gstin::parse("27AAPFU0939F1Z-").is_err());
    }

    #[test]
    fn test_gstin_serde() {
        let gstin: Gstin = serde_json::from_str("\"29AAGCB7383J1Z4\"").unwrap();
        assert_eq!(gstin.state_code(), "29");
        assert!(serde_json::from_str::<Gstin>("\"29AAGCB7383J1Z5\"").is_err());
    }

    #[test]
    fn test_normalize_state_code() {
        assert_eq!(normalize_state_code(" 7 "), "07");
        assert_eq!(normalize_state_code("27"), "27");
        assert_eq!(normalize_state_code("mh"), "MH");
    }

    #[test]
    fn test_pair_from_gstins() {
        let pair = PartyLocationPair::from_gstins("27AAPFU0939F1ZV", "27AAPFU0939F1ZV").unwrap();
        assert_eq!(pair.supply_type(), SupplyType::IntraState);

        assert!(PartyLocationPair::from_gstins("27AAPFU0939F1ZV", "garbage").is_err());
    }
}
