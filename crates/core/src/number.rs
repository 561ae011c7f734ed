//! Document number grammar
//!
//! Numbers come in three shapes, and the shape is what decides whether a
//! number participates in the uniqueness invariant:
//!
//! - **bare** (`000042`): official, sequence-consuming, unique per scope
//!   among non-draft documents;
//! - **draft-tagged** (`000042-DRAFT`, `000042-1722950400123`): placeholder
//!   held by a draft, never competing with bare numbers;
//! - **temporary** (`TEMP-000042-9f3ac1`): transient mid-swap value, never
//!   visible to a caller as a final number. The target base is embedded so
//!   crash repair can tell which bare slot the swap was about.
//!
//! The rendered forms are an external format contract and must stay
//! bit-exact; parsing accepts exactly what rendering produces plus unpadded
//! manual input (`5` parses like `000005`).

use crate::limits::{MAX_BARE_DIGITS, MAX_BARE_VALUE, NUMBER_WIDTH};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Prefix marking a temporary mid-swap number
pub const TEMP_PREFIX: &str = "TEMP-";

/// Tag marking a plain draft placeholder
pub const DRAFT_TAG: &str = "DRAFT";

/// Error when parsing a document number from its string form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberParseError {
    /// Input is empty
    #[error("document number cannot be empty")]
    Empty,
    /// The numeric part is not 1-6 digits
    #[error("invalid bare number {input:?}: expected 1-{max} digits")]
    InvalidBare {
        /// The offending input
        input: String,
        /// Maximum digits allowed
        max: usize,
    },
    /// The part after the dash is neither DRAFT nor a millisecond stamp
    #[error("invalid draft tag {tag:?}")]
    InvalidTag {
        /// The offending tag
        tag: String,
    },
    /// A TEMP- value is missing its base or token
    #[error("malformed temporary number {input:?}")]
    MalformedTemporary {
        /// The offending input
        input: String,
    },
}

/// A sequence-consuming official number
///
/// Stored canonically as its numeric value; rendering zero-pads to
/// [`NUMBER_WIDTH`], so `5` and `000005` are the same bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BareNumber(u32);

impl BareNumber {
    /// First number of every sequence
    pub const FIRST: BareNumber = BareNumber(1);

    /// Create a bare number from its numeric value
    ///
    /// Returns None if the value cannot be rendered within
    /// [`MAX_BARE_DIGITS`] digits (zero is not a valid document number).
    pub fn new(value: u32) -> Option<Self> {
        if value == 0 || value > MAX_BARE_VALUE {
            None
        } else {
            Some(Self(value))
        }
    }

    /// The numeric value
    pub fn value(&self) -> u32 {
        self.0
    }

    /// The next number in the sequence, if the width allows one
    pub fn succ(&self) -> Option<Self> {
        Self::new(self.0 + 1)
    }
}

impl fmt::Display for BareNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = NUMBER_WIDTH)
    }
}

impl FromStr for BareNumber {
    type Err = NumberParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(NumberParseError::Empty);
        }
        if s.len() > MAX_BARE_DIGITS || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NumberParseError::InvalidBare {
                input: s.to_string(),
                max: MAX_BARE_DIGITS,
            });
        }
        // Width check above means the value always fits in u32.
        let value: u32 = s.parse().map_err(|_| NumberParseError::InvalidBare {
            input: s.to_string(),
            max: MAX_BARE_DIGITS,
        })?;
        BareNumber::new(value).ok_or(NumberParseError::InvalidBare {
            input: s.to_string(),
            max: MAX_BARE_DIGITS,
        })
    }
}

/// Tag distinguishing draft placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DraftTag {
    /// The plain `-DRAFT` suffix
    Draft,
    /// Millisecond stamp used when `-DRAFT` is already taken in the scope
    Stamp(i64),
}

impl fmt::Display for DraftTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftTag::Draft => write!(f, "{}", DRAFT_TAG),
            DraftTag::Stamp(millis) => write!(f, "{}", millis),
        }
    }
}

/// A document number in any of its three shapes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentNumber {
    /// Official, uniqueness-constrained number
    Bare(BareNumber),
    /// Placeholder held by a draft document
    DraftTagged {
        /// The bare number the placeholder previews
        base: BareNumber,
        /// Disambiguating tag
        tag: DraftTag,
    },
    /// Transient mid-swap value
    Temporary {
        /// The bare slot the interrupted swap was targeting
        base: BareNumber,
        /// Opaque disambiguator
        token: String,
    },
}

impl DocumentNumber {
    /// Plain `-DRAFT` placeholder for a base
    pub fn draft(base: BareNumber) -> Self {
        DocumentNumber::DraftTagged {
            base,
            tag: DraftTag::Draft,
        }
    }

    /// The bare number this value is, previews, or targets
    pub fn base(&self) -> BareNumber {
        match self {
            DocumentNumber::Bare(n) => *n,
            DocumentNumber::DraftTagged { base, .. } => *base,
            DocumentNumber::Temporary { base, .. } => *base,
        }
    }

    /// Whether this is an official bare number
    pub fn is_bare(&self) -> bool {
        matches!(self, DocumentNumber::Bare(_))
    }

    /// Whether this is a draft placeholder
    pub fn is_draft_tagged(&self) -> bool {
        matches!(self, DocumentNumber::DraftTagged { .. })
    }

    /// Whether this is a transient mid-swap value
    pub fn is_temporary(&self) -> bool {
        matches!(self, DocumentNumber::Temporary { .. })
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentNumber::Bare(n) => write!(f, "{}", n),
            DocumentNumber::DraftTagged { base, tag } => write!(f, "{}-{}", base, tag),
            DocumentNumber::Temporary { base, token } => {
                write!(f, "{}{}-{}", TEMP_PREFIX, base, token)
            }
        }
    }
}

impl FromStr for DocumentNumber {
    type Err = NumberParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(NumberParseError::Empty);
        }
        if let Some(rest) = s.strip_prefix(TEMP_PREFIX) {
            let (base, token) =
                rest.split_once('-')
                    .ok_or_else(|| NumberParseError::MalformedTemporary {
                        input: s.to_string(),
                    })?;
            if token.is_empty() {
                return Err(NumberParseError::MalformedTemporary {
                    input: s.to_string(),
                });
            }
            return Ok(DocumentNumber::Temporary {
                base: base.parse()?,
                token: token.to_string(),
            });
        }
        match s.split_once('-') {
            None => Ok(DocumentNumber::Bare(s.parse()?)),
            Some((base, tag)) => {
                let base = base.parse()?;
                if tag == DRAFT_TAG {
                    Ok(DocumentNumber::DraftTagged {
                        base,
                        tag: DraftTag::Draft,
                    })
                } else if !tag.is_empty() && tag.bytes().all(|b| b.is_ascii_digit()) {
                    let millis = tag.parse().map_err(|_| NumberParseError::InvalidTag {
                        tag: tag.to_string(),
                    })?;
                    Ok(DocumentNumber::DraftTagged {
                        base,
                        tag: DraftTag::Stamp(millis),
                    })
                } else {
                    Err(NumberParseError::InvalidTag {
                        tag: tag.to_string(),
                    })
                }
            }
        }
    }
}

// Numbers cross the platform wire in their rendered string form.
impl Serialize for DocumentNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DocumentNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_renders_zero_padded() {
        let n = BareNumber::new(42).unwrap();
        assert_eq!(n.to_string(), "000042");
    }

    #[test]
    fn bare_parses_unpadded_manual_input() {
        let n: BareNumber = "5".parse().unwrap();
        assert_eq!(n.value(), 5);
        assert_eq!(n.to_string(), "000005");
    }

    #[test]
    fn bare_rejects_zero_and_overflow() {
        assert!(BareNumber::new(0).is_none());
        assert!(BareNumber::new(1_000_000).is_none());
        assert!(BareNumber::new(999_999).is_some());
    }

    #[test]
    fn bare_rejects_seven_digits_and_non_digits() {
        assert!("1234567".parse::<BareNumber>().is_err());
        assert!("12a4".parse::<BareNumber>().is_err());
        assert!("".parse::<BareNumber>().is_err());
        assert!("-12".parse::<BareNumber>().is_err());
    }

    #[test]
    fn succ_stops_at_width_limit() {
        let max = BareNumber::new(999_999).unwrap();
        assert!(max.succ().is_none());
        assert_eq!(BareNumber::FIRST.succ().unwrap().value(), 2);
    }

    #[test]
    fn draft_tagged_renders_with_tag() {
        let base = BareNumber::new(5).unwrap();
        assert_eq!(DocumentNumber::draft(base).to_string(), "000005-DRAFT");
        let stamped = DocumentNumber::DraftTagged {
            base,
            tag: DraftTag::Stamp(1722950400123),
        };
        assert_eq!(stamped.to_string(), "000005-1722950400123");
    }

    #[test]
    fn temporary_renders_with_prefix_and_base() {
        let n = DocumentNumber::Temporary {
            base: BareNumber::new(7).unwrap(),
            token: "9f3ac1".to_string(),
        };
        assert_eq!(n.to_string(), "TEMP-000007-9f3ac1");
    }

    #[test]
    fn parse_recognizes_all_three_shapes() {
        assert!(matches!(
            "000042".parse::<DocumentNumber>().unwrap(),
            DocumentNumber::Bare(_)
        ));
        assert!(matches!(
            "000042-DRAFT".parse::<DocumentNumber>().unwrap(),
            DocumentNumber::DraftTagged {
                tag: DraftTag::Draft,
                ..
            }
        ));
        assert!(matches!(
            "000042-1722950400123".parse::<DocumentNumber>().unwrap(),
            DocumentNumber::DraftTagged {
                tag: DraftTag::Stamp(1722950400123),
                ..
            }
        ));
        let temp = "TEMP-000042-abc123".parse::<DocumentNumber>().unwrap();
        assert!(temp.is_temporary());
        assert_eq!(temp.base().value(), 42);
    }

    #[test]
    fn parse_rejects_bad_tags_and_malformed_temp() {
        assert!("000042-SKETCH".parse::<DocumentNumber>().is_err());
        assert!("000042-".parse::<DocumentNumber>().is_err());
        assert!("TEMP-000042".parse::<DocumentNumber>().is_err());
        assert!("TEMP-000042-".parse::<DocumentNumber>().is_err());
        assert!("TEMP-".parse::<DocumentNumber>().is_err());
    }

    #[test]
    fn serde_uses_rendered_form() {
        let n = DocumentNumber::draft(BareNumber::new(9).unwrap());
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, "\"000009-DRAFT\"");
        let back: DocumentNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, n);
    }
}
