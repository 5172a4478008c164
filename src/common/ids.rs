//! Validated PubMed (PMID) and PubMed Central (PMCID) identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PmcError, Result};

/// Parse a strictly numeric, non-zero identifier body
fn parse_positive(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok().filter(|value| *value > 0)
}

/// A validated PubMed ID
///
/// # Examples
///
/// ```
/// use pmc_markdown::common::PubMedId;
///
/// let pmid = PubMedId::parse("  31978945 ").unwrap();
/// assert_eq!(pmid.as_u32(), 31978945);
/// assert_eq!(pmid.to_string(), "31978945");
///
/// assert!(PubMedId::parse("abc").is_err());
/// assert!(PubMedId::parse("0").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PubMedId {
    value: u32,
}

impl PubMedId {
    /// Parse a PMID, trimming surrounding whitespace
    pub fn parse(s: &str) -> Result<Self> {
        parse_positive(s.trim())
            .map(|value| Self { value })
            .ok_or_else(|| PmcError::InvalidPmid {
                pmid: s.to_string(),
            })
    }

    pub fn as_u32(&self) -> u32 {
        self.value
    }
}

impl fmt::Display for PubMedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for PubMedId {
    type Err = PmcError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A validated PubMed Central ID, always displayed with its `PMC` prefix
///
/// # Examples
///
/// ```
/// use pmc_markdown::common::PmcId;
///
/// assert_eq!(PmcId::parse("PMC7906746").unwrap().to_string(), "PMC7906746");
/// assert_eq!(PmcId::parse("pmc7906746").unwrap().to_string(), "PMC7906746");
/// assert_eq!(PmcId::parse("7906746").unwrap().to_string(), "PMC7906746");
///
/// assert!(PmcId::parse("PMC").is_err());
/// assert!(PmcId::parse("PMC12a").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PmcId {
    value: u32,
}

impl PmcId {
    /// Parse a PMCID with or without the (case-insensitive) `PMC` prefix
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = match trimmed.get(..3) {
            Some(prefix) if prefix.eq_ignore_ascii_case("PMC") => &trimmed[3..],
            _ => trimmed,
        };

        parse_positive(digits)
            .map(|value| Self { value })
            .ok_or_else(|| PmcError::InvalidPmcid {
                pmcid: s.to_string(),
            })
    }

    /// Numeric part without the prefix
    pub fn numeric_part(&self) -> u32 {
        self.value
    }
}

impl fmt::Display for PmcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PMC{}", self.value)
    }
}

impl FromStr for PmcId {
    type Err = PmcError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
