//! Records handed to the genomic store

use super::AncestryGroup;
use std::fmt;

/// dbSNP variant class tag (`VC` INFO field)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantClass(String);

impl VariantClass {
    /// Multi-nucleotide variant, never stored
    pub const MNV: &'static str = "MNV";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_multi_nucleotide(&self) -> bool {
        self.0 == Self::MNV
    }
}

impl fmt::Display for VariantClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A normalized dbSNP variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Numeric part of the rsID
    pub id: i64,
    /// `1`..`22`, `X`, `Y`, `MT`, `PAR` or `PAR2`
    pub chromosome: String,
    /// 1-based position (X-relative for `PAR`/`PAR2`)
    pub position: i64,
    pub reference: String,
    pub class: VariantClass,
}

/// Frequency of one alternate allele within one ancestry group
#[derive(Debug, Clone, PartialEq)]
pub struct Allele {
    /// Numeric part of the rsID, links to [`Variant::id`]
    pub id: i64,
    pub reference: String,
    pub alternate: String,
    pub ancestry: AncestryGroup,
    pub frequency: f64,
}
