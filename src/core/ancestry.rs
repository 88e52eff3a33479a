//! Ancestry groups reported by gnomAD
//!
//! The two orderings below are fixed by how gnomAD generates its VCFs. The
//! mitochondrial release stores per-group frequencies as unlabelled
//! positional arrays, so [`MITOCHONDRIAL_ORDER`] must match upstream exactly.

use std::fmt;
use std::str::FromStr;

/// Population stratum with its own allele frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AncestryGroup {
    All,
    African,
    Amish,
    American,
    Ashkenazi,
    EastAsian,
    Finnish,
    MiddleEastern,
    European,
    SouthAsian,
    Other,
}

/// Groups stored for every allele, in emission order
pub const NUCLEAR_ORDER: [AncestryGroup; 10] = [
    AncestryGroup::All,
    AncestryGroup::African,
    AncestryGroup::Amish,
    AncestryGroup::American,
    AncestryGroup::Ashkenazi,
    AncestryGroup::EastAsian,
    AncestryGroup::Finnish,
    AncestryGroup::MiddleEastern,
    AncestryGroup::European,
    AncestryGroup::SouthAsian,
];

/// Position of each group in gnomAD's mitochondrial `pop_AF_*` arrays
pub const MITOCHONDRIAL_ORDER: [AncestryGroup; 10] = [
    AncestryGroup::African,
    AncestryGroup::Amish,
    AncestryGroup::American,
    AncestryGroup::Ashkenazi,
    AncestryGroup::EastAsian,
    AncestryGroup::Finnish,
    AncestryGroup::European,
    AncestryGroup::Other,
    AncestryGroup::SouthAsian,
    AncestryGroup::MiddleEastern,
];

impl AncestryGroup {
    /// gnomAD population code, also the storage key
    pub fn code(&self) -> &'static str {
        match self {
            AncestryGroup::All => "all",
            AncestryGroup::African => "afr",
            AncestryGroup::Amish => "ami",
            AncestryGroup::American => "amr",
            AncestryGroup::Ashkenazi => "asj",
            AncestryGroup::EastAsian => "eas",
            AncestryGroup::Finnish => "fin",
            AncestryGroup::MiddleEastern => "mid",
            AncestryGroup::European => "nfe",
            AncestryGroup::SouthAsian => "sas",
            AncestryGroup::Other => "oth",
        }
    }

    /// INFO key holding this group's frequency in nuclear gnomAD records
    ///
    /// `All` has no per-group key; it reads the overall `AF` field.
    pub fn frequency_key(&self) -> String {
        format!("AF_{}", self.code())
    }
}

impl fmt::Display for AncestryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AncestryGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        NUCLEAR_ORDER
            .iter()
            .chain(std::iter::once(&AncestryGroup::Other))
            .find(|group| group.code() == lower)
            .copied()
            .ok_or_else(|| format!("Unknown ancestry group: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_key() {
        assert_eq!(AncestryGroup::African.frequency_key(), "AF_afr");
        assert_eq!(AncestryGroup::European.frequency_key(), "AF_nfe");
        assert_eq!(AncestryGroup::MiddleEastern.frequency_key(), "AF_mid");
    }

    #[test]
    fn test_orderings_differ_in_tail() {
        assert_eq!(NUCLEAR_ORDER[0], AncestryGroup::All);
        assert_eq!(MITOCHONDRIAL_ORDER[0], AncestryGroup::African);
        assert_eq!(MITOCHONDRIAL_ORDER[6], AncestryGroup::European);
        assert_eq!(MITOCHONDRIAL_ORDER[7], AncestryGroup::Other);
        assert_eq!(MITOCHONDRIAL_ORDER[9], AncestryGroup::MiddleEastern);
        assert!(!NUCLEAR_ORDER.contains(&AncestryGroup::Other));
    }

    #[test]
    fn test_code_round_trip() {
        for group in NUCLEAR_ORDER.iter().chain(MITOCHONDRIAL_ORDER.iter()) {
            assert_eq!(group.code().parse::<AncestryGroup>(), Ok(*group));
        }
        assert!("xyz".parse::<AncestryGroup>().is_err());
    }
}
