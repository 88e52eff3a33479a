//! Reference genome assemblies

use std::fmt;
use std::str::FromStr;

/// Human reference assembly a chain file lifts over from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reference {
    GRCh37,
    GRCh38,
}

impl Reference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reference::GRCh37 => "GRCh37",
            Reference::GRCh38 => "GRCh38",
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reference {
    type Err = String;

    /// Accepts GRC and UCSC names, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grch37" | "hg19" => Ok(Reference::GRCh37),
            "grch38" | "hg38" => Ok(Reference::GRCh38),
            _ => Err(format!("Unknown reference '{}', expected GRCh37 or GRCh38", s)),
        }
    }
}
