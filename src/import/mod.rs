//! Import pipelines
//!
//! Each pipeline reads one source file record by record, filters and
//! normalizes the records, and hands the survivors to a [`Store`] through a
//! [`BatchWriter`](crate::core::batch::BatchWriter).
//!
//! [`Store`]: crate::store::Store

pub mod alleles;
pub mod liftover;
pub mod variants;

pub use alleles::{import_alleles, import_allele_records, AlleleFrequencyExtractor};
pub use liftover::import_chain_file;
pub use variants::{import_variant_records, import_variants, VariantNormalizer};

use crate::core::batch::{FlushStats, DEFAULT_BATCH_SIZE};
use crate::core::error::{ImportError, Result};
use crate::core::io::Input;
use log::{debug, info};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Default minimum overall allele frequency (0.1%, 1 in 1000)
pub const DEFAULT_MINIMUM_FREQUENCY: f64 = 0.001;

/// Settings shared by the import pipelines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportOptions {
    /// Records per store call
    pub batch_size: usize,
    /// Minimum overall allele frequency for frequency records
    pub minimum_frequency: f64,
    /// Draw a progress bar over the input bytes
    pub show_progress: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            minimum_frequency: DEFAULT_MINIMUM_FREQUENCY,
            show_progress: false,
        }
    }
}

/// Why a source record produced no output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DropReason {
    /// dbSNP record without the COMMON flag
    NotCommon,
    /// Multi-nucleotide variant
    MultiNucleotide,
    /// Contig outside the canonical assembly
    UnknownChromosome,
    /// Y-chromosome copy of a pseudo-autosomal locus
    PseudoAutosomalY,
    /// FILTER other than PASS
    NotPassing,
    /// No usable rsID
    NoIdentifier,
    /// A required INFO field is absent
    MissingField,
    /// Overall frequency under the configured minimum
    BelowMinimumFrequency,
    /// Not an SNV, insertion or deletion
    UnsupportedType,
    /// Zero or several ALT alleles
    NotBiallelic,
    /// Overall frequency is NaN or infinite
    InvalidFrequency,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DropReason::NotCommon => "not common",
            DropReason::MultiNucleotide => "multi-nucleotide",
            DropReason::UnknownChromosome => "unknown chromosome",
            DropReason::PseudoAutosomalY => "pseudo-autosomal Y copy",
            DropReason::NotPassing => "not PASS",
            DropReason::NoIdentifier => "no rsID",
            DropReason::MissingField => "missing field",
            DropReason::BelowMinimumFrequency => "below minimum frequency",
            DropReason::UnsupportedType => "unsupported variant type",
            DropReason::NotBiallelic => "not biallelic",
            DropReason::InvalidFrequency => "invalid frequency",
        };
        f.write_str(text)
    }
}

/// Result of evaluating one source record
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Keep(T),
    Drop(DropReason),
}

/// Counters for one import run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    /// Source records read
    pub records: usize,
    /// Source records that produced output
    pub kept: usize,
    /// Rows handed to the store
    pub stored: usize,
    /// Store calls made
    pub batches: usize,
    /// Dropped source records by reason
    pub dropped: BTreeMap<DropReason, usize>,
}

impl ImportStats {
    pub(crate) fn record_drop(&mut self, reason: DropReason) {
        *self.dropped.entry(reason).or_insert(0) += 1;
    }

    /// Records dropped for `reason`
    pub fn dropped_for(&self, reason: DropReason) -> usize {
        self.dropped.get(&reason).copied().unwrap_or(0)
    }

    /// Records dropped for any reason
    pub fn total_dropped(&self) -> usize {
        self.dropped.values().sum()
    }

    pub(crate) fn record_flush(&mut self, flushed: FlushStats) {
        self.stored = flushed.records;
        self.batches = flushed.batches;
    }

    pub(crate) fn log_summary(&self, kind: &str) {
        info!(
            "Read {} records, kept {}, stored {} {} in {} batches",
            self.records, self.kept, self.stored, kind, self.batches
        );
        for (reason, count) in &self.dropped {
            debug!("  dropped ({}): {}", reason, count);
        }
    }
}

/// Open a source file, attaching its path to any failure
pub(crate) fn open_input(path: &Path, show_progress: bool) -> Result<Input> {
    Input::open(path, show_progress).map_err(|source| ImportError::Open {
        path: path.to_path_buf(),
        source,
    })
}
