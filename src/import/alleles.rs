//! gnomAD allele frequency import
//!
//! gnomAD ships nuclear and mitochondrial frequencies in two unrelated INFO
//! layouts. Both are read through [`GroupFrequencies`] so the filtering and
//! the per-identifier fan-out are shared.
//!
//! A group is only stored when its frequency is strictly above one hundredth
//! of the minimum frequency; rarer groups read as zero downstream.

use super::{open_input, DropReason, ImportOptions, ImportStats, Outcome};
use crate::core::ancestry::{AncestryGroup, MITOCHONDRIAL_ORDER, NUCLEAR_ORDER};
use crate::core::batch::{BatchWriter, Cancellation};
use crate::core::chromosome::{resolve_label, MITOCHONDRIAL};
use crate::core::error::{FieldError, ImportError, Result, VcfParseError};
use crate::core::model::Allele;
use crate::formats::vcf::{Info, OptionalField, VcfReader, VcfRecord};
use crate::store::Store;
use log::{info, warn};
use std::path::Path;

/// Nuclear variant types worth storing (`allele_type`)
const NUCLEAR_TYPES: [&str; 3] = ["SNV", "INS", "DEL"];

/// Substrings of the mitochondrial `vep` annotation marking a stored type
const MITOCHONDRIAL_TYPES: [&str; 3] = ["insertion", "deletion", "SNV"];

/// Numeric rsIDs in an ID column
///
/// Identifiers may be separated by `;` or `,`. Tokens without the `rs`
/// prefix are ignored; a prefixed token with a malformed number is logged
/// and skipped.
///
/// # Examples
/// ```
/// use genobase_importer::import::alleles::parse_rsids;
///
/// assert_eq!(parse_rsids("rs1;rs2"), vec![1, 2]);
/// assert_eq!(parse_rsids("rs7,rsX;."), vec![7]);
/// assert!(parse_rsids(".").is_empty());
/// ```
pub fn parse_rsids(column: &str) -> Vec<i64> {
    column
        .split([';', ','])
        .filter_map(|token| {
            let digits = token.trim().strip_prefix("rs")?;
            match digits.parse::<i64>() {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!("Could not parse variant id '{}': {}", token, e);
                    None
                }
            }
        })
        .collect()
}

/// Per-group frequencies for one record
///
/// A `Missing` error from any method means the record lacks a required field
/// and is skipped; `WrongType` aborts the import.
pub trait GroupFrequencies {
    /// Overall ALT allele frequency
    fn overall(&self, info: &Info) -> std::result::Result<f64, FieldError>;

    /// Whether the record is an SNV, insertion or deletion
    fn is_supported_type(&self, info: &Info) -> std::result::Result<bool, FieldError>;

    /// Frequencies in [`NUCLEAR_ORDER`], `All` carrying `overall`
    ///
    /// Groups without a value in the record are left out.
    fn group_frequencies(
        &self,
        info: &Info,
        overall: f64,
    ) -> std::result::Result<Vec<(AncestryGroup, f64)>, FieldError>;
}

/// Genome-wide gnomAD layout: `AF`, `allele_type` and one `AF_<code>` per group
#[derive(Debug, Default, Clone, Copy)]
pub struct NuclearFrequencies;

impl GroupFrequencies for NuclearFrequencies {
    fn overall(&self, info: &Info) -> std::result::Result<f64, FieldError> {
        info.first_float("AF")
    }

    fn is_supported_type(&self, info: &Info) -> std::result::Result<bool, FieldError> {
        let allele_type = info.string("allele_type")?;
        Ok(NUCLEAR_TYPES
            .iter()
            .any(|kind| allele_type.eq_ignore_ascii_case(kind)))
    }

    fn group_frequencies(
        &self,
        info: &Info,
        overall: f64,
    ) -> std::result::Result<Vec<(AncestryGroup, f64)>, FieldError> {
        let mut frequencies = Vec::with_capacity(NUCLEAR_ORDER.len());
        for group in NUCLEAR_ORDER {
            if group == AncestryGroup::All {
                frequencies.push((group, overall));
            } else if let Some(frequency) = info.first_float(&group.frequency_key()).optional()? {
                frequencies.push((group, frequency));
            }
        }
        Ok(frequencies)
    }
}

/// Mitochondrial gnomAD layout: heteroplasmic and homoplasmic frequencies,
/// per group as positional `|`-separated arrays
#[derive(Debug, Default, Clone, Copy)]
pub struct MitochondrialFrequencies;

impl MitochondrialFrequencies {
    /// Add one `pop_AF_*` array onto `totals`, by [`MITOCHONDRIAL_ORDER`] position
    fn accumulate(
        info: &Info,
        key: &str,
        totals: &mut [f64; MITOCHONDRIAL_ORDER.len()],
    ) -> std::result::Result<(), FieldError> {
        let values = info.string(key)?;
        let count = values.split('|').count();
        if count > totals.len() {
            warn!(
                "{} has {} entries, ignoring those past {}",
                key,
                count,
                totals.len()
            );
        }

        for (total, token) in totals.iter_mut().zip(values.split('|')) {
            match token.parse::<f64>() {
                Ok(value) if value.is_finite() => *total += value,
                Ok(value) => warn!("Ignoring non-finite {} entry {}", key, value),
                Err(e) => warn!("Could not parse {} entry '{}': {}", key, token, e),
            }
        }
        Ok(())
    }
}

impl GroupFrequencies for MitochondrialFrequencies {
    fn overall(&self, info: &Info) -> std::result::Result<f64, FieldError> {
        Ok(info.float("AF_het")? + info.float("AF_hom")?)
    }

    fn is_supported_type(&self, info: &Info) -> std::result::Result<bool, FieldError> {
        let vep = info.string("vep")?;
        Ok(MITOCHONDRIAL_TYPES.iter().any(|kind| vep.contains(kind)))
    }

    fn group_frequencies(
        &self,
        info: &Info,
        overall: f64,
    ) -> std::result::Result<Vec<(AncestryGroup, f64)>, FieldError> {
        let mut totals = [0.0; MITOCHONDRIAL_ORDER.len()];
        Self::accumulate(info, "pop_AF_het", &mut totals)?;
        Self::accumulate(info, "pop_AF_hom", &mut totals)?;

        Ok(NUCLEAR_ORDER
            .iter()
            .map(|&group| {
                let frequency = if group == AncestryGroup::All {
                    overall
                } else {
                    MITOCHONDRIAL_ORDER
                        .iter()
                        .position(|&candidate| candidate == group)
                        .map_or(0.0, |index| totals[index])
                };
                (group, frequency)
            })
            .collect())
    }
}

/// Extraction strategy, picked once per record from its chromosome
#[derive(Debug, Clone, Copy)]
pub enum FrequencyStrategy {
    Nuclear(NuclearFrequencies),
    Mitochondrial(MitochondrialFrequencies),
}

impl FrequencyStrategy {
    /// Strategy for a canonical chromosome label
    pub fn for_chromosome(chromosome: &str) -> Self {
        if chromosome == MITOCHONDRIAL {
            FrequencyStrategy::Mitochondrial(MitochondrialFrequencies)
        } else {
            FrequencyStrategy::Nuclear(NuclearFrequencies)
        }
    }

    fn inner(&self) -> &dyn GroupFrequencies {
        match self {
            FrequencyStrategy::Nuclear(strategy) => strategy,
            FrequencyStrategy::Mitochondrial(strategy) => strategy,
        }
    }
}

impl GroupFrequencies for FrequencyStrategy {
    fn overall(&self, info: &Info) -> std::result::Result<f64, FieldError> {
        self.inner().overall(info)
    }

    fn is_supported_type(&self, info: &Info) -> std::result::Result<bool, FieldError> {
        self.inner().is_supported_type(info)
    }

    fn group_frequencies(
        &self,
        info: &Info,
        overall: f64,
    ) -> std::result::Result<Vec<(AncestryGroup, f64)>, FieldError> {
        self.inner().group_frequencies(info, overall)
    }
}

/// Turns gnomAD records into per-group [`Allele`] rows
#[derive(Debug, Clone, Copy)]
pub struct AlleleFrequencyExtractor {
    minimum_frequency: f64,
}

impl AlleleFrequencyExtractor {
    pub fn new(minimum_frequency: f64) -> Self {
        Self { minimum_frequency }
    }

    /// Frequencies at or below this are not stored
    pub fn noise_floor(&self) -> f64 {
        self.minimum_frequency / 100.0
    }

    /// Evaluate one record
    ///
    /// A missing required INFO field is logged and the record dropped; a
    /// field of the wrong type is an error.
    pub fn extract(&self, record: &VcfRecord) -> Result<Outcome<Vec<Allele>>> {
        if !record.is_pass() {
            return Ok(Outcome::Drop(DropReason::NotPassing));
        }

        let ids = parse_rsids(&record.id);
        if ids.is_empty() {
            return Ok(Outcome::Drop(DropReason::NoIdentifier));
        }

        let Some(chromosome) = resolve_label(&record.chrom) else {
            return Ok(Outcome::Drop(DropReason::UnknownChromosome));
        };
        let strategy = FrequencyStrategy::for_chromosome(chromosome);

        match self.evaluate(&strategy, record, &ids) {
            Ok(outcome) => Ok(outcome),
            Err(e) if e.is_missing() => {
                warn!("Skipping {}:{}: {}", record.chrom, record.pos, e);
                Ok(Outcome::Drop(DropReason::MissingField))
            }
            Err(source) => Err(ImportError::Field {
                chrom: record.chrom.clone(),
                pos: record.pos,
                source,
            }),
        }
    }

    fn evaluate<F: GroupFrequencies + ?Sized>(
        &self,
        strategy: &F,
        record: &VcfRecord,
        ids: &[i64],
    ) -> std::result::Result<Outcome<Vec<Allele>>, FieldError> {
        let overall = strategy.overall(&record.info)?;
        if !overall.is_finite() {
            warn!("Skipping {}:{}: overall frequency is {}", record.chrom, record.pos, overall);
            return Ok(Outcome::Drop(DropReason::InvalidFrequency));
        }
        if !(overall >= self.minimum_frequency) {
            return Ok(Outcome::Drop(DropReason::BelowMinimumFrequency));
        }

        if !strategy.is_supported_type(&record.info)? {
            return Ok(Outcome::Drop(DropReason::UnsupportedType));
        }

        let alternate = match record.alternates.as_slice() {
            [alternate] => alternate,
            _ => return Ok(Outcome::Drop(DropReason::NotBiallelic)),
        };

        let floor = self.noise_floor();
        let mut alleles = Vec::new();
        for (ancestry, frequency) in strategy.group_frequencies(&record.info, overall)? {
            if !(frequency.is_finite() && frequency > floor) {
                continue;
            }
            alleles.extend(ids.iter().map(|&id| Allele {
                id,
                reference: record.reference.clone(),
                alternate: alternate.clone(),
                ancestry,
                frequency,
            }));
        }

        Ok(Outcome::Keep(alleles))
    }
}

/// Import a gnomAD VCF file
pub fn import_alleles<S, P>(
    store: &mut S,
    cancel: &Cancellation,
    path: P,
    options: &ImportOptions,
) -> Result<ImportStats>
where
    S: Store + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    info!(
        "Importing gnomAD allele frequencies from {} (minimum frequency {})",
        path.display(),
        options.minimum_frequency
    );

    let mut input = open_input(path, options.show_progress)?;
    let stats = import_allele_records(store, cancel, VcfReader::new(&mut input), options)?;
    input.finish();

    Ok(stats)
}

/// Import allele frequencies from already parsed records
pub fn import_allele_records<S, I>(
    store: &mut S,
    cancel: &Cancellation,
    records: I,
    options: &ImportOptions,
) -> Result<ImportStats>
where
    S: Store + ?Sized,
    I: IntoIterator<Item = std::result::Result<VcfRecord, VcfParseError>>,
{
    let extractor = AlleleFrequencyExtractor::new(options.minimum_frequency);
    let mut stats = ImportStats::default();
    let mut writer: BatchWriter<Allele, S> =
        BatchWriter::with_batch_size(store, cancel, options.batch_size);

    for record in records {
        let record = record?;
        stats.records += 1;

        match extractor.extract(&record)? {
            Outcome::Keep(alleles) => {
                stats.kept += 1;
                for allele in alleles {
                    writer.push(allele)?;
                }
            }
            Outcome::Drop(reason) => stats.record_drop(reason),
        }
    }

    stats.record_flush(writer.finish()?);
    stats.log_summary("alleles");
    Ok(stats)
}
