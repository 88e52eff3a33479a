//! dbSNP variant import
//!
//! Keeps common, non-MNV variants on the canonical GRCh38 chromosomes.
//! Pseudo-autosomal loci are stored once under `PAR`/`PAR2`.

use super::{open_input, DropReason, ImportOptions, ImportStats, Outcome};
use crate::core::batch::{BatchWriter, Cancellation};
use crate::core::chromosome::{place, resolve, Placement};
use crate::core::error::{FieldError, ImportError, Result, VcfParseError};
use crate::core::model::{Variant, VariantClass};
use crate::formats::vcf::{VcfReader, VcfRecord};
use crate::store::Store;
use log::info;
use std::path::Path;

/// Turns dbSNP records into [`Variant`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct VariantNormalizer;

impl VariantNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate one record
    ///
    /// A malformed rsID, a missing `VC` tag on a common record, or an INFO
    /// value of the wrong type is an error; every other rejection is a drop.
    pub fn normalize(&self, record: &VcfRecord) -> Result<Outcome<Variant>> {
        let field_error = |source: FieldError| ImportError::Field {
            chrom: record.chrom.clone(),
            pos: record.pos,
            source,
        };

        if !record.info.flag("COMMON").map_err(field_error)? {
            return Ok(Outcome::Drop(DropReason::NotCommon));
        }

        let class = VariantClass::new(record.info.string("VC").map_err(field_error)?);
        if class.is_multi_nucleotide() {
            return Ok(Outcome::Drop(DropReason::MultiNucleotide));
        }

        let id = parse_variant_id(&record.id)?;

        let Some(chromosome) = resolve(&record.chrom) else {
            return Ok(Outcome::Drop(DropReason::UnknownChromosome));
        };
        let chromosome = match place(chromosome, record.pos) {
            Placement::Keep(label) => label,
            Placement::Discard => return Ok(Outcome::Drop(DropReason::PseudoAutosomalY)),
        };

        let position =
            i64::try_from(record.pos).map_err(|_| ImportError::PositionOutOfRange {
                chrom: record.chrom.clone(),
                pos: record.pos,
            })?;

        Ok(Outcome::Keep(Variant {
            id,
            chromosome: chromosome.to_string(),
            position,
            reference: record.reference.clone(),
            class,
        }))
    }
}

/// Numeric part of an `rs`-prefixed identifier
///
/// # Examples
/// ```
/// use genobase_importer::import::variants::parse_variant_id;
///
/// assert_eq!(parse_variant_id("rs12345").unwrap(), 12345);
/// assert!(parse_variant_id("rsABC").is_err());
/// ```
pub fn parse_variant_id(id: &str) -> Result<i64> {
    id.strip_prefix("rs")
        .unwrap_or(id)
        .parse::<i64>()
        .map_err(|_| ImportError::InvalidVariantId(id.to_string()))
}

/// Import a dbSNP VCF file
pub fn import_variants<S, P>(
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
    info!("Importing dbSNP variants from {}", path.display());

    let mut input = open_input(path, options.show_progress)?;
    let stats = import_variant_records(store, cancel, VcfReader::new(&mut input), options)?;
    input.finish();

    Ok(stats)
}

/// Import variants from already parsed records
pub fn import_variant_records<S, I>(
    store: &mut S,
    cancel: &Cancellation,
    records: I,
    options: &ImportOptions,
) -> Result<ImportStats>
where
    S: Store + ?Sized,
    I: IntoIterator<Item = std::result::Result<VcfRecord, VcfParseError>>,
{
    let normalizer = VariantNormalizer::new();
    let mut stats = ImportStats::default();
    let mut writer = BatchWriter::with_batch_size(store, cancel, options.batch_size);

    for record in records {
        let record = record?;
        stats.records += 1;

        match normalizer.normalize(&record)? {
            Outcome::Keep(variant) => {
                stats.kept += 1;
                writer.push(variant)?;
            }
            Outcome::Drop(reason) => stats.record_drop(reason),
        }
    }

    stats.record_flush(writer.finish()?);
    stats.log_summary("variants");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chromosome::{PAR, PAR2};
    use crate::store::MemoryStore;

    fn record(chrom: &str, pos: u64, id: &str, info: &str) -> VcfRecord {
        let line = format!("{}\t{}\t{}\tA\tG\t.\t.\t{}", chrom, pos, id, info);
        VcfRecord::parse(&line, 1).unwrap()
    }

    fn normalize(chrom: &str, pos: u64, id: &str, info: &str) -> Outcome<Variant> {
        VariantNormalizer::new()
            .normalize(&record(chrom, pos, id, info))
            .unwrap()
    }

    #[test]
    fn test_common_snv_kept() {
        let outcome = normalize("NC_000001.11", 10_001, "rs12345", "RS=12345;VC=SNV;COMMON");
        assert_eq!(
            outcome,
            Outcome::Keep(Variant {
                id: 12345,
                chromosome: "1".to_string(),
                position: 10_001,
                reference: "A".to_string(),
                class: VariantClass::new("SNV"),
            })
        );
    }

    #[test]
    fn test_not_common_dropped() {
        assert_eq!(
            normalize("NC_000001.11", 100, "rs1", "VC=SNV"),
            Outcome::Drop(DropReason::NotCommon)
        );
        assert_eq!(
            normalize("NC_000001.11", 100, "rs1", "VC=SNV;COMMON=0"),
            Outcome::Drop(DropReason::NotCommon)
        );
    }

    #[test]
    fn test_mnv_dropped() {
        assert_eq!(
            normalize("NC_000001.11", 100, "rs1", "VC=MNV;COMMON"),
            Outcome::Drop(DropReason::MultiNucleotide)
        );
        // MNV wins over an identifier that would otherwise abort
        assert_eq!(
            normalize("NC_000001.11", 100, "rsABC", "VC=MNV;COMMON"),
            Outcome::Drop(DropReason::MultiNucleotide)
        );
    }

    #[test]
    fn test_malformed_id_is_fatal() {
        let err = VariantNormalizer::new()
            .normalize(&record("NC_000001.11", 100, "rsABC", "VC=SNV;COMMON"))
            .unwrap_err();
        assert!(matches!(err, ImportError::InvalidVariantId(ref id) if id == "rsABC"));
    }

    #[test]
    fn test_missing_class_is_fatal() {
        let err = VariantNormalizer::new()
            .normalize(&record("NC_000001.11", 100, "rs1", "COMMON"))
            .unwrap_err();
        assert!(matches!(
            err,
            ImportError::Field { source: FieldError::Missing { .. }, .. }
        ));
    }

    #[test]
    fn test_position_out_of_range_is_fatal() {
        let err = VariantNormalizer::new()
            .normalize(&record("NC_000001.11", u64::MAX, "rs1", "VC=SNV;COMMON"))
            .unwrap_err();
        assert!(matches!(
            err,
            ImportError::PositionOutOfRange { pos: u64::MAX, .. }
        ));
    }

    #[test]
    fn test_unknown_contig_dropped() {
        assert_eq!(
            normalize("NT_187361.1", 100, "rs1", "VC=SNV;COMMON"),
            Outcome::Drop(DropReason::UnknownChromosome)
        );
    }

    #[test]
    fn test_pseudo_autosomal_policy() {
        let chromosome = |outcome: Outcome<Variant>| match outcome {
            Outcome::Keep(variant) => Some((variant.chromosome, variant.position)),
            Outcome::Drop(_) => None,
        };

        assert_eq!(
            chromosome(normalize("NC_000023.11", 60_000, "rs1", "VC=SNV;COMMON")),
            Some((PAR.to_string(), 60_000))
        );
        assert_eq!(
            normalize("NC_000024.10", 60_000, "rs1", "VC=SNV;COMMON"),
            Outcome::Drop(DropReason::PseudoAutosomalY)
        );
        assert_eq!(
            chromosome(normalize("NC_000023.11", 156_000_000, "rs1", "VC=SNV;COMMON")),
            Some((PAR2.to_string(), 156_000_000))
        );
        assert_eq!(
            chromosome(normalize("NC_000023.11", 5_000_000, "rs1", "VC=SNV;COMMON")),
            Some(("X".to_string(), 5_000_000))
        );
    }

    #[test]
    fn test_import_records_counts() {
        let records = vec![
            Ok(record("NC_000001.11", 100, "rs1", "VC=SNV;COMMON")),
            Ok(record("NC_000001.11", 200, "rs2", "VC=SNV")),
            Ok(record("NC_000024.10", 60_000, "rs3", "VC=DEL;COMMON")),
            Ok(record("NC_000002.12", 300, "rs4", "VC=INS;COMMON")),
        ];
        let mut store = MemoryStore::new();
        let stats = import_variant_records(
            &mut store,
            &Cancellation::new(),
            records,
            &ImportOptions::default(),
        )
        .unwrap();

        assert_eq!(stats.records, 4);
        assert_eq!(stats.kept, 2);
        assert_eq!(stats.stored, 2);
        assert_eq!(stats.batches, 1);
        assert_eq!(stats.dropped_for(DropReason::NotCommon), 1);
        assert_eq!(stats.dropped_for(DropReason::PseudoAutosomalY), 1);
        let ids: Vec<i64> = store.variants().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_fatal_record_keeps_flushed_batches() {
        let mut records: Vec<_> = (1..=5)
            .map(|id| Ok(record("NC_000001.11", id, &format!("rs{}", id), "VC=SNV;COMMON")))
            .collect();
        records.push(Ok(record("NC_000001.11", 6, "rsX", "VC=SNV;COMMON")));

        let mut store = MemoryStore::new();
        let options = ImportOptions {
            batch_size: 2,
            ..ImportOptions::default()
        };
        let err = import_variant_records(&mut store, &Cancellation::new(), records, &options)
            .unwrap_err();

        assert!(matches!(err, ImportError::InvalidVariantId(_)));
        assert_eq!(store.variant_batches(), &[2, 2]);
    }
}
