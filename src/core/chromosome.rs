//! Chromosome resolution and pseudo-autosomal region handling
//!
//! dbSNP names contigs by RefSeq accession (`NC_000001.11`), gnomAD by UCSC
//! label (`chr1`). Both resolve to the canonical labels `1`..`22`, `X`, `Y`
//! and `MT`. Anything else (patches, alt loci, unplaced scaffolds) is
//! unresolved and the record carrying it is skipped.
//!
//! # Pseudo-autosomal regions
//!
//! PAR1 and PAR2 are shared by X and Y. A locus inside them is kept once,
//! under the `PAR`/`PAR2` label with its X-relative position; the Y copy is
//! discarded.

/// Label for the first pseudo-autosomal region
pub const PAR: &str = "PAR";

/// Label for the second pseudo-autosomal region
pub const PAR2: &str = "PAR2";

/// Label for the mitochondrial contig
pub const MITOCHONDRIAL: &str = "MT";

/// GRCh38 RefSeq accessions
const ACCESSIONS: [(&str, &str); 25] = [
    ("NC_000001.11", "1"),
    ("NC_000002.12", "2"),
    ("NC_000003.12", "3"),
    ("NC_000004.12", "4"),
    ("NC_000005.10", "5"),
    ("NC_000006.12", "6"),
    ("NC_000007.14", "7"),
    ("NC_000008.11", "8"),
    ("NC_000009.12", "9"),
    ("NC_000010.11", "10"),
    ("NC_000011.10", "11"),
    ("NC_000012.12", "12"),
    ("NC_000013.11", "13"),
    ("NC_000014.9", "14"),
    ("NC_000015.10", "15"),
    ("NC_000016.10", "16"),
    ("NC_000017.11", "17"),
    ("NC_000018.10", "18"),
    ("NC_000019.10", "19"),
    ("NC_000020.11", "20"),
    ("NC_000021.9", "21"),
    ("NC_000022.11", "22"),
    ("NC_000023.11", "X"),
    ("NC_000024.10", "Y"),
    ("NC_012920.1", "MT"),
];

const PAR1_XY: (u64, u64) = (10_001, 2_781_479);
const PAR2_X: (u64, u64) = (155_701_383, 156_030_895);
const PAR2_Y: (u64, u64) = (56_887_903, 57_217_415);

/// Pseudo-autosomal region a position falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParRegion {
    Par1,
    Par2,
}

impl ParRegion {
    /// Canonical chromosome label used for loci in this region
    pub fn label(&self) -> &'static str {
        match self {
            ParRegion::Par1 => PAR,
            ParRegion::Par2 => PAR2,
        }
    }
}

/// Where a resolved locus ends up after the PAR policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Keep the record under this chromosome label
    Keep(&'static str),
    /// Y-chromosome copy of a pseudo-autosomal locus
    Discard,
}

/// Resolve a GRCh38 RefSeq accession to its canonical label
///
/// # Examples
/// ```
/// use genobase_importer::core::chromosome::resolve;
///
/// assert_eq!(resolve("NC_000001.11"), Some("1"));
/// assert_eq!(resolve("NC_012920.1"), Some("MT"));
/// assert_eq!(resolve("NC_000001.10"), None);
/// ```
pub fn resolve(accession: &str) -> Option<&'static str> {
    ACCESSIONS
        .iter()
        .find(|(acc, _)| *acc == accession)
        .map(|(_, label)| *label)
}

/// Resolve a UCSC-style or bare chromosome name to its canonical label
///
/// Accepts `chr1`, `CHR1`, `1`, `chrX`, `chrM`, `MT` and the accessions
/// known to [`resolve`].
///
/// # Examples
/// ```
/// use genobase_importer::core::chromosome::resolve_label;
///
/// assert_eq!(resolve_label("chr7"), Some("7"));
/// assert_eq!(resolve_label("chrM"), Some("MT"));
/// assert_eq!(resolve_label("chr1_KI270706v1_random"), None);
/// ```
pub fn resolve_label(name: &str) -> Option<&'static str> {
    if let Some(label) = resolve(name) {
        return Some(label);
    }

    let bare = match name.get(..3) {
        Some(prefix) if name.len() > 3 && prefix.eq_ignore_ascii_case("chr") => &name[3..],
        _ => name,
    };
    let upper = bare.to_ascii_uppercase();
    let wanted = if upper == "M" { MITOCHONDRIAL } else { upper.as_str() };

    ACCESSIONS
        .iter()
        .map(|(_, label)| *label)
        .find(|label| *label == wanted)
}

/// Classify a position on a canonical chromosome against PAR1/PAR2
pub fn par_region(chromosome: &str, position: u64) -> Option<ParRegion> {
    let within = |(start, end): (u64, u64)| position >= start && position <= end;

    match chromosome {
        "X" if within(PAR1_XY) => Some(ParRegion::Par1),
        "X" if within(PAR2_X) => Some(ParRegion::Par2),
        "Y" if within(PAR1_XY) => Some(ParRegion::Par1),
        "Y" if within(PAR2_Y) => Some(ParRegion::Par2),
        _ => None,
    }
}

/// Apply the PAR policy to a resolved locus
///
/// # Examples
/// ```
/// use genobase_importer::core::chromosome::{place, Placement};
///
/// assert_eq!(place("X", 60_000), Placement::Keep("PAR"));
/// assert_eq!(place("Y", 60_000), Placement::Discard);
/// assert_eq!(place("X", 5_000_000), Placement::Keep("X"));
/// ```
pub fn place(chromosome: &'static str, position: u64) -> Placement {
    match par_region(chromosome, position) {
        Some(_) if chromosome == "Y" => Placement::Discard,
        Some(region) => Placement::Keep(region.label()),
        None => Placement::Keep(chromosome),
    }
}

/// All accessions of the canonical table with their labels
pub fn accessions() -> impl Iterator<Item = (&'static str, &'static str)> {
    ACCESSIONS.iter().copied()
}
