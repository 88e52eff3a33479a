//! Property-based tests for chromosome resolution and the PAR policy

use genobase_importer::core::chromosome::{
    accessions, par_region, place, resolve, resolve_label, ParRegion, Placement, PAR, PAR2,
};
use proptest::prelude::*;

const PAR1: (u64, u64) = (10_001, 2_781_479);
const PAR2_X: (u64, u64) = (155_701_383, 156_030_895);
const PAR2_Y: (u64, u64) = (56_887_903, 57_217_415);

/// Canonical labels that are never pseudo-autosomal
fn arb_autosome() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("1"),
        Just("2"),
        Just("7"),
        Just("13"),
        Just("21"),
        Just("22"),
        Just("MT"),
    ]
}

/// Positions on X/Y outside both PARs (for both chromosomes)
fn arb_non_par_position() -> impl Strategy<Value = u64> {
    prop_oneof![
        1u64..PAR1.0,
        (PAR1.1 + 1)..PAR2_Y.0,
        (PAR2_Y.1 + 1)..PAR2_X.0,
        (PAR2_X.1 + 1)..200_000_000,
    ]
}

#[test]
fn test_table_is_complete() {
    let labels: Vec<&str> = accessions().map(|(_, label)| label).collect();
    for n in 1..=22 {
        assert!(labels.contains(&n.to_string().as_str()));
    }
    for label in ["X", "Y", "MT"] {
        assert!(labels.contains(&label));
    }
    assert!(!labels.contains(&PAR));
    assert!(!labels.contains(&PAR2));
}

proptest! {
    /// Every table accession resolves; a different version suffix never does
    #[test]
    fn prop_accession_version_matters(index in 0usize..25, version in 0u32..30) {
        let (accession, label) = accessions().nth(index).unwrap();
        prop_assert_eq!(resolve(accession), Some(label));

        let base = accession.split('.').next().unwrap();
        let other = format!("{}.{}", base, version);
        if other != accession {
            prop_assert_eq!(resolve(&other), None);
        }
    }

    /// Strings that are not RefSeq accessions never resolve
    #[test]
    fn prop_garbage_unresolved(name in "[a-z]{1,12}") {
        prop_assert_eq!(resolve(&name), None);
    }

    /// UCSC names resolve case-insensitively to the bare label
    #[test]
    fn prop_ucsc_labels(n in 1u8..=22, upper in any::<bool>()) {
        let prefix = if upper { "CHR" } else { "chr" };
        let name = format!("{}{}", prefix, n);
        let expected = n.to_string();
        prop_assert_eq!(resolve_label(&name), Some(expected.as_str()));
    }

    /// X inside PAR1 is relabelled, position untouched, Y is dropped
    #[test]
    fn prop_par1(position in PAR1.0..=PAR1.1) {
        prop_assert_eq!(place("X", position), Placement::Keep(PAR));
        prop_assert_eq!(place("Y", position), Placement::Discard);
        prop_assert_eq!(par_region("X", position), Some(ParRegion::Par1));
    }

    /// PAR2 uses chromosome-specific coordinates
    #[test]
    fn prop_par2(x in PAR2_X.0..=PAR2_X.1, y in PAR2_Y.0..=PAR2_Y.1) {
        prop_assert_eq!(place("X", x), Placement::Keep(PAR2));
        prop_assert_eq!(place("Y", y), Placement::Discard);
        prop_assert_eq!(par_region("Y", x), None);
        prop_assert_eq!(par_region("X", y), None);
    }

    /// Outside the PARs, X and Y keep their own label
    #[test]
    fn prop_sex_chromosomes_outside_par(position in arb_non_par_position()) {
        prop_assert_eq!(place("X", position), Placement::Keep("X"));
        prop_assert_eq!(place("Y", position), Placement::Keep("Y"));
    }

    /// Other chromosomes always pass through
    #[test]
    fn prop_autosomes_pass_through(chromosome in arb_autosome(), position in 1u64..250_000_000) {
        prop_assert_eq!(place(chromosome, position), Placement::Keep(chromosome));
    }
}
