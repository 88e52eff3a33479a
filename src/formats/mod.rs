//! File format adapters
//!
//! Readers for the source catalogs (VCF).

pub mod vcf;

pub use vcf::{Info, OptionalField, VcfReader, VcfRecord};
