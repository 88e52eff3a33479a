//! genobase-importer - Prepare a Genobase database from public reference data
//!
//! Normalizes two population-genomics catalogs into a small genomic store:
//!
//! - dbSNP variants, restricted to common non-MNV variants on the canonical
//!   GRCh38 chromosomes, with pseudo-autosomal loci stored once
//! - gnomAD allele frequencies per ancestry group, from both the nuclear and
//!   the mitochondrial release layouts
//!
//! It also imports UCSC liftOver chain files as-is.
//!
//! # Example
//!
//! ```no_run
//! use genobase_importer::core::Cancellation;
//! use genobase_importer::import::{import_variants, ImportOptions};
//! use genobase_importer::store::SqliteStore;
//!
//! let mut store = SqliteStore::open("genobase.db", false)?;
//! let stats = import_variants(
//!     &mut store,
//!     &Cancellation::new(),
//!     "GCF_000001405.40.gz",
//!     &ImportOptions::default(),
//! )?;
//! println!("stored {} variants", stats.stored);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod formats;
pub mod import;
pub mod store;

// Re-export commonly used types
pub use crate::core::{
    Allele, AncestryGroup, Cancellation, ChainFile, FieldError, ImportError, Reference,
    StoreError, Variant, VariantClass,
};
pub use import::{import_alleles, import_chain_file, import_variants, ImportOptions, ImportStats};
pub use store::{MemoryStore, SqliteStore, Store};
