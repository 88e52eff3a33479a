//! Storage backends
//!
//! The import pipelines only talk to a [`Store`]. Every call receives the
//! run's [`Cancellation`] and must not persist anything once it is set.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::core::batch::Cancellation;
use crate::core::chain::ChainFile;
use crate::core::error::StoreResult;
use crate::core::model::{Allele, Variant};
use crate::core::reference::Reference;

/// Bulk destination for imported records
///
/// Implementations should upsert so that re-running an import is harmless.
pub trait Store {
    fn store_variants(&mut self, cancel: &Cancellation, variants: &[Variant]) -> StoreResult<()>;

    fn store_alleles(&mut self, cancel: &Cancellation, alleles: &[Allele]) -> StoreResult<()>;

    /// Replace the chain file stored for `from`
    fn store_chain_file(
        &mut self,
        cancel: &Cancellation,
        from: Reference,
        chain_file: &ChainFile,
    ) -> StoreResult<()>;
}
