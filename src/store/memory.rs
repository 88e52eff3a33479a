//! In-memory store

use super::Store;
use crate::core::batch::Cancellation;
use crate::core::chain::ChainFile;
use crate::core::error::{StoreError, StoreResult};
use crate::core::model::{Allele, Variant};
use crate::core::reference::Reference;

/// Keeps every stored batch in order
///
/// Records are appended as received, so the contents show exactly which
/// batches made it. Mostly useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    variants: Vec<Variant>,
    alleles: Vec<Allele>,
    chain_files: Vec<(Reference, ChainFile)>,
    variant_batches: Vec<usize>,
    allele_batches: Vec<usize>,
    calls: usize,
    fail_on_call: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `call`-th store call (1-based, any record kind) fail
    pub fn fail_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn alleles(&self) -> &[Allele] {
        &self.alleles
    }

    pub fn chain_files(&self) -> &[(Reference, ChainFile)] {
        &self.chain_files
    }

    /// Sizes of the variant batches stored so far
    pub fn variant_batches(&self) -> &[usize] {
        &self.variant_batches
    }

    /// Sizes of the allele batches stored so far
    pub fn allele_batches(&self) -> &[usize] {
        &self.allele_batches
    }

    fn begin(&mut self, cancel: &Cancellation) -> StoreResult<()> {
        cancel.check()?;
        self.calls += 1;
        if self.fail_on_call == Some(self.calls) {
            return Err(StoreError::Backend(format!(
                "injected failure on store call {}",
                self.calls
            )));
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    fn store_variants(&mut self, cancel: &Cancellation, variants: &[Variant]) -> StoreResult<()> {
        self.begin(cancel)?;
        self.variants.extend_from_slice(variants);
        self.variant_batches.push(variants.len());
        Ok(())
    }

    fn store_alleles(&mut self, cancel: &Cancellation, alleles: &[Allele]) -> StoreResult<()> {
        self.begin(cancel)?;
        self.alleles.extend_from_slice(alleles);
        self.allele_batches.push(alleles.len());
        Ok(())
    }

    fn store_chain_file(
        &mut self,
        cancel: &Cancellation,
        from: Reference,
        chain_file: &ChainFile,
    ) -> StoreResult<()> {
        self.begin(cancel)?;
        self.chain_files.retain(|(reference, _)| *reference != from);
        self.chain_files.push((from, chain_file.clone()));
        Ok(())
    }
}
