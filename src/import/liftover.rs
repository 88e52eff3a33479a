//! Liftover chain file import
//!
//! The chain file is parsed whole and stored in one call, replacing any chain
//! file previously stored for the same source reference.

use super::open_input;
use crate::core::batch::Cancellation;
use crate::core::chain::{parse_chain_reader, ChainFile};
use crate::core::error::Result;
use crate::core::reference::Reference;
use crate::store::Store;
use log::info;
use std::path::Path;

/// Import a (possibly compressed) UCSC chain file lifting over from `from`
///
/// Returns the parsed chain file so callers can report on it.
pub fn import_chain_file<S, P>(
    store: &mut S,
    cancel: &Cancellation,
    from: Reference,
    path: P,
    show_progress: bool,
) -> Result<ChainFile>
where
    S: Store + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    info!("Importing {} chain file from {}", from, path.display());

    let mut input = open_input(path, show_progress)?;
    let chain_file = parse_chain_reader(&mut input)?;
    input.finish();

    info!(
        "Parsed {} chains with {} blocks",
        chain_file.chains.len(),
        chain_file.block_count()
    );

    store.store_chain_file(cancel, from, &chain_file)?;
    Ok(chain_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{ChainParseError, ImportError};
    use crate::store::MemoryStore;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CHAIN: &str = "\
chain 4900 chrY 58368225 + 25985403 25985638 chr5 151006098 - 43257292 43257528 1
9 1 0
10 0 5
61
";

    fn chain_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_import_chain_file() {
        let file = chain_file(CHAIN);
        let mut store = MemoryStore::new();

        let parsed =
            import_chain_file(&mut store, &Cancellation::new(), Reference::GRCh37, file.path(), false)
                .unwrap();

        assert_eq!(parsed.block_count(), 3);
        let stored = store.chain_files();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].0, Reference::GRCh37);
        assert_eq!(stored[0].1.chains[0].header.target_name, "chr5");
    }

    #[test]
    fn test_malformed_chain_stores_nothing() {
        let file = chain_file("chain 1 chr1 100 + 0 10\n");
        let mut store = MemoryStore::new();

        let err =
            import_chain_file(&mut store, &Cancellation::new(), Reference::GRCh38, file.path(), false)
                .unwrap_err();

        assert!(matches!(
            err,
            ImportError::ChainParse(ChainParseError::InvalidHeader { line: 1, .. })
        ));
        assert!(store.chain_files().is_empty());
    }

    #[test]
    fn test_cancelled_import() {
        let file = chain_file(CHAIN);
        let mut store = MemoryStore::new();
        let cancel = Cancellation::new();
        cancel.cancel();

        let err = import_chain_file(&mut store, &cancel, Reference::GRCh37, file.path(), false)
            .unwrap_err();
        assert!(matches!(err, ImportError::Store(_)));
    }
}
