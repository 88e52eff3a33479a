//! SQLite-backed store
//!
//! Each store call runs in its own transaction, so a batch is either fully
//! written or not at all. Rows are upserted on their natural keys.

use super::Store;
use crate::core::batch::Cancellation;
use crate::core::chain::ChainFile;
use crate::core::error::{StoreError, StoreResult};
use crate::core::model::{Allele, Variant};
use crate::core::reference::Reference;
use log::debug;
use rusqlite::{params, Connection};
use std::path::Path;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS variants (
        id INTEGER PRIMARY KEY,
        chromosome TEXT NOT NULL,
        position INTEGER NOT NULL,
        reference TEXT NOT NULL,
        class TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_variants_position ON variants(chromosome, position);

    CREATE TABLE IF NOT EXISTS alleles (
        id INTEGER NOT NULL,
        reference TEXT NOT NULL,
        alternate TEXT NOT NULL,
        ancestry TEXT NOT NULL,
        frequency REAL NOT NULL,
        PRIMARY KEY (id, reference, alternate, ancestry)
    );

    CREATE TABLE IF NOT EXISTS chain_blocks (
        reference TEXT NOT NULL,
        chain_id TEXT NOT NULL,
        source_chrom TEXT NOT NULL,
        source_strand TEXT NOT NULL,
        source_start INTEGER NOT NULL,
        source_end INTEGER NOT NULL,
        target_chrom TEXT NOT NULL,
        target_strand TEXT NOT NULL,
        target_start INTEGER NOT NULL,
        target_end INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_chain_blocks_source
        ON chain_blocks(reference, source_chrom, source_start);
";

/// Genobase database in a single SQLite file
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`
    ///
    /// `no_sync` trades durability for speed by not waiting on fsync.
    pub fn open<P: AsRef<Path>>(path: P, no_sync: bool) -> StoreResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        Self::init(conn, no_sync)
    }

    /// Database that lives only as long as the store
    pub fn in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?, false)
    }

    fn init(conn: Connection, no_sync: bool) -> StoreResult<Self> {
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        if no_sync {
            conn.pragma_update(None, "synchronous", "OFF")?;
        }
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Number of rows in a table (for diagnostics and tests)
    pub fn count(&self, table: &str) -> StoreResult<i64> {
        let sql = match table {
            "variants" => "SELECT COUNT(*) FROM variants",
            "alleles" => "SELECT COUNT(*) FROM alleles",
            "chain_blocks" => "SELECT COUNT(*) FROM chain_blocks",
            other => {
                return Err(StoreError::Backend(format!("Unknown table: {}", other)))
            }
        };
        Ok(self.conn.query_row(sql, [], |row| row.get(0))?)
    }

    /// Borrow the underlying connection for ad-hoc queries
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Store for SqliteStore {
    fn store_variants(&mut self, cancel: &Cancellation, variants: &[Variant]) -> StoreResult<()> {
        cancel.check()?;
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO variants (id, chromosome, position, reference, class)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for variant in variants {
                stmt.execute(params![
                    variant.id,
                    variant.chromosome,
                    variant.position,
                    variant.reference,
                    variant.class.as_str(),
                ])?;
            }
        }
        // Dropping the transaction rolls the batch back
        cancel.check()?;
        tx.commit()?;
        debug!("Committed {} variants", variants.len());
        Ok(())
    }

    fn store_alleles(&mut self, cancel: &Cancellation, alleles: &[Allele]) -> StoreResult<()> {
        cancel.check()?;
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO alleles (id, reference, alternate, ancestry, frequency)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for allele in alleles {
                stmt.execute(params![
                    allele.id,
                    allele.reference,
                    allele.alternate,
                    allele.ancestry.code(),
                    allele.frequency,
                ])?;
            }
        }
        cancel.check()?;
        tx.commit()?;
        debug!("Committed {} alleles", alleles.len());
        Ok(())
    }

    fn store_chain_file(
        &mut self,
        cancel: &Cancellation,
        from: Reference,
        chain_file: &ChainFile,
    ) -> StoreResult<()> {
        cancel.check()?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM chain_blocks WHERE reference = ?1",
            params![from.as_str()],
        )?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO chain_blocks (reference, chain_id, source_chrom, source_strand,
                    source_start, source_end, target_chrom, target_strand, target_start, target_end)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for chain in &chain_file.chains {
                cancel.check()?;
                let header = &chain.header;
                for block in &chain.blocks {
                    stmt.execute(params![
                        from.as_str(),
                        header.chain_id,
                        header.source_name,
                        header.source_strand.as_char().to_string(),
                        coordinate(block.source_start)?,
                        coordinate(block.source_end)?,
                        header.target_name,
                        header.target_strand.as_char().to_string(),
                        coordinate(block.target_start)?,
                        coordinate(block.target_end)?,
                    ])?;
                }
            }
        }
        cancel.check()?;
        tx.commit()?;
        debug!("Committed {} chain blocks for {}", chain_file.block_count(), from);
        Ok(())
    }
}

/// SQLite integers are signed 64-bit
fn coordinate(value: u64) -> StoreResult<i64> {
    i64::try_from(value)
        .map_err(|_| StoreError::Backend(format!("Coordinate {} does not fit in SQLite", value)))
}
