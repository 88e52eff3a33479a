//! Core importer functionality
//!
//! This module contains the record model, chromosome resolution, ancestry
//! groups, the batching policy, input streams and the chain file parser.

pub mod ancestry;
pub mod batch;
pub mod chain;
pub mod chromosome;
pub mod error;
pub mod io;
pub mod model;
pub mod reference;

pub use ancestry::{AncestryGroup, MITOCHONDRIAL_ORDER, NUCLEAR_ORDER};
pub use batch::{BatchWriter, Batchable, Cancellation, FlushStats, DEFAULT_BATCH_SIZE};
pub use chain::{parse_chain_bytes, parse_chain_reader, Chain, ChainBlock, ChainFile, ChainHeader, Strand};
pub use chromosome::{place, resolve, resolve_label, ParRegion, Placement};
pub use error::{
    ChainParseError, ChainResult, FieldError, ImportError, Result, StoreError, StoreResult,
    VcfParseError,
};
pub use io::{CompressionFormat, Input, LineIterator, DEFAULT_BUFFER_SIZE};
pub use model::{Allele, Variant, VariantClass};
pub use reference::Reference;
