//! Chain file parsing
//!
//! Parses UCSC chain format files so they can be handed to the store for
//! later liftover queries. Coordinates are kept exactly as written: this
//! module does not perform any coordinate mapping.
//!
//! # Chain File Format
//!
//! ```text
//! chain score tName tSize tStrand tStart tEnd qName qSize qStrand qStart qEnd id
//! size dt dq
//! size dt dq
//! size
//! ```
//!
//! - Header line starts with "chain"
//! - Data lines contain: size (alignment block), dt (reference gap), dq (query gap)
//! - Last data line has only size (no gaps)

use super::error::{ChainParseError, ChainResult};
use crate::core::io::LineIterator;
use std::io::BufRead;

/// Strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Strand {
    #[default]
    Plus,
    Minus,
}

impl Strand {
    /// Parse strand from its chain file token
    ///
    /// # Examples
    /// ```
    /// use genobase_importer::core::chain::Strand;
    /// assert_eq!(Strand::parse("+"), Some(Strand::Plus));
    /// assert_eq!(Strand::parse("-"), Some(Strand::Minus));
    /// assert_eq!(Strand::parse("."), None);
    /// ```
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "+" => Some(Strand::Plus),
            "-" => Some(Strand::Minus),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }
}

/// Parsed chain header
///
/// UCSC calls the genome lifted from the "target" (t) and the genome lifted
/// to the "query" (q). Here they are `source` and `target` respectively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainHeader {
    pub score: u64,
    pub source_name: String,
    pub source_size: u64,
    pub source_strand: Strand,
    pub source_start: u64,
    pub source_end: u64,
    pub target_name: String,
    pub target_size: u64,
    pub target_strand: Strand,
    pub target_start: u64,
    pub target_end: u64,
    /// Optional trailing id column, empty when absent
    pub chain_id: String,
}

impl ChainHeader {
    /// Parse a chain header line
    pub fn parse(line: &str, line_number: usize) -> ChainResult<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();

        if fields.len() < 12 {
            return Err(ChainParseError::InvalidHeader {
                line: line_number,
                message: format!("Expected 12+ fields, got {}", fields.len()),
            });
        }

        if fields[0] != "chain" {
            return Err(ChainParseError::InvalidHeader {
                line: line_number,
                message: format!("Expected 'chain' keyword, got '{}'", fields[0]),
            });
        }

        let number = |index: usize, field: &'static str| {
            fields[index]
                .parse::<u64>()
                .map_err(|_| ChainParseError::ParseInt {
                    line: line_number,
                    field,
                    value: fields[index].to_string(),
                })
        };
        let strand = |index: usize| {
            Strand::parse(fields[index]).ok_or_else(|| ChainParseError::InvalidStrand {
                line: line_number,
                strand: fields[index].to_string(),
            })
        };

        let header = Self {
            score: number(1, "score")?,
            source_name: fields[2].to_string(),
            source_size: number(3, "source size")?,
            source_strand: strand(4)?,
            source_start: number(5, "source start")?,
            source_end: number(6, "source end")?,
            target_name: fields[7].to_string(),
            target_size: number(8, "target size")?,
            target_strand: strand(9)?,
            target_start: number(10, "target start")?,
            target_end: number(11, "target end")?,
            chain_id: fields.get(12).map(|s| s.to_string()).unwrap_or_default(),
        };

        if header.source_start > header.source_end || header.source_end > header.source_size {
            return Err(ChainParseError::InvalidHeader {
                line: line_number,
                message: format!(
                    "Source interval {}-{} outside 0-{}",
                    header.source_start, header.source_end, header.source_size
                ),
            });
        }
        if header.target_start > header.target_end || header.target_end > header.target_size {
            return Err(ChainParseError::InvalidHeader {
                line: line_number,
                message: format!(
                    "Target interval {}-{} outside 0-{}",
                    header.target_start, header.target_end, header.target_size
                ),
            });
        }

        Ok(header)
    }
}

/// Ungapped aligned block, in strand-relative coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainBlock {
    pub source_start: u64,
    pub source_end: u64,
    pub target_start: u64,
    pub target_end: u64,
}

/// One chain: its header and aligned blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub header: ChainHeader,
    pub blocks: Vec<ChainBlock>,
}

/// A whole chain file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainFile {
    pub chains: Vec<Chain>,
}

impl ChainFile {
    /// Total number of aligned blocks over all chains
    pub fn block_count(&self) -> usize {
        self.chains.iter().map(|chain| chain.blocks.len()).sum()
    }
}

/// Parse a data line into (size, source gap, target gap)
fn parse_data_line(line: &str, line_number: usize) -> ChainResult<(u64, u64, u64)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let number = |index: usize, field: &'static str| {
        fields[index]
            .parse::<u64>()
            .map_err(|_| ChainParseError::ParseInt {
                line: line_number,
                field,
                value: fields[index].to_string(),
            })
    };

    let parsed = match fields.len() {
        1 => (number(0, "block size")?, 0, 0),
        3 => (
            number(0, "block size")?,
            number(1, "source gap")?,
            number(2, "target gap")?,
        ),
        n => {
            return Err(ChainParseError::InvalidDataLine {
                line: line_number,
                message: format!("Expected 1 or 3 fields, got {}", n),
            })
        }
    };

    if parsed.0 == 0 {
        return Err(ChainParseError::InvalidDataLine {
            line: line_number,
            message: "Block size must be greater than 0".to_string(),
        });
    }

    Ok(parsed)
}

/// Parse a chain file from any buffered reader
pub fn parse_chain_reader<R: BufRead>(reader: R) -> ChainResult<ChainFile> {
    let mut result = ChainFile::default();
    let mut current: Option<(Chain, u64, u64)> = None;
    let mut lines = LineIterator::new(reader);

    loop {
        let line_number = lines.line_number() + 1;
        let trimmed = match lines.next_line() {
            Some(line) => line?.trim(),
            None => break,
        };

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if trimmed.starts_with("chain") {
            let header = ChainHeader::parse(trimmed, line_number)?;
            let (source_pos, target_pos) = (header.source_start, header.target_start);
            if let Some((chain, _, _)) = current.replace((
                Chain {
                    header,
                    blocks: Vec::new(),
                },
                source_pos,
                target_pos,
            )) {
                result.chains.push(chain);
            }
            continue;
        }

        let (chain, source_pos, target_pos) = current
            .as_mut()
            .ok_or(ChainParseError::OrphanDataLine(line_number))?;
        let (size, source_gap, target_gap) = parse_data_line(trimmed, line_number)?;
        let advance = |pos: u64, step: u64| {
            pos.checked_add(step)
                .ok_or_else(|| ChainParseError::InvalidDataLine {
                    line: line_number,
                    message: format!("Offset {} + {} overflows", pos, step),
                })
        };

        let source_end = advance(*source_pos, size)?;
        let target_end = advance(*target_pos, size)?;
        chain.blocks.push(ChainBlock {
            source_start: *source_pos,
            source_end,
            target_start: *target_pos,
            target_end,
        });
        *source_pos = advance(source_end, source_gap)?;
        *target_pos = advance(target_end, target_gap)?;
    }

    if let Some((chain, _, _)) = current {
        result.chains.push(chain);
    }

    Ok(result)
}

/// Parse a chain file from bytes (for testing)
pub fn parse_chain_bytes(data: &[u8]) -> ChainResult<ChainFile> {
    parse_chain_reader(data)
}
