//! VCF record reader
//!
//! Reads the eight fixed VCF columns of each data line. Genotype columns are
//! ignored and header lines are skipped. INFO values are decoded on demand
//! through typed accessors so callers can tell an absent field from one that
//! holds garbage.

use crate::core::error::{FieldError, VcfParseError};
use crate::core::io::LineIterator;
use memchr::memchr;
use std::collections::HashMap;
use std::io::BufRead;

/// Number of mandatory VCF columns (CHROM..INFO)
const FIXED_FIELDS: usize = 8;

/// One VCF data line
#[derive(Debug, Clone, PartialEq)]
pub struct VcfRecord {
    pub chrom: String,
    /// 1-based position
    pub pos: u64,
    /// Raw ID column, possibly several identifiers
    pub id: String,
    pub reference: String,
    /// ALT alleles, empty when the column is `.`
    pub alternates: Vec<String>,
    pub filter: String,
    pub info: Info,
}

impl VcfRecord {
    /// Parse a tab-separated VCF data line
    ///
    /// `line_number` is only used for error reporting.
    pub fn parse(line: &str, line_number: usize) -> Result<Self, VcfParseError> {
        let bytes = line.as_bytes();
        let mut bounds = Vec::with_capacity(FIXED_FIELDS);
        let mut start = 0;

        while bounds.len() < FIXED_FIELDS {
            match memchr(b'\t', &bytes[start..]) {
                Some(offset) => {
                    bounds.push((start, start + offset));
                    start += offset + 1;
                }
                None => {
                    bounds.push((start, bytes.len()));
                    break;
                }
            }
        }

        if bounds.len() < FIXED_FIELDS {
            return Err(VcfParseError::TooFewFields {
                line: line_number,
                expected: FIXED_FIELDS,
                found: bounds.len(),
            });
        }

        let field = |i: usize| &line[bounds[i].0..bounds[i].1];

        let pos = field(1)
            .parse::<u64>()
            .map_err(|_| VcfParseError::InvalidPosition {
                line: line_number,
                value: field(1).to_string(),
            })?;

        let alternates = match field(4) {
            "." => Vec::new(),
            alt => alt.split(',').map(str::to_string).collect(),
        };

        Ok(Self {
            chrom: field(0).to_string(),
            pos,
            id: field(2).to_string(),
            reference: field(3).to_string(),
            alternates,
            filter: field(6).to_string(),
            info: Info::parse(field(7)),
        })
    }

    /// Whether the record carries exactly one ALT allele
    pub fn is_biallelic(&self) -> bool {
        self.alternates.len() == 1
    }

    /// Whether the record passed all upstream filters
    pub fn is_pass(&self) -> bool {
        self.filter == "PASS"
    }
}

/// Parsed INFO column
///
/// Flags map to `None`, `key=value` pairs to `Some(value)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Info {
    fields: HashMap<String, Option<String>>,
}

impl Info {
    /// Parse an INFO column (`.` yields an empty set)
    pub fn parse(column: &str) -> Self {
        let mut fields = HashMap::new();

        if column != "." {
            for item in column.split(';').filter(|item| !item.is_empty()) {
                match item.split_once('=') {
                    Some((key, value)) => {
                        fields.insert(key.to_string(), Some(value.to_string()));
                    }
                    None => {
                        fields.insert(item.to_string(), None);
                    }
                }
            }
        }

        Self { fields }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Raw value of a `key=value` field
    ///
    /// The VCF missing value `.` counts as absent; a bare flag is not a value.
    fn value(&self, key: &str, expected: &'static str) -> Result<&str, FieldError> {
        match self.fields.get(key) {
            None => Err(missing(key)),
            Some(None) => Err(wrong_type(key, expected, "")),
            Some(Some(value)) if value == "." => Err(missing(key)),
            Some(Some(value)) => Ok(value.as_str()),
        }
    }

    /// Boolean flag
    ///
    /// Absent means false. Also accepts the integer encoding `0`/`1` used by
    /// older dbSNP builds.
    pub fn flag(&self, key: &str) -> Result<bool, FieldError> {
        match self.fields.get(key) {
            None => Ok(false),
            Some(None) => Ok(true),
            Some(Some(value)) => match value.as_str() {
                "1" | "true" | "TRUE" => Ok(true),
                "0" | "false" | "FALSE" => Ok(false),
                other => Err(wrong_type(key, "flag", other)),
            },
        }
    }

    /// String value
    pub fn string(&self, key: &str) -> Result<&str, FieldError> {
        self.value(key, "string")
    }

    /// Single float value
    pub fn float(&self, key: &str) -> Result<f64, FieldError> {
        let value = self.value(key, "float")?;
        value
            .parse::<f64>()
            .map_err(|_| wrong_type(key, "float", value))
    }

    /// Comma-separated float array
    pub fn floats(&self, key: &str) -> Result<Vec<f64>, FieldError> {
        let value = self.value(key, "float array")?;
        value
            .split(',')
            .map(|item| {
                item.parse::<f64>()
                    .map_err(|_| wrong_type(key, "float array", value))
            })
            .collect()
    }

    /// First element of a float array
    pub fn first_float(&self, key: &str) -> Result<f64, FieldError> {
        self.floats(key)?
            .first()
            .copied()
            .ok_or_else(|| missing(key))
    }
}

fn missing(key: &str) -> FieldError {
    FieldError::Missing {
        key: key.to_string(),
    }
}

fn wrong_type(key: &str, expected: &'static str, value: &str) -> FieldError {
    FieldError::WrongType {
        key: key.to_string(),
        expected,
        value: value.to_string(),
    }
}

/// Treat a missing field as `None` while keeping type errors
pub trait OptionalField<T> {
    fn optional(self) -> Result<Option<T>, FieldError>;
}

impl<T> OptionalField<T> for Result<T, FieldError> {
    fn optional(self) -> Result<Option<T>, FieldError> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_missing() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Streaming reader over VCF data lines
pub struct VcfReader<R: BufRead> {
    lines: LineIterator<R>,
}

impl<R: BufRead> VcfReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: LineIterator::new(reader),
        }
    }
}

impl<R: BufRead> Iterator for VcfReader<R> {
    type Item = Result<VcfRecord, VcfParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line_number = self.lines.line_number() + 1;
            let line = match self.lines.next_line()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            return Some(VcfRecord::parse(line, line_number));
        }
    }
}
