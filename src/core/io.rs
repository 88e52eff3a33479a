//! Input streams
//!
//! Opens plain, gzip (including BGZF) and bzip2 files behind one `BufRead`,
//! with an optional progress bar over the raw bytes read from disk.

use bzip2::read::BzDecoder;
use flate2::read::MultiGzDecoder;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Default buffer size for BufReader (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Compression format of an input stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip or BGZF compressed (.gz)
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

impl CompressionFormat {
    /// Detect the format from the first bytes of a stream
    ///
    /// - gzip magic bytes (1f 8b)
    /// - bzip2 magic bytes "BZh" (42 5a 68)
    pub fn from_magic(magic: &[u8]) -> Self {
        if magic.len() >= 2 && magic[0] == 0x1f && magic[1] == 0x8b {
            CompressionFormat::Gzip
        } else if magic.len() >= 3 && &magic[..3] == b"BZh" {
            CompressionFormat::Bzip2
        } else {
            CompressionFormat::Plain
        }
    }
}

/// A decompressed, buffered input stream
///
/// Owns the file handle and decoder for the duration of one import; both are
/// released when the `Input` is dropped, whichever way the import ends.
pub struct Input {
    reader: Box<dyn BufRead>,
    format: CompressionFormat,
    progress: Option<ProgressBar>,
}

impl Input {
    /// Open a file, detecting its compression from the content
    pub fn open<P: AsRef<Path>>(path: P, show_progress: bool) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;

        if show_progress {
            let size = file.metadata()?.len();
            let bar = progress_bar(size, &path.as_ref().display().to_string());
            let mut input = Self::from_reader(bar.wrap_read(file))?;
            input.progress = Some(bar);
            Ok(input)
        } else {
            Self::from_reader(file)
        }
    }

    /// Wrap an arbitrary byte stream, detecting its compression
    pub fn from_reader<R: Read + 'static>(reader: R) -> io::Result<Self> {
        let mut raw = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, reader);
        let format = CompressionFormat::from_magic(raw.fill_buf()?);

        let reader: Box<dyn BufRead> = match format {
            CompressionFormat::Gzip => Box::new(BufReader::with_capacity(
                DEFAULT_BUFFER_SIZE,
                MultiGzDecoder::new(raw),
            )),
            CompressionFormat::Bzip2 => Box::new(BufReader::with_capacity(
                DEFAULT_BUFFER_SIZE,
                BzDecoder::new(raw),
            )),
            CompressionFormat::Plain => Box::new(raw),
        };

        Ok(Self {
            reader,
            format,
            progress: None,
        })
    }

    /// Compression detected at open time
    pub fn format(&self) -> CompressionFormat {
        self.format
    }

    /// Mark the progress bar complete
    pub fn finish(&mut self) {
        if let Some(bar) = self.progress.take() {
            bar.finish();
        }
    }
}

impl Drop for Input {
    fn drop(&mut self) {
        // Only reached with a live bar when the import bailed out early
        if let Some(bar) = self.progress.take() {
            bar.abandon();
        }
    }
}

impl Read for Input {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for Input {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

fn progress_bar(total_bytes: u64, label: &str) -> ProgressBar {
    let bar = ProgressBar::new(total_bytes);
    bar.set_draw_target(ProgressDrawTarget::stderr());
    let style = ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    bar.set_style(style);
    bar.set_message(label.to_string());
    bar
}

/// Line iterator that reuses a buffer to avoid allocations
pub struct LineIterator<R: BufRead> {
    reader: R,
    buffer: String,
    line_number: usize,
}

impl<R: BufRead> LineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::with_capacity(1024),
            line_number: 0,
        }
    }

    /// Read the next line into the internal buffer
    /// Returns None at EOF, Some(Ok(&str)) on success, Some(Err) on error
    pub fn next_line(&mut self) -> Option<io::Result<&str>> {
        self.buffer.clear();
        match self.reader.read_line(&mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                if self.buffer.ends_with('\n') {
                    self.buffer.pop();
                    if self.buffer.ends_with('\r') {
                        self.buffer.pop();
                    }
                }
                Some(Ok(&self.buffer))
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// 1-based number of the line last returned
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}
