//! Lazy, encoding-aware line reading.
//!
//! [`Lines`] decodes a byte stream with a named encoding and yields one line
//! at a time with its terminator stripped. Decoding is strict: bytes that are
//! not valid in the declared encoding end the stream with an error instead of
//! being replaced.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use encoding_rs::{Decoder, DecoderResult, Encoding};

use crate::error::Error;
use crate::Result;

const CHUNK_SIZE: usize = 8 * 1024;

/// Look up an encoding by label (`"UTF-8"`, `"utf-16le"`, `"windows-1251"`, ...).
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
}

/// Open `path` and stream its lines decoded with `encoding`.
///
/// The file stays open until the returned iterator is dropped.
pub fn lines(path: impl AsRef<Path>, encoding: &str) -> Result<Lines<File>> {
    let path = path.as_ref();
    let encoding = resolve_encoding(encoding)?;
    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Lines::new(file, encoding, path))
}

/// Iterator over the decoded lines of a reader.
///
/// Recognized terminators are `\n`, `\r\n` and a lone `\r`. A terminator at
/// the very end does not produce an extra empty line. After the first error
/// the iterator is exhausted.
pub struct Lines<R: Read> {
    reader: R,
    origin: PathBuf,
    encoding: &'static Encoding,
    decoder: Decoder,
    chunk: Box<[u8]>,
    pending: String,
    cursor: usize,
    // Bytes of `pending` already searched for a terminator
    scanned: usize,
    eof: bool,
    done: bool,
}

impl<R: Read> Lines<R> {
    /// Stream lines from any reader. `origin` names the source in errors.
    pub fn from_reader(reader: R, encoding: &str, origin: impl AsRef<Path>) -> Result<Self> {
        let encoding = resolve_encoding(encoding)?;
        Ok(Self::new(reader, encoding, origin.as_ref()))
    }

    fn new(reader: R, encoding: &'static Encoding, origin: &Path) -> Self {
        Self {
            reader,
            origin: origin.to_path_buf(),
            encoding,
            decoder: encoding.new_decoder_with_bom_removal(),
            chunk: vec![0; CHUNK_SIZE].into_boxed_slice(),
            pending: String::new(),
            cursor: 0,
            scanned: 0,
            eof: false,
            done: false,
        }
    }

    /// Split the next complete line off the decoded buffer.
    ///
    /// The search resumes where the previous one stopped, so a line spread
    /// over many chunks is scanned once.
    fn take_line(&mut self) -> Option<String> {
        let start = self.scanned.max(self.cursor);
        let Some(offset) = self.pending[start..].find(|c: char| c == '\n' || c == '\r') else {
            self.scanned = self.pending.len();
            return None;
        };
        let end = start + offset;

        let bytes = self.pending.as_bytes();
        let terminator_len = if bytes[end] == b'\n' {
            1
        } else {
            match bytes.get(end + 1).copied() {
                Some(b'\n') => 2,
                Some(_) => 1,
                // A trailing '\r' may still be followed by '\n'
                None if !self.eof => {
                    self.scanned = end;
                    return None;
                }
                None => 1,
            }
        };

        let line = self.pending[self.cursor..end].to_string();
        self.cursor = end + terminator_len;
        self.scanned = self.cursor;
        Some(line)
    }

    /// Read and decode the next chunk into the pending buffer.
    fn fill(&mut self) -> Result<()> {
        self.pending.replace_range(..self.cursor, "");
        self.scanned = self.scanned.saturating_sub(self.cursor);
        self.cursor = 0;

        let read = loop {
            match self.reader.read(&mut self.chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(Error::FileRead {
                        path: self.origin.clone(),
                        source: e,
                    })
                }
            }
        };

        self.eof = read == 0;
        let decoded = decode_into(
            &mut self.decoder,
            &self.chunk[..read],
            &mut self.pending,
            self.eof,
        );

        if decoded {
            Ok(())
        } else {
            Err(Error::Decode {
                path: self.origin.clone(),
                encoding: self.encoding.name().to_string(),
            })
        }
    }
}

impl<R: Read> Iterator for Lines<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if let Some(line) = self.take_line() {
                return Some(Ok(line));
            }

            if self.eof {
                self.done = true;
                if self.cursor < self.pending.len() {
                    let line = self.pending[self.cursor..].to_string();
                    self.cursor = self.pending.len();
                    return Some(Ok(line));
                }
                return None;
            }

            if let Err(e) = self.fill() {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}

/// Decode `src` into `dst`, growing it as needed. Returns `false` on
/// malformed input.
fn decode_into(decoder: &mut Decoder, mut src: &[u8], dst: &mut String, last: bool) -> bool {
    loop {
        let needed = decoder
            .max_utf8_buffer_length_without_replacement(src.len())
            .unwrap_or(src.len() * 3 + 16);
        dst.reserve(needed);

        let (result, read) = decoder.decode_to_string_without_replacement(src, dst, last);
        src = &src[read..];

        match result {
            DecoderResult::InputEmpty => return true,
            DecoderResult::OutputFull => continue,
            DecoderResult::Malformed(_, _) => return false,
        }
    }
}
