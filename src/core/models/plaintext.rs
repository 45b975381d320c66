use std::io::{self, Read};

use crate::core::errors::{Result, ToolkitError};

/// Size of each chunk handed out by [`PlaintextResult::from_reader`].
pub const CHUNK_SIZE: usize = 8 * 1024;

/// A fallible sequence of plaintext byte chunks, in delivery order.
pub type ChunkStream = Box<dyn Iterator<Item = io::Result<Vec<u8>>> + Send>;

/// Plaintext as delivered by a backend: either whole, or in chunks.
pub enum PlaintextResult {
    Complete(String),
    Incremental(ChunkStream),
}

impl PlaintextResult {
    /// Deliver the contents of `reader` as an incremental result.
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        Self::Incremental(Box::new(ReadChunks {
            reader,
            done: false,
        }))
    }

    /// Collapse the result into one string.
    ///
    /// Chunks are decoded as UTF-8 with state carried across chunk
    /// boundaries. Invalid sequences become U+FFFD. A chunk error aborts
    /// with `StreamConsumption`.
    pub fn into_string(self) -> Result<String> {
        match self {
            Self::Complete(text) => Ok(text),
            Self::Incremental(chunks) => {
                let mut decoder = Utf8StreamDecoder::default();
                let mut out = String::new();
                for (index, chunk) in chunks.enumerate() {
                    let chunk = chunk.map_err(|e| ToolkitError::StreamConsumption {
                        reason: format!("chunk {} could not be read: {e}", index + 1),
                    })?;
                    decoder.decode(&chunk, &mut out);
                }
                decoder.finish(&mut out);
                Ok(out)
            }
        }
    }
}

impl std::fmt::Debug for PlaintextResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete(text) => write!(f, "Complete({} bytes)", text.len()),
            Self::Incremental(_) => write!(f, "Incremental(..)"),
        }
    }
}

/// UTF-8 decoder that keeps an incomplete trailing sequence
/// until the next chunk arrives.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    /// Decode `chunk`, appending complete characters to `out`.
    pub fn decode(&mut self, chunk: &[u8], out: &mut String) {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut start = 0;
        loop {
            match std::str::from_utf8(&bytes[start..]) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let end = start + e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&bytes[start..end]));
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            start = end + len;
                        }
                        // Sequence cut by the chunk boundary.
                        None => {
                            self.pending = bytes[end..].to_vec();
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Flush at end of stream. A dangling partial sequence becomes U+FFFD.
    pub fn finish(&mut self, out: &mut String) {
        if !self.pending.is_empty() {
            out.push(char::REPLACEMENT_CHARACTER);
            self.pending.clear();
        }
    }
}

struct ReadChunks<R> {
    reader: R,
    done: bool,
}

impl<R: Read> Iterator for ReadChunks<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(n) => {
                    buf.truncate(n);
                    return Some(Ok(buf));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
