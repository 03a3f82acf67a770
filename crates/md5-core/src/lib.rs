#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `md5-core` is a from-scratch MD5 digest engine. It exposes a streaming
//! hasher ([`Md5`]) that consumes byte slices or arbitrary readers without
//! requiring the whole input in memory, plus a resumable stepwise session
//! ([`Stepper`]) that executes the same arithmetic one compression step per
//! call and surfaces every intermediate value for inspection.
//!
//! # Design
//!
//! - [`Digest`] wraps the 16-byte output and renders it as 32 lowercase hex
//!   characters: each 32-bit register serialized little-endian, registers
//!   concatenated A‖B‖C‖D.
//! - The block compressor and the stepwise session share a single per-step
//!   function, so a driven-to-completion [`Stepper`] reproduces exactly what
//!   a plain [`Md5::digest`] call computes internally.
//! - Chunk boundaries are a buffering detail: feeding the same bytes through
//!   any sequence of [`Md5::update`] calls yields the same digest.
//!
//! # Errors
//!
//! Pure hashing cannot fail. [`Md5::from_reader`] and [`hash_file`] surface
//! [`std::io::Error`] from the underlying source and return no partial
//! digest.
//!
//! MD5 is used here as a fast non-cryptographic digest; it offers no
//! collision resistance and must not guard anything security-sensitive.
//!
//! # Examples
//!
//! ```
//! use md5_core::Md5;
//!
//! let digest = Md5::digest(b"abc");
//! assert_eq!(digest.to_hex(), "900150983cd24fb0d6963f7d28e17f72");
//! ```

mod block;
mod padding;
mod stepper;

pub use stepper::{StepOutcome, StepRecord, Stepper};

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// A finished 128-bit MD5 digest.
///
/// Immutable once produced. The canonical rendering is 32 lowercase hex
/// characters with no separators or prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; 16]);

impl Digest {
    /// Number of bytes in a digest.
    pub const LEN: usize = 16;

    pub(crate) fn from_state(state: [u32; 4]) -> Self {
        let mut bytes = [0_u8; 16];
        for (slot, register) in bytes.chunks_exact_mut(4).zip(state) {
            slot.copy_from_slice(&register.to_le_bytes());
        }
        Self(bytes)
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Renders the digest as its canonical 32-character lowercase hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({self})")
    }
}

impl From<Digest> for [u8; 16] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

/// Streaming MD5 hasher.
///
/// Buffers at most one partial block; full blocks are compressed as soon as
/// they are available, so inputs of any length stream through a fixed-size
/// working set.
#[derive(Clone, Debug)]
pub struct Md5 {
    state: [u32; 4],
    buffer: [u8; 64],
    buffer_len: usize,
    total_len: u64,
}

impl Default for Md5 {
    fn default() -> Self {
        Self::new()
    }
}

impl Md5 {
    /// Creates a hasher with an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: block::INIT,
            buffer: [0_u8; 64],
            buffer_len: 0,
            total_len: 0,
        }
    }

    /// Feeds additional bytes into the digest state.
    pub fn update(&mut self, data: &[u8]) {
        self.total_len = self.total_len.wrapping_add(data.len() as u64);
        let mut rest = data;

        // Top up a partial block first.
        if self.buffer_len > 0 {
            let take = rest.len().min(64 - self.buffer_len);
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&rest[..take]);
            self.buffer_len += take;
            rest = &rest[take..];
            if self.buffer_len < 64 {
                return;
            }
            let words = block::decode_words(&self.buffer);
            block::compress(&mut self.state, &words);
            self.buffer_len = 0;
        }

        let mut chunks = rest.chunks_exact(64);
        for chunk in chunks.by_ref() {
            let mut full = [0_u8; 64];
            full.copy_from_slice(chunk);
            let words = block::decode_words(&full);
            block::compress(&mut self.state, &words);
        }

        let remainder = chunks.remainder();
        self.buffer[..remainder.len()].copy_from_slice(remainder);
        self.buffer_len = remainder.len();
    }

    /// Finalises the digest, framing the buffered tail.
    #[must_use]
    pub fn finalize(mut self) -> Digest {
        let (blocks, count) = padding::final_blocks(&self.buffer[..self.buffer_len], self.total_len);
        for tail in &blocks[..count] {
            let words = block::decode_words(tail);
            block::compress(&mut self.state, &words);
        }
        Digest::from_state(self.state)
    }

    /// Computes the digest of `data` in one shot.
    #[must_use]
    pub fn digest(data: &[u8]) -> Digest {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }

    /// Consumes `reader` to exhaustion and returns its digest.
    ///
    /// Reads in fixed windows; the whole input is never resident at once.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Digest> {
        let mut hasher = Self::new();
        let mut window = [0_u8; 65536];
        loop {
            match reader.read(&mut window) {
                Ok(0) => break,
                Ok(n) => hasher.update(&window[..n]),
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) => return Err(error),
            }
        }
        Ok(hasher.finalize())
    }
}

/// Computes the digest of the file at `path`.
///
/// Fails with the underlying [`io::Error`] if the file cannot be opened or
/// read; no partial digest is returned.
pub fn hash_file<P: AsRef<Path>>(path: P) -> io::Result<Digest> {
    let file = File::open(path)?;
    Md5::from_reader(file)
}
