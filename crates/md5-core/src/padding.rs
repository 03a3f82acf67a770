//! Message padding and framing.
//!
//! MD5 frames a message by appending a single `0x80` terminator byte, zero
//! bytes until the length is congruent to 56 modulo 64, and finally the
//! original length in bits as an unsigned 64-bit little-endian integer. A
//! tail longer than 55 bytes cannot fit the terminator and trailer in one
//! block, so framing spills into a second block; an input that is already a
//! multiple of 64 bytes gains a full extra padding block because the
//! terminator always has somewhere to live.

use crate::block::decode_words;

/// Frames the final partial window of a message.
///
/// `tail` holds the trailing bytes that did not fill a whole block (possibly
/// empty, always shorter than 64 bytes) and `total_len` is the byte length of
/// the entire message. Returns one or two terminal blocks; the second is only
/// meaningful when the returned count is 2.
pub(crate) fn final_blocks(tail: &[u8], total_len: u64) -> ([[u8; 64]; 2], usize) {
    debug_assert!(tail.len() < 64);

    let count = if tail.len() <= 55 { 1 } else { 2 };
    let mut flat = [0_u8; 128];
    flat[..tail.len()].copy_from_slice(tail);
    flat[tail.len()] = 0x80;

    // Bit length modulo 2^64, matching the algorithm's length field.
    let bit_len = total_len.wrapping_mul(8);
    let end = count * 64;
    flat[end - 8..end].copy_from_slice(&bit_len.to_le_bytes());

    let mut blocks = [[0_u8; 64]; 2];
    blocks[0].copy_from_slice(&flat[..64]);
    if count == 2 {
        blocks[1].copy_from_slice(&flat[64..128]);
    }
    (blocks, count)
}

/// Pads a whole message into its complete block sequence, decoded to words.
///
/// This is the framing path used by the stepwise session, which needs every
/// block up front before stepping begins.
pub(crate) fn pad_message(data: &[u8]) -> Vec<[u32; 16]> {
    let mut blocks = Vec::with_capacity(data.len() / 64 + 2);
    let mut chunks = data.chunks_exact(64);
    for chunk in chunks.by_ref() {
        let mut block = [0_u8; 64];
        block.copy_from_slice(chunk);
        blocks.push(decode_words(&block));
    }

    let (tail_blocks, count) = final_blocks(chunks.remainder(), data.len() as u64);
    for block in &tail_blocks[..count] {
        blocks.push(decode_words(block));
    }
    blocks
}
