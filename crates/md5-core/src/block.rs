//! The MD5 block compressor.
//!
//! One 64-byte block is interpreted as sixteen little-endian 32-bit words and
//! folded into the four running registers by 64 steps grouped into four
//! 16-step rounds. [`step`] executes a single step and reports everything the
//! step computed besides the registers themselves, so the streaming hasher and
//! the stepwise session share the exact same arithmetic.

/// Initial register values A, B, C, D from RFC 1321 section 3.3.
pub(crate) const INIT: [u32; 4] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476];

/// Sine-derived additive constants: `T[i] = floor(2^32 * |sin(i + 1)|)`.
///
/// Embedded as a fixed table rather than recomputed; an off-by-one in any
/// entry silently breaks conformance with the standard test vectors.
pub(crate) const T: [u32; 64] = [
    0xd76a_a478, 0xe8c7_b756, 0x2420_70db, 0xc1bd_ceee,
    0xf57c_0faf, 0x4787_c62a, 0xa830_4613, 0xfd46_9501,
    0x6980_98d8, 0x8b44_f7af, 0xffff_5bb1, 0x895c_d7be,
    0x6b90_1122, 0xfd98_7193, 0xa679_438e, 0x49b4_0821,
    0xf61e_2562, 0xc040_b340, 0x265e_5a51, 0xe9b6_c7aa,
    0xd62f_105d, 0x0244_1453, 0xd8a1_e681, 0xe7d3_fbc8,
    0x21e1_cde6, 0xc337_07d6, 0xf4d5_0d87, 0x455a_14ed,
    0xa9e3_e905, 0xfcef_a3f8, 0x676f_02d9, 0x8d2a_4c8a,
    0xfffa_3942, 0x8771_f681, 0x6d9d_6122, 0xfde5_380c,
    0xa4be_ea44, 0x4bde_cfa9, 0xf6bb_4b60, 0xbebf_bc70,
    0x289b_7ec6, 0xeaa1_27fa, 0xd4ef_3085, 0x0488_1d05,
    0xd9d4_d039, 0xe6db_99e5, 0x1fa2_7cf8, 0xc4ac_5665,
    0xf429_2244, 0x432a_ff97, 0xab94_23a7, 0xfc93_a039,
    0x655b_59c3, 0x8f0c_cc92, 0xffef_f47d, 0x8584_5dd1,
    0x6fa8_7e4f, 0xfe2c_e6e0, 0xa301_4314, 0x4e08_11a1,
    0xf753_7e82, 0xbd3a_f235, 0x2ad7_d2bb, 0xeb86_d391,
];

/// Per-step left-rotation amounts, four repeating values per round.
pub(crate) const S: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22,
    5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20,
    4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23,
    6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

#[inline]
fn round_f(x: u32, y: u32, z: u32) -> u32 {
    (x & y) | (!x & z)
}

#[inline]
fn round_g(x: u32, y: u32, z: u32) -> u32 {
    (x & z) | (y & !z)
}

#[inline]
fn round_h(x: u32, y: u32, z: u32) -> u32 {
    x ^ y ^ z
}

#[inline]
fn round_i(x: u32, y: u32, z: u32) -> u32 {
    y ^ (x | !z)
}

/// Intermediate values produced by a single compression step.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StepDetail {
    /// Round the step belongs to, 1 through 4.
    pub round: u8,
    /// Output of the round's nonlinear function.
    pub f: u32,
    /// Index of the message word mixed into this step.
    pub word_index: usize,
    /// The additive sum `A + f + T[i] + M[g]` before rotation.
    pub unrotated: u32,
}

/// Reinterprets a 64-byte block as sixteen little-endian words.
pub(crate) fn decode_words(block: &[u8; 64]) -> [u32; 16] {
    let mut words = [0_u32; 16];
    for (word, bytes) in words.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }
    words
}

/// Executes step `index` (0..64) of the compression loop over `working`.
///
/// All additions are modulo 2^32. The caller owns the round structure; this
/// function only derives which round `index` falls in.
pub(crate) fn step(working: &mut [u32; 4], words: &[u32; 16], index: usize) -> StepDetail {
    debug_assert!(index < 64);
    let [a, b, c, d] = *working;

    let (round, f, word_index) = match index {
        0..=15 => (1, round_f(b, c, d), index),
        16..=31 => (2, round_g(b, c, d), (5 * index + 1) % 16),
        32..=47 => (3, round_h(b, c, d), (3 * index + 5) % 16),
        _ => (4, round_i(b, c, d), (7 * index) % 16),
    };

    let unrotated = a
        .wrapping_add(f)
        .wrapping_add(T[index])
        .wrapping_add(words[word_index]);
    *working = [d, b.wrapping_add(unrotated.rotate_left(S[index])), b, c];

    StepDetail {
        round,
        f,
        word_index,
        unrotated,
    }
}

/// Transforms one block: 64 steps, then the working registers are added back
/// into the running state.
pub(crate) fn compress(state: &mut [u32; 4], words: &[u32; 16]) {
    let mut working = *state;
    for index in 0..64 {
        step(&mut working, words, index);
    }
    for (register, value) in state.iter_mut().zip(working) {
        *register = register.wrapping_add(value);
    }
}
