// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Optimal length-limited Huffman codes from symbol frequencies.

use super::huffman::{HUFFMAN_MAX_BITS, HuffmanSpec};

// Depth of the most skewed tree over 257 leaves.
const MAX_TREE_DEPTH: usize = 256;
const RESERVED: usize = 256;

/// Builds the code lengths of an optimal prefix code for `freqs`, limited to
/// 16 bits. A pseudo-symbol with frequency one takes part in the
/// construction and is removed at the end, so no real symbol is assigned
/// the all-ones code.
///
/// Symbols with zero frequency get no code. If every frequency is zero,
/// symbol 0 gets the single one-bit code.
pub fn optimal_spec(freqs: &[u64; 256]) -> HuffmanSpec {
    let mut freq = [0u64; 257];
    freq[..256].copy_from_slice(freqs);
    if freq.iter().all(|&f| f == 0) {
        freq[0] = 1;
    }
    freq[RESERVED] = 1;

    let mut code_size = [0usize; 257];
    // Next symbol in the chain of symbols sharing a subtree.
    let mut others = [None::<usize>; 257];

    loop {
        // Smallest nonzero frequency, preferring the larger index on ties.
        let Some(c1) = smallest(&freq, None) else {
            break;
        };
        let Some(c2) = smallest(&freq, Some(c1)) else {
            break;
        };
        freq[c1] += freq[c2];
        freq[c2] = 0;

        let mut c = c1;
        code_size[c] += 1;
        while let Some(next) = others[c] {
            c = next;
            code_size[c] += 1;
        }
        others[c] = Some(c2);

        let mut c = c2;
        code_size[c] += 1;
        while let Some(next) = others[c] {
            c = next;
            code_size[c] += 1;
        }
    }

    let mut counts = [0usize; MAX_TREE_DEPTH + 1];
    for &size in &code_size {
        if size > 0 {
            counts[size] += 1;
        }
    }

    // Move overlong codes up: a pair at depth i becomes one code at i - 1
    // plus a split of the deepest shorter leaf.
    for i in (HUFFMAN_MAX_BITS + 1..=MAX_TREE_DEPTH).rev() {
        while counts[i] > 0 {
            let mut j = i - 2;
            while counts[j] == 0 {
                j -= 1;
            }
            counts[i] -= 2;
            counts[i - 1] += 1;
            counts[j + 1] += 2;
            counts[j] -= 1;
        }
    }

    // Drop the reserved code, which is one of the longest.
    let mut longest = HUFFMAN_MAX_BITS;
    while counts[longest] == 0 {
        longest -= 1;
    }
    counts[longest] -= 1;

    let mut spec_counts = [0u8; HUFFMAN_MAX_BITS];
    for len in 1..=HUFFMAN_MAX_BITS {
        spec_counts[len - 1] = counts[len] as u8;
    }
    let mut symbols = Vec::new();
    for size in 1..=MAX_TREE_DEPTH {
        for symbol in 0..256 {
            if code_size[symbol] == size {
                symbols.push(symbol as u8);
            }
        }
    }
    HuffmanSpec {
        counts: spec_counts,
        symbols,
    }
}

fn smallest(freq: &[u64; 257], exclude: Option<usize>) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &f) in freq.iter().enumerate() {
        if f == 0 || Some(i) == exclude {
            continue;
        }
        if best.is_none_or(|b| f <= freq[b]) {
            best = Some(i);
        }
    }
    best
}
