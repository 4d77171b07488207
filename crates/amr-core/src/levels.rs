// ─────────────────────────────────────────────────────────────────────
// AMR Snapshot Analysis — Level Index
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Refinement level of every patch, derived from per-level patch counts.
//!
//! `npatch[l]` is the number of patches at level `l`. The base grid is always
//! a single patch at global index 0, so `npatch[0]` is read as 1 whatever it
//! holds (dumps that do not count the base grid store 0 there).

use std::ops::Range;

/// Level of each global patch index: `[0, 1 × npatch[1], 2 × npatch[2], ...]`.
pub fn levels_of(npatch: &[usize]) -> Vec<usize> {
    let mut levels = Vec::with_capacity(total_patches(npatch));
    levels.push(0);
    for (level, &count) in npatch.iter().enumerate().skip(1) {
        levels.extend(std::iter::repeat(level).take(count));
    }
    levels
}

/// Base grid plus every refinement patch.
pub fn total_patches(npatch: &[usize]) -> usize {
    1 + npatch.iter().skip(1).sum::<usize>()
}

/// Global indices occupied by `level`. Empty past the last level.
pub fn level_range(npatch: &[usize], level: usize) -> Range<usize> {
    if level == 0 {
        return 0..1;
    }
    if level >= npatch.len() {
        let n = total_patches(npatch);
        return n..n;
    }
    let start = 1 + npatch[1..level].iter().sum::<usize>();
    start..start + npatch[level]
}

/// Finest level that holds at least one patch.
pub fn max_level(npatch: &[usize]) -> usize {
    npatch
        .iter()
        .enumerate()
        .skip(1)
        .filter(|&(_, &count)| count > 0)
        .map(|(level, _)| level)
        .max()
        .unwrap_or(0)
}
