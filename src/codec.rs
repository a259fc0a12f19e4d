//! The delta codec: encoding a lemma as a short hop away from a
//! surface form, and decoding it back.
//!
//! Every scheme emits a handful of control bytes followed by a
//! literal suffix. A control byte is an offset (a byte count) added
//! to `'A'`, so offsets travel as printable ASCII when the dictionary
//! happens to be text. [`encode_standard`] only ever strips a suffix
//! and appends a new one; [`encode_prefix`] additionally allows
//! stripping a short prefix; [`encode_infix`] additionally allows
//! deleting a short run in the middle. All three degrade to the same
//! [`decode`] contract, dispatched on what the dictionary's
//! [`crate::Features`] says is active.

use crate::error::{OffsetOverflowError, Result};
use crate::features::Features;

/// Offsets are stored as `'A' + offset`; 190 is the largest offset
/// that still fits in a byte alongside `'A'` (65) without running
/// past 255.
const MAX_OFFSET: usize = 190;
const CONTROL_BASE: u8 = b'A';

/// Longest prefix/infix offset this implementation will search for.
/// Matches the search bound morfologik-style delta coding uses: a
/// candidate further out than this is not worth a control byte.
const MAX_AFFIX_SEARCH: usize = 3;

/// How a dictionary is allowed to relate a surface form to its
/// lemma. `Infix` is a strict superset of `Prefix`, which is a strict
/// superset of `Standard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Standard,
    Prefix,
    Infix,
}

fn offset_to_byte(offset: usize) -> Result<u8> {
    if offset > MAX_OFFSET {
        return OffsetOverflowError { offset }.fail();
    }
    Ok(CONTROL_BASE + offset as u8)
}

/// Inverse of [`offset_to_byte`]. Bytes below `'A'` wrap around to an
/// offset far larger than any real surface form, which is exactly
/// what we want: every decode guard below rejects it as out of range
/// and falls back to treating the record as raw.
fn byte_to_offset(byte: u8) -> usize {
    byte.wrapping_sub(CONTROL_BASE) as usize
}

/// Length of the longest common byte prefix of `a` and `b`.
pub fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Standard encoding: strip a suffix of the surface form, append a
/// literal replacement.
pub fn encode_standard(surface: &[u8], lemma: &[u8]) -> Result<Vec<u8>> {
    let l = surface.len();
    let p = common_prefix_len(surface, lemma);
    let k = l - p;
    let mut out = Vec::with_capacity(1 + lemma.len() - p);
    out.push(offset_to_byte(k)?);
    out.extend_from_slice(&lemma[p..]);
    Ok(out)
}

/// Smallest `i` in `1..=min(len, MAX_AFFIX_SEARCH)` for which
/// `surface[i..]` shares more than two bytes with `lemma`, along with
/// that shared length. Used by both the prefix and infix schemes to
/// look for a lemma that is better reached by skipping a short
/// surface prefix outright.
fn find_prefix_candidate(surface: &[u8], lemma: &[u8]) -> Option<(usize, usize)> {
    let bound = surface.len().min(MAX_AFFIX_SEARCH);
    for i in 1..=bound {
        let p = common_prefix_len(&surface[i..], lemma);
        if p > 2 {
            return Some((i, p));
        }
    }
    None
}

/// Prefix encoding: additionally allows a short surface prefix to be
/// dropped before the standard suffix rule applies.
pub fn encode_prefix(surface: &[u8], lemma: &[u8]) -> Result<Vec<u8>> {
    let l = surface.len();
    let p = common_prefix_len(surface, lemma);
    if p > 0 {
        let k = l - p;
        let mut out = Vec::with_capacity(2 + lemma.len() - p);
        out.push(CONTROL_BASE);
        out.push(offset_to_byte(k)?);
        out.extend_from_slice(&lemma[p..]);
        return Ok(out);
    }
    match find_prefix_candidate(surface, lemma) {
        Some((i, pi)) => {
            let mut out = Vec::with_capacity(2 + lemma.len() - pi);
            out.push(offset_to_byte(i)?);
            out.push(offset_to_byte(l - i - pi)?);
            out.extend_from_slice(&lemma[pi..]);
            Ok(out)
        }
        None => {
            let mut out = Vec::with_capacity(2 + lemma.len());
            out.push(CONTROL_BASE);
            out.push(offset_to_byte(l)?);
            out.extend_from_slice(lemma);
            Ok(out)
        }
    }
}

/// Looks, past the shared prefix `p`, for a short deleted run: the
/// smallest offset `j` (up to `MAX_AFFIX_SEARCH` bytes past `p`) after
/// which the surface form and the lemma line back up, preferring
/// whichever `j` buys back the most shared length.
fn find_infix_candidate(surface: &[u8], lemma: &[u8], p: usize) -> Option<(usize, usize)> {
    let l = surface.len();
    let bound = (l - p).min(MAX_AFFIX_SEARCH);
    let mut best: Option<(usize, usize)> = None;
    for j in 1..=bound {
        let p2 = common_prefix_len(&surface[p + j..], &lemma[p..]);
        if p2 > 0 && best.map_or(true, |(_, best_p2)| p2 > best_p2) {
            best = Some((j, p2));
        }
    }
    best
}

/// Infix encoding: additionally allows a short run in the interior of
/// the surface form to be deleted.
pub fn encode_infix(surface: &[u8], lemma: &[u8]) -> Result<Vec<u8>> {
    let l = surface.len();
    let p = common_prefix_len(surface, lemma);
    let i_candidate = find_prefix_candidate(surface, lemma);

    if p == 0 {
        return match i_candidate {
            Some((istar, p1)) => {
                let mut out = Vec::with_capacity(3 + lemma.len() - p1);
                out.push(CONTROL_BASE);
                out.push(offset_to_byte(istar)?);
                out.push(offset_to_byte(l - istar - p1)?);
                out.extend_from_slice(&lemma[p1..]);
                Ok(out)
            }
            None => {
                let mut out = Vec::with_capacity(3 + lemma.len());
                out.push(CONTROL_BASE);
                out.push(CONTROL_BASE);
                out.push(offset_to_byte(l)?);
                out.extend_from_slice(lemma);
                Ok(out)
            }
        };
    }

    let j_candidate = find_infix_candidate(surface, lemma, p);
    let j_star = j_candidate.map_or(0, |(j, _)| j);

    if let Some((istar, p1)) = i_candidate {
        if p1 > p && istar > j_star {
            let mut out = Vec::with_capacity(3 + lemma.len() - p1);
            out.push(CONTROL_BASE);
            out.push(offset_to_byte(istar)?);
            out.push(offset_to_byte(l - istar - p1)?);
            out.extend_from_slice(&lemma[p1..]);
            return Ok(out);
        }
    }

    if let Some((jstar, p2)) = j_candidate {
        if jstar > 0 && p2 > 0 {
            let mut out = Vec::with_capacity(3 + lemma.len() - p - p2);
            out.push(offset_to_byte(p)?);
            out.push(offset_to_byte(jstar)?);
            out.push(offset_to_byte(l - p - p2 - jstar)?);
            out.extend_from_slice(&lemma[p + p2..]);
            return Ok(out);
        }
    }

    let mut out = Vec::with_capacity(3 + lemma.len() - p);
    out.push(CONTROL_BASE);
    out.push(CONTROL_BASE);
    out.push(offset_to_byte(l - p)?);
    out.extend_from_slice(&lemma[p..]);
    Ok(out)
}

pub fn encode(scheme: Scheme, surface: &[u8], lemma: &[u8]) -> Result<Vec<u8>> {
    match scheme {
        Scheme::Standard => encode_standard(surface, lemma),
        Scheme::Prefix => encode_prefix(surface, lemma),
        Scheme::Infix => encode_infix(surface, lemma),
    }
}

/// Reconstructs the lemma bytes from a delta and the surface form it
/// was coded against. `features` decides which of the three decode
/// rules applies; it is never a per-call choice, since a dictionary
/// only ever writes deltas in the scheme it declared.
///
/// Malformed or foreign deltas (wrong length, offsets that don't fit
/// the surface form) never panic: they fall back to returning the
/// delta bytes unchanged, on the assumption that whatever produced
/// them meant them as a literal lemma.
pub fn decode(delta: &[u8], surface: &[u8], features: &Features) -> Vec<u8> {
    if delta.is_empty() {
        return Vec::new();
    }
    let l = surface.len();
    let k = byte_to_offset(delta[0]);

    if features.uses_infixes() {
        if delta.len() >= 3 {
            let a = byte_to_offset(delta[1]);
            let b = byte_to_offset(delta[2]);
            if k <= l && a <= l - k && b <= l - k - a {
                let mut out = Vec::with_capacity(k + (l - k - a - b) + (delta.len() - 3));
                out.extend_from_slice(&surface[0..k]);
                out.extend_from_slice(&surface[k + a..l - b]);
                out.extend_from_slice(&delta[3..]);
                return out;
            }
        }
    } else if features.uses_prefixes() {
        if delta.len() >= 2 {
            let s = byte_to_offset(delta[1]);
            if k <= l && s <= l - k {
                let mut out = Vec::with_capacity((l - k - s) + (delta.len() - 2));
                out.extend_from_slice(&surface[k..l - s]);
                out.extend_from_slice(&delta[2..]);
                return out;
            }
        }
    } else if k <= l {
        let mut out = Vec::with_capacity((l - k) + (delta.len() - 1));
        out.extend_from_slice(&surface[0..l - k]);
        out.extend_from_slice(&delta[1..]);
        return out;
    }

    delta.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Features;
    use pretty_assertions::assert_eq;

    fn features(scheme: Scheme) -> Features {
        let (uses_prefixes, uses_infixes) = match scheme {
            Scheme::Standard => (false, false),
            Scheme::Prefix => (true, false),
            Scheme::Infix => (true, true),
        };
        Features::new("UTF-8", b'+', uses_prefixes, uses_infixes).unwrap()
    }

    #[test]
    fn common_prefix_len_basic() {
        assert_eq!(common_prefix_len(b"werken", b"werk"), 4);
        assert_eq!(common_prefix_len(b"abc", b"xyz"), 0);
        assert_eq!(common_prefix_len(b"same", b"same"), 4);
    }

    #[test]
    fn standard_round_trip() {
        let surface = b"werken";
        let lemma = b"werk";
        let delta = encode_standard(surface, lemma).unwrap();
        let decoded = decode(&delta, surface, &features(Scheme::Standard));
        assert_eq!(decoded, lemma);
    }

    #[test]
    fn standard_suffix_replacement_round_trip() {
        let surface = b"cats";
        let lemma = b"cat";
        let delta = encode_standard(surface, lemma).unwrap();
        assert_eq!(decode(&delta, surface, &features(Scheme::Standard)), lemma);

        let surface = b"geese";
        let lemma = b"goose";
        let delta = encode_standard(surface, lemma).unwrap();
        assert_eq!(decode(&delta, surface, &features(Scheme::Standard)), lemma);
    }

    #[test]
    fn prefix_round_trip_no_prefix_needed() {
        let surface = b"running";
        let lemma = b"run";
        let delta = encode_prefix(surface, lemma).unwrap();
        assert_eq!(decode(&delta, surface, &features(Scheme::Prefix)), lemma);
    }

    #[test]
    fn prefix_round_trip_with_dropped_prefix() {
        // A reflexive-style surface form carrying a prefix the lemma drops.
        let surface = b"unhappier";
        let lemma = b"happy";
        let delta = encode_prefix(surface, lemma).unwrap();
        assert_eq!(decode(&delta, surface, &features(Scheme::Prefix)), lemma);
    }

    #[test]
    fn prefix_round_trip_disjoint() {
        let surface = b"xyz";
        let lemma = b"abc";
        let delta = encode_prefix(surface, lemma).unwrap();
        assert_eq!(decode(&delta, surface, &features(Scheme::Prefix)), lemma);
    }

    #[test]
    fn infix_round_trip_interior_deletion() {
        // p = cp("ABXYCDE", "ABCDE") = 2; deleting the 2-byte run "XY"
        // right after the shared prefix recovers a further 3-byte match.
        let surface = b"ABXYCDE";
        let lemma = b"ABCDE";
        let delta = encode_infix(surface, lemma).unwrap();
        assert_eq!(delta, b"CCA");
        assert_eq!(decode(&delta, surface, &features(Scheme::Infix)), lemma);
    }

    #[test]
    fn infix_round_trip_falls_back_to_standard_within_prefix() {
        let surface = b"wolves";
        let lemma = b"wolf";
        let delta = encode_infix(surface, lemma).unwrap();
        assert_eq!(decode(&delta, surface, &features(Scheme::Infix)), lemma);
    }

    #[test]
    fn infix_round_trip_disjoint() {
        let surface = b"xyz";
        let lemma = b"abc";
        let delta = encode_infix(surface, lemma).unwrap();
        assert_eq!(decode(&delta, surface, &features(Scheme::Infix)), lemma);
    }

    #[test]
    fn identical_surface_and_lemma_encodes_to_zero_offset() {
        let surface = b"same";
        let lemma = b"same";
        let delta = encode_standard(surface, lemma).unwrap();
        assert_eq!(delta, vec![CONTROL_BASE]);
        assert_eq!(decode(&delta, surface, &features(Scheme::Standard)), lemma);
    }

    #[test]
    fn malformed_delta_falls_back_to_literal() {
        // Offset far larger than the surface form: every guard fails
        // and decode returns the delta bytes unchanged rather than panicking.
        let surface = b"ab";
        let delta = vec![0u8, b'z', b'z'];
        let out = decode(&delta, surface, &features(Scheme::Infix));
        assert_eq!(out, delta);
    }

    #[test]
    fn offset_overflow_is_reported() {
        let surface = vec![b'a'; 300];
        let lemma = b"x".to_vec();
        let err = encode_standard(&surface, &lemma).unwrap_err();
        assert!(matches!(err, crate::Error::OffsetOverflow { .. }));
    }
}
