//! Composing a full dictionary record — `surface ∥ sep ∥ delta ∥ sep
//! ∥ tag` — from a (surface, lemma, tag) triple, the public entry
//! points a dictionary compiler calls before inserting bytes into its
//! automaton.
//!
//! The byte-level variants ([`standard_encode`] and friends) take
//! `surface`/`lemma`/`tag` already expressed in the dictionary's
//! declared charset. The `_utf8` variants take ordinary Rust `&str`
//! and work purely in UTF-8 bytes throughout; because the delta codec
//! only ever slices and concatenates byte strings, never inspects
//! them as text, it does not matter that a slice boundary computed by
//! [`crate::codec::common_prefix_len`] might fall in the middle of a
//! multi-byte character. The final `String` conversion is always
//! `encoding_rs`'s total decode, so it never fails even when that
//! happens — what the original encoders reached for a synthetic
//! one-byte-per-character charset to guarantee, a byte-oriented
//! implementation gets for free.

use crate::codec;
use crate::error::{Result, SeparatorInFieldError};
use crate::features::Features;
use snafu::ensure;

fn check_no_separator(field: &'static str, bytes: &[u8], separator: u8) -> Result<()> {
    ensure!(
        !bytes.contains(&separator),
        SeparatorInFieldError { field, separator }
    );
    Ok(())
}

fn compose(surface: &[u8], delta: &[u8], tag: &[u8], separator: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(surface.len() + delta.len() + tag.len() + 2);
    out.extend_from_slice(surface);
    out.push(separator);
    out.extend_from_slice(delta);
    out.push(separator);
    out.extend_from_slice(tag);
    out
}

fn encode_record(
    scheme: codec::Scheme,
    surface: &[u8],
    lemma: &[u8],
    tag: &[u8],
    features: &Features,
) -> Result<String> {
    let sep = features.separator();
    check_no_separator("surface", surface, sep)?;
    check_no_separator("lemma", lemma, sep)?;
    check_no_separator("tag", tag, sep)?;
    let delta = codec::encode(scheme, surface, lemma)?;
    let record = compose(surface, &delta, tag, sep);
    Ok(features.decode_bytes(&record))
}

/// Composes a standard-scheme record. `form`, `lemma` and `tag` are
/// bytes already in `features`'s declared charset.
pub fn standard_encode(form: &[u8], lemma: &[u8], tag: &[u8], features: &Features) -> Result<String> {
    encode_record(codec::Scheme::Standard, form, lemma, tag, features)
}

/// Composes a prefix-scheme record.
pub fn prefix_encode(form: &[u8], lemma: &[u8], tag: &[u8], features: &Features) -> Result<String> {
    encode_record(codec::Scheme::Prefix, form, lemma, tag, features)
}

/// Composes an infix-scheme record.
pub fn infix_encode(form: &[u8], lemma: &[u8], tag: &[u8], features: &Features) -> Result<String> {
    encode_record(codec::Scheme::Infix, form, lemma, tag, features)
}

/// [`standard_encode`] for genuine UTF-8 `&str` inputs.
pub fn standard_encode_utf8(form: &str, lemma: &str, tag: &str, features: &Features) -> Result<String> {
    encode_record(
        codec::Scheme::Standard,
        form.as_bytes(),
        lemma.as_bytes(),
        tag.as_bytes(),
        features,
    )
}

/// [`prefix_encode`] for genuine UTF-8 `&str` inputs.
pub fn prefix_encode_utf8(form: &str, lemma: &str, tag: &str, features: &Features) -> Result<String> {
    encode_record(
        codec::Scheme::Prefix,
        form.as_bytes(),
        lemma.as_bytes(),
        tag.as_bytes(),
        features,
    )
}

/// [`infix_encode`] for genuine UTF-8 `&str` inputs.
pub fn infix_encode_utf8(form: &str, lemma: &str, tag: &str, features: &Features) -> Result<String> {
    encode_record(
        codec::Scheme::Infix,
        form.as_bytes(),
        lemma.as_bytes(),
        tag.as_bytes(),
        features,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_encode_composes_surface_delta_tag() {
        let features = Features::new("UTF-8", b'+', false, false).unwrap();
        let record = standard_encode(b"cats", b"cat", b"N", &features).unwrap();
        // delta is offset_to_byte(1) == 'B', so: "cats" + '+' + "B" + '+' + "N"
        assert_eq!(record, "cats+B+N");
    }

    #[test]
    fn utf8_variant_round_trips_multibyte_lemma() {
        let features = Features::new("UTF-8", b'+', true, true).unwrap();
        let record = infix_encode_utf8("\u{304b}\u{304d}\u{3064}", "\u{304b}\u{3064}", "V", &features).unwrap();
        assert!(record.ends_with("+V"));
    }

    #[test]
    fn separator_inside_surface_is_rejected() {
        let features = Features::new("UTF-8", b'+', false, false).unwrap();
        let err = standard_encode(b"ca+t", b"cat", b"N", &features).unwrap_err();
        assert!(matches!(err, crate::Error::SeparatorInField { .. }));
    }
}
