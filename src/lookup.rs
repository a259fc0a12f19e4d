//! Looking a surface word up against a compiled dictionary.

use tracing::{instrument, warn};

use crate::codec;
use crate::error::Result;
use crate::features::Features;
use crate::fsa::{Fsa, FsaWalker, WalkResult};

/// Walks a dictionary's automaton for a caller, reusing one decode
/// buffer across calls.
///
/// Construction borrows the automaton and its features for the
/// lifetime of the lookup, so a `Lookup` is cheap to build per batch
/// of words and does not own the dictionary itself.
pub struct Lookup<'a> {
    fsa: &'a Fsa,
    features: &'a Features,
    buf: Vec<u8>,
}

impl<'a> Lookup<'a> {
    pub fn new(fsa: &'a Fsa, features: &'a Features) -> Self {
        Lookup {
            fsa,
            features,
            buf: Vec::new(),
        }
    }

    /// All lemmas the dictionary associates with `word`, one entry
    /// per matching record. Empty, not an error, if `word` is not in
    /// the dictionary.
    pub fn stem(&mut self, word: &str) -> Result<Vec<String>> {
        self.lookup(word, false)
    }

    /// Like [`Lookup::stem`], but each lemma is followed by its tag:
    /// the returned vector alternates `[lemma, tag, lemma, tag, ...]`.
    pub fn stem_and_form(&mut self, word: &str) -> Result<Vec<String>> {
        self.lookup(word, true)
    }

    #[instrument(level = "debug", skip(self), fields(word = %word))]
    fn lookup(&mut self, word: &str, return_forms: bool) -> Result<Vec<String>> {
        let word_bytes = self.features.encode_str(word)?;
        let walker = FsaWalker::new(self.fsa);

        let node = match walker.walk_match(&word_bytes, self.fsa.root()) {
            WalkResult::PrematureEnd(node) => node,
            _ => return Ok(Vec::new()),
        };

        let sep = self.features.separator();
        let sep_arc = match self.fsa.arc_by_label(node, sep) {
            Some(arc) => arc,
            None => return Ok(Vec::new()),
        };
        if sep_arc.is_final {
            warn!("dictionary entry ends at its own separator; treating as no match");
            return Ok(Vec::new());
        }
        let after_sep = self.fsa.destination(sep_arc);

        let mut out = Vec::new();
        for record in walker.enumerate_accepted(after_sep) {
            let (delta, tag) = match record.iter().position(|&b| b == sep) {
                Some(j) => (&record[..j], &record[j + 1..]),
                None => (&record[..], &[][..]),
            };

            self.buf.clear();
            self.buf
                .extend_from_slice(&codec::decode(delta, &word_bytes, self.features));
            out.push(self.features.decode_bytes(&self.buf));

            if return_forms {
                out.push(self.features.decode_bytes(tag));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsa;
    use crate::record::standard_encode_utf8;
    use pretty_assertions::assert_eq;

    fn build_dict(entries: &[(&str, &str, &str)], features: &Features) -> Fsa {
        let records: Vec<Vec<u8>> = entries
            .iter()
            .map(|(form, lemma, tag)| {
                standard_encode_utf8(form, lemma, tag, features)
                    .unwrap()
                    .into_bytes()
            })
            .collect();
        fsa::build(records)
    }

    // Every test below calls through `lookup()`, which carries
    // `#[instrument]` and, on the malformed-dictionary path, a
    // `tracing::warn!`. `#[test_log::test]` installs a subscriber for
    // the duration of the test so that instrumentation actually runs
    // and prints under `cargo test -- --nocapture`, instead of the
    // span/event machinery going completely unexercised.

    #[test_log::test]
    fn stem_returns_empty_for_unknown_word() {
        let features = Features::new("UTF-8", b'+', false, false).unwrap();
        let fsa = build_dict(&[("cats", "cat", "N")], &features);
        let mut lookup = Lookup::new(&fsa, &features);
        assert_eq!(lookup.stem("dogs").unwrap(), Vec::<String>::new());
    }

    #[test_log::test]
    fn stem_recovers_lemma_for_known_word() {
        let features = Features::new("UTF-8", b'+', false, false).unwrap();
        let fsa = build_dict(&[("cats", "cat", "N")], &features);
        let mut lookup = Lookup::new(&fsa, &features);
        assert_eq!(lookup.stem("cats").unwrap(), vec!["cat".to_string()]);
    }

    #[test_log::test]
    fn stem_and_form_includes_tag() {
        let features = Features::new("UTF-8", b'+', false, false).unwrap();
        let fsa = build_dict(&[("cats", "cat", "N")], &features);
        let mut lookup = Lookup::new(&fsa, &features);
        assert_eq!(
            lookup.stem_and_form("cats").unwrap(),
            vec!["cat".to_string(), "N".to_string()]
        );
    }

    #[test_log::test]
    fn stem_returns_multiple_entries_for_ambiguous_word() {
        let features = Features::new("UTF-8", b'+', false, false).unwrap();
        let fsa = build_dict(
            &[("bank", "bank", "N"), ("bank", "bank", "V")],
            &features,
        );
        let mut lookup = Lookup::new(&fsa, &features);
        let mut results = lookup.stem("bank").unwrap();
        results.sort();
        assert_eq!(results, vec!["bank".to_string(), "bank".to_string()]);
    }

    #[test_log::test]
    fn stem_returns_empty_for_word_that_is_only_a_prefix_of_dictionary_entries() {
        let features = Features::new("UTF-8", b'+', false, false).unwrap();
        let fsa = build_dict(&[("cats", "cat", "N")], &features);
        let mut lookup = Lookup::new(&fsa, &features);
        assert_eq!(lookup.stem("ca").unwrap(), Vec::<String>::new());
    }

    #[test_log::test]
    fn repeated_lookups_reuse_the_decode_buffer() {
        let features = Features::new("UTF-8", b'+', false, false).unwrap();
        let fsa = build_dict(
            &[("cats", "cat", "N"), ("dogs", "dog", "N")],
            &features,
        );
        let mut lookup = Lookup::new(&fsa, &features);
        assert_eq!(lookup.stem("cats").unwrap(), vec!["cat".to_string()]);
        let cap_after_first = lookup.buf.capacity();
        assert_eq!(lookup.stem("dogs").unwrap(), vec!["dog".to_string()]);
        assert!(lookup.buf.capacity() >= cap_after_first);
    }

    #[test_log::test]
    fn stem_warns_and_returns_empty_when_separator_arc_is_final() {
        // A malformed record with nothing past the first separator:
        // the arc for `sep` is itself marked final, which `lookup()`
        // treats as "no result" rather than as a usable entry,
        // logging a `tracing::warn!` in the process.
        let features = Features::new("UTF-8", b'+', false, false).unwrap();
        let fsa = fsa::build([b"cats+".as_slice()]);
        let mut lookup = Lookup::new(&fsa, &features);
        assert_eq!(lookup.stem("cats").unwrap(), Vec::<String>::new());
    }
}
