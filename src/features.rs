//! Dictionary-wide configuration: charset, record separator, and
//! which delta scheme the dictionary's records were written in.
//!
//! Mirrors the small `key=value` properties file a compiled
//! dictionary carries alongside its automaton (morfologik-style
//! tooling calls it a `.info` file; we just call it a features
//! file). Unrecognised keys are ignored rather than rejected, so a
//! dictionary built by a newer compiler still loads.

use std::path::Path;

use encoding_rs::Encoding;
use snafu::{ensure, OptionExt, ResultExt};

use crate::codec::Scheme;
use crate::error::{
    InvalidSeparatorError, MissingFieldError, ReadFeaturesError, Result, UnknownEncoderError,
    UnknownEncodingError,
};

/// Resolved, validated configuration for a single dictionary.
///
/// `uses_infixes` implies `uses_prefixes`: there is no scheme that
/// allows interior deletions but not a dropped prefix, so
/// [`Features::new`] normalises that combination instead of rejecting
/// it.
#[derive(Debug)]
pub struct Features {
    encoding_name: String,
    encoding: &'static Encoding,
    separator: u8,
    uses_prefixes: bool,
    uses_infixes: bool,
}

impl Features {
    pub fn new(
        encoding_name: &str,
        separator: u8,
        uses_prefixes: bool,
        uses_infixes: bool,
    ) -> Result<Self> {
        let encoding = Encoding::for_label(encoding_name.as_bytes()).context(
            UnknownEncodingError {
                name: encoding_name.to_string(),
            },
        )?;
        Ok(Features {
            encoding_name: encoding_name.to_string(),
            encoding,
            separator,
            uses_prefixes: uses_prefixes || uses_infixes,
            uses_infixes,
        })
    }

    /// Parses a features file of `key=value` lines (`#`-prefixed
    /// comments and blank lines ignored). Recognises
    /// `fsa.dict.separator`, `fsa.dict.encoding` and
    /// `fsa.dict.encoder` (one of `STANDARD`, `PREFIX`, `INFIX`,
    /// defaulting to `STANDARD` when absent); every other key is
    /// ignored.
    pub fn from_properties(text: &str) -> Result<Self> {
        let mut separator: Option<u8> = None;
        let mut encoding_name: Option<String> = None;
        let mut encoder: Option<String> = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "fsa.dict.separator" => {
                    let bytes = value.as_bytes();
                    ensure!(
                        bytes.len() == 1,
                        InvalidSeparatorError {
                            separator: value.to_string(),
                        }
                    );
                    separator = Some(bytes[0]);
                }
                "fsa.dict.encoding" => encoding_name = Some(value.to_string()),
                "fsa.dict.encoder" => encoder = Some(value.to_string()),
                _ => {}
            }
        }

        let separator = separator.context(MissingFieldError {
            field: "fsa.dict.separator",
        })?;
        let encoding_name = encoding_name.context(MissingFieldError {
            field: "fsa.dict.encoding",
        })?;

        let (uses_prefixes, uses_infixes) = match encoder.as_deref() {
            None | Some("STANDARD") => (false, false),
            Some("PREFIX") => (true, false),
            Some("INFIX") => (true, true),
            Some(other) => {
                return UnknownEncoderError {
                    value: other.to_string(),
                }
                .fail()
            }
        };

        Features::new(&encoding_name, separator, uses_prefixes, uses_infixes)
    }

    /// Reads a features file from `path` and parses it via
    /// [`Features::from_properties`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).context(ReadFeaturesError { path })?;
        Features::from_properties(&text)
    }

    pub fn separator(&self) -> u8 {
        self.separator
    }

    pub fn uses_prefixes(&self) -> bool {
        self.uses_prefixes
    }

    pub fn uses_infixes(&self) -> bool {
        self.uses_infixes
    }

    pub fn encoding_name(&self) -> &str {
        &self.encoding_name
    }

    pub fn scheme(&self) -> Scheme {
        if self.uses_infixes {
            Scheme::Infix
        } else if self.uses_prefixes {
            Scheme::Prefix
        } else {
            Scheme::Standard
        }
    }

    /// Encodes `s` into this dictionary's declared charset. Returns
    /// `Err(Error::CharsetRoundTrip)` if `s` contains characters the
    /// charset cannot represent, rather than silently substituting
    /// replacement bytes.
    pub fn encode_str(&self, s: &str) -> Result<Vec<u8>> {
        let (bytes, _, had_errors) = self.encoding.encode(s);
        ensure!(!had_errors, crate::error::CharsetRoundTripError);
        Ok(bytes.into_owned())
    }

    /// Decodes `bytes` out of this dictionary's declared charset.
    /// Total: invalid sequences become U+FFFD rather than failing,
    /// since by construction these bytes were reconstructed by
    /// [`crate::codec::decode`] from data this same charset produced.
    pub fn decode_bytes(&self, bytes: &[u8]) -> String {
        let (s, _, _) = self.encoding.decode(bytes);
        s.into_owned()
    }
}
