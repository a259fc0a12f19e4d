use std::path::PathBuf;

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while configuring or operating this crate.
///
/// `InvalidSeparator`, `UnknownEncoding`, `MissingField` and
/// `UnknownEncoder` are configuration-time errors: they come from
/// [`crate::Features::new`] or [`crate::Features::from_properties`]
/// and mean the caller handed us something that can never work, no
/// matter the input word. `CharsetRoundTrip`, `OffsetOverflow` and
/// `SeparatorInField` are raised per call, from input that a given
/// configuration cannot represent.
#[derive(Debug, Snafu)]
#[snafu(context(suffix(Error)))]
pub enum Error {
    #[snafu(display("{separator:?} is not a single byte in the declared charset"))]
    InvalidSeparator { separator: String },

    #[snafu(display("unrecognised charset {name:?}"))]
    UnknownEncoding { name: String },

    #[snafu(display("features file is missing required key {field:?}"))]
    MissingField { field: &'static str },

    #[snafu(display("unrecognised encoder scheme {value:?}"))]
    UnknownEncoder { value: String },

    #[snafu(display("offset {offset} does not fit in a single control byte"))]
    OffsetOverflow { offset: usize },

    #[snafu(display("word cannot be represented in the declared charset"))]
    CharsetRoundTrip,

    #[snafu(display("separator byte {separator:#04x} occurs inside {field}"))]
    SeparatorInField { field: &'static str, separator: u8 },

    #[snafu(display("could not read features file {path:?}"))]
    ReadFeatures {
        source: std::io::Error,
        path: PathBuf,
    },
}
