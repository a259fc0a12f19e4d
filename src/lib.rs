//! A byte-level morphological dictionary lookup and encoding engine.
//!
//! [`Lookup`] walks a compiled finite-state dictionary to recover the
//! lemma/tag pairs stored for an inflected surface word; the
//! [`codec`] module computes the other direction, the compact delta
//! code a dictionary compiler inserts into the automaton for a given
//! (surface, lemma) pair.
#![allow(dead_code)]

pub mod codec;
mod error;
pub mod features;
pub mod fsa;
pub mod lookup;
pub mod record;

pub use crate::{
    codec::Scheme,
    error::{Error, Result},
    features::Features,
    fsa::{Fsa, FsaArc, FsaWalker, NodeId, WalkResult},
    lookup::Lookup,
    record::{
        infix_encode, infix_encode_utf8, prefix_encode, prefix_encode_utf8, standard_encode,
        standard_encode_utf8,
    },
};
