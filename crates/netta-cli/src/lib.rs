//! Demonstration CLI assembling and checking fixture timed-automata
//! documents.
//!
//! This crate has no parser of its own - it plays the part of a
//! front-end by calling [`netta_ir::Builder`] methods directly, the way a
//! real parser's grammar actions would. See [`fixtures`] for the
//! end-to-end scenarios it can run.

pub mod fixtures;
