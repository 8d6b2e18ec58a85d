//! # netta-base
//!
//! Pure structural atoms for the netta crate family.
//!
//! This crate provides the foundational types used throughout netta:
//!
//! - [`PositionTable`]/[`Span`] - source location tracking
//! - [`Interner`]/[`Name`] - string interning for O(1) equality
//! - [`Slab`]/[`define_id`] - append-only indexed storage for stable
//!   cross-references
//! - [`SpannedError`]/[`Result`] - errors with source positions
//!
//! # Design principles
//!
//! This crate has **no knowledge of timed automata, LSCs, or any other
//! modeling-language construct**. It provides only generic, reusable
//! infrastructure that `netta-ir` builds upon.

pub mod error;
pub mod intern;
pub mod positions;
pub mod slab;

pub use error::{Result, SpannedError};
pub use intern::{Interner, Name, NameEq};
pub use positions::{PositionTable, ResolvedPosition, Span};
pub use slab::Slab;
