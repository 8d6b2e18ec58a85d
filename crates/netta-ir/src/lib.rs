//! # netta-ir
//!
//! The semantic intermediate representation, type/consistency checker,
//! frame-scoping system, and template-instantiation engine for networks of
//! timed automata and their LSC (Live Sequence Chart) specifications.
//!
//! A [`Document`] is the root container: it owns every IR entity in
//! [`netta_base::Slab`]s, the global lexical [`Frame`] chain, and a
//! write-only [`Diagnostics`](diagnostic::Diagnostics) sink. Front-ends
//! populate a `Document` through the flat [`Builder`] call sequence, then
//! hand it to [`check::check_document`] to resolve identifiers, assign
//! types, and validate every construct.
//!
//! This crate has no parser: it assumes a front-end already turned
//! concrete syntax into `Builder` calls. See the crate README for the
//! division of responsibility.

pub mod builder;
pub mod check;
pub mod decl;
pub mod diagnostic;
pub mod document;
pub mod expr;
pub mod frame;
pub mod ids;
pub mod instantiate;
pub mod lsc;
pub mod stmt;
pub mod template;
pub mod types;
pub mod visitor;

pub use builder::{Builder, BuilderError, BuilderResult};
pub use check::check_document;
pub use decl::{Function, Variable};
pub use diagnostic::{Diagnostic, Diagnostics, ErrorKind, Severity};
pub use document::{Document, GlobalFlags, Query, SupportedMethods};
pub use expr::{BinOp, ConstValue, Expr, ExprKind, Quantifier, SyncKind, UnOp};
pub use frame::{Frame, Symbol, SymbolKind};
pub use ids::Node;
pub use instantiate::RestrictionViolation;
pub use lsc::{Condition, Cut, InstanceLine, Message, Simregion, Update};
pub use stmt::{Stmt, StmtKind};
pub use template::{
    Branchpoint, ChannelPriority, Edge, Instance, Location, Process, PrioritySeparator, Template,
};
pub use types::{Kind, Qualifier, Type};
pub use visitor::{walk, Visitor};
