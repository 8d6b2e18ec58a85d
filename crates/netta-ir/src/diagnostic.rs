//! The diagnostic taxonomy and error sink.
//!
//! The checker never returns `Result::Err` for a semantic problem; it
//! appends a [`Diagnostic`] to the owning [`crate::document::Document`]
//! and keeps going, so a single run surfaces every independent error it
//! can find (7 "Propagation policy"). `Result`/`?` is reserved for this
//! crate's own programming errors (malformed handle, API misuse), not for
//! anything a front-end's input can trigger.

use netta_base::Span;

/// Taxonomy of error kinds (7), not exhaustive by design - new kinds are
/// additive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    UnknownIdentifier,
    HasNoMember,
    IsNotAStruct,
    DuplicateDefinition,
    InvalidType,
    NoSuchProcess,
    NotATemplate,
    NotAProcess,
    StrategyNotDeclared,
    UnknownDynamicTemplate,
    /// Warning, not an error: a declaration shadows a visible outer one.
    ShadowsAVariable,
    CouldNotLoadLibrary,
    CouldNotLoadFunction,
    TypeMismatch,
    BadGuard,
    BadInvariant,
    BadAssignment,
    BadSync,
    RestrictionViolation,
    CyclicType,
    BadPriorityList,
    BadQuery,
    InconsistentLSC,
}

impl ErrorKind {
    /// The message-template key (6 "Diagnostic format": `$key`, translated
    /// by the caller) associated with this kind.
    pub fn template_key(self) -> &'static str {
        match self {
            Self::UnknownIdentifier => "$unknown_identifier",
            Self::HasNoMember => "$has_no_member",
            Self::IsNotAStruct => "$is_not_a_struct",
            Self::DuplicateDefinition => "$duplicate_definition",
            Self::InvalidType => "$invalid_type",
            Self::NoSuchProcess => "$no_such_process",
            Self::NotATemplate => "$not_a_template",
            Self::NotAProcess => "$not_a_process",
            Self::StrategyNotDeclared => "$strategy_not_declared",
            Self::UnknownDynamicTemplate => "$unknown_dynamic_template",
            Self::ShadowsAVariable => "$shadows_a_variable",
            Self::CouldNotLoadLibrary => "$could_not_load_library",
            Self::CouldNotLoadFunction => "$could_not_load_function",
            Self::TypeMismatch => "$type_mismatch",
            Self::BadGuard => "$bad_guard",
            Self::BadInvariant => "$bad_invariant",
            Self::BadAssignment => "$bad_assignment",
            Self::BadSync => "$bad_sync",
            Self::RestrictionViolation => "$restriction_violation",
            Self::CyclicType => "$cyclic_type",
            Self::BadPriorityList => "$bad_priority_list",
            Self::BadQuery => "$bad_query",
            Self::InconsistentLSC => "$inconsistent_lsc",
        }
    }

    /// Kinds that are warnings rather than hard errors. Only
    /// `ShadowsAVariable` is a warning today (7); keeping this as a match
    /// rather than a stored field means adding a new warning kind is a
    /// one-line change.
    pub fn default_severity(self) -> Severity {
        match self {
            Self::ShadowsAVariable => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// One reported problem: a kind, a severity, a position, and the ordered
/// positional parameters (`%1%`, `%2%`, ...) the message template
/// substitutes in.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub severity: Severity,
    pub span: Span,
    pub params: Vec<String>,
    pub context: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        Self { kind, severity: kind.default_severity(), span, params: Vec::new(), context: None }
    }

    #[must_use]
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// A write-only sink for diagnostics, owned by the [`crate::document::Document`]
/// (9 "Error accumulation"). Each `report` call returns whether checking
/// should continue afterward - always `true` today, since only
/// structural violations abort a template's checking and those are
/// signaled by the caller returning early, not by this sink.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) -> bool {
        self.entries.push(diagnostic);
        true
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| !d.is_warning())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.is_warning())
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| !d.is_warning())
    }

    pub fn all(&self) -> &[Diagnostic] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadows_a_variable_defaults_to_warning_severity() {
        assert_eq!(ErrorKind::ShadowsAVariable.default_severity(), Severity::Warning);
    }

    #[test]
    fn duplicate_definition_defaults_to_error_severity() {
        assert_eq!(ErrorKind::DuplicateDefinition.default_severity(), Severity::Error);
    }

    #[test]
    fn diagnostics_separates_errors_and_warnings() {
        let mut sink = Diagnostics::new();
        sink.report(Diagnostic::new(ErrorKind::DuplicateDefinition, Span::point(0)));
        sink.report(Diagnostic::new(ErrorKind::ShadowsAVariable, Span::point(1)));
        assert_eq!(sink.errors().count(), 1);
        assert_eq!(sink.warnings().count(), 1);
        assert!(sink.has_errors());
    }

    #[test]
    fn with_param_appends_in_order() {
        let d = Diagnostic::new(ErrorKind::TypeMismatch, Span::point(0))
            .with_param("int")
            .with_param("bool");
        assert_eq!(d.params, vec!["int".to_string(), "bool".to_string()]);
    }
}
