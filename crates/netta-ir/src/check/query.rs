//! Embedded query checking.
//!
//! A query's `formula` is opaque to this crate (parsed by the front-end's
//! query sub-dialect grammar, not this IR's expression grammar), so
//! checking is limited to the recognized option set: anything not on the
//! list is a backend pass-through and preserved verbatim, per 6 "Recognized
//! query options" - only options that look like a known flag but are
//! misspelled or malformed get flagged.

use crate::diagnostic::{Diagnostic, ErrorKind};
use crate::document::Document;
use crate::ids::QueryId;
use netta_base::Span;

const RECOGNIZED_OPTIONS: &[&str] = &[
    "--diagnostic",
    "--track-resources",
    "--learning-runs",
    "--discretization",
];

/// Any option prefixed `--` is assumed to name a recognized flag (even
/// those this crate doesn't enumerate are backend pass-throughs per 6);
/// only a bare `--` with no name, one containing whitespace, or a
/// case-mangled near-match of a recognized option, is rejected as
/// malformed.
pub fn check_query(doc: &mut Document, query: QueryId, span: Span) {
    let options = doc.queries.get(query.index()).options.clone();
    for option in &options {
        if is_malformed(option) {
            doc.report(
                Diagnostic::new(ErrorKind::BadQuery, span).with_param(option.clone()),
            );
        }
    }
}

fn is_malformed(option: &str) -> bool {
    if !option.starts_with("--") || option.len() == 2 || option.contains(char::is_whitespace) {
        return true;
    }
    // A case-mangled recognized option (e.g. "--Diagnostic") names a known
    // flag but not in the form it's recognized in; anything this crate
    // doesn't recognize at all is assumed a backend pass-through (6).
    let lower = option.to_ascii_lowercase();
    RECOGNIZED_OPTIONS.contains(&lower.as_str()) && lower != option
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    #[test]
    fn recognized_options_pass_unflagged() {
        let mut doc = Document::new();
        let query = doc.add_query(
            "E<> P.done".to_string(),
            vec!["--diagnostic".to_string(), "--learning-runs".to_string()],
        );
        check_query(&mut doc, query, Span::point(0));
        assert_eq!(doc.diagnostics.errors().count(), 0);
    }

    #[test]
    fn backend_pass_through_option_is_not_flagged() {
        let mut doc = Document::new();
        let query = doc.add_query("E<> P.done".to_string(), vec!["--some-backend-flag".to_string()]);
        check_query(&mut doc, query, Span::point(0));
        assert_eq!(doc.diagnostics.errors().count(), 0);
    }

    #[test]
    fn malformed_option_is_flagged() {
        let mut doc = Document::new();
        let query = doc.add_query("E<> P.done".to_string(), vec!["-diagnostic".to_string()]);
        check_query(&mut doc, query, Span::point(0));
        assert_eq!(doc.diagnostics.errors().count(), 1);
    }

    #[test]
    fn case_mangled_recognized_option_is_flagged() {
        let mut doc = Document::new();
        let query = doc.add_query("E<> P.done".to_string(), vec!["--Diagnostic".to_string()]);
        check_query(&mut doc, query, Span::point(0));
        assert_eq!(doc.diagnostics.errors().count(), 1);
    }
}
