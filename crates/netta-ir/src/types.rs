//! The type algebra.
//!
//! A `Type` is a qualified, possibly-compound description of the values a
//! variable, expression, or function parameter may take. Compound types
//! (array, record, function) carry their element/field/parameter types as
//! [`TypeId`]s into the owning [`crate::document::Document`]'s type slab,
//! the same handle-into-slab pattern used everywhere else in this crate.

use netta_base::Name;
use smallvec::SmallVec;

use crate::ids::{ExprId, TypeId};

/// The "shape" of a type, ignoring qualifiers.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Kind {
    /// `void`, used only as a function return type.
    Void,
    /// `bool`.
    Bool,
    /// `int`, optionally range-restricted to `[lo, hi]`.
    Int { range: Option<(i64, i64)> },
    /// `double`.
    Double,
    /// A clock variable.
    Clock,
    /// A channel, with its synchronization strength.
    Channel { urgent: bool, broadcast: bool },
    /// A reference to a declared scalar set or type alias, named `name`.
    TypeName { name: Name },
    /// `array[size_expr] of element`. Array sizes are expressions, so this carries the declared bound
    /// expression itself, not just its resolved value - the instantiation
    /// engine's restriction analysis (4.5 step 4) needs the expression to
    /// find parameter references inside it. `size_expr` is `None` for a
    /// scalar-indexed array whose bound is itself a typename (e.g. an
    /// enumerated scalar set), in which case the bound lives on `element`'s
    /// declaration. `size` is the expression's constant-folded value, filled
    /// in by the checker once `size_expr` has been type-checked; `None`
    /// until then (or permanently, for the scalar-indexed case).
    Array { element: TypeId, size_expr: Option<ExprId>, size: Option<i64> },
    /// A `struct`, with fields in declaration order.
    Record { fields: SmallVec<[(Name, TypeId); 4]> },
    /// A function signature: declared parameter types, then the return
    /// type.
    Function { params: SmallVec<[TypeId; 4]>, ret: TypeId },
    /// A process type, used to type template instances.
    Process,
    /// The type of a scalar set value, carrying its declared size.
    Scalar { size: i64 },
    /// Could not be determined; suppresses cascading diagnostics once an
    /// error has already been reported for the underlying expression.
    Unknown,
}

/// A qualifier attached to a type. Several may apply to the same type
/// (e.g. `const hybrid clock`), so a `Type` carries a set, not a single
/// value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum Qualifier {
    Const,
    Urgent,
    Broadcast,
    Committed,
    Meta,
    Hybrid,
}

/// A fully qualified type: a [`Kind`] plus the set of qualifiers that
/// prefix it.
///
/// Qualifiers are kept sorted and deduplicated so that structural equality
/// (`==`) matches type equality directly, without a separate
/// normalization pass.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Type {
    kind: Kind,
    qualifiers: SmallVec<[Qualifier; 2]>,
}

impl Type {
    pub fn new(kind: Kind) -> Self {
        Self { kind, qualifiers: SmallVec::new() }
    }

    /// Returns a copy of this type with `qualifier` added, or unchanged if
    /// it is already present.
    #[must_use]
    pub fn with_qualifier(&self, qualifier: Qualifier) -> Self {
        let mut qualifiers = self.qualifiers.clone();
        if let Err(pos) = qualifiers.binary_search(&qualifier) {
            qualifiers.insert(pos, qualifier);
        }
        Self { kind: self.kind.clone(), qualifiers }
    }

    /// Returns a copy of this type with `qualifier` removed, per
    /// `strip_prefix` in 4.1.
    #[must_use]
    pub fn without_qualifier(&self, qualifier: Qualifier) -> Self {
        let mut qualifiers = self.qualifiers.clone();
        qualifiers.retain(|q| *q != qualifier);
        Self { kind: self.kind.clone(), qualifiers }
    }

    pub fn is(&self, qualifier: Qualifier) -> bool {
        self.qualifiers.contains(&qualifier)
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn qualifiers(&self) -> &[Qualifier] {
        &self.qualifiers
    }

    pub fn is_const(&self) -> bool {
        self.is(Qualifier::Const)
    }

    pub fn is_integral(&self) -> bool {
        matches!(self.kind, Kind::Int { .. } | Kind::Bool)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, Kind::Int { .. } | Kind::Bool | Kind::Double | Kind::Clock)
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, Kind::Array { .. })
    }

    pub fn is_record(&self) -> bool {
        matches!(self.kind, Kind::Record { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, Kind::Function { .. })
    }

    pub fn is_channel(&self) -> bool {
        matches!(self.kind, Kind::Channel { .. })
    }

    pub fn is_clock(&self) -> bool {
        matches!(self.kind, Kind::Clock)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, Kind::Unknown)
    }

    /// Structural element/field/parameter count, independent of `Kind`:
    /// the array length, the record field count, or the function arity.
    /// Scalar kinds have size 1.
    pub fn size(&self, types: &netta_base::Slab<Type>) -> usize {
        match &self.kind {
            Kind::Array { size: Some(n), .. } => (*n).max(0) as usize,
            Kind::Array { size: None, element, .. } => types.get(element.index()).size(types),
            Kind::Record { fields } => fields.len(),
            Kind::Function { params, .. } => params.len(),
            _ => 1,
        }
    }

    /// Field lookup for record types, by declared name.
    pub fn get_label(&self, name: Name) -> Option<TypeId> {
        match &self.kind {
            Kind::Record { fields } => {
                fields.iter().find(|(n, _)| *n == name).map(|(_, t)| *t)
            }
            _ => None,
        }
    }

    /// Positional sub-type accessor (4.1 `get(i)`): the array element (`i
    /// == 0`), a record field's type, or a function's `i`-th parameter
    /// type (with `i == params.len()` giving the return type). `None` for
    /// atomic kinds or an out-of-range index.
    pub fn get(&self, i: usize) -> Option<TypeId> {
        match &self.kind {
            Kind::Array { element, .. } if i == 0 => Some(*element),
            Kind::Record { fields } => fields.get(i).map(|(_, t)| *t),
            Kind::Function { params, ret } => {
                if i < params.len() {
                    Some(params[i])
                } else if i == params.len() {
                    Some(*ret)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Builds an `array[size_expr] of element` type (4.1 `create_array`).
    /// `size` is left unset; the checker fills it in once `size_expr` has
    /// been constant-folded.
    #[must_use]
    pub fn create_array(element: TypeId, size_expr: Option<ExprId>) -> Self {
        Self::new(Kind::Array { element, size_expr, size: None })
    }

    /// Builds a `struct { ... }` type from its ordered fields (4.1
    /// `create_record`).
    #[must_use]
    pub fn create_record(fields: SmallVec<[(Name, TypeId); 4]>) -> Self {
        Self::new(Kind::Record { fields })
    }

    /// Builds a function-signature type from its parameter types and
    /// result type (4.1 `create_function`).
    #[must_use]
    pub fn create_function(params: SmallVec<[TypeId; 4]>, ret: TypeId) -> Self {
        Self::new(Kind::Function { params, ret })
    }

    /// Structural equality up to typename unfolding: two `Kind::TypeName`s
    /// are equal only if their names match directly (resolving an alias to
    /// its definition is the checker's job when building types, not this
    /// comparison's).
    pub fn equals(&self, other: &Self, types: &netta_base::Slab<Type>) -> bool {
        if self.qualifiers != other.qualifiers {
            return false;
        }
        match (&self.kind, &other.kind) {
            (Kind::Void, Kind::Void)
            | (Kind::Bool, Kind::Bool)
            | (Kind::Double, Kind::Double)
            | (Kind::Clock, Kind::Clock)
            | (Kind::Process, Kind::Process) => true,
            (Kind::Int { range: r1 }, Kind::Int { range: r2 }) => r1 == r2,
            (
                Kind::Channel { urgent: u1, broadcast: b1 },
                Kind::Channel { urgent: u2, broadcast: b2 },
            ) => u1 == u2 && b1 == b2,
            (Kind::TypeName { name: n1 }, Kind::TypeName { name: n2 }) => n1 == n2,
            (Kind::Scalar { size: s1 }, Kind::Scalar { size: s2 }) => s1 == s2,
            (
                Kind::Array { element: e1, size: s1, .. },
                Kind::Array { element: e2, size: s2, .. },
            ) => s1 == s2 && types.get(e1.index()).equals(types.get(e2.index()), types),
            (Kind::Record { fields: f1 }, Kind::Record { fields: f2 }) => {
                f1.len() == f2.len()
                    && f1.iter().zip(f2.iter()).all(|((n1, t1), (n2, t2))| {
                        n1 == n2 && types.get(t1.index()).equals(types.get(t2.index()), types)
                    })
            }
            (
                Kind::Function { params: p1, ret: r1 },
                Kind::Function { params: p2, ret: r2 },
            ) => {
                p1.len() == p2.len()
                    && types.get(r1.index()).equals(types.get(r2.index()), types)
                    && p1.iter().zip(p2.iter()).all(|(a, b)| {
                        types.get(a.index()).equals(types.get(b.index()), types)
                    })
            }
            (Kind::Unknown, Kind::Unknown) => true,
            _ => false,
        }
    }
}
