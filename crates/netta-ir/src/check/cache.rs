//! Canonical atomic type ids, interned once per checking run.
//!
//! Every checker pass needs a `TypeId` for `bool`, plain `int`, `double`,
//! `clock`, `void`, or the error sentinel `Unknown` far more often than it
//! needs a fresh compound type, so these are allocated once up front
//! rather than re-pushed onto `doc.types` at every use site.

use crate::document::Document;
use crate::ids::TypeId;
use crate::types::{Kind, Type};

#[derive(Clone, Copy, Debug)]
pub struct TypeCache {
    pub void: TypeId,
    pub bool_: TypeId,
    pub int: TypeId,
    pub double: TypeId,
    pub clock: TypeId,
    pub unknown: TypeId,
}

impl TypeCache {
    pub fn build(doc: &mut Document) -> Self {
        Self {
            void: TypeId::from_index(doc.types.push(Type::new(Kind::Void))),
            bool_: TypeId::from_index(doc.types.push(Type::new(Kind::Bool))),
            int: TypeId::from_index(doc.types.push(Type::new(Kind::Int { range: None }))),
            double: TypeId::from_index(doc.types.push(Type::new(Kind::Double))),
            clock: TypeId::from_index(doc.types.push(Type::new(Kind::Clock))),
            unknown: TypeId::from_index(doc.types.push(Type::new(Kind::Unknown))),
        }
    }
}
