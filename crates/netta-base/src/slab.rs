//! Append-only indexed storage for stable cross-references.
//!
//! The IR built on top of this crate is full of entities that reference
//! each other (an edge references its source location, a symbol references
//! its declaring frame and domain object, a simregion references a
//! message). None of these references may be invalidated by later
//! insertions, and several of them are mutually recursive (see
//! `netta_ir::types`/`netta_ir::expr`).
//!
//! Rather than raw pointers or reference counting, every such reference is
//! a `Copy` integer handle into a [`Slab<T>`] - generalizing the
//! interned-handle pattern already used for [`crate::intern::Name`] to any
//! owned entity. `Vec::push` never invalidates existing indices, so a
//! `Slab` gives the append-only, reference-stable storage the containing
//! `Document`/`Template` need, while still allowing `get_mut` for the
//! in-place mutation the type checker performs (e.g. assigning a computed
//! type to an expression node).
//!
//! ## Example
//!
//! ```
//! use netta_base::Slab;
//!
//! let mut slab: Slab<String> = Slab::new();
//! let id = slab.push("hello".to_string());
//! assert_eq!(slab.get(id), "hello");
//! slab.get_mut(id).push_str(", world");
//! assert_eq!(slab.get(id), "hello, world");
//! ```

/// A `Vec`-backed append-only arena indexed by raw `usize` offsets.
///
/// Crate users typically don't hand out raw `usize`s directly; instead they
/// wrap them in a newtype via [`define_id`] so that, say, an `ExprId`
/// cannot be confused with a `TypeId` at the type level.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Slab<T> {
    items: Vec<T>,
}

impl<T> Slab<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { items: Vec::with_capacity(capacity) }
    }

    /// Appends `value`, returning the index it was stored at.
    pub fn push(&mut self, value: T) -> usize {
        let idx = self.items.len();
        self.items.push(value);
        idx
    }

    pub fn get(&self, idx: usize) -> &T {
        &self.items[idx]
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut T {
        &mut self.items[idx]
    }

    pub fn try_get(&self, idx: usize) -> Option<&T> {
        self.items.get(idx)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}

impl<T> Default for Slab<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::ops::Index<usize> for Slab<T> {
    type Output = T;
    fn index(&self, idx: usize) -> &T {
        self.get(idx)
    }
}

impl<T> std::ops::IndexMut<usize> for Slab<T> {
    fn index_mut(&mut self, idx: usize) -> &mut T {
        self.get_mut(idx)
    }
}

/// Declares a `Copy` newtype wrapping a `u32` slab index, with the
/// boilerplate (`Debug`/`Eq`/`Hash`/`index`/`From<usize>`) every id type in
/// `netta-ir` needs.
///
/// ```
/// netta_base::define_id!(pub struct WidgetId);
/// let id = WidgetId::from_index(3);
/// assert_eq!(id.index(), 3);
/// ```
#[macro_export]
macro_rules! define_id {
    ($vis:vis struct $name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, serde::Serialize, serde::Deserialize)]
        $vis struct $name(u32);

        impl $name {
            #[inline]
            $vis fn from_index(idx: usize) -> Self {
                Self(u32::try_from(idx).expect(concat!(stringify!($name), " index overflow")))
            }

            #[inline]
            $vis fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}
