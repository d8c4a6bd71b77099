//! Interned names: identifiers (type, id, class, attribute names, namespace
//! prefixes) get a monotonically assigned index, one table per named class,
//! each with a configurable capacity.
//!
//! `gosub_css3` doesn't intern at all — it keeps `String`s inline on AST
//! nodes. `indexmap` (already a dependency, unused in the CSS crate itself)
//! is a natural fit here: insertion-order preserving and `O(1)` lookup by
//! key, which is exactly what a monotonic intern table needs.

use crate::error::InternError;
use indexmap::IndexSet;

/// An intern index within one [`Interner`]'s class. Distinct classes (ids,
/// classes, types, attributes, namespaces) use distinct `Interner`s, so an
/// `InternId` is only comparable to others from the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InternId(u32);

impl InternId {
    #[must_use]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// A single named-class intern table, owned by the caller's `Environment`
/// for the lifetime of that environment.
#[derive(Debug)]
pub struct Interner {
    class: &'static str,
    max: usize,
    names: IndexSet<Box<str>>,
}

impl Interner {
    #[must_use]
    pub fn new(class: &'static str, max: usize) -> Self {
        Self {
            class,
            max,
            names: IndexSet::new(),
        }
    }

    /// Interns `name`, returning its id. Calling this twice with the same
    /// (case-sensitive) spelling returns the same id.
    ///
    /// # Errors
    /// Returns [`InternError`] once the table would exceed its configured
    /// maximum; the table is left unchanged.
    pub fn intern(&mut self, name: &str) -> Result<InternId, InternError> {
        if let Some(idx) = self.names.get_index_of(name) {
            return Ok(InternId(idx as u32));
        }
        if self.names.len() >= self.max {
            return Err(InternError { class: self.class, max: self.max });
        }
        let (idx, _) = self.names.insert_full(name.into());
        Ok(InternId(idx as u32))
    }

    #[must_use]
    pub fn resolve(&self, id: InternId) -> Option<&str> {
        self.names.get_index(id.index() as usize).map(|s| &**s)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_spelling_reuses_the_same_id() {
        let mut table = Interner::new("class", 4);
        let a = table.intern("foo").unwrap();
        let b = table.intern("foo").unwrap();
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn capacity_rejection_leaves_table_unchanged() {
        let mut table = Interner::new("class", 1);
        table.intern("foo").unwrap();
        let before = table.len();
        assert!(table.intern("bar").is_err());
        assert_eq!(table.len(), before);
    }
}
