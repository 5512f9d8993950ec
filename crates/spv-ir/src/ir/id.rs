use std::fmt;

/// A SPIR-V result or type id.
///
/// Ids are handed out by the external builder and are expected to be dense;
/// the module indexes them with a flat table. The value 0 is reserved to
/// mean "no id" and never names an entity — absence is modeled as
/// `Option<Id>`, so an `Id` in hand is always a real one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(pub u32);

impl Id {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Stable handle to an instruction in a [`Module`](super::Module)'s pool.
///
/// The pool is append-only, so a handle stays valid across block-level
/// insertions and reorderings; blocks and functions hold handles, never
/// instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstrRef(pub(crate) u32);

impl InstrRef {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}
