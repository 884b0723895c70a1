use crate::lattice::{HasBottom, HasTop, Lattice};

/// Observed side-effects of a summarized function.
///
/// A bitset over the five effect facts the analysis tracks per summary.
/// Bits are only ever set during analysis, never cleared, which makes the
/// propagation a monotone walk up this lattice.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SummaryFlags(u8);

impl SummaryFlags {
    pub const THROWS: Self = Self(1);
    pub const MUTATES_GLOBAL_STATE: Self = Self(1 << 1);
    pub const MUTATES_THIS: Self = Self(1 << 2);
    pub const MUTATES_ARGUMENTS: Self = Self(1 << 3);
    pub const ESCAPED_RETURN: Self = Self(1 << 4);

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Self(0b1_1111)
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set the given bits; returns whether anything changed.
    pub fn insert(&mut self, other: Self) -> bool {
        let before = self.0;
        self.0 |= other.0;
        self.0 != before
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Lattice for SummaryFlags {
    fn join(&self, other: &Self) -> Self {
        Self(self.0 | other.0)
    }

    fn meet(&self, other: &Self) -> Self {
        Self(self.0 & other.0)
    }

    fn is_subseteq(&self, other: &Self) -> bool {
        self.0 & other.0 == self.0
    }
}

impl HasBottom for SummaryFlags {
    fn bottom() -> Self {
        Self::empty()
    }
}

impl HasTop for SummaryFlags {
    fn top() -> Self {
        Self::all()
    }
}

impl std::fmt::Debug for SummaryFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "{{}}");
        }
        let mut parts = Vec::new();
        for (bit, label) in [
            (Self::THROWS, "throws"),
            (Self::MUTATES_GLOBAL_STATE, "global"),
            (Self::MUTATES_THIS, "this"),
            (Self::MUTATES_ARGUMENTS, "arguments"),
            (Self::ESCAPED_RETURN, "escaped-return"),
        ] {
            if self.contains(bit) {
                parts.push(label);
            }
        }
        write!(f, "{{{}}}", parts.join("|"))
    }
}
