/// Side-effect annotation written onto invocation nodes.
///
/// A bitmask over the five observable effects of a call. The default for a
/// node that has never been annotated is [`worst_case`](Self::worst_case):
/// downstream consumers must assume everything until the analysis has run.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SideEffects(u8);

impl SideEffects {
    pub const MUTATES_GLOBAL_STATE: Self = Self(1);
    pub const MUTATES_THIS: Self = Self(1 << 1);
    pub const MUTATES_ARGUMENTS: Self = Self(1 << 2);
    pub const THROWS: Self = Self(1 << 3);
    pub const RETURN_TAINTED: Self = Self(1 << 4);

    pub fn none() -> Self {
        Self(0)
    }

    pub fn worst_case() -> Self {
        Self(0b1_1111)
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// No side effects and an untainted return value.
    pub fn is_pure(self) -> bool {
        self.0 == 0
    }

    /// Any effect other than a tainted return value.
    pub fn has_side_effects(self) -> bool {
        self.0 & !Self::RETURN_TAINTED.0 != 0
    }

    /// Drop the side-effect bits, keeping only return taint.
    pub fn clear_side_effects(&mut self) {
        self.0 &= Self::RETURN_TAINTED.0;
    }
}

impl std::fmt::Debug for SideEffects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == 0 {
            return write!(f, "{{}}");
        }
        let mut parts = Vec::new();
        for (bit, label) in [
            (Self::MUTATES_GLOBAL_STATE, "global"),
            (Self::MUTATES_THIS, "this"),
            (Self::MUTATES_ARGUMENTS, "arguments"),
            (Self::THROWS, "throws"),
            (Self::RETURN_TAINTED, "return"),
        ] {
            if self.contains(bit) {
                parts.push(label);
            }
        }
        write!(f, "{{{}}}", parts.join("|"))
    }
}
