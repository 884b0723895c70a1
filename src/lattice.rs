/// A lattice with join (least upper bound), meet (greatest lower bound),
/// and a subset ordering.
///
/// Implementations must satisfy the usual algebraic laws:
///
/// **Join**: associative, commutative, idempotent.
/// **Meet**: associative, commutative, idempotent.
/// **Absorption**: `a.join(&a.meet(&b)) == a` and `a.meet(&a.join(&b)) == a`.
/// **Ordering consistency**: `a.is_subseteq(&b)` iff `a.join(&b) == b` iff
/// `a.meet(&b) == a`.
///
/// Use the assertion helpers in `purist-test-utils` to verify these
/// properties in tests.
pub trait Lattice {
    fn join(&self, other: &Self) -> Self;
    fn meet(&self, other: &Self) -> Self;
    fn is_subseteq(&self, other: &Self) -> bool;
}

/// A lattice with a bottom element (least element).
pub trait HasBottom: Lattice {
    fn bottom() -> Self;
}

/// A lattice with a top element (greatest element).
pub trait HasTop: Lattice {
    fn top() -> Self;
}
