//! Assertion helpers for verifying lattice algebraic laws.
//!
//! These check properties over a given set of sample elements and collect
//! all violations into a single report, so you can see every failing law at
//! once rather than fixing them one at a time.

use purist::{HasBottom, HasTop, Lattice};
use std::fmt::{Debug, Write};

/// Collect violations into a `Vec<String>`, then panic with a combined
/// report if any were found.
fn report(violations: Vec<String>) {
    if violations.is_empty() {
        return;
    }
    let mut msg = format!("{} lattice law violation(s):\n", violations.len());
    for (i, v) in violations.iter().enumerate() {
        let _ = writeln!(msg, "  {}. {}", i + 1, v);
    }
    panic!("{msg}");
}

/// Check all lattice laws over the given elements: join laws, meet laws,
/// absorption, and ordering consistency.
pub fn assert_lattice_laws<L: Lattice + PartialEq + Debug>(elements: &[L]) {
    let mut violations = Vec::new();
    check_join_laws(elements, &mut violations);
    check_meet_laws(elements, &mut violations);
    check_absorption(elements, &mut violations);
    check_ordering_consistent(elements, &mut violations);
    report(violations);
}

/// Check all lattice laws plus bottom and top element laws.
///
/// This is the most comprehensive check for lattices that implement both
/// [`HasBottom`] and [`HasTop`]. The `elements` slice should include
/// representative values from the lattice; bottom and top are tested
/// automatically in addition to the provided elements.
pub fn assert_finite_lattice_laws<L: HasBottom + HasTop + PartialEq + Debug>(elements: &[L]) {
    let mut violations = Vec::new();
    check_join_laws(elements, &mut violations);
    check_meet_laws(elements, &mut violations);
    check_absorption(elements, &mut violations);
    check_ordering_consistent(elements, &mut violations);
    check_bottom_laws(elements, &mut violations);
    check_top_laws(elements, &mut violations);
    report(violations);
}

// ---- internal helpers that push violations instead of panicking ----

fn check_join_laws<L: Lattice + PartialEq + Debug>(elements: &[L], v: &mut Vec<String>) {
    for a in elements {
        if a.join(a) != *a {
            v.push(format!("join not idempotent: {a:?}.join({a:?}) != {a:?}"));
        }
        for b in elements {
            if a.join(b) != b.join(a) {
                v.push(format!(
                    "join not commutative: {a:?}.join({b:?}) != {b:?}.join({a:?})"
                ));
            }
            for c in elements {
                if a.join(b).join(c) != a.join(&b.join(c)) {
                    v.push(format!(
                        "join not associative over ({a:?}, {b:?}, {c:?})"
                    ));
                }
            }
        }
    }
}

fn check_meet_laws<L: Lattice + PartialEq + Debug>(elements: &[L], v: &mut Vec<String>) {
    for a in elements {
        if a.meet(a) != *a {
            v.push(format!("meet not idempotent: {a:?}.meet({a:?}) != {a:?}"));
        }
        for b in elements {
            if a.meet(b) != b.meet(a) {
                v.push(format!(
                    "meet not commutative: {a:?}.meet({b:?}) != {b:?}.meet({a:?})"
                ));
            }
            for c in elements {
                if a.meet(b).meet(c) != a.meet(&b.meet(c)) {
                    v.push(format!(
                        "meet not associative over ({a:?}, {b:?}, {c:?})"
                    ));
                }
            }
        }
    }
}

fn check_absorption<L: Lattice + PartialEq + Debug>(elements: &[L], v: &mut Vec<String>) {
    for a in elements {
        for b in elements {
            if a.join(&a.meet(b)) != *a {
                v.push(format!(
                    "absorption violated: {a:?}.join({a:?}.meet({b:?})) != {a:?}"
                ));
            }
            if a.meet(&a.join(b)) != *a {
                v.push(format!(
                    "absorption violated: {a:?}.meet({a:?}.join({b:?})) != {a:?}"
                ));
            }
        }
    }
}

fn check_ordering_consistent<L: Lattice + PartialEq + Debug>(elements: &[L], v: &mut Vec<String>) {
    for a in elements {
        for b in elements {
            let sub = a.is_subseteq(b);
            let join_agrees = a.join(b) == *b;
            let meet_agrees = a.meet(b) == *a;
            if sub != join_agrees {
                v.push(format!(
                    "ordering inconsistent with join: {a:?}.is_subseteq({b:?}) = {sub}, \
                     but {a:?}.join({b:?}) == {b:?} is {join_agrees}"
                ));
            }
            if sub != meet_agrees {
                v.push(format!(
                    "ordering inconsistent with meet: {a:?}.is_subseteq({b:?}) = {sub}, \
                     but {a:?}.meet({b:?}) == {a:?} is {meet_agrees}"
                ));
            }
        }
    }
}

fn check_bottom_laws<L: HasBottom + PartialEq + Debug>(elements: &[L], v: &mut Vec<String>) {
    let bot = L::bottom();
    for x in elements {
        if !bot.is_subseteq(x) {
            v.push(format!(
                "bottom not below element: bottom().is_subseteq({x:?}) = false"
            ));
        }
        if bot.join(x) != *x {
            v.push(format!(
                "bottom identity violated: bottom().join({x:?}) != {x:?}"
            ));
        }
        if bot.meet(x) != bot {
            v.push(format!(
                "bottom annihilation violated: bottom().meet({x:?}) != bottom()"
            ));
        }
    }
}

fn check_top_laws<L: HasTop + PartialEq + Debug>(elements: &[L], v: &mut Vec<String>) {
    let top = L::top();
    for x in elements {
        if !x.is_subseteq(&top) {
            v.push(format!(
                "element not below top: {x:?}.is_subseteq(top()) = false"
            ));
        }
        if top.join(x) != top {
            v.push(format!(
                "top annihilation violated: top().join({x:?}) != top()"
            ));
        }
        if top.meet(x) != *x {
            v.push(format!("top identity violated: top().meet({x:?}) != {x:?}"));
        }
    }
}
