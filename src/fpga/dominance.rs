//! Pareto dominance comparison.
//!
//! The fitness assigner never decides dominance itself; it asks an injected
//! [`DominanceComparator`]. Two comparators are provided:
//!
//! - [`ParetoDominance`]: plain Pareto dominance, all objectives minimized
//! - [`ConstrainedDominance`]: constraint violation first, then Pareto
//!
//! Any `Fn(&S, &S) -> Dominance` closure is also a comparator, which keeps
//! tests and custom schemes (epsilon dominance, lexicographic tie breaks)
//! cheap to write.

use super::types::Objectives;

/// Outcome of comparing two solutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other (incomparable or equal).
    Neither,
}

impl Dominance {
    /// Conventional integer encoding: `-1` left dominates, `1` right
    /// dominates, `0` neither.
    pub fn as_sign(self) -> i8 {
        match self {
            Dominance::Left => -1,
            Dominance::Right => 1,
            Dominance::Neither => 0,
        }
    }

    /// The outcome with the operands swapped.
    pub fn reverse(self) -> Self {
        match self {
            Dominance::Left => Dominance::Right,
            Dominance::Right => Dominance::Left,
            Dominance::Neither => Dominance::Neither,
        }
    }
}

/// Three-way dominance test between two solutions.
///
/// Implementations must be a strict partial order: irreflexive
/// (`compare(a, a) == Neither`) and antisymmetric
/// (`compare(a, b) == compare(b, a).reverse()`). Violations are not
/// detected by the fitness assigner; they silently produce inconsistent
/// strength and fitness values.
pub trait DominanceComparator<S: ?Sized>: Send + Sync {
    /// Compares `a` against `b`.
    fn compare(&self, a: &S, b: &S) -> Dominance;
}

impl<S: ?Sized, F> DominanceComparator<S> for F
where
    F: Fn(&S, &S) -> Dominance + Send + Sync,
{
    fn compare(&self, a: &S, b: &S) -> Dominance {
        self(a, b)
    }
}

/// Pareto dominance over [`Objectives::objectives`], minimizing every
/// objective.
///
/// # Example
///
/// ```
/// use u_fpga_fitness::fpga::{Candidate, Dominance, DominanceComparator, ParetoDominance};
///
/// let a = Candidate::new(vec![1.0, 1.0]);
/// let b = Candidate::new(vec![2.0, 1.0]);
/// let c = Candidate::new(vec![0.0, 3.0]);
///
/// assert_eq!(ParetoDominance.compare(&a, &b), Dominance::Left);
/// assert_eq!(ParetoDominance.compare(&b, &a), Dominance::Right);
/// assert_eq!(ParetoDominance.compare(&a, &c), Dominance::Neither);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParetoDominance;

impl<S: Objectives + ?Sized> DominanceComparator<S> for ParetoDominance {
    fn compare(&self, a: &S, b: &S) -> Dominance {
        pareto_cmp(a.objectives(), b.objectives())
    }
}

/// Constraint-first dominance.
///
/// A solution with a smaller [`Objectives::constraint_violation`] dominates
/// one with a larger violation regardless of objectives. Equal violations
/// (in particular two feasible solutions) fall back to
/// [`ParetoDominance`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstrainedDominance;

impl<S: Objectives + ?Sized> DominanceComparator<S> for ConstrainedDominance {
    fn compare(&self, a: &S, b: &S) -> Dominance {
        let va = a.constraint_violation();
        let vb = b.constraint_violation();
        if va < vb {
            Dominance::Left
        } else if vb < va {
            Dominance::Right
        } else {
            pareto_cmp(a.objectives(), b.objectives())
        }
    }
}

/// Compare two objective vectors for Pareto dominance (minimization).
fn pareto_cmp(a: &[f64], b: &[f64]) -> Dominance {
    debug_assert_eq!(
        a.len(),
        b.len(),
        "objective vectors must have the same length"
    );

    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

// ============================================================================
// Tests
// ============================================================================
