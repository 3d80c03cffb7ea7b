//! Collaborator contracts for FPGA fitness assignment.
//!
//! The fitness core never owns solutions. It talks to them through
//! [`Solution`] (rank, crowding distance, fitness, location) and to the
//! container through [`Population`]. Built-in comparators additionally
//! need [`Objectives`]; the ranking helper needs [`Ranked`].
//!
//! [`Candidate`] is a ready-made implementation of all four traits for
//! callers that do not have their own solution type.

/// A member of the population, as seen by the fitness assigner.
///
/// The assigner reads [`rank`](Solution::rank) and
/// [`crowding_distance`](Solution::crowding_distance), and writes
/// [`set_fitness`](Solution::set_fitness) and
/// [`set_location`](Solution::set_location).
///
/// # Implementing
///
/// ```ignore
/// struct Route {
///     cost: f64,
///     length: f64,
///     rank: usize,
///     crowding: f64,
///     fitness: f64,
///     location: usize,
/// }
///
/// impl Solution for Route {
///     fn rank(&self) -> usize { self.rank }
///     fn crowding_distance(&self) -> f64 { self.crowding }
///     fn fitness(&self) -> f64 { self.fitness }
///     fn set_fitness(&mut self, f: f64) { self.fitness = f; }
///     fn location(&self) -> usize { self.location }
///     fn set_location(&mut self, l: usize) { self.location = l; }
/// }
/// ```
pub trait Solution: Send + Sync {
    /// Pareto front index (0 = non-dominated).
    fn rank(&self) -> usize;

    /// Crowding distance within the solution's front.
    fn crowding_distance(&self) -> f64;

    /// Current fitness. Higher is better.
    fn fitness(&self) -> f64;

    /// Overwrites the fitness.
    fn set_fitness(&mut self, fitness: f64);

    /// Position of the solution in the population it was last bound to.
    fn location(&self) -> usize;

    /// Overwrites the location index.
    fn set_location(&mut self, location: usize);
}

/// Objective-space view of a solution, used by the built-in comparators
/// and by crowding distance.
///
/// All objectives are **minimized**.
pub trait Objectives {
    /// Objective values. Every solution compared against each other must
    /// report the same number of objectives.
    fn objectives(&self) -> &[f64];

    /// Overall constraint violation: 0 for feasible solutions, larger is
    /// worse.
    fn constraint_violation(&self) -> f64 {
        0.0
    }
}

/// A solution whose rank and crowding distance can be written by
/// [`ranking`](super::ranking).
pub trait Ranked: Solution {
    /// Overwrites the Pareto rank.
    fn set_rank(&mut self, rank: usize);

    /// Overwrites the crowding distance.
    fn set_crowding_distance(&mut self, distance: f64);
}

/// Ordered, indexable container of solutions.
///
/// Order matters: the fitness assigner writes each solution's position
/// into its location index.
///
/// Implemented for `Vec<S>` and `[S]`.
pub trait Population: Sync {
    /// The solution type stored in this population.
    type Solution: Solution;

    /// Number of solutions.
    fn len(&self) -> usize;

    /// Returns `true` if the population holds no solutions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Solution at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    fn get(&self, index: usize) -> &Self::Solution;

    /// Mutable solution at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    fn get_mut(&mut self, index: usize) -> &mut Self::Solution;
}

impl<S: Solution> Population for [S] {
    type Solution = S;

    fn len(&self) -> usize {
        <[S]>::len(self)
    }

    fn get(&self, index: usize) -> &S {
        &self[index]
    }

    fn get_mut(&mut self, index: usize) -> &mut S {
        &mut self[index]
    }
}

impl<S: Solution> Population for Vec<S> {
    type Solution = S;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> &S {
        &self[index]
    }

    fn get_mut(&mut self, index: usize) -> &mut S {
        &mut self[index]
    }
}

/// Concrete multi-objective solution.
///
/// # Example
///
/// ```
/// use u_fpga_fitness::fpga::{Candidate, Solution};
///
/// let c = Candidate::new(vec![1.0, 2.0]).with_constraint_violation(0.5);
/// assert_eq!(c.rank(), 0);
/// assert_eq!(c.fitness(), 0.0);
/// assert_eq!(c.constraint_violation, 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    /// Objective values (minimized).
    pub objectives: Vec<f64>,

    /// Overall constraint violation (0 = feasible).
    pub constraint_violation: f64,

    /// Pareto rank (0 = front).
    pub rank: usize,

    /// Crowding distance within the front.
    pub crowding_distance: f64,

    /// Assigned fitness (higher is better).
    pub fitness: f64,

    /// Position in the population last bound to an assigner.
    pub location: usize,
}

impl Candidate {
    /// Creates a feasible, unranked candidate.
    pub fn new(objectives: Vec<f64>) -> Self {
        Self {
            objectives,
            constraint_violation: 0.0,
            rank: 0,
            crowding_distance: 0.0,
            fitness: 0.0,
            location: 0,
        }
    }

    /// Sets the constraint violation (negative values are clamped to 0).
    pub fn with_constraint_violation(mut self, violation: f64) -> Self {
        self.constraint_violation = violation.max(0.0);
        self
    }

    /// Sets rank and crowding distance, for callers that ranked elsewhere.
    pub fn with_ranking(mut self, rank: usize, crowding_distance: f64) -> Self {
        self.rank = rank;
        self.crowding_distance = crowding_distance;
        self
    }
}

impl Solution for Candidate {
    fn rank(&self) -> usize {
        self.rank
    }

    fn crowding_distance(&self) -> f64 {
        self.crowding_distance
    }

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    fn location(&self) -> usize {
        self.location
    }

    fn set_location(&mut self, location: usize) {
        self.location = location;
    }
}

impl Objectives for Candidate {
    fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    fn constraint_violation(&self) -> f64 {
        self.constraint_violation
    }
}

impl Ranked for Candidate {
    fn set_rank(&mut self, rank: usize) {
        self.rank = rank;
    }

    fn set_crowding_distance(&mut self, distance: f64) {
        self.crowding_distance = distance;
    }
}
