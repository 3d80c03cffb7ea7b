//! FPGA fitness assignment.
//!
//! Strength-based scalar fitness for multi-objective evolutionary search,
//! in the style of SPEA2. Every solution receives
//!
//! ```text
//! fitness(i) = Σ strength(j) for j dominated by i
//!            − Σ strength(j) for j dominating i
//! ```
//!
//! where `strength(j)` is the number of solutions `j` dominates. Rank-0
//! solutions are seeded with their crowding distance before the pass.
//!
//! # Core Traits
//!
//! - [`Solution`]: rank, crowding distance, fitness and location accessors
//! - [`Population`]: ordered, indexable container of solutions
//! - [`DominanceComparator`]: injected three-way dominance test
//!
//! # Key Types
//!
//! - [`FpgaFitness`]: binds to a population and assigns fitness
//! - [`FpgaConfig`]: execution parameters (parallelism)
//! - [`Candidate`]: ready-made solution type
//! - [`ParetoDominance`], [`ConstrainedDominance`]: built-in comparators
//!
//! # Submodules
//!
//! - [`ranking`]: non-dominated sorting and crowding distance, to prepare
//!   rank and crowding inputs
//!
//! # References
//!
//! - Zitzler, Laumanns & Thiele (2001), *SPEA2: Improving the Strength
//!   Pareto Evolutionary Algorithm*
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*

mod config;
mod dominance;
mod fitness;
pub mod ranking;
mod types;

pub use config::FpgaConfig;
pub use dominance::{ConstrainedDominance, Dominance, DominanceComparator, ParetoDominance};
pub use fitness::FpgaFitness;
pub use ranking::{assign_crowding_distance, assign_ranks, rank_and_crowd};
pub use types::{Candidate, Objectives, Population, Ranked, Solution};
