//! Rank and crowding distance preparation.
//!
//! [`FpgaFitness`](super::FpgaFitness) consumes rank and crowding distance
//! as inputs. This module computes both in place, driven by the same
//! [`DominanceComparator`] the fitness pass uses, so the two stay
//! consistent.
//!
//! # Algorithms
//!
//! - [`assign_ranks`]: Fast non-dominated sorting (Deb et al., 2002)
//! - [`assign_crowding_distance`]: Crowding distance within one front
//! - [`rank_and_crowd`]: Both, for every front
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use super::dominance::{Dominance, DominanceComparator};
use super::types::{Objectives, Population, Ranked};

/// Fast non-dominated sorting.
///
/// Writes a Pareto rank into every solution and returns the fronts as
/// index lists: `fronts[0]` holds the rank-0 indices, and so on. An empty
/// population yields no fronts.
///
/// # Algorithm (Deb et al., 2002)
///
/// 1. For each pair of solutions, determine dominance
/// 2. Solutions dominated by no other belong to front 0 (rank 0)
/// 3. Remove front 0, repeat to find subsequent fronts
///
/// # Complexity
///
/// O(n²) comparator calls, where n = number of solutions
///
/// # Example
///
/// ```
/// use u_fpga_fitness::fpga::{assign_ranks, Candidate, ParetoDominance};
///
/// let mut population = vec![
///     Candidate::new(vec![1.0, 5.0]),  // A
///     Candidate::new(vec![3.0, 3.0]),  // B
///     Candidate::new(vec![5.0, 1.0]),  // C
///     Candidate::new(vec![4.0, 4.0]),  // D, dominated by B
/// ];
///
/// let fronts = assign_ranks(&mut population, &ParetoDominance);
///
/// assert_eq!(fronts, vec![vec![0, 1, 2], vec![3]]);
/// assert_eq!(population[3].rank, 1);
/// ```
pub fn assign_ranks<P, C>(population: &mut P, comparator: &C) -> Vec<Vec<usize>>
where
    P: Population + ?Sized,
    P::Solution: Ranked,
    C: DominanceComparator<P::Solution> + ?Sized,
{
    let n = population.len();
    if n == 0 {
        return Vec::new();
    }

    let mut domination_count = vec![0usize; n];
    let mut dominates: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];
    let mut front_0 = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            match comparator.compare(population.get(i), population.get(j)) {
                Dominance::Left => {
                    dominates[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominates[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }

        // every pair involving i has been seen by now
        if domination_count[i] == 0 {
            front_0.push(i);
        }
    }

    let mut fronts = vec![front_0];
    loop {
        let current = &fronts[fronts.len() - 1];
        let mut next_front = Vec::new();

        for &i in current {
            for &j in &dominates[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len();
                    next_front.push(j);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        fronts.push(next_front);
    }

    for (i, &rank) in ranks.iter().enumerate() {
        population.get_mut(i).set_rank(rank);
    }

    tracing::debug!(population = n, fronts = fronts.len(), "assigned Pareto ranks");
    fronts
}

/// Crowding distance assignment within one front.
///
/// Writes the crowding distance of every solution listed in `front`.
/// Higher distance means the solution is more isolated (more diverse).
/// Solutions outside `front` are not touched.
///
/// Fronts of one or two solutions get `f64::INFINITY` for every member.
/// Otherwise boundary solutions (min/max for any objective) receive
/// `f64::INFINITY` and interior ones accumulate the normalized gap between
/// their neighbours. Objectives with zero range contribute nothing.
///
/// # Complexity
///
/// O(m * k * log k) where m = number of objectives, k = front size
///
/// # Panics
///
/// Panics if an index in `front` is out of bounds.
///
/// # Example
///
/// ```
/// use u_fpga_fitness::fpga::{assign_crowding_distance, Candidate};
///
/// let mut population = vec![
///     Candidate::new(vec![1.0, 5.0]),
///     Candidate::new(vec![3.0, 3.0]),
///     Candidate::new(vec![5.0, 1.0]),
/// ];
///
/// assign_crowding_distance(&mut population, &[0, 1, 2]);
///
/// assert!(population[0].crowding_distance.is_infinite());
/// assert!(population[2].crowding_distance.is_infinite());
/// assert!(population[1].crowding_distance.is_finite());
/// ```
pub fn assign_crowding_distance<P>(population: &mut P, front: &[usize])
where
    P: Population + ?Sized,
    P::Solution: Ranked + Objectives,
{
    let k = front.len();
    if k <= 2 {
        for &idx in front {
            population.get_mut(idx).set_crowding_distance(f64::INFINITY);
        }
        return;
    }

    let m = population.get(front[0]).objectives().len();
    debug_assert!(
        front
            .iter()
            .all(|&idx| population.get(idx).objectives().len() == m),
        "all objective vectors must have the same length"
    );

    let objective = |pos: usize, obj_idx: usize| population.get(front[pos]).objectives()[obj_idx];
    let mut distances = vec![0.0f64; k];

    for obj_idx in 0..m {
        // Sort front positions by this objective
        let mut order: Vec<usize> = (0..k).collect();
        order.sort_by(|&a, &b| {
            objective(a, obj_idx)
                .partial_cmp(&objective(b, obj_idx))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        distances[order[0]] = f64::INFINITY;
        distances[order[k - 1]] = f64::INFINITY;

        let min_val = objective(order[0], obj_idx);
        let max_val = objective(order[k - 1], obj_idx);
        let range = max_val - min_val;

        if range > 0.0 {
            for w in 1..(k - 1) {
                let prev = objective(order[w - 1], obj_idx);
                let next = objective(order[w + 1], obj_idx);
                distances[order[w]] += (next - prev) / range;
            }
        }
    }

    for (pos, &idx) in front.iter().enumerate() {
        population.get_mut(idx).set_crowding_distance(distances[pos]);
    }
}

/// Ranks the population and assigns crowding distance within every front.
///
/// Establishes the precondition of
/// [`FpgaFitness::assign`](super::FpgaFitness::assign). Returns the fronts
/// as produced by [`assign_ranks`].
pub fn rank_and_crowd<P, C>(population: &mut P, comparator: &C) -> Vec<Vec<usize>>
where
    P: Population + ?Sized,
    P::Solution: Ranked + Objectives,
    C: DominanceComparator<P::Solution> + ?Sized,
{
    let fronts = assign_ranks(population, comparator);
    for front in &fronts {
        assign_crowding_distance(population, front);
    }
    fronts
}

// ============================================================================
// Tests
// ============================================================================
