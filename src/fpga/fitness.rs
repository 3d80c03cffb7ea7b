//! FPGA fitness assignment.
//!
//! [`FpgaFitness`] binds to a population (possibly the union of the current
//! generation and an archive) and writes a scalar fitness into every
//! solution. The scheme is SPEA2-like:
//!
//! - `strength(i)` = number of solutions `i` dominates
//! - `fitness(i)` = Σ strength(j) over the `j` that `i` dominates
//!   − Σ strength(j) over the `j` that dominate `i`
//!
//! Higher fitness is better. Before the strength pass, every rank-0
//! solution is seeded with its crowding distance.
//!
//! Rank and crowding distance are inputs. They must be computed before
//! [`FpgaFitness::assign`] is called, for example with
//! [`rank_and_crowd`](super::ranking::rank_and_crowd).
//!
//! # Complexity
//!
//! O(n²) comparator calls for the strength pass and again for the fitness
//! pass, where n is the population size.

use super::config::FpgaConfig;
use super::dominance::{Dominance, DominanceComparator};
use super::types::{Population, Solution};
use rayon::prelude::*;

/// Strength-based fitness assigner bound to one population.
///
/// Construction writes each solution's position into its location index.
/// [`assign`](Self::assign) then performs the fitness pass in three
/// ordered phases: seed front 0 with crowding distance, compute strength,
/// compute and write fitness.
///
/// # Example
///
/// ```
/// use u_fpga_fitness::fpga::{rank_and_crowd, Candidate, FpgaFitness, ParetoDominance};
///
/// let mut population = vec![
///     Candidate::new(vec![1.0, 1.0]), // A dominates B and C
///     Candidate::new(vec![2.0, 3.0]), // B
///     Candidate::new(vec![3.0, 2.0]), // C
/// ];
/// rank_and_crowd(&mut population, &ParetoDominance);
///
/// let problem = ();
/// let mut fitness = FpgaFitness::new(&mut population, &problem, ParetoDominance);
/// assert_eq!(fitness.strength(), vec![2.0, 0.0, 0.0]);
/// fitness.assign();
///
/// assert_eq!(population[0].fitness, 0.0);
/// assert_eq!(population[1].fitness, -2.0);
/// assert_eq!(population[2].fitness, -2.0);
/// assert_eq!(population[2].location, 2);
/// ```
pub struct FpgaFitness<'a, P: ?Sized, Pr: ?Sized, C> {
    population: &'a mut P,
    problem: &'a Pr,
    comparator: C,
    config: FpgaConfig,
}

impl<'a, P, Pr, C> FpgaFitness<'a, P, Pr, C>
where
    P: Population + ?Sized,
    Pr: ?Sized,
    C: DominanceComparator<P::Solution>,
{
    /// Binds an assigner to `population` and `problem`.
    ///
    /// Sets the location of the solution at index `i` to `i`. Any
    /// population is accepted, including an empty one.
    pub fn new(population: &'a mut P, problem: &'a Pr, comparator: C) -> Self {
        for i in 0..population.len() {
            population.get_mut(i).set_location(i);
        }

        Self {
            population,
            problem,
            comparator,
            config: FpgaConfig::default(),
        }
    }

    /// Replaces the execution configuration.
    ///
    /// The configuration is not validated here; call
    /// [`FpgaConfig::validate`] first.
    pub fn with_config(mut self, config: FpgaConfig) -> Self {
        self.config = config;
        self
    }

    /// The bound population.
    pub fn population(&self) -> &P {
        &*self.population
    }

    /// The bound problem. Not used by the fitness formula.
    pub fn problem(&self) -> &Pr {
        self.problem
    }

    /// The dominance comparator.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// The execution configuration.
    pub fn config(&self) -> &FpgaConfig {
        &self.config
    }

    /// Assigns FPGA fitness to every solution in the population.
    ///
    /// 1. Rank-0 solutions get `fitness = crowding_distance`.
    /// 2. Strength is computed for every solution.
    /// 3. Fitness is computed from strength and written to every solution,
    ///    replacing the seed from step 1.
    ///
    /// Calling this twice without changing rank, crowding distance or the
    /// comparator yields the same fitness values.
    pub fn assign(&mut self) {
        let n = self.population.len();

        let front_size = self.seed_front();
        tracing::trace!(front_size, "seeded front-0 fitness with crowding distance");

        let strength = self.strength();
        let fitness = self.fitness_from_strength(&strength);

        for (i, f) in fitness.into_iter().enumerate() {
            self.population.get_mut(i).set_fitness(f);
        }

        tracing::debug!(
            population = n,
            front_size,
            max_strength = strength.iter().copied().fold(0.0, f64::max),
            parallel = self.config.runs_parallel(n),
            "assigned FPGA fitness"
        );
    }

    /// Computes the strength of every solution without writing anything.
    ///
    /// `strength[i]` is the number of solutions `i` dominates, so it lies
    /// in `[0, n - 1]` for a valid comparator.
    pub fn strength(&self) -> Vec<f64> {
        let population = &*self.population;
        let comparator = &self.comparator;
        let n = population.len();

        let count = |i: usize| -> f64 {
            let a = population.get(i);
            (0..n)
                .filter(|&j| comparator.compare(a, population.get(j)) == Dominance::Left)
                .count() as f64
        };

        if self.config.runs_parallel(n) {
            (0..n).into_par_iter().map(count).collect()
        } else {
            (0..n).map(count).collect()
        }
    }

    /// Seeds every rank-0 solution with its crowding distance.
    ///
    /// Returns the number of rank-0 solutions.
    fn seed_front(&mut self) -> usize {
        let mut front_size = 0;
        for i in 0..self.population.len() {
            let solution = self.population.get_mut(i);
            if solution.rank() == 0 {
                let distance = solution.crowding_distance();
                solution.set_fitness(distance);
                front_size += 1;
            }
        }
        front_size
    }

    /// Fitness of every solution given the full strength vector.
    fn fitness_from_strength(&self, strength: &[f64]) -> Vec<f64> {
        let population = &*self.population;
        let comparator = &self.comparator;
        let n = population.len();
        debug_assert_eq!(strength.len(), n);

        // j is visited in ascending order on both paths so sums are identical
        let fitness_of = |i: usize| -> f64 {
            let a = population.get(i);
            (0..n).fold(0.0, |acc, j| {
                match comparator.compare(a, population.get(j)) {
                    Dominance::Left => acc + strength[j],
                    Dominance::Right => acc - strength[j],
                    Dominance::Neither => acc,
                }
            })
        };

        if self.config.runs_parallel(n) {
            (0..n).into_par_iter().map(fitness_of).collect()
        } else {
            (0..n).map(fitness_of).collect()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fpga::ranking::rank_and_crowd;
    use crate::fpga::{Candidate, ConstrainedDominance, ParetoDominance};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    fn population(objs: &[&[f64]]) -> Vec<Candidate> {
        objs.iter().map(|o| Candidate::new(o.to_vec())).collect()
    }

    fn fitness_of(pop: &[Candidate]) -> Vec<f64> {
        pop.iter().map(|c| c.fitness).collect()
    }

    fn random_population(rng: &mut StdRng, n: usize, m: usize) -> Vec<Candidate> {
        (0..n)
            .map(|_| Candidate::new((0..m).map(|_| rng.random_range(0.0..10.0)).collect()))
            .collect()
    }

    /// Test comparator: index-based dominance table.
    fn table(edges: &'static [(usize, usize)]) -> impl Fn(&Candidate, &Candidate) -> Dominance {
        move |a: &Candidate, b: &Candidate| {
            if edges.contains(&(a.location, b.location)) {
                Dominance::Left
            } else if edges.contains(&(b.location, a.location)) {
                Dominance::Right
            } else {
                Dominance::Neither
            }
        }
    }

    // ---- Construction ----

    #[test]
    fn test_locations_assigned() {
        let mut pop = population(&[&[1.0], &[2.0], &[3.0], &[4.0]]);
        for c in pop.iter_mut() {
            c.location = 99;
        }
        let _ = FpgaFitness::new(&mut pop, &(), ParetoDominance);
        let locations: Vec<usize> = pop.iter().map(|c| c.location).collect();
        assert_eq!(locations, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_locations_stable_after_assign() {
        let mut pop = population(&[&[3.0, 1.0], &[1.0, 3.0], &[4.0, 4.0]]);
        rank_and_crowd(&mut pop, &ParetoDominance);
        FpgaFitness::new(&mut pop, &(), ParetoDominance).assign();
        let locations: Vec<usize> = pop.iter().map(|c| c.location).collect();
        assert_eq!(locations, vec![0, 1, 2]);
    }

    #[test]
    fn test_problem_accessor() {
        struct Zdt1 {
            variables: usize,
        }
        let problem = Zdt1 { variables: 30 };
        let mut pop = population(&[&[1.0]]);
        let fitness = FpgaFitness::new(&mut pop, &problem, ParetoDominance);
        assert_eq!(fitness.problem().variables, 30);
        assert_eq!(Population::len(fitness.population()), 1);
    }

    // ---- Edge sizes ----

    #[test]
    fn test_empty_population() {
        let mut pop: Vec<Candidate> = Vec::new();
        let mut fitness = FpgaFitness::new(&mut pop, &(), ParetoDominance);
        assert!(fitness.strength().is_empty());
        fitness.assign();
        assert!(pop.is_empty());
    }

    #[test]
    fn test_single_solution_rank_zero() {
        let mut pop = vec![Candidate::new(vec![1.0, 2.0]).with_ranking(0, f64::INFINITY)];
        let mut fitness = FpgaFitness::new(&mut pop, &(), ParetoDominance);
        assert_eq!(fitness.strength(), vec![0.0]);
        fitness.assign();
        assert_eq!(pop[0].fitness, 0.0);
    }

    #[test]
    fn test_single_solution_higher_rank() {
        let mut pop = vec![Candidate::new(vec![1.0]).with_ranking(3, 0.5)];
        pop[0].fitness = 42.0;
        FpgaFitness::new(&mut pop, &(), ParetoDominance).assign();
        assert_eq!(pop[0].fitness, 0.0);
    }

    // ---- Scenarios ----

    #[test]
    fn test_one_dominates_two() {
        // A dominates B and C; B and C are incomparable
        let mut pop = population(&[&[1.0, 1.0], &[2.0, 3.0], &[3.0, 2.0]]);
        rank_and_crowd(&mut pop, &ParetoDominance);

        let mut fitness = FpgaFitness::new(&mut pop, &(), ParetoDominance);
        assert_eq!(fitness.strength(), vec![2.0, 0.0, 0.0]);
        fitness.assign();

        assert_eq!(fitness_of(&pop), vec![0.0, -2.0, -2.0]);
    }

    #[test]
    fn test_chain() {
        // 0 > 1 > 2 (totally ordered)
        let mut pop = population(&[&[1.0, 1.0], &[2.0, 2.0], &[3.0, 3.0]]);
        rank_and_crowd(&mut pop, &ParetoDominance);

        let mut fitness = FpgaFitness::new(&mut pop, &(), ParetoDominance);
        assert_eq!(fitness.strength(), vec![2.0, 1.0, 0.0]);
        fitness.assign();

        // 0: +s1 +s2 = 1
        // 1: +s2 -s0 = -2
        // 2: -s0 -s1 = -3
        assert_eq!(fitness_of(&pop), vec![1.0, -2.0, -3.0]);
    }

    #[test]
    fn test_dominator_gets_sum_of_strengths() {
        // 0 dominates 1..=4; 1 dominates 3 and 4; 2 dominates 4
        static EDGES: &[(usize, usize)] = &[
            (0, 1),
            (0, 2),
            (0, 3),
            (0, 4),
            (1, 3),
            (1, 4),
            (2, 4),
        ];
        let mut pop = vec![Candidate::new(vec![0.0]); 5];
        let mut fitness = FpgaFitness::new(&mut pop, &(), table(EDGES));
        let strength = fitness.strength();
        assert_eq!(strength, vec![4.0, 2.0, 1.0, 0.0, 0.0]);
        fitness.assign();

        let others: f64 = strength[1..].iter().sum();
        assert_eq!(pop[0].fitness, others);
        let max = fitness_of(&pop).into_iter().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(pop[0].fitness, max);
    }

    #[test]
    fn test_all_non_dominated_is_zero() {
        let mut pop = population(&[&[1.0, 4.0], &[2.0, 3.0], &[3.0, 2.0], &[4.0, 1.0]]);
        rank_and_crowd(&mut pop, &ParetoDominance);
        assert!(pop.iter().all(|c| c.rank == 0));
        assert!(pop[0].crowding_distance.is_infinite());

        FpgaFitness::new(&mut pop, &(), ParetoDominance).assign();
        assert!(pop.iter().all(|c| c.fitness == 0.0));
    }

    #[test]
    fn test_constrained_comparator() {
        // Feasible 0 dominates infeasible 1 despite worse objectives
        let mut pop = vec![
            Candidate::new(vec![5.0, 5.0]),
            Candidate::new(vec![1.0, 1.0]).with_constraint_violation(0.3),
        ];
        rank_and_crowd(&mut pop, &ConstrainedDominance);
        assert_eq!(pop[0].rank, 0);
        assert_eq!(pop[1].rank, 1);

        let mut fitness = FpgaFitness::new(&mut pop, &(), ConstrainedDominance);
        assert_eq!(fitness.strength(), vec![1.0, 0.0]);
        fitness.assign();
        assert_eq!(fitness_of(&pop), vec![0.0, -1.0]);
    }

    // ---- Phase ordering ----

    #[test]
    fn test_seed_visible_during_strength_pass() {
        let mut pop = vec![
            Candidate::new(vec![1.0]).with_ranking(0, 7.5),
            Candidate::new(vec![2.0]).with_ranking(1, 0.0),
            Candidate::new(vec![3.0]).with_ranking(2, 0.0),
        ];
        pop[0].fitness = -100.0;

        let seed_missing = AtomicBool::new(false);
        let calls = AtomicUsize::new(0);
        let comparator = |a: &Candidate, b: &Candidate| {
            calls.fetch_add(1, Ordering::Relaxed);
            if a.rank == 0 && a.fitness != a.crowding_distance {
                seed_missing.store(true, Ordering::Relaxed);
            }
            ParetoDominance.compare(a, b)
        };

        FpgaFitness::new(&mut pop, &(), comparator)
            .with_config(FpgaConfig::sequential())
            .assign();

        assert!(!seed_missing.load(Ordering::Relaxed));
        // strength pass + fitness pass, n² each
        assert_eq!(calls.load(Ordering::Relaxed), 18);
        // and the seed is overwritten in the end
        assert_eq!(pop[0].fitness, 1.0);
    }

    #[test]
    fn test_higher_rank_fitness_not_seeded() {
        let mut pop = vec![
            Candidate::new(vec![1.0]).with_ranking(0, 2.0),
            Candidate::new(vec![2.0]).with_ranking(1, 9.0),
        ];
        pop[1].fitness = -5.0;

        let rank_one_seeded = AtomicBool::new(false);
        let comparator = |a: &Candidate, b: &Candidate| {
            if a.rank == 1 && a.fitness == 9.0 {
                rank_one_seeded.store(true, Ordering::Relaxed);
            }
            ParetoDominance.compare(a, b)
        };

        FpgaFitness::new(&mut pop, &(), comparator)
            .with_config(FpgaConfig::sequential())
            .assign();
        assert!(!rank_one_seeded.load(Ordering::Relaxed));
    }

    // ---- Idempotence / determinism ----

    #[test]
    fn test_idempotent() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pop = random_population(&mut rng, 40, 3);
        rank_and_crowd(&mut pop, &ParetoDominance);

        let mut fitness = FpgaFitness::new(&mut pop, &(), ParetoDominance);
        fitness.assign();
        let first: Vec<f64> = fitness_of(fitness.population());
        fitness.assign();
        let second: Vec<f64> = fitness_of(fitness.population());
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seq = random_population(&mut rng, 150, 2);
        rank_and_crowd(&mut seq, &ParetoDominance);
        let mut par = seq.clone();

        FpgaFitness::new(&mut seq, &(), ParetoDominance)
            .with_config(FpgaConfig::sequential())
            .assign();
        let config = FpgaConfig::default().with_parallel_threshold(1);
        assert!(config.runs_parallel(par.len()));
        FpgaFitness::new(&mut par, &(), ParetoDominance)
            .with_config(config)
            .assign();

        assert_eq!(fitness_of(&seq), fitness_of(&par));
    }

    #[test]
    fn test_invalid_comparator_still_completes() {
        // Every pair reports "left dominates", including self comparison
        let mut pop = population(&[&[1.0], &[2.0], &[3.0]]);
        let always_left = |_: &Candidate, _: &Candidate| Dominance::Left;
        let mut fitness = FpgaFitness::new(&mut pop, &(), always_left);
        assert_eq!(fitness.strength(), vec![3.0, 3.0, 3.0]);
        fitness.assign();
        assert!(pop.iter().all(|c| c.fitness.is_finite()));
    }

    // ---- Properties ----

    fn objective_population() -> impl Strategy<Value = Vec<Vec<f64>>> {
        (1usize..4).prop_flat_map(|m| {
            prop::collection::vec(prop::collection::vec(0.0f64..5.0, m), 0..25)
        })
    }

    proptest! {
        #[test]
        fn prop_strength_counts_dominated(objs in objective_population()) {
            let mut pop: Vec<Candidate> = objs.into_iter().map(Candidate::new).collect();
            let n = pop.len();
            let fitness = FpgaFitness::new(&mut pop, &(), ParetoDominance);
            let strength = fitness.strength();
            let pop = fitness.population();

            prop_assert_eq!(strength.len(), n);
            for i in 0..n {
                let expected = (0..n)
                    .filter(|&j| j != i && ParetoDominance.compare(&pop[i], &pop[j]) == Dominance::Left)
                    .count() as f64;
                prop_assert_eq!(strength[i], expected);
                prop_assert!(strength[i] <= n.saturating_sub(1) as f64);
            }
        }

        #[test]
        fn prop_locations_match_positions(objs in objective_population()) {
            let mut pop: Vec<Candidate> = objs.into_iter().map(Candidate::new).collect();
            rank_and_crowd(&mut pop, &ParetoDominance);
            FpgaFitness::new(&mut pop, &(), ParetoDominance).assign();
            for (i, c) in pop.iter().enumerate() {
                prop_assert_eq!(c.location, i);
            }
        }

        #[test]
        fn prop_non_dominated_fitness_non_negative(objs in objective_population()) {
            // Nothing dominates a rank-0 solution, so only positive terms remain
            let mut pop: Vec<Candidate> = objs.into_iter().map(Candidate::new).collect();
            rank_and_crowd(&mut pop, &ParetoDominance);
            FpgaFitness::new(&mut pop, &(), ParetoDominance).assign();
            for c in pop.iter().filter(|c| c.rank == 0) {
                prop_assert!(c.fitness >= 0.0);
            }
        }

        #[test]
        fn prop_idempotent(objs in objective_population()) {
            let mut pop: Vec<Candidate> = objs.into_iter().map(Candidate::new).collect();
            rank_and_crowd(&mut pop, &ParetoDominance);
            let mut fitness = FpgaFitness::new(&mut pop, &(), ParetoDominance)
                .with_config(FpgaConfig::sequential());
            fitness.assign();
            let first = fitness_of(fitness.population());
            fitness.assign();
            prop_assert_eq!(first, fitness_of(fitness.population()));
        }
    }
}
