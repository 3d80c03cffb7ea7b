//! Strength-based fitness assignment for multi-objective evolutionary search.
//!
//! Implements the fitness scheme of the FPGA algorithm, a SPEA2-style
//! assignment that scores every solution of a (possibly merged
//! generation + archive) population by the strength of the solutions it
//! dominates minus the strength of those dominating it.
//!
//! - [`fpga::FpgaFitness`]: the fitness assigner
//! - [`fpga::ranking`]: rank and crowding distance preparation
//!
//! # Architecture
//!
//! This crate sits at Layer 2 (Algorithms) in the U-Engine ecosystem. It
//! contains no domain-specific concepts: solutions, populations, and the
//! dominance relation are all supplied by the caller through traits.

pub mod fpga;
