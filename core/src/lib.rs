//! Synthetic longitudinal cohort generator.
//!
//! Subjects get a gender and a random number of scheduled visits; each
//! visit may be a no-show, and attended visits yield a value that follows
//! a gender-stratified linear trend in elapsed days plus Normal(0, 1) noise.

pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod generator;
pub mod profile_stage;
pub mod rng;
pub mod store;
pub mod trend;
pub mod types;
pub mod visit_stage;
