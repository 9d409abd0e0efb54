//! GA-tuned Mamdani fuzzy inference for scoring per-timestep anomalies
//! in ADS-B surveillance tracks.
//!
//! The core is the pair of [`fuzzy`] (a parameterized inference system
//! over five kinematic deltas) and [`ga`] (a real-coded genetic
//! algorithm over the membership-function breakpoints, with constrained
//! repair). Everything else adapts data in and results out.

pub mod analysis;
pub mod chromosome;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod fuzzy;
pub mod ga;
pub mod interface;
pub mod preprocess;
pub mod synth;

pub use error::Error;
pub use interface::{Interface, Message};
