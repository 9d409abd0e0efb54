//! Real-coded genetic optimization of the membership-function
//! breakpoints: fitness over a labeled batch, a tournament-selected
//! population, and the generation loop.

pub mod engine;
pub mod fitness;
pub mod population;

pub use engine::GaEngine;
pub use fitness::FitnessEvaluator;
pub use population::Population;
