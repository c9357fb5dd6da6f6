pub mod detectors;
pub mod engines;
pub mod ground_truth;
pub mod run;

pub use detectors::*;
pub use engines::*;
pub use ground_truth::*;
pub use run::*;
