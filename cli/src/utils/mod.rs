pub mod logger;
pub mod moving_average;
pub mod trend_evaluator;

pub use logger::*;
pub use moving_average::*;
pub use trend_evaluator::*;
