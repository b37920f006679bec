//! Trainer module
//!
//! - `core`: Trainer struct and context building
//! - `fit`: the `Fit` trait and the epoch loop with validation
//! - `result`: TrainResult type

mod core;
mod fit;
mod result;


pub use self::core::Trainer;
pub use fit::Fit;
pub use result::TrainResult;
