pub mod cache;
pub mod fixtures;
pub mod match_lookup;
pub mod metrics;
pub mod predictor;
pub mod remote;

pub use cache::*;
pub use fixtures::*;
pub use match_lookup::*;
pub use metrics::*;
pub use predictor::*;
pub use remote::*;
