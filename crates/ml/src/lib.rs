pub mod baseline;
pub mod confidence;
pub mod estimators;
pub mod models;
pub mod outcome;
pub mod params;
pub mod poisson;
pub mod statistics;

pub use baseline::*;
pub use confidence::*;
pub use estimators::*;
pub use models::*;
pub use outcome::*;
pub use params::*;
pub use statistics::*;
