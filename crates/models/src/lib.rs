pub mod accuracy;
pub mod match_record;
pub mod predictions;
pub mod error;

pub use accuracy::*;
pub use match_record::*;
pub use predictions::*;
pub use error::*;
