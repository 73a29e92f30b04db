pub mod cli;
pub mod collect;
pub mod discover;
pub mod error;
pub mod export;
pub mod freq;
pub mod git;
pub mod model;
pub mod stats;
pub mod store;
pub mod util;

pub use error::{CharFreqError, Result};
pub use freq::{CharCounter, Collection, FrequencyTable};
pub use model::MergePolicy;
