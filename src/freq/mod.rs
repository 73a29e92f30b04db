pub mod collection;
pub mod counter;
pub mod table;

pub use collection::Collection;
pub use counter::CharCounter;
pub use table::FrequencyTable;
