mod counters;
mod file;
mod records;

pub use counters::InMemoryCounterStore;
pub use file::JsonFileCounterStore;
pub use records::InMemoryRecordStore;
