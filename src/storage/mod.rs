// Storage layer: student records and the document partitions
pub mod partitions;
pub mod record_store;

pub use partitions::{DocumentPartitions, PartitionProvider};
pub use record_store::{seed_database, FlatFileRecords, RecordLookup, RecordStore, SearchCriterion};
