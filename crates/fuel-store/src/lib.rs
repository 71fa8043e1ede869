//! Partitioned parquet store for the fuel price lake.
//!
//! Layers are directory trees of `key=value` segments, each leaf holding
//! snappy-compressed parquet files. [`PartitionWriter`] splits a table by its
//! partition columns; [`PartitionReader`] walks a tree back into one table,
//! restoring the partition values from the path.

pub mod error;
pub mod file;
pub mod reader;
pub mod writer;

pub use error::{Result, StoreError};
pub use file::{read_parquet, write_table};
pub use reader::{PartitionInfo, PartitionReader, PartitionValue, partition_values};
pub use writer::{PartitionWriter, WriteSummary};
