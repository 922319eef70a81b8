// Parquet file reading and writing
//
// Tables are written with a fixed, size-oriented configuration and read back
// as single Arrow batches.

pub mod partition;
pub mod reader;
pub mod writer;

pub use partition::{part_path, part_ranges, write_partitioned};
pub use reader::read_table;
pub use writer::{write_parquet_file, write_parquet_into};
