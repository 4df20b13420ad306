//! Comma- and semicolon-separated file adapters.

pub mod archive;
pub mod batch;
pub mod polygon;
pub mod table;

pub use archive::CsvArchiveStore;
pub use batch::SemicolonBatchReader;
pub use polygon::CsvAreaSource;
pub use table::CsvTableWriter;
