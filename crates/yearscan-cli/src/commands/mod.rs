//! Command implementations.

pub mod combine;
pub mod extract;
pub mod scan;

pub use self::combine::execute_combine;
pub use self::extract::{execute_extract, run_chunks, ChunkSummary};
pub use self::scan::execute_scan;
