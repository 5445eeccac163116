//! Combine command implementation.

use crate::cli::CombineArgs;
use crate::error::Result;
use crate::metadata::combine_file;

/// Execute the combine command.
pub fn execute_combine(args: CombineArgs) -> Result<()> {
    let summary = combine_file(&args.input, &args.output, args.delimiter)?;
    println!("Combined {} rows into {}", summary.rows_written, args.output.display());
    Ok(())
}
