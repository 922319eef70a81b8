// Batch jobs composing the source, conversion and join stages
//
// Each job value is built once per invocation from the resolved
// configuration and command-line arguments, then run to completion.

mod export;
mod extract;

pub use export::{ExportJob, ExportReport};
pub use extract::{ExtractJob, ExtractReport};
