// Compliant pool registry records

mod entry;
mod status;

pub use entry::*;
pub use status::*;
