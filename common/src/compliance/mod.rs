// Compliance policy evaluation
// Turns a decoded whitelist entry plus a caller policy into a verdict

mod evaluator;
mod policy;
mod verdict;

pub use evaluator::*;
pub use policy::*;
pub use verdict::*;
