//! Model construction, the oracle seam, and solution handling.

pub mod builder;
pub mod expr;
pub mod model;
pub mod oracle;
pub mod solution;
pub mod validation;
pub mod variables;

pub use builder::*;
pub use expr::*;
pub use model::*;
pub use oracle::*;
pub use solution::*;
pub use validation::*;
pub use variables::*;
