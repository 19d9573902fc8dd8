pub mod error;
pub mod extract;
pub mod layer;
pub mod problem;

pub use extract::{Authenticated, ResolvedProject};
pub use layer::{GateLayer, GateService};
pub use problem::Problem;
