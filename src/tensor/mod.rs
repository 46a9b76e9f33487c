mod autograd;
pub mod functional;
mod graph;
mod numeric;
mod raw_tensor;
mod types;

pub use autograd::Trace;
pub use graph::*;
pub use numeric::*;
pub use raw_tensor::*;
pub use types::*;
