//! Forward and backward kernels for every graph operator.
//!
//! Forward kernels read operand values and return the output buffer.
//! Backward kernels read the output's gradient and return one contribution
//! per operand; the engine adds them into the operands' gradient buffers.
mod element_wise_ops;
mod linalg;
mod reduce;

pub use element_wise_ops::*;
pub use linalg::*;
pub use reduce::*;
