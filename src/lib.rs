//! Small feed-forward networks trained with reverse-mode differentiation,
//! heavy-ball momentum and an orthogonality penalty on the weights.
pub mod config;
pub mod data;
pub mod error;
pub mod nn;
pub mod optim;
pub mod plot;
pub mod tensor;
pub mod train;

pub use error::{OrthoError, Result};
