mod feed_foward;
mod linear;
mod model;
pub(crate) mod module;
mod regularizer;

pub use feed_foward::*;
pub use linear::*;
pub use model::*;
pub use module::*;
pub use regularizer::*;
