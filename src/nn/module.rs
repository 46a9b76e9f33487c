use crate::error::Result;
use crate::tensor::{Graph, NodeId, Numeric, TensorList};

pub(crate) mod private {
    pub trait Private {}
}

/// A building block that appends its computation to a [`Graph`].
///
/// Modules only hold node handles, so building the same module twice on one
/// graph shares its parameters.
pub trait Module<T: Numeric>: private::Private {
    fn forward(&self, graph: &mut Graph<T>, input: NodeId) -> Result<NodeId>;

    /// The trainable leaves, in the order the optimizer walks them.
    fn params(&self) -> TensorList;
}
