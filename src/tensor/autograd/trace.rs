use crate::tensor::numeric::Numeric;
use crate::tensor::{Graph, NodeId, Tensor};

/// Pull-based walk over the nodes a root depends on.
pub struct Trace<'a, T: Numeric> {
    graph: &'a Graph<T>,
    order: std::vec::IntoIter<NodeId>,
}

impl<'a, T: Numeric> Trace<'a, T> {
    pub(super) fn new(graph: &'a Graph<T>, order: Vec<NodeId>) -> Trace<'a, T> {
        Trace {
            graph,
            order: order.into_iter(),
        }
    }
}

impl<'a, T: Numeric> Iterator for Trace<'a, T> {
    type Item = (NodeId, &'a Tensor<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.order.next()?;
        Some((id, &self.graph.nodes[id.0].tensor))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<'a, T: Numeric> ExactSizeIterator for Trace<'a, T> {}
