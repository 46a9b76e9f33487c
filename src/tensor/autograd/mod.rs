//! Reverse-mode differentiation over the node arena.
//!
//! A call to [`Graph::gradient`] does one forward pass over every node the
//! cost depends on, in arena order, then one backward pass in reverse arena
//! order. Reverse order guarantees that every consumer of a node has added
//! its contribution before that node propagates further upstream, so shared
//! sub-expressions are evaluated once and their gradients are summed.
mod trace;

pub use trace::Trace;

use crate::error::{OrthoError, Result};
use crate::tensor::functional;
use crate::tensor::numeric::*;
use crate::tensor::{Graph, NodeId, Op, Tensor};

impl<T: Numeric> Graph<T> {
    /// Every node `root` depends on, itself included, in evaluation order.
    pub(in crate::tensor) fn reachable(&self, root: NodeId) -> Result<Vec<NodeId>> {
        self.node(root)?;
        // operands always precede their consumers, so nothing past root is visited
        let mut seen = vec![false; root.0 + 1];
        seen[root.0] = true;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            for input in self.nodes[id.0].op.inputs() {
                if !seen[input.0] {
                    seen[input.0] = true;
                    stack.push(input);
                }
            }
        }
        Ok(seen
            .iter()
            .enumerate()
            .filter(|(_, &reached)| reached)
            .map(|(i, _)| NodeId(i))
            .collect())
    }

    fn cached(&self, id: NodeId) -> &Tensor<T> {
        &self.nodes[id.0].tensor
    }

    fn forward(&mut self, order: &[NodeId]) -> Result<()> {
        for &id in order {
            let node = &self.nodes[id.0];
            let values = match node.op {
                Op::Leaf => {
                    if !node.tensor.is_populated() {
                        return Err(OrthoError::Unpopulated { node: id });
                    }
                    continue;
                }
                Op::Mul(a, b) => functional::matmul(self.cached(a), self.cached(b)),
                Op::Transpose(a) => functional::transpose(self.cached(a)),
                Op::Add(a, b) => functional::add(self.cached(a), self.cached(b), &node.tensor),
                Op::Sigmoid(a) => functional::sigmoid(self.cached(a)),
                Op::Everett(a) => functional::everett(self.cached(a)),
                Op::Quadratic(a, b) => functional::quadratic(self.cached(a), self.cached(b)),
                Op::Sum(a) => functional::sum(self.cached(a)),
                Op::Avg(a) => functional::avg(self.cached(a)),
            };
            self.nodes[id.0].tensor.store(values);
        }
        Ok(())
    }

    fn backward(&mut self, order: &[NodeId]) {
        for &id in order.iter().rev() {
            let node = &self.nodes[id.0];
            let output = &node.tensor;
            let contributions = match node.op {
                Op::Leaf => continue,
                Op::Mul(a, b) => {
                    let (d_a, d_b) =
                        functional::matmul_backward(self.cached(a), self.cached(b), output);
                    vec![(a, d_a), (b, d_b)]
                }
                Op::Transpose(a) => vec![(a, functional::transpose_backward(output))],
                Op::Add(a, b) => {
                    let (d_a, d_b) =
                        functional::add_backward(self.cached(a), self.cached(b), output);
                    vec![(a, d_a), (b, d_b)]
                }
                Op::Sigmoid(a) => vec![(a, functional::sigmoid_backward(output))],
                Op::Everett(a) => {
                    vec![(a, functional::everett_backward(self.cached(a), output))]
                }
                Op::Quadratic(a, b) => {
                    let (d_a, d_b) =
                        functional::quadratic_backward(self.cached(a), self.cached(b), output);
                    vec![(a, d_a), (b, d_b)]
                }
                Op::Sum(a) => vec![(a, functional::sum_backward(self.cached(a), output))],
                Op::Avg(a) => vec![(a, functional::avg_backward(self.cached(a), output))],
            };
            // applied one at a time so that an operand used twice, as in mul(w, w),
            // collects both contributions
            for (input, contribution) in contributions {
                self.nodes[input.0].tensor.accumulate(&contribution);
            }
        }
    }

    /// Runs the forward pass only and returns the value cached at `root`.
    pub fn evaluate(&mut self, root: NodeId) -> Result<&Tensor<T>> {
        let order = self.reachable(root)?;
        self.forward(&order)?;
        Ok(self.cached(root))
    }

    /// Computes the scalar `cost` and accumulates d(cost)/d(leaf) into the
    /// gradient buffer of every leaf it depends on.
    ///
    /// Gradient buffers of computed nodes are reset on every call. Leaf
    /// buffers are not: clear parameters with [`Graph::zero_grads`] before
    /// each call unless accumulation across calls is intended.
    pub fn gradient(&mut self, cost: NodeId) -> Result<T> {
        let shape = self.shape(cost)?;
        if !shape.is_scalar() {
            return Err(OrthoError::NonScalarCost { node: cost, shape });
        }
        let order = self.reachable(cost)?;
        self.forward(&order)?;
        for &id in order.iter() {
            let node = &mut self.nodes[id.0];
            if !node.op.is_leaf() {
                node.tensor.zero();
            }
        }
        self.nodes[cost.0].tensor.grads[0] += T::one();
        self.backward(&order);
        Ok(self.cached(cost).values[0])
    }

    /// Walks the value/gradient pair of every node `root` depends on, in
    /// evaluation order. Values are whatever the last pass cached.
    pub fn trace(&self, root: NodeId) -> Result<Trace<'_, T>> {
        Ok(Trace::new(self, self.reachable(root)?))
    }
}
