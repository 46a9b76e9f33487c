//! The expression graph: an arena of nodes addressed by [`NodeId`].
//!
//! Every node owns a [`Tensor`] that doubles as its forward-value cache and
//! its gradient accumulator. Leaves are the only nodes callers write to;
//! every other node is produced by one of the operator constructors below.
//! A node can only refer to nodes created before it, so arena order is a
//! topological order and the engine never has to sort.

use std::fmt;

use log::trace;

use super::numeric::*;
use super::raw_tensor::Tensor;
use super::types::Shape;
use crate::error::{OrthoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(in crate::tensor) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// What a node computes, with the handles of its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Leaf,
    Mul(NodeId, NodeId),
    Transpose(NodeId),
    Add(NodeId, NodeId),
    Sigmoid(NodeId),
    Everett(NodeId),
    Quadratic(NodeId, NodeId),
    Sum(NodeId),
    Avg(NodeId),
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::Leaf => "leaf",
            Op::Mul(..) => "mul",
            Op::Transpose(_) => "transpose",
            Op::Add(..) => "add",
            Op::Sigmoid(_) => "sigmoid",
            Op::Everett(_) => "everett",
            Op::Quadratic(..) => "quadratic",
            Op::Sum(_) => "sum",
            Op::Avg(_) => "avg",
        }
    }

    pub fn inputs(&self) -> impl Iterator<Item = NodeId> {
        let (first, second) = match *self {
            Op::Leaf => (None, None),
            Op::Transpose(a) | Op::Sigmoid(a) | Op::Everett(a) | Op::Sum(a) | Op::Avg(a) => {
                (Some(a), None)
            }
            Op::Mul(a, b) | Op::Add(a, b) | Op::Quadratic(a, b) => (Some(a), Some(b)),
        };
        first.into_iter().chain(second)
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Op::Leaf)
    }
}

#[derive(Debug, Clone)]
pub(in crate::tensor) struct Node<T: Numeric> {
    pub(in crate::tensor) op: Op,
    pub(in crate::tensor) tensor: Tensor<T>,
}

#[derive(Debug, Clone)]
pub struct Graph<T = f32>
where
    T: Numeric,
{
    pub(in crate::tensor) nodes: Vec<Node<T>>,
}

impl<T: Numeric> Default for Graph<T> {
    fn default() -> Self {
        Graph { nodes: Vec::new() }
    }
}

impl<T: Numeric> Graph<T> {
    pub fn new() -> Graph<T> {
        Graph::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(in crate::tensor) fn node(&self, id: NodeId) -> Result<&Node<T>> {
        self.nodes
            .get(id.0)
            .ok_or(OrthoError::UnknownNode { node: id })
    }

    pub fn op(&self, id: NodeId) -> Result<Op> {
        Ok(self.node(id)?.op)
    }

    pub fn shape(&self, id: NodeId) -> Result<Shape> {
        Ok(self.node(id)?.tensor.shape())
    }

    pub fn tensor(&self, id: NodeId) -> Result<&Tensor<T>> {
        Ok(&self.node(id)?.tensor)
    }

    /// Mutable access to a leaf; computed nodes are owned by the engine.
    pub fn tensor_mut(&mut self, id: NodeId) -> Result<&mut Tensor<T>> {
        let node = self
            .nodes
            .get_mut(id.0)
            .ok_or(OrthoError::UnknownNode { node: id })?;
        if !node.op.is_leaf() {
            return Err(OrthoError::NotALeaf { node: id });
        }
        Ok(&mut node.tensor)
    }

    pub fn zero_grads(&mut self, ids: &[NodeId]) -> Result<()> {
        for &id in ids {
            self.tensor_mut(id)?.zero();
        }
        Ok(())
    }

    fn push(&mut self, op: Op, shape: Shape) -> NodeId {
        let id = NodeId(self.nodes.len());
        trace!("{id} = {} -> {shape}", op.name());
        self.nodes.push(Node {
            op,
            tensor: Tensor::new(shape.rows, shape.cols),
        });
        id
    }

    /// An unpopulated slot for an input, a target or a parameter.
    pub fn leaf(&mut self, rows: usize, cols: usize) -> NodeId {
        self.push(Op::Leaf, Shape::new(rows, cols))
    }

    /// A leaf that starts out populated, e.g. a regularization target.
    pub fn constant(&mut self, tensor: Tensor<T>) -> NodeId {
        let id = NodeId(self.nodes.len());
        trace!("{id} = constant -> {}", tensor.shape());
        self.nodes.push(Node {
            op: Op::Leaf,
            tensor,
        });
        id
    }

    /// Matrix product; `a.cols` must equal `b.rows`.
    pub fn mul(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        let (left, right) = (self.shape(a)?, self.shape(b)?);
        if left.cols != right.rows {
            return Err(OrthoError::shape_mismatch("mul", left, right));
        }
        Ok(self.push(Op::Mul(a, b), Shape::new(left.rows, right.cols)))
    }

    pub fn transpose(&mut self, a: NodeId) -> Result<NodeId> {
        let shape = self.shape(a)?;
        Ok(self.push(Op::Transpose(a), shape.transposed()))
    }

    /// Elementwise sum. Along each axis the operands either agree or one of
    /// them has extent 1 and is broadcast.
    pub fn add(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        let shape = broadcast_shape("add", self.shape(a)?, self.shape(b)?)?;
        Ok(self.push(Op::Add(a, b), shape))
    }

    pub fn sigmoid(&mut self, a: NodeId) -> Result<NodeId> {
        let shape = self.shape(a)?;
        Ok(self.push(Op::Sigmoid(a), shape))
    }

    /// Splits every element into `(min(x, 0), max(x, 0))`, doubling the rows.
    pub fn everett(&mut self, a: NodeId) -> Result<NodeId> {
        let shape = self.shape(a)?;
        Ok(self.push(Op::Everett(a), Shape::new(2 * shape.rows, shape.cols)))
    }

    /// Elementwise `(a - b)^2`; the operands must have the same shape.
    pub fn quadratic(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        let (left, right) = (self.shape(a)?, self.shape(b)?);
        if left != right {
            return Err(OrthoError::shape_mismatch("quadratic", left, right));
        }
        Ok(self.push(Op::Quadratic(a, b), left))
    }

    pub fn sum(&mut self, a: NodeId) -> Result<NodeId> {
        self.shape(a)?;
        Ok(self.push(Op::Sum(a), Shape::SCALAR))
    }

    pub fn avg(&mut self, a: NodeId) -> Result<NodeId> {
        self.shape(a)?;
        Ok(self.push(Op::Avg(a), Shape::SCALAR))
    }
}

fn broadcast_shape(op: &'static str, left: Shape, right: Shape) -> Result<Shape> {
    let axis = |l: usize, r: usize| match (l, r) {
        (l, r) if l == r => Some(l),
        (1, r) => Some(r),
        (l, 1) => Some(l),
        _ => None,
    };
    match (axis(left.rows, right.rows), axis(left.cols, right.cols)) {
        (Some(rows), Some(cols)) => Ok(Shape::new(rows, cols)),
        _ => Err(OrthoError::shape_mismatch(op, left, right)),
    }
}
