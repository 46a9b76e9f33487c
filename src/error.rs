use thiserror::Error;

use crate::tensor::{NodeId, Shape};

#[derive(Error, Debug)]
pub enum OrthoError {
    #[error("shape mismatch in {op}: left operand is {left}, right operand is {right}")]
    ShapeMismatch {
        op: &'static str,
        left: Shape,
        right: Shape,
    },

    #[error("a {shape} tensor holds {expected} values but {actual} were given")]
    LengthMismatch {
        shape: Shape,
        expected: usize,
        actual: usize,
    },

    #[error("a {shape} tensor is already fully populated")]
    CapacityExceeded { shape: Shape },

    #[error("leaf {node} was evaluated before its values were populated")]
    Unpopulated { node: NodeId },

    #[error("node {node} does not belong to this graph")]
    UnknownNode { node: NodeId },

    #[error("node {node} is computed by the graph and cannot be written directly")]
    NotALeaf { node: NodeId },

    #[error("cost node {node} must be 1x1 but is {shape}")]
    NonScalarCost { node: NodeId, shape: Shape },

    #[error("optimizer tracks {expected} parameters but was stepped with {actual}")]
    ParameterMismatch { expected: usize, actual: usize },

    #[error("output should be {expected} but was {predicted} for input {input:?}")]
    NotConverged {
        input: Vec<f64>,
        predicted: f64,
        expected: f64,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl OrthoError {
    pub fn shape_mismatch(op: &'static str, left: Shape, right: Shape) -> Self {
        OrthoError::ShapeMismatch { op, left, right }
    }
}

pub type Result<T> = std::result::Result<T, OrthoError>;
