use std::fmt;

use crate::tensor::NodeId;

// These are aliases that keep signatures readable; a parameter set is just
// the ordered list of leaf handles the optimizer walks.
pub type TensorList = Vec<NodeId>;

pub type ParameterSet = TensorList;

/// Row-major matrix extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub const SCALAR: Shape = Shape { rows: 1, cols: 1 };

    pub fn new(rows: usize, cols: usize) -> Shape {
        Shape { rows, cols }
    }

    pub fn count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn transposed(&self) -> Shape {
        Shape::new(self.cols, self.rows)
    }

    pub fn is_scalar(&self) -> bool {
        *self == Shape::SCALAR
    }

    /// Flat index of `(row, col)` once this operand is broadcast to a larger
    /// shape: an axis of extent 1 always reads its single entry.
    #[inline]
    pub(crate) fn broadcast_index(&self, row: usize, col: usize) -> usize {
        let row = if self.rows == 1 { 0 } else { row };
        let col = if self.cols == 1 { 0 } else { col };
        row * self.cols + col
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

#[test]
fn test_broadcast_index() {
    let bias = Shape::new(3, 1);
    assert_eq!(bias.broadcast_index(2, 0), 2);
    assert_eq!(bias.broadcast_index(2, 3), 2);
    let full = Shape::new(3, 4);
    assert_eq!(full.broadcast_index(2, 3), 11);
    assert_eq!(Shape::SCALAR.broadcast_index(2, 3), 0);
}
