//! Penalties that pull a weight matrix towards orthogonality.
use crate::error::Result;
use crate::tensor::{Graph, NodeId, Numeric, Tensor};

/// Which product of `W` is compared against the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orthogonality {
    /// `W * W^t`, minimized by a matrix with orthonormal rows.
    Gram,
    /// `W * W` for a square `W`, minimized by an involution.
    Square,
}

/// The nodes one penalty adds to a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Penalty {
    pub weights: NodeId,
    pub product: NodeId,
    pub cost: NodeId,
    pub kind: Orthogonality,
}

impl Orthogonality {
    pub fn product<T: Numeric>(self, graph: &mut Graph<T>, weights: NodeId) -> Result<NodeId> {
        match self {
            Orthogonality::Gram => {
                let transposed = graph.transpose(weights)?;
                graph.mul(weights, transposed)
            }
            Orthogonality::Square => graph.mul(weights, weights),
        }
    }

    /// Builds `sum((I - product)^2)` on top of `weights`.
    pub fn penalty<T: Numeric>(self, graph: &mut Graph<T>, weights: NodeId) -> Result<Penalty> {
        let product = self.product(graph, weights)?;
        let size = graph.shape(product)?.rows;
        let identity = graph.constant(Tensor::identity(size, size));
        let residual = graph.quadratic(identity, product)?;
        let cost = graph.sum(residual)?;
        Ok(Penalty {
            weights,
            product,
            cost,
            kind: self,
        })
    }
}

/// Evaluates the penalty of `kind` for a concrete matrix.
pub fn orthogonality_residual<T: Numeric>(weights: &Tensor<T>, kind: Orthogonality) -> Result<T> {
    let mut graph = Graph::new();
    let w = graph.constant(weights.clone());
    let penalty = kind.penalty(&mut graph, w)?;
    Ok(graph.evaluate(penalty.cost)?.values()[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrthoError;

    #[test]
    fn test_rotation_is_orthogonal() {
        let (s, c) = 0.3f64.sin_cos();
        let rotation = Tensor::from_vec(2, 2, vec![c, -s, s, c]).unwrap();
        assert!(orthogonality_residual(&rotation, Orthogonality::Gram).unwrap() < 1e-12);
        // a rotation is not its own inverse
        assert!(orthogonality_residual(&rotation, Orthogonality::Square).unwrap() > 1e-2);
    }

    #[test]
    fn test_reflection_satisfies_both() {
        let reflection = Tensor::from_vec(2, 2, vec![0.0f64, 1.0, 1.0, 0.0]).unwrap();
        assert_eq!(orthogonality_residual(&reflection, Orthogonality::Gram).unwrap(), 0.0);
        assert_eq!(orthogonality_residual(&reflection, Orthogonality::Square).unwrap(), 0.0);
    }

    #[test]
    fn test_gram_residual_value() {
        // w w^t = [[5]] for w = [[1, 2]]
        let w = Tensor::from_vec(1, 2, vec![1.0f64, 2.0]).unwrap();
        assert_eq!(orthogonality_residual(&w, Orthogonality::Gram).unwrap(), 16.0);
    }

    #[test]
    fn test_square_needs_square_weights() {
        let w = Tensor::from_vec(1, 2, vec![1.0f64, 2.0]).unwrap();
        assert!(matches!(
            orthogonality_residual(&w, Orthogonality::Square),
            Err(OrthoError::ShapeMismatch { op: "mul", .. })
        ));
    }

    #[test]
    fn test_penalty_gradient() {
        // d/dw (1 - w^2)^2 = -4 w (1 - w^2) = 24 at w = 2
        let mut graph = Graph::new();
        let w = graph.constant(Tensor::filled(1, 1, 2.0f64));
        let penalty = Orthogonality::Square.penalty(&mut graph, w).unwrap();
        assert_eq!(graph.gradient(penalty.cost).unwrap(), 9.0);
        assert_eq!(graph.tensor(w).unwrap().grads(), &[24.0]);
    }
}
