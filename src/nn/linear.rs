use std::fmt;

use rand::Rng;
use rand_distr::Uniform;

use crate::error::Result;
use crate::nn::Module;
use crate::tensor::{Graph, NodeId, Numeric, Tensor, TensorList};

/// An operator constructor applied to the affine output, e.g. `Graph::sigmoid`.
pub type Activation<T> = fn(&mut Graph<T>, NodeId) -> Result<NodeId>;

/// `activation(weights * x + bias)`, with `x` a column (or a batch of columns).
#[derive(Clone, Copy)]
pub struct Linear<T>
where
    T: Numeric,
{
    pub weights: NodeId,
    pub bias: NodeId,
    activation: Option<Activation<T>>,
}

impl<T> Linear<T>
where
    T: Numeric,
{
    pub fn new(weights: NodeId, bias: NodeId, activation: Option<Activation<T>>) -> Self {
        Linear {
            weights,
            bias,
            activation,
        }
    }

    /// Allocates an `outputs x inputs` weight leaf and an `outputs x 1` bias
    /// leaf, both drawn from `U[-1, 1)`, weights first.
    pub fn random<R>(
        graph: &mut Graph<T>,
        rng: &mut R,
        inputs: usize,
        outputs: usize,
        activation: Option<Activation<T>>,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        let uniform = Uniform::new(T::lit(-1.0), T::lit(1.0));
        let weights = graph.constant(Tensor::random(outputs, inputs, rng, &uniform));
        let bias = graph.constant(Tensor::random(outputs, 1, rng, &uniform));
        Linear::new(weights, bias, activation)
    }
}

impl<T: Numeric> fmt::Debug for Linear<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Linear")
            .field("weights", &self.weights)
            .field("bias", &self.bias)
            .field("activated", &self.activation.is_some())
            .finish()
    }
}

impl<T: Numeric> crate::nn::module::private::Private for Linear<T> {}

impl<T: Numeric> Module<T> for Linear<T> {
    fn forward(&self, graph: &mut Graph<T>, input: NodeId) -> Result<NodeId> {
        let product = graph.mul(self.weights, input)?;
        let affine = graph.add(product, self.bias)?;
        match self.activation {
            Some(f) => f(graph, affine),
            None => Ok(affine),
        }
    }

    fn params(&self) -> TensorList {
        vec![self.weights, self.bias]
    }
}
