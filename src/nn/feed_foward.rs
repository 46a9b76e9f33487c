use crate::error::Result;
use crate::nn::{Linear, Module};
use crate::tensor::{Graph, NodeId, Numeric, TensorList};

/// A fixed-depth stack of [`Linear`] layers.
#[derive(Debug)]
pub struct Mlp<T, const N: usize>
where
    T: Numeric,
{
    layers: [Linear<T>; N],
}

impl<T: Numeric, const N: usize> Mlp<T, N> {
    pub fn new(layers: [Linear<T>; N]) -> Mlp<T, N> {
        Mlp { layers }
    }

    pub fn layers(&self) -> &[Linear<T>; N] {
        &self.layers
    }
}

impl<T: Numeric, const N: usize> crate::nn::module::private::Private for Mlp<T, N> {}

impl<T: Numeric, const N: usize> Module<T> for Mlp<T, N> {
    fn forward(&self, graph: &mut Graph<T>, input: NodeId) -> Result<NodeId> {
        self.layers
            .iter()
            .try_fold(input, |prev, layer| layer.forward(graph, prev))
    }

    fn params(&self) -> TensorList {
        self.layers
            .iter()
            .flat_map(|layer| layer.params())
            .collect()
    }
}

#[test]
fn test_mlp_params_in_layer_order() {
    use crate::tensor::Tensor;

    let mut graph: Graph<f64> = Graph::new();
    let mut linear = |rows, cols| {
        let w = graph.constant(Tensor::filled(rows, cols, 0.5));
        let b = graph.constant(Tensor::filled(rows, 1, 0.0));
        Linear::new(w, b, Some(Graph::<f64>::sigmoid))
    };
    let first = linear(2, 2);
    let second = linear(1, 2);
    let mlp = Mlp::new([first, second]);
    assert_eq!(
        mlp.params(),
        vec![first.weights, first.bias, second.weights, second.bias]
    );

    let input = graph.constant(Tensor::filled(2, 1, 0.0));
    let output = mlp.forward(&mut graph, input).unwrap();
    assert_eq!(graph.shape(output).unwrap().count(), 1);
    // hidden = [0.5, 0.5], output = sigmoid(0.5)
    let value = graph.evaluate(output).unwrap().values()[0];
    assert!((value - 1.0 / (1.0 + (-0.5f64).exp())).abs() < 1e-12);
}
