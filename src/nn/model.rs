//! A graph bundled with the handles training needs, and the two reference
//! networks built on it.
use log::debug;
use rand::Rng;

use crate::error::Result;
use crate::nn::{Linear, Mlp, Module, Orthogonality, Penalty};
use crate::tensor::{Graph, NodeId, Numeric, ParameterSet, Tensor};

#[derive(Debug, Clone)]
pub struct Model<T = f32>
where
    T: Numeric,
{
    pub graph: Graph<T>,
    pub input: NodeId,
    pub target: NodeId,
    pub prediction: NodeId,
    pub cost: NodeId,
    pub params: ParameterSet,
    pub penalties: Vec<Penalty>,
}

impl<T: Numeric> Model<T> {
    /// Two sigmoid layers, `2 -> 2 -> 1`, trained one example at a time.
    ///
    /// `cost = sum((prediction - target)^2) + penalty * sum((I - W1 * W1)^2)`
    pub fn xor<R: Rng + ?Sized>(rng: &mut R, penalty: f64) -> Result<Model<T>> {
        let mut graph = Graph::new();
        let input = graph.leaf(2, 1);
        let target = graph.leaf(1, 1);
        let mlp = Mlp::new([
            Linear::random(&mut graph, rng, 2, 2, Some(Graph::sigmoid)),
            Linear::random(&mut graph, rng, 2, 1, Some(Graph::sigmoid)),
        ]);
        let prediction = mlp.forward(&mut graph, input)?;

        let error = graph.quadratic(prediction, target)?;
        let loss = graph.sum(error)?;
        let weight = graph.constant(Tensor::filled(1, 1, T::lit(penalty)));
        let penalty = Orthogonality::Square.penalty(&mut graph, mlp.layers()[0].weights)?;
        let scaled = graph.mul(weight, penalty.cost)?;
        let cost = graph.add(loss, scaled)?;

        debug!("xor network built with {} nodes", graph.len());
        Ok(Model {
            graph,
            input,
            target,
            prediction,
            cost,
            params: mlp.params(),
            penalties: vec![penalty],
        })
    }

    /// An everett layer followed by a sigmoid layer, `3 -> 6 -> 6`, trained on
    /// every example at once with the examples stacked as columns.
    ///
    /// `cost = avg((prediction - target)^2) + penalty * (gram(W1) + gram(W2))`
    pub fn autoencoder<R: Rng + ?Sized>(
        rng: &mut R,
        batch: usize,
        penalty: f64,
    ) -> Result<Model<T>> {
        let mut graph = Graph::new();
        let input = graph.leaf(3, batch);
        let target = graph.leaf(6, batch);
        let mlp = Mlp::new([
            Linear::random(&mut graph, rng, 3, 3, Some(Graph::everett)),
            Linear::random(&mut graph, rng, 6, 6, Some(Graph::sigmoid)),
        ]);
        let prediction = mlp.forward(&mut graph, input)?;

        let error = graph.quadratic(prediction, target)?;
        let mut cost = graph.avg(error)?;
        let weight = graph.constant(Tensor::filled(1, 1, T::lit(penalty)));
        let mut penalties = Vec::with_capacity(2);
        for layer in mlp.layers() {
            let penalty = Orthogonality::Gram.penalty(&mut graph, layer.weights)?;
            let scaled = graph.mul(weight, penalty.cost)?;
            cost = graph.add(cost, scaled)?;
            penalties.push(penalty);
        }

        debug!("autoencoder network built with {} nodes", graph.len());
        Ok(Model {
            graph,
            input,
            target,
            prediction,
            cost,
            params: mlp.params(),
            penalties,
        })
    }

    /// Writes one example into the input and target leaves.
    pub fn load(&mut self, input: &[T], target: &[T]) -> Result<()> {
        self.graph.tensor_mut(self.input)?.set(input)?;
        self.graph.tensor_mut(self.target)?.set(target)?;
        Ok(())
    }

    /// Forward pass over the prediction subgraph only.
    pub fn predict(&mut self) -> Result<Vec<T>> {
        Ok(self.graph.evaluate(self.prediction)?.values().to_vec())
    }
}
