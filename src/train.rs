//! The two training loops and the checks run once they finish.
//!
//! Both loops share one step: clear the parameter gradients, run the engine
//! on the cost, then let the optimizer apply the update. They stop early
//! once a full pass over the data costs less than the configured threshold.
use log::{debug, info, trace};
use num::ToPrimitive;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::TrainConfig;
use crate::data::Example;
use crate::error::{OrthoError, Result};
use crate::nn::Model;
use crate::optim::Momentum;
use crate::tensor::{Numeric, Tensor};

/// Distance from the target beyond which an output counts as wrong.
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport<T> {
    /// `(epoch, cost)` for every epoch run.
    pub points: Vec<(usize, T)>,
    pub epochs: usize,
    /// Whether the threshold was reached before the budget ran out.
    pub converged: bool,
    pub final_cost: T,
}

impl<T: Numeric> TrainReport<T> {
    fn new(capacity: usize) -> Self {
        TrainReport {
            points: Vec::with_capacity(capacity),
            epochs: 0,
            converged: false,
            final_cost: T::zero(),
        }
    }

    fn record(&mut self, epoch: usize, cost: T) {
        debug!("epoch {epoch}: cost {cost}");
        self.points.push((epoch, cost));
        self.epochs = epoch + 1;
        self.final_cost = cost;
    }

    /// The cost curve in the form a [`crate::plot::PointSink`] consumes.
    pub fn plot_points(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|&(epoch, cost)| (epoch as f64, to_f64(cost)))
            .collect()
    }
}

fn to_f64<T: Numeric>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

fn step<T: Numeric>(model: &mut Model<T>, optimizer: &mut Momentum<T>) -> Result<T> {
    model.graph.zero_grads(&model.params)?;
    let cost = model.graph.gradient(model.cost)?;
    let norm = optimizer.step(&mut model.graph, &model.params)?;
    trace!("cost {cost}, gradient norm {norm}");
    Ok(cost)
}

/// Trains on one example at a time, reshuffling the visiting order before
/// every epoch. The cost of an epoch is the sum of its per-example costs.
pub fn per_example<T, R>(
    model: &mut Model<T>,
    examples: &[Example<T>],
    config: &TrainConfig,
    rng: &mut R,
) -> Result<TrainReport<T>>
where
    T: Numeric,
    R: Rng + ?Sized,
{
    info!(
        "training on {} examples for up to {} epochs (alpha {}, eta {})",
        examples.len(),
        config.iterations,
        config.alpha,
        config.eta
    );
    let mut optimizer = Momentum::new(T::lit(config.alpha), T::lit(config.eta));
    let threshold = T::lit(config.threshold);
    let mut order: Vec<usize> = (0..examples.len()).collect();
    let mut report = TrainReport::new(config.iterations);

    for epoch in 0..config.iterations {
        order.shuffle(rng);
        let mut total = T::zero();
        for &i in order.iter() {
            let (input, target) = &examples[i];
            model.load(input, target)?;
            total += step(model, &mut optimizer)?;
        }
        report.record(epoch, total);
        if total < threshold {
            report.converged = true;
            break;
        }
    }
    finish(&report);
    Ok(report)
}

/// Trains on the whole dataset at once; `input` and `target` hold one
/// example per column.
pub fn batch<T: Numeric>(
    model: &mut Model<T>,
    input: &Tensor<T>,
    target: &Tensor<T>,
    config: &TrainConfig,
) -> Result<TrainReport<T>> {
    info!(
        "training on a {} batch for up to {} iterations (alpha {}, eta {})",
        input.shape(),
        config.iterations,
        config.alpha,
        config.eta
    );
    let mut optimizer = Momentum::new(T::lit(config.alpha), T::lit(config.eta));
    let threshold = T::lit(config.threshold);
    model.load(input.values(), target.values())?;
    let mut report = TrainReport::new(config.iterations);

    for epoch in 0..config.iterations {
        let cost = step(model, &mut optimizer)?;
        report.record(epoch, cost);
        if cost < threshold {
            report.converged = true;
            break;
        }
    }
    finish(&report);
    Ok(report)
}

fn finish<T: Numeric>(report: &TrainReport<T>) {
    if report.converged {
        info!(
            "converged after {} epochs with cost {}",
            report.epochs, report.final_cost
        );
    } else {
        info!(
            "stopped after {} epochs with cost {}",
            report.epochs, report.final_cost
        );
    }
}

/// Replays every example through the prediction and fails on the first one
/// that lands on the wrong side of the decision threshold.
pub fn check_classifier<T: Numeric>(model: &mut Model<T>, examples: &[Example<T>]) -> Result<()> {
    let threshold = T::lit(DECISION_THRESHOLD);
    for (input, target) in examples {
        model.load(input, target)?;
        let predicted = model.predict()?[0];
        let expected = target[0];
        if (predicted >= threshold) != (expected >= threshold) {
            return Err(OrthoError::NotConverged {
                input: input.iter().map(|&v| to_f64(v)).collect(),
                predicted: to_f64(predicted),
                expected: to_f64(expected),
            });
        }
    }
    Ok(())
}

/// Counts output elements at least [`DECISION_THRESHOLD`] away from the
/// target currently loaded into the model.
pub fn reconstruction_mismatches<T: Numeric>(model: &mut Model<T>) -> Result<usize> {
    let predicted = model.predict()?;
    let target = model.graph.tensor(model.target)?;
    let threshold = T::lit(DECISION_THRESHOLD);
    Ok(predicted
        .iter()
        .zip(target.values())
        .filter(|(&p, &t)| (p - t).abs() >= threshold)
        .count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;
    use rand::SeedableRng;

    #[test]
    fn test_report_stops_at_budget() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let mut model: Model<f64> = Model::xor(&mut rng, 0.001).unwrap();
        let config = TrainConfig::xor().with_iterations(7);
        let report = per_example(&mut model, &data::xor_examples(), &config, &mut rng).unwrap();
        assert!(!report.converged);
        assert_eq!(report.epochs, 7);
        assert_eq!(report.points.len(), 7);
        assert_eq!(report.points[6], (6, report.final_cost));
        assert_eq!(report.plot_points()[0].0, 0.0);
    }

    #[test]
    fn test_batch_threshold_stops_early() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let mut model: Model<f64> = Model::autoencoder(&mut rng, 4, 1.0).unwrap();
        let (input, target) = data::autoencoder_batch().unwrap();
        // any cost clears an infinite threshold on the first iteration
        let config = TrainConfig {
            threshold: f64::INFINITY,
            ..TrainConfig::autoencoder()
        };
        let report = batch(&mut model, &input, &target, &config).unwrap();
        assert!(report.converged);
        assert_eq!(report.epochs, 1);
    }

    #[test]
    fn test_check_classifier_reports_offender() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let mut model: Model<f64> = Model::xor(&mut rng, 0.001).unwrap();
        // a constant label can never match all of xor
        let examples = vec![
            (vec![0.0, 0.0], vec![0.0]),
            (vec![0.0, 0.0], vec![1.0]),
        ];
        match check_classifier(&mut model, &examples) {
            Err(OrthoError::NotConverged {
                input, expected, ..
            }) => {
                assert_eq!(input, vec![0.0, 0.0]);
                assert!(expected == 0.0 || expected == 1.0);
            }
            other => panic!("expected a convergence failure, got {other:?}"),
        }
    }

    #[test]
    fn test_reconstruction_mismatches_counts_far_outputs() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let mut model: Model<f64> = Model::autoencoder(&mut rng, 4, 1.0).unwrap();
        let (input, _) = data::autoencoder_batch::<f64>().unwrap();
        // sigmoid outputs are strictly inside (0, 1), so a target of 2 is
        // always more than 0.5 away and a target of the output itself never is
        model.load(input.values(), &[2.0; 24]).unwrap();
        assert_eq!(reconstruction_mismatches(&mut model).unwrap(), 24);
        let predicted = model.predict().unwrap();
        model.load(input.values(), &predicted).unwrap();
        assert_eq!(reconstruction_mismatches(&mut model).unwrap(), 0);
    }
}
