/// Knobs of one training run. Constants are kept as `f64` and converted to
/// the element type when the run starts.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    /// Momentum coefficient.
    pub alpha: f64,
    /// Learning rate.
    pub eta: f64,
    /// Epoch budget for the per-example loop, iteration budget for the batch loop.
    pub iterations: usize,
    /// Training stops once the cost of an epoch drops below this.
    pub threshold: f64,
    /// Seeds parameter initialization and example shuffling.
    pub seed: u64,
    /// Weight of every orthogonality penalty in the total cost.
    pub penalty: f64,
}

impl TrainConfig {
    pub fn xor() -> Self {
        TrainConfig {
            alpha: 0.4,
            eta: 0.6,
            iterations: 5000,
            threshold: 0.001,
            seed: 1,
            penalty: 0.001,
        }
    }

    pub fn autoencoder() -> Self {
        TrainConfig {
            iterations: 100,
            penalty: 1.0,
            ..TrainConfig::xor()
        }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        TrainConfig { seed, ..self }
    }

    pub fn with_iterations(self, iterations: usize) -> Self {
        TrainConfig { iterations, ..self }
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::xor()
    }
}

#[test]
fn test_profiles() {
    let xor = TrainConfig::default();
    assert_eq!((xor.alpha, xor.eta, xor.iterations), (0.4, 0.6, 5000));
    let autoencoder = TrainConfig::autoencoder().with_seed(7);
    assert_eq!(autoencoder.iterations, 100);
    assert_eq!(autoencoder.seed, 7);
    assert_eq!(autoencoder.threshold, xor.threshold);
    assert!(autoencoder.penalty > xor.penalty);
}
