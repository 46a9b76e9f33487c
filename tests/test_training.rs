use orthogonal::config::TrainConfig;
use orthogonal::data;
use orthogonal::nn::{orthogonality_residual, Model, Orthogonality};
use orthogonal::optim::Momentum;
use orthogonal::tensor::{Graph, Tensor};
use orthogonal::train;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn param_values(model: &Model) -> Vec<Vec<f32>> {
    model
        .params
        .iter()
        .map(|&p| model.graph.tensor(p).unwrap().values().to_vec())
        .collect()
}

#[test]
fn test_xor_converges_with_seed_one() {
    init_logger();
    let config = TrainConfig::xor();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let examples = data::xor_examples();
    let mut model: Model = Model::xor(&mut rng, config.penalty).unwrap();

    let report = train::per_example(&mut model, &examples, &config, &mut rng).unwrap();
    assert!(report.converged, "final cost {}", report.final_cost);
    assert!(report.epochs < config.iterations);
    assert!(report.final_cost < 0.001);
    train::check_classifier(&mut model, &examples).unwrap();

    // the penalty drives W1 towards its own inverse
    let w1 = model.graph.tensor(model.params[0]).unwrap();
    assert!(orthogonality_residual(w1, Orthogonality::Square).unwrap() < 1e-3);
}

#[test]
fn test_autoencoder_runs_its_budget() {
    init_logger();
    let config = TrainConfig::autoencoder();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let (input, target) = data::autoencoder_batch().unwrap();
    let mut model: Model = Model::autoencoder(&mut rng, input.cols(), config.penalty).unwrap();

    let report = train::batch(&mut model, &input, &target, &config).unwrap();
    assert!(report.epochs <= config.iterations);
    assert!(report.converged || report.epochs == config.iterations);
    assert_eq!(report.points.len(), report.epochs);
    assert!(report.final_cost.is_finite());
    // the first iteration starts from the random initialization
    assert!(report.final_cost < report.points[0].1);

    let mismatches = train::reconstruction_mismatches(&mut model).unwrap();
    assert!(mismatches <= target.capacity());
}

#[test]
fn test_gram_penalty_reaches_orthogonal_matrix() {
    let start = vec![0.9, 0.2, 0.1, -0.1, 0.8, 0.3, 0.2, -0.3, 1.1];
    let mut graph: Graph<f64> = Graph::new();
    let w = graph.constant(Tensor::from_vec(3, 3, start).unwrap());
    let penalty = Orthogonality::Gram.penalty(&mut graph, w).unwrap();
    let mut optimizer = Momentum::new(0.4, 0.05);
    let before = orthogonality_residual(graph.tensor(w).unwrap(), Orthogonality::Gram).unwrap();

    for _ in 0..500 {
        graph.zero_grads(&[w]).unwrap();
        graph.gradient(penalty.cost).unwrap();
        optimizer.step(&mut graph, &[w]).unwrap();
    }

    let after = orthogonality_residual(graph.tensor(w).unwrap(), Orthogonality::Gram).unwrap();
    assert!(before > 0.1);
    assert!(after < 1e-8, "residual {after}");
    let gram = graph.evaluate(penalty.product).unwrap();
    for row in 0..3 {
        for col in 0..3 {
            let expected = if row == col { 1.0 } else { 0.0 };
            assert!((gram[(row, col)] - expected).abs() < 1e-4);
        }
    }
}

#[test]
fn test_training_is_deterministic() {
    let config = TrainConfig::xor().with_seed(7).with_iterations(50);
    let run = || {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut model: Model = Model::xor(&mut rng, config.penalty).unwrap();
        let report =
            train::per_example(&mut model, &data::xor_examples(), &config, &mut rng).unwrap();
        (param_values(&model), report.points)
    };
    let (first_params, first_points) = run();
    let (second_params, second_points) = run();
    assert_eq!(first_params, second_params);
    assert_eq!(first_points, second_points);
}

#[test]
fn test_first_update_is_clipped_to_eta() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut model: Model<f64> = Model::xor(&mut rng, 1.0).unwrap();
    model.load(&[1.0, 1.0], &[0.0]).unwrap();
    let before: Vec<f64> = model
        .params
        .iter()
        .flat_map(|&p| model.graph.tensor(p).unwrap().values().to_vec())
        .collect();

    model.graph.zero_grads(&model.params).unwrap();
    model.graph.gradient(model.cost).unwrap();
    let mut optimizer = Momentum::new(0.4, 0.6);
    let norm = optimizer.step(&mut model.graph, &model.params).unwrap();

    let after: Vec<f64> = model
        .params
        .iter()
        .flat_map(|&p| model.graph.tensor(p).unwrap().values().to_vec())
        .collect();
    let moved = before
        .iter()
        .zip(&after)
        .map(|(b, a)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt();
    // with no previous delta the step is -eta * g, clipped to unit norm
    assert!((moved - 0.6 * norm.min(1.0)).abs() < 1e-9, "moved {moved}, norm {norm}");
}
