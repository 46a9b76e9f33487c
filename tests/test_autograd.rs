use orthogonal::data;
use orthogonal::nn::Model;
use orthogonal::tensor::Numeric;
use rand::SeedableRng;

fn cost<T: Numeric>(model: &mut Model<T>) -> T {
    model.graph.evaluate(model.cost).unwrap().values()[0]
}

fn analytic_grads<T: Numeric>(model: &mut Model<T>) -> Vec<T> {
    model.graph.zero_grads(&model.params).unwrap();
    model.graph.gradient(model.cost).unwrap();
    model
        .params
        .iter()
        .flat_map(|&p| model.graph.tensor(p).unwrap().grads().to_vec())
        .collect()
}

/// Central differences of the cost with respect to every parameter element.
fn finite_diff_grads<T: Numeric>(model: &mut Model<T>, eps: T) -> Vec<T> {
    let mut grads = Vec::new();
    for p in model.params.clone() {
        let count = model.graph.tensor(p).unwrap().capacity();
        for i in 0..count {
            let point = model.graph.tensor(p).unwrap().values()[i];

            model.graph.tensor_mut(p).unwrap().values_mut()[i] = point + eps;
            let plus = cost(model);
            model.graph.tensor_mut(p).unwrap().values_mut()[i] = point - eps;
            let minus = cost(model);
            model.graph.tensor_mut(p).unwrap().values_mut()[i] = point;

            grads.push((plus - minus) / (eps + eps));
        }
    }
    grads
}

fn assert_grads_close<T: Numeric>(analytic: &[T], numeric: &[T], tol: T) {
    assert_eq!(analytic.len(), numeric.len());
    for (i, (&a, &n)) in analytic.iter().zip(numeric).enumerate() {
        assert!(
            (a - n).abs() <= tol * (T::one() + a.abs()),
            "element {i}: analytic {a}, numeric {n}"
        );
    }
}

#[test]
fn test_xor_gradient_matches_finite_differences() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(1);
    // a full-weight penalty so both halves of the cost carry real gradient
    let mut model: Model<f64> = Model::xor(&mut rng, 1.0).unwrap();
    for (input, target) in data::xor_examples() {
        model.load(&input, &target).unwrap();
        let analytic = analytic_grads(&mut model);
        let numeric = finite_diff_grads(&mut model, 1e-6);
        assert_grads_close(&analytic, &numeric, 1e-6);
    }
}

#[test]
fn test_autoencoder_gradient_matches_finite_differences() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(2);
    let mut model: Model<f64> = Model::autoencoder(&mut rng, 4, 1.0).unwrap();
    let (input, target) = data::autoencoder_batch().unwrap();
    model.load(input.values(), target.values()).unwrap();
    let analytic = analytic_grads(&mut model);
    assert_eq!(analytic.len(), 9 + 3 + 36 + 6);
    let numeric = finite_diff_grads(&mut model, 1e-6);
    assert_grads_close(&analytic, &numeric, 1e-6);
}

#[test]
fn test_f32_gradient_matches_finite_differences() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(3);
    let mut model: Model<f32> = Model::xor(&mut rng, 1.0).unwrap();
    model.load(&[1.0, 0.0], &[1.0]).unwrap();
    let analytic = analytic_grads(&mut model);
    let numeric = finite_diff_grads(&mut model, 1e-2);
    assert_grads_close(&analytic, &numeric, 1e-2);
}

#[test]
fn test_gradient_is_repeatable() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(4);
    let mut model: Model<f64> = Model::xor(&mut rng, 1.0).unwrap();
    model.load(&[0.0, 1.0], &[1.0]).unwrap();
    let first = analytic_grads(&mut model);
    let first_cost = cost(&mut model);
    let second = analytic_grads(&mut model);
    assert_eq!(first, second);
    assert_eq!(first_cost, cost(&mut model));
}
