use approx::assert_relative_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use mesh_nn::{ActivationFunction, LayerSpec, Network, TopologySpec, UnitRef};

/// Builds an unwired network with the given shape, everything Identity.
fn identity_network(inputs: usize, hidden: &[usize], outputs: usize) -> Network {
    let mut network = Network::new(hidden.len());
    for _ in 0..inputs {
        network.create_input_unit();
    }
    for (layer_index, &units) in hidden.iter().enumerate() {
        for _ in 0..units {
            network.create_hidden_unit(layer_index, ActivationFunction::Identity);
        }
    }
    for _ in 0..outputs {
        network.create_output_unit(ActivationFunction::Identity);
    }
    network
}

#[test]
fn connection_count_matches_wired_connections_across_topologies() {
    let shapes: &[(usize, &[usize], usize)] = &[
        (2, &[], 1),
        (5, &[], 3),
        (3, &[2], 2),
        (4, &[3, 2], 2),
        (1, &[1, 1, 1], 1),
    ];
    for &(inputs, hidden, outputs) in shapes {
        for with_bias in [false, true] {
            let mut network = identity_network(inputs, hidden, outputs);
            let expected = network.dense_connection_count(with_bias);
            network.build_dense_mesh(None, with_bias, 1.0).unwrap();
            assert_eq!(
                network.connection_count(),
                expected,
                "shape {inputs}-{hidden:?}-{outputs}, bias {with_bias}"
            );
        }
    }
}

#[test]
fn weight_vectors_round_trip_for_every_topology_shape() {
    let shapes: &[(usize, &[usize], usize)] = &[
        (2, &[], 1),
        (3, &[2], 2),
        (4, &[3, 2], 2),
    ];
    for &(inputs, hidden, outputs) in shapes {
        for with_bias in [false, true] {
            let mut network = identity_network(inputs, hidden, outputs);
            let count = network.dense_connection_count(with_bias);
            let stored: Vec<f64> = (0..count).map(|i| i as f64 * 0.1).collect();

            network.build_dense_mesh(Some(&stored), with_bias, 1.0).unwrap();
            assert_eq!(
                network.get_weights(),
                stored,
                "build/get mismatch for {inputs}-{hidden:?}-{outputs}, bias {with_bias}"
            );

            let replacement: Vec<f64> = (0..count).map(|i| 10.0 - i as f64).collect();
            network.set_weights(&replacement, with_bias).unwrap();
            assert_eq!(
                network.get_weights(),
                replacement,
                "set/get mismatch for {inputs}-{hidden:?}-{outputs}, bias {with_bias}"
            );
        }
    }
}

#[test]
fn forward_pass_computes_weighted_sum_through_relu() {
    let mut network = Network::new(0);
    network.create_input_unit();
    network.create_input_unit();
    network.create_output_unit(ActivationFunction::ReLU);
    network.build_dense_mesh(Some(&[1.0, 1.0]), false, 1.0).unwrap();

    network.evaluate(&[2.0, 3.0]).unwrap();
    assert_relative_eq!(network.output(0), 5.0);
    assert_eq!(network.output_activations(), vec![5.0]);
}

#[test]
fn delta_learning_follows_the_closed_form_momentum_update() {
    let mut network = Network::new(0);
    network.create_input_unit();
    network.create_input_unit();
    network.create_output_unit(ActivationFunction::ReLU);
    network.build_dense_mesh(Some(&[1.0, 1.0]), false, 1.0).unwrap();

    network.evaluate(&[2.0, 3.0]).unwrap();
    network.learn(&[2.0], 0.1).unwrap();

    // delta = 2 - 5 = -3, factor = 0.1 * -3 * 1 = -0.3
    // w0: move -0.6, momentum (0 - 0.6)*0.9 = -0.54, w = 1 - 0.6 - 0.54
    // w1: move -0.9, momentum -0.81,            w = 1 - 0.9 - 0.81
    let weights = network.get_weights();
    assert_relative_eq!(weights[0], -0.14, epsilon = 1e-12);
    assert_relative_eq!(weights[1], -0.71, epsilon = 1e-12);

    // A second pass without re-evaluating reuses activation 5, so the
    // same raw move compounds with the damped momentum.
    network.learn(&[2.0], 0.1).unwrap();
    let weights = network.get_weights();
    // w0: momentum (-0.54 - 0.6)*0.9 = -1.026, w = -0.14 - 0.6 - 1.026
    // w1: momentum (-0.81 - 0.9)*0.9 = -1.539, w = -0.71 - 0.9 - 1.539
    assert_relative_eq!(weights[0], -1.766, epsilon = 1e-12);
    assert_relative_eq!(weights[1], -3.149, epsilon = 1e-12);
}

#[test]
fn backpropagation_accumulates_weighted_downstream_deltas() {
    let mut network = Network::new(1);
    network.create_input_unit();
    let h0 = network.create_hidden_unit(0, ActivationFunction::Identity);
    let h1 = network.create_hidden_unit(0, ActivationFunction::Identity);
    let out = network.create_output_unit(ActivationFunction::Identity);

    // Creation order: (in, h0) (in, h1) then (h0, out) (h1, out).
    network
        .build_dense_mesh(Some(&[0.5, 0.25, 2.0, 3.0]), false, 1.0)
        .unwrap();

    network.evaluate(&[1.0]).unwrap();
    assert_relative_eq!(network.activation_of(h0), 0.5);
    assert_relative_eq!(network.activation_of(h1), 0.25);
    assert_relative_eq!(network.activation_of(out), 1.75);

    // beta 0 leaves weights alone so only the error pass is observed.
    network.learn(&[2.75], 0.0).unwrap();
    assert_relative_eq!(network.delta_of(out), 1.0);
    assert_relative_eq!(network.delta_of(h0), 2.0);
    assert_relative_eq!(network.delta_of(h1), 3.0);
    assert_eq!(network.get_weights(), vec![0.5, 0.25, 2.0, 3.0]);
}

#[test]
fn error_flows_through_multiple_hidden_layers() {
    let mut network = Network::new(2);
    network.create_input_unit();
    let h0 = network.create_hidden_unit(0, ActivationFunction::Identity);
    let h1 = network.create_hidden_unit(1, ActivationFunction::Identity);
    let out = network.create_output_unit(ActivationFunction::Identity);
    network
        .build_dense_mesh(Some(&[1.0, 0.5, 2.0]), false, 1.0)
        .unwrap();

    network.evaluate(&[1.0]).unwrap();
    assert_relative_eq!(network.activation_of(out), 1.0);

    network.learn(&[3.0], 0.0).unwrap();
    assert_relative_eq!(network.delta_of(out), 2.0);
    assert_relative_eq!(network.delta_of(h1), 4.0); // 2.0 * weight 2.0
    assert_relative_eq!(network.delta_of(h0), 2.0); // 4.0 * weight 0.5
}

#[test]
fn reset_all_zeroes_every_error_term() {
    let mut network = identity_network(1, &[2], 1);
    network.build_dense_mesh(Some(&[0.5, 0.25, 2.0, 3.0]), false, 1.0).unwrap();
    network.evaluate(&[1.0]).unwrap();
    network.learn(&[2.75], 0.0).unwrap();

    network.reset_all();
    for layer_index in 0..network.hidden_layer_count() {
        for &unit in network.hidden_layer(layer_index).unit_indices() {
            assert_eq!(network.delta_of(UnitRef::Compute(unit)), 0.0);
        }
    }
}

#[test]
fn seeded_wiring_is_deterministic_and_within_range() {
    let factor = 0.5;
    let mut first = identity_network(3, &[4], 2);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    first.build_dense_mesh_with(None, true, factor, &mut rng).unwrap();

    let mut second = identity_network(3, &[4], 2);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    second.build_dense_mesh_with(None, true, factor, &mut rng).unwrap();

    assert_eq!(first.get_weights(), second.get_weights());
    for weight in first.get_weights() {
        assert!((0.0..factor).contains(&weight), "weight {weight} out of range");
    }
}

#[test]
fn momentum_delta_rule_converges_on_a_linear_target() {
    // y = 2x with a single identity unit: the weight must settle at 2.
    let mut network = Network::new(0);
    network.create_input_unit();
    network.create_output_unit(ActivationFunction::Identity);
    network.build_dense_mesh(Some(&[0.0]), false, 1.0).unwrap();

    for _ in 0..500 {
        network.evaluate(&[1.0]).unwrap();
        network.learn(&[2.0], 0.05).unwrap();
    }
    network.evaluate(&[1.0]).unwrap();
    assert_relative_eq!(network.output(0), 2.0, epsilon = 1e-3);
}

#[test]
fn empty_hidden_layer_degrades_to_bias_only_wiring() {
    // One declared hidden layer left empty: only the output bias remains.
    let mut network = Network::new(1);
    network.create_input_unit();
    network.create_input_unit();
    network.create_output_unit(ActivationFunction::ReLU);

    assert_eq!(network.dense_connection_count(true), 1);
    network.build_dense_mesh(Some(&[0.7]), true, 1.0).unwrap();
    assert_eq!(network.connection_count(), 1);

    network.evaluate(&[5.0, -3.0]).unwrap();
    assert_relative_eq!(network.output(0), 0.7);
}

#[test]
fn topology_spec_builds_saves_and_loads() {
    let spec = TopologySpec {
        name: "digit-classifier".to_string(),
        inputs: 4,
        hidden: vec![LayerSpec {
            units: 3,
            activation: ActivationFunction::Sigmoid,
        }],
        output: LayerSpec {
            units: 2,
            activation: ActivationFunction::Sigmoid,
        },
    };

    let mut network = spec.build();
    assert_eq!(network.input_count(), 4);
    assert_eq!(network.output_count(), 2);
    network.build_dense_mesh(None, true, 1.0).unwrap();
    assert_eq!(network.connection_count(), spec.build().dense_connection_count(true));

    let path = std::env::temp_dir().join("mesh_nn_topology_spec_test.json");
    let path = path.to_str().unwrap();
    spec.save_json(path).unwrap();
    let restored = TopologySpec::load_json(path).unwrap();
    std::fs::remove_file(path).ok();

    assert_eq!(restored.name, spec.name);
    assert_eq!(restored.inputs, spec.inputs);
    assert_eq!(restored.hidden.len(), spec.hidden.len());
    assert_eq!(restored.output.units, spec.output.units);
}
