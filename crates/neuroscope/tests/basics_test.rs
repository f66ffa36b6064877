//! End-to-end generation tests through the public API.

use neuroscope::*;

/// Samples per dendrite path (20 segments) and the 70% sample children grow from.
const DENDRITE_SAMPLES: usize = 21;
const BRANCH_SAMPLE: usize = 14;

fn assert_default_counts(model: &NeuronModel) {
    assert_eq!(model.dendrites.len(), 42, "6 roots x 7 tubes each");
    assert_eq!(model.tube_count(), 43);
    assert_eq!(model.surfaces().count(), 44, "soma + dendrites + axon");
    assert_eq!(model.particles.len(), 50);
}

#[test]
fn default_neuron_counts_are_stable() {
    let options = Options::default();
    for seed in 0..8 {
        let model = generate_neuron_with(&options, &mut StdRandom::seeded(seed)).unwrap();
        assert_default_counts(&model);
    }
    // Entropy seeded runs follow the same shape.
    assert_default_counts(&generate_neuron(&options).unwrap());
}

#[test]
fn dendrite_trees_are_depth_first_and_attached() {
    let model = generate_neuron_with(&Options::default(), &mut StdRandom::seeded(7)).unwrap();

    for tree in model.dendrites.chunks(7) {
        let depths: Vec<u32> = tree.iter().map(|t| t.depth).collect();
        assert_eq!(depths, vec![2, 1, 0, 0, 1, 0, 0]);

        let root = &tree[0];
        assert_eq!(root.path.len(), DENDRITE_SAMPLES);
        assert!((root.start().length() - 3.2).abs() < 1e-4);

        for child in [&tree[1], &tree[4]] {
            assert!(child.start().distance(root.path[BRANCH_SAMPLE]) < 1e-5);
            assert!(child.thickness < root.thickness);
            assert!(child.length < root.length);
        }
        for (parent, grandchild) in [(1, 2), (1, 3), (4, 5), (4, 6)] {
            assert!(tree[grandchild]
                .start()
                .distance(tree[parent].path[BRANCH_SAMPLE])
                < 1e-5);
        }
    }
}

#[test]
fn axon_is_a_single_tapered_tube() {
    let model = generate_neuron_with(&Options::default(), &mut StdRandom::seeded(3)).unwrap();
    let axon = &model.axon;

    assert_eq!(axon.depth, 0);
    assert_eq!(axon.path.len(), 31);
    assert!((axon.length - 20.0).abs() < 1e-6);
    assert!(axon.start().distance(Vec3::new(1.0, -0.3, 0.2).normalize() * 3.2) < 1e-4);
    assert!(axon.radii.windows(2).all(|w| w[1] <= w[0]));
    assert!((axon.radii[0] - 0.2).abs() < 1e-6);
}

#[test]
fn soma_noise_is_bounded() {
    let model = generate_neuron_with(&Options::default(), &mut StdRandom::seeded(11)).unwrap();
    assert!(model.soma.max_radial_deviation() <= 0.05 + 1e-4);
}

#[test]
fn json_options_drive_generation() {
    let json = r#"{
        "neuron": {
            "dendrites": { "count": 3, "branch_depth": 1 },
            "particles": { "count": 5 }
        }
    }"#;
    let options = Options::from_json_str(json).unwrap();
    let model = generate_neuron_with(&options, &mut StdRandom::seeded(1)).unwrap();

    assert_eq!(model.dendrites.len(), 9, "3 roots x 3 tubes each");
    assert_eq!(model.particles.len(), 5);
}

#[test]
fn invalid_options_are_rejected() {
    let mut options = Options::default();
    options.neuron.soma.radius = -1.0;
    assert!(matches!(
        generate_neuron(&options),
        Err(NeuronError::InvalidParameter { .. })
    ));

    let mut options = Options::default();
    options.viewer.viewport.zoom_range = [50.0, 5.0];
    assert!(generate_neuron(&options).is_err());
}
