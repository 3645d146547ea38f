use engine::{ActFn, Dispatch, Engine, ParameterStore, Sample, Topology};

const STEPS: usize = 2000;
const LEARNING_RATE: f32 = 0.5;

// 4 hidden rows of [bias, w0, w1] followed by the output row [bias, w0..w3]
const INITIAL_PARAMS: [f32; 17] = [
    -1.0, 2.5, 2.5, //
    3.0, -2.0, -2.0, //
    -1.5, -2.0, 2.5, //
    -1.5, 2.5, -2.0, //
    -1.0, -2.0, -2.0, 2.5, 2.5,
];

#[test]
fn learns_xor() {
    let topology = Topology::uniform(vec![2, 4, 1], ActFn::sigmoid()).unwrap();
    let engine = Engine::new(topology.clone(), Dispatch::PerLayer);
    let mut params = ParameterStore::new(&topology, INITIAL_PARAMS.to_vec()).unwrap();

    let batch = [
        Sample::new(&[0., 0.], &[0.]),
        Sample::new(&[0., 1.], &[1.]),
        Sample::new(&[1., 0.], &[1.]),
        Sample::new(&[1., 1.], &[0.]),
    ];

    let first = engine.train_step(&mut params, &batch, LEARNING_RATE).unwrap();
    let mut last = first;

    for _ in 1..STEPS {
        last = engine.train_step(&mut params, &batch, LEARNING_RATE).unwrap();
        assert!(last.degeneracy.is_none());
    }

    let inputs: Vec<_> = batch.iter().map(|s| s.input).collect();
    let outputs = engine.predict(&params, &inputs).unwrap();
    let mse = outputs
        .iter()
        .zip(&batch)
        .map(|(a, s)| (a[0] - s.expected[0]).powi(2))
        .sum::<f32>()
        / batch.len() as f32;

    assert!(last.loss < first.loss);
    assert!(mse < 0.05, "mse after {STEPS} steps: {mse}");
}
