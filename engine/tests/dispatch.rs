use std::{cell::RefCell, rc::Rc};

use engine::{
    ActFn, Dispatch, Engine, ParameterStore, Sample, Topology,
    initialization::{ChainedParamGen, ParamGen, RandParamGen},
};
use rand::{SeedableRng, rngs::StdRng};

const PASSES: usize = 7;

fn topology() -> Topology {
    Topology::new(
        vec![3, 8, 2, 5],
        vec![ActFn::leaky_relu(), ActFn::normalized_tanh(), ActFn::sigmoid()],
    )
    .unwrap()
}

fn params(topology: &Topology) -> ParameterStore {
    let rng = Rc::new(RefCell::new(StdRng::seed_from_u64(7)));
    let param_gens = (1..topology.nlayers())
        .map(|layer| {
            let param_gen = RandParamGen::xavier_uniform(rng.clone(), topology.sizes(), layer);
            Box::new(param_gen.unwrap()) as Box<dyn ParamGen>
        })
        .collect();

    ParameterStore::generate(topology, ChainedParamGen::new(param_gens)).unwrap()
}

fn data() -> (Vec<[f32; 3]>, Vec<[f32; 5]>) {
    let inputs = (0..PASSES)
        .map(|p| {
            let p = p as f32;
            [p.sin(), (p * 0.5).cos(), p / PASSES as f32 - 0.5]
        })
        .collect();

    let expected = (0..PASSES)
        .map(|p| std::array::from_fn(|o| ((p + o) % 3) as f32 / 2.))
        .collect();

    (inputs, expected)
}

fn batch<'a>(inputs: &'a [[f32; 3]], expected: &'a [[f32; 5]]) -> Vec<Sample<'a>> {
    inputs
        .iter()
        .zip(expected)
        .map(|(x, y)| Sample::new(x, y))
        .collect()
}

#[test]
fn every_neuron_runs_once_per_pass() {
    let topology = topology();
    let params = params(&topology);
    let (inputs, expected) = data();
    let batch = batch(&inputs, &expected);

    for dispatch in [Dispatch::PerLayer, Dispatch::Fused] {
        let engine = Engine::new(topology.clone(), dispatch);
        let update = engine.compute(&params, &batch).unwrap();

        for ledger in [update.forward_ledger(), update.backward_ledger()] {
            assert_eq!(ledger.count(0), 0);

            for layer in 1..topology.nlayers() {
                assert_eq!(
                    ledger.count(layer),
                    topology.size(layer) * PASSES,
                    "{dispatch:?} layer {layer}"
                );
            }
        }
    }
}

#[test]
fn fused_matches_per_layer() {
    let topology = topology();
    let params = params(&topology);
    let (inputs, expected) = data();
    let batch = batch(&inputs, &expected);

    let per_layer = Engine::new(topology.clone(), Dispatch::PerLayer)
        .compute(&params, &batch)
        .unwrap();
    let fused = Engine::new(topology.clone(), Dispatch::Fused)
        .compute(&params, &batch)
        .unwrap();

    for pass in 0..PASSES {
        assert_eq!(per_layer.outputs(pass), fused.outputs(pass));
        assert_eq!(
            per_layer.gradients().pass_gradient(pass),
            fused.gradients().pass_gradient(pass)
        );
    }

    assert_eq!(per_layer.report(), fused.report());
}

#[test]
fn forward_is_deterministic() {
    let topology = topology();
    let params = params(&topology);
    let engine = Engine::new(topology, Dispatch::Fused);
    let (inputs, _) = data();
    let inputs: Vec<&[f32]> = inputs.iter().map(|x| x.as_slice()).collect();

    let first = engine.predict(&params, &inputs).unwrap();
    let second = engine.predict(&params, &inputs).unwrap();

    assert_eq!(first, second);
}

#[test]
fn single_pass_step_is_plain_gradient_descent() {
    const LR: f32 = 0.3;

    let topology = topology();
    let mut params = params(&topology);
    let engine = Engine::new(topology, Dispatch::PerLayer);
    let (inputs, expected) = data();
    let batch = batch(&inputs[..1], &expected[..1]);

    let update = engine.compute(&params, &batch).unwrap();
    let grad = update.gradients().pass_gradient(0);
    let expected: Vec<_> = params
        .as_slice()
        .iter()
        .zip(&grad)
        .map(|(p, g)| p - LR * g)
        .collect();

    engine.apply(&mut params, update, LR).unwrap();

    assert_eq!(params.as_slice(), expected.as_slice());
}

#[test]
fn zero_learning_rate_is_a_no_op() {
    let topology = topology();
    let mut params = params(&topology);
    let before: Vec<u32> = params.as_slice().iter().map(|p| p.to_bits()).collect();
    let (inputs, expected) = data();
    let batch = batch(&inputs, &expected);

    for dispatch in [Dispatch::PerLayer, Dispatch::Fused] {
        let engine = Engine::new(topology.clone(), dispatch);
        engine.train_step(&mut params, &batch, 0.).unwrap();
    }

    let after: Vec<u32> = params.as_slice().iter().map(|p| p.to_bits()).collect();
    assert_eq!(before, after);
}

#[test]
fn predict_spans_several_batches() {
    let topology = Topology::uniform(vec![1, 2, 1], ActFn::relu()).unwrap();
    let params = ParameterStore::new(&topology, vec![0., 1., 0., 1., 0., 1., 1.]).unwrap();
    let engine = Engine::new(topology, Dispatch::Fused);

    let values: Vec<[f32; 1]> = (0..engine::MAX_BATCH_SIZE + 3).map(|i| [i as f32]).collect();
    let inputs: Vec<&[f32]> = values.iter().map(|x| x.as_slice()).collect();

    let outputs = engine.predict(&params, &inputs).unwrap();

    assert_eq!(outputs.len(), values.len());
    assert!(outputs.iter().enumerate().all(|(i, a)| a[0] == 2. * i as f32));
}
