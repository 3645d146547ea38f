use std::num::NonZeroUsize;

use orchestrator::{
    OrchestratorError,
    configs::{
        ActFnConfig, DatasetConfig, DegeneracyConfig, DispatchConfig, ParamGenConfig, RunConfig,
    },
    train,
};

const CONFIG: &str = r#"{
    "model": {
        "input_size": 2,
        "layers": [
            { "size": 3, "act_fn": "relu", "init": { "kind": "kaiming" } },
            { "size": 1, "act_fn": "sigmoid" }
        ]
    },
    "training": {
        "dataset": { "kind": "inline", "data": [0, 0, 0, 1, 1, 0], "x_size": 2, "y_size": 1 },
        "learning_rate": 0.1,
        "epochs": 3,
        "batch_size": 2,
        "seed": 42,
        "dispatch": "fused",
        "on_degeneracy": { "kind": "backoff", "factor": 0.5 }
    }
}"#;

fn config() -> RunConfig {
    RunConfig::from_json(CONFIG).unwrap()
}

#[test]
fn parses_every_field() {
    let config = config();

    assert_eq!(config.model.layers[0].act_fn, ActFnConfig::Relu);
    assert_eq!(config.model.layers[0].init, ParamGenConfig::Kaiming);
    assert_eq!(config.model.layers[1].init, ParamGenConfig::XavierUniform);
    assert_eq!(config.training.dispatch, DispatchConfig::Fused);
    assert_eq!(
        config.training.on_degeneracy,
        DegeneracyConfig::Backoff { factor: 0.5 }
    );
    assert!(!config.training.shuffle);
    assert!(config.training.output.is_none());
}

#[test]
fn defaults() {
    let mut config = config();
    config.training.on_degeneracy = DegeneracyConfig::default();
    config.training.dispatch = DispatchConfig::default();

    assert_eq!(config.training.on_degeneracy, DegeneracyConfig::Skip);
    assert_eq!(config.training.dispatch, DispatchConfig::PerLayer);
}

#[test]
fn rejects_malformed_json() {
    let err = RunConfig::from_json("{ \"model\": ").unwrap_err();
    assert!(matches!(err, OrchestratorError::Json(_)));
}

#[test]
fn same_seed_same_initial_params() {
    let a = config();
    let b = config();

    let a = train(a.model, a.training).unwrap();
    let b = train(b.model, b.training).unwrap();

    assert_eq!(a.params(), b.params());
    assert_eq!(a.params().len(), 3 * 3 + 4);
}

#[test]
fn explicit_params_must_fit() {
    let mut config = config();
    config.model.params = Some(vec![0.; 5]);

    let err = train(config.model, config.training).unwrap_err();
    assert!(matches!(err, OrchestratorError::Kernel(_)));
}

#[test]
fn rejects_non_positive_learning_rate() {
    let mut config = config();
    config.training.learning_rate = 0.;

    let err = train(config.model, config.training).unwrap_err();
    assert!(matches!(err, OrchestratorError::InvalidConfig(_)));
}

#[test]
fn rejects_backoff_out_of_range() {
    let mut config = config();
    config.training.on_degeneracy = DegeneracyConfig::Backoff { factor: 1.5 };

    let err = train(config.model, config.training).unwrap_err();
    assert!(matches!(err, OrchestratorError::InvalidConfig(_)));
}

#[test]
fn rejects_dataset_of_the_wrong_shape() {
    let mut config = config();
    config.training.dataset = DatasetConfig::Inline {
        data: vec![0.; 8],
        x_size: 3,
        y_size: 1,
    };

    let err = train(config.model, config.training).unwrap_err();
    assert!(matches!(err, OrchestratorError::InvalidConfig(_)));
}

#[test]
fn rejects_ragged_dataset() {
    let mut config = config();
    config.training.dataset = DatasetConfig::Inline {
        data: vec![0.; 7],
        x_size: 2,
        y_size: 1,
    };

    let err = train(config.model, config.training).unwrap_err();
    assert!(matches!(err, OrchestratorError::Dataset(_)));
}

#[test]
fn rejects_batch_larger_than_dataset() {
    let mut config = config();
    config.training.batch_size = NonZeroUsize::new(3).unwrap();

    let err = train(config.model, config.training).unwrap_err();
    assert!(matches!(err, OrchestratorError::InvalidConfig(_)));
}

#[test]
fn rejects_invalid_topology() {
    let mut config = config();
    config.model.layers[0].size = 0;

    let err = train(config.model, config.training).unwrap_err();
    assert!(matches!(err, OrchestratorError::Kernel(_)));
}

#[test]
fn missing_csv_fails_to_load() {
    let mut config = config();
    config.training.dataset = DatasetConfig::Csv {
        path: "does/not/exist.csv".into(),
        x_size: 2,
        y_size: 1,
    };

    let err = train(config.model, config.training).unwrap_err();
    assert!(matches!(err, OrchestratorError::Dataset(_)));
}

#[test]
fn const_init_sets_biases_apart() {
    let mut config = config();
    config.model.layers[0].init =
        serde_json::from_str(r#"{ "kind": "const", "value": 0.5, "bias": 0 }"#).unwrap();

    let session = train(config.model, config.training).unwrap();
    assert_eq!(&session.params().as_slice()[..9], [0., 0.5, 0.5].repeat(3));
}
