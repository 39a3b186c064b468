use log::info;

use crate::error::DemoError;
use crate::math::backend::MatrixFactory;
use crate::network::neurons::NeuronsActivation;
use crate::network::unsupervised::UnsupervisedNeuralNetwork;
use crate::train::epoch_stats::TrainingSummary;

type Phase<'a, R> = Box<dyn FnOnce() -> Result<R, DemoError> + 'a>;
type FactoryPhase<'a, R> = Box<dyn FnOnce(&MatrixFactory) -> Result<R, DemoError> + 'a>;
type ContextPhase<'a, C, R> = Box<dyn FnOnce(&C) -> R + 'a>;

/// The pluggable steps of a train-then-showcase demo, run in this order by
/// `run_demo`:
///
/// 1. `create_matrix_factory`
/// 2. `load_training_data` (features-major, one column per example)
/// 3. `create_network_creation_context`
/// 4. `create_network`, given the training data's feature count
/// 5. `create_training_context`, then the network is trained
/// 6. `create_test_context`
/// 7. `load_test_data`
/// 8. `showcase`
pub struct DemoPhases<'a, N, C, S> {
    pub create_matrix_factory: Phase<'a, MatrixFactory>,
    pub load_training_data: FactoryPhase<'a, NeuronsActivation>,
    pub create_network_creation_context: FactoryPhase<'a, C>,
    pub create_network: Box<dyn FnOnce(usize, &C) -> Result<N, DemoError> + 'a>,
    pub create_training_context: ContextPhase<'a, C, C>,
    pub create_test_context: ContextPhase<'a, C, C>,
    pub load_test_data: ContextPhase<'a, C, Result<NeuronsActivation, DemoError>>,
    pub showcase: Box<dyn FnOnce(&N, &NeuronsActivation, &C) -> Result<S, DemoError> + 'a>,
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct DemoOutcome<S> {
    pub input_feature_count: usize,
    pub training: TrainingSummary,
    pub showcase: S,
}

/// Runs every phase in order. The first error ends the run and is returned as is.
pub fn run_demo<N, C, S>(phases: DemoPhases<'_, N, C, S>) -> Result<DemoOutcome<S>, DemoError>
where
    N: UnsupervisedNeuralNetwork<C>,
{
    let matrix_factory = (phases.create_matrix_factory)()?;

    let training_data = (phases.load_training_data)(&matrix_factory)?;
    let input_feature_count = training_data.feature_count();

    let creation_context = (phases.create_network_creation_context)(&matrix_factory)?;
    let mut network = (phases.create_network)(input_feature_count, &creation_context)?;

    let training_context = (phases.create_training_context)(&creation_context);
    let training = network.train(&training_data, &training_context)?;
    if let Some(loss) = training.final_loss() {
        info!("Training finished after {} epochs, final loss {:.6}", training.epochs_run(), loss);
    }

    let test_context = (phases.create_test_context)(&training_context);
    let test_data = (phases.load_test_data)(&test_context)?;

    let showcase = (phases.showcase)(&network, &test_data, &test_context)?;

    Ok(DemoOutcome {
        input_feature_count,
        training,
        showcase,
    })
}
