use crate::network::error::NetworkError;
use crate::network::neurons::NeuronsActivation;
use crate::train::epoch_stats::TrainingSummary;

/// A network that learns from unlabelled examples.
pub trait UnsupervisedNeuralNetwork<C> {
    fn train(&mut self, data: &NeuronsActivation, ctx: &C) -> Result<TrainingSummary, NetworkError>;
}

/// An unsupervised network with an encoding half and a decoding half that
/// can be driven separately.
pub trait AutoEncoderNetwork<C>: UnsupervisedNeuralNetwork<C> {
    /// Number of units in the encoding layer's output.
    fn hidden_neuron_count(&self) -> usize;

    /// The input pattern that maximally excites hidden unit `neuron`.
    /// Requires an inference context.
    fn optimal_input_for_hidden_neuron(
        &self,
        neuron: usize,
        ctx: &C,
    ) -> Result<NeuronsActivation, NetworkError>;

    /// Runs `input` through the encoding layer only.
    fn encode(&self, input: &NeuronsActivation, ctx: &C) -> Result<NeuronsActivation, NetworkError>;

    /// Runs `encoded` through the decoding layer only.
    fn decode(&self, encoded: &NeuronsActivation, ctx: &C) -> Result<NeuronsActivation, NetworkError>;
}
