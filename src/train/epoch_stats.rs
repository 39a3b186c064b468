use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `train_loop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean reconstruction loss over all examples in this epoch.
    pub loss: f32,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

/// Outcome of a completed training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub history: Vec<EpochStats>,
}

impl TrainingSummary {
    pub fn epochs_run(&self) -> usize {
        self.history.len()
    }

    /// Loss of the last completed epoch, if any epoch ran.
    pub fn final_loss(&self) -> Option<f32> {
        self.history.last().map(|s| s.loss)
    }
}
