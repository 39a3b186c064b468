pub mod epoch_stats;
pub mod loop_fn;

pub use epoch_stats::{EpochStats, TrainingSummary};
pub use loop_fn::train_loop;
