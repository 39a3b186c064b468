pub mod autoencoder_demo;
pub mod config;
pub mod lifecycle;
pub mod showcase;

pub use autoencoder_demo::AutoEncoderDemo;
pub use config::{ConfigError, DemoConfig, DisplayConfig, Pacing, RowRange};
pub use lifecycle::{run_demo, DemoOutcome, DemoPhases};
pub use showcase::{quantize, showcase, Reconstruction, ShowcaseReport};
