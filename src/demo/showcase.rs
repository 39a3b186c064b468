use std::thread;
use std::time::Duration;

use log::info;

use crate::demo::config::Pacing;
use crate::display::ImageDisplay;
use crate::error::DemoError;
use crate::network::context::AutoEncoderContext;
use crate::network::error::NetworkError;
use crate::network::neurons::NeuronsActivation;
use crate::network::unsupervised::AutoEncoderNetwork;
use crate::render::mnist::draw;

/// Optimal-input weights within ±BOUNDARY render as mid-grey.
const BOUNDARY: f32 = 0.02;

/// Feature counts seen while reconstructing one test example.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconstruction {
    pub original_features: usize,
    pub encoded_features: usize,
    pub decoded_features: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowcaseReport {
    pub hidden_unit_frames: usize,
    pub reconstructions: Vec<Reconstruction>,
}

impl ShowcaseReport {
    /// Total frames sent to the display.
    pub fn frames(&self) -> usize {
        self.hidden_unit_frames + 2 * self.reconstructions.len()
    }
}

/// Maps an optimal-input weight to black, grey or white intensity.
pub fn quantize(weight: f32) -> f32 {
    if weight < -BOUNDARY {
        0.0
    } else if weight > BOUNDARY {
        1.0
    } else {
        0.5
    }
}

/// Draws what every hidden unit responds to, then the original and the
/// reconstruction of the first `samples` test examples.
///
/// Leaves the network untouched. Any failure aborts the remaining frames.
pub fn showcase<N, D>(
    network: &N,
    test_data: &NeuronsActivation,
    ctx: &AutoEncoderContext,
    samples: usize,
    pacing: Pacing,
    display: &mut D,
) -> Result<ShowcaseReport, DemoError>
where
    N: AutoEncoderNetwork<AutoEncoderContext> + ?Sized,
    D: ImageDisplay + ?Sized,
{
    if ctx.is_training() {
        return Err(NetworkError::InvalidContext(
            "showcase requires an inference context".into(),
        )
        .into());
    }
    info!("Showcasing trained AutoEncoder...");
    let mut report = ShowcaseReport::default();

    info!("Drawing visualisations of patterns sought by the hidden neurons...");
    for neuron in 0..network.hidden_neuron_count() {
        let pattern = network.optimal_input_for_hidden_neuron(neuron, ctx)?;
        let intensities: Vec<f32> = pattern.features().as_slice().iter().map(|&w| quantize(w)).collect();
        draw(&intensities, display)?;
        report.hidden_unit_frames += 1;
        pause(pacing.hidden_unit_delay);
    }

    info!("Visualising reconstructed data");
    for i in 0..samples {
        let original = test_data.example(i)?;
        draw(original.features().as_slice(), display)?;

        let encoded = network.encode(&original, ctx)?;
        info!(
            "Encoded a single image from {} pixels to {} features",
            original.feature_count(),
            encoded.feature_count()
        );
        pause(pacing.reconstruction_delay);

        let decoded = network.decode(&encoded, ctx)?;
        draw(decoded.features().as_slice(), display)?;
        info!(
            "Decoded {} features into an image with {} pixels",
            encoded.feature_count(),
            decoded.feature_count()
        );

        report.reconstructions.push(Reconstruction {
            original_features: original.feature_count(),
            encoded_features: encoded.feature_count(),
            decoded_features: decoded.feature_count(),
        });
        pause(pacing.reconstruction_delay);
    }

    Ok(report)
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_uses_symmetric_boundary() {
        assert_eq!(quantize(-0.5), 0.0);
        assert_eq!(quantize(-0.021), 0.0);
        assert_eq!(quantize(-0.02), 0.5);
        assert_eq!(quantize(0.0), 0.5);
        assert_eq!(quantize(0.02), 0.5);
        assert_eq!(quantize(0.021), 1.0);
    }

    #[test]
    fn frame_count_includes_both_halves_of_each_pair() {
        let report = ShowcaseReport {
            hidden_unit_frames: 3,
            reconstructions: vec![
                Reconstruction { original_features: 4, encoded_features: 2, decoded_features: 4 };
                5
            ],
        };
        assert_eq!(report.frames(), 13);
    }
}
