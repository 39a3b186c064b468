use std::borrow::Cow;
use std::time::Instant;

use log::{debug, info};
use rand::seq::SliceRandom;

use crate::layers::dense::{FeedForwardLayer, LayerActivation};
use crate::math::matrix::Matrix;
use crate::network::context::AutoEncoderContext;
use crate::network::error::NetworkError;
use crate::network::neurons::NeuronsActivation;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::{EpochStats, TrainingSummary};

/// How often (in epochs) progress is reported at info level.
const INFO_EVERY: usize = 50;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `layers` end to end to reconstruct `data` from itself.
///
/// Runs `ctx.epochs()` passes of gradient descent. With no mini-batch size
/// every epoch is a single full-batch step; otherwise examples are shuffled
/// each epoch and split into batches of that size.
///
/// # Errors
/// - `InvalidContext` when `ctx` is not a training context
/// - `EmptyTrainingSet` when `data` holds no examples
/// - `ShapeMismatch` when `data` does not fit the first layer
pub fn train_loop(
    layers: &mut [FeedForwardLayer],
    data: &NeuronsActivation,
    ctx: &AutoEncoderContext,
) -> Result<TrainingSummary, NetworkError> {
    if !ctx.is_training() {
        return Err(NetworkError::InvalidContext(
            "train requires a training context".into(),
        ));
    }
    let n = data.example_count();
    if n == 0 {
        return Err(NetworkError::EmptyTrainingSet);
    }
    let batch_size = ctx.mini_batch_size().unwrap_or(n).clamp(1, n);
    let optimizer = Sgd::new(ctx.learning_rate());

    info!(
        "Training for {} epochs on {} examples (batch size {}, learning rate {}, loss {:?})",
        ctx.epochs(),
        n,
        batch_size,
        ctx.learning_rate(),
        ctx.loss()
    );

    let mut summary = TrainingSummary::default();
    let mut indices: Vec<usize> = (0..n).collect();

    for epoch in 1..=ctx.epochs() {
        let t_start = Instant::now();

        if batch_size < n {
            indices.shuffle(&mut rand::thread_rng());
        }

        let mut total_loss = 0.0;
        for batch in indices.chunks(batch_size) {
            let input = if batch.len() == n {
                Cow::Borrowed(data)
            } else {
                Cow::Owned(data.examples(batch)?)
            };
            total_loss += run_one_batch(layers, &input, &optimizer, ctx)? * batch.len() as f32;
        }

        let stats = EpochStats {
            epoch,
            total_epochs: ctx.epochs(),
            loss: total_loss / n as f32,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        debug!("{:?}", stats);
        if epoch % INFO_EVERY == 0 || epoch == ctx.epochs() {
            info!("Epoch {}/{}: loss = {:.6}", epoch, ctx.epochs(), stats.loss);
        }
        summary.history.push(stats);
    }

    Ok(summary)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One forward/backward pass and weight update. Returns the batch's mean loss.
fn run_one_batch(
    layers: &mut [FeedForwardLayer],
    input: &NeuronsActivation,
    optimizer: &Sgd,
    ctx: &AutoEncoderContext,
) -> Result<f32, NetworkError> {
    let factory = ctx.factory();
    let target = input.features().into_owned();

    // Forward pass, caching every layer's activations.
    let mut caches: Vec<LayerActivation> = Vec::with_capacity(layers.len());
    for layer in layers.iter() {
        let cache = {
            let layer_input = caches.last().map(|c| &c.output).unwrap_or(input);
            layer.forward(layer_input, ctx)?
        };
        caches.push(cache);
    }
    let output = match caches.last() {
        Some(last) => last.output.features().into_owned(),
        None => return Ok(0.0),
    };
    let loss = ctx.loss().loss(&output, &target)?;

    // ∂L/∂a averaged over the batch.
    let inv_batch = 1.0 / input.example_count() as f32;
    let mut grad: Matrix = ctx.loss().derivative(&output, &target)?.scale(inv_batch);

    // Backward pass, computing all gradients before touching any weights.
    let mut weight_grads: Vec<Matrix> = Vec::with_capacity(layers.len());
    for i in (0..layers.len()).rev() {
        let (w_grad, input_grad) = layers[i].backward(&caches[i], &grad, factory, i > 0)?;
        weight_grads.push(w_grad);
        if let Some(g) = input_grad {
            grad = g;
        }
    }
    weight_grads.reverse();

    for (layer, w_grad) in layers.iter_mut().zip(weight_grads.iter()) {
        optimizer.step(&mut layer.axons, w_grad)?;
    }

    Ok(loss)
}
