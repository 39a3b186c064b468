pub mod mnist;

pub use mnist::{draw, to_raster, RenderError, DISPLAY_SIDE, MNIST_PIXELS, MNIST_SIDE};
