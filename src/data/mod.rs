pub mod csv;

pub use csv::{load_rows, load_rows_from_csv, to_f32_rows, CsvDataExtractor, DataError, PixelFeaturesExtractor};
