pub mod model;

pub use model::{LevelMeters, SpectrographModel, DEFAULT_BAND_COUNT};
