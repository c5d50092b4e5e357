// Trackside - car vs tram roadside sound classifier
// Module declarations

pub mod audio;
pub mod dataset;
pub mod features;
pub mod model;
pub mod pipeline;

pub use pipeline::{run, EvaluationReport, PipelineConfig, PipelineError};
