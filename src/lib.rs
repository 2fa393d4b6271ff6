//! Meeting action-item extraction: transcripts in, assigned and dated tasks out.

pub mod config;
pub mod error;
pub mod evaluate;
pub mod extract;
pub mod gate;
pub mod ingest;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod resolve;
pub mod temporal;

pub use config::{OutputShape, PipelineConfig};
pub use extract::{Extractor, Strictness};
pub use models::{ActionRecord, Meeting, ParsedAction, Utterance};
pub use pipeline::{Pipeline, RunReport};
