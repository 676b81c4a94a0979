// mod.rs - Data structures module

pub mod dataset;
pub mod loaders;
pub mod record;
pub mod sample;

// Re-export main types for convenience
pub use dataset::{Column, Dataset, DatasetRow};
pub use record::{CanonicalRecord, Measurement, StructureMeta};
pub use sample::{filter_samples, load_sample_set, SampleDescription};
