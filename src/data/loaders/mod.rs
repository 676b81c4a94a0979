// mod.rs - Readers and writers for every record source

pub mod csv;
pub mod literal;
pub mod matchmaker;
pub mod pymol;
pub mod transcript;

pub use self::csv::{read_records, read_records_from_path, write_records, write_records_to_path};
pub use matchmaker::parse_matchmaker_transcript;
pub use pymol::{parse_pymol_transcript, RefinementStage};
pub use transcript::read_transcript_lines;
