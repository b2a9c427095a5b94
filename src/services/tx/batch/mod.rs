pub mod batch_sequencer;

pub use batch_sequencer::{BatchReport, BatchSequencer, ChunkOutcome, ChunkStatus, plan_chunks};
