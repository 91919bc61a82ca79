//! File actions module.
//!
//! This module provides the deletion pipeline:
//! - Move to system trash first, with a permanent-delete fallback
//! - Post-delete verification that the file is actually gone
//! - Pause, resume and cancel through a shared session handle
//! - Optional per-file delay, scaled up on slow storage
//!
//! ```no_run
//! use dupesweep::actions::{DeleteOptions, DeletePipeline};
//!
//! let pipeline = DeletePipeline::new(DeleteOptions::default());
//! let controller = pipeline.controller();
//! // hand `controller` to another thread to pause or cancel
//! let result = pipeline.run(&[], None);
//! println!("{}", result.summary());
//! ```

pub mod delete;

pub use delete::{
    DeleteBatchResult, DeleteController, DeleteEventCallback, DeleteOptions, DeleteOutcome,
    DeletePipeline, DeleteRecord, DeleteStatus, DeleteTask, DriveLetterHeuristic, SlowStorage,
};
