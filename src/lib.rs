//! Core engine for checking batches of submitted project archives against an
//! expected directory template and repackaging the detected projects under
//! normalized names.
//!
//! The crate is UI-agnostic: a host shell feeds archive bytes (or an
//! [`services::archive::ArchiveReader`]) into [`services::analyzer::analyze`],
//! lets the user review/rename the detected projects, then calls
//! [`services::rebuild::rebuild`] to produce the standardized archive.

pub mod services;
#[cfg(test)]
pub mod test_utils;
pub mod types;

pub use services::analyzer::{analyze, AnalyzeParams};
pub use services::archive::{ArchiveReader, DirReader, ZipReader};
pub use services::rebuild::{rebuild, ProgressFn, RebuildOptions, RebuildOutcome, RebuildState};
pub use services::workflow::{HttpWorkflowEngine, Workflow, WorkflowEngine};
pub use types::errors::{CoreError, CoreResult};
pub use types::template::{NodeKind, Template, TemplateNode};
pub use types::{ArchiveEntry, MatchStatus, NodeMatch, Project, SubmissionGroup};
