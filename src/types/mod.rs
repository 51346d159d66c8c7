pub mod entry;
pub mod errors;
pub mod results;
pub mod template;

pub use entry::ArchiveEntry;
pub use results::{MatchStatus, NodeMatch, Project, SubmissionGroup};
