pub mod analyzer;
pub mod archive;
pub mod paths;
pub mod rebuild;
pub mod workflow;
