//! CLI subcommand implementations for the `fame` binary.

pub mod batch_cmd;
pub mod doctor;
pub mod get_cmd;
pub mod output;
pub mod resolve_cmd;
pub mod similarity_cmd;
