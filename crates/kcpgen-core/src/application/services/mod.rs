//! Application services: the orchestrator and the subcommand scaffolders.
//!
//! [`Scaffold`] runs an ordered entry list against one project root.
//! [`InitScaffolder`] and [`ApiScaffolder`] decide which entries run.

pub mod api;
pub mod init;
pub mod scaffold;

#[cfg(test)]
pub(crate) mod testing;

pub use api::ApiScaffolder;
pub use init::InitScaffolder;
pub use scaffold::{
    FileOutcome, FileStatus, Scaffold, ScaffoldEntry, ScaffoldOptions, ScaffoldReport,
    ScaffoldSummary,
};

use crate::error::KcpgenResult;

/// A subcommand that turns its inputs into one orchestrator run.
pub trait Scaffolder {
    fn scaffold(&self, scaffold: &Scaffold) -> KcpgenResult<ScaffoldReport>;
}
