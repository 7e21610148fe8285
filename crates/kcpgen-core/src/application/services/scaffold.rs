//! Scaffold orchestrator.
//!
//! Runs an ordered list of create-templates and updaters against one project
//! root:
//! 1. Plan: resolve every output path and check declared context fields
//! 2. Dispatch: write, skip, overwrite or splice, one file at a time
//! 3. Report: one outcome per entry
//!
//! Planning problems abort the run before anything is written. Dispatch
//! problems are recorded against their file and the run moves on, unless
//! `strict` is set.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer},
    },
    domain::{
        FragmentPolicy, IfExistsAction, PathPattern, RelativePath, RenderingContext, Template,
        Updater, find_missing, splice,
    },
    error::KcpgenResult,
};

/// Knobs for one orchestrator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaffoldOptions {
    pub file_mode: u32,
    pub dir_mode: u32,
    /// Stop at the first failing file.
    pub strict: bool,
    pub fragment_policy: FragmentPolicy,
}

impl Default for ScaffoldOptions {
    fn default() -> Self {
        Self {
            file_mode: 0o644,
            dir_mode: 0o755,
            strict: false,
            fragment_policy: FragmentPolicy::Append,
        }
    }
}

/// One unit of work for [`Scaffold::execute`].
#[derive(Debug)]
pub enum ScaffoldEntry {
    /// Produce a file from a template. `force` promotes error-if-exists.
    Create {
        template: Box<dyn Template>,
        force: bool,
    },
    /// Weave fragments into a file that must already exist.
    Update(Box<dyn Updater>),
}

impl ScaffoldEntry {
    pub fn create(template: impl Template + 'static) -> Self {
        Self::Create {
            template: Box::new(template),
            force: false,
        }
    }

    pub fn update(updater: impl Updater + 'static) -> Self {
        Self::Update(Box::new(updater))
    }

    /// Set the force flag. No effect on updaters.
    pub fn forced(self, force: bool) -> Self {
        match self {
            Self::Create { template, .. } => Self::Create { template, force },
            update => update,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { template, .. } => template.name(),
            Self::Update(updater) => updater.name(),
        }
    }

    fn path(&self) -> PathPattern {
        match self {
            Self::Create { template, .. } => template.path(),
            Self::Update(updater) => updater.path(),
        }
    }
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    Created,
    Overwritten,
    /// Existed and the template asked to leave it alone.
    Skipped,
    Updated {
        inserted: usize,
    },
    /// An updater had nothing to add.
    Unchanged,
    Failed(ApplicationError),
}

impl FileStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Overwritten => f.write_str("overwritten"),
            Self::Skipped => f.write_str("skipped"),
            Self::Updated { inserted } => write!(f, "updated (+{inserted})"),
            Self::Unchanged => f.write_str("unchanged"),
            Self::Failed(_) => f.write_str("failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub path: RelativePath,
    pub template: &'static str,
    pub status: FileStatus,
}

/// Per-status counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScaffoldSummary {
    pub created: usize,
    pub overwritten: usize,
    pub skipped: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// Ordered outcomes of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaffoldReport {
    outcomes: Vec<FileOutcome>,
}

impl ScaffoldReport {
    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    pub fn outcome(&self, path: impl AsRef<Path>) -> Option<&FileOutcome> {
        let path = path.as_ref();
        self.outcomes.iter().find(|o| o.path.as_path() == path)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ApplicationError> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            FileStatus::Failed(err) => Some(err),
            _ => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn summary(&self) -> ScaffoldSummary {
        self.outcomes
            .iter()
            .fold(ScaffoldSummary::default(), |mut s, o| {
                match o.status {
                    FileStatus::Created => s.created += 1,
                    FileStatus::Overwritten => s.overwritten += 1,
                    FileStatus::Skipped => s.skipped += 1,
                    FileStatus::Updated { .. } => s.updated += 1,
                    FileStatus::Unchanged => s.unchanged += 1,
                    FileStatus::Failed(_) => s.failed += 1,
                }
                s
            })
    }

    /// Append the outcomes of a later run.
    pub fn merge(&mut self, other: ScaffoldReport) {
        self.outcomes.extend(other.outcomes);
    }

    /// `Err(ScaffoldIncomplete)` listing every failure, or the report itself.
    pub fn into_result(self) -> KcpgenResult<Self> {
        let failures: Vec<ApplicationError> = self.failures().cloned().collect();
        if failures.is_empty() {
            Ok(self)
        } else {
            Err(ApplicationError::ScaffoldIncomplete { failures }.into())
        }
    }

    fn push(&mut self, outcome: FileOutcome) {
        self.outcomes.push(outcome);
    }
}

struct Planned<'a> {
    entry: &'a ScaffoldEntry,
    path: RelativePath,
}

/// The orchestrator: a project root plus the ports to reach it.
pub struct Scaffold {
    root: PathBuf,
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn TemplateRenderer>,
    options: ScaffoldOptions,
}

impl Scaffold {
    pub fn new(
        root: impl Into<PathBuf>,
        filesystem: Box<dyn Filesystem>,
        renderer: Box<dyn TemplateRenderer>,
    ) -> Self {
        Self {
            root: root.into(),
            filesystem,
            renderer,
            options: ScaffoldOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ScaffoldOptions) -> Self {
        self.options = options;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &ScaffoldOptions {
        &self.options
    }

    /// Read the boilerplate header produced by an earlier init run.
    pub fn load_boilerplate(&self, path: impl AsRef<Path>) -> KcpgenResult<String> {
        let rel = path.as_ref();
        let abs = self.root.join(rel);
        if !self.filesystem.exists(&abs) {
            return Err(ApplicationError::BoilerplateMissing {
                path: rel.to_path_buf(),
                reason: "file not found".into(),
            }
            .into());
        }
        self.filesystem.read_to_string(&abs).map_err(|e| {
            ApplicationError::BoilerplateMissing {
                path: rel.to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Run `entries` in order against the project root.
    #[instrument(skip_all, fields(root = %self.root.display(), entries = entries.len()))]
    pub fn execute(
        &self,
        ctx: &RenderingContext,
        entries: Vec<ScaffoldEntry>,
    ) -> KcpgenResult<ScaffoldReport> {
        let plan = self.plan(ctx, &entries)?;

        let mut report = ScaffoldReport::default();
        for Planned { entry, path } in plan {
            let result = match entry {
                ScaffoldEntry::Create { template, force } => {
                    self.create(ctx, template.as_ref(), *force, &path)
                }
                ScaffoldEntry::Update(updater) => self.update(ctx, updater.as_ref(), &path),
            };

            let status = match result {
                Ok(status) => {
                    info!(path = %path, template = entry.name(), %status, "File processed");
                    status
                }
                Err(err) => {
                    warn!(path = %path, template = entry.name(), error = %err, "File failed");
                    if self.options.strict {
                        return Err(err.into());
                    }
                    FileStatus::Failed(err)
                }
            };

            report.push(FileOutcome {
                path,
                template: entry.name(),
                status,
            });
        }

        let summary = report.summary();
        info!(
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            failed = summary.failed,
            "Scaffold run finished"
        );
        Ok(report)
    }

    fn plan<'a>(
        &self,
        ctx: &RenderingContext,
        entries: &'a [ScaffoldEntry],
    ) -> KcpgenResult<Vec<Planned<'a>>> {
        entries
            .iter()
            .map(|entry| -> KcpgenResult<Planned<'a>> {
                if let ScaffoldEntry::Create { template, .. } = entry {
                    ctx.require_all(template.requires())?;
                }
                let path = entry.path().resolve(ctx.resource())?;
                debug!(template = entry.name(), path = %path, "Planned");
                Ok(Planned { entry, path })
            })
            .collect()
    }

    fn create(
        &self,
        ctx: &RenderingContext,
        template: &dyn Template,
        force: bool,
        rel: &RelativePath,
    ) -> Result<FileStatus, ApplicationError> {
        let abs = self.root.join(rel);
        let existed = self.filesystem.exists(&abs);

        if existed {
            match template.if_exists().promote(force) {
                IfExistsAction::Skip => return Ok(FileStatus::Skipped),
                IfExistsAction::Error => {
                    return Err(ApplicationError::FileExists {
                        path: rel.as_path().to_path_buf(),
                    });
                }
                IfExistsAction::Overwrite => {}
            }
        }

        let content =
            self.renderer
                .render(rel.as_path(), template.body(), ctx, &template.locals())?;
        self.write(&abs, &content)?;

        Ok(if existed {
            FileStatus::Overwritten
        } else {
            FileStatus::Created
        })
    }

    fn update(
        &self,
        ctx: &RenderingContext,
        updater: &dyn Updater,
        rel: &RelativePath,
    ) -> Result<FileStatus, ApplicationError> {
        let abs = self.root.join(rel);
        if !self.filesystem.exists(&abs) {
            return Err(ApplicationError::UpdateTargetMissing {
                path: rel.as_path().to_path_buf(),
            });
        }

        let current = self.filesystem.read_to_string(&abs)?;
        let declared = updater.markers(rel);
        let fragments = updater.fragments(ctx, rel);

        if let Some(missing) = find_missing(&current, declared.iter().chain(fragments.markers())) {
            return Err(ApplicationError::MarkerNotFound {
                path: rel.as_path().to_path_buf(),
                marker: missing.label().to_string(),
            });
        }

        if fragments.is_empty() {
            return Ok(FileStatus::Unchanged);
        }

        let spliced = splice(&current, &fragments, self.options.fragment_policy);
        if spliced.inserted == 0 {
            return Ok(FileStatus::Unchanged);
        }

        self.write(&abs, &spliced.content)?;
        Ok(FileStatus::Updated {
            inserted: spliced.inserted,
        })
    }

    fn write(&self, abs: &Path, content: &str) -> Result<(), ApplicationError> {
        if let Some(parent) = abs.parent() {
            self.filesystem
                .create_dir_all(parent, self.options.dir_mode)?;
        }
        self.filesystem
            .write_file(abs, content, self.options.file_mode)
    }
}
