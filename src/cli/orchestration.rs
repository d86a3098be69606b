//! Main sync workflow orchestration
//!
//! Sequences discovery, floor filtering, diffing, exclusion, the
//! per-version mirror transactions, the edge refresh and the final push.
//! Kept apart from `main.rs` so the workflow can be driven with any
//! [CommandRunner], including the mock used in tests.

use std::path::{Path, PathBuf};

use crate::bootstrap::{self, BootstrapOutcome};
use crate::config::MirrorConfig;
use crate::domain::exclusion::matching_marker;
use crate::domain::{diff, filter_floor, should_mirror, SystemKind, TagSchemes, Version};
use crate::error::{MirrorError, Result};
use crate::mirror::{refresh_edge, EdgeOutcome, MirrorTransaction};
use crate::notice::SyncNotice;
use crate::ui;
use crate::vcs::{CommandRunner, MirrorRepository, ProcessRunner};

/// Switches for one sync run
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOptions {
    /// Push main line, edge branch and tags when the sync completes
    pub push: bool,

    /// Compute and report the plan without changing either repository
    pub dry_run: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        SyncOptions {
            push: true,
            dry_run: false,
        }
    }
}

/// What a sync run would do, derived purely from the two tag listings
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPlan {
    /// Floor-filtered source versions, in listing order
    pub source_versions: Vec<Version>,
    /// Floor-filtered target versions, in listing order
    pub target_versions: Vec<Version>,
    /// Source versions missing on the target
    pub candidates: Vec<Version>,
    /// Candidates that pass the exclusion filter, in candidate order
    pub transactions: Vec<MirrorTransaction>,
    /// Candidates rejected by the exclusion filter
    pub excluded: Vec<Version>,
}

impl SyncPlan {
    pub fn target_tags(&self) -> Vec<String> {
        self.transactions
            .iter()
            .map(|tx| tx.target_tag.clone())
            .collect()
    }
}

/// Result of a sync run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncReport {
    pub bootstrap: Option<BootstrapOutcome>,
    pub source_count: usize,
    pub target_count: usize,
    pub candidates: Vec<Version>,
    /// Target tags created, in creation order
    pub mirrored: Vec<String>,
    pub skipped: Vec<Version>,
    pub edge: Option<EdgeOutcome>,
    pub pushed: bool,
    pub dry_run: bool,
}

/// Drives a full sync against one working copy
pub struct SyncOrchestrator<R> {
    repo: MirrorRepository<R>,
    config: MirrorConfig,
    schemes: TagSchemes,
    floor: Option<Version>,
    workdir: PathBuf,
}

impl<R: CommandRunner> SyncOrchestrator<R> {
    /// Validate the configuration and bind it to a runner and working copy
    pub fn new(runner: R, config: MirrorConfig, workdir: impl Into<PathBuf>) -> Result<Self> {
        config.validate()?;
        let schemes = config.tag_schemes()?;
        let floor = config.floor_version()?;
        let repo = MirrorRepository::new(runner, config.source_location());

        Ok(SyncOrchestrator {
            repo,
            config,
            schemes,
            floor,
            workdir: workdir.into(),
        })
    }

    /// Source versions at or above the floor
    pub fn discover_source_versions(&self) -> Result<Vec<Version>> {
        let tags = self.repo.list_source_tags()?;
        let versions = self.schemes.scheme(SystemKind::Source).versions(tags).collect();
        Ok(filter_floor(versions, self.floor.as_ref()))
    }

    /// Target versions at or above the floor
    pub fn discover_target_versions(&self) -> Result<Vec<Version>> {
        let tags = self.repo.list_target_tags()?;
        let versions = self.schemes.scheme(SystemKind::Target).versions(tags).collect();
        Ok(filter_floor(versions, self.floor.as_ref()))
    }

    /// Discover both sides and decide which versions to mirror
    pub fn plan(&self) -> Result<SyncPlan> {
        ui::display_status("Getting source version tags");
        let source_versions = self.discover_source_versions()?;
        ui::display_count(source_versions.len());

        ui::display_status("Getting target version tags");
        let target_versions = self.discover_target_versions()?;
        ui::display_count(target_versions.len());

        ui::display_status("Getting versions without target tags");
        let candidates = diff(&source_versions, &target_versions);
        ui::display_count(candidates.len());
        tracing::debug!(candidates = %ui::format_versions(&candidates), "diff computed");

        let exclude = &self.config.sync.exclude;
        let mut transactions = Vec::new();
        let mut excluded = Vec::new();

        for version in &candidates {
            if should_mirror(version, exclude) {
                transactions.push(MirrorTransaction::new(
                    version,
                    &self.schemes,
                    &self.config.target.main_branch,
                ));
            } else {
                excluded.push(version.clone());
            }
        }

        Ok(SyncPlan {
            source_versions,
            target_versions,
            candidates,
            transactions,
            excluded,
        })
    }

    /// Run the whole workflow
    pub fn run(&self, options: &SyncOptions) -> Result<SyncReport> {
        if options.dry_run {
            return self.dry_run();
        }

        let target = &self.config.target;
        let mut report = SyncReport {
            bootstrap: Some(bootstrap::bootstrap(
                &self.repo,
                &self.workdir,
                &target.main_branch,
                target.identity.as_ref(),
            )?),
            ..SyncReport::default()
        };

        self.repo.checkout(&target.main_branch)?;

        let plan = self.plan()?;
        report.source_count = plan.source_versions.len();
        report.target_count = plan.target_versions.len();
        report.candidates = plan.candidates.clone();

        self.report_exclusions(&plan);
        if plan.transactions.is_empty() {
            ui::display_notice(&SyncNotice::NothingToMirror);
        }

        for tx in &plan.transactions {
            ui::display_status(&format!("Mirroring {}", tx.target_tag));
            tx.run(&self.repo)?;
            report.mirrored.push(tx.target_tag.clone());
        }
        report.skipped = plan.excluded;

        ui::display_status("Sync edge");
        let edge = refresh_edge(&self.repo, &target.main_branch, &target.edge_branch)?;
        if edge == EdgeOutcome::Unchanged {
            ui::display_notice(&SyncNotice::EdgeUnchanged {
                branch: target.edge_branch.clone(),
            });
        }
        report.edge = Some(edge);

        if options.push {
            self.push()?;
            report.pushed = true;
        } else {
            ui::display_notice(&SyncNotice::PushSkipped {
                remote: target.remote.clone(),
            });
        }

        ui::display_success(&format!(
            "Mirrored {} version(s) into '{}'",
            report.mirrored.len(),
            target.main_branch
        ));
        Ok(report)
    }

    /// Send the main line, the edge branch and every tag to the remote
    pub fn push(&self) -> Result<()> {
        let target = &self.config.target;
        ui::display_status("Push");
        self.repo.push_branch(&target.remote, &target.main_branch)?;
        self.repo.push_branch(&target.remote, &target.edge_branch)?;
        self.repo.push_tags(&target.remote, &target.main_branch)?;
        Ok(())
    }

    fn dry_run(&self) -> Result<SyncReport> {
        if !bootstrap::is_bootstrapped(&self.workdir) {
            return Err(MirrorError::config(format!(
                "Working copy '{}' is not initialised; run once without --dry-run",
                self.workdir.display()
            )));
        }

        let plan = self.plan()?;
        self.report_exclusions(&plan);
        ui::display_plan(&plan.target_tags());

        Ok(SyncReport {
            source_count: plan.source_versions.len(),
            target_count: plan.target_versions.len(),
            candidates: plan.candidates.clone(),
            skipped: plan.excluded,
            dry_run: true,
            ..SyncReport::default()
        })
    }

    fn report_exclusions(&self, plan: &SyncPlan) {
        for version in &plan.excluded {
            let marker = version
                .qualifier
                .as_deref()
                .and_then(|q| matching_marker(q, &self.config.sync.exclude))
                .unwrap_or_default();
            ui::display_notice(&SyncNotice::ExcludedVersion {
                tag: self.schemes.format(version, SystemKind::Target),
                marker: marker.to_string(),
            });
        }
    }
}

/// Sync `workdir` using the real `svn` and `git` binaries
pub fn run_sync(config: MirrorConfig, workdir: &Path, options: &SyncOptions) -> Result<SyncReport> {
    let runner = ProcessRunner::new(workdir).with_identity(config.target.identity.clone());
    let orchestrator = SyncOrchestrator::new(runner, config, workdir)?;
    orchestrator.run(options)
}
