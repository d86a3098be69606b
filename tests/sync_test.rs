// tests/sync_test.rs
use std::fs;
use std::path::Path;

use svn_mirror::cli::{SyncOptions, SyncOrchestrator};
use svn_mirror::config::MirrorConfig;
use svn_mirror::domain::Version;
use svn_mirror::mirror::EdgeOutcome;
use svn_mirror::vcs::{CommitIdentity, MockRunner, VcsCommand};
use svn_mirror::MirrorError;

const SOURCE_URL: &str = "http://svn.example.org";
const TRUNK_URL: &str = "http://svn.example.org/branches/1.4";

fn config() -> MirrorConfig {
    let mut config = MirrorConfig::default();
    config.source.url = SOURCE_URL.to_string();
    config.sync.exclude = vec!["RC".to_string()];
    config
}

/// A working copy that already has both metadata directories
fn bootstrapped_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join(".svn")).unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    dir
}

fn scenario_runner() -> MockRunner {
    MockRunner::new()
        .with_source_tags(&[
            "RELEASE_1_2_9",
            "RELEASE_1_3_0",
            "RELEASE_1_3_1_RC1",
            "RELEASE_1_4_0",
            "unrelated-tag",
        ])
        .with_target_tags(&["v1.3.0"])
}

fn checkout(branch: &str, create: bool) -> VcsCommand {
    VcsCommand::GitCheckout {
        branch: branch.to_string(),
        create,
    }
}

fn pushes(commands: &[VcsCommand]) -> Vec<&VcsCommand> {
    commands
        .iter()
        .filter(|c| matches!(c, VcsCommand::GitPush { .. }))
        .collect()
}

#[test]
fn test_sync_mirrors_missing_unexcluded_versions() {
    let dir = bootstrapped_dir();
    let runner = scenario_runner();
    let orchestrator = SyncOrchestrator::new(&runner, config(), dir.path()).unwrap();

    let report = orchestrator.run(&SyncOptions::default()).unwrap();

    assert_eq!(report.source_count, 3);
    assert_eq!(report.target_count, 1);
    assert_eq!(
        report.candidates,
        vec![Version::with_qualifier(1, 3, 1, "RC1"), Version::new(1, 4, 0)]
    );
    assert_eq!(report.mirrored, vec!["v1.4.0".to_string()]);
    assert_eq!(report.skipped, vec![Version::with_qualifier(1, 3, 1, "RC1")]);
    assert_eq!(report.edge, Some(EdgeOutcome::Created));
    assert!(report.pushed);
    assert!(!report.dry_run);

    assert_eq!(
        runner.target_tags(),
        vec!["v1.3.0".to_string(), "v1.4.0".to_string()]
    );
    assert_eq!(
        runner.branches(),
        vec!["master".to_string(), "edge".to_string()]
    );
}

#[test]
fn test_sync_command_sequence() {
    let dir = bootstrapped_dir();
    let runner = scenario_runner();
    let orchestrator = SyncOrchestrator::new(&runner, config(), dir.path()).unwrap();

    orchestrator.run(&SyncOptions::default()).unwrap();

    let expected = vec![
        checkout("master", false),
        VcsCommand::SvnList {
            url: "http://svn.example.org/tags/".to_string(),
        },
        VcsCommand::GitTagList,
        // mirror transaction for 1.4.0
        checkout("RELEASE_1_4_0", true),
        VcsCommand::SvnSwitch {
            url: "http://svn.example.org/tags/RELEASE_1_4_0".to_string(),
        },
        VcsCommand::GitAddAll,
        VcsCommand::GitCommit {
            message: "RELEASE_1_4_0 => v1.4.0 commit".to_string(),
            allow_empty: true,
        },
        checkout("master", false),
        VcsCommand::GitMerge {
            branch: "RELEASE_1_4_0".to_string(),
            message: "Merge branch 'RELEASE_1_4_0'".to_string(),
        },
        VcsCommand::GitDeleteBranch {
            name: "RELEASE_1_4_0".to_string(),
        },
        VcsCommand::GitTagAnnotated {
            name: "v1.4.0".to_string(),
            message: "version v1.4.0 tag".to_string(),
        },
        // edge refresh
        VcsCommand::GitListBranch {
            name: "edge".to_string(),
        },
        VcsCommand::GitBranch {
            name: "edge".to_string(),
        },
        checkout("edge", false),
        VcsCommand::SvnSwitch {
            url: TRUNK_URL.to_string(),
        },
        VcsCommand::GitAddAll,
        VcsCommand::GitStatus,
        VcsCommand::GitCommit {
            message: "edge update".to_string(),
            allow_empty: false,
        },
        checkout("master", false),
        // push
        VcsCommand::GitPush {
            remote: "origin".to_string(),
            refspec: "master".to_string(),
            tags: false,
        },
        VcsCommand::GitPush {
            remote: "origin".to_string(),
            refspec: "edge".to_string(),
            tags: false,
        },
        VcsCommand::GitPush {
            remote: "origin".to_string(),
            refspec: "master".to_string(),
            tags: true,
        },
    ];

    assert_eq!(runner.commands(), expected);
}

#[test]
fn test_second_run_is_a_no_op() {
    let dir = bootstrapped_dir();
    let runner = scenario_runner()
        .with_target_tags(&["v1.3.0", "v1.4.0"])
        .with_branches(&["master", "edge"])
        .with_working_copy_at(TRUNK_URL);
    let orchestrator = SyncOrchestrator::new(&runner, config(), dir.path()).unwrap();

    let report = orchestrator.run(&SyncOptions::default()).unwrap();

    assert!(report.mirrored.is_empty());
    assert_eq!(report.candidates, vec![Version::with_qualifier(1, 3, 1, "RC1")]);
    assert_eq!(report.edge, Some(EdgeOutcome::Unchanged));
    assert!(!runner
        .commands()
        .iter()
        .any(|c| matches!(c, VcsCommand::GitTagAnnotated { .. } | VcsCommand::GitCommit { .. })));
    assert_eq!(
        runner.target_tags(),
        vec!["v1.3.0".to_string(), "v1.4.0".to_string()]
    );
}

#[test]
fn test_versions_mirror_in_listing_order() {
    let dir = bootstrapped_dir();
    let runner = MockRunner::new().with_source_tags(&["RELEASE_1_4_1", "RELEASE_1_3_5", "RELEASE_1_4_0"]);
    let orchestrator = SyncOrchestrator::new(&runner, config(), dir.path()).unwrap();

    let report = orchestrator.run(&SyncOptions::default()).unwrap();

    assert_eq!(report.mirrored, vec!["v1.4.1", "v1.3.5", "v1.4.0"]);
}

#[test]
fn test_no_push_option() {
    let dir = bootstrapped_dir();
    let runner = scenario_runner();
    let orchestrator = SyncOrchestrator::new(&runner, config(), dir.path()).unwrap();

    let report = orchestrator
        .run(&SyncOptions {
            push: false,
            dry_run: false,
        })
        .unwrap();

    assert!(!report.pushed);
    assert!(pushes(&runner.commands()).is_empty());
    assert_eq!(report.mirrored, vec!["v1.4.0".to_string()]);
}

#[test]
fn test_failed_transaction_stops_the_run() {
    let dir = bootstrapped_dir();
    let runner = scenario_runner().fail_on(
        |cmd| matches!(cmd, VcsCommand::GitMerge { .. }),
        "CONFLICT (content): Merge conflict in index.php",
    );
    let orchestrator = SyncOrchestrator::new(&runner, config(), dir.path()).unwrap();

    let err = orchestrator.run(&SyncOptions::default()).unwrap_err();

    match &err {
        MirrorError::Transaction { tag, step, .. } => {
            assert_eq!(tag, "v1.4.0");
            assert_eq!(step, "reintegrate");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.to_string().contains("CONFLICT"));

    let commands = runner.commands();
    assert!(pushes(&commands).is_empty());
    assert!(!commands
        .iter()
        .any(|c| matches!(c, VcsCommand::GitTagAnnotated { .. })));
    assert!(!commands
        .iter()
        .any(|c| matches!(c, VcsCommand::GitListBranch { .. })));
}

#[test]
fn test_source_listing_failure_is_fatal() {
    let dir = bootstrapped_dir();
    let runner = scenario_runner().fail_on(
        |cmd| matches!(cmd, VcsCommand::SvnList { .. }),
        "svn: E170013: Unable to connect to a repository",
    );
    let orchestrator = SyncOrchestrator::new(&runner, config(), dir.path()).unwrap();

    let err = orchestrator.run(&SyncOptions::default()).unwrap_err();
    assert!(matches!(err, MirrorError::Command { .. }));
    assert!(!runner
        .commands()
        .iter()
        .any(|c| matches!(c, VcsCommand::GitTagList)));
}

#[test]
fn test_dry_run_only_plans() {
    let dir = bootstrapped_dir();
    let runner = scenario_runner();
    let orchestrator = SyncOrchestrator::new(&runner, config(), dir.path()).unwrap();

    let report = orchestrator
        .run(&SyncOptions {
            push: true,
            dry_run: true,
        })
        .unwrap();

    assert!(report.dry_run);
    assert!(report.mirrored.is_empty());
    assert!(!report.pushed);
    assert_eq!(report.edge, None);
    assert_eq!(report.candidates.len(), 2);
    assert_eq!(
        runner.commands(),
        vec![
            VcsCommand::SvnList {
                url: "http://svn.example.org/tags/".to_string()
            },
            VcsCommand::GitTagList,
        ]
    );
}

#[test]
fn test_dry_run_requires_bootstrapped_working_copy() {
    let dir = tempfile::tempdir().unwrap();
    let runner = scenario_runner();
    let orchestrator = SyncOrchestrator::new(&runner, config(), dir.path()).unwrap();

    let result = orchestrator.run(&SyncOptions {
        push: false,
        dry_run: true,
    });

    assert!(matches!(result, Err(MirrorError::Config(_))));
    assert!(runner.commands().is_empty());
}

#[test]
fn test_plan_without_floor() {
    let dir = bootstrapped_dir();
    let runner = scenario_runner();
    let mut config = config();
    config.sync.floor = None;
    let orchestrator = SyncOrchestrator::new(&runner, config, dir.path()).unwrap();

    let plan = orchestrator.plan().unwrap();

    assert_eq!(plan.source_versions.len(), 4);
    assert_eq!(plan.target_tags(), vec!["v1.2.9", "v1.4.0"]);
    assert_eq!(plan.excluded, vec![Version::with_qualifier(1, 3, 1, "RC1")]);
}

#[test]
fn test_invalid_config_is_rejected_before_any_command() {
    let runner = MockRunner::new();
    let mut config = config();
    config.target.edge_branch = "master".to_string();

    let result = SyncOrchestrator::new(&runner, config, Path::new("/tmp/unused"));
    assert!(result.is_err());
    assert!(runner.commands().is_empty());
}

#[test]
fn test_first_run_bootstraps_working_copy() {
    let root = tempfile::tempdir().unwrap();
    let workdir = root.path().join("mirror");
    let runner = MockRunner::new().with_source_tags(&["RELEASE_1_4_0"]);
    let orchestrator = SyncOrchestrator::new(&runner, config(), &workdir).unwrap();

    let report = orchestrator.run(&SyncOptions::default()).unwrap();

    let outcome = report.bootstrap.unwrap();
    assert!(outcome.created_directory);
    assert!(outcome.created_checkout);
    assert!(outcome.created_repository);

    assert_eq!(
        runner.commands()[0],
        VcsCommand::SvnCheckout {
            url: TRUNK_URL.to_string()
        }
    );
    let git = git2::Repository::open(&workdir).unwrap();
    assert_eq!(git.head().unwrap().shorthand(), Some("master"));
    assert_eq!(report.mirrored, vec!["v1.4.0".to_string()]);
}

#[test]
fn test_empty_qualifier_tag_switches_to_its_own_snapshot() {
    let dir = bootstrapped_dir();
    let runner = MockRunner::new()
        .with_source_tags(&["RELEASE_1_3_0", "RELEASE_1_3_0_"])
        .with_target_tags(&["v1.3.0"]);
    let orchestrator = SyncOrchestrator::new(&runner, config(), dir.path()).unwrap();

    let report = orchestrator.run(&SyncOptions::default()).unwrap();

    assert_eq!(report.candidates, vec![Version::with_qualifier(1, 3, 0, "")]);
    assert_eq!(report.mirrored, vec!["v1.3.0-".to_string()]);
    assert!(runner.commands().contains(&VcsCommand::SvnSwitch {
        url: "http://svn.example.org/tags/RELEASE_1_3_0_".to_string(),
    }));
}

#[test]
fn test_first_run_signs_initial_commit_with_configured_identity() {
    let root = tempfile::tempdir().unwrap();
    let workdir = root.path().join("mirror");
    let runner = MockRunner::new();
    let mut config = config();
    config.target.identity = Some(CommitIdentity {
        name: "Mirror Bot".to_string(),
        email: "mirror@example.org".to_string(),
    });
    let orchestrator = SyncOrchestrator::new(&runner, config, &workdir).unwrap();

    orchestrator.run(&SyncOptions::default()).unwrap();

    let git = git2::Repository::open(&workdir).unwrap();
    let commit = git.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(commit.author().name(), Some("Mirror Bot"));
    assert_eq!(commit.author().email(), Some("mirror@example.org"));
}
