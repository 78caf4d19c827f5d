//! End-to-end eviction run: load rules, scan, rank, plan, report

use std::io::Write;
use std::time::SystemTime;

use crate::config::EvictConfig;
use crate::crawler::Crawler;
use crate::error::Result;
use crate::manifest::VersionRules;
use crate::planner::{self, EvictionPlan};
use crate::report;
use crate::weight;

/// Run one eviction pass
///
/// Scoring lines go to `diagnostics`, the plan goes to `out`. The plan is
/// only written once it is complete, so a failure never leaves a partial
/// list of paths behind.
///
/// # Errors
/// Returns error if:
/// - The manifest cannot be read or parsed
/// - The root cannot be listed
/// - Writing to either output fails
pub fn run<D: Write, O: Write>(
    config: &EvictConfig,
    now: SystemTime,
    diagnostics: &mut D,
    out: &mut O,
) -> Result<EvictionPlan> {
    let rules = VersionRules::load(&config.manifest)?;
    let scan = Crawler::new(&config.root, &rules)?.scan(now)?;

    let total_size = scan.total_size;
    let ranked = weight::rank(scan);
    if config.show_scores {
        report::write_scores(diagnostics, &ranked)?;
    }

    let plan = planner::plan(&ranked, total_size, config.target_size);
    tracing::info!(
        archives = plan.archive_count(),
        paths = plan.entries.len(),
        reclaimed = plan.reclaimed(),
        remaining = plan.remaining_size,
        target = plan.target_size,
        "eviction planned"
    );
    if !plan.satisfied() {
        tracing::warn!(
            remaining = plan.remaining_size,
            target = plan.target_size,
            "target size unreachable even after evicting every candidate"
        );
    }

    report::write_plan(out, &plan)?;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};
    use std::path::Path;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::crawler::tests::create_archive;
    use crate::error::Error;

    fn write_manifest(dir: &Path, text: &str) -> std::path::PathBuf {
        let path = dir.join("current_versions.txt");
        File::create(&path).unwrap().write_all(text.as_bytes()).unwrap();
        path
    }

    fn config(root: &Path, manifest: std::path::PathBuf, target_size: u64) -> EvictConfig {
        EvictConfig { root: root.to_path_buf(), manifest, target_size, show_scores: true }
    }

    #[test]
    fn test_single_package_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("distfiles");
        let now = SystemTime::now();
        let age = Duration::from_secs(1000);

        create_archive(&root, "foo", "foo-1.0.tar", 500, age, now);
        let old = create_archive(&root, "foo", "foo-0.9.tar", 100, age, now);
        let old_sig = create_archive(&root, "foo", "foo-0.9.tar.rmd160", 20, age, now);
        let manifest = write_manifest(temp_dir.path(), "foo 1.0\n");

        let (mut diag, mut out) = (Vec::<u8>::new(), Vec::<u8>::new());
        let plan = run(&config(&root, manifest, 50), now, &mut diag, &mut out).unwrap();

        assert_eq!(plan.paths().collect::<Vec<_>>(), [old.as_path(), old_sig.as_path()]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{}\n{}\n", old.display(), old_sig.display())
        );

        let diag = String::from_utf8(diag).unwrap();
        assert_eq!(diag.lines().count(), 1);
        assert!(diag.starts_with(&format!("{} ", old.display())));
        assert!(diag.contains(" 100: weighted value = 100\n"));
        assert!(!diag.contains("foo-1.0.tar"));
    }

    #[test]
    fn test_under_target_deletes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("distfiles");
        let now = SystemTime::now();

        create_archive(&root, "bar", "bar-1.tar", 10, Duration::from_secs(5), now);
        create_archive(&root, "bar", "bar-2.tar", 10, Duration::from_secs(5), now);
        let manifest = write_manifest(temp_dir.path(), "bar 3\n");

        let (mut diag, mut out) = (Vec::<u8>::new(), Vec::<u8>::new());
        let plan = run(&config(&root, manifest, 20), now, &mut diag, &mut out).unwrap();

        assert!(plan.is_empty());
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(diag).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_oldest_largest_go_first_across_packages() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("distfiles");
        let now = SystemTime::now();
        let day = Duration::from_secs(86_400);

        let stale = create_archive(&root, "alpha", "alpha-1.tar", 900, day * 30, now);
        create_archive(&root, "alpha", "alpha-2.tar", 100, day, now);
        let bulky = create_archive(&root, "beta", "beta-1.tar", 1000, day * 10, now);
        create_archive(&root, "beta", "beta-2.tar", 50, day * 2, now);
        let manifest = write_manifest(temp_dir.path(), "alpha 3\nbeta 3\n");

        let (mut diag, mut out) = (Vec::<u8>::new(), Vec::<u8>::new());
        let plan = run(&config(&root, manifest, 500), now, &mut diag, &mut out).unwrap();

        assert_eq!(plan.paths().collect::<Vec<_>>(), [stale.as_path(), bulky.as_path()]);
        assert_eq!(plan.remaining_size, 150);
        assert!(plan.satisfied());
    }

    #[test]
    fn test_quiet_run_skips_scores() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("distfiles");
        let now = SystemTime::now();

        create_archive(&root, "foo", "foo-0.1.tar", 10, Duration::from_secs(60), now);
        let manifest = write_manifest(temp_dir.path(), "foo 1.0\n");

        let mut config = config(&root, manifest, 0);
        config.show_scores = false;

        let (mut diag, mut out) = (Vec::<u8>::new(), Vec::<u8>::new());
        run(&config, now, &mut diag, &mut out).unwrap();

        assert!(diag.is_empty());
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_rerun_gives_same_plan() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("distfiles");
        let now = SystemTime::now();

        for (i, pkg) in ["a", "b", "c", "d"].iter().enumerate() {
            let secs = u64::try_from(i + 1).unwrap() * 100;
            let age = Duration::from_secs(secs);
            create_archive(&root, pkg, &format!("{pkg}-0.tar"), 64, age, now);
            create_archive(&root, pkg, &format!("{pkg}-1.tar"), 64, age, now);
        }
        let manifest = write_manifest(temp_dir.path(), "a 9\n");
        let config = config(&root, manifest, 128);

        let mut first = Vec::<u8>::new();
        let mut second = Vec::<u8>::new();
        let plan_a = run(&config, now, &mut Vec::<u8>::new(), &mut first).unwrap();
        let plan_b = run(&config, now, &mut Vec::<u8>::new(), &mut second).unwrap();

        assert_eq!(plan_a, plan_b);
        assert_eq!(first, second);
        assert_eq!(plan_a.archive_count(), 6);
    }

    #[test]
    fn test_bad_manifest_emits_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("distfiles");
        fs::create_dir_all(root.join("foo")).unwrap();
        let manifest = write_manifest(temp_dir.path(), "foo\n");

        let (mut diag, mut out) = (Vec::<u8>::new(), Vec::<u8>::new());
        let result = run(&config(&root, manifest, 0), SystemTime::now(), &mut diag, &mut out);

        assert!(matches!(result, Err(Error::ManifestLine { line: 1, .. })));
        assert!(out.is_empty());
        assert!(diag.is_empty());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = write_manifest(temp_dir.path(), "foo 1.0\n");

        let result = run(
            &config(&temp_dir.path().join("missing"), manifest, 0),
            SystemTime::now(),
            &mut Vec::<u8>::new(),
            &mut Vec::<u8>::new(),
        );

        assert!(matches!(result, Err(Error::RootUnreadable { .. })));
    }
}
