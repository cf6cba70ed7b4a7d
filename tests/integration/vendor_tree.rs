//! Vendor tree layout produced by the resolve + vendor pipeline.

use std::fs;
use std::path::PathBuf;
use vend::build::Orchestrator;
use vend::manifest::FsManifestSource;
use vend::scanner::SourceImportScanner;
use vend::test_utils::{RecordingDownloader, TestProject};
use walkdir::WalkDir;

// Every symlink under the vendor source root, relative to it, with its target.
fn links(project: &TestProject) -> Vec<(PathBuf, PathBuf)> {
    let root = project.project_dir.join("vendor").join("src");
    WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| e.path_is_symlink())
        .map(|e| {
            (e.path().strip_prefix(&root).unwrap().to_path_buf(), fs::read_link(e.path()).unwrap())
        })
        .collect()
}

async fn vendor(project: &TestProject) -> vend::build::Prepared {
    let settings = project.settings();
    let downloader = RecordingDownloader::new();
    Orchestrator::new(
        &settings,
        &FsManifestSource,
        &SourceImportScanner,
        &downloader,
        &project.project_dir,
    )
    .vendor()
    .await
    .unwrap()
}

#[cfg(unix)]
#[tokio::test]
async fn test_target_and_dependency_links() {
    let project = TestProject::new().unwrap();
    project.write_manifest("[target]\npath = \"example.com/app\"\n").unwrap();
    project.add_source("", &["example.com/app/util"]).unwrap();
    project.add_source("util", &["example.com/lib/net"]).unwrap();
    project.add_package("example.com/lib/net", &[]).unwrap();

    let prepared = vendor(&project).await;

    assert_eq!(prepared.report.linked, ["example.com/lib/net"]);
    assert_eq!(
        links(&project),
        [
            (PathBuf::from("example.com/app"), project.project_dir.clone()),
            (PathBuf::from("example.com/lib/net"), project.install_repo.join("example.com/lib/net")),
        ]
    );
    // The subpackage is reachable through the project link only
    assert!(project.vendored("example.com/app/util").join("util.go").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_nested_dependencies_link_the_ancestor_only() {
    let project = TestProject::new().unwrap();
    project.add_source("", &["example.com/a/b", "example.com/a/b/c"]).unwrap();
    project.add_package("example.com/a/b", &[]).unwrap();
    project.add_package("example.com/a/b/c", &[]).unwrap();

    let prepared = vendor(&project).await;

    assert_eq!(prepared.report.linked, ["example.com/a/b"]);
    assert_eq!(prepared.report.ancestor_covered, ["example.com/a/b/c"]);
    assert_eq!(links(&project).len(), 1);
    assert!(project.vendored("example.com/a/b/c").join("c.go").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_repeated_vendoring_is_identical() {
    let project = TestProject::new().unwrap();
    project.write_manifest("[target]\npath = \"example.com/app\"\n").unwrap();
    project.add_source("", &["example.com/x", "github.com/u/y"]).unwrap();
    project.add_package("example.com/x", &["github.com/u/y"]).unwrap();
    project.add_package("github.com/u/y", &[]).unwrap();

    vendor(&project).await;
    let first = links(&project);
    vendor(&project).await;
    let second = links(&project);

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[tokio::test]
async fn test_stale_tree_is_replaced() {
    let project = TestProject::new().unwrap();
    project.add_source("", &[]).unwrap();
    let stale = project.vendored("example.com/old");
    fs::create_dir_all(&stale).unwrap();
    fs::write(stale.join("old.go"), "package old\n").unwrap();

    let prepared = vendor(&project).await;

    assert!(prepared.cache.is_empty());
    assert!(!stale.exists());
    assert!(project.project_dir.join("vendor").join("src").is_dir());
}
