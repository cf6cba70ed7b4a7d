//! Graph walk over real sources, manifests and install repositories.

use vend::config::DownloadFailurePolicy;
use vend::core::VendError;
use vend::manifest::FsManifestSource;
use vend::models::{VersionKind, VersionSelector};
use vend::resolver::DependencyWalker;
use vend::scanner::SourceImportScanner;
use vend::test_utils::{RecordingDownloader, TestProject, go_source};

#[tokio::test]
async fn test_target_subpackage_is_walked_not_cached() {
    let project = TestProject::new().unwrap();
    project.write_manifest("[target]\npath = \"example.com/app\"\n").unwrap();
    project.add_source("", &["example.com/app/util", "fmt"]).unwrap();
    project.add_source("util", &["example.com/lib/net", "strings"]).unwrap();
    project.add_package("example.com/lib/net", &["os"]).unwrap();

    let settings = project.settings();
    let downloader = RecordingDownloader::new();
    let cache = DependencyWalker::new(
        &FsManifestSource,
        &SourceImportScanner,
        &downloader,
        &settings,
        &project.project_dir,
        Some("example.com/app".to_string()),
    )
    .walk()
    .await
    .unwrap();

    assert_eq!(cache.import_paths().collect::<Vec<_>>(), ["example.com/lib/net"]);
    assert!(downloader.requests().is_empty());
}

#[tokio::test]
async fn test_shared_dependency_is_downloaded_once() {
    let project = TestProject::new().unwrap();
    project.add_source("", &["github.com/a/one", "github.com/b/two"]).unwrap();
    project.add_package("github.com/a/one", &["example.com/lib/net"]).unwrap();
    project.add_package("github.com/b/two", &["example.com/lib/net"]).unwrap();

    let settings = project.settings();
    let downloader = RecordingDownloader::new()
        .missing("example.com/lib/net")
        .serving("example.com/lib/net", "net.go", &go_source("net", &[]));

    let cache = DependencyWalker::new(
        &FsManifestSource,
        &SourceImportScanner,
        &downloader,
        &settings,
        &project.project_dir,
        None,
    )
    .walk()
    .await
    .unwrap();

    assert_eq!(cache.len(), 3);
    assert_eq!(
        cache.insertion_order(),
        ["example.com/lib/net", "github.com/a/one", "github.com/b/two"]
    );
    let requests = downloader.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].import_path, "example.com/lib/net");
}

#[tokio::test]
async fn test_project_pins_are_recorded_and_fetched_at_latest() {
    let project = TestProject::new().unwrap();
    project
        .write_manifest("[build]\n\"example.com/lib/net\" = \"tag:v1.2.0\"\n")
        .unwrap();
    project.add_source("", &["example.com/lib/net"]).unwrap();

    let settings = project.settings();
    let downloader = RecordingDownloader::new()
        .missing("example.com/lib/net")
        .serving("example.com/lib/net", "net.go", &go_source("net", &[]));

    let cache = DependencyWalker::new(
        &FsManifestSource,
        &SourceImportScanner,
        &downloader,
        &settings,
        &project.project_dir,
        None,
    )
    .walk()
    .await
    .unwrap();

    let pinned = VersionSelector::new(VersionKind::Tag, "v1.2.0");
    assert!(downloader.requests()[0].selector.is_latest());
    assert_eq!(cache.get("example.com/lib/net").unwrap().selector, pinned);
}

#[tokio::test]
async fn test_relative_imports_resolve_against_importer() {
    let project = TestProject::new().unwrap();
    project.add_source("", &["./internal/db"]).unwrap();
    project.add_source("internal/db", &["../log", "example.com/driver"]).unwrap();
    project.add_source("internal/log", &[]).unwrap();
    project.add_package("example.com/driver", &[]).unwrap();

    let settings = project.settings();
    let downloader = RecordingDownloader::new();
    let cache = DependencyWalker::new(
        &FsManifestSource,
        &SourceImportScanner,
        &downloader,
        &settings,
        &project.project_dir,
        None,
    )
    .walk()
    .await
    .unwrap();

    assert_eq!(cache.import_paths().collect::<Vec<_>>(), ["example.com/driver"]);
}

#[tokio::test]
async fn test_malformed_manifest_aborts_the_walk() {
    let project = TestProject::new().unwrap();
    project.write_manifest("[build\n").unwrap();
    project.add_source("", &["example.com/lib/net"]).unwrap();

    let settings = project.settings();
    let downloader = RecordingDownloader::new();
    let err = DependencyWalker::new(
        &FsManifestSource,
        &SourceImportScanner,
        &downloader,
        &settings,
        &project.project_dir,
        None,
    )
    .walk()
    .await
    .unwrap_err();

    assert!(err.chain().any(|e| matches!(
        e.downcast_ref::<VendError>(),
        Some(VendError::ManifestParseError { .. })
    )));
}

#[tokio::test]
async fn test_failed_download_under_abort_names_import_path() {
    let project = TestProject::new().unwrap();
    project.add_source("", &["github.com/a/one"]).unwrap();
    project.add_package("github.com/a/one", &["example.com/gone"]).unwrap();

    let mut settings = project.settings();
    settings.on_download_failure = DownloadFailurePolicy::Abort;
    let downloader =
        RecordingDownloader::new().missing("example.com/gone").failing("example.com/gone");

    let err = DependencyWalker::new(
        &FsManifestSource,
        &SourceImportScanner,
        &downloader,
        &settings,
        &project.project_dir,
        None,
    )
    .walk()
    .await
    .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("example.com/gone"));
    assert!(message.contains("github.com/a/one"));
}
