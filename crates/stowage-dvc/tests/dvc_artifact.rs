mod common;

use std::sync::Arc;

use common::{RecordingReference, backends, uri_resolver};
use stowage_core::{
    Artifact, ArtifactExt, Backends, Error, FileSystem, FsArtifact, LocalFileSystem,
    MemoryFileSystem, NoReferenceResolver,
};
use stowage_dvc::DvcArtifact;

#[test]
fn test_github_hosted_open_goes_through_reference_resolver() {
    let reference = Arc::new(RecordingReference::default());
    let artifact = DvcArtifact::new("github://O:R@a%2Bb/P", &backends(reference.clone()));

    let bytes = artifact.read_bytes().unwrap();
    assert_eq!(bytes, b"tracked bytes");

    let opened = reference.opened.lock().unwrap().clone();
    assert_eq!(
        opened,
        vec![(
            "P".to_string(),
            "https://github.com/O/R".to_string(),
            "a+b".to_string()
        )]
    );
    assert!(reference.was_released());

    // readable, but existence is not answerable through the reference resolver
    assert!(matches!(artifact.exists(), Err(Error::UnsupportedSource(_))));
}

#[test]
fn test_github_web_url_resolves_the_same_way() {
    let reference = Arc::new(RecordingReference::default());
    let artifact = DvcArtifact::new(
        "https://github.com/iterative/example/tree/main/data/data.xml",
        &backends(reference.clone()),
    );

    let stream = artifact.open().unwrap();
    assert_eq!(stream.uri(), artifact.uri());
    drop(stream);

    let opened = reference.opened.lock().unwrap().clone();
    assert_eq!(opened[0].0, "data/data.xml");
    assert_eq!(opened[0].1, "https://github.com/iterative/example");
    assert_eq!(opened[0].2, "main");
    assert!(reference.was_released());
}

#[test]
fn test_scope_failure_still_releases_stream() {
    let reference = Arc::new(RecordingReference::default());
    let artifact = DvcArtifact::new("github://O:R@main/P", &backends(reference.clone()));

    let result: stowage_core::Result<()> = artifact.with_stream(|stream| {
        let mut buf = [0u8; 2];
        std::io::Read::read_exact(stream, &mut buf)?;
        Err(Error::Other(anyhow::anyhow!("parser rejected payload")))
    });

    assert!(matches!(result, Err(Error::Other(_))));
    assert!(reference.was_released());
}

#[test]
fn test_reference_failure_propagates() {
    let reference = Arc::new(RecordingReference::failing());
    let artifact = DvcArtifact::new("github://O:R@gone/P", &backends(reference));

    let err = artifact.open().unwrap_err();
    assert!(matches!(err, Error::Reference(_)));
    assert!(err.is_io_failure());
}

#[test]
fn test_other_repository_kinds_fail_fast() {
    let reference = Arc::new(RecordingReference::default());
    let artifact = DvcArtifact::new("git:///src/project:main@data.csv", &backends(reference.clone()));

    assert!(matches!(artifact.open(), Err(Error::UnsupportedSource(_))));
    assert!(matches!(artifact.exists(), Err(Error::UnsupportedSource(_))));
    assert!(reference.opened.lock().unwrap().is_empty());
}

#[test]
fn test_absent_reference_resolver() {
    let backends = Backends::new(uri_resolver(), Arc::new(NoReferenceResolver));
    let artifact = DvcArtifact::new("github://O:R@main/P", &backends);

    assert!(matches!(artifact.open(), Err(Error::UnsupportedSource(_))));

    let dir = tempfile::tempdir().unwrap();
    let err = artifact.download(&dir.path().join("P")).unwrap_err();
    assert!(matches!(err, Error::UnsupportedSource(_)));
}

#[test]
fn test_download_delegates_to_get_url() {
    let reference = Arc::new(RecordingReference::default());
    let artifact = DvcArtifact::new("data/model.pkl", &backends(reference.clone()));

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("model.pkl");
    let local = artifact.download(&target).unwrap();

    assert_eq!(local.path(), target);
    assert_eq!(local.read_bytes().unwrap(), b"fetched bytes");
    assert_eq!(
        reference.fetched.lock().unwrap().clone(),
        vec!["data/model.pkl".to_string()]
    );
}

#[test]
fn test_download_into_directory_names_the_file() {
    let reference = Arc::new(RecordingReference::default());
    let artifact = DvcArtifact::new("data/model.pkl", &backends(reference));

    let dir = tempfile::tempdir().unwrap();
    let local = artifact.download(dir.path()).unwrap();

    assert_eq!(local.path(), dir.path().join("model.pkl"));
    assert!(local.path().is_file());
    assert_eq!(local.read_bytes().unwrap(), b"fetched bytes");
}

#[test]
fn test_failed_download_leaves_no_artifact() {
    let reference = Arc::new(RecordingReference::failing());
    let artifact = DvcArtifact::new("data/model.pkl", &backends(reference));

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("model.pkl");
    assert!(artifact.download(&target).is_err());
    assert!(!target.exists());
}

#[test]
fn test_relative_on_local_fs_keeps_dvc_kind() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("meta")).unwrap();
    std::fs::write(dir.path().join("meta/model.pkl"), b"pickled").unwrap();

    let reference = Arc::new(RecordingReference::default());
    let artifact = DvcArtifact::new("model.pkl", &backends(reference));

    let local: Arc<dyn FileSystem> = Arc::new(LocalFileSystem);
    let base = dir.path().join("meta");
    let relocated = artifact.relative(&local, &base.to_string_lossy());
    assert_eq!(relocated.kind(), DvcArtifact::KIND);
    assert_eq!(
        relocated.uri(),
        base.join("model.pkl").to_string_lossy()
    );
    assert_eq!(relocated.read_bytes().unwrap(), b"pickled");
}

#[test]
fn test_relative_on_remote_fs_passes_through() {
    // the resolver below knows nothing about this filesystem
    let memory = Arc::new(MemoryFileSystem::new());
    memory.insert("bucket/model.pkl", "remote weights").unwrap();
    let fs: Arc<dyn FileSystem> = memory;

    let artifact = DvcArtifact::new("model.pkl", &Backends::local());
    let relocated = artifact.relative(&fs, "bucket");

    assert_eq!(relocated.kind(), FsArtifact::KIND);
    assert_eq!(relocated.uri(), "memory://bucket/model.pkl");
    assert_eq!(relocated.read_bytes().unwrap(), b"remote weights");
}

#[test]
fn test_remote_non_repository_opens_directly() {
    let reference = Arc::new(RecordingReference::default());
    let resolver = uri_resolver();
    resolver.memory().insert("bucket/x.bin", "direct").unwrap();
    let backends = Backends::new(resolver, reference.clone());

    let artifact = DvcArtifact::new("memory://bucket/x.bin", &backends);
    assert!(artifact.exists().unwrap());
    assert_eq!(artifact.read_bytes().unwrap(), b"direct");
    assert!(reference.opened.lock().unwrap().is_empty());
}
