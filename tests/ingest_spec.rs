use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use uuid::Uuid;

use coursepack::ingest::*;
use coursepack::models::*;
use coursepack::rules::RuleEngine;
use coursepack::store::{MemoryStore, PackageStore};
use coursepack::PackageProcessor;
use speculate2::speculate;

const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest identifier="safety-101" version="1.0"
    xmlns="http://www.imsproject.org/xsd/imscp_rootv1p1p2"
    xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_rootv1p2">
  <metadata><schema>ADL SCORM</schema><schemaversion>1.2</schemaversion></metadata>
  <organizations default="ORG">
    <organization identifier="ORG">
      <title>Ladder Safety Quiz</title>
      <item identifier="ITEM" identifierref="RES"><title>Final check</title></item>
    </organization>
  </organizations>
  <resources>
    <resource identifier="RES" type="webcontent" adlcp:scormtype="sco" href="quiz/index.html"/>
  </resources>
</manifest>"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn ingestor(sample_bytes: usize) -> Ingestor<DirectoryLister, FsDescriptorSource> {
    Ingestor::new(
        Arc::new(PackageProcessor::default()),
        DirectoryLister::new(sample_bytes, vec!["xml".into(), "html".into(), "json".into()]),
        FsDescriptorSource,
    )
}

/// Lists a fixed set of files after a delay, counting calls.
struct SlowLister {
    files: Vec<FileEntry>,
    calls: AtomicUsize,
}

impl FileLister for SlowLister {
    async fn list(&self, _root: &Path) -> Result<Vec<FileEntry>, IngestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(self.files.clone())
    }
}

struct NotFoundSource;

impl DescriptorSource for NotFoundSource {
    async fn fetch(&self, location: &str) -> Result<String, IngestError> {
        Err(IngestError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            url: location.to_string(),
        })
    }
}

/// Rejects writes for paths containing "reject".
#[derive(Default)]
struct PickyStore {
    inner: MemoryStore,
}

impl PackageStore for PickyStore {
    fn get_by_path(&self, source_path: &str) -> Result<Option<ProcessedPackage>> {
        self.inner.get_by_path(source_path)
    }

    fn get_by_id(&self, id: Uuid) -> Result<Option<ProcessedPackage>> {
        self.inner.get_by_id(id)
    }

    fn put(&self, package: &ProcessedPackage) -> Result<()> {
        if package.source_path.contains("reject") {
            anyhow::bail!("disk full");
        }
        self.inner.put(package)
    }

    fn list(&self) -> Result<Vec<ProcessedPackage>> {
        self.inner.list()
    }

    fn clear(&self) -> Result<usize> {
        self.inner.clear()
    }
}

#[tokio::test]
async fn classifies_an_extracted_scorm_directory() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "imsmanifest.xml", MANIFEST);
    write(dir.path(), "quiz/index.html", "<html><body>Question 1</body></html>");

    // The sample is far shorter than the manifest; it must be re-read in full.
    let ingestor = ingestor(32);
    let location = dir.path().to_string_lossy().into_owned();
    let package = ingestor.ingest(&location).await.unwrap();

    assert_eq!(package.family, Some(PackageFamily::Scorm));
    assert_eq!(package.status, PackageStatus::Ready);
    assert_eq!(package.name, "Ladder Safety Quiz");
    assert_eq!(package.template_type, TemplateId::Mcq);
    assert_eq!(package.descriptor.id, "safety-101");
}

#[tokio::test]
async fn archives_are_classified_by_name_only() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "deck.pptx", "PK");
    write(dir.path(), "bundle.zip", "PK");

    let ingestor = ingestor(4096);

    let deck = ingestor
        .ingest(&dir.path().join("deck.pptx").to_string_lossy())
        .await
        .unwrap();
    assert!(deck.detection.is_none());
    assert_eq!(deck.family, Some(PackageFamily::Presentation));
    assert_eq!(deck.status, PackageStatus::Ready);
    assert_eq!(deck.template_type, TemplateId::Contentreveal);

    let bundle = ingestor
        .ingest(&dir.path().join("bundle.zip").to_string_lossy())
        .await
        .unwrap();
    assert_eq!(bundle.family, None);
    assert_eq!(bundle.name, "Bundle");
}

#[tokio::test]
async fn reads_a_descriptor_file_directly() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "imsmanifest.xml", MANIFEST);

    let package = ingestor(4096)
        .ingest(&dir.path().join("imsmanifest.xml").to_string_lossy())
        .await
        .unwrap();
    assert_eq!(package.family, Some(PackageFamily::Scorm));
    assert_eq!(package.status, PackageStatus::Ready);
    assert_eq!(package.template_type, TemplateId::Mcq);
}

#[tokio::test]
async fn unreadable_paths_degrade_instead_of_failing() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("never-uploaded");

    let package = ingestor(4096).ingest(&missing.to_string_lossy()).await.unwrap();
    assert_eq!(package.status, PackageStatus::Degraded);
    assert!(package.descriptor.is_synthetic());
    assert_eq!(package.template_type, TemplateId::Contentreveal);
}

#[tokio::test]
async fn failed_remote_fetch_degrades() {
    let ingestor = Ingestor::new(
        Arc::new(PackageProcessor::default()),
        DirectoryLister::new(0, Vec::new()),
        NotFoundSource,
    );

    let package = ingestor
        .ingest("https://lms.local/courses/9/imsmanifest.xml")
        .await
        .unwrap();
    assert_eq!(package.family, Some(PackageFamily::Scorm));
    assert_eq!(package.status, PackageStatus::Degraded);
}

#[tokio::test]
async fn concurrent_ingests_share_one_run() {
    let lister = SlowLister {
        files: vec![FileEntry::new("h5p.json"), FileEntry::new("content/content.json")],
        calls: AtomicUsize::new(0),
    };
    let ingestor = Ingestor::new(Arc::new(PackageProcessor::default()), lister, NotFoundSource);

    let (a, b) = tokio::join!(ingestor.ingest("uploads/cards"), ingestor.ingest("uploads/cards"));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.id, b.id);
    assert_eq!(a.family, Some(PackageFamily::H5p));
    assert_eq!(ingestor.processor().store().list().unwrap().len(), 1);

    let again = ingestor.ingest("uploads/cards").await.unwrap();
    assert_eq!(again.id, a.id);
}

#[tokio::test]
async fn interactions_drive_synthetic_packages() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "index.html", "<html></html>");

    let model = InteractionModel {
        interactions: vec![
            Interaction::new("1", "multiple-choice"),
            Interaction::new("2", "true_false"),
            Interaction::new("3", "drag-and-drop"),
        ],
        slides: Vec::new(),
    };
    let package = ingestor(4096)
        .ingest_with(&dir.path().to_string_lossy(), Some(model))
        .await
        .unwrap();

    assert_eq!(package.family, Some(PackageFamily::Web));
    assert_eq!(package.template_type, TemplateId::Mcq);
    assert_eq!(package.recommendation.confidence, 83);
}

#[tokio::test]
async fn batch_records_store_failures_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "ok/index.html", "<html></html>");
    write(dir.path(), "reject/index.html", "<html></html>");

    let processor = PackageProcessor::with_store(RuleEngine::default(), PickyStore::default());
    let ingestor = Ingestor::new(
        Arc::new(processor),
        DirectoryLister::new(4096, vec!["html".into()]),
        FsDescriptorSource,
    );

    let ok = dir.path().join("ok").to_string_lossy().into_owned();
    let reject = dir.path().join("reject").to_string_lossy().into_owned();
    let report = ingestor.ingest_batch([&reject, &ok]).await;

    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.processed[0].source_path, ok);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source_path, reject);
    assert!(report.failures[0].error.contains("disk full"));
}

speculate! {
    describe "directory lister" {
        before {
            let dir = tempfile::tempdir().unwrap();
            let lister = DirectoryLister::new(4096, vec!["html".into()]);
        }

        it "lists nested files with forward-slash relative paths" {
            write(dir.path(), "content/player.html", "<script src=\"captivate.js\"></script>");
            write(dir.path(), "content/media/intro.mp4", "binary");

            let files = tokio_test::block_on(lister.list(dir.path())).unwrap();
            let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
            assert_eq!(paths, vec!["content/media/intro.mp4", "content/player.html"]);
            assert_eq!(files[0].name, "intro.mp4");
        }

        it "samples only configured text files" {
            write(dir.path(), "content/player.html", "<script src=\"captivate.js\"></script>");
            write(dir.path(), "content/intro.mp4", "captivate");

            let files = tokio_test::block_on(lister.list(dir.path())).unwrap();
            assert!(files[0].content.is_none());
            assert!(files[1].content.as_deref().unwrap().contains("captivate"));

            let detection = RuleEngine::default().detect(&files).unwrap();
            assert_eq!(detection.family, PackageFamily::Captivate);
        }

        it "truncates samples to the configured size" {
            write(dir.path(), "index.html", &"x".repeat(100));
            let short = DirectoryLister::new(10, vec!["html".into()]);

            let files = tokio_test::block_on(short.list(dir.path())).unwrap();
            assert_eq!(files[0].content.as_deref(), Some("xxxxxxxxxx"));
        }

        it "returns an empty listing for an archive" {
            write(dir.path(), "course.zip", "PK");
            let files = tokio_test::block_on(lister.list(&dir.path().join("course.zip"))).unwrap();
            assert!(files.is_empty());
        }

        it "lists a single loose file" {
            write(dir.path(), "story.html", "<html>storyline</html>");
            let files = tokio_test::block_on(lister.list(&dir.path().join("story.html"))).unwrap();
            assert_eq!(files.len(), 1);
            assert_eq!(files[0].path, "story.html");
        }

        it "fails on a missing root" {
            let err = tokio_test::block_on(lister.list(&dir.path().join("missing"))).unwrap_err();
            assert!(matches!(err, IngestError::Io { .. }));
        }
    }
}
