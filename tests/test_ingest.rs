//! Ingestion from memory and disk sources

mod common;

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use card_intake::{DiskFile, ImageIngestor, IngestError, MAX_FILE_BYTES, MemoryFile, RawFile};
use common::fixtures;

/// Declares a size and records whether anyone tried to read it
struct Untouchable {
    len: u64,
    read: AtomicBool,
}

#[async_trait]
impl RawFile for Untouchable {
    fn byte_len(&self) -> u64 {
        self.len
    }

    fn mime_hint(&self) -> &str {
        "image/png"
    }

    async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        self.read.store(true, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

struct Broken;

#[async_trait]
impl RawFile for Broken {
    fn byte_len(&self) -> u64 {
        12
    }

    fn mime_hint(&self) -> &str {
        "image/jpeg"
    }

    async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "stream reset",
        ))
    }
}

#[tokio::test]
async fn test_oversize_is_rejected_before_reading() {
    let file = Untouchable {
        len: MAX_FILE_BYTES + 1,
        read: AtomicBool::new(false),
    };

    let err = ImageIngestor::new().ingest(&file).await.unwrap_err();

    assert!(matches!(
        err,
        IngestError::TooLarge { size, limit } if size == MAX_FILE_BYTES + 1 && limit == 5_242_880
    ));
    assert!(!file.read.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_read_failure_surfaces_source() {
    let err = ImageIngestor::new().ingest(&Broken).await.unwrap_err();
    match err {
        IngestError::Read { source, .. } => {
            assert_eq!(source.unwrap().kind(), std::io::ErrorKind::UnexpectedEof);
        }
        other => panic!("expected read error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bytes_survive_round_trip() {
    let bytes = fixtures::png_bytes(&fixtures::checkerboard_45());
    let file = MemoryFile::new("qr.png", "image/png", bytes.clone());

    let image = ImageIngestor::new().ingest(&file).await.unwrap();

    assert!(image.as_str().starts_with("data:image/png;base64,iVBORw0KGgo"));
    assert_eq!(image.mime(), Some("image/png"));
    assert_eq!(image.decode_payload().unwrap(), bytes);
}

#[tokio::test]
async fn test_missing_mime_falls_back() {
    let file = MemoryFile::new("blob", "", vec![1, 2, 3]);
    let image = ImageIngestor::new().ingest(&file).await.unwrap();
    assert_eq!(image.as_str(), "data:application/octet-stream;base64,AQID");
}

#[tokio::test]
async fn test_disk_file_reports_extension_mime() {
    let mut tmp = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    let bytes = fixtures::png_bytes(&fixtures::stripes(50));
    tmp.write_all(&bytes).unwrap();
    tmp.flush().unwrap();

    let file = DiskFile::open(tmp.path()).await.unwrap();
    assert_eq!(file.byte_len(), bytes.len() as u64);
    assert_eq!(file.mime_hint(), "image/png");

    let image = ImageIngestor::new().ingest(&file).await.unwrap();
    assert_eq!(image, fixtures::png_uri(&fixtures::stripes(50)));
}

#[tokio::test]
async fn test_disk_file_rejects_directories() {
    let dir = tempfile::tempdir().unwrap();
    let err = DiskFile::open(dir.path()).await.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_file_grown_after_open_is_too_large() {
    let mut tmp = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    tmp.write_all(&fixtures::png_bytes(&fixtures::stripes(50))).unwrap();
    let file = DiskFile::open(tmp.path()).await.unwrap();

    tmp.write_all(&vec![0u8; MAX_FILE_BYTES as usize]).unwrap();
    tmp.flush().unwrap();

    let err = ImageIngestor::new().ingest(&file).await.unwrap_err();
    assert!(matches!(
        err,
        IngestError::TooLarge { size, .. } if size == MAX_FILE_BYTES + 1
    ));
}
