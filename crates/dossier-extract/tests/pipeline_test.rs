//! Pipeline behavior on real files, using only the built-in readers.

use std::path::Path;

use dossier_core::{is_sentinel, ExtractionMethod};
use dossier_extract::{ExtractionCapabilities, ExtractionFailure, ExtractionPipeline};

fn write(dir: &Path, name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}

#[tokio::test]
async fn plain_text_is_read_and_trimmed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "note.TXT", "\n  Rendez-vous avec le client  \n".as_bytes());

    let extraction = ExtractionPipeline::new(ExtractionCapabilities::none())
        .extract(&path)
        .await;

    assert_eq!(extraction.method, ExtractionMethod::NativeText);
    assert_eq!(extraction.into_stored_text(), "Rendez-vous avec le client");
}

#[tokio::test]
async fn latin1_text_is_decoded() {
    let dir = tempfile::tempdir().unwrap();
    // "Résilié" in ISO-8859-1
    let path = write(dir.path(), "ancien.txt", b"R\xe9sili\xe9");

    let extraction = ExtractionPipeline::new(ExtractionCapabilities::none())
        .extract(&path)
        .await;

    assert_eq!(extraction.into_stored_text(), "Résilié");
}

#[tokio::test]
async fn failures_are_stored_as_sentinels() {
    let dir = tempfile::tempdir().unwrap();
    let empty = write(dir.path(), "vide.txt", b"   ");
    let binary = write(dir.path(), "tableau.xlsx", b"PK\x03\x04\x00\x00\x00");
    let pdf = write(dir.path(), "scan.pdf", b"%PDF-1.7\n");

    let pipeline = ExtractionPipeline::new(ExtractionCapabilities::none());
    for path in [&empty, &binary, &pdf] {
        let extraction = pipeline.extract(path).await;
        assert!(!extraction.is_content(), "{}", path.display());
        assert_eq!(extraction.method, ExtractionMethod::Standard);
        let stored = extraction.into_stored_text();
        assert!(is_sentinel(&stored), "{}", stored);
    }
}

#[tokio::test]
async fn unknown_text_extension_is_decoded() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "export.csv", b"client;montant\nDurand;1200\n");

    let extraction = ExtractionPipeline::new(ExtractionCapabilities::none())
        .extract(&path)
        .await;

    assert_eq!(
        extraction.outcome,
        Ok("client;montant\nDurand;1200".to_string())
    );
}

#[tokio::test]
async fn scanned_image_without_tesseract_has_no_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "scan.tiff", b"II*\x00\x08\x00\x00\x00");

    let extraction = ExtractionPipeline::new(ExtractionCapabilities::none())
        .extract(&path)
        .await;

    assert_eq!(extraction.outcome, Err(ExtractionFailure::NoContent));
}

#[tokio::test]
async fn image_ocr_when_tesseract_is_installed() {
    let Ok(tesseract) = which::which("tesseract") else {
        eprintln!("Skipping test: tesseract not installed");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    // Not a decodable image: recognition must fail cleanly.
    let path = write(dir.path(), "corrompu.png", b"not an image");

    let caps = ExtractionCapabilities {
        tesseract: Some(tesseract),
        ..ExtractionCapabilities::none()
    };
    let extraction = ExtractionPipeline::new(caps).extract(&path).await;

    assert!(!extraction.is_content());
    assert!(is_sentinel(&extraction.into_stored_text()));
}

/// The PDF path driven end to end by stand-in poppler and tesseract
/// scripts, so the native-then-recognition rules run without the real tools.
#[cfg(unix)]
mod pdf_tools {
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::sync::{Mutex, MutexGuard};

    use dossier_core::ExtractionMethod;
    use dossier_extract::{ExtractionCapabilities, ExtractionFailure, ExtractionPipeline};

    // Writing a script while another test thread forks can leave it busy
    // ("text file busy"), so script setup and execution are serialized.
    static TOOLS: Mutex<()> = Mutex::new(());

    fn serialize() -> MutexGuard<'static, ()> {
        TOOLS.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Two pages; page 1 cannot be decoded, page 2 has a few words only.
    const SHORT_PAGES: &str = r#"case "$2" in 1) exit 1 ;; *) echo "short" ;; esac"#;

    /// Every page carries a full paragraph of text.
    const LONG_PAGES: &str = r#"echo "Le preneur s'engage a payer le loyer convenu chaque trimestre, a terme echu, au domicile du bailleur.""#;

    /// `pdftoppm -png -r DPI INPUT PREFIX` renders two pages.
    const TWO_IMAGES: &str = r#"touch "$5-1.png" "$5-2.png""#;

    const RECOGNIZE: &str = r#"echo "Texte reconnu $(basename "$1" .png)""#;

    struct Tools {
        pdfinfo: Option<&'static str>,
        pdftotext: Option<&'static str>,
        pdftoppm: Option<&'static str>,
        tesseract: Option<&'static str>,
    }

    async fn extract_pdf(tools: Tools) -> dossier_extract::Extraction {
        let _guard = serialize();
        let dir = tempfile::tempdir().unwrap();
        let bin = |name: &str, body: Option<&str>| body.map(|b| script(dir.path(), name, b));

        let caps = ExtractionCapabilities {
            pdfinfo: bin("pdfinfo", tools.pdfinfo),
            pdftotext: bin("pdftotext", tools.pdftotext),
            pdftoppm: bin("pdftoppm", tools.pdftoppm),
            tesseract: bin("tesseract", tools.tesseract),
            ..ExtractionCapabilities::none()
        };
        let pdf = dir.path().join("dossier.pdf");
        std::fs::write(&pdf, b"%PDF-1.4\n").unwrap();

        ExtractionPipeline::new(caps).extract(&pdf).await
    }

    const PAGES: Option<&str> = Some(r#"echo "Pages:          2""#);

    #[tokio::test]
    async fn failed_page_is_skipped_and_markers_kept() {
        let extraction = extract_pdf(Tools {
            pdfinfo: PAGES,
            pdftotext: Some(SHORT_PAGES),
            pdftoppm: None,
            tesseract: None,
        })
        .await;

        assert_eq!(extraction.outcome, Ok("--- Page 2 ---\nshort".to_string()));
        assert_eq!(extraction.method, ExtractionMethod::NativeText);
    }

    #[tokio::test]
    async fn short_native_text_is_replaced_by_recognition() {
        let extraction = extract_pdf(Tools {
            pdfinfo: PAGES,
            pdftotext: Some(SHORT_PAGES),
            pdftoppm: Some(TWO_IMAGES),
            tesseract: Some(RECOGNIZE),
        })
        .await;

        assert_eq!(extraction.method, ExtractionMethod::OpticalRecognition);
        let text = extraction.outcome.unwrap();
        assert!(text.starts_with("--- Page 1 (OCR) ---\nTexte reconnu"), "{}", text);
        assert!(text.contains("--- Page 2 (OCR) ---"), "{}", text);
        assert!(!text.contains("short"), "{}", text);
    }

    #[tokio::test]
    async fn long_native_text_skips_recognition() {
        let extraction = extract_pdf(Tools {
            pdfinfo: PAGES,
            pdftotext: Some(LONG_PAGES),
            pdftoppm: Some(TWO_IMAGES),
            tesseract: Some(RECOGNIZE),
        })
        .await;

        assert_eq!(extraction.method, ExtractionMethod::NativeText);
        let text = extraction.outcome.unwrap();
        assert!(text.starts_with("--- Page 1 ---\nLe preneur"), "{}", text);
        assert!(text.contains("--- Page 2 ---"), "{}", text);
        assert!(!text.contains("(OCR)"), "{}", text);
    }

    #[tokio::test]
    async fn native_text_kept_when_recognition_fails() {
        let extraction = extract_pdf(Tools {
            pdfinfo: PAGES,
            pdftotext: Some(SHORT_PAGES),
            pdftoppm: Some(TWO_IMAGES),
            tesseract: Some("exit 1"),
        })
        .await;

        assert_eq!(extraction.outcome, Ok("--- Page 2 ---\nshort".to_string()));
        assert_eq!(extraction.method, ExtractionMethod::NativeText);
    }

    #[tokio::test]
    async fn native_text_kept_when_recognition_is_empty() {
        let extraction = extract_pdf(Tools {
            pdfinfo: PAGES,
            pdftotext: Some(SHORT_PAGES),
            pdftoppm: Some(TWO_IMAGES),
            tesseract: Some("exit 0"),
        })
        .await;

        assert_eq!(extraction.outcome, Ok("--- Page 2 ---\nshort".to_string()));
        assert_eq!(extraction.method, ExtractionMethod::NativeText);
    }

    #[tokio::test]
    async fn recognition_runs_without_native_reader() {
        let extraction = extract_pdf(Tools {
            pdfinfo: None,
            pdftotext: None,
            pdftoppm: Some(TWO_IMAGES),
            tesseract: Some(RECOGNIZE),
        })
        .await;

        assert_eq!(extraction.method, ExtractionMethod::OpticalRecognition);
        assert!(extraction
            .outcome
            .unwrap()
            .starts_with("--- Page 1 (OCR) ---"));
    }

    #[tokio::test]
    async fn both_readers_failing_is_a_recognition_failure() {
        let extraction = extract_pdf(Tools {
            pdfinfo: Some("exit 1"),
            pdftotext: Some(SHORT_PAGES),
            pdftoppm: Some("exit 1"),
            tesseract: Some(RECOGNIZE),
        })
        .await;

        assert_eq!(extraction.method, ExtractionMethod::Standard);
        assert!(matches!(extraction.outcome, Err(ExtractionFailure::OcrFailed(_))));
        assert!(dossier_core::is_sentinel(&extraction.into_stored_text()));
    }
}
