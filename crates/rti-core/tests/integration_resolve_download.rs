//! Integration tests: resolution and download against a local HTTP server.
//!
//! Covers the three resolver branches end to end and the download manager's
//! idempotence and partial-transfer behavior.

mod common;

use common::image_server::{self, Route};
use rti_core::control::InterruptToken;
use rti_core::download::{self, DownloadOptions, Outcome};
use rti_core::resolve::{self, album, EmptyReason, Resolution};
use rti_core::retry::RetryPolicy;
use std::time::Duration;

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 1,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(1),
    }
}

fn options_into(dir: &std::path::Path) -> DownloadOptions {
    DownloadOptions {
        destination: Some(dir.to_string_lossy().into_owned()),
        long_names: false,
        retry: fast_retry(),
    }
}

#[test]
fn direct_extension_resolves_without_any_request() {
    let server = image_server::start(vec![]);
    let url = server.url("photo.jpg");

    let resolution = resolve::resolve(&url);

    assert_eq!(resolution, Resolution::Images(vec![url]));
    assert_eq!(server.total_requests(), 0);
}

#[test]
fn sniff_appends_the_declared_subtype() {
    let server = image_server::start(vec![(
        "/abc123.jpg",
        Route::new("image/png", Vec::new()),
    )]);

    let resolution = resolve::resolve(&server.url("abc123"));

    // The probe guessed ".jpg" but the declared type wins.
    assert_eq!(
        resolution,
        Resolution::Images(vec![server.url("abc123.png")])
    );
    assert_eq!(server.request_count("/abc123.jpg"), 1);
}

#[test]
fn sniff_rejects_non_image_content_types() {
    let server = image_server::start(vec![(
        "/page.jpg",
        Route::new("text/html", Vec::new()),
    )]);

    let resolution = resolve::resolve(&server.url("page"));

    assert_eq!(resolution, Resolution::Empty(EmptyReason::NotAnImage));
}

#[test]
fn sniff_failure_is_inconclusive_not_an_error() {
    let server = image_server::start(vec![]);

    let resolution = resolve::resolve(&server.url("missing"));

    assert!(matches!(
        resolution,
        Resolution::Empty(EmptyReason::SniffFailed(_))
    ));
}

#[test]
fn album_page_expands_in_document_order() {
    let html = r#"
        <html><body>
            <div class="post-image"><img src="//i.example.com/1.jpg"></div>
            <div class="post-image"><img alt="no src here"></div>
            <div class="post-image"><img src="//i.example.com/2.jpg"></div>
        </body></html>
    "#;
    let server = image_server::start(vec![("/a/xyz", Route::new("text/html", html))]);

    let resolution = album::expand(&server.url("a/xyz"));

    assert_eq!(
        resolution,
        Resolution::Images(vec![
            "https://i.example.com/1.jpg".to_string(),
            "https://i.example.com/2.jpg".to_string(),
        ])
    );
}

#[test]
fn album_without_matching_markup_is_empty() {
    let server = image_server::start(vec![(
        "/gallery/empty",
        Route::new("text/html", "<html><body><p>nothing here</p></body></html>"),
    )]);

    let resolution = album::expand(&server.url("gallery/empty"));

    assert_eq!(resolution, Resolution::Empty(EmptyReason::NoAlbumImages));
}

#[test]
fn download_is_idempotent_per_target() {
    let body = b"\x89PNG fake image bytes for the idempotence test".to_vec();
    let server = image_server::start(vec![
        ("/abc123.jpg", Route::new("image/png", Vec::new())),
        ("/abc123.png", Route::new("image/png", body.clone())),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let interrupt = InterruptToken::new();
    let opts = options_into(dir.path());

    // Resolve via sniffing, then download.
    let resolution = resolve::resolve(&server.url("abc123"));
    let image_url = match &resolution {
        Resolution::Images(urls) => urls[0].clone(),
        other => panic!("expected an image, got {other:?}"),
    };

    let first = download::download_image(&image_url, "pics", &opts, &interrupt, None).unwrap();
    let path = match first {
        Outcome::Downloaded { path, bytes } => {
            assert_eq!(bytes, body.len() as u64);
            path
        }
        other => panic!("expected Downloaded, got {other:?}"),
    };
    assert_eq!(path, dir.path().join("pics_abc123.png"));
    assert_eq!(std::fs::read(&path).unwrap(), body);
    assert!(!dir.path().join("pics_abc123.png.part").exists());
    assert_eq!(server.request_count("/abc123.png"), 1);

    // Second call: no additional fetch.
    let second = download::download_image(&image_url, "pics", &opts, &interrupt, None).unwrap();
    assert!(matches!(second, Outcome::AlreadyDownloaded { .. }));
    assert_eq!(server.request_count("/abc123.png"), 1);
}

#[test]
fn truncated_transfer_never_produces_a_final_file() {
    let server = image_server::start(vec![(
        "/img.png",
        Route::new("image/png", vec![7u8; 1000]).with_declared_length(4096),
    )]);
    let dir = tempfile::tempdir().unwrap();

    let result = download::download_image(
        &server.url("img.png"),
        "pics",
        &options_into(dir.path()),
        &InterruptToken::new(),
        None,
    );

    assert!(result.is_err());
    assert!(!dir.path().join("pics_img.png").exists());
}

#[test]
fn query_string_tails_are_sanitized_on_disk() {
    let server = image_server::start(vec![(
        "/img.png?tok=1&v=2",
        Route::new("image/png", b"bytes".to_vec()),
    )]);
    let dir = tempfile::tempdir().unwrap();

    let outcome = download::download_image(
        &server.url("img.png?tok=1&v=2"),
        "pics",
        &options_into(dir.path()),
        &InterruptToken::new(),
        None,
    )
    .unwrap();

    let path = match outcome {
        Outcome::Downloaded { path, .. } => path,
        other => panic!("expected Downloaded, got {other:?}"),
    };
    let name = path.file_name().unwrap().to_string_lossy();
    assert!(!name.contains('?'));
    assert!(!name.contains('&'));
}
