//! Tests for the remaining subcommands.

use super::parse;
use crate::cli::CliCommand;
use std::path::PathBuf;

#[test]
fn cli_parse_resolve() {
    match parse(&["rti", "resolve", "https://imgur.com/a/abc12"]) {
        CliCommand::Resolve { url } => assert_eq!(url, "https://imgur.com/a/abc12"),
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_parse_download_default_label() {
    match parse(&["rti", "download", "https://i.example.com/x.png"]) {
        CliCommand::Download {
            url,
            label,
            destination,
        } => {
            assert_eq!(url, "https://i.example.com/x.png");
            assert_eq!(label, "image");
            assert!(destination.is_none());
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn cli_parse_download_with_label_and_destination() {
    match parse(&[
        "rti",
        "download",
        "https://i.example.com/x.png",
        "--label",
        "pics",
        "-d",
        "/data/pics",
    ]) {
        CliCommand::Download {
            label, destination, ..
        } => {
            assert_eq!(label, "pics");
            assert_eq!(destination.as_deref(), Some("/data/pics"));
        }
        _ => panic!("expected Download with options"),
    }
}

#[test]
fn cli_parse_checksum() {
    match parse(&["rti", "checksum", "/tmp/pics_abc123.png"]) {
        CliCommand::Checksum { path } => {
            assert_eq!(path, PathBuf::from("/tmp/pics_abc123.png"));
        }
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["rti", "completions", "bash"]) {
        CliCommand::Completions { shell } => {
            assert_eq!(shell, clap_complete::Shell::Bash);
        }
        _ => panic!("expected Completions"),
    }
}
