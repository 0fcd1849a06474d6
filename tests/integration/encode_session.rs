#![cfg(unix)]

// EncodeSession driven against a stub encoder binary

use crate::common;
use ffpress::engine::EncodeSession;
use tempfile::TempDir;

#[test]
fn test_encode_session_streams_frames_then_exit_status() {
    let tmp = TempDir::new().unwrap();
    let ffmpeg = common::fake_ffmpeg(tmp.path());
    let input = tmp.path().join("clip.mp4");
    let output = tmp.path().join("clip_compressed.mp4");
    std::fs::write(&input, b"source").unwrap();

    let session = EncodeSession::new(&ffmpeg);
    let mut frames = Vec::new();
    let status = session
        .run(&input, &output, 20, |frame| frames.push(frame))
        .unwrap();

    assert!(status.success());
    assert_eq!(frames, vec![10, 60, 100]);
    assert!(output.exists());
}

#[test]
fn test_encode_session_reports_non_zero_exit() {
    let tmp = TempDir::new().unwrap();
    let ffmpeg = common::fake_ffmpeg(tmp.path());
    let input = tmp.path().join("bad.mp4");
    let output = tmp.path().join("bad_compressed.mp4");
    std::fs::write(&input, b"source").unwrap();

    let session = EncodeSession::new(&ffmpeg);
    let mut frames = Vec::new();
    let status = session
        .run(&input, &output, 20, |frame| frames.push(frame))
        .unwrap();

    assert!(!status.success());
    assert!(frames.is_empty());
    assert!(!output.exists(), "no output file on encoder failure");
}

#[test]
fn test_encode_session_spawn_failure_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let session = EncodeSession::new(tmp.path().join("missing-ffmpeg"));
    let result = session.run(
        &tmp.path().join("in.mp4"),
        &tmp.path().join("out.mp4"),
        20,
        |_| {},
    );
    assert!(result.is_err());
}
