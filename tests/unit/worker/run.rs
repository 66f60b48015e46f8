use super::*;
use crate::worker::protocol::{EXIT_IO, EXIT_PROTOCOL, WorkerLine};
use clap::Parser;
use std::io::Cursor;

const REQUEST: &str = r#"{
    "title": "Worker",
    "series": [{"name": "A", "x_values": [0, 1, 2], "y_values": [1, 3, 2]}]
}"#;

fn args(argv: &[&str]) -> WorkerArgs {
    WorkerArgs::try_parse_from(std::iter::once("chart-worker").chain(argv.iter().copied())).unwrap()
}

fn lines(out: &[u8]) -> Vec<String> {
    String::from_utf8(out.to_vec())
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

fn no_input() -> Cursor<Vec<u8>> {
    Cursor::new(Vec::new())
}

#[test]
fn one_shot_prints_success_line_last() {
    let dir = tempfile::tempdir().unwrap();
    let req = dir.path().join("req.json");
    std::fs::write(&req, REQUEST).unwrap();
    let out_dir = dir.path().join("out");

    let mut out = Vec::new();
    let code = run_with_io(
        args(&[
            req.to_str().unwrap(),
            "320",
            "240",
            "72",
            "--output-dir",
            out_dir.to_str().unwrap(),
        ]),
        no_input(),
        &mut out,
    );
    assert_eq!(code, EXIT_OK);

    let lines = lines(&out);
    let last = lines.last().unwrap();
    let WorkerLine::Generated(path) = WorkerLine::classify(last) else {
        panic!("unexpected final line {last:?}");
    };
    assert!(path.starts_with(&out_dir));
    let img = image::open(&path).unwrap();
    assert_eq!((img.width(), img.height()), (320, 240));
}

#[test]
fn one_shot_malformed_request_exits_with_protocol_code() {
    let dir = tempfile::tempdir().unwrap();
    let req = dir.path().join("req.json");
    std::fs::write(&req, "{not json").unwrap();
    let out_dir = dir.path().join("out");

    let mut out = Vec::new();
    let code = run_with_io(
        args(&[req.to_str().unwrap(), "--output-dir", out_dir.to_str().unwrap()]),
        no_input(),
        &mut out,
    );
    assert_eq!(code, EXIT_PROTOCOL);
    assert!(out.is_empty());
    assert!(!out_dir.exists());
}

#[test]
fn one_shot_missing_file_is_io_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut out = Vec::new();
    let code = run_with_io(
        args(&[
            dir.path().join("absent.json").to_str().unwrap(),
            "--output-dir",
            dir.path().to_str().unwrap(),
        ]),
        no_input(),
        &mut out,
    );
    assert_eq!(code, EXIT_IO);
}

#[test]
fn missing_request_argument_is_usage_error() {
    let mut out = Vec::new();
    assert_eq!(run_with_io(args(&[]), no_input(), &mut out), EXIT_PROTOCOL);
}

#[test]
fn preload_serves_jobs_until_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let req = dir.path().join("req.json");
    std::fs::write(&req, REQUEST).unwrap();
    let job = RenderJob {
        request_path: req.clone(),
        width: 200,
        height: 150,
        dpi: 72,
    };
    let input = format!(
        "{}\n\nnot a job\n{}\nthis line is never read\n",
        job.to_line().unwrap(),
        SHUTDOWN_COMMAND
    );

    let mut out = Vec::new();
    let code = run_with_io(
        args(&[
            "--preload",
            "--idle-timeout",
            "30",
            "--output-dir",
            dir.path().join("out").to_str().unwrap(),
        ]),
        Cursor::new(input.into_bytes()),
        &mut out,
    );
    assert_eq!(code, EXIT_OK);

    let lines: Vec<WorkerLine> = lines(&out).iter().map(|l| WorkerLine::classify(l)).collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], WorkerLine::Ready);
    assert!(matches!(&lines[1], WorkerLine::Generated(p) if p.exists()));
    assert!(matches!(
        &lines[2],
        WorkerLine::Failed { kind: crate::foundation::error::ErrorKind::Protocol, .. }
    ));
}

/// Stdin that never delivers a line within the test's lifetime.
struct Silent;

impl std::io::Read for Silent {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        std::thread::sleep(Duration::from_secs(60));
        Ok(0)
    }
}

#[test]
fn preload_exits_after_idle_window() {
    let dir = tempfile::tempdir().unwrap();
    let mut out = Vec::new();
    let started = Instant::now();
    let code = run_with_io(
        args(&[
            "--preload",
            "--idle-timeout",
            "1",
            "--output-dir",
            dir.path().to_str().unwrap(),
        ]),
        std::io::BufReader::new(Silent),
        &mut out,
    );
    assert_eq!(code, EXIT_OK);
    assert_eq!(lines(&out), [READY_LINE]);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(30));
}

#[test]
fn preload_outlives_closed_stdin_until_idle_window() {
    let dir = tempfile::tempdir().unwrap();
    let mut out = Vec::new();
    let started = Instant::now();
    let code = run_with_io(
        args(&[
            "--preload",
            "--idle-timeout",
            "2",
            "--output-dir",
            dir.path().to_str().unwrap(),
        ]),
        no_input(),
        &mut out,
    );
    assert_eq!(code, EXIT_OK);
    assert_eq!(lines(&out), [READY_LINE]);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed < Duration::from_secs(30));
}
