use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::foundation::error::{BridgeError, BridgeResult};
use crate::model::request::ChartRequest;
use crate::render::engine::{RenderEngine, default_output_dir};
use crate::worker::cli::{WorkerArgs, parse_dims};
use crate::worker::protocol::{
    EXIT_OK, READY_LINE, RenderJob, SHUTDOWN_COMMAND, exit_code_for, failure_line, success_line,
};

/// Longest idle window honoured; larger values are clamped.
const MAX_IDLE: Duration = Duration::from_secs(7 * 24 * 3600);

/// Run the worker against the process stdin/stdout and return its exit code.
pub fn run(args: WorkerArgs) -> i32 {
    let input = std::io::BufReader::new(std::io::stdin());
    let mut out = std::io::stdout().lock();
    run_with_io(args, input, &mut out)
}

/// Run the worker with explicit streams. `input` is only read in preload mode.
pub fn run_with_io<R, W>(args: WorkerArgs, input: R, out: &mut W) -> i32
where
    R: BufRead + Send + 'static,
    W: Write,
{
    let output_dir = args.output_dir.clone().unwrap_or_else(default_output_dir);
    let mut engine = RenderEngine::new(output_dir).fast(args.fast);

    let result = if args.preload {
        serve(&args, &mut engine, input, out)
    } else {
        render_once(&args, &mut engine, out)
    };

    match result {
        Ok(()) => EXIT_OK,
        Err(e) => {
            tracing::error!(kind = %e.kind(), "{e}");
            exit_code_for(e.kind())
        }
    }
}

#[tracing::instrument(skip_all, fields(request = ?args.request))]
fn render_once<W: Write>(args: &WorkerArgs, engine: &mut RenderEngine, out: &mut W) -> BridgeResult<()> {
    let Some(path) = &args.request else {
        return Err(BridgeError::protocol(
            "no request file given; usage: chart-worker <request.json> [width height [dpi]] [--fast] | --preload",
        ));
    };
    let dims = parse_dims(&args.dims);
    let started = Instant::now();

    tracing::info!(path = %path.display(), "reading request");
    let req = ChartRequest::from_path(path)?;
    let output = engine.render(&req, dims.width, dims.height, dims.dpi)?;
    write_line(out, &success_line(&output.image_path))?;

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "chart generation completed"
    );
    Ok(())
}

#[tracing::instrument(skip_all, fields(idle_timeout = args.idle_timeout))]
fn serve<R, W>(args: &WorkerArgs, engine: &mut RenderEngine, input: R, out: &mut W) -> BridgeResult<()>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    let idle = Duration::from_secs(args.idle_timeout).min(MAX_IDLE);

    if let Err(e) = engine.warm_up() {
        tracing::warn!(error = %e, "warm-up render failed");
    }
    write_line(out, READY_LINE)?;

    let (tx, rx) = mpsc::channel::<String>();
    std::thread::Builder::new()
        .name("chart-worker-stdin".to_owned())
        .spawn(move || {
            for line in input.lines() {
                let Ok(line) = line else {
                    break;
                };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .map_err(|e| BridgeError::io(format!("spawn stdin reader: {e}")))?;

    let mut deadline = Instant::now() + idle;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            tracing::info!("idle window elapsed; exiting");
            return Ok(());
        }
        match rx.recv_timeout(remaining) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == SHUTDOWN_COMMAND {
                    tracing::info!("shutdown requested");
                    return Ok(());
                }
                let reply = match handle_job(engine, line) {
                    Ok(path) => success_line(&path),
                    Err(e) => {
                        tracing::warn!(kind = %e.kind(), error = %e, "job failed");
                        failure_line(&e)
                    }
                };
                write_line(out, &reply)?;
                deadline = Instant::now() + idle;
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                // No job can arrive any more; stay up until the idle window closes.
                tracing::info!("stdin closed; waiting out idle window");
                std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
                tracing::info!("idle window elapsed; exiting");
                return Ok(());
            }
        }
    }
}

fn handle_job(engine: &mut RenderEngine, line: &str) -> BridgeResult<PathBuf> {
    let job = RenderJob::parse_line(line)?;
    let req = ChartRequest::from_path(&job.request_path)?;
    let output = engine.render(&req, job.width, job.height, job.dpi)?;
    Ok(output.image_path)
}

fn write_line<W: Write>(out: &mut W, line: &str) -> BridgeResult<()> {
    writeln!(out, "{line}")
        .and_then(|()| out.flush())
        .map_err(|e| BridgeError::io(format!("write stdout: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/worker/run.rs"]
mod tests;
