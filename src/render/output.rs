use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::error::{BridgeError, BridgeResult};

static NONCE: AtomicU64 = AtomicU64::new(0);

/// Unique `chart_<pid>_<nonce>.png` path inside `dir`.
///
/// The nonce combines a per-process counter with the wall clock so paths do not repeat
/// across calls or process restarts that reuse a pid.
pub fn unique_chart_path(dir: &Path) -> PathBuf {
    let seq = NONCE.fetch_add(1, Ordering::Relaxed);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let nonce = (u64::from(nanos) << 20) ^ seq;
    dir.join(format!("chart_{}_{nonce:x}.png", std::process::id()))
}

/// Create `dir` (and parents) if absent.
pub fn ensure_dir(dir: &Path) -> BridgeResult<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| BridgeError::io(format!("create output dir '{}': {e}", dir.display())))
}

/// Encode straight-alpha RGBA8 as PNG at `path` without ever exposing a partial file there.
///
/// The image is written to a temporary sibling and renamed into place.
pub fn write_png_atomic(path: &Path, width: u32, height: u32, rgba: &[u8]) -> BridgeResult<()> {
    let expected = (width as usize) * (height as usize) * 4;
    if rgba.len() != expected {
        return Err(BridgeError::render(format!(
            "frame buffer holds {} bytes, expected {expected} for {width}x{height}",
            rgba.len()
        )));
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    ensure_dir(dir)?;

    let tmp = tempfile::Builder::new()
        .prefix(".chart-")
        .suffix(".png.part")
        .tempfile_in(dir)
        .map_err(|e| BridgeError::io(format!("create temp file in '{}': {e}", dir.display())))?;

    {
        let mut writer = std::io::BufWriter::new(tmp.as_file());
        image::write_buffer_with_format(
            &mut writer,
            rgba,
            width,
            height,
            image::ExtendedColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| BridgeError::io(format!("encode png '{}': {e}", path.display())))?;
        std::io::Write::flush(&mut writer)
            .map_err(|e| BridgeError::io(format!("write png '{}': {e}", path.display())))?;
    }

    tmp.persist(path)
        .map_err(|e| BridgeError::io(format!("persist png '{}': {}", path.display(), e.error)))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/output.rs"]
mod tests;
