//! Plain-text output for scores and plans

use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::planner::EvictionPlan;
use crate::weight::ScoredCandidate;

/// Write one diagnostic line per candidate: path, age, size and weight
///
/// # Errors
/// Returns error if the writer fails.
pub fn write_scores<W: Write>(out: &mut W, ranked: &[ScoredCandidate]) -> Result<()> {
    for scored in ranked {
        let c = &scored.candidate;
        writeln!(
            out,
            "{} {} {}: weighted value = {}",
            c.path.display(),
            c.age,
            c.size,
            scored.weight
        )?;
    }
    Ok(())
}

/// Write one path per line, in plan order
///
/// Paths are written as their raw bytes so names that are not valid UTF-8
/// still reach the deletion agent unchanged.
///
/// # Errors
/// Returns error if the writer fails.
pub fn write_plan<W: Write>(out: &mut W, plan: &EvictionPlan) -> Result<()> {
    for path in plan.paths() {
        write_path(out, path)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(unix)]
fn write_path<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    use std::os::unix::ffi::OsStrExt;

    out.write_all(path.as_os_str().as_bytes())?;
    out.write_all(b"\n")
}

#[cfg(not(unix))]
fn write_path<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    writeln!(out, "{}", path.display())
}
