use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::Path;
use std::process::Command;

pub fn run_python(source: &str, work_dir: &Path) -> Result<()> {
    let mut temp = tempfile::Builder::new()
        .suffix(".py")
        .tempfile_in(work_dir)
        .context("Failed to create temporary program file in the workspace directory.")?;
    temp.write_all(source.as_bytes())?;

    let output = Command::new("python")
        .current_dir(work_dir)
        .arg(temp.path())
        .output()
        .context("Failed to start `python`. Ensure it is on PATH or remove --run.")?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        bail!(
            "Generated program exited with an error.\n{}\n{}",
            stdout.trim(),
            stderr.trim()
        );
    }
    print!("{}", stdout);
    if !stderr.trim().is_empty() {
        eprint!("{}", stderr);
    }
    Ok(())
}
