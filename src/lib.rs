pub mod block;
pub mod emit;
pub mod workspace;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;

#[cfg(not(target_arch = "wasm32"))]
pub mod runner;

#[cfg(all(target_arch = "wasm32", feature = "wasm-bindings"))]
pub mod wasm;

use anyhow::Result;
use emit::EmitOptions;
use std::path::{Path, PathBuf};
use workspace::WorkspaceFormat;

#[cfg(not(target_arch = "wasm32"))]
pub fn run_cli(args: &cli::Args) -> Result<()> {
    if args.xml && args.json {
        anyhow::bail!("--xml and --json cannot be used together.");
    }
    let format = if args.xml {
        Some(WorkspaceFormat::Xml)
    } else if args.json {
        Some(WorkspaceFormat::Json)
    } else {
        None
    };
    let options = EmitOptions {
        indent_width: args.indent.max(1),
    };

    let total_stages = 3 + usize::from(args.output.is_some()) + usize::from(args.run);
    let progress = CliProgress::new("Generate", total_stages);
    let mut stage = 0usize;

    stage += 1;
    progress.emit(stage, "Resolving input path");
    let input = canonicalize_file(&args.input)?;

    stage += 1;
    progress.emit(stage, "Loading workspace");
    let loaded = workspace::load_workspace_file(&input, format)?;

    stage += 1;
    progress.emit(stage, "Generating Python");
    let source = emit::emit_workspace(&loaded, options);

    if let Some(output) = &args.output {
        stage += 1;
        progress.emit(stage, "Writing output");
        std::fs::write(output, source.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to write '{}': {}.", output.display(), e))?;
    } else if !args.run {
        print!("{}", source);
    }

    if args.run {
        stage += 1;
        progress.emit(stage, "Running program");
        let work_dir = input.parent().unwrap_or_else(|| Path::new("."));
        runner::run_python(&source, work_dir)?;
    }

    Ok(())
}

pub fn generate_from_file(
    path: &Path,
    format: Option<WorkspaceFormat>,
    options: EmitOptions,
) -> Result<String> {
    let input = canonicalize_file(path)?;
    let loaded = workspace::load_workspace_file(&input, format)?;
    Ok(emit::emit_workspace(&loaded, options))
}

pub fn generate_from_xml(source: &str) -> Result<String> {
    let loaded = workspace::parse_xml_workspace(source)?;
    Ok(emit::emit_workspace(&loaded, EmitOptions::default()))
}

pub fn generate_from_json(source: &str) -> Result<String> {
    let loaded = workspace::parse_json_workspace(source)?;
    Ok(emit::emit_workspace(&loaded, EmitOptions::default()))
}

pub fn canonicalize_file(path: &Path) -> Result<PathBuf> {
    if !path.exists() || !path.is_file() {
        return Err(anyhow::anyhow!(
            "Input file not found: '{}'.",
            path.display()
        ));
    }
    Ok(path.canonicalize()?)
}

#[cfg(not(target_arch = "wasm32"))]
struct CliProgress {
    prefix: &'static str,
    total: usize,
}

#[cfg(not(target_arch = "wasm32"))]
impl CliProgress {
    fn new(prefix: &'static str, total: usize) -> Self {
        Self {
            prefix,
            total: total.max(1),
        }
    }

    fn emit(&self, step: usize, label: &str) {
        let step = step.clamp(1, self.total);
        eprintln!(
            "[{}] {}... ({}/{}) {}",
            self.prefix,
            label,
            step,
            self.total,
            progress_bar(step, self.total, 14)
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn progress_bar(step: usize, total: usize, width: usize) -> String {
    let width = width.max(1);
    let filled = ((step * width) + (total / 2)) / total;
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    for i in 0..width {
        bar.push(if i < filled { '=' } else { '-' });
    }
    bar.push(']');
    bar
}
