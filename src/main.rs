use anyhow::Result;
use clap::Parser;
use pyblocks_rs_core::cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    pyblocks_rs_core::run_cli(&args)
}
