use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pyblocks-rs",
    about = "Generates Python source from saved block-editor workspaces (XML or JSON)."
)]
pub struct Args {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Treat the input as an XML workspace regardless of extension.")]
    pub xml: bool,

    #[arg(long, help = "Treat the input as a JSON workspace regardless of extension.")]
    pub json: bool,

    #[arg(
        long,
        value_name = "WIDTH",
        default_value_t = 4,
        help = "Spaces per indentation level in the generated Python."
    )]
    pub indent: usize,

    #[arg(long, help = "Run the generated program with the system `python`.")]
    pub run: bool,
}
