use clap::{
    Parser,
    Subcommand,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Increase logging verbosity (can be repeated: -v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease logging verbosity (can be repeated: -q for warn, -qq for error)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Args {
    /// Log level used when RUST_LOG is not set.
    pub fn default_log_level(&self) -> &'static str {
        match self.verbose as i16 - self.quiet as i16 {
            i16::MIN..=-2 => "error",
            -1 => "warn",
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write template parameter and design files.
    WriteTemplate(WriteTemplateArgs),
    /// List the FASTA databases and spectra folders found in a working directory.
    Scan(ScanArgs),
    /// Build the search configuration and experimental design for a working directory.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
pub struct WriteTemplateArgs {
    /// The directory the templates are written to.
    #[arg(short, long)]
    pub output_path: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// The working directory to scan.
    #[arg(short, long)]
    pub work_dir: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// The working directory holding the FASTA files and spectra folders.
    #[arg(short, long)]
    pub work_dir: PathBuf,

    /// JSON file with search parameters (unset values keep their defaults).
    #[arg(short, long)]
    pub params: Option<PathBuf>,

    /// JSON file with the experimental design (unset values use placeholders).
    #[arg(short, long)]
    pub design: Option<PathBuf>,

    /// File name of the configuration written into the working directory.
    #[arg(short, long, default_value = "search_settings.json")]
    pub config_name: String,
}
