use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Clone)]
pub struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count
    )]
    pub verbose: u8,

    /// Path to the YAML configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "CONFIG_PATH",
        default_value = "config.yaml"
    )]
    pub config_path: PathBuf,
}
