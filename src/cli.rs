use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "echofetch")]
#[command(about = "Send typed GET and POST requests to an echo service", long_about = None)]
pub struct Cli {
    #[arg(
        short,
        long,
        global = true,
        help = "Path to the configuration file",
        default_value = "data/config.toml"
    )]
    pub config: PathBuf,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the loaded connection settings.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    #[arg(short = 'u', long, global = true, help = "The base URL of the echo service")]
    pub base_url: Option<String>,
    #[arg(short, long, global = true, help = "Request timeout in seconds")]
    pub timeout_secs: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct ParamArgs {
    #[arg(short = 'a', long, help = "Value for paramA", default_value = "valueA")]
    pub param_a: String,
    #[arg(short = 'b', long, help = "Value for paramB", default_value = "valueB")]
    pub param_b: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send the parameters as a query string to /get
    Get {
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Send the parameters as a JSON body to /post
    Post {
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Run GET and then POST with the same parameters
    Both {
        #[command(flatten)]
        params: ParamArgs,
    },
}
