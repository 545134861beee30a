use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Clone, Debug, Parser)]
#[command(name = "splitfetch", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
/// Download a file over several concurrent HTTP range requests
pub struct App {
    /// URL of the resource to download
    pub url: String,

    /// Number of concurrent range requests
    #[arg(
        short = 'p',
        long = "parallel",
        env = "SPLITFETCH_PARALLEL",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub parallel: u64,

    /// Directory for the downloaded file
    #[arg(short = 'd', long = "dir", env = "SPLITFETCH_DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Extra request header, `Name: value`; may be repeated
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Do not draw a progress bar
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let Some((name, value)) = raw.split_once(':') else {
        return Err(format!("expected `Name: value`, got `{raw}`"));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err("header name is empty".into());
    }
    Ok((name.to_string(), value.trim().to_string()))
}
