mod app;
mod capture;
mod cli;
mod pipeline;
mod process;
mod storage;
mod transcode;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Both external tools must be on PATH before any argument is looked at.
    process::check_dependency("rtmpdump", "--help")?;
    process::check_dependency("ffmpeg", "-version")?;

    let args = cli::Args::parse();
    app::run(args).await
}
