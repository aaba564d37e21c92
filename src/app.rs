use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::{Table, presets::UTF8_FULL};
use log::info;

use crate::cli::{Args, Config};
use crate::pipeline;
use crate::storage::{self, BlobUploader};

pub async fn run(args: Args) -> Result<()> {
    let config = Config::from(args);

    print_job_details(&config);

    // The pipeline blocks on OS pipes and process exits, so it runs off
    // the async runtime; only the upload itself is async.
    let pipeline_config = config.clone();
    let payload = tokio::task::spawn_blocking(move || pipeline::run(&pipeline_config))
        .await
        .context("pipeline task panicked")??;
    info!("transcode produced {} bytes", payload.len());

    let uploader = BlobUploader::new(
        &config.azure_account,
        &config.azure_key,
        &config.azure_container,
    );
    let blob_name = storage::blob_name(Utc::now(), &config.audio.output_format);
    uploader.upload(&blob_name, payload).await?;

    info!("Blob successfully uploaded as {blob_name}");
    Ok(())
}

fn print_job_details(config: &Config) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Parameter", "Value"]);
    table
        .add_row(vec!["Stream URL", &config.rtmp_url])
        .add_row(vec!["Duration", &format!("{} s", config.rtmp_duration)])
        .add_row(vec!["Sample Rate", &config.audio.sample_rate])
        .add_row(vec!["Data Rate", &config.audio.data_rate])
        .add_row(vec!["Channels", &config.audio.channels])
        .add_row(vec!["Output Format", &config.audio.output_format])
        .add_row(vec!["Container", &config.azure_container]);

    println!("\n▶️ Job Details:");
    println!("{table}");
}
