use clap::Parser;

/// Listens to an RTMP stream for a specified duration, encodes it to the
/// specified audio format and uploads the result to Azure Blob Storage.
#[derive(Parser, Debug)]
#[command(name = "rtmpsave", version, about)]
pub struct Args {
    /// Azure Blob Storage account name
    #[arg(long = "azureAccount", value_name = "ACCOUNT")]
    pub azure_account: String,

    /// Azure Blob Storage account key
    #[arg(long = "azureKey", value_name = "KEY")]
    pub azure_key: String,

    /// Azure Blob Storage container to upload the file into
    #[arg(long = "azureContainer", value_name = "CONTAINER")]
    pub azure_container: String,

    /// RTMP stream URL
    #[arg(long = "rtmpUrl", value_name = "URL")]
    pub rtmp_url: String,

    /// Duration to listen for the RTMP stream, in seconds
    #[arg(long = "rtmpDuration", value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub rtmp_duration: u64,

    /// Sample rate for the output audio (e.g. 48000)
    #[arg(long = "audioSampleRate", value_name = "RATE", default_value = "48000")]
    pub audio_sample_rate: String,

    /// Data rate for the output audio (e.g. 96k)
    #[arg(long = "audioDataRate", value_name = "RATE", default_value = "96k")]
    pub audio_data_rate: String,

    /// Channel count for the output audio (e.g. 2)
    #[arg(long = "audioChannels", value_name = "CHANNELS", default_value = "2")]
    pub audio_channels: String,

    /// Format for the output audio, as well as the blob name extension
    #[arg(long = "audioOutputFormat", value_name = "FORMAT", default_value = "mp3")]
    pub audio_output_format: String,

    /// Show rtmpdump/ffmpeg logs even when the tools succeed
    #[arg(short = 'g', long)]
    pub debug: bool,
}

/// Fully resolved run configuration. Built once from [`Args`] and passed
/// by reference from there on; nothing mutates it after startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub azure_account: String,
    pub azure_key: String,
    pub azure_container: String,
    pub rtmp_url: String,
    pub rtmp_duration: u64,
    pub audio: AudioParams,
    pub debug: bool,
}

/// Output audio parameters, kept as the string tokens ffmpeg receives.
/// Their semantic validation is ffmpeg's job, not ours.
#[derive(Debug, Clone)]
pub struct AudioParams {
    pub sample_rate: String,
    pub data_rate: String,
    pub channels: String,
    pub output_format: String,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            azure_account: args.azure_account,
            azure_key: args.azure_key,
            azure_container: args.azure_container,
            rtmp_url: args.rtmp_url,
            rtmp_duration: args.rtmp_duration,
            audio: AudioParams {
                sample_rate: args.audio_sample_rate,
                data_rate: args.audio_data_rate,
                channels: args.audio_channels,
                output_format: args.audio_output_format,
            },
            debug: args.debug,
        }
    }
}
