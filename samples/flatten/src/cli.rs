use std::path::PathBuf;

use clap::ValueHint;
use time::macros::format_description;
use tracing_subscriber::{fmt::time::OffsetTime, EnvFilter};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

/// Element type of the collated index buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum IndexWidth {
    U16,
    U32,
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,collate=info,flatten=info",
        env = "FLATTEN_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
    /// Element type of the index buffer
    #[arg(
        short,
        long,
        value_enum,
        default_value_t = IndexWidth::U32,
        env = "FLATTEN_INDEX_WIDTH"
    )]
    pub index_width: IndexWidth,
    /// glTF files to collate
    #[arg(num_args = 1.., required = true, value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
}

/// Install a stderr subscriber with local timestamps, filtered by `cli.log_filter`.
pub(crate) fn init_logging(cli: &Cli) {
    let (offset, offset_err) = match time::UtcOffset::current_local_offset() {
        Ok(offset) => (offset, None),
        Err(e) => (time::UtcOffset::UTC, Some(e)),
    };
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(&cli.log_filter))
        .with_timer(OffsetTime::new(
            offset,
            format_description!("[hour]:[minute]:[second].[subsecond digits:3]"),
        ));

    match cli.log_format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Full => builder.init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }

    if let Some(e) = offset_err {
        tracing::warn!(%e, "local time offset unavailable; logging in UTC");
    }
}
