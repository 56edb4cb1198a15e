//! Transcript exporter binary.
//!
//! Reads the guild-scope and channel-scope event logs for one channel and
//! writes a transcript to stdout, as plain text or an HTML fragment.
//!
//! Usage:
//!   scribe <GUILD_ID> <CHANNEL_ID> --format text
//!   scribe <GUILD_ID> <CHANNEL_ID> --format html > transcript.html

mod assets;
mod config;
mod telemetry;

use std::fs;
use std::io::{self, BufWriter, Cursor, Write};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use scribe_core::Snowflake;
use scribe_ingest::{ChannelAssembler, GuildDirectory};
use scribe_render::{HtmlRenderer, TextRenderer};

use crate::assets::DirAssetResolver;
use crate::config::ExportConfig;

/// Reconstruct a chat channel transcript from its event logs.
#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(about = "Reconstruct a chat channel transcript from its event logs")]
struct Args {
    /// Guild whose logs to read
    guild_id: Snowflake,

    /// Channel to export
    channel_id: Snowflake,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Export directory holding channels/, avatars/, attachments/
    #[arg(long)]
    data_dir: Option<std::path::PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    Html,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let args = Args::parse();
    let mut cfg = ExportConfig::load().context("loading configuration")?;
    if let Some(data_dir) = args.data_dir {
        cfg.data_dir = data_dir;
    }

    // both logs are read in full before any processing: a message may need
    // a member version recorded later in the guild file than its own time
    let guild_path = cfg
        .data_dir
        .join(format!("channels/{}/guild.tsv", args.guild_id));
    let guild_log = fs::read_to_string(&guild_path)
        .with_context(|| format!("reading guild log {}", guild_path.display()))?;

    let channel_path = cfg
        .data_dir
        .join(format!("channels/{}/{}.tsv", args.guild_id, args.channel_id));
    let channel_log = fs::read_to_string(&channel_path)
        .with_context(|| format!("reading channel log {}", channel_path.display()))?;

    let guild = GuildDirectory::from_reader(Cursor::new(guild_log))
        .context("ingesting guild log")?;
    let messages = ChannelAssembler::from_reader(Cursor::new(channel_log))
        .context("assembling channel log")?;
    info!(
        channel = %args.channel_id,
        messages = messages.len(),
        "channel reconstructed"
    );

    let resolver = DirAssetResolver::new(cfg.data_dir.clone());
    let stdout = io::stdout().lock();
    let mut out = BufWriter::new(stdout);

    match args.format {
        Format::Text => TextRenderer::new(cfg.cdn_base.clone())
            .render(&guild, args.channel_id, &messages, &resolver, &mut out)
            .context("rendering text transcript")?,
        Format::Html => HtmlRenderer::new()
            .render(&guild, args.channel_id, &messages, &resolver, &mut out)
            .context("rendering html transcript")?,
    }
    out.flush()?;
    Ok(())
}
