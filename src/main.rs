use anyhow::Result;
use card_intake::ShareTarget;
use card_intake::config::{IntakeConfig, SlotKind};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Run an image through a business-card upload slot:
/// - avatar: size-checked and encoded
/// - qr-code: additionally screened by the black/white plausibility check
#[derive(Parser, Debug)]
#[command(name = "intake")]
#[command(about = "Check an image the way a profile card upload slot would")]
#[command(long_about = "Check an image the way a profile card upload slot would.
Exits 0 when the slot accepts the image and 2 when it rejects it.")]
struct Args {
    /// Image file to ingest
    #[arg(help = "Path to the image file")]
    path: std::path::PathBuf,

    /// Slot kind
    #[arg(short, long, value_enum, default_value_t = SlotKind::Avatar,
          help = "avatar (any image) or qr-code (must look like a QR code)")]
    kind: SlotKind,

    /// Slot label
    #[arg(short, long, help = "Label used in logs and output (defaults to the kind)")]
    label: Option<String>,

    /// JSON output
    #[arg(long, help = "Print a JSON report instead of text")]
    json: bool,

    /// Share target
    #[arg(long, value_enum,
          help = "Also print share text for this platform once accepted")]
    share: Option<ShareTarget>,

    /// Link appended to the share text
    #[arg(long, default_value = "")]
    share_url: String,

    /// Profile name for share text
    #[arg(long, default_value = "")]
    name: String,

    /// Profile title for share text
    #[arg(long, default_value = "")]
    title: String,

    /// Profile description for share text
    #[arg(long, default_value = "")]
    description: String,

    /// Log filter
    #[arg(long, default_value = "warn", help = "tracing filter, e.g. debug or card_intake=debug")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let config = IntakeConfig {
        path: args.path,
        kind: args.kind,
        label: args.label,
        json: args.json,
        share: args.share,
        share_url: args.share_url,
        name: args.name,
        title: args.title,
        description: args.description,
        log_level: args.log_level,
    };

    let report = card_intake::run_intake(&config).await?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_accepted() {
        println!(
            "{}: accepted {} ({} bytes, {} byte data URI)",
            report.slot,
            report.mime.as_deref().unwrap_or("unknown"),
            report.bytes,
            report.encoded_len.unwrap_or_default()
        );
    } else {
        println!(
            "{}: {}",
            report.slot,
            report.error.as_deref().unwrap_or("rejected")
        );
    }
    if let Some(verdict) = report.verdict.filter(|_| !config.json) {
        println!(
            "  black {} / white {} (ratio {:.3})",
            verdict.black_pixel_count, verdict.white_pixel_count, verdict.ratio
        );
    }

    if !report.is_accepted() {
        std::process::exit(2);
    }

    if let Some(target) = config.share {
        let profile = config.share_profile()?;
        println!(
            "\n{}\n\n{}",
            target.share_text(&profile, &config.share_url),
            target.copy_prompt()
        );
    }

    Ok(())
}
