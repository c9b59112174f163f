/// Aura - audio-reactive particle visualizer
use aura_cli::{read_upload, Args, AuraConfig, Session, StopReason};
use aura_visualizer::available_modes;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aura=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if args.list_modes {
        println!("{}", serde_json::to_string_pretty(&available_modes())?);
        return Ok(());
    }

    let mut config = AuraConfig::load(args.config.as_deref())?;
    config.apply_args(&args);

    let upload = args.upload.as_deref().map(read_upload).transpose()?;
    config.validate(upload.is_some())?;

    let mut session = Session::build(&config)?;
    if let Some(volume) = args.volume {
        session.controller_mut().set_volume(volume);
    }

    tracing::info!(
        "Starting Aura: {} track(s), mode {}, {} fps",
        session.controller().playlist().len(),
        session.animator().mode(),
        config.display.fps
    );

    if !session.start(upload).await {
        anyhow::bail!("Could not start playback");
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Ctrl-C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let summary = session.run(shutdown, args.max_frames).await;

    tracing::info!(
        "Stopped after {} frames, {} track load(s)",
        summary.frames,
        summary.tracks_loaded
    );

    if summary.reason == StopReason::PlaybackStopped {
        anyhow::bail!("Playback stopped unexpectedly");
    }
    Ok(())
}
