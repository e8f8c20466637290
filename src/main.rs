use anyhow::{bail, Context, Result};
use clap::Parser;

use emuthrottle::clock::SystemClock;
use emuthrottle::display::{DummyDisplay, TermDisplay};
use emuthrottle::fps::{FixedFps, NTSC_HZ};
use emuthrottle::input::{DummyInput, KeyboardInput};
use emuthrottle::logging::{init_logging, LoggingConfig};
use emuthrottle::notify::{LogNotifier, Notifier, StatusLine};
use emuthrottle::session::Session;
use emuthrottle::{ThrottleConfig, ThrottleController};

#[derive(Parser)]
#[command(name = "emuthrottle", about = "Frame pacing demo: a fake core run at an adjustable speed")]
struct Cli {
    /// Native frame rate of the pretend core, in Hz.
    #[arg(long, default_value_t = NTSC_HZ)]
    hz: f64,
    /// Starting speed as a percentage of native.
    #[arg(long)]
    speed: Option<i32>,
    /// Stop after this many frames.
    #[arg(long)]
    frames: Option<u64>,
    /// Longest single sleep while waiting for a frame, in ms.
    #[arg(long, default_value_t = emuthrottle::throttle::DEFAULT_SLICE_MS)]
    slice_ms: u64,
    /// Run without the terminal UI; speed messages go to the log.
    #[arg(long)]
    headless: bool,
    /// Log filter (env_logger syntax); overrides RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

fn build_throttle<N: Notifier>(cli: &Cli, notifier: N) -> Result<ThrottleController<SystemClock, FixedFps, N>> {
    let config = ThrottleConfig {
        slice_ms: cli.slice_ms,
        ..ThrottleConfig::default()
    };
    let mut throttle = ThrottleController::with_config(SystemClock::new(), FixedFps::from_hz(cli.hz), notifier, config);
    log::debug!(
        "pacing {:.3}Hz in slices of at most {}ms",
        throttle.fps_source().hz(),
        throttle.config().slice_ms
    );
    if let Some(percent) = cli.speed {
        throttle
            .set_custom_speed(percent)
            .with_context(|| format!("bad --speed {}", percent))?;
    }
    Ok(throttle)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.hz <= 0.0 || !cli.hz.is_finite() {
        bail!("--hz must be a positive number, got {}", cli.hz);
    }
    if cli.slice_ms == 0 {
        bail!("--slice-ms must be at least 1");
    }

    // the terminal UI owns stdout; keep the log quiet unless asked
    let env_filter = match (&cli.log, cli.headless) {
        (Some(filter), _) => Some(filter.clone()),
        (None, false) if std::env::var("RUST_LOG").is_err() => Some("warn".to_string()),
        _ => None,
    };
    init_logging(LoggingConfig {
        env_filter,
        ..LoggingConfig::default()
    });

    let frames = if cli.headless {
        let throttle = build_throttle(&cli, LogNotifier::new())?;
        let mut session = Session::new(throttle, DummyInput::new(&[]), DummyDisplay::new());
        session.run(cli.frames)?
    } else {
        let throttle = build_throttle(&cli, StatusLine::new())?;
        let input = KeyboardInput::new().context("couldn't put the terminal in raw mode")?;
        let display = TermDisplay::new().context("couldn't start the terminal UI")?;
        let mut session = Session::new(throttle, input, display);
        let frames = session.run(cli.frames)?;
        drop(session);
        // leave the last frame of the panel alone
        println!();
        frames
    };

    log::info!("ran {} frames", frames);
    Ok(())
}
