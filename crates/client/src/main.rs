mod app;
mod config;
mod demo;
mod transport;
mod tui;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use app::{App, Source};
use config::ClientConfig;
use tallgrass::{BuiltinDialogues, Session, SoundLengths, StaticTables};

#[derive(Parser)]
#[command(name = "tallgrass-client")]
#[command(about = "Tallgrass game client")]
struct Args {
    #[arg(short, long, help = "Server address to connect to (e.g., 127.0.0.1:27015)")]
    server: Option<String>,

    #[arg(long, help = "Play against the built-in scripted world instead of a server")]
    demo: bool,

    #[arg(long, help = "Run without the terminal UI and log frames instead")]
    headless: bool,

    #[arg(short, long, default_value_t = tallgrass::simulation::DEFAULT_TICK_RATE)]
    tick_rate: u32,

    #[arg(long, help = "Static game tables as JSON")]
    data: Option<PathBuf>,

    #[arg(long, help = "Stop after this many seconds")]
    duration: Option<f64>,
}

fn load_tables(path: Option<&PathBuf>) -> anyhow::Result<StaticTables> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            StaticTables::from_json(&json).with_context(|| format!("invalid tables in {}", path.display()))
        }
        None => Ok(demo::tables()),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.headless {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let mut config = ClientConfig {
        tick_rate: args.tick_rate,
        headless: args.headless,
        run_for_secs: args.duration,
        ..Default::default()
    };
    if let Some(server) = &args.server {
        config.server = Some(server.parse().with_context(|| format!("bad server address {server}"))?);
    }

    let tables = load_tables(args.data.as_ref())?;
    let session = Session::new(
        config.session(),
        Box::new(tables),
        Box::new(SoundLengths::default()),
        Box::new(BuiltinDialogues),
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let source = match (config.server, args.demo) {
            (Some(addr), false) => Source::Remote(transport::connect(addr).await?),
            (None, true) | (None, false) => Source::Demo(Box::default()),
            (Some(_), true) => anyhow::bail!("--server and --demo are exclusive"),
        };
        App::new(config, session, source)?.run().await
    })
}
