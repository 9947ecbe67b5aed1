use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use eyre::{Result, bail};
use log::{debug, info};

mod cli;

use cli::{Cli, Command, OutputFormat, ThemeArg};
use ytview::client::{Backend, RelayClient, Viewer, describe_error};
use ytview::config::Config;
use ytview::history::{RecentVideos, Theme};
use ytview::store::{FileStore, store_path};
use ytview::youtube::{self, YouTube};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytview.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("ytview=info"))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytview")
        .join("logs")
}

fn build_after_help() -> String {
    format!(
        "\nLogs are written to: {}\nHistory is stored in: {}",
        log_dir().join("ytview.log").display(),
        store_path().display()
    )
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        // Missing or invalid default config is not fatal
        None => Config::load().unwrap_or_default(),
    };
    Ok(config.with_env())
}

async fn serve(config: Config, verbose: bool) -> Result<()> {
    let client = youtube::build_client(config.request_timeout())?;
    let app = ytview::http::create_router(Arc::new(ytview::http::AppState::new(client, &config)));

    if config.youtube_api_key.is_none() {
        info!("YOUTUBE_API_KEY not set; /api/video-info will fail");
    }

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on {addr}, serving {}", config.static_dir.display());
    if verbose {
        eprintln!("Server running on http://{addr}");
    }

    axum::serve(listener, app).await?;
    Ok(())
}

async fn fetch(
    config: &Config,
    url: Option<String>,
    relay: Option<String>,
    format: OutputFormat,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let client = youtube::build_client(config.request_timeout())?;
    let backend = match relay {
        Some(base) => {
            debug!("Using relay at {base}");
            Backend::Relay(RelayClient::new(client, &base))
        }
        None => Backend::Direct(YouTube::new(client, config.watch_url.clone())),
    };
    let viewer = Viewer::new(backend, FileStore::new(store_path()));

    // Collect URLs: from arg or stdin
    let urls = if let Some(url) = url {
        vec![url]
    } else {
        let stdin = io::stdin();
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    };

    if urls.iter().all(|u| u.trim().is_empty()) {
        bail!("no URL or video ID provided\n\nUsage: ytview fetch <URL>\n       echo <URL> | ytview fetch");
    }

    for url_input in urls.iter().map(|u| u.trim()).filter(|u| !u.is_empty()) {
        let view = match viewer.fetch(url_input).await {
            Ok(view) => view,
            Err(e) => bail!("{}", describe_error(&e).trim_end()),
        };

        if verbose {
            eprintln!(
                "Video: {}\nPlayer: {}\nEntries: {}",
                view.video_id,
                ytview::output::embed_url(&view.video_id, None),
                view.entries.len(),
            );
        }

        let rendered = match format {
            OutputFormat::Text => ytview::output::render_text(&view.entries),
            OutputFormat::Json => ytview::output::render_json(&view.entries),
            OutputFormat::Links => ytview::output::render_links(&view.video_id, &view.entries),
        };

        if let Some(ref path) = output {
            std::fs::write(path, &rendered)?;
            if verbose {
                eprintln!("Output written to: {}", path.display());
            }
        } else {
            println!("{}", rendered.trim_end());
        }
    }

    Ok(())
}

fn history(clear: bool) -> Result<()> {
    let store = FileStore::new(store_path());
    let recent = RecentVideos::new(&store);

    if clear {
        recent.clear()?;
        println!("Recent videos cleared");
        return Ok(());
    }

    let videos = recent.load();
    if videos.is_empty() {
        println!("No recent videos");
    } else {
        print!("{}", ytview::output::render_recent(&videos));
    }
    Ok(())
}

fn theme(value: Option<ThemeArg>) -> Result<()> {
    let store = FileStore::new(store_path());
    let current = Theme::load(&store);

    let next = match value {
        None => {
            println!("{current}");
            return Ok(());
        }
        Some(ThemeArg::Toggle) => current.toggled(),
        Some(ThemeArg::Light) => Theme::Light,
        Some(ThemeArg::Dark) => Theme::Dark,
    };
    next.save(&store)?;
    println!("{next}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    let config = load_config(&cli)?;
    if cli.verbose {
        eprintln!("Config: {}", cli.config.clone().unwrap_or_else(ytview::config::config_path).display());
    }

    match cli.command {
        Command::Serve { host, port, static_dir } => {
            serve(config.with_overrides(host, port, static_dir), cli.verbose).await
        }
        Command::Fetch {
            url,
            relay,
            format,
            output,
        } => fetch(&config, url, relay, format, output, cli.verbose).await,
        Command::History { clear } => history(clear),
        Command::Theme { value } => theme(value),
    }
}
