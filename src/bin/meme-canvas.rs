use std::{net::SocketAddr, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use meme_canvas::{
    Canvas as _, Compositor, CompositorOptions, CpuCanvas, EMPTY_QUERY_MESSAGE, EditorSession,
    EffectFlags, FontLibrary, ImageSelection, LoadOutcome, MemeError, NO_RESULTS_MESSAGE,
    ProxyConfig, RenderConfig, Rgba8, SearchClient, UNSPLASH_API_BASE,
};

#[derive(Parser, Debug)]
#[command(name = "meme-canvas", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Caption an image and write it as a PNG.
    Render(RenderArgs),
    /// Run the photo search proxy.
    Serve(ServeArgs),
    /// Query a running search proxy and print the results.
    Search(SearchArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Local image file.
    #[arg(long, required_unless_present = "url", conflicts_with = "url")]
    image: Option<PathBuf>,

    /// Remote image URL or data URI.
    #[arg(long)]
    url: Option<String>,

    /// Top caption.
    #[arg(long, default_value = "")]
    top: String,

    /// Bottom caption.
    #[arg(long, default_value = "")]
    bottom: String,

    /// Font family.
    #[arg(long, default_value = "Impact")]
    font: String,

    /// Font size in pixels.
    #[arg(long, default_value_t = 40, value_parser = clap::value_parser!(u32).range(1..))]
    size: u32,

    /// Text fill color.
    #[arg(long, default_value = "#ffffff")]
    fill: Rgba8,

    /// Text outline color.
    #[arg(long, default_value = "#000000")]
    stroke: Rgba8,

    #[arg(long)]
    grayscale: bool,

    #[arg(long)]
    invert: bool,

    #[arg(long)]
    sepia: bool,

    /// Extra font directory, scanned before the system ones. Repeatable.
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Largest output width.
    #[arg(long, default_value_t = 800.0)]
    max_width: f64,

    /// Largest output height.
    #[arg(long, default_value_t = 800.0)]
    max_height: f64,

    /// Output PNG path. A directory gets `meme.png` appended.
    #[arg(long, default_value = meme_canvas::DEFAULT_FILE_NAME)]
    out: PathBuf,

    /// Also print the result as a `data:` URI on stdout.
    #[arg(long)]
    data_uri: bool,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8888")]
    bind: SocketAddr,

    /// Unsplash access key.
    #[arg(long, env = "UNSPLASH_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Upstream API origin.
    #[arg(long, default_value = UNSPLASH_API_BASE)]
    upstream: String,

    /// Results requested per search.
    #[arg(long, default_value_t = 20)]
    per_page: u32,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Search terms.
    #[arg(default_value = "")]
    query: String,

    /// Base URL of the proxy.
    #[arg(long, default_value = "http://127.0.0.1:8888")]
    proxy: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args).await,
        Command::Serve(args) => cmd_serve(args).await,
        Command::Search(args) => cmd_search(args).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut dirs = args.font_dirs.clone();
    dirs.extend(meme_canvas::default_font_dirs());
    let fonts = FontLibrary::load_dirs(&dirs);
    tracing::info!(families = fonts.len(), "fonts indexed");

    let compositor = Compositor::new(CompositorOptions {
        max_width: args.max_width,
        max_height: args.max_height,
    })?;
    let mut session = EditorSession::with_compositor(CpuCanvas::new(fonts), compositor);
    session.set_config(RenderConfig {
        font_family: args.font,
        font_size_px: args.size,
        fill: args.fill,
        stroke: args.stroke,
        effects: EffectFlags {
            grayscale: args.grayscale,
            invert: args.invert,
            sepia: args.sepia,
        },
        top_text: args.top,
        bottom_text: args.bottom,
    });

    let outcome = match (&args.image, &args.url) {
        (Some(path), _) => session.load_path(path),
        (None, Some(url)) => {
            let http = reqwest::Client::new();
            session.load_url(&http, url, ImageSelection::Upload).await
        }
        (None, None) => anyhow::bail!("pass --image or --url"),
    };
    let summary = match outcome {
        LoadOutcome::Loaded(summary) => summary,
        LoadOutcome::Failed(msg) => anyhow::bail!("{msg}"),
        LoadOutcome::Stale => anyhow::bail!("image load was superseded"),
    };
    tracing::info!(
        width = session.canvas().width(),
        height = session.canvas().height(),
        top_lines = summary.top_lines,
        bottom_lines = summary.bottom_lines,
        "rendered"
    );

    let written = session.save_png(&args.out)?;
    if args.data_uri {
        println!("{}", session.to_data_uri()?);
    }
    eprintln!("wrote {}", written.display());
    Ok(())
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = ProxyConfig {
        bind: args.bind,
        api_key: args.api_key,
        upstream_base: args.upstream,
        per_page: args.per_page,
    };
    meme_canvas::serve(config).await?;
    Ok(())
}

async fn cmd_search(args: SearchArgs) -> anyhow::Result<()> {
    let client = SearchClient::new(&args.proxy);
    let images = match client.search(&args.query).await {
        Ok(images) => images,
        Err(MemeError::Validation(msg)) if msg == EMPTY_QUERY_MESSAGE => {
            println!("{msg}");
            return Ok(());
        }
        Err(e) => anyhow::bail!("Error: {}", e.user_message()),
    };

    if images.is_empty() {
        println!("{NO_RESULTS_MESSAGE}");
        return Ok(());
    }
    for image in &images {
        println!("{}\t{}\t{}", image.id, image.url, image.alt);
        println!("  {} ({})", image.attribution().text(), image.photographer_url);
    }
    Ok(())
}
