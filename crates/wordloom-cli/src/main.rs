use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use std::io::{Read, Write};
use std::str::FromStr;
use wordloom::render::raster::{self, RasterError, RasterOptions};
use wordloom::render::{
    FetchError, FetchedImage, ImageFetcher, LayoutOptions, OfflineFetcher, sanitize_svg_id,
};
use wordloom::{ConfigLayers, PosterConfig};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Config(wordloom::Error),
    Render(wordloom_render::Error),
    Raster(RasterError),
    Json(serde_json::Error),
    Http(reqwest::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Config(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Http(err) => write!(f, "HTTP client error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<wordloom::Error> for CliError {
    fn from(value: wordloom::Error) -> Self {
        Self::Config(value)
    }
}

impl From<wordloom_render::Error> for CliError {
    fn from(value: wordloom_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<reqwest::Error> for CliError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Render,
    Words,
    Layout,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
    Pdf,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "pdf" => Ok(Self::Pdf),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    limit: Option<usize>,
    config_path: Option<String>,
    overrides: Vec<String>,
    seed: Option<u64>,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    poster_id: Option<String>,
    offline: bool,
    out: Option<String>,
}

#[derive(Serialize)]
struct WordsOut<'a> {
    /// Content-word occurrences in the whole text, before `--limit` applies.
    total: usize,
    distinct: usize,
    words: &'a [wordloom::WordFrequencyEntry],
}

fn words_report(text: &str, limit: usize) -> (usize, usize, Vec<wordloom::WordFrequencyEntry>) {
    let mut table = wordloom::frequency_table(text);
    let total = table.iter().map(|w| w.count as usize).sum();
    let distinct = table.len();
    table.truncate(limit);
    (total, distinct, table)
}

fn usage() -> &'static str {
    "wordloom-cli\n\
\n\
USAGE:\n\
  wordloom-cli words [--limit <n>] [--pretty] [<path>|-]\n\
  wordloom-cli layout [--config <file>] [--set <key=value>]... [--seed <n>] [--pretty] [<path>|-]\n\
  wordloom-cli [render] [--config <file>] [--set <key=value>]... [--seed <n>] [--format svg|png|jpg|pdf] [--scale <n>] [--background <css-color>] [--id <poster-id>] [--offline] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the story text is read from stdin.\n\
  - --config accepts a JSON or YAML poster config; --set overrides one dotted key (e.g. stats.streakDays=7).\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG/JPG/PDF output defaults to writing next to the input file (or ./out.<ext> for stdin).\n\
  - render fetches the QR code and logo unless --offline is given; a failed fetch leaves the slot empty.\n\
  - Set RUST_LOG=debug to see placement and fetch diagnostics.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Render,
        render_format: RenderFormat::Svg,
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "words" => args.command = Command::Words,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--offline" => args.offline = true,
            "--limit" => {
                let limit = next_value(&mut it)?;
                args.limit = Some(limit.parse::<usize>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--config" => args.config_path = Some(next_value(&mut it)?.clone()),
            "--set" => args.overrides.push(next_value(&mut it)?.clone()),
            "--seed" => {
                let seed = next_value(&mut it)?;
                args.seed = Some(seed.parse::<u64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                let scale = next_value(&mut it)?;
                args.render_scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let bg = next_value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--id" => args.poster_id = Some(next_value(&mut it)?.clone()),
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_config(path: Option<&str>, overrides: &[String]) -> Result<PosterConfig, CliError> {
    let mut layers = ConfigLayers::new();
    if let Some(path) = path {
        let text = std::fs::read_to_string(path)?;
        let is_json = std::path::Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            layers.merge_json_str(&text)?;
        } else {
            layers.merge_yaml_str(&text)?;
        }
    }
    for assignment in overrides {
        layers.set_assignment(assignment)?;
    }
    Ok(layers.build()?)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn write_bytes(bytes: &[u8], out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            std::io::stdout().lock().write_all(bytes)?;
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, bytes)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

/// Fetches `http(s)` sources with `reqwest` and reads anything else from the local filesystem.
struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    fn new() -> Result<Self, CliError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("wordloom-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    async fn fetch_http(&self, source: &str) -> Result<Vec<u8>, FetchError> {
        let transport = |err: reqwest::Error| FetchError::Transport {
            location: source.to_string(),
            message: err.to_string(),
        };
        let response = self.client.get(source).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                location: source.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await.map_err(transport)?;
        Ok(bytes.to_vec())
    }

    async fn fetch_file(source: &str) -> Result<Vec<u8>, FetchError> {
        let path = match url::Url::parse(source) {
            Ok(url) if url.scheme() == "file" => {
                url.to_file_path().map_err(|()| FetchError::NotFound {
                    location: source.to_string(),
                })?
            }
            _ => std::path::PathBuf::from(source),
        };
        tokio::fs::read(&path).await.map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => FetchError::NotFound {
                location: source.to_string(),
            },
            _ => FetchError::Transport {
                location: source.to_string(),
                message: err.to_string(),
            },
        })
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, source: &'a str) -> BoxFuture<'a, Result<FetchedImage, FetchError>> {
        async move {
            tracing::debug!(source, "fetching image");
            let bytes = if source.starts_with("http://") || source.starts_with("https://") {
                self.fetch_http(source).await?
            } else {
                Self::fetch_file(source).await?
            };
            FetchedImage::from_bytes(source, bytes)
        }
        .boxed()
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;

    match args.command {
        Command::Words => {
            let limit = args.limit.unwrap_or(wordloom::DEFAULT_MAX_WORDS);
            let (total, distinct, words) = words_report(&text, limit);
            let out = WordsOut {
                total,
                distinct,
                words: &words,
            };
            write_json(&out, args.pretty)
        }
        Command::Layout => {
            let config = load_config(args.config_path.as_deref(), &args.overrides)?;
            let options = LayoutOptions {
                seed: args.seed,
                ..Default::default()
            };
            let layout = wordloom::render::layout_poster(&text, &config, &options)?;
            let json = wordloom_render::layout_to_json(&layout, args.pretty)?;
            println!("{json}");
            Ok(())
        }
        Command::Render => {
            let config = load_config(args.config_path.as_deref(), &args.overrides)?;
            let mut options = LayoutOptions {
                seed: args.seed,
                ..Default::default()
            };
            options.svg.diagram_id = args.poster_id.as_deref().map(sanitize_svg_id);

            let on_ready = |poster: &wordloom::render::RenderedPoster| {
                tracing::info!(
                    placed = poster.layout.cloud.words.len(),
                    dropped = poster.layout.cloud.dropped.len(),
                    "poster ready"
                );
            };
            let poster = if args.offline {
                wordloom::render::render_poster(&text, &config, &options, &OfflineFetcher, on_ready)
                    .await?
            } else {
                let fetcher = HttpFetcher::new()?;
                wordloom::render::render_poster(&text, &config, &options, &fetcher, on_ready)
                    .await?
            };

            let raster_options = RasterOptions {
                scale: args.render_scale,
                background: args.background.clone(),
                ..Default::default()
            };
            let (bytes, ext) = match args.render_format {
                RenderFormat::Svg => {
                    return write_bytes(poster.svg.as_bytes(), args.out.as_deref());
                }
                RenderFormat::Png => (raster::poster_to_png(&poster, &raster_options)?, "png"),
                RenderFormat::Jpeg => (raster::poster_to_jpeg(&poster, &raster_options)?, "jpg"),
                RenderFormat::Pdf => (raster::poster_to_pdf(&poster)?, "pdf"),
            };
            let out = args.out.clone().unwrap_or_else(|| {
                default_raster_out_path(args.input.as_deref(), ext)
                    .to_string_lossy()
                    .to_string()
            });
            write_bytes(&bytes, Some(&out))
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
