use clap::{Args, Parser, Subcommand};
use docsmith::build::{self, Docs};
use docsmith::config::{self, Config};
use docsmith::url::url_for_request;
use std::path::PathBuf;
use std::process::ExitCode;
use tiny_http::{Header, Request, Response, Server};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Builds a documentation site from a tree of markdown documents.
#[derive(Parser)]
#[command(name = "docsmith", version, about)]
struct Cli {
    /// Log at debug level regardless of RUST_LOG.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every document and copy every static file into the build
    /// directory.
    Build(BuildArgs),

    /// Serve the site over HTTP, rendering documents on request.
    Serve(ServeArgs),
}

#[derive(Args)]
struct ProjectArgs {
    /// The configuration file. Defaults to the nearest `mkdocs.yml` in the
    /// current directory or its ancestors.
    #[arg(short = 'f', long = "config-file")]
    config_file: Option<PathBuf>,

    /// Fail on links and navigation entries that point at nothing.
    #[arg(long)]
    strict: bool,

    /// Override the base URL.
    #[arg(long)]
    url: Option<String>,
}

#[derive(Args)]
struct BuildArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Override the build directory.
    #[arg(short = 'd', long)]
    site_dir: Option<PathBuf>,
}

#[derive(Args)]
struct ServeArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// The address to listen on.
    #[arg(short = 'a', long, default_value = "127.0.0.1:8000")]
    addr: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter = match cli.verbose {
        true => EnvFilter::new("debug"),
        false => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Command::Build(args) => run_build(args),
        Command::Serve(args) => run_serve(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &ProjectArgs) -> Result<Config, Error> {
    let mut config = match &args.config_file {
        Some(path) => Config::from_file(path)?,
        None => {
            let cwd = std::env::current_dir().map_err(Error::CurrentDirectory)?;
            Config::from_directory(&cwd)?
        }
    };
    if let Some(url) = &args.url {
        config.url = url.clone();
    }
    config.strict |= args.strict;
    Ok(config)
}

fn run_build(args: BuildArgs) -> Result<(), Error> {
    let mut config = load_config(&args.project)?;
    if let Some(site_dir) = args.site_dir {
        config.build_directory = site_dir;
    }
    let build_directory = config.build_directory.clone();
    let site = build::build_site(config)?;
    info!(
        "Wrote {} documents to {}",
        site.documents.len(),
        build_directory.display()
    );
    Ok(())
}

fn run_serve(args: ServeArgs) -> Result<(), Error> {
    let mut docs = Docs::new(load_config(&args.project)?)?;
    docs.initialize()?;

    let server = Server::http(&args.addr).map_err(|err| Error::Listen {
        addr: args.addr.clone(),
        message: err.to_string(),
    })?;
    info!("Serving on http://{}/", args.addr);

    // One request at a time: rendering marks navigation state on the site.
    for request in server.incoming_requests() {
        let path = request.url().to_owned();
        let url = match url_for_request(&path, &docs.site().url) {
            Ok(url) => url,
            Err(err) => {
                info!("400 {}: {}", path, err);
                if let Err(err) = respond(request, 400, "text/plain; charset=utf-8", b"Bad request".to_vec()) {
                    error!("Responding to {}: {}", path, err);
                }
                continue;
            }
        };
        let result = match docs.serve(&url) {
            Ok(Some(bytes)) => respond(request, 200, content_type(&url), bytes),
            Ok(None) => {
                info!("404 {}", path);
                respond(request, 404, "text/plain; charset=utf-8", b"Not found".to_vec())
            }
            Err(err) => {
                error!("Rendering {}: {}", path, err);
                respond(
                    request,
                    500,
                    "text/plain; charset=utf-8",
                    err.to_string().into_bytes(),
                )
            }
        };
        if let Err(err) = result {
            error!("Responding to {}: {}", path, err);
        }
    }
    Ok(())
}

/// Document URLs end in `/`; anything else is typed by its extension.
fn content_type(path: &str) -> String {
    if path.ends_with('/') {
        return "text/html; charset=utf-8".to_owned();
    }
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_owned()
}

fn respond(request: Request, status: u16, content_type: impl AsRef<str>, body: Vec<u8>) -> std::io::Result<()> {
    let mut response = Response::from_data(body).with_status_code(status);
    if let Ok(header) = Header::from_bytes("Content-Type", content_type.as_ref()) {
        response = response.with_header(header);
    }
    request.respond(response)
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)]
    Config(#[from] config::Error),

    #[error(transparent)]
    Build(#[from] build::Error),

    #[error("Determining the current directory: {0}")]
    CurrentDirectory(std::io::Error),

    #[error("Listening on {addr}: {message}")]
    Listen { addr: String, message: String },
}
