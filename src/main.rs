use anyhow::{Context, Result};
use cloudmedia_client::services::{AssumeLoaded, HttpImageProbe, ImageProbe};
use cloudmedia_client::ui::{next_snapshot, upload_button_label, GalleryCard, GalleryView, StatusMessage};
use cloudmedia_client::{
    AppConfig, DeleteController, FileId, FileListStore, HttpMediaApi, MediaApi, MediaError, UploadController,
    UploadPayload,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, PartialEq)]
enum Command {
    List,
    Refresh,
    Upload(PathBuf),
    Delete(FileId),
    Status,
    Help,
    Quit,
    Invalid(String),
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let command = match verb {
        "list" | "ls" => Command::List,
        "refresh" => Command::Refresh,
        "upload" if !rest.is_empty() => Command::Upload(PathBuf::from(rest)),
        "upload" => Command::Invalid("usage: upload <path>".to_string()),
        "delete" | "rm" => match rest.parse() {
            Ok(id) => Command::Delete(id),
            Err(_) => Command::Invalid("usage: delete <id>".to_string()),
        },
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command '{}', type 'help'", other)),
    };
    Some(command)
}

fn print_help() {
    println!("Commands: list | refresh | upload <path> | delete <id> | status | help | quit");
}

fn print_gallery(cards: &[GalleryCard], upload_in_flight: bool) {
    println!("--- {} ---", upload_button_label(upload_in_flight));
    for line in GalleryView::render_lines(cards) {
        println!("{}", line);
    }
}

fn report(e: &MediaError) {
    error!("{}", e);
    println!("{}", StatusMessage::from_error(e));
}

/// Command dispatch plus the background work it started. Every spawned
/// refresh, upload and delete stays in `tasks` until it finishes.
struct Session {
    store: Arc<FileListStore>,
    uploads: Arc<UploadController>,
    deletes: Arc<DeleteController>,
    gallery: Arc<GalleryView>,
    probe: Arc<dyn ImageProbe>,
    tasks: JoinSet<()>,
}

impl Session {
    fn new(api: Arc<dyn MediaApi>, gallery: GalleryView, probe: Arc<dyn ImageProbe>) -> Self {
        let store = Arc::new(FileListStore::new(api.clone()));
        let uploads = Arc::new(UploadController::new(api.clone(), store.clone()));
        let deletes = Arc::new(DeleteController::new(api, store.clone()));
        Self { store, uploads, deletes, gallery: Arc::new(gallery), probe, tasks: JoinSet::new() }
    }

    /// Re-render whenever the store publishes a new snapshot.
    fn spawn_renderer(&self) {
        let mut receiver = self.store.subscribe();
        let gallery = self.gallery.clone();
        let probe = self.probe.clone();
        let uploads = self.uploads.clone();
        tokio::spawn(async move {
            while let Some(snapshot) = next_snapshot(&mut receiver).await {
                let cards = gallery.render(&snapshot, probe.as_ref()).await;
                print_gallery(&cards, uploads.is_in_flight());
            }
        });
    }

    /// Returns `false` once the user asked to quit.
    async fn dispatch(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return false,
            Command::Help => print_help(),
            Command::Invalid(message) => println!("{}", message),
            Command::List => {
                let cards = self.gallery.render(&self.store.snapshot(), self.probe.as_ref()).await;
                print_gallery(&cards, self.uploads.is_in_flight());
            }
            Command::Status => {
                println!(
                    "{} | {} files | {} refreshes | {} pending",
                    upload_button_label(self.uploads.is_in_flight()),
                    self.store.snapshot().len(),
                    self.store.generation(),
                    self.tasks.len()
                );
            }
            Command::Refresh => {
                let store = self.store.clone();
                self.tasks.spawn(async move {
                    if let Err(e) = store.refresh().await {
                        report(&e);
                    }
                });
            }
            Command::Upload(path) => {
                // The trigger is disabled while an upload runs
                if self.uploads.is_in_flight() {
                    println!("{}", StatusMessage::from_error(&MediaError::UploadInFlight));
                    return true;
                }
                let uploads = self.uploads.clone();
                self.tasks.spawn(async move {
                    let payload = match UploadPayload::from_path(&path).await {
                        Ok(payload) => payload,
                        Err(e) => return report(&e),
                    };
                    let filename = payload.filename.clone();
                    match uploads.upload(payload).await {
                        Ok(_) => println!("{}", StatusMessage::info(format!("Uploaded {}", filename))),
                        Err(e) => report(&e),
                    }
                });
            }
            Command::Delete(id) => {
                let deletes = self.deletes.clone();
                self.tasks.spawn(async move {
                    match deletes.delete(id).await {
                        Ok(()) => println!("{}", StatusMessage::info(format!("Deleted file {}", id))),
                        Err(e) => report(&e),
                    }
                });
            }
        }
        true
    }

    fn reap(joined: Result<(), JoinError>) {
        if let Err(e) = joined {
            warn!("Background task ended abnormally: {}", e);
        }
    }

    /// Wait for every outstanding refresh, upload and delete.
    async fn shutdown(mut self) {
        if !self.tasks.is_empty() {
            info!("Waiting for {} pending operation(s)", self.tasks.len());
        }
        while let Some(joined) = self.tasks.join_next().await {
            Self::reap(joined);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloudmedia_client=info,cloudmedia=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = AppConfig::new().context("Failed to load configuration")?;
    info!("Using media API at {} and bucket {}", config.api.base_url, config.storage.bucket_root);

    let http_api = HttpMediaApi::new(&config.api).context("Failed to initialize media API client")?;
    match http_api.health().await {
        Ok(status) => info!("Backend reachable: {}", status.message),
        Err(e) => warn!("Backend health check failed: {}", e),
    }

    let probe: Arc<dyn ImageProbe> = if config.ui.probe_images {
        Arc::new(HttpImageProbe::new(Duration::from_secs(config.api.timeout_secs)))
    } else {
        Arc::new(AssumeLoaded)
    };
    let mut session = Session::new(Arc::new(http_api), GalleryView::from_config(&config), probe);
    session.spawn_renderer();

    // Initial page load
    if let Err(e) = session.store.refresh().await {
        report(&e);
    }

    print_help();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read command")? else {
                    break;
                };
                let Some(command) = parse_command(&line) else {
                    continue;
                };
                if !session.dispatch(command).await {
                    break;
                }
            }
            Some(joined) = session.tasks.join_next(), if !session.tasks.is_empty() => Session::reap(joined),
        }
    }

    session.shutdown().await;
    info!("Bye");
    Ok(())
}
