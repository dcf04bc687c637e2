//! dropboxdol - CLI entry point.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing_subscriber::{fmt, EnvFilter};

use dropboxdol::{
    cli::{Args, Command},
    config::{validate_config, Config},
    error::{exit_codes, Error, Result},
    fs::{compute_remote_path, resolve_local_path},
    output::{
        create_download_bar, create_spinner, print_error, print_info, print_success,
        print_warning,
    },
    sharing::{dropbox_link, DownloadFlag},
    store::{DropboxFiles, DropboxTextFiles, KvStore},
    DropboxApi,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            if let Error::RateLimited(secs) = &e {
                print_warning(&format!(
                    "Dropbox is throttling requests; wait {} seconds before retrying",
                    secs
                ));
            }
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Authentication(_)
                | Error::AccessDenied(_)
                | Error::BadRequest(_)
                | Error::RateLimited(_)
                | Error::Api(_)
                | Error::Http(_) => ExitCode::from(exit_codes::API_ERROR as u8),
                Error::InvalidInput(_)
                | Error::NotFound(_)
                | Error::Computation { .. }
                | Error::KeyNotFound(_)
                | Error::Encoding(_) => ExitCode::from(exit_codes::INPUT_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let mut config = match args.config_path() {
        Some(path) => Config::load_or_default(&path)?,
        None => Config::default(),
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    let api = DropboxApi::from_token_key(&config.account.access_token_key)?;
    execute(api, &config, args.command).await
}

/// Execute a single subcommand.
async fn execute(api: DropboxApi, config: &Config, command: Command) -> Result<()> {
    let root = config.store.root.as_str();

    match command {
        Command::Ls => {
            let store = DropboxFiles::new(api, root);
            let spinner = create_spinner(&format!("Listing {}...", store.root()));
            let keys = store.keys().await;
            spinner.finish_and_clear();
            for key in keys? {
                println!("{}", key);
            }
        }
        Command::Cat { key } => {
            let store = DropboxTextFiles::new(api, root);
            print!("{}", store.get(&key).await?);
        }
        Command::Get { key, output } => {
            let store = DropboxFiles::new(api, root);
            match output {
                Some(output) => download_to_file(&store, &key, &output).await?,
                None => {
                    let bytes = store.get(&key).await?;
                    std::io::stdout().write_all(&bytes)?;
                }
            }
        }
        Command::Put { key, file } => {
            let store = DropboxFiles::new(api, root);
            let contents = tokio::fs::read(&file).await?;
            let spinner = create_spinner(&format!("Uploading {}...", file.display()));
            let result = store.set(&key, contents).await;
            spinner.finish_and_clear();
            result?;
            print_success(&format!("Stored {}", store.path_of(&key)?));
        }
        Command::Rm { key } => {
            let store = DropboxFiles::new(api, root);
            store.delete(&key).await?;
            print_success(&format!("Deleted {}", key));
        }
        Command::Link { path, .. } => {
            let flag = DownloadFlag::from(config.link.download);
            let url =
                dropbox_link(&api, &path, config.store.local_root.as_deref(), flag).await?;
            println!("{}", url);
        }
        Command::RemotePath { path } => {
            let (full_path, root) =
                resolve_local_path(&path, config.store.local_root.as_deref())?;
            println!("{}", compute_remote_path(&full_path, &root)?);
        }
    }

    Ok(())
}

/// Stream a key's contents into a local file.
async fn download_to_file(store: &DropboxFiles, key: &str, output: &Path) -> Result<()> {
    let path = store.path_of(key)?;
    let response = store
        .backend()
        .download_response(&path)
        .await
        .map_err(|e| match e {
            Error::KeyNotFound(_) => Error::KeyNotFound(key.to_string()),
            other => other,
        })?;

    let progress = create_download_bar(response.content_length());
    let mut file = tokio::fs::File::create(output).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        progress.inc(chunk.len() as u64);
    }
    file.flush().await?;
    progress.finish_and_clear();

    print_info(&format!("Saved {} to {}", key, output.display()));
    Ok(())
}
