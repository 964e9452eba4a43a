//! Minimal shell over a Graph drive.
//!
//! ```text
//! export GRAPH_CLIENT_ID=... GRAPH_CLIENT_SECRET=... GRAPH_TENANT_ID=...
//! export GRAPH_ROOT_PREFIX=users/adele@contoso.com/drive
//! cargo run -p provider-onedrive --example drive_shell -- ls reports
//! ```
//!
//! Commands: `ls [dir]`, `cat <path>`, `put <path> <local-file>`,
//! `mkdir <dir>`, `mv <from> <to>`, `rm <path>`.

use anyhow::{bail, Context, Result};
use bridge_desktop::ReqwestHttpClient;
use bridge_traits::storage::{FilesystemAdapter, WriteConfig};
use bridge_traits::LogLevel;
use bytes::Bytes;
use core_runtime::config::DriveConfigBuilder;
use core_runtime::logging::{init_logging, LoggingConfig};
use provider_onedrive::GraphDriveAdapter;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(LoggingConfig::default().with_level(LogLevel::Info))
        .context("failed to initialize logging")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!("usage: drive_shell <ls|cat|put|mkdir|mv|rm> [args...]");
    };

    let config = DriveConfigBuilder::from_lookup(|key| std::env::var(key).ok())
        .http_client(Arc::new(ReqwestHttpClient::new()))
        .build()
        .context("invalid GRAPH_* configuration")?;

    let adapter = GraphDriveAdapter::connect(&config)
        .await
        .context("could not authenticate against Microsoft Graph")?;

    match command.as_str() {
        "ls" => {
            let directory = rest.first().map(String::as_str).unwrap_or("");
            for entry in adapter.list_contents(directory, false).await? {
                let marker = if entry.kind.is_dir() { "d" } else { "-" };
                let size = entry.properties.get("size").and_then(|v| v.as_u64()).unwrap_or(0);
                println!("{} {:>12} {}", marker, size, entry.path);
            }
        }
        "cat" => {
            let path = arg(rest, 0)?;
            let contents = adapter
                .read(path)
                .await?
                .with_context(|| format!("{}: no such file", path))?;
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&contents).await?;
            stdout.flush().await?;
        }
        "put" => {
            let (path, local) = (arg(rest, 0)?, arg(rest, 1)?);
            let contents = tokio::fs::read(local)
                .await
                .with_context(|| format!("cannot read {}", local))?;
            let written = adapter
                .write(path, Bytes::from(contents), &WriteConfig::default())
                .await?;
            println!("{}", if written { "uploaded" } else { "upload not confirmed" });
        }
        "mkdir" => {
            let folder = adapter
                .make_path(arg(rest, 0)?)
                .await?
                .context("empty directory path")?;
            println!("created {} ({})", folder.name, folder.id);
        }
        "mv" => {
            let (from, to) = (arg(rest, 0)?, arg(rest, 1)?);
            if !adapter.rename(from, to).await? {
                bail!("{}: no such file or directory", from);
            }
        }
        "rm" => {
            let path = arg(rest, 0)?;
            if !adapter.delete(path).await? {
                bail!("{}: not deleted", path);
            }
        }
        other => bail!("unknown command '{}'", other),
    }

    Ok(())
}

fn arg(rest: &[String], index: usize) -> Result<&str> {
    rest.get(index)
        .map(String::as_str)
        .with_context(|| format!("missing argument #{}", index + 1))
}
