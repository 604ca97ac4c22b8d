//! `serve`, `sync`, `project`, `comments` and `typewriter`.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use folio_core::{Error, FolioConfig, ViewHandle};
use folio_server::AppState;
use folio_site::{CommentDraft, ImageAttachment, Site, Typewriter, format_relative};

use crate::cli::CommentsAction;

/// Run the HTTP site until Ctrl+C or SIGTERM.
pub async fn serve(config: FolioConfig) -> Result<()> {
    let site = Site::from_config(config)?;
    folio_server::serve(AppState::new(site)).await?;
    Ok(())
}

/// Fetch both portfolio lists once and report what was mirrored.
pub async fn sync(config: FolioConfig) -> Result<()> {
    let site = Site::from_config(config)?;
    let view = ViewHandle::mounted("cli");
    let report = site
        .synchronizer
        .sync(&view)
        .await
        .context("Portfolio sync failed")?;

    println!(
        "Synced {} projects and {} certificates{}",
        report.view.projects.len(),
        report.view.certificates.len(),
        if report.mirrored { "" } else { " (mirror not updated)" }
    );
    Ok(())
}

/// Print a project detail as JSON.
pub async fn project(config: FolioConfig, id: &str, fetch: bool) -> Result<()> {
    let site = Site::from_config(config)?;
    let found = if fetch {
        site.resolver.resolve_or_fetch(id).await?
    } else {
        site.resolver.resolve(id)
    };

    let detail = found
        .ok_or_else(|| Error::not_found(&site.config().remote.projects_collection, id))?;
    println!("{}", serde_json::to_string_pretty(&detail)?);
    if detail.live_demo().is_none() {
        eprintln!("Live Demo Unavailable");
    }
    Ok(())
}

/// List or post comments.
pub async fn comments(config: FolioConfig, action: CommentsAction) -> Result<()> {
    let site = Site::from_config(config)?;
    match action {
        CommentsAction::List => {
            let mut feed = site.comments.subscribe().await?;
            let now = chrono::Utc::now();
            let comments = feed.next().await.unwrap_or_default();
            println!("Comments ({})", comments.len());
            for comment in comments {
                println!(
                    "{:>12}  {}: {}",
                    format_relative(now, comment.created_at),
                    comment.user_name,
                    comment.content
                );
            }
            feed.release();
            Ok(())
        }
        CommentsAction::Post {
            author,
            text,
            image,
        } => {
            let mut draft = CommentDraft::new(author, text);
            if let Some(path) = image {
                draft = draft.with_image(read_image(&path)?);
            }
            match site.comments.submit(draft).await {
                Ok(id) => {
                    println!("Posted comment {id}");
                    Ok(())
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Submit failed");
                    Err(anyhow!(e.user_message()))
                }
            }
        }
    }
}

fn read_image(path: &Path) -> Result<ImageAttachment> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();
    Ok(ImageAttachment::new(file_name, bytes))
}

/// Print typewriter frames on the virtual clock, or animate in place.
pub async fn typewriter(config: FolioConfig, ticks: usize, live: bool) -> Result<()> {
    let mut tw = Typewriter::new(config.site.typewriter_words)?;

    if !live {
        let mut elapsed = Duration::ZERO;
        println!("{:>7}  {}", 0, tw.text());
        for _ in 0..ticks {
            elapsed += tw.next_delay();
            tw.tick();
            println!("{:>7}  {}", elapsed.as_millis(), tw.text());
        }
        return Ok(());
    }

    let view = ViewHandle::mounted("typewriter");
    let stopper = view.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stopper.unmount();
        }
    });

    let mut stdout = std::io::stdout();
    tw.run(&view, |text| {
        let _ = write!(stdout, "\r\x1b[K{text}");
        let _ = stdout.flush();
    })
    .await;
    println!();
    Ok(())
}
