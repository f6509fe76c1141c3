//! # Corkboard Binary
//!
//! Assembles the client engine from its adapters and renders the board to
//! the terminal: newest posts first, comments nested by depth, reaction
//! glyphs with counts. With `CORKBOARD_USERNAME`/`CORKBOARD_PASSWORD` set,
//! it signs in first so ownership and "my reaction" annotations appear.

use std::sync::Arc;

use api_adapters::{HttpTelemetry, RestClient};
use auth_adapters::ClaimsTokenDecoder;
use configs::ClientConfig;
use domains::icons;
use domains::models::{Comment, ContentSection, Post};
use domains::{AccountApi, BoardApi, BoardSnapshot, SessionStore, TelemetrySink};
use services::{BoardService, SessionService};
use storage_adapters::FileSessionStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Configuration and logging
    let config = ClientConfig::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Adapters
    let rest = Arc::new(RestClient::new(&config)?);
    let store = Arc::new(FileSessionStore::new(&config.session_path));
    let decoder = Arc::new(ClaimsTokenDecoder::new());
    let telemetry: Arc<dyn TelemetrySink> = Arc::new(HttpTelemetry::new(&config));

    // 3. Session: restore whatever token the last run left behind
    let accounts: Arc<dyn AccountApi> = rest.clone();
    let session = Arc::new(SessionService::new(accounts, decoder, store.clone()));
    session.restore().await?;

    let mut events = session.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::debug!(?event, "session event");
        }
    });

    if let (Ok(username), Ok(password)) = (
        std::env::var("CORKBOARD_USERNAME"),
        std::env::var("CORKBOARD_PASSWORD"),
    ) {
        match session.login(&username, &password).await {
            Ok(()) => tracing::info!(%username, "signed in"),
            Err(err) => tracing::warn!(error = %err, "sign-in failed, browsing anonymously"),
        }
    }

    // 4. One-time intro banner, gated on the session-scoped flag
    if !store.intro_seen() {
        println!("corkboard · {}\n", config.api_base_url);
        store.mark_intro_seen();
    }

    // 5. Fetch and render
    let api: Arc<dyn BoardApi> = rest;
    let mut board = BoardService::new(api, telemetry, session);
    board.load().await?;

    match board.snapshot() {
        Some(snapshot) => render_board(snapshot),
        None => println!("the board is empty"),
    }
    Ok(())
}

fn render_board(snapshot: &BoardSnapshot) {
    println!(
        "{} posts on the board ({} shown)\n",
        snapshot.total_posts,
        snapshot.posts.len()
    );
    for post in snapshot.posts_newest_first() {
        render_post(&post);
        println!();
    }
}

fn render_post(post: &Post) {
    println!("━━ {} · {}", post.id, post.created_at.format("%Y-%m-%d %H:%M"));
    for section in &post.sections {
        match section {
            ContentSection::Text { body, .. } => println!("  {body}"),
            ContentSection::Image { url, .. } => println!("  [image: {url}]"),
        }
    }
    render_reactions(post);
    for comment in &post.comments {
        render_comment(comment, 1);
    }
}

fn render_reactions(post: &Post) {
    if post.reactions.is_empty() {
        return;
    }
    let chips: Vec<String> = post
        .reactions
        .kinds_present()
        .map(|kind| {
            let marker = if post.reactions.my_reaction(kind).is_some() {
                "*"
            } else {
                ""
            };
            format!(
                "{} {}{marker}",
                icons::reaction_glyph(kind),
                post.reactions.count_of(kind)
            )
        })
        .collect();
    println!("  {}", chips.join("  "));
}

fn render_comment(comment: &Comment, depth: usize) {
    let indent = "  ".repeat(depth + 1);
    let text = match (&comment.text, comment.deleted) {
        (_, true) => "[deleted]",
        (Some(text), _) => text.as_str(),
        (None, _) => "",
    };
    let me = if comment.is_mine { " (you)" } else { "" };
    let edited = if comment.edited_at.is_some() {
        " (edited)"
    } else {
        ""
    };
    println!("{indent}↳ {}{me}{edited}: {text}", comment.id);

    if !comment.reactions.is_empty() {
        let chips: Vec<String> = comment
            .reactions
            .kinds_present()
            .map(|kind| {
                format!(
                    "{} {}",
                    icons::reaction_glyph(kind),
                    comment.reactions.count_of(kind)
                )
            })
            .collect();
        println!("{indent}  {}", chips.join("  "));
    }
    for reply in &comment.replies {
        render_comment(reply, depth + 1);
    }
}
