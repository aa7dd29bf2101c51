//! trellis demo
//!
//! in-memory の port 一式をワイヤリングして、
//! create → read → update → patch → search → delete を一通り実行します。
//!
//! Usage:
//!   trellis-cli --cache-ttl-secs 60 --log-level debug

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trellis_core::app::{AppBuilder, RepositoryConfig};
use trellis_core::domain::{
    ChangeKind, Event, IdMarker, Post, PostFields, PostKind, User, UserFields, UserKind,
};
use trellis_core::impls::{InMemoryCache, InMemoryNotifier, InMemorySearchIndex, InMemoryStore};
use trellis_core::ports::{MessageHandler, Notifier};

#[derive(Parser, Debug)]
#[command(name = "trellis-cli")]
#[command(about = "Exercise the trellis repository against in-memory stores")]
struct Args {
    /// Cache TTL in seconds (at least 1)
    #[arg(
        long,
        env = "TRELLIS_CACHE_TTL_SECS",
        default_value_t = 3600,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    cache_ttl_secs: u64,

    /// Log filter (RUST_LOG wins when set)
    #[arg(long, env = "TRELLIS_LOG", default_value = "info")]
    log_level: String,

    /// Title of the demo post
    #[arg(long, default_value = "Hello trellis")]
    title: String,

    /// Body of the demo post
    #[arg(long, default_value = "primary store first, everything else best-effort")]
    body: String,
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level '{level}'"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

/// `<kind>.added|updated|deleted` を全て購読して標準出力に流す
async fn watch<T: IdMarker>(notifier: &dyn Notifier) -> Result<()> {
    for change in [ChangeKind::Added, ChangeKind::Updated, ChangeKind::Deleted] {
        let topic = Event::topic_for::<T>(change);
        let label = topic.clone();
        let handler: MessageHandler = Arc::new(move |payload: &[u8]| {
            println!("event: {label} {}", String::from_utf8_lossy(payload));
        });
        notifier
            .subscribe(&topic, handler)
            .await
            .with_context(|| format!("subscribe to {topic}"))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let config =
        RepositoryConfig::default().with_cache_ttl(Duration::from_secs(args.cache_ttl_secs));
    let cache = Arc::new(InMemoryCache::new());
    let notifier = Arc::new(InMemoryNotifier::new());
    let app = AppBuilder::new()
        .cache(cache.clone())
        .search(Arc::new(InMemorySearchIndex::new()))
        .notifier(notifier.clone())
        .config(config)
        .build()?;
    info!(cache_ttl_secs = config.cache_ttl_secs, "trellis wired");

    watch::<PostKind>(notifier.as_ref()).await?;
    watch::<UserKind>(notifier.as_ref()).await?;

    let post_store = Arc::new(InMemoryStore::<Post>::new());
    let user_store = Arc::new(InMemoryStore::<User>::new());
    let posts = app.service::<Post>(post_store.clone());
    let users = app.service::<User>(user_store);

    // (A) 作成
    let author = users
        .create(UserFields::new("Ada Lovelace", "ada", "ada@example.com"))
        .await?;
    let post = posts
        .create(PostFields::new(&args.title, &args.body).with_author(&author.user_name))
        .await?;
    let id = post.id.to_string();
    println!("created: {}", serde_json::to_string(&post)?);

    // (B) 読み取り（2 回目はキャッシュ）
    posts.get(&id).await?;
    let read = posts.get(&id).await?;
    println!(
        "read: {} (primary reads={}, cache hits={})",
        serde_json::to_string(&read)?,
        post_store.reads(),
        cache.stats().hits
    );

    // (C) 更新と部分更新
    let updated = posts
        .update(&id, PostFields::new(format!("{} (edited)", args.title), &args.body))
        .await?;
    println!("updated: {}", serde_json::to_string(&updated)?);
    let patched = posts.patch(&id, PostFields::new("", "patched body")).await?;
    println!("patched: {}", serde_json::to_string(&patched)?);

    // (D) 検索
    for hit in posts.search("patched").await? {
        println!("search hit: {} score={}", hit.document_id, hit.score);
    }
    for hit in users.search("userName:ada").await? {
        println!("user hit: {} score={}", hit.document_id, hit.score);
    }

    // (E) 削除
    posts.delete(&id).await?;
    match posts.get(&id).await {
        Err(err) if err.is_not_found() => println!("after delete: {err}"),
        Err(err) => return Err(err.into()),
        Ok(post) => anyhow::bail!("post {} still readable after delete", post.id),
    }
    println!("posts remaining: {}", posts.list().await?.len());

    notifier.close().await?;
    Ok(())
}
