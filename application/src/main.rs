use std::{
    future::IntoFuture as _,
    io,
    process::ExitCode,
    sync::{Arc, OnceLock},
};

use futures::{future, FutureExt as _, TryFutureExt as _};
use guildsync::{lifetime, Args, Bot, Config};
use humantime_serde::re::humantime;
use serenity::{model::gateway::GatewayIntents, Client};
use service::{
    infra::{Discord, Http},
    Service,
};
use tokio::sync::Notify;
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() -> ExitCode {
    let level = |meta: &log::Metadata<'_>| {
        LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO) >= *meta.level()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(move |meta| {
                    meta.is_span()
                        || !STDERR_LEVELS.contains(meta.level()) && level(meta)
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(move |meta| {
                    meta.is_span()
                        || STDERR_LEVELS.contains(meta.level()) && level(meta)
                })),
        )
        .init();

    match start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let config = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(config.log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let gateway = config.discord.gateway().ok_or_else(|| {
        log::error!(
            "`discord.guild_id` and `discord.notify_channel_id` must be set",
        );
    })?;
    let service_config = config.service();
    let Config {
        discord,
        directory,
        lifetime,
        ..
    } = config;

    let directory = Http::new(directory.into()).map_err(|e| {
        log::error!("failed to initialize `Directory` client: {e}");
    })?;
    let http = Arc::new(serenity::http::Http::new(&discord.token));
    let chat = Discord::new(Arc::clone(&http), gateway);

    let (service, background) = Service::new(service_config, directory, chat);

    let ready = Arc::new(Notify::new());
    let mut client = Client::builder(&discord.token, GatewayIntents::GUILDS)
        .event_handler(Bot::new(service, Arc::clone(&ready)))
        .await
        .map_err(|e| log::error!("failed to build Discord client: {e}"))?;
    let shards = Arc::clone(&client.shard_manager);

    // Sweeps only start once the gateway session is established.
    let run = future::try_join(
        client
            .start()
            .map_err(|e| log::error!("Discord client failed: {e}")),
        ready
            .notified()
            .then(|()| background.into_future())
            .map_err(|e| log::error!("background task failed: {e}")),
    )
    .map_ok(drop);

    if let Some(res) = lifetime::bounded(run, lifetime).await {
        return res;
    }
    log::info!(
        "lifetime of {} elapsed, shutting down",
        humantime::format_duration(lifetime),
    );
    shards.shutdown_all().await;
    Ok(())
}
