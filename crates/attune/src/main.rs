// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attune - an emotionally-aware companion agent.
//!
//! Binary entry point: loads configuration, wires the storage backend,
//! inference collaborators, and engine together, and drives the channel.

mod console;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use attune_config::{AttuneConfig, StorageBackend};
use attune_core::{AttuneError, ChannelAdapter, StorageAdapter};
use attune_engine::Engine;
use attune_memory::{EmbeddingCache, MemoryManager};
use attune_ollama::OllamaClient;
use attune_storage::{JsonStorage, MemoryStorage, SqliteStorage};

use console::ConsoleChannel;

/// Attune - an emotionally-aware companion agent.
#[derive(Parser, Debug)]
#[command(name = "attune", version, about, long_about = None)]
struct Cli {
    /// Path to a config file (overrides the XDG hierarchy).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the agent on the console channel.
    Serve,
    /// Print the effective configuration and storage health.
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("attune: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.agent.log_level.clone())),
        )
        .init();

    let result = match cli.command {
        Some(Commands::Status) => status(&config).await,
        Some(Commands::Serve) | None => serve(config).await,
    };

    if let Err(e) = result {
        eprintln!("attune: {e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<AttuneConfig, AttuneError> {
    let config = match path {
        Some(path) => attune_config::load_config_from_path(path),
        None => attune_config::load_config(),
    }
    .map_err(|e| AttuneError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

fn build_storage(config: &AttuneConfig) -> Arc<dyn StorageAdapter + Send + Sync> {
    match config.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        StorageBackend::Json => Arc::new(JsonStorage::new(config.storage.path.clone())),
        StorageBackend::Sqlite => Arc::new(SqliteStorage::new(config.storage.path.clone())),
    }
}

async fn serve(config: AttuneConfig) -> Result<(), AttuneError> {
    let config = Arc::new(config);

    let storage = build_storage(&config);
    storage.initialize().await?;

    let (provider, embedder) = OllamaClient::new(
        config.inference.clone(),
        config.models.embedding.clone(),
    );
    let cache = EmbeddingCache::new(Arc::new(embedder), config.memory.embed_cache_cap);
    let memory = MemoryManager::new(config.memory.clone(), Arc::clone(&storage), cache);
    memory.load().await?;

    let mut channel = ConsoleChannel::new(config.agent.name.clone());
    channel.connect().await?;
    let channel: Arc<dyn ChannelAdapter + Send + Sync> = Arc::new(channel);

    let engine = Engine::new(
        Arc::clone(&config),
        memory.clone(),
        Arc::new(provider),
        channel,
    );

    info!(agent = %config.agent.name, "agent started");
    let outcome = tokio::select! {
        result = engine.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
            Ok(())
        }
    };

    // Flush whatever the debounce window was still holding.
    memory.flush_now().await;
    storage.close().await?;

    match outcome {
        Err(AttuneError::Channel { ref message, .. }) if message.contains("stdin closed") => {
            info!("channel closed, goodbye");
            Ok(())
        }
        other => other,
    }
}

async fn status(config: &AttuneConfig) -> Result<(), AttuneError> {
    println!("agent:    {}", config.agent.name);
    println!(
        "storage:  {} ({})",
        match config.storage.backend {
            StorageBackend::Memory => "memory",
            StorageBackend::Json => "json",
            StorageBackend::Sqlite => "sqlite",
        },
        config.storage.path
    );
    println!("chat:     {}", config.inference.chat_url);
    println!("embed:    {}", config.inference.embedding_url);

    let storage = build_storage(config);
    storage.initialize().await?;
    let health = attune_core::PluginAdapter::health_check(storage.as_ref()).await?;
    println!("health:   {health:?}");
    storage.close().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AttuneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.agent.name, "attune");
    }

    #[test]
    fn storage_backend_selection() {
        let mut config = AttuneConfig::default();
        config.storage.backend = StorageBackend::Memory;
        let storage = build_storage(&config);
        assert_eq!(attune_core::PluginAdapter::name(storage.as_ref()), "memory");
    }
}
