//! CLI runner - executes commands

use crate::api::VkApi;
use crate::cli::commands::{Cli, Commands};
use crate::config::{resolve_token, DumpConfig, TOKEN_ENV};
use crate::dump::{dump_peer, list_dumped_peers};
use crate::error::{Error, Result};
use crate::history::{BatchSource, ExecuteBatches, LocalBatches};
use crate::peers::{list_peer_ids, select_peers};
use crate::render::{render_peer, Format};
use crate::types::PeerId;
use chrono::Local;
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Dump {
                token,
                threads,
                max_msgs,
                no_execute,
            } => {
                let config = DumpConfig {
                    out_dir: self.cli.out_dir.clone(),
                    threads: *threads,
                    max_messages: *max_msgs,
                    use_execute: !*no_execute,
                    ..Default::default()
                };
                let token = resolve_token(std::env::var(TOKEN_ENV).ok(), token.clone())?;
                self.dump(&config, &token).await
            }
            Commands::Parse { fmt } => self.parse(*fmt).await,
            Commands::Peers { token } => {
                let token = resolve_token(std::env::var(TOKEN_ENV).ok(), token.clone())?;
                self.peers(&DumpConfig::default(), &token).await
            }
        }
    }

    fn include(&self) -> BTreeSet<PeerId> {
        self.cli.include.clone().unwrap_or_default()
    }

    fn filter(&self, all: &[PeerId]) -> Vec<PeerId> {
        let exclude = self.cli.exclude.clone().unwrap_or_default();
        select_peers(all, &self.include(), &exclude)
    }

    /// Peers selected by the include/exclude flags
    async fn selected_peers(&self, api: &VkApi) -> Result<Vec<PeerId>> {
        // an explicit include list needs no conversation listing
        let all = if self.include().is_empty() {
            list_peer_ids(api).await?
        } else {
            Vec::new()
        };

        Ok(self.filter(&all))
    }

    async fn parse(&self, format: Format) -> Result<()> {
        let out_dir = &self.cli.out_dir;
        let all = if self.include().is_empty() {
            list_dumped_peers(out_dir).await?
        } else {
            Vec::new()
        };
        let peers = self.filter(&all);
        info!(peers = peers.len(), "Rendering saved peers");

        let mut failed = BTreeSet::new();
        for peer_id in peers {
            match render_peer(out_dir, peer_id, format, &Local).await {
                Ok(path) => info!(peer_id, path = %path.display(), "Rendered peer"),
                Err(e) => {
                    error!(peer_id, "Failed to render peer: {e}");
                    failed.insert(peer_id);
                }
            }
        }

        failure_summary(&failed)
    }

    async fn peers(&self, config: &DumpConfig, token: &str) -> Result<()> {
        let api = VkApi::new(&config.api, token)?;
        for peer_id in self.selected_peers(&api).await? {
            println!("{peer_id}");
        }
        Ok(())
    }

    async fn dump(&self, config: &DumpConfig, token: &str) -> Result<()> {
        config.validate()?;
        let started = Instant::now();

        let api = Arc::new(VkApi::new(&config.api, token)?);
        let source: Arc<dyn BatchSource> = if config.use_execute {
            Arc::new(ExecuteBatches::new(Arc::clone(&api)))
        } else {
            Arc::new(LocalBatches::new(Arc::clone(&api)))
        };

        let account = api.current_user().await?;
        let peers = self.selected_peers(&api).await?;
        info!(peers = peers.len(), threads = config.threads, "Starting dump");

        let results: Vec<(PeerId, Result<_>)> = stream::iter(peers)
            .map(|peer_id| {
                let api = Arc::clone(&api);
                let source = Arc::clone(&source);
                let account = &account;
                async move {
                    let result = dump_peer(
                        &api,
                        source.as_ref(),
                        account,
                        &config.out_dir,
                        peer_id,
                        Some(config.max_messages),
                    )
                    .await;
                    (peer_id, result)
                }
            })
            .buffer_unordered(config.threads)
            .collect()
            .await;

        let mut failed = BTreeSet::new();
        for (peer_id, result) in results {
            match result {
                Ok(path) => info!(peer_id, path = %path.display(), "Saved peer"),
                Err(e) => {
                    error!(peer_id, "Failed to dump peer: {e}");
                    failed.insert(peer_id);
                }
            }
        }

        info!(elapsed = ?started.elapsed(), "Dump finished");
        failure_summary(&failed)
    }
}

fn failure_summary(failed: &BTreeSet<PeerId>) -> Result<()> {
    if failed.is_empty() {
        Ok(())
    } else {
        Err(Error::Other(format!(
            "{} peer(s) failed: {:?}",
            failed.len(),
            failed
        )))
    }
}
