//! Command execution

use profile_defaults::DefaultsProvider;
use ruleset_store::{run_once, spawn_auto_refresh, LocalBridge, RuleSet, RulesetStore, StoreOptions};
use settings_common::{BuiltinLabels, IdGenerator, LabelResolver, LabelTable, UuidGenerator};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::cli::{Cli, Command, Section};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::logging::init_logging;

/// Everything a command needs
pub struct Context {
    pub store: Arc<RulesetStore>,
    pub ids: Box<dyn IdGenerator>,
    pub labels: Box<dyn LabelResolver>,
    pub auto_refresh: Duration,
}

impl Context {
    pub async fn open(config: &CliConfig) -> CliResult<Self> {
        let bridge = LocalBridge::with_timeout(&config.data_dir, config.download_timeout())?;
        let store = Arc::new(RulesetStore::new(
            Arc::new(bridge),
            StoreOptions {
                snapshot_path: config.snapshot_file.clone().into(),
                save_debounce: config.save_debounce(),
            },
        ));
        store.load().await;

        Ok(Self {
            store,
            ids: Box::new(UuidGenerator),
            labels: load_labels(config)?,
            auto_refresh: config.auto_refresh_interval(),
        })
    }
}

pub fn load_labels(config: &CliConfig) -> CliResult<Box<dyn LabelResolver>> {
    match &config.labels_file {
        Some(path) => {
            let table = LabelTable::load(path)?;
            info!(path = %path.display(), labels = table.len(), "Loaded label table");
            Ok(Box::new(table))
        }
        None => Ok(Box::new(BuiltinLabels)),
    }
}

/// Entry point used by the binary
pub async fn run(cli: Cli) -> CliResult<()> {
    let config = CliConfig::load(&cli.global)?;
    let _guard = init_logging(&config.logging)?;

    let ctx = Context::open(&config).await?;
    let output = execute(&ctx, cli.command).await?;
    ctx.store.flush().await?;

    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

/// Run one command and return what should be printed
pub async fn execute(ctx: &Context, command: Command) -> CliResult<String> {
    let store = &ctx.store;

    match command {
        Command::List { json } => {
            let items = store.list().await;
            if json {
                return Ok(serde_json::to_string_pretty(&items)?);
            }
            Ok(render_table(&items))
        }

        Command::Show { id } => {
            let rs = store
                .get_by_id(&id)
                .await
                .ok_or(CliError::UnknownRuleset(id))?;
            Ok(serde_json::to_string_pretty(&rs)?)
        }

        Command::Add {
            tag,
            source,
            format,
            path,
            url,
            disabled,
            refresh,
        } => {
            let rs = RuleSet::new(ctx.ids.as_ref(), tag, source.into(), path, url)
                .with_format(format.into())
                .disabled(disabled);
            let id = rs.id.clone();
            let mut lines = vec![format!("Added [{}] {}", rs.tag, id)];
            store.add(rs).await?;

            if refresh {
                lines.push(store.refresh_one(&id).await?);
            }
            Ok(lines.join("\n"))
        }

        Command::Edit {
            id,
            tag,
            source,
            format,
            path,
            url,
            enable,
            disable,
        } => {
            let mut rs = store
                .get_by_id(&id)
                .await
                .ok_or_else(|| CliError::UnknownRuleset(id.clone()))?;

            if let Some(tag) = tag {
                rs.tag = tag;
            }
            if let Some(source) = source {
                rs.source = source.into();
            }
            if let Some(format) = format {
                rs.format = format.into();
            }
            if let Some(path) = path {
                rs.location = path;
            }
            if let Some(url) = url {
                rs.origin = url;
            }
            if enable {
                rs.disabled = false;
            }
            if disable {
                rs.disabled = true;
            }

            let tag = rs.tag.clone();
            if !store.edit(&id, rs).await? {
                return Err(CliError::UnknownRuleset(id));
            }
            Ok(format!("Updated [{}]", tag))
        }

        Command::Delete { id } => {
            if store.delete(&id).await? {
                Ok(format!("Deleted {}", id))
            } else {
                Ok(format!("No ruleset {}, nothing deleted", id))
            }
        }

        Command::Refresh { id } => Ok(store.refresh_one(&id).await?),

        Command::RefreshAll => {
            let outcomes = store.refresh_all().await?;
            if outcomes.is_empty() {
                return Ok("No enabled rulesets".to_string());
            }
            let lines: Vec<String> = outcomes
                .iter()
                .map(|o| match &o.result {
                    Ok(message) => message.clone(),
                    Err(e) => format!("Ruleset [{}] failed: {}", o.tag, e),
                })
                .collect();
            Ok(lines.join("\n"))
        }

        Command::Watch { interval } => {
            let interval = interval.map(Duration::from_secs).unwrap_or(ctx.auto_refresh);
            watch(Arc::clone(store), interval, async {
                wait_for_signal(tokio::signal::ctrl_c()).await;
            })
            .await?;
            Ok("Stopped".to_string())
        }

        Command::Defaults { name, section } => {
            defaults_json(ctx.ids.as_ref(), ctx.labels.as_ref(), &name, section)
        }
    }
}

/// Sweep once, then keep refreshing every `interval` until `shutdown`
/// resolves. Pending snapshot writes are flushed before returning.
pub async fn watch<F>(store: Arc<RulesetStore>, interval: Duration, shutdown: F) -> CliResult<()>
where
    F: Future<Output = ()>,
{
    run_once(&store).await;
    let handle = spawn_auto_refresh(Arc::clone(&store), interval);

    shutdown.await;

    if let Some(handle) = handle {
        handle.abort();
    }
    store.flush().await?;
    Ok(())
}

/// Resolve once `signal` fires. Returns `false` when the listener could not
/// be installed, in which case shutdown starts immediately.
pub async fn wait_for_signal<F>(signal: F) -> bool
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            info!("Shutdown signal received");
            true
        }
        Err(e) => {
            warn!(error = %e, "Failed to listen for shutdown signal, stopping");
            false
        }
    }
}

pub fn defaults_json(
    ids: &dyn IdGenerator,
    labels: &dyn LabelResolver,
    name: &str,
    section: Section,
) -> CliResult<String> {
    let provider = DefaultsProvider::new(ids, labels);
    let value = match section {
        Section::Profile => serde_json::to_value(provider.profile(name))?,
        Section::General => serde_json::to_value(provider.general())?,
        Section::Advanced => serde_json::to_value(provider.advanced())?,
        Section::Tun => serde_json::to_value(provider.tun())?,
        Section::Dns => serde_json::to_value(provider.dns())?,
        Section::Groups => serde_json::to_value(provider.proxy_groups())?,
        Section::Rules => serde_json::to_value(provider.rules())?,
        Section::DnsRules => serde_json::to_value(provider.dns_rules())?,
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

fn render_table(items: &[RuleSet]) -> String {
    if items.is_empty() {
        return "No rulesets".to_string();
    }

    let mut lines = vec![format!(
        "{:<34} {:<20} {:<7} {:<9} {}",
        "ID", "TAG", "TYPE", "STATE", "UPDATED"
    )];
    for rs in items {
        let state = if rs.disabled { "disabled" } else { "enabled" };
        let updated = rs
            .last_updated
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());
        lines.push(format!(
            "{:<34} {:<20} {:<7} {:<9} {}",
            rs.id,
            rs.tag,
            rs.source.to_string(),
            state,
            updated
        ));
    }
    lines.join("\n")
}
