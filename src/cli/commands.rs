//! Command dispatch and execution

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use clap::CommandFactory;
use clap_complete::generate;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::PlacementService;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{ContainerRef, Item};
use crate::infrastructure::{load_catalog_with_format, InMemoryStore};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Resolve {
            container,
            name,
            attrs,
            date,
            revision,
            quiet,
        }) => _resolve(
            cli,
            container.as_deref(),
            name,
            attrs,
            date.as_deref(),
            *revision,
            *quiet,
        ),
        Some(Commands::Show) => _show(cli),
        Some(Commands::Tree) => _tree(cli),
        Some(Commands::Config { command }) => _config(command),
        Some(Commands::Info) => _info(),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "rehome", &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

/// Resolve the catalog path: --catalog beats configured default.
fn catalog_path(cli: &Cli, settings: &Settings) -> PathBuf {
    cli.catalog
        .clone()
        .unwrap_or_else(|| settings.catalog.clone())
}

fn load_store(cli: &Cli) -> CliResult<(InMemoryStore, Settings)> {
    let settings = Settings::load().map_err(CliError::from)?;
    let path = catalog_path(cli, &settings);
    let store = load_catalog_with_format(&path, &settings.date_format)?;
    Ok((store, settings))
}

fn parse_item(name: &str, attrs: &[String], date: Option<&str>) -> CliResult<Item> {
    let mut item = Item::new(name);
    for attr in attrs {
        let (key, value) = attr.split_once('=').ok_or_else(|| {
            CliError::InvalidArgs(format!("attribute must be key=value: '{attr}'"))
        })?;
        item = item.with_attribute(key, value);
    }
    if let Some(date) = date {
        item = item.with_created_at(parse_timestamp(date)?);
    }
    Ok(item)
}

/// Accepts RFC 3339 or a bare date (interpreted as midnight UTC).
fn parse_timestamp(input: &str) -> CliResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(ts) = date.and_hms_opt(0, 0, 0) {
            return Ok(ts.and_utc());
        }
    }
    Err(CliError::InvalidArgs(format!(
        "cannot parse date '{input}' (expected RFC 3339 or YYYY-MM-DD)"
    )))
}

#[instrument(skip(cli, attrs))]
fn _resolve(
    cli: &Cli,
    container: Option<&str>,
    name: &str,
    attrs: &[String],
    date: Option<&str>,
    revision: Option<u64>,
    quiet: bool,
) -> CliResult<()> {
    let (store, _settings) = load_store(cli)?;
    let item = parse_item(name, attrs, date)?;
    debug!("resolve: container={:?}, item={:?}", container, item);

    let requested = container.map(|id| match revision {
        Some(rev) => ContainerRef::with_revision(id, rev),
        None => ContainerRef::new(id),
    });

    let service = PlacementService::new(Arc::new(store));
    let decision = service.decide(requested.as_ref(), &item)?;

    let resolved_display = decision
        .resolved
        .as_ref()
        .map(|r| r.id.clone())
        .unwrap_or_else(|| "(none)".to_string());

    if quiet {
        output::info(&resolved_display);
        return Ok(());
    }

    let requested_display = decision
        .requested
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "(none)".to_string());
    output::action("requested", &requested_display);
    output::action("resolved", &resolved_display);
    if decision.changed {
        output::success("placement changed, move the item");
    } else {
        output::detail("placement unchanged");
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _show(cli: &Cli) -> CliResult<()> {
    let (store, settings) = load_store(cli)?;
    output::header(&format!(
        "catalog: {}",
        catalog_path(cli, &settings).display()
    ));
    for id in store.container_ids() {
        match store.policy_kind(id) {
            Some(kind) => output::detail(&format!("{id}  [{kind}]")),
            None => output::detail(id),
        }
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _tree(cli: &Cli) -> CliResult<()> {
    let (store, _settings) = load_store(cli)?;
    let tree = build_id_tree(&store.container_ids());
    output::info(&tree);
    Ok(())
}

/// Nest `/`-separated container ids into a display tree.
fn build_id_tree(ids: &[&str]) -> Tree<String> {
    fn insert<'a>(children: &mut Vec<Tree<String>>, mut segments: impl Iterator<Item = &'a str>) {
        let Some(head) = segments.next() else {
            return;
        };
        let pos = children.iter().position(|c| c.root == head);
        let node = match pos {
            Some(pos) => &mut children[pos],
            None => {
                children.push(Tree::new(head.to_string()));
                children.last_mut().unwrap()
            }
        };
        insert(&mut node.leaves, segments);
    }

    let mut root = Tree::new(".".to_string());
    for id in ids {
        insert(&mut root.leaves, id.split('/'));
    }
    root
}

fn _config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load().map_err(CliError::from)?;
            output::info(&settings.to_toml().map_err(CliError::from)?);
            Ok(())
        }
        ConfigCommands::Init => {
            let Some(path) = global_config_path() else {
                return Err(CliError::Usage(
                    "cannot determine config directory".to_string(),
                ));
            };
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| crate::infrastructure::InfraError::io("create config dir", e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| crate::infrastructure::InfraError::io("write config", e))?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&path.display()),
                None => output::info("(no config directory)"),
            }
            Ok(())
        }
    }
}

fn _info() -> CliResult<()> {
    let cmd = Cli::command();
    if let Some(author) = cmd.get_author() {
        output::action("author", &author);
    }
    if let Some(version) = cmd.get_version() {
        output::action("version", &version);
    }
    Ok(())
}
