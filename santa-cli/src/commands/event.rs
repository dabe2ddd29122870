//! Event management commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use comfy_table::Table;
use santa_core::{
    AssignmentEngine, EventError, EventStore, FileEventStore, GiftExchangeEvent, MessageKind,
    RosterEntry, ThreadEntry,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::config::{ConfigLoader, SantaConfig};

/// Event management arguments
#[derive(Args, Debug)]
pub struct EventArgs {
    /// Directory holding event documents (overrides config)
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: EventCommands,
}

/// Event subcommands
#[derive(Subcommand, Debug)]
pub enum EventCommands {
    /// Create a new event
    Create {
        /// Event display name
        name: String,
        /// Spending limit shown to participants
        #[arg(long)]
        money_limit: Option<String>,
    },
    /// Rename an event
    Rename {
        /// Event ID
        id: Uuid,
        /// New display name
        name: String,
    },
    /// Delete an event along with its roster and messages
    Delete {
        /// Event ID
        id: Uuid,
    },
    /// Replace an event's roster from a TOML or JSON file
    Roster {
        /// Event ID
        id: Uuid,
        /// Roster file with [[participants]] entries
        file: PathBuf,
    },
    /// Assign targets and start the event
    Start {
        /// Event ID
        id: Uuid,
        /// Fixed search-order seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// End a running event
    Stop {
        /// Event ID
        id: Uuid,
    },
    /// Create the next round, carrying targets over as history
    Sequel {
        /// Event ID
        id: Uuid,
    },
    /// List all events
    List,
    /// Show every giver and target (administrators only)
    Report {
        /// Event ID
        id: Uuid,
    },
    /// Reveal a participant's target to them
    Peek {
        /// Event ID
        id: Uuid,
        /// Participant display name
        name: String,
    },
    /// Show who gives to a participant, once the giver knows
    Giver {
        /// Event ID
        id: Uuid,
        /// Participant display name
        name: String,
        /// Show the giver even if they haven't looked at their target yet
        #[arg(long)]
        reveal: bool,
    },
    /// Replace a participant's gift ideas (none clears them)
    Ideas {
        /// Event ID
        id: Uuid,
        /// Participant display name
        name: String,
        /// Gift ideas
        ideas: Vec<String>,
    },
    /// Send an anonymous message to your target or your giver
    Message {
        /// Event ID
        id: Uuid,
        /// Sender's display name
        name: String,
        /// Message text
        content: String,
        /// Who receives the message
        #[arg(long, value_enum, default_value = "target")]
        to: Counterpart,
    },
    /// Show the conversation with your target or your giver, newest first
    Thread {
        /// Event ID
        id: Uuid,
        /// Participant display name
        name: String,
        /// Which conversation to show
        #[arg(long, value_enum, default_value = "target")]
        with: Counterpart,
    },
}

/// The other side of a giver/target pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Counterpart {
    /// The participant you give to
    Target,
    /// The anonymous participant giving to you
    Giver,
}

/// Roster file layout
#[derive(Debug, Deserialize)]
struct RosterFile {
    participants: Vec<RosterEntry>,
}

/// Run event command
pub fn run(args: EventArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let dir = args
        .dir
        .clone()
        .unwrap_or_else(|| config.event.events_dir.clone());
    let store = FileEventStore::new(dir);

    match args.command {
        EventCommands::Create { name, money_limit } => {
            create_event(&store, &config, name, money_limit)
        }
        EventCommands::Rename { id, name } => rename_event(&store, id, name),
        EventCommands::Delete { id } => delete_event(&store, id),
        EventCommands::Roster { id, file } => update_roster(&store, id, &file),
        EventCommands::Start { id, seed } => start_event(&store, &config, id, seed),
        EventCommands::Stop { id } => stop_event(&store, id),
        EventCommands::Sequel { id } => create_sequel(&store, id),
        EventCommands::List => list_events(&store),
        EventCommands::Report { id } => report(&store, id),
        EventCommands::Peek { id, name } => peek(&store, id, &name),
        EventCommands::Giver { id, name, reveal } => show_giver(&store, id, &name, reveal),
        EventCommands::Ideas { id, name, ideas } => update_ideas(&store, id, &name, ideas),
        EventCommands::Message {
            id,
            name,
            content,
            to,
        } => send_message(&store, id, &name, to, content),
        EventCommands::Thread { id, name, with } => show_thread(&store, id, &name, with),
    }
}

fn create_event(
    store: &impl EventStore,
    config: &SantaConfig,
    name: String,
    money_limit: Option<String>,
) -> Result<()> {
    let money_limit = money_limit.or_else(|| Some(config.event.money_limit.clone()));
    let event = GiftExchangeEvent::new(name, money_limit)?;
    store.save(&event)?;
    info!(event_id = %event.id, "Created event");
    println!("{}", event.id);
    Ok(())
}

fn rename_event(store: &FileEventStore, id: Uuid, name: String) -> Result<()> {
    let event = store.locked(id, || -> Result<GiftExchangeEvent> {
        let mut event = store.load(id)?;
        event.rename(name)?;
        store.save(&event)?;
        Ok(event)
    })?;
    println!("Event renamed to '{}'", event.display_name);
    Ok(())
}

fn delete_event(store: &FileEventStore, id: Uuid) -> Result<()> {
    let event = store.locked(id, || -> Result<GiftExchangeEvent> {
        let event = store.load(id)?;
        store.delete(id)?;
        Ok(event)
    })?;
    info!(event_id = %id, "Deleted event");
    println!(
        "Deleted '{}' ({} participants, {} messages)",
        event.display_name,
        event.participants.len(),
        event.messages.len()
    );
    Ok(())
}

fn update_roster(store: &FileEventStore, id: Uuid, file: &Path) -> Result<()> {
    let entries = parse_roster(file)?;
    let changes = store.locked(id, || -> Result<_> {
        let mut event = store.load(id)?;
        let changes = event.update_roster(entries)?;
        store.save(&event)?;
        Ok(changes)
    })?;

    println!(
        "Roster updated: {} added, {} updated, {} removed",
        changes.added.len(),
        changes.updated.len(),
        changes.removed.len()
    );
    for name in &changes.removed {
        println!("  removed {}", name);
    }
    Ok(())
}

fn start_event(
    store: &FileEventStore,
    config: &SantaConfig,
    id: Uuid,
    seed: Option<u64>,
) -> Result<()> {
    let mut engine_config = config.engine.clone();
    if let Some(seed) = seed {
        engine_config.seed = Some(seed);
    }
    let mut engine = AssignmentEngine::new(engine_config);

    // Nothing is saved unless every participant got a valid target
    let (event, stats) = store.locked(id, || -> Result<_> {
        let mut event = store.load(id)?;
        let stats = match event.start(&mut engine) {
            Ok(stats) => stats,
            Err(EventError::Assignment(e)) => {
                anyhow::bail!("Could not generate a valid assignment: {}", e)
            }
            Err(e) => return Err(e.into()),
        };
        store.save(&event)?;
        Ok((event, stats))
    })?;

    println!(
        "Started '{}' with {} participants ({} search steps)",
        event.display_name,
        event.participants.len(),
        stats.steps
    );
    Ok(())
}

fn stop_event(store: &FileEventStore, id: Uuid) -> Result<()> {
    let event = store.locked(id, || -> Result<GiftExchangeEvent> {
        let mut event = store.load(id)?;
        event.stop()?;
        store.save(&event)?;
        Ok(event)
    })?;
    println!("Event '{}' ended", event.display_name);
    Ok(())
}

fn create_sequel(store: &impl EventStore, id: Uuid) -> Result<()> {
    let parent = store.load(id)?;
    let sequel = parent.sequel();
    store.save(&sequel)?;
    info!(event_id = %sequel.id, previous_event = %parent.id, "Created sequel");
    println!("{}", sequel.id);
    Ok(())
}

fn list_events(store: &impl EventStore) -> Result<()> {
    let events = store.list()?;
    if events.is_empty() {
        println!("No events");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Status", "Participants", "Limit"]);
    for event in &events {
        table.add_row(vec![
            event.id.to_string(),
            event.display_name.clone(),
            event.status.to_string(),
            event.participants.len().to_string(),
            event.money_limit.clone(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn report(store: &impl EventStore, id: Uuid) -> Result<()> {
    let event = store.load(id)?;
    println!("{} ({}, limit {})", event.display_name, event.status, event.money_limit);
    println!("{}", report_table(&event));
    Ok(())
}

fn peek(store: &FileEventStore, id: Uuid, name: &str) -> Result<()> {
    let (event, target) = store.locked(id, || -> Result<_> {
        let mut event = store.load(id)?;
        let target = event.peek_target(name)?;
        store.save(&event)?;
        Ok((event, target))
    })?;
    println!("{} gives to {} (limit {})", name, target, event.money_limit);
    Ok(())
}

fn show_giver(store: &impl EventStore, id: Uuid, name: &str, reveal: bool) -> Result<()> {
    let event = store.load(id)?;
    match event.giver_of(name, reveal)? {
        Some(giver) => println!("{} receives from {}", name, giver.display_name),
        None => println!("{}'s giver hasn't looked at their assignment yet", name),
    }
    Ok(())
}

fn update_ideas(store: &FileEventStore, id: Uuid, name: &str, ideas: Vec<String>) -> Result<()> {
    let count = store.locked(id, || -> Result<usize> {
        let mut event = store.load(id)?;
        event.update_ideas(name, ideas)?;
        store.save(&event)?;
        Ok(event.participant(name).map_or(0, |p| p.idea_list.len()))
    })?;
    println!("{} now has {} gift idea(s)", name, count);
    Ok(())
}

fn send_message(
    store: &FileEventStore,
    id: Uuid,
    name: &str,
    to: Counterpart,
    content: String,
) -> Result<()> {
    store.locked(id, || -> Result<()> {
        let mut event = store.load(id)?;
        match to {
            Counterpart::Target => event.send_to_target(name, content)?,
            Counterpart::Giver => event.send_to_giver(name, content)?,
        }
        store.save(&event)?;
        Ok(())
    })?;
    match to {
        Counterpart::Target => println!("Message sent to your target"),
        Counterpart::Giver => println!("Message sent to your giver"),
    }
    Ok(())
}

fn show_thread(store: &impl EventStore, id: Uuid, name: &str, with: Counterpart) -> Result<()> {
    let event = store.load(id)?;
    let entries = match with {
        Counterpart::Target => event.thread_with_target(name)?,
        Counterpart::Giver => event.thread_with_giver(name)?,
    };
    if entries.is_empty() {
        println!("No messages");
        return Ok(());
    }
    println!("{}", thread_table(&entries, with));
    Ok(())
}

/// Read roster entries from a `.json` file, or TOML for any other extension.
fn parse_roster(path: &Path) -> Result<Vec<RosterEntry>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster {}", path.display()))?;
    let roster: RosterFile = if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse roster {}", path.display()))?
    } else {
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse roster {}", path.display()))?
    };
    Ok(roster.participants)
}

fn report_table(event: &GiftExchangeEvent) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Giver", "Family", "Target", "Knows target"]);
    for participant in &event.participants {
        table.add_row(vec![
            participant.display_name.clone(),
            participant.family().unwrap_or("-").to_string(),
            participant.target.clone().unwrap_or_else(|| "-".to_string()),
            if participant.is_target_known { "yes" } else { "no" }.to_string(),
        ]);
    }
    table
}

/// Label each message from `viewer`'s side of the pair; names never appear.
fn thread_table(entries: &[ThreadEntry], viewer_with: Counterpart) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Sent", "From", "Message"]);
    for entry in entries {
        let from_me = matches!(
            (viewer_with, entry.kind),
            (Counterpart::Target, MessageKind::ToTarget) | (Counterpart::Giver, MessageKind::ToGiver)
        );
        let from = match (from_me, viewer_with) {
            (true, _) => "You",
            (false, Counterpart::Target) => "Your target",
            (false, Counterpart::Giver) => "Your giver",
        };
        table.add_row(vec![
            entry.sent_at.format("%Y-%m-%d %H:%M").to_string(),
            from.to_string(),
            entry.content.clone(),
        ]);
    }
    table
}
