//! Replay command: drives a list coordinator from a gesture script.
//!
//! Scripts are line based. Blank lines and lines starting with `#` are
//! skipped. Time only moves on `wait`, so the output is deterministic.
//!
//! ```text
//! tap wf-2            # plain tap
//! tap-toggle wf-4
//! tap-range wf-6
//! select-all
//! key <Control>a      # any accelerator known to the keybindings
//! delete
//! drag 0 80           # row index, vertical translation in pixels
//! drop WF|a,b 3 after # payload, target row, before|after
//! wait 100            # advance the clock in milliseconds
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use listkit_core::config::CoordinatorSettings;
use listkit_core::coordinator::{CommandOutcome, FocusHandoff, ListCoordinator};
use listkit_core::debounce::ManualScheduler;
use listkit_core::focus::FocusBroker;
use listkit_core::models::apply_move;
use listkit_core::payload::ListKind;
use listkit_core::reorder::{DropOutcome, DropPosition};
use listkit_core::selection::SelectionModifier;
use listkit_core::tracing::span_names;
use listkit_core::trace_operation;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::load_settings;

/// One parsed script line
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    /// Tap on a row by id
    Tap {
        /// Row id
        id: String,
        /// Modifier held during the tap
        modifier: SelectionModifier,
    },
    /// Select every row
    SelectAll,
    /// Press an accelerator
    Key(String),
    /// Delete the selected rows
    Delete,
    /// Drag the row at `index` by `translation` pixels and release
    Drag {
        /// Row the drag starts on
        index: usize,
        /// Vertical pointer offset at release
        translation: f64,
    },
    /// Drop a payload onto a row
    Drop {
        /// Wire payload
        payload: String,
        /// Target row index
        target: usize,
        /// Half of the target row
        position: DropPosition,
    },
    /// Advance the clock
    Wait(u64),
}

fn parse_arg<T: FromStr>(raw: &str, what: &str) -> Result<T, String> {
    raw.parse().map_err(|_| format!("invalid {what} '{raw}'"))
}

fn parse_position(raw: &str) -> Result<DropPosition, String> {
    match raw {
        "before" => Ok(DropPosition::Before),
        "after" => Ok(DropPosition::After),
        other => Err(format!("drop position must be 'before' or 'after', got '{other}'")),
    }
}

fn tap(id: &str, modifier: SelectionModifier) -> ScriptCommand {
    ScriptCommand::Tap {
        id: id.to_string(),
        modifier,
    }
}

impl FromStr for ScriptCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| "empty line".to_string())?;
        let args: Vec<&str> = words.collect();

        let command = match (verb, args.as_slice()) {
            ("tap", [id]) => tap(id, SelectionModifier::None),
            ("tap-toggle", [id]) => tap(id, SelectionModifier::Toggle),
            ("tap-range", [id]) => tap(id, SelectionModifier::Range),
            ("select-all", []) => Self::SelectAll,
            ("key", [accel]) => Self::Key((*accel).to_string()),
            ("delete", []) => Self::Delete,
            ("drag", [index, translation]) => {
                let translation: f64 = parse_arg(translation, "translation")?;
                if !translation.is_finite() {
                    return Err(format!("invalid translation '{translation}'"));
                }
                Self::Drag {
                    index: parse_arg(index, "row index")?,
                    translation,
                }
            }
            ("drop", [payload, target, rest @ ..]) if rest.len() <= 1 => Self::Drop {
                payload: (*payload).to_string(),
                target: parse_arg(target, "target row")?,
                position: rest
                    .first()
                    .map_or(Ok(DropPosition::Before), |raw| parse_position(raw))?,
            },
            ("wait", [ms]) => Self::Wait(parse_arg(ms, "milliseconds")?),
            (
                "tap" | "tap-toggle" | "tap-range" | "select-all" | "key" | "delete" | "drag"
                | "drop" | "wait",
                _,
            ) => return Err(format!("wrong number of arguments for '{verb}'")),
            _ => return Err(format!("unknown command '{verb}'")),
        };
        Ok(command)
    }
}

/// Parses a script, keeping 1-based line numbers
pub fn parse_script(source: &str) -> Result<Vec<(usize, ScriptCommand)>, CliError> {
    source
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            text.parse()
                .map(|command| (line, command))
                .map_err(|message| CliError::Script { line, message })
        })
        .collect()
}

/// Something observable that happened during a replay
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ReplayEvent {
    /// A focus request was broadcast
    Focus {
        /// Requested row
        id: String,
        /// Virtual time
        at_ms: u64,
    },
    /// The selection settled after the quiet window
    Settled {
        /// Settled selection, sorted
        selection: Vec<String>,
        /// Virtual time
        at_ms: u64,
    },
    /// A reorder was committed
    Commit {
        /// Moved offsets
        from: Vec<usize>,
        /// Post-removal destination
        to: usize,
    },
    /// Rows arrived from another list
    Insert {
        /// Prefix of the source list
        source_prefix: String,
        /// Transferred ids
        ids: Vec<String>,
    },
    /// Rows were removed
    Delete {
        /// Removed ids
        ids: Vec<String>,
    },
    /// Focus left the list
    Handoff {
        /// "next" or "previous"
        direction: String,
    },
    /// A line had no effect
    Ignored {
        /// Script line
        line: usize,
    },
}

impl fmt::Display for ReplayEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Focus { id, at_ms } => write!(f, "[{at_ms}ms] focus {id}"),
            Self::Settled { selection, at_ms } => {
                write!(f, "[{at_ms}ms] settled [{}]", selection.join(", "))
            }
            Self::Commit { from, to } => write!(f, "commit {from:?} -> {to}"),
            Self::Insert { source_prefix, ids } => {
                write!(f, "insert from {source_prefix} [{}]", ids.join(", "))
            }
            Self::Delete { ids } => write!(f, "delete [{}]", ids.join(", ")),
            Self::Handoff { direction } => write!(f, "handoff {direction}"),
            Self::Ignored { line } => write!(f, "line {line} ignored"),
        }
    }
}

/// Final state of a replay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    /// List contents after the script
    pub items: Vec<String>,
    /// Selected ids in list order
    pub selected: Vec<String>,
    /// Everything that happened, in order
    pub events: Vec<ReplayEvent>,
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn sorted(ids: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut ids: Vec<String> = ids.into_iter().collect();
    ids.sort();
    ids
}

/// Runs `script` against `items` on a virtual clock.
///
/// The clock is advanced by one quiet window after the last line so a
/// pending selection always settles before the report is built.
pub fn run_script(
    settings: &CoordinatorSettings,
    kind: ListKind,
    mut items: Vec<String>,
    script: &[(usize, ScriptCommand)],
) -> ReplayReport {
    let _span = trace_operation!(
        span_names::SCRIPT_REPLAY,
        list_kind = %kind,
        item_count = items.len()
    )
    .entered();

    let scheduler = ManualScheduler::new();
    let broker = FocusBroker::new();
    let events = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&events);
    let clock = scheduler.clone();
    broker.subscribe(move |id: &String| {
        sink.borrow_mut().push(ReplayEvent::Focus {
            id: id.clone(),
            at_ms: millis(clock.now()),
        });
    });

    let commit_sink = Rc::clone(&events);
    let insert_sink = Rc::clone(&events);
    let settled_sink = Rc::clone(&events);
    let clock = scheduler.clone();
    let mut coordinator: ListCoordinator<String, ManualScheduler> =
        ListCoordinator::new(kind, settings, broker, scheduler.clone())
            .on_commit(move |instruction| {
                commit_sink.borrow_mut().push(ReplayEvent::Commit {
                    from: instruction.source_offsets.iter().copied().collect(),
                    to: instruction.destination,
                });
            })
            .on_insert(move |instruction| {
                insert_sink.borrow_mut().push(ReplayEvent::Insert {
                    source_prefix: instruction.source_prefix.clone(),
                    ids: instruction.ids.clone(),
                });
            })
            .on_selection_changed(move |selection: HashSet<String>| {
                settled_sink.borrow_mut().push(ReplayEvent::Settled {
                    selection: sorted(selection),
                    at_ms: millis(clock.now()),
                });
            });

    for (line, command) in script {
        tracing::debug!(line, ?command, "Replaying script line");
        let changed = match command {
            ScriptCommand::Tap { id, modifier } => {
                let before = coordinator.selection().state().clone();
                coordinator.tap(&items, id, *modifier);
                *coordinator.selection().state() != before
            }
            ScriptCommand::SelectAll => {
                coordinator.select_all(&items);
                !items.is_empty()
            }
            ScriptCommand::Key(accel) => match coordinator.handle_accel(accel, &items) {
                CommandOutcome::Delete(ids) => {
                    remove_rows(&mut coordinator, &mut items, &events, ids);
                    true
                }
                CommandOutcome::FocusHandoff(direction) => {
                    let direction = match direction {
                        FocusHandoff::Next => "next",
                        FocusHandoff::Previous => "previous",
                    };
                    events.borrow_mut().push(ReplayEvent::Handoff {
                        direction: direction.to_string(),
                    });
                    true
                }
                CommandOutcome::SelectionChanged | CommandOutcome::Moved(_) => true,
                CommandOutcome::Unhandled => false,
            },
            ScriptCommand::Delete => {
                let ids = coordinator.delete_selection(&items);
                let removed = !ids.is_empty();
                if removed {
                    remove_rows(&mut coordinator, &mut items, &events, ids);
                }
                removed
            }
            ScriptCommand::Drag { index, translation } => {
                if coordinator.begin_drag(&items, *index) {
                    coordinator.update_drag(*translation);
                    coordinator
                        .end_drag()
                        .map(|instruction| apply_move(&mut items, &instruction))
                        .is_some()
                } else {
                    false
                }
            }
            ScriptCommand::Drop {
                payload,
                target,
                position,
            } => match coordinator.drop_payload(&items, payload, *target, *position) {
                DropOutcome::Reorder(instruction) => {
                    apply_move(&mut items, &instruction);
                    true
                }
                DropOutcome::Insert(instruction) => {
                    for id in instruction.ids {
                        if !items.contains(&id) {
                            items.push(id);
                        }
                    }
                    true
                }
                DropOutcome::Ignored => false,
            },
            ScriptCommand::Wait(ms) => {
                scheduler.advance(Duration::from_millis(*ms));
                true
            }
        };
        if !changed {
            events.borrow_mut().push(ReplayEvent::Ignored { line: *line });
        }
    }
    scheduler.advance(settings.quiet_window());

    let selected = coordinator.selection().selected_in_order(&items);
    drop(coordinator);
    ReplayReport {
        items,
        selected,
        events: events.take(),
    }
}

fn remove_rows(
    coordinator: &mut ListCoordinator<String, ManualScheduler>,
    items: &mut Vec<String>,
    events: &RefCell<Vec<ReplayEvent>>,
    ids: Vec<String>,
) {
    items.retain(|item| !ids.contains(item));
    events.borrow_mut().push(ReplayEvent::Delete { ids });
    coordinator.prune(items);
}

fn read_script(script: &Path) -> Result<String, CliError> {
    if script == Path::new("-") {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        Ok(std::fs::read_to_string(script)?)
    }
}

fn validate_items(items: &[String]) -> Result<(), CliError> {
    let mut seen = HashSet::new();
    for item in items {
        if item.is_empty() {
            return Err(CliError::Usage("list items must not be empty".to_string()));
        }
        if !seen.insert(item) {
            return Err(CliError::Usage(format!("duplicate list item '{item}'")));
        }
    }
    Ok(())
}

fn print_report(report: &ReplayReport, format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => {
            println!("items: {}", report.items.join(", "));
            println!("selected: {}", report.selected.join(", "));
            if report.events.is_empty() {
                println!("events: none");
            } else {
                println!("events:");
                for event in &report.events {
                    println!("  {event}");
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

/// Replays a script file and prints the resulting list, selection and events
pub fn cmd_replay(
    config_path: Option<&Path>,
    items: Vec<String>,
    kind: ListKind,
    script: &Path,
    format: OutputFormat,
) -> Result<(), CliError> {
    validate_items(&items)?;
    let settings = load_settings(config_path)?;
    let commands = parse_script(&read_script(script)?)?;
    let report = run_script(&settings, kind, items, &commands);
    print_report(&report, format)
}
