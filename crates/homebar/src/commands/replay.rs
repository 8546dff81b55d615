//! `replay`: run a scripted session through the menu engine.
//!
//! The script is a JSON array of events. Each one maps to a single engine
//! input:
//!
//! ```json
//! [
//!   { "event": "apply", "id": "…", "kind": "hue", "value": 120.0 },
//!   { "event": "reachable", "id": "…", "reachable": false },
//!   { "event": "open" },
//!   { "event": "activate", "title": "Power" },
//!   { "event": "activate", "title": "Power", "generation": 1 },
//!   { "event": "rebuild" },
//!   { "event": "config", "use_scenes": true },
//!   { "event": "preferences_closed" }
//! ]
//! ```
//!
//! Activations name a menu item by title and are resolved against the
//! view current at that point of the script, unless a generation is given.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tabled::Tabled;
use tracing::{debug, info};

use homebar_core::{
    CharacteristicId, CharacteristicUpdate, CharacteristicValue, CoreError, DomainRequest, Engine,
    EventSender, MenuConfig, MenuView,
};

use crate::cli::{GlobalOpts, ReplayArgs};
use crate::error::CliError;
use crate::host::{RecordingBus, Signal, SnapshotProvider};
use crate::output;

use super::{tree, util};

// ── Script ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ScriptEvent {
    Apply(CharacteristicUpdate),
    Reachable {
        id: CharacteristicId,
        reachable: bool,
    },
    Open,
    Activate {
        title: String,
        #[serde(default)]
        generation: Option<u64>,
    },
    Rebuild,
    Config(MenuConfig),
    PreferencesClosed,
}

// ── Report ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Report {
    requests: Vec<DomainRequest>,
    signals: Vec<Signal>,
    view: Arc<MenuView>,
}

#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "Request")]
    request: &'static str,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl From<&DomainRequest> for RequestRow {
    fn from(r: &DomainRequest) -> Self {
        let (request, target, value) = match r {
            DomainRequest::Write { id, value } => ("write", id.to_string(), value_text(*value)),
            DomainRequest::Reload { ids } => (
                "reload",
                ids.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                String::new(),
            ),
            DomainRequest::TriggerScene { scene } => {
                ("trigger_scene", scene.to_string(), String::new())
            }
        };
        Self {
            request,
            target,
            value,
        }
    }
}

#[derive(Tabled)]
struct SignalRow {
    #[tabled(rename = "Signal")]
    signal: &'static str,
    #[tabled(rename = "Detail")]
    detail: String,
}

fn value_text(value: CharacteristicValue) -> String {
    match value {
        CharacteristicValue::Bool(b) => b.to_string(),
        CharacteristicValue::Int(n) => n.to_string(),
        CharacteristicValue::Float(x) => x.to_string(),
    }
}

fn table_report(report: &Report, tree_text: &str) -> String {
    let requests: Vec<RequestRow> = report.requests.iter().map(RequestRow::from).collect();
    let signals: Vec<SignalRow> = report
        .signals
        .iter()
        .map(|s| SignalRow {
            signal: s.name(),
            detail: s.detail(),
        })
        .collect();

    let mut sections = vec![format!("Generation {}", report.view.generation)];
    if !requests.is_empty() {
        sections.push(format!("Requests\n{}", output::render_table(&requests)));
    }
    if !signals.is_empty() {
        sections.push(format!("Signals\n{}", output::render_table(&signals)));
    }
    sections.push(format!("Menu\n{tree_text}"));
    sections.join("\n\n")
}

fn plain_report(report: &Report) -> String {
    report
        .requests
        .iter()
        .map(|r| {
            let row = RequestRow::from(r);
            format!("{} {} {}", row.request, row.target, row.value)
                .trim_end()
                .to_owned()
        })
        .chain(report.signals.iter().map(|s| s.name().to_owned()))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: &ReplayArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = util::load_snapshot(&args.home)?;
    let script: Vec<ScriptEvent> = util::read_json_file(&args.events, "event script")?;
    let mut cfg = util::load_config(global)?;

    let provider = Arc::new(SnapshotProvider::new(snapshot));
    let bus = Arc::new(RecordingBus::default());
    let engine = Engine::new(
        util::menu_config(&cfg, &args.home),
        provider.clone(),
        bus.clone(),
    );
    engine.start().await?;

    let result = run_script(&engine, &provider, script).await;
    engine.shutdown().await;
    let view = result?;

    let signals = bus.signals();
    if signals.contains(&Signal::FirstRun) && cfg.menu.reset_onboarding() {
        util::save_config(global, &cfg)?;
        info!("onboarding will be shown again");
    }

    let report = Report {
        requests: provider.requests(),
        signals,
        view,
    };
    let tree_text = tree::render(&report.view.tree, global)?;
    let out = output::render_single(
        global.output,
        &report,
        |r| table_report(r, &tree_text),
        plain_report,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Feed every script event to the engine and return the final view.
async fn run_script(
    engine: &Engine,
    provider: &SnapshotProvider,
    script: Vec<ScriptEvent>,
) -> Result<Arc<MenuView>, CliError> {
    let events = engine.sender();
    for event in script {
        debug!(?event, "replaying");
        match event {
            ScriptEvent::Apply(update) => {
                provider.observe(&update);
                push(engine, |tx| tx.apply(update)).await?;
            }
            ScriptEvent::Reachable { id, reachable } => {
                push(engine, |tx| tx.set_reachable(id, reachable)).await?;
            }
            ScriptEvent::Open => push(engine, EventSender::menu_will_open).await?,
            ScriptEvent::Activate { title, generation } => {
                engine.flush().await?;
                let view = engine.view();
                let (node, _) = view
                    .tree
                    .find(&title)
                    .ok_or_else(|| CliError::ItemNotFound { title: title.clone() })?;
                events.activate(generation.unwrap_or(view.generation), node)?;
            }
            ScriptEvent::Rebuild => push(engine, EventSender::rebuild).await?,
            ScriptEvent::Config(menu) => push(engine, |tx| tx.set_config(menu)).await?,
            ScriptEvent::PreferencesClosed => {
                push(engine, EventSender::preferences_closed).await?;
            }
        }
    }
    engine.flush().await?;
    Ok(engine.view())
}

/// Send one event, waiting for the queue to drain if it is full.
async fn push(
    engine: &Engine,
    send: impl Fn(&EventSender) -> Result<(), CoreError>,
) -> Result<(), CliError> {
    let events = engine.sender();
    match send(&events) {
        Err(CoreError::QueueFull) => {
            engine.flush().await?;
            send(&events)?;
        }
        other => other?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn script_events_decode_by_tag() {
        let script: Vec<ScriptEvent> = serde_json::from_value(json!([
            { "event": "open" },
            { "event": "activate", "title": "Power" },
            { "event": "activate", "title": "Power", "generation": 3 },
            { "event": "config", "use_scenes": true },
            { "event": "preferences_closed" }
        ]))
        .unwrap();

        assert_eq!(script[0], ScriptEvent::Open);
        assert_eq!(
            script[1],
            ScriptEvent::Activate {
                title: "Power".into(),
                generation: None
            }
        );
        assert_eq!(
            script[2],
            ScriptEvent::Activate {
                title: "Power".into(),
                generation: Some(3)
            }
        );
        assert_eq!(
            script[3],
            ScriptEvent::Config(MenuConfig::default().with_scenes(true))
        );
        assert_eq!(script[4], ScriptEvent::PreferencesClosed);
    }

    #[test]
    fn apply_event_carries_a_full_update() {
        let id = "00000000-0000-4000-8000-000000000001";
        let script: Vec<ScriptEvent> = serde_json::from_value(json!([
            { "event": "apply", "id": id, "kind": "brightness", "value": 40 }
        ]))
        .unwrap();
        match &script[0] {
            ScriptEvent::Apply(update) => {
                assert_eq!(update.value, CharacteristicValue::Int(40));
                assert!(update.enabled);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn plain_report_lists_requests_then_signals() {
        let id: CharacteristicId = "00000000-0000-4000-8000-000000000001".parse().unwrap();
        let report = Report {
            requests: vec![
                DomainRequest::Write {
                    id,
                    value: CharacteristicValue::Bool(false),
                },
                DomainRequest::Reload { ids: vec![id] },
            ],
            signals: vec![Signal::Preferences],
            view: Arc::new(MenuView::empty()),
        };
        assert_eq!(
            plain_report(&report),
            format!("write {id} false\nreload {id}\npreferences")
        );
    }
}
