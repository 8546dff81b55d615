//! `tree`: build and print the menu for a snapshot.

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::Tabled;

use homebar_core::{MenuNode, MenuTree, NodeId, NodeKind, build};

use crate::cli::{GlobalOpts, SnapshotArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "#")]
    id: String,
    #[tabled(rename = "Variant")]
    variant: &'static str,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Reachable")]
    reachable: String,
    #[tabled(rename = "Enabled")]
    enabled: &'static str,
    #[tabled(rename = "Icon")]
    icon: &'static str,
}

/// A node together with its position, for structured output.
#[derive(Serialize)]
pub struct NodeEntry<'a> {
    pub id: NodeId,
    #[serde(flatten)]
    pub node: &'a MenuNode,
}

fn row(entry: &NodeEntry<'_>, color: bool) -> NodeRow {
    let node = entry.node;
    let reachable = if node.binding.reachable { "yes" } else { "no" };
    NodeRow {
        id: entry.id.to_string(),
        variant: node.variant_name(),
        title: node.title.clone(),
        state: state(node, color),
        reachable: if color && !node.binding.reachable {
            reachable.red().to_string()
        } else {
            reachable.into()
        },
        enabled: if node.enabled { "yes" } else { "no" },
        icon: node.icon().map(<&'static str>::from).unwrap_or_default(),
    }
}

/// Short human-readable display state of a node.
fn state(node: &MenuNode, color: bool) -> String {
    let on_off = |on: bool| match (on, color) {
        (true, true) => "on".green().to_string(),
        (false, true) => "off".dimmed().to_string(),
        (true, false) => "on".into(),
        (false, false) => "off".into(),
    };
    match &node.kind {
        NodeKind::Toggle(t) => on_off(t.on),
        NodeKind::LightColor(l) => {
            let hsb = format!(
                "h {:.0} s {:.0} b {:.0}",
                l.hue, l.saturation, l.brightness
            );
            match l.on {
                Some(on) => format!("{} {hsb}", on_off(on)),
                None => hsb,
            }
        }
        NodeKind::Sensor(s) => s.display_reading().unwrap_or_else(|| "-".into()),
        _ => String::new(),
    }
}

/// Render a tree in the chosen format.
pub fn render(tree: &MenuTree, global: &GlobalOpts) -> Result<String, CliError> {
    let color = output::should_color(global.color);
    let entries: Vec<NodeEntry<'_>> = tree
        .iter()
        .map(|(id, node)| NodeEntry { id, node })
        .collect();
    output::render_list(
        global.output,
        &entries,
        |e| row(e, color),
        |e| format!("{} {}", e.id, e.node.title),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &SnapshotArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = util::load_snapshot(args)?;
    let cfg = util::load_config(global)?;
    let built = build(&snapshot, &util::menu_config(&cfg, args));

    if built.first_run && !global.quiet {
        eprintln!("Home has no rooms, groups or scenes with anything to show.");
    }
    let out = render(&built.tree, global)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
