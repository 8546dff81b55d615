//! `index`: show which nodes each characteristic is bound to.

use serde::Serialize;
use tabled::Tabled;

use homebar_core::{CharacteristicId, NodeId, build};

use crate::cli::{GlobalOpts, SnapshotArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct Binding {
    characteristic: CharacteristicId,
    nodes: Vec<NodeId>,
    titles: Vec<String>,
}

#[derive(Tabled)]
struct BindingRow {
    #[tabled(rename = "Characteristic")]
    characteristic: String,
    #[tabled(rename = "Nodes")]
    nodes: String,
    #[tabled(rename = "Titles")]
    titles: String,
}

impl From<&Binding> for BindingRow {
    fn from(b: &Binding) -> Self {
        Self {
            characteristic: b.characteristic.to_string(),
            nodes: b
                .nodes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            titles: b.titles.join(", "),
        }
    }
}

pub fn handle(args: &SnapshotArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = util::load_snapshot(args)?;
    let cfg = util::load_config(global)?;
    let built = build(&snapshot, &util::menu_config(&cfg, args));

    // Index order is unspecified; list by first bound node, then id.
    let mut bindings: Vec<Binding> = built
        .index
        .identifiers()
        .map(|id| {
            let nodes = built.index.lookup(id).to_vec();
            let titles = nodes
                .iter()
                .filter_map(|n| built.tree.get(*n))
                .map(|n| n.title.clone())
                .collect();
            Binding {
                characteristic: id,
                nodes,
                titles,
            }
        })
        .collect();
    bindings.sort_by_key(|b| (b.nodes.first().copied(), b.characteristic));

    let out = output::render_list(
        global.output,
        &bindings,
        |b| BindingRow::from(b),
        |b| b.characteristic.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
