//! Property-based tests for consolidation, classification and layout.
//!
//! Snapshots are generated from the naming patterns the routing configuration
//! produces, with random ports and links between them, including orphaned
//! ports, monitor ports, dangling and duplicate links.

use proptest::prelude::*;
use pwgraph::core::naming::{INPUT_GROUP_ID_KEY, INPUT_GROUP_MARKER_KEY};
use pwgraph::prelude::*;
use std::collections::HashSet;

const CLASSES: [&str; 5] = [
    "Audio/Sink",
    "Audio/Source",
    "Stream/Output/Audio",
    "Stream/Input/Audio",
    "Midi/Bridge",
];

// servers sometimes report an empty channel label
const CHANNELS: [&str; 4] = ["FL", "FR", "LFE", ""];

fn node_name(kind: u8, slot: u8) -> String {
    match kind % 9 {
        0 => format!("fpp_fx_s{}", slot),
        1 => format!("fpp_fx_s{}_out", slot),
        2 => format!("fpp_group_g{}", slot),
        3 => format!("output.fpp_group_g{}_member", slot),
        4 => format!("fpp_input_i{}", slot),
        5 => format!("output.fpp_input_i{}_out", slot),
        6 => format!("input.fpp_loopback_ig{}_card", slot),
        7 => format!("alsa_output.card{}", slot),
        _ => format!("player {}", slot),
    }
}

type NodeSpec = (u8, u8, usize, bool);
type PortSpec = (usize, bool, usize, bool);
type LinkSpec = (usize, usize, bool);

fn build_snapshot(nodes: Vec<NodeSpec>, ports: Vec<PortSpec>, links: Vec<LinkSpec>) -> GraphSnapshot {
    let mut snapshot = GraphSnapshot::new();
    let mut names = HashSet::new();

    for (index, (kind, slot, class, running)) in nodes.into_iter().enumerate() {
        let name = node_name(kind, slot);
        if !names.insert(name.clone()) {
            continue;
        }
        let mut node = Node::new(NodeId(index as u32 + 1), name, CLASSES[class % CLASSES.len()]);
        if running {
            node = node.with_state(NodeState::Running);
        }
        match kind % 9 {
            4 => {
                node = node
                    .with_property(INPUT_GROUP_MARKER_KEY, true)
                    .with_property(INPUT_GROUP_ID_KEY, slot as i64);
            }
            6 => node = node.with_property(INPUT_GROUP_ID_KEY, slot as i64),
            _ => {}
        }
        snapshot = snapshot.with_node(node);
    }

    let node_ids: Vec<NodeId> = snapshot.nodes.iter().map(|n| n.id).collect();
    for (index, (owner, output, channel, monitor)) in ports.into_iter().enumerate() {
        // one owner slot past the end produces an orphan port
        let node_id = node_ids.get(owner % (node_ids.len() + 1)).copied().unwrap_or(NodeId(999));
        let direction = if output { PortDirection::Output } else { PortDirection::Input };
        let channel = CHANNELS[channel % CHANNELS.len()];
        let prefix = match (monitor, output) {
            (true, _) => "monitor",
            (false, true) => "output",
            (false, false) => "playback",
        };
        snapshot = snapshot.with_port(
            Port::new(PortId(1000 + index as u32), node_id, direction, format!("{}_{}", prefix, channel))
                .with_channel(channel),
        );
    }

    let port_count = snapshot.ports.len();
    for (from, to, dangling) in links {
        if port_count == 0 {
            break;
        }
        let out_port = &snapshot.ports[from % port_count];
        let in_port = &snapshot.ports[to % port_count];
        let in_port_id = if dangling { PortId(5000) } else { in_port.id };
        let link = Link::new(out_port.node_id, out_port.id, in_port.node_id, in_port_id);
        snapshot = snapshot.with_link(link);
    }

    snapshot
}

fn snapshot_strategy() -> impl Strategy<Value = GraphSnapshot> {
    (
        prop::collection::vec((0u8..9, 0u8..3, 0usize..5, any::<bool>()), 0..14),
        prop::collection::vec((0usize..16, any::<bool>(), 0usize..4, prop::bool::weighted(0.15)), 0..40),
        prop::collection::vec((0usize..40, 0usize..40, prop::bool::weighted(0.1)), 0..40),
    )
        .prop_map(|(nodes, ports, links)| build_snapshot(nodes, ports, links))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Consolidating an already consolidated graph changes nothing.
    #[test]
    fn consolidation_is_idempotent(snapshot in snapshot_strategy()) {
        let consolidator = Consolidator::new();
        let once = consolidator.consolidate(&snapshot);
        let (twice, report) = consolidator.consolidate_with_report(&once.to_snapshot());
        prop_assert_eq!(&once, &twice);
        prop_assert!(report.is_noop(), "second pass changed something: {}", report.summary());
    }

    /// Every consolidated graph satisfies the graph invariants.
    #[test]
    fn consolidated_graph_satisfies_invariants(snapshot in snapshot_strategy()) {
        let graph = consolidate(&snapshot);
        let report = ValidationPipeline::invariants_only().validate(&graph);
        prop_assert!(report.success, "violations: {:?}", report.errors);

        let mut pairs = HashSet::new();
        for link in graph.links() {
            prop_assert!(link.output_node_id != link.input_node_id);
            prop_assert!(pairs.insert(link.port_pair()));
        }
        for port in graph.ports() {
            prop_assert!(graph.has_node(port.node_id));
            prop_assert!(!port.name.starts_with("monitor_"));
        }
    }

    /// Classification is total and deterministic.
    #[test]
    fn classification_is_total(kind in 0u8..9, slot in 0u8..3, class in 0usize..5, noise in "[a-z_.]{0,12}") {
        let name = format!("{}{}", node_name(kind, slot), noise);
        let class = CLASSES[class];
        let stage = classify(&name, class);
        prop_assert!(stage.column() < 5);
        prop_assert_eq!(stage, classify(&name, class));
    }

    /// Identical graphs with empty caches lay out identically, with every node
    /// placed in its stage column.
    #[test]
    fn layout_is_deterministic(snapshot in snapshot_strategy()) {
        let graph = consolidate(&snapshot);
        let engine = LayoutEngine::default();
        let first = engine.layout(&graph, &mut PositionCache::new());
        let second = engine.layout(&graph, &mut PositionCache::new());
        prop_assert_eq!(&first, &second);

        prop_assert_eq!(first.len(), graph.node_count());
        for node in graph.nodes() {
            let placed = first.get(node.id).unwrap();
            prop_assert_eq!(placed.column, column(node));
            prop_assert_eq!(placed.x, engine.config().column_x(placed.column));
        }
    }

    /// A dragged node keeps its position across a refresh of the same snapshot.
    #[test]
    fn dragged_position_survives_refresh(snapshot in snapshot_strategy(), pick in 0usize..16) {
        let mut view = GraphView::default();
        view.load_snapshot(snapshot.clone());
        let ids: Vec<NodeId> = view.scene().unwrap().graph.node_ids().collect();
        prop_assume!(!ids.is_empty());
        let id = ids[pick % ids.len()];

        let others = |view: &GraphView| -> Vec<(NodeId, usize, usize, f64, f64)> {
            view.scene()
                .unwrap()
                .layout
                .nodes()
                .filter(|n| n.id != id)
                .map(|n| (n.id, n.column, n.order, n.x, n.y))
                .collect()
        };

        let before = view.scene().unwrap().layout.get(id).unwrap().clone();
        let others_before = others(&view);
        view.drag_node(id, 5.0, 5.0).unwrap();
        view.load_snapshot(snapshot);

        let after = view.scene().unwrap().layout.get(id).unwrap();
        prop_assert_eq!((after.x, after.y), (before.x + 5.0, before.y + 5.0));
        prop_assert_eq!((after.column, after.order), (before.column, before.order));
        prop_assert_eq!(others(&view), others_before);
    }
}
