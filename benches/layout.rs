use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pwgraph::prelude::*;
use std::hint::black_box;

/// A show-controller style graph: `groups` output groups, each fed by one
/// player stream through a delay effect and fanning out to `members` cards.
fn routing_snapshot(groups: u32, members: u32) -> GraphSnapshot {
    let mut snapshot = GraphSnapshot::new();
    let mut next_id = 1u32;
    let mut id = || {
        next_id += 1;
        next_id
    };

    for g in 0..groups {
        let player = id();
        let fx = id();
        let fx_out = id();
        let group = id();

        snapshot = snapshot
            .with_node(Node::new(NodeId(player), format!("player_{}", g), "Stream/Output/Audio"))
            .with_node(Node::new(NodeId(fx), format!("fpp_fx_g{}_s1", g), "Audio/Sink"))
            .with_node(Node::new(NodeId(fx_out), format!("fpp_fx_g{}_s1_out", g), "Stream/Output/Audio"))
            .with_node(Node::new(NodeId(group), format!("fpp_group_{}", g), "Audio/Sink"));

        for channel in ["FL", "FR"] {
            let (p_out, fx_in, fx_mon, fxo_out, g_in) = (id(), id(), id(), id(), id());
            snapshot = snapshot
                .with_port(Port::new(PortId(p_out), NodeId(player), PortDirection::Output, format!("output_{}", channel)).with_channel(channel))
                .with_port(Port::new(PortId(fx_in), NodeId(fx), PortDirection::Input, format!("playback_{}", channel)).with_channel(channel))
                .with_port(Port::new(PortId(fx_mon), NodeId(fx), PortDirection::Output, format!("monitor_{}", channel)).with_channel(channel))
                .with_port(Port::new(PortId(fxo_out), NodeId(fx_out), PortDirection::Output, format!("output_{}", channel)).with_channel(channel))
                .with_port(Port::new(PortId(g_in), NodeId(group), PortDirection::Input, format!("playback_{}", channel)).with_channel(channel))
                .with_link(Link::new(NodeId(player), PortId(p_out), NodeId(fx), PortId(fx_in)))
                .with_link(Link::new(NodeId(fx_out), PortId(fxo_out), NodeId(group), PortId(g_in)));
        }

        for m in 0..members {
            let member = id();
            let card = id();
            snapshot = snapshot
                .with_node(Node::new(NodeId(member), format!("output.fpp_group_{}_card{}", g, m), "Stream/Output/Audio"))
                .with_node(Node::new(NodeId(card), format!("alsa_output.g{}_card{}", g, m), "Audio/Sink"));
            for channel in ["FL", "FR"] {
                let (m_out, c_in) = (id(), id());
                snapshot = snapshot
                    .with_port(Port::new(PortId(m_out), NodeId(member), PortDirection::Output, format!("output_{}", channel)).with_channel(channel))
                    .with_port(Port::new(PortId(c_in), NodeId(card), PortDirection::Input, format!("playback_{}", channel)).with_channel(channel))
                    .with_link(Link::new(NodeId(member), PortId(m_out), NodeId(card), PortId(c_in)));
            }
        }
    }

    snapshot
}

fn bench_consolidate(c: &mut Criterion) {
    let mut group = c.benchmark_group("consolidate");
    for groups in [4u32, 16, 64] {
        let snapshot = routing_snapshot(groups, 4);
        let consolidator = Consolidator::new();
        group.bench_with_input(BenchmarkId::from_parameter(groups), &snapshot, |b, snapshot| {
            b.iter(|| consolidator.consolidate(black_box(snapshot)))
        });
    }
    group.finish();
}

fn bench_refresh_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("refresh_cycle");
    for groups in [4u32, 16, 64] {
        let snapshot = routing_snapshot(groups, 4);
        group.bench_with_input(BenchmarkId::from_parameter(groups), &snapshot, |b, snapshot| {
            b.iter(|| {
                let mut view = GraphView::default();
                view.load_snapshot(black_box(snapshot.clone()));
                view.render_model()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_consolidate, bench_refresh_cycle);
criterion_main!(benches);
