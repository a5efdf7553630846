use futures::executor::block_on;
use futures::stream::{self, StreamExt};
use narwhal::transition::{animate, animate_with_token, progress};
use narwhal::{
    Error, Graph, LayoutManager, LayoutOptions, Position, PositionAssignment,
    TransitionGeneration,
};
use std::time::Duration;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn single(id: &str, p: Position) -> PositionAssignment {
    let mut out = PositionAssignment::new();
    out.insert(id.to_string(), p);
    out
}

#[test]
fn zero_duration_resolves_to_destination_on_first_frame() {
    let from = single("n", Position::new(3.0, -7.0, 1.5));
    let to = single("n", Position::new(-12.25, 40.0, 0.0));
    let mut calls = Vec::new();

    let done = block_on(animate(
        &from,
        &to,
        Duration::ZERO,
        stream::iter([ms(16), ms(32)]),
        |_, p| calls.push(p),
    ))
    .unwrap();

    assert_eq!(done, to);
    assert_eq!(calls, vec![1.0]);
}

#[test]
fn midpoint_frame_is_eased_to_half_way() {
    let from = single("n", Position::ORIGIN);
    let to = single("n", Position::new(10.0, 0.0, 0.0));
    let mut frames: Vec<(f64, Position)> = Vec::new();

    let done = block_on(animate(
        &from,
        &to,
        ms(1000),
        stream::iter([ms(100), ms(350), ms(600), ms(1100), ms(2000)]),
        |current, p| frames.push((p, current["n"])),
    ))
    .unwrap();

    let raw: Vec<f64> = frames.iter().map(|(p, _)| *p).collect();
    assert_eq!(raw, vec![0.0, 0.25, 0.5, 1.0]);
    assert_eq!(frames[0].1, Position::ORIGIN);
    // ease(0.25) = 4 * 0.25³ = 0.0625
    assert!((frames[1].1.x - 0.625).abs() < 1e-12, "{:?}", frames[1]);
    assert_eq!(frames[2].1, Position::new(5.0, 0.0, 0.0));
    assert_eq!(done, to);
}

#[test]
fn nodes_new_to_the_destination_fly_in_from_origin() {
    let from = single("old", Position::new(1.0, 1.0, 1.0));
    let mut to = single("old", Position::new(1.0, 1.0, 1.0));
    to.insert("new".to_string(), Position::new(8.0, 8.0, 8.0));
    let mut first: Option<PositionAssignment> = None;

    block_on(animate(
        &from,
        &to,
        ms(10),
        stream::iter([ms(0), ms(10)]),
        |current, _| {
            first.get_or_insert_with(|| current.clone());
        },
    ))
    .unwrap();

    let first = first.unwrap();
    assert_eq!(first["new"], Position::ORIGIN);
    assert_eq!(first["old"], Position::new(1.0, 1.0, 1.0));
}

#[test]
fn running_out_of_frames_reports_progress() {
    let from = single("n", Position::ORIGIN);
    let to = single("n", Position::new(1.0, 0.0, 0.0));
    let err = block_on(animate(
        &from,
        &to,
        ms(100),
        stream::iter([ms(0), ms(50)]),
        |_, _| {},
    ))
    .unwrap_err();
    assert!(
        matches!(err, Error::FramesExhausted { progress: p } if p == 0.5),
        "{err}"
    );
}

#[test]
fn stale_token_stops_before_the_next_callback() {
    let generation = TransitionGeneration::new();
    let token = generation.advance();
    let canceller = generation.clone();
    let from = single("n", Position::ORIGIN);
    let to = single("n", Position::new(1.0, 0.0, 0.0));
    let mut seen = Vec::new();

    let frames = stream::iter([ms(0), ms(25), ms(50), ms(75)]).inspect(move |t| {
        if *t == ms(50) {
            canceller.cancel_all();
        }
    });
    let err = block_on(animate_with_token(
        &from,
        &to,
        ms(100),
        frames,
        |_, p| seen.push(p),
        token,
    ))
    .unwrap_err();

    assert!(
        matches!(err, Error::TransitionCancelled { progress: p } if p == 0.25),
        "{err}"
    );
    assert_eq!(seen, vec![0.0, 0.25]);
}

#[test]
fn switching_layouts_cancels_a_running_session_transition() {
    let mut g = Graph::new();
    for id in ["a", "b", "c"] {
        g.add_node(id);
    }
    let opts = LayoutOptions::default();
    let mut mgr = LayoutManager::new();
    let first = mgr.switch_layout("radial", &g, &opts).unwrap();
    let second = mgr.switch_layout("spiral3d", &g, &opts).unwrap();

    let pending = mgr.animate_transition(
        &second.previous_positions,
        &second.positions,
        None,
        stream::iter([ms(0), ms(500), ms(1000)]),
        |_, _| {},
    );
    mgr.switch_layout("sphere3d", &g, &opts).unwrap();

    let err = block_on(pending).unwrap_err();
    assert!(matches!(err, Error::TransitionCancelled { .. }), "{err}");
    assert_eq!(first.positions, second.previous_positions);
}

#[test]
fn newer_session_transition_supersedes_older_one() {
    let mgr = LayoutManager::new().with_animation_duration(ms(100));
    let from = single("n", Position::ORIGIN);
    let to = single("n", Position::new(0.0, 4.0, 0.0));

    let older = mgr.animate_transition(&from, &to, None, stream::iter([ms(0)]), |_, _| {});
    let newer = mgr.animate_transition(
        &from,
        &to,
        None,
        stream::iter([ms(0), ms(100)]),
        |_, _| {},
    );

    assert!(matches!(
        block_on(older),
        Err(Error::TransitionCancelled { .. })
    ));
    assert_eq!(block_on(newer).unwrap(), to);
}

#[test]
fn progress_is_linear_before_easing() {
    assert_eq!(progress(ms(250), ms(1000)), 0.25);
    assert_eq!(progress(ms(1500), ms(1000)), 1.0);
}
