//! Pipeline integration tests: source text → blocks → events.

use assert_approx_eq::assert_approx_eq;

use strudelcraft::dsl::{CompileOptions, Compiler, PatternKind};
use strudelcraft::event::{CycleTime, Event};
use strudelcraft::voxel::events_to_voxels;

fn compile(code: &str, cycles: u32) -> Vec<Event> {
    Compiler::compile(code, &CompileOptions::with_cycles(cycles)).events
}

fn pitches(events: &[Event]) -> Vec<f64> {
    events.iter().filter_map(|e| e.pitch).collect()
}

fn instruments(events: &[Event]) -> Vec<&str> {
    events.iter().map(|e| e.instrument.as_str()).collect()
}

// =============================================================================
// Reference scenarios
// =============================================================================

#[test]
fn note_sequence_one_cycle() {
    let events = compile(r#"note("c4 e4 g4 c5")"#, 1);

    assert_eq!(events.len(), 4);
    let times: Vec<f64> = events.iter().map(|e| e.time.as_f64()).collect();
    assert_eq!(times, vec![0.0, 0.25, 0.5, 0.75]);
    assert_eq!(pitches(&events), vec![60.0, 64.0, 67.0, 72.0]);
    assert_eq!(events_to_voxels(&events).len(), 4);
}

#[test]
fn scale_degrees_in_d_major() {
    let events = compile(r#"n("0 2 4").scale("d:major")"#, 1);

    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.instrument == "n"));
    assert_eq!(pitches(&events), vec![62.0, 66.0, 69.0]);
    for (i, e) in events.iter().enumerate() {
        assert_approx_eq!(e.time.as_f64(), i as f64 / 3.0);
        assert_approx_eq!(e.duration.as_f64(), 1.0 / 3.0);
    }
}

#[test]
fn group_shares_a_slot() {
    let events = compile(r#"note("[c4 e4] g4")"#, 1);

    assert_eq!(events.len(), 3);
    assert_eq!(events[0].time, CycleTime::ZERO);
    assert_eq!(events[1].time, CycleTime::ZERO);
    assert_approx_eq!(events[2].time.as_f64(), 0.5);
    assert!(events.iter().all(|e| e.duration.as_f64() == 0.5));
}

#[test]
fn drum_lanes_are_stable() {
    let events = compile(r#"s("bd hh sd hh")"#, 1);
    assert_eq!(instruments(&events), vec!["bd", "hh", "sd", "hh"]);

    let voxels = events_to_voxels(&events);
    assert_eq!(voxels[1].z, voxels[3].z);
    assert_ne!(voxels[0].z, voxels[1].z);
    assert_ne!(voxels[0].z, voxels[2].z);
    assert_ne!(voxels[1].z, voxels[2].z);
}

// =============================================================================
// Blocks and lanes
// =============================================================================

#[test]
fn each_statement_gets_its_own_lane() {
    let code = "$: s(\"bd*2\")\n\n$: note(\"c3 e3 g3\").slow(2)\n$: n(\"0\").scale(\"a:minor\")\n";
    let out = Compiler::compile(code, &CompileOptions::with_cycles(2));

    assert_eq!(out.lanes(), 3);
    assert_eq!(out.blocks[1].kind(), PatternKind::Note);
    assert!(out.status.ends_with("(3 lanes)"));

    let lanes: Vec<u32> = out.events.iter().map(|e| e.lane).collect();
    let mut sorted = lanes.clone();
    sorted.sort();
    assert_eq!(lanes, sorted);

    // bd*2: 2 slots, 2 cycles
    assert_eq!(out.events.iter().filter(|e| e.lane == 0).count(), 4);
    // slow(2) over 3 steps: round(1.5) = 2 slots per cycle
    assert_eq!(out.events.iter().filter(|e| e.lane == 1).count(), 4);
    // a minor degree 0 is A4
    let a = out.events.iter().find(|e| e.lane == 2).unwrap();
    assert_eq!(a.pitch, Some(69.0));
}

#[test]
fn events_are_ordered_by_lane_cycle_time() {
    let events = compile("$: s(\"bd sd\")\n$: s(\"hh hh hh\")", 2);
    let keys: Vec<(u32, u32, CycleTime)> =
        events.iter().map(|e| (e.lane, e.cycle, e.time)).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn modifiers_after_the_constructor_apply() {
    let events = compile(r#"$: sound("bd sd").fast(2).gain(0.5)"#, 1);
    assert_eq!(instruments(&events), vec!["bd", "sd", "bd", "sd"]);
}

#[test]
fn commented_statement_is_ignored() {
    let code = "// $: s(\"cp\")\n$: s(\"bd\")";
    let out = Compiler::compile(code, &CompileOptions::with_cycles(1));
    assert_eq!(out.lanes(), 1);
    assert_eq!(instruments(&out.events), vec!["bd"]);
}

#[test]
fn unclosed_string_drops_only_that_statement() {
    let code = "$: s(\"bd sd\")\n$: note(\"c4 e4)\n";
    let out = Compiler::compile(code, &CompileOptions::with_cycles(1));
    assert_eq!(out.lanes(), 1);
    assert_eq!(out.events.len(), 2);
}

// =============================================================================
// Fallback
// =============================================================================

#[test]
fn empty_source_falls_back_to_default() {
    let out = Compiler::compile("", &CompileOptions::with_cycles(1));
    assert_eq!(out.lanes(), 1);
    assert_eq!(instruments(&out.events), vec!["bd", "sd", "hh", "bd", "sd"]);
}

#[test]
fn unrecognized_constructor_falls_back_to_default() {
    let out = Compiler::compile(r#"$: stack(foo("bd"))"#, &CompileOptions::with_cycles(2));
    assert_eq!(out.lanes(), 1);
    assert_eq!(out.events.len(), 10);
}

#[test]
fn malformed_numbers_degrade_to_defaults() {
    let events = compile(r#"s("bd sd").fast("abc").slow()"#, 1);
    assert_eq!(events.len(), 2);
}

#[test]
fn unknown_scale_mode_uses_minor() {
    let events = compile(r#"n("2").scale("c:nonsense")"#, 1);
    assert_eq!(pitches(&events), vec![63.0]);
}

// =============================================================================
// Groups, degrees and configured scales
// =============================================================================

#[test]
fn rest_marker_inside_group_is_a_stacked_sound() {
    let events = compile(r#"s("[bd ~] sd")"#, 1);
    assert_eq!(instruments(&events), vec!["bd", "~", "sd"]);
    assert_eq!(events[0].time, events[1].time);
}

#[test]
fn rest_marker_inside_note_group_is_dropped() {
    let events = compile(r#"note("[c4 ~] e4")"#, 1);
    assert_eq!(pitches(&events), vec![60.0, 64.0]);
}

#[test]
fn degree_tokens_use_their_numeric_prefix() {
    let events = compile(r#"n("2b x 1")"#, 1);
    assert_eq!(pitches(&events), vec![62.0, 61.0]);
    assert_eq!(events[1].time, CycleTime::from_slot(2, 3));
}

#[test]
fn invalid_configured_scale_does_not_panic() {
    let config: strudelcraft::config::Config =
        serde_yaml::from_str("scales:\n  major: []\n").unwrap();
    let out = Compiler::compile(r#"n("0 1").scale("c:major")"#, &config.compile_options());
    // the empty major is dropped, so the unknown mode falls back to minor
    assert_eq!(pitches(&out.events[..2]), vec![60.0, 62.0]);
}

#[test]
fn long_repeats_and_fast_rates_are_clamped() {
    assert_eq!(compile(r#"s("bd*2000")"#, 1).len(), 1024);
    assert_eq!(compile(r#"s("bd").fast(5000)"#, 1).len(), 4096);
    assert_eq!(compile(r#"s("bd*1000")"#, 1).len(), 1000);
}
