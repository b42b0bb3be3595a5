//! Event generation: compiles pattern blocks into timed events.
//!
//! Each block's steps form a grid of equal slots per cycle. The rate
//! (`fast / slow`) rescales the number of slots, replaying the fixed step
//! list modulo its length rather than resampling it. Output is ordered by
//! lane, then cycle, then time, and is fully deterministic.

use serde::Serialize;
use tracing::{debug, warn};

use crate::event::{CycleTime, Event};

use super::ast::{PatternBlock, PatternKind, Step};
use super::mini::tokenize;
use super::modifier::resolve_modifiers;
use super::parser::extract_blocks;
use super::pitch::PitchResolver;
use super::scale::{ScaleContext, ScaleTable};

/// Cycles generated when none are requested.
pub const DEFAULT_CYCLES: u32 = 6;

/// Rates below this are clamped before computing the slot grid.
pub const MIN_RATE: f64 = 0.0001;

/// Upper bound on slots per cycle, whatever the rate. Larger grids are
/// clamped with a warning.
pub const MAX_SLOTS_PER_CYCLE: usize = 4096;

/// Settings consumed by the event generator.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    /// Number of cycles to generate. Zero is treated as one.
    pub cycles: u32,
    /// Modes available to `.scale(...)`.
    pub scales: ScaleTable,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            cycles: DEFAULT_CYCLES,
            scales: ScaleTable::default(),
        }
    }
}

impl CompileOptions {
    pub fn with_cycles(cycles: u32) -> Self {
        Self {
            cycles,
            ..Self::default()
        }
    }
}

/// A block with its steps and modifiers resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledBlock {
    /// Zero-based position among all blocks of the source.
    pub lane: u32,
    pub block: PatternBlock,
    pub steps: Vec<Step>,
    pub rate: f64,
    pub scale: Option<ScaleContext>,
}

impl CompiledBlock {
    pub fn new(block: PatternBlock, lane: u32, scales: &ScaleTable) -> Self {
        let steps = tokenize(&block.body);
        let modifiers = resolve_modifiers(&block.modifiers, scales);
        Self {
            lane,
            steps,
            rate: modifiers.rate(),
            scale: modifiers.scale,
            block,
        }
    }

    pub fn kind(&self) -> PatternKind {
        self.block.kind
    }

    pub fn slots_per_cycle(&self) -> usize {
        slots_per_cycle(self.steps.len(), self.rate)
    }

    /// Generate this block's events for `cycles` cycles.
    pub fn events(&self, cycles: u32) -> Vec<Event> {
        generate_events(
            &self.steps,
            self.rate,
            PitchResolver::new(self.kind(), self.scale.as_ref()),
            self.lane,
            cycles,
        )
    }
}

/// `max(1, round(steps × rate))`, with the rate floored at [`MIN_RATE`] and
/// the result capped at [`MAX_SLOTS_PER_CYCLE`].
pub fn slots_per_cycle(step_count: usize, rate: f64) -> usize {
    let rate = rate.max(MIN_RATE);
    let slots = (step_count as f64 * rate).round();
    if slots > MAX_SLOTS_PER_CYCLE as f64 {
        warn!(step_count, rate, max = MAX_SLOTS_PER_CYCLE, "clamping slots per cycle");
        MAX_SLOTS_PER_CYCLE
    } else {
        (slots as usize).max(1)
    }
}

/// Emit events for a step grid.
///
/// Slot `i` of every cycle plays `steps[i % steps.len()]`. Rests emit
/// nothing; stacked tokens emit one event each at the same time; tokens the
/// resolver rejects are dropped.
pub fn generate_events(
    steps: &[Step],
    rate: f64,
    resolver: PitchResolver<'_>,
    lane: u32,
    cycles: u32,
) -> Vec<Event> {
    let mut events = Vec::new();
    if steps.is_empty() {
        return events;
    }

    let slots = slots_per_cycle(steps.len(), rate);
    let duration = CycleTime::slot_width(slots);

    for cycle in 0..cycles.max(1) {
        for slot in 0..slots {
            let step = &steps[slot % steps.len()];
            let time = CycleTime::from_slot(slot, slots);
            for token in &step.tokens {
                match resolver.resolve(token) {
                    Some(trigger) => {
                        events.push(Event::new(cycle, time, duration, lane, trigger));
                    }
                    None => debug!(token = %token, lane, "dropping uninterpretable token"),
                }
            }
        }
    }

    events
}

/// Extract, resolve, and generate events for every block in `code`.
pub fn compile_code(code: &str, options: &CompileOptions) -> (Vec<CompiledBlock>, Vec<Event>) {
    let blocks: Vec<CompiledBlock> = extract_blocks(code)
        .into_iter()
        .enumerate()
        .map(|(lane, block)| CompiledBlock::new(block, lane as u32, &options.scales))
        .collect();

    let events = blocks
        .iter()
        .flat_map(|block| block.events(options.cycles))
        .collect();

    (blocks, events)
}
