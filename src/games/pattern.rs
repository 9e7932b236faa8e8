//! Memory games: a set of squares on a growing grid, and a Simon sequence.

use super::picks::{pick_index, sample_distinct};
use super::{
    Action, CueOutcome, GameMode, JudgeContext, ProgressRule, RoundContext, RoundPlan, RoundState,
    Rules, ScoreRule, Verdict,
};
use crate::ledger::Direction;
use rand::RngCore;

const GRID_START: usize = 3;
const GRID_MAX: usize = 8;
const GRID_GROW_EVERY: u32 = 3;
const GRID_SHOW_MS: u64 = 1000;

const SIMON_PADS: usize = 4;
const SIMON_ON_MS: u64 = 1000;
const SIMON_OFF_MS: u64 = 500;

/// Grid side for a round: starts at 3 and grows by one after every third round.
pub fn grid_size(round: u32) -> usize
{
    let grown = (round.saturating_sub(1) / GRID_GROW_EVERY) as usize;
    (GRID_START + grown).min(GRID_MAX)
}

/// Highlighted squares for a round: `round + 2`, capped by the grid.
pub fn pattern_len(round: u32, size: usize) -> usize
{
    (round as usize + 2).min(size * size)
}

pub struct GridMemory;

impl GameMode for GridMemory
{
    fn id(&self) -> &'static str
    {
        "grid-memory"
    }

    fn rules(&self) -> Rules
    {
        Rules {
            progress: ProgressRule::Rounds { cap: None },
            scoring: ScoreRule::RoundsSurvived,
            direction: Direction::Descending,
            ledger_limit: Some(10),
            feedback_pause_ms: 500,
        }
    }

    fn generate(&self, ctx: &RoundContext<'_>, rng: &mut dyn RngCore) -> Option<RoundPlan>
    {
        let size = grid_size(ctx.round);
        let pattern = sample_distinct(rng, size * size, pattern_len(ctx.round, size))?;
        Some(RoundPlan::with_cue(
            RoundState::Grid {
                size,
                pattern,
                picked: Vec::new(),
                showing: true,
            },
            GRID_SHOW_MS,
        ))
    }

    fn fallback(&self) -> RoundPlan
    {
        RoundPlan::with_cue(
            RoundState::Grid {
                size: GRID_START,
                pattern: vec![0, 4, 8],
                picked: Vec::new(),
                showing: true,
            },
            GRID_SHOW_MS,
        )
    }

    fn judge(&self, round: &mut RoundState, action: &Action, _ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::Grid {
            size,
            pattern,
            picked,
            showing,
        } = round
        else {
            return Verdict::Rejected { hint: None };
        };
        let Action::Select(cell) = *action else {
            return Verdict::Rejected { hint: None };
        };
        if *showing {
            return Verdict::rejected("Watch the pattern first");
        }
        if cell >= *size * *size || picked.contains(&cell) {
            return Verdict::Rejected { hint: None };
        }

        picked.push(cell);
        if picked.len() < pattern.len() {
            return Verdict::Partial;
        }
        if same_set(picked, pattern) {
            Verdict::Advance { score_delta: 1 }
        } else {
            Verdict::Terminal { score_delta: 0 }
        }
    }

    fn on_cue(&self, round: &mut RoundState, _now: u64) -> CueOutcome
    {
        if let RoundState::Grid { showing, .. } = round {
            *showing = false;
        }
        CueOutcome::Settled
    }
}

fn same_set(a: &[usize], b: &[usize]) -> bool
{
    if a.len() != b.len() {
        return false;
    }
    let mut left = a.to_vec();
    let mut right = b.to_vec();
    left.sort_unstable();
    right.sort_unstable();
    left == right
}

/// Watch the pads light up in order, then repeat the order. One step is
/// appended every round.
pub struct Simon;

impl GameMode for Simon
{
    fn id(&self) -> &'static str
    {
        "simon"
    }

    fn rules(&self) -> Rules
    {
        Rules {
            progress: ProgressRule::Rounds { cap: None },
            scoring: ScoreRule::RoundsSurvived,
            direction: Direction::Descending,
            ledger_limit: Some(10),
            feedback_pause_ms: 1000,
        }
    }

    fn generate(&self, ctx: &RoundContext<'_>, rng: &mut dyn RngCore) -> Option<RoundPlan>
    {
        let mut sequence = match ctx.previous {
            Some(RoundState::Simon { sequence, .. }) => sequence.clone(),
            _ => Vec::new(),
        };
        sequence.push(pick_index(rng, SIMON_PADS)?);
        let first = sequence.first().copied();
        Some(RoundPlan::with_cue(
            RoundState::Simon {
                pads: SIMON_PADS,
                sequence,
                entered: 0,
                lit: first,
                step: 0,
                playing: true,
            },
            SIMON_ON_MS,
        ))
    }

    fn fallback(&self) -> RoundPlan
    {
        RoundPlan::with_cue(
            RoundState::Simon {
                pads: SIMON_PADS,
                sequence: vec![0],
                entered: 0,
                lit: Some(0),
                step: 0,
                playing: true,
            },
            SIMON_ON_MS,
        )
    }

    fn judge(&self, round: &mut RoundState, action: &Action, _ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::Simon {
            pads,
            sequence,
            entered,
            playing,
            ..
        } = round
        else {
            return Verdict::Rejected { hint: None };
        };
        let Action::Select(pad) = *action else {
            return Verdict::Rejected { hint: None };
        };
        if *playing {
            return Verdict::rejected("Wait for the sequence to finish");
        }
        if pad >= *pads {
            return Verdict::Rejected { hint: None };
        }

        if sequence.get(*entered) != Some(&pad) {
            return Verdict::Terminal { score_delta: 0 };
        }
        *entered += 1;
        if *entered == sequence.len() {
            Verdict::Advance { score_delta: 1 }
        } else {
            Verdict::Partial
        }
    }

    /// Playback: each step is lit for `SIMON_ON_MS`, then dark for
    /// `SIMON_OFF_MS`, until the whole sequence has been shown.
    fn on_cue(&self, round: &mut RoundState, _now: u64) -> CueOutcome
    {
        let RoundState::Simon {
            sequence,
            lit,
            step,
            playing,
            ..
        } = round
        else {
            return CueOutcome::Settled;
        };

        if lit.is_some() {
            *lit = None;
            *step += 1;
            if *step >= sequence.len() {
                *playing = false;
                return CueOutcome::Settled;
            }
            return CueOutcome::Rearm(SIMON_OFF_MS);
        }
        *lit = sequence.get(*step).copied();
        CueOutcome::Rearm(SIMON_ON_MS)
    }
}
