use super::picks::pick_index;
use super::{
    Action, GameMode, JudgeContext, ProgressRule, RoundContext, RoundPlan, RoundState, Rules,
    ScoreRule, Verdict,
};
use crate::ledger::Direction;
use rand::RngCore;

const CELLS: usize = 24;

/// Reveal safe squares; one hides a bomb. Cash out (`Stop`) to keep the count.
/// Hitting the bomb forfeits the session and records zero.
pub struct Bomb;

impl GameMode for Bomb
{
    fn id(&self) -> &'static str
    {
        "bomb"
    }

    fn rules(&self) -> Rules
    {
        Rules {
            progress: ProgressRule::Rounds { cap: None },
            scoring: ScoreRule::Accumulate,
            direction: Direction::Descending,
            ledger_limit: Some(10),
            feedback_pause_ms: 0,
        }
    }

    fn generate(&self, ctx: &RoundContext<'_>, rng: &mut dyn RngCore) -> Option<RoundPlan>
    {
        // The board is laid once; later rounds keep revealing the same one.
        if let Some(RoundState::Bomb { .. }) = ctx.previous {
            return ctx.previous.cloned().map(RoundPlan::new);
        }
        Some(RoundPlan::new(RoundState::Bomb {
            bomb: pick_index(rng, CELLS)?,
            revealed: vec![false; CELLS],
        }))
    }

    fn fallback(&self) -> RoundPlan
    {
        RoundPlan::new(RoundState::Bomb {
            bomb: CELLS - 1,
            revealed: vec![false; CELLS],
        })
    }

    fn judge(&self, round: &mut RoundState, action: &Action, ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::Bomb { bomb, revealed } = round else {
            return Verdict::Rejected { hint: None };
        };
        match *action {
            Action::Stop => Verdict::Terminal { score_delta: 0 },
            Action::Select(cell) if cell >= revealed.len() || revealed[cell] => {
                Verdict::Rejected { hint: None }
            }
            Action::Select(cell) if cell == *bomb => {
                ctx.tally.forfeited = true;
                Verdict::Terminal { score_delta: 0 }
            }
            Action::Select(cell) => {
                revealed[cell] = true;
                if revealed.iter().filter(|seen| !**seen).count() == 1 {
                    // Only the bomb is left.
                    return Verdict::Terminal { score_delta: 1 };
                }
                Verdict::Advance { score_delta: 1 }
            }
            _ => Verdict::Rejected { hint: None },
        }
    }
}
