use super::picks::pick_index_except;
use super::{
    Action, GameMode, JudgeContext, ProgressRule, RoundContext, RoundPlan, RoundState, Rules,
    ScoreRule, Verdict,
};
use crate::ledger::Direction;
use rand::RngCore;

pub const DEFAULT_SECS: u32 = 30;
pub const SIDE: usize = 5;
const CELLS: usize = SIDE * SIDE;

pub struct Aim
{
    secs: u32,
}

impl Aim
{
    pub fn new(secs: u32) -> Self
    {
        Self { secs: secs.max(1) }
    }
}

impl GameMode for Aim
{
    fn id(&self) -> &'static str
    {
        "aim"
    }

    fn rules(&self) -> Rules
    {
        Rules {
            progress: ProgressRule::Timed { secs: self.secs },
            scoring: ScoreRule::Accumulate,
            direction: Direction::Descending,
            ledger_limit: Some(10),
            feedback_pause_ms: 0,
        }
    }

    fn generate(&self, ctx: &RoundContext<'_>, rng: &mut dyn RngCore) -> Option<RoundPlan>
    {
        let last = match ctx.previous {
            Some(RoundState::Aim { target, .. }) => Some(*target),
            _ => None,
        };
        Some(RoundPlan::new(RoundState::Aim {
            cells: CELLS,
            target: pick_index_except(rng, CELLS, last)?,
        }))
    }

    fn fallback(&self) -> RoundPlan
    {
        RoundPlan::new(RoundState::Aim {
            cells: CELLS,
            target: CELLS / 2,
        })
    }

    fn judge(&self, round: &mut RoundState, action: &Action, _ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::Aim { target, .. } = *round else {
            return Verdict::Rejected { hint: None };
        };
        match *action {
            Action::Select(cell) if cell == target => Verdict::Advance { score_delta: 1 },
            _ => Verdict::Rejected { hint: None },
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::config::Difficulty;
    use crate::games::Tally;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn target_never_repeats_in_place()
    {
        let mode = Aim::new(DEFAULT_SECS);
        let mut rng = StdRng::seed_from_u64(8);
        let mut previous = mode.fallback().state;
        for round in 2..200 {
            let ctx = RoundContext {
                round,
                difficulty: Difficulty::Medium,
                previous: Some(&previous),
            };
            let next = mode.generate(&ctx, &mut rng).unwrap().state;
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn misses_are_ignored()
    {
        let mode = Aim::new(DEFAULT_SECS);
        let mut round = RoundState::Aim {
            cells: CELLS,
            target: 7,
        };
        let mut tally = Tally::default();
        let mut ctx = JudgeContext {
            now: 0,
            round: 1,
            round_started_at: 0,
            tally: &mut tally,
            cue_after_ms: None,
        };
        assert!(!mode.judge(&mut round, &Action::Select(6), &mut ctx).is_accepted());
        assert_eq!(mode.judge(&mut round, &Action::Select(7), &mut ctx), Verdict::Advance { score_delta: 1 });
    }
}
