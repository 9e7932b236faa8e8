use super::picks::pick_index;
use super::{
    Action, GameMode, JudgeContext, ProgressRule, RoundContext, RoundPlan, RoundState, Rules,
    ScoreRule, Verdict,
};
use crate::ledger::Direction;
use rand::RngCore;

const TARGETS_MS: [u64; 4] = [3000, 5000, 7000, 10000];
const PERFECT: i64 = 10_000;

/// Closeness score for stopping `elapsed` ms into a `target` ms window.
pub fn closeness(elapsed: u64, target: u64) -> i64
{
    let off = elapsed.abs_diff(target).min(PERFECT as u64) as i64;
    PERFECT - off
}

/// Stop the clock as close to the target time as possible. One attempt.
pub struct Estimate;

impl GameMode for Estimate
{
    fn id(&self) -> &'static str
    {
        "estimate"
    }

    fn rules(&self) -> Rules
    {
        Rules {
            progress: ProgressRule::Rounds { cap: Some(1) },
            scoring: ScoreRule::Precision,
            direction: Direction::Descending,
            ledger_limit: Some(5),
            feedback_pause_ms: 0,
        }
    }

    fn generate(&self, _ctx: &RoundContext<'_>, rng: &mut dyn RngCore) -> Option<RoundPlan>
    {
        let target_ms = TARGETS_MS[pick_index(rng, TARGETS_MS.len())?];
        Some(RoundPlan::new(RoundState::Estimate { target_ms }))
    }

    fn fallback(&self) -> RoundPlan
    {
        RoundPlan::new(RoundState::Estimate {
            target_ms: TARGETS_MS[0],
        })
    }

    fn judge(&self, round: &mut RoundState, action: &Action, ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::Estimate { target_ms } = *round else {
            return Verdict::Rejected { hint: None };
        };
        if *action != Action::Tap {
            return Verdict::Rejected { hint: None };
        }
        let sample = closeness(ctx.elapsed(), target_ms);
        ctx.tally.samples.push(sample);
        Verdict::Advance { score_delta: 0 }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::games::Tally;

    #[test]
    fn closeness_is_symmetric_and_floored()
    {
        assert_eq!(closeness(5000, 5000), 10_000);
        assert_eq!(closeness(4750, 5000), 9_750);
        assert_eq!(closeness(5250, 5000), 9_750);
        assert_eq!(closeness(30_000, 3000), 0);
    }

    #[test]
    fn stop_measures_from_round_start()
    {
        let mut round = RoundState::Estimate { target_ms: 3000 };
        let mut tally = Tally::default();
        let mut ctx = JudgeContext {
            now: 4100,
            round: 1,
            round_started_at: 1000,
            tally: &mut tally,
            cue_after_ms: None,
        };
        assert!(Estimate.judge(&mut round, &Action::Tap, &mut ctx).is_accepted());
        assert_eq!(tally.samples, vec![9_900]);
        assert_eq!(Estimate.final_value(&tally, 1), 9_900);
    }
}
