use super::{
    Action, CueOutcome, GameMode, JudgeContext, ProgressRule, RoundContext, RoundPlan, RoundState,
    Rules, ScoreRule, Verdict,
};
use crate::ledger::Direction;
use rand::{Rng, RngCore};

pub const DEFAULT_ROUNDS: u32 = 5;
const MIN_DELAY_MS: u64 = 2000;
const MAX_DELAY_MS: u64 = 5000;

/// Wait for the light, then tap. Scored by mean reaction time.
pub struct Reaction
{
    rounds: u32,
}

impl Reaction
{
    pub fn new(rounds: u32) -> Self
    {
        Self {
            rounds: rounds.max(1),
        }
    }
}

impl GameMode for Reaction
{
    fn id(&self) -> &'static str
    {
        "reaction"
    }

    fn rules(&self) -> Rules
    {
        Rules {
            progress: ProgressRule::Rounds {
                cap: Some(self.rounds),
            },
            scoring: ScoreRule::Precision,
            direction: Direction::Ascending,
            ledger_limit: Some(10),
            feedback_pause_ms: 0,
        }
    }

    fn generate(&self, _ctx: &RoundContext<'_>, rng: &mut dyn RngCore) -> Option<RoundPlan>
    {
        let delay = rng.gen_range(MIN_DELAY_MS..MAX_DELAY_MS);
        Some(RoundPlan::with_cue(
            RoundState::Reaction {
                go: false,
                cue_at: None,
            },
            delay,
        ))
    }

    fn fallback(&self) -> RoundPlan
    {
        RoundPlan::with_cue(
            RoundState::Reaction {
                go: false,
                cue_at: None,
            },
            MIN_DELAY_MS,
        )
    }

    fn judge(&self, round: &mut RoundState, action: &Action, ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::Reaction { go, cue_at } = round else {
            return Verdict::Rejected { hint: None };
        };
        if *action != Action::Tap {
            return Verdict::Rejected { hint: None };
        }
        match (*go, *cue_at) {
            (true, Some(at)) => {
                let elapsed = ctx.now.saturating_sub(at) as i64;
                ctx.tally.samples.push(elapsed);
                Verdict::Advance { score_delta: 0 }
            }
            _ => Verdict::rejected("Wait for green"),
        }
    }

    fn on_cue(&self, round: &mut RoundState, now: u64) -> CueOutcome
    {
        if let RoundState::Reaction { go, cue_at } = round {
            *go = true;
            *cue_at = Some(now);
        }
        CueOutcome::Settled
    }
}
