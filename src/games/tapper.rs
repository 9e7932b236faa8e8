use super::{
    Action, GameMode, JudgeContext, ProgressRule, RoundContext, RoundPlan, RoundState, Rules,
    ScoreRule, Verdict,
};
use crate::ledger::Direction;
use rand::RngCore;

pub const DEFAULT_SECS: u32 = 10;

pub struct Tapper
{
    secs: u32,
}

impl Tapper
{
    pub fn new(secs: u32) -> Self
    {
        Self { secs: secs.max(1) }
    }
}

impl GameMode for Tapper
{
    fn id(&self) -> &'static str
    {
        "tapper"
    }

    fn rules(&self) -> Rules
    {
        Rules {
            progress: ProgressRule::Timed { secs: self.secs },
            scoring: ScoreRule::Accumulate,
            direction: Direction::Descending,
            ledger_limit: Some(5),
            feedback_pause_ms: 0,
        }
    }

    fn generate(&self, _ctx: &RoundContext<'_>, _rng: &mut dyn RngCore) -> Option<RoundPlan>
    {
        Some(RoundPlan::new(RoundState::Tapper))
    }

    fn fallback(&self) -> RoundPlan
    {
        RoundPlan::new(RoundState::Tapper)
    }

    fn judge(&self, _round: &mut RoundState, action: &Action, _ctx: &mut JudgeContext<'_>) -> Verdict
    {
        match action {
            Action::Tap => Verdict::Advance { score_delta: 1 },
            _ => Verdict::Rejected { hint: None },
        }
    }
}
