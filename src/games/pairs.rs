use super::{
    Action, CueOutcome, GameMode, JudgeContext, ProgressRule, RoundContext, RoundPlan, RoundState,
    Rules, ScoreRule, Tally, Verdict,
};
use crate::ledger::Direction;
use rand::RngCore;
use rand::seq::SliceRandom;

pub const FACES: [&str; 8] = ["🎉", "❤️", "🚀", "🍎", "🌟", "⚽", "🎵", "🍔"];
pub const COLUMNS: usize = 4;
const HIDE_MS: u64 = 1000;

/// Concentration: flip two cards at a time until every pair is found.
/// Ranked by how long the whole board took.
pub struct Pairs;

fn deck() -> Vec<&'static str>
{
    FACES.iter().chain(FACES.iter()).copied().collect()
}

impl GameMode for Pairs
{
    fn id(&self) -> &'static str
    {
        "pairs"
    }

    fn rules(&self) -> Rules
    {
        Rules {
            progress: ProgressRule::Rounds { cap: Some(1) },
            scoring: ScoreRule::Precision,
            direction: Direction::Ascending,
            ledger_limit: Some(10),
            feedback_pause_ms: 0,
        }
    }

    fn generate(&self, _ctx: &RoundContext<'_>, rng: &mut dyn RngCore) -> Option<RoundPlan>
    {
        let mut faces = deck();
        faces.shuffle(rng);
        Some(RoundPlan::new(RoundState::Pairs {
            matched: vec![false; faces.len()],
            faces,
            open: Vec::new(),
        }))
    }

    fn fallback(&self) -> RoundPlan
    {
        let faces = deck();
        RoundPlan::new(RoundState::Pairs {
            matched: vec![false; faces.len()],
            faces,
            open: Vec::new(),
        })
    }

    fn judge(&self, round: &mut RoundState, action: &Action, ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::Pairs {
            faces,
            matched,
            open,
        } = round
        else {
            return Verdict::Rejected { hint: None };
        };
        let Action::Select(card) = *action else {
            return Verdict::Rejected { hint: None };
        };
        if card >= faces.len() {
            return Verdict::Rejected { hint: None };
        }
        if open.len() == 2 {
            return Verdict::rejected("Wait for the cards to turn back");
        }
        if matched[card] || open.contains(&card) {
            return Verdict::Rejected { hint: None };
        }

        open.push(card);
        let &[first, second] = open.as_slice() else {
            return Verdict::Partial;
        };
        if faces[first] != faces[second] {
            ctx.cue_after_ms = Some(HIDE_MS);
            return Verdict::Partial;
        }

        matched[first] = true;
        matched[second] = true;
        open.clear();
        if matched.iter().all(|done| *done) {
            let took = ctx.elapsed() as i64;
            ctx.tally.samples.push(took);
            return Verdict::Terminal { score_delta: 0 };
        }
        Verdict::Partial
    }

    fn on_cue(&self, round: &mut RoundState, _now: u64) -> CueOutcome
    {
        if let RoundState::Pairs { open, .. } = round {
            open.clear();
        }
        CueOutcome::Settled
    }

    fn label(&self, tally: &Tally) -> Option<String>
    {
        Some(format!("{:.1}s", tally.mean_sample() as f64 / 1000.0))
    }
}
