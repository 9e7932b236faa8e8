use super::picks::pick_index;
use super::{
    Action, GameMode, JudgeContext, ProgressRule, RoundContext, RoundPlan, RoundState, Rules,
    ScoreRule, Tally, Verdict,
};
use crate::ledger::Direction;
use rand::RngCore;

pub const CELLS: usize = 24;
pub const COLUMNS: usize = 6;
const ROUNDS: u32 = 3;
const BETWEEN_ROUNDS_MS: u64 = 500;

pub const FACE_SETS: [(&str, &str); 8] = [
    ("🦊", "🦝"),
    ("🍊", "🍋"),
    ("🧡", "💛"),
    ("🐙", "🦑"),
    ("🦀", "🦞"),
    ("👻", "💭"),
    ("🍩", "🥯"),
    ("🥝", "🥑"),
];

/// One face hidden among decoys, three times. Ranked by total search time.
pub struct FaceFinder;

impl GameMode for FaceFinder
{
    fn id(&self) -> &'static str
    {
        "face-finder"
    }

    fn rules(&self) -> Rules
    {
        Rules {
            progress: ProgressRule::Rounds { cap: Some(ROUNDS) },
            scoring: ScoreRule::Precision,
            direction: Direction::Ascending,
            ledger_limit: Some(10),
            feedback_pause_ms: BETWEEN_ROUNDS_MS,
        }
    }

    fn generate(&self, _ctx: &RoundContext<'_>, rng: &mut dyn RngCore) -> Option<RoundPlan>
    {
        let (target, decoy) = FACE_SETS[pick_index(rng, FACE_SETS.len())?];
        Some(RoundPlan::new(RoundState::Faces {
            target,
            decoy,
            cells: CELLS,
            at: pick_index(rng, CELLS)?,
        }))
    }

    fn fallback(&self) -> RoundPlan
    {
        let (target, decoy) = FACE_SETS[0];
        RoundPlan::new(RoundState::Faces {
            target,
            decoy,
            cells: CELLS,
            at: 0,
        })
    }

    fn judge(&self, round: &mut RoundState, action: &Action, ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::Faces { at, .. } = *round else {
            return Verdict::Rejected { hint: None };
        };
        match *action {
            Action::Select(cell) if cell == at => {
                let took = ctx.elapsed() as i64;
                ctx.tally.samples.push(took);
                Verdict::Advance { score_delta: 0 }
            }
            _ => Verdict::Rejected { hint: None },
        }
    }

    fn final_value(&self, tally: &Tally, _round: u32) -> i64
    {
        tally.samples.iter().sum()
    }

    fn label(&self, tally: &Tally) -> Option<String>
    {
        let total: i64 = tally.samples.iter().sum();
        Some(format!("{:.2}s", total as f64 / 1000.0))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::config::Difficulty;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn target_is_always_on_the_board()
    {
        let mut rng = StdRng::seed_from_u64(5);
        for round in 1..100 {
            let ctx = RoundContext {
                round,
                difficulty: Difficulty::Medium,
                previous: None,
            };
            let RoundState::Faces { target, decoy, cells, at } =
                FaceFinder.generate(&ctx, &mut rng).unwrap().state
            else {
                panic!("not a face round");
            };
            assert!(at < cells);
            assert_ne!(target, decoy);
        }
    }

    #[test]
    fn wrong_faces_are_ignored_and_the_find_is_timed()
    {
        let mut round = FaceFinder.fallback().state;
        let mut tally = Tally::default();
        let mut ctx = JudgeContext {
            now: 1_730,
            round: 1,
            round_started_at: 1_000,
            tally: &mut tally,
            cue_after_ms: None,
        };
        assert_eq!(FaceFinder.judge(&mut round, &Action::Select(3), &mut ctx), Verdict::Rejected { hint: None });
        assert_eq!(FaceFinder.judge(&mut round, &Action::Select(0), &mut ctx), Verdict::Advance { score_delta: 0 });
        assert_eq!(tally.samples, vec![730]);
    }

    #[test]
    fn value_is_the_total_of_every_round()
    {
        let tally = Tally {
            samples: vec![900, 1_250, 610],
            ..Tally::default()
        };
        assert_eq!(FaceFinder.final_value(&tally, 3), 2_760);
        assert_eq!(FaceFinder.label(&tally).as_deref(), Some("2.76s"));
    }
}
