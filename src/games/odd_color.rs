use super::picks::{clamped_step, pick_index};
use super::{
    Action, GameMode, JudgeContext, ProgressRule, RoundContext, RoundPlan, RoundState, Rgb, Rules,
    ScoreRule, Verdict,
};
use crate::ledger::Direction;
use rand::{Rng, RngCore};

const CELLS: usize = 24;
const START_DIFF: i64 = 50;
const DIFF_STEP: i64 = -3;
const MIN_DIFF: i64 = 5;

/// Colour distance between the base and the odd square for a round.
pub fn color_difference(round: u32) -> u8
{
    clamped_step(START_DIFF, DIFF_STEP, round, MIN_DIFF, START_DIFF) as u8
}

pub struct OddColor;

impl GameMode for OddColor
{
    fn id(&self) -> &'static str
    {
        "odd-color"
    }

    fn rules(&self) -> Rules
    {
        Rules {
            progress: ProgressRule::Rounds { cap: None },
            scoring: ScoreRule::RoundsSurvived,
            direction: Direction::Descending,
            ledger_limit: Some(10),
            feedback_pause_ms: 0,
        }
    }

    fn generate(&self, ctx: &RoundContext<'_>, rng: &mut dyn RngCore) -> Option<RoundPlan>
    {
        let diff = color_difference(ctx.round);
        // Keep the base far enough from both ends that the shift never clips.
        let low = diff;
        let high = 255 - diff;
        let base = Rgb {
            r: rng.gen_range(low..=high),
            g: rng.gen_range(low..=high),
            b: rng.gen_range(low..=high),
        };
        let odd = if rng.gen_bool(0.5) {
            Rgb {
                r: base.r + diff,
                g: base.g + diff,
                b: base.b + diff,
            }
        } else {
            Rgb {
                r: base.r - diff,
                g: base.g - diff,
                b: base.b - diff,
            }
        };
        Some(RoundPlan::new(RoundState::OddColor {
            cells: CELLS,
            base,
            odd,
            odd_index: pick_index(rng, CELLS)?,
        }))
    }

    fn fallback(&self) -> RoundPlan
    {
        RoundPlan::new(RoundState::OddColor {
            cells: CELLS,
            base: Rgb { r: 120, g: 120, b: 120 },
            odd: Rgb { r: 170, g: 170, b: 170 },
            odd_index: 0,
        })
    }

    fn judge(&self, round: &mut RoundState, action: &Action, _ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::OddColor {
            cells, odd_index, ..
        } = round
        else {
            return Verdict::Rejected { hint: None };
        };
        match *action {
            Action::Select(cell) if cell >= *cells => Verdict::Rejected { hint: None },
            Action::Select(cell) if cell == *odd_index => Verdict::Advance { score_delta: 1 },
            Action::Select(_) => Verdict::Terminal { score_delta: 0 },
            _ => Verdict::Rejected { hint: None },
        }
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
    fn difference_shrinks_to_floor()
    {
        assert_eq!(color_difference(1), 50);
        assert_eq!(color_difference(2), 47);
        assert_eq!(color_difference(16), 5);
        assert_eq!(color_difference(1000), 5);
    }

    #[test]
    fn odd_square_differs_by_exactly_the_round_difference()
    {
        let mut rng = StdRng::seed_from_u64(21);
        for round in 1..40 {
            let ctx = RoundContext {
                round,
                difficulty: Difficulty::Medium,
                previous: None,
            };
            let plan = OddColor.generate(&ctx, &mut rng).unwrap();
            let RoundState::OddColor {
                base,
                odd,
                odd_index,
                cells,
            } = plan.state
            else {
                panic!("wrong variant");
            };
            let diff = color_difference(round) as i16;
            assert_eq!((odd.r as i16 - base.r as i16).abs(), diff);
            assert_eq!((odd.g as i16 - base.g as i16).abs(), diff);
            assert!(odd_index < cells);
        }
    }
}
