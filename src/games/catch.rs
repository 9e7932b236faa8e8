use super::picks::{draw_unit, pick_index, pick_tier};
use super::{
    Action, CueOutcome, GameMode, Item, JudgeContext, ProgressRule, RoundContext, RoundPlan,
    RoundState, Rules, ScoreRule, Verdict,
};
use crate::ledger::Direction;
use rand::RngCore;

pub const DEFAULT_SECS: u32 = 30;
pub const LANES: usize = 5;
const FALL_MS: u64 = 1500;

/// Draw thresholds: banana below 0.1, bee below 0.3, apple otherwise.
const ITEM_BANDS: [(f64, Item); 2] = [(0.1, Item::Banana), (0.3, Item::Bee)];

impl Item
{
    /// Points for catching it; `None` ends the session.
    pub fn points(self) -> Option<i64>
    {
        match self {
            Item::Apple => Some(1),
            Item::Banana => Some(2),
            Item::Bee => None,
        }
    }
}

/// Items drop one at a time. Catch fruit with `Tap`, let bees pass with
/// `Stop` or by waiting until they fall away.
pub struct Catch
{
    secs: u32,
}

impl Catch
{
    pub fn new(secs: u32) -> Self
    {
        Self { secs: secs.max(1) }
    }
}

impl GameMode for Catch
{
    fn id(&self) -> &'static str
    {
        "catch"
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

    fn generate(&self, _ctx: &RoundContext<'_>, rng: &mut dyn RngCore) -> Option<RoundPlan>
    {
        let item = pick_tier(draw_unit(rng), &ITEM_BANDS, Item::Apple);
        let lane = pick_index(rng, LANES)?;
        Some(RoundPlan::with_cue(RoundState::Catch { item, lane }, FALL_MS))
    }

    fn fallback(&self) -> RoundPlan
    {
        RoundPlan::with_cue(
            RoundState::Catch {
                item: Item::Apple,
                lane: LANES / 2,
            },
            FALL_MS,
        )
    }

    fn judge(&self, round: &mut RoundState, action: &Action, _ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::Catch { item, .. } = *round else {
            return Verdict::Rejected { hint: None };
        };
        match action {
            Action::Tap => match item.points() {
                Some(score_delta) => Verdict::Advance { score_delta },
                None => Verdict::Terminal { score_delta: 0 },
            },
            Action::Stop => Verdict::Advance { score_delta: 0 },
            _ => Verdict::Rejected { hint: None },
        }
    }

    fn on_cue(&self, _round: &mut RoundState, _now: u64) -> CueOutcome
    {
        // Missed it; the next item drops.
        CueOutcome::Advance
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
    fn item_mix_follows_the_bands()
    {
        assert_eq!(pick_tier(0.05, &ITEM_BANDS, Item::Apple), Item::Banana);
        assert_eq!(pick_tier(0.2, &ITEM_BANDS, Item::Apple), Item::Bee);
        assert_eq!(pick_tier(0.8, &ITEM_BANDS, Item::Apple), Item::Apple);

        let mode = Catch::new(DEFAULT_SECS);
        let mut rng = StdRng::seed_from_u64(5);
        let mut apples = 0;
        for round in 1..=1000 {
            let ctx = RoundContext {
                round,
                difficulty: Difficulty::Medium,
                previous: None,
            };
            let plan = mode.generate(&ctx, &mut rng).unwrap();
            assert_eq!(plan.cue_after_ms, Some(FALL_MS));
            if let RoundState::Catch { item: Item::Apple, lane } = plan.state {
                assert!(lane < LANES);
                apples += 1;
            }
        }
        assert!((600..800).contains(&apples), "{apples} apples");
    }

    #[test]
    fn catching_scores_fruit_and_bee_ends()
    {
        let mode = Catch::new(DEFAULT_SECS);
        let mut tally = Tally::default();
        let mut ctx = JudgeContext {
            now: 0,
            round: 1,
            round_started_at: 0,
            tally: &mut tally,
            cue_after_ms: None,
        };
        let mut banana = RoundState::Catch {
            item: Item::Banana,
            lane: 0,
        };
        let mut bee = RoundState::Catch {
            item: Item::Bee,
            lane: 0,
        };
        assert_eq!(mode.judge(&mut banana, &Action::Tap, &mut ctx), Verdict::Advance { score_delta: 2 });
        assert_eq!(mode.judge(&mut bee, &Action::Stop, &mut ctx), Verdict::Advance { score_delta: 0 });
        assert_eq!(mode.judge(&mut bee, &Action::Tap, &mut ctx), Verdict::Terminal { score_delta: 0 });
        assert_eq!(mode.on_cue(&mut bee, 1500), CueOutcome::Advance);
    }
}
