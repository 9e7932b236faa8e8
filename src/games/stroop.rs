use super::picks::{draw_unit, pick_index, pick_index_except};
use super::{
    Action, GameMode, Ink, JudgeContext, ProgressRule, RoundContext, RoundPlan, RoundState, Rules,
    ScoreRule, Verdict,
};
use crate::config::Difficulty;
use crate::ledger::Direction;
use rand::RngCore;

/// Answer buttons, in `Select` index order.
pub const INKS: [Ink; 6] = [
    Ink::Red,
    Ink::Green,
    Ink::Blue,
    Ink::Yellow,
    Ink::Purple,
    Ink::Orange,
];

const MEDIUM_MISMATCH: f64 = 0.7;

impl Ink
{
    pub fn name(self) -> &'static str
    {
        match self {
            Ink::Red => "RED",
            Ink::Green => "GREEN",
            Ink::Blue => "BLUE",
            Ink::Yellow => "YELLOW",
            Ink::Purple => "PURPLE",
            Ink::Orange => "ORANGE",
        }
    }
}

/// Name the ink a colour word is printed in. Wrong answers score nothing and
/// the next word comes up.
pub struct Stroop
{
    difficulty: Difficulty,
}

impl Stroop
{
    pub fn new(difficulty: Difficulty) -> Self
    {
        Self { difficulty }
    }

    fn secs(&self) -> u32
    {
        match self.difficulty {
            Difficulty::Easy => 45,
            Difficulty::Medium => 60,
            Difficulty::Hard => 75,
        }
    }
}

impl GameMode for Stroop
{
    fn id(&self) -> &'static str
    {
        "stroop"
    }

    fn rules(&self) -> Rules
    {
        Rules {
            progress: ProgressRule::Timed { secs: self.secs() },
            scoring: ScoreRule::Accumulate,
            direction: Direction::Descending,
            ledger_limit: Some(10),
            feedback_pause_ms: 0,
        }
    }

    fn generate(&self, _ctx: &RoundContext<'_>, rng: &mut dyn RngCore) -> Option<RoundPlan>
    {
        let word = pick_index(rng, INKS.len())?;
        let mismatch = match self.difficulty {
            Difficulty::Easy => false,
            Difficulty::Medium => draw_unit(rng) < MEDIUM_MISMATCH,
            Difficulty::Hard => true,
        };
        let ink = if mismatch {
            pick_index_except(rng, INKS.len(), Some(word))?
        } else {
            pick_index(rng, INKS.len())?
        };
        Some(RoundPlan::new(RoundState::Stroop {
            word: INKS[word],
            ink: INKS[ink],
        }))
    }

    fn fallback(&self) -> RoundPlan
    {
        RoundPlan::new(RoundState::Stroop {
            word: Ink::Red,
            ink: Ink::Blue,
        })
    }

    fn judge(&self, round: &mut RoundState, action: &Action, _ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::Stroop { ink, .. } = *round else {
            return Verdict::Rejected { hint: None };
        };
        match *action {
            Action::Select(choice) if choice < INKS.len() => {
                let score_delta = if INKS[choice] == ink { 1 } else { 0 };
                Verdict::Advance { score_delta }
            }
            _ => Verdict::Rejected { hint: None },
        }
    }
}
