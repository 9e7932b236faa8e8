use super::{
    Action, GameMode, JudgeContext, Operator, ProgressRule, RoundContext, RoundPlan, RoundState,
    Rules, ScoreRule, Verdict,
};
use crate::ledger::Direction;
use rand::{Rng, RngCore};

const OPERAND_MAX: i64 = 50;

pub fn answer(a: i64, b: i64, op: Operator) -> i64
{
    match op {
        Operator::Add => a + b,
        Operator::Sub => a - b,
    }
}

pub struct Arithmetic;

impl GameMode for Arithmetic
{
    fn id(&self) -> &'static str
    {
        "arithmetic"
    }

    fn rules(&self) -> Rules
    {
        Rules {
            progress: ProgressRule::Rounds { cap: None },
            scoring: ScoreRule::Accumulate,
            direction: Direction::Descending,
            ledger_limit: Some(5),
            feedback_pause_ms: 0,
        }
    }

    fn generate(&self, _ctx: &RoundContext<'_>, rng: &mut dyn RngCore) -> Option<RoundPlan>
    {
        let op = if rng.gen_bool(0.5) {
            Operator::Add
        } else {
            Operator::Sub
        };
        Some(RoundPlan::new(RoundState::Arithmetic {
            a: rng.gen_range(0..OPERAND_MAX),
            b: rng.gen_range(0..OPERAND_MAX),
            op,
        }))
    }

    fn fallback(&self) -> RoundPlan
    {
        RoundPlan::new(RoundState::Arithmetic {
            a: 2,
            b: 2,
            op: Operator::Add,
        })
    }

    fn judge(&self, round: &mut RoundState, action: &Action, _ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::Arithmetic { a, b, op } = *round else {
            return Verdict::Rejected { hint: None };
        };
        let Action::Submit(text) = action else {
            return Verdict::Rejected { hint: None };
        };
        let text = text.trim();
        if text.is_empty() {
            return Verdict::rejected("Type an answer first");
        }
        let Ok(guess) = text.parse::<i64>() else {
            return Verdict::rejected("Answers are whole numbers");
        };

        if guess == answer(a, b, op) {
            Verdict::Advance { score_delta: 1 }
        } else {
            Verdict::Terminal { score_delta: 0 }
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::games::Tally;

    fn submit(round: &mut RoundState, text: &str) -> Verdict
    {
        let mut tally = Tally::default();
        let mut ctx = JudgeContext {
            now: 0,
            round: 1,
            round_started_at: 0,
            tally: &mut tally,
            cue_after_ms: None,
        };
        Arithmetic.judge(round, &Action::Submit(text.to_string()), &mut ctx)
    }

    #[test]
    fn correct_answer_advances_wrong_answer_ends()
    {
        let mut round = RoundState::Arithmetic {
            a: 12,
            b: 30,
            op: Operator::Sub,
        };
        assert_eq!(submit(&mut round, " -18 "), Verdict::Advance { score_delta: 1 });
        assert_eq!(submit(&mut round, "18"), Verdict::Terminal { score_delta: 0 });
    }

    #[test]
    fn malformed_text_is_a_no_op()
    {
        let mut round = RoundState::Arithmetic {
            a: 1,
            b: 1,
            op: Operator::Add,
        };
        assert!(!submit(&mut round, "").is_accepted());
        assert!(!submit(&mut round, "two").is_accepted());
        assert!(!submit(&mut round, "2.0").is_accepted());
    }
}
