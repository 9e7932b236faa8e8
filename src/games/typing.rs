use super::picks::pick_index;
use super::{
    Action, GameMode, JudgeContext, ProgressRule, RoundContext, RoundPlan, RoundState, Rules,
    ScoreRule, Verdict,
};
use crate::ledger::Direction;
use crate::words::SAMPLE_TEXTS;
use rand::RngCore;
use std::time::Duration;

const PERFECT: i64 = 10_000;

pub fn compute_wpm(words_typed: u32, elapsed: Duration) -> f32
{
    let minutes = elapsed.as_secs_f32() / 60.0;
    if minutes <= 0.0 {
        return 0.0;
    }
    words_typed as f32 / minutes
}

/// Share of characters in `typed` that match `target` at the same position.
pub fn compute_accuracy(target: &str, typed: &str) -> f32
{
    let total = target.chars().count().max(typed.chars().count());
    if total == 0 {
        return 0.0;
    }
    let matching = target
        .chars()
        .zip(typed.chars())
        .filter(|(want, got)| want == got)
        .count();
    (matching as f32 / total as f32) * 100.0
}

/// Type one sample sentence exactly. Faster is better.
pub struct Typing;

impl GameMode for Typing
{
    fn id(&self) -> &'static str
    {
        "typing"
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
        let text = SAMPLE_TEXTS[pick_index(rng, SAMPLE_TEXTS.len())?];
        Some(RoundPlan::new(RoundState::Typing {
            text: text.to_string(),
        }))
    }

    fn fallback(&self) -> RoundPlan
    {
        RoundPlan::new(RoundState::Typing {
            text: "The quick brown fox jumps over the lazy dog.".to_string(),
        })
    }

    fn judge(&self, round: &mut RoundState, action: &Action, ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::Typing { text } = round else {
            return Verdict::Rejected { hint: None };
        };
        let Action::Submit(typed) = action else {
            return Verdict::Rejected { hint: None };
        };
        if typed.trim_end() != text.as_str() {
            return Verdict::rejected("Not quite, check the sentence");
        }

        let elapsed = ctx.elapsed();
        let words = text.split_whitespace().count() as u32;
        ctx.tally.samples.push((PERFECT - elapsed.min(PERFECT as u64) as i64).max(0));
        ctx.tally.note = Some(format!(
            "{:.0} wpm",
            compute_wpm(words, Duration::from_millis(elapsed))
        ));
        Verdict::Advance { score_delta: 0 }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::games::Tally;

    #[test]
    fn wpm_and_accuracy()
    {
        assert_eq!(compute_wpm(10, Duration::from_secs(30)), 20.0);
        assert_eq!(compute_wpm(3, Duration::ZERO), 0.0);
        assert_eq!(compute_accuracy("abcd", "abxd"), 75.0);
        assert_eq!(compute_accuracy("", ""), 0.0);
    }

    #[test]
    fn exact_text_scores_by_speed_mismatch_is_rejected()
    {
        let mut round = RoundState::Typing {
            text: "Bright lights.".to_string(),
        };
        let mut tally = Tally::default();
        let mut ctx = JudgeContext {
            now: 6000,
            round: 1,
            round_started_at: 2000,
            tally: &mut tally,
            cue_after_ms: None,
        };

        let miss = Typing.judge(&mut round, &Action::Submit("bright lights.".to_string()), &mut ctx);
        assert!(!miss.is_accepted());
        let hit = Typing.judge(&mut round, &Action::Submit("Bright lights.".to_string()), &mut ctx);
        assert_eq!(hit, Verdict::Advance { score_delta: 0 });
        assert_eq!(tally.samples, vec![6000]);
        assert_eq!(Typing.label(&tally), Some("30 wpm".to_string()));
    }
}
