use super::{
    Action, GameMode, JudgeContext, ProgressRule, RoundContext, RoundPlan, RoundState, Rules,
    ScoreRule, Tally, Verdict,
};
use crate::ledger::Direction;
use crate::words::{ALLOWED_LETTERS, DICTIONARY};
use rand::RngCore;

pub const DEFAULT_SECS: u32 = 30;
const MIN_WORD_LEN: usize = 2;

/// Build dictionary words out of a fixed set of letters before time runs out.
/// Each accepted word scores its length.
pub struct WordBuilder
{
    secs: u32,
}

impl WordBuilder
{
    pub fn new(secs: u32) -> Self
    {
        Self { secs: secs.max(1) }
    }
}

pub fn check_word(word: &str, allowed: &[char], used: &[String]) -> Result<(), &'static str>
{
    if word.chars().count() < MIN_WORD_LEN {
        return Err("Too short");
    }
    if !word.chars().all(|ch| allowed.contains(&ch)) {
        return Err("Use only the letters shown");
    }
    if !DICTIONARY.contains(&word) {
        return Err("Not in the dictionary");
    }
    if used.iter().any(|seen| seen == word) {
        return Err("Already used");
    }
    Ok(())
}

impl GameMode for WordBuilder
{
    fn id(&self) -> &'static str
    {
        "word-builder"
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

    fn generate(&self, _ctx: &RoundContext<'_>, _rng: &mut dyn RngCore) -> Option<RoundPlan>
    {
        Some(self.fallback())
    }

    fn fallback(&self) -> RoundPlan
    {
        RoundPlan::new(RoundState::Letters {
            allowed: ALLOWED_LETTERS.to_vec(),
        })
    }

    fn judge(&self, round: &mut RoundState, action: &Action, ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::Letters { allowed } = round else {
            return Verdict::Rejected { hint: None };
        };
        let Action::Submit(text) = action else {
            return Verdict::Rejected { hint: None };
        };
        let word = text.trim().to_ascii_lowercase();
        match check_word(&word, allowed, &ctx.tally.words) {
            Ok(()) => {
                let score_delta = word.chars().count() as i64;
                ctx.tally.words.push(word);
                Verdict::Advance { score_delta }
            }
            Err(hint) => Verdict::rejected(hint),
        }
    }

    fn label(&self, tally: &Tally) -> Option<String>
    {
        Some(format!("{} words", tally.words.len()))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn predicate_checks_length_alphabet_dictionary_and_reuse()
    {
        let used = vec!["star".to_string()];
        assert_eq!(check_word("a", ALLOWED_LETTERS, &used), Err("Too short"));
        assert_eq!(check_word("dog", ALLOWED_LETTERS, &used), Err("Use only the letters shown"));
        assert_eq!(check_word("tsst", ALLOWED_LETTERS, &used), Err("Not in the dictionary"));
        assert_eq!(check_word("star", ALLOWED_LETTERS, &used), Err("Already used"));
        assert_eq!(check_word("alert", ALLOWED_LETTERS, &used), Ok(()));
    }

    #[test]
    fn accepted_words_score_their_length_and_are_remembered()
    {
        let mode = WordBuilder::new(30);
        let mut round = mode.fallback().state;
        let mut tally = Tally::default();
        let mut ctx = JudgeContext {
            now: 0,
            round: 1,
            round_started_at: 0,
            tally: &mut tally,
            cue_after_ms: None,
        };

        let verdict = mode.judge(&mut round, &Action::Submit("Alert".to_string()), &mut ctx);
        assert_eq!(verdict, Verdict::Advance { score_delta: 5 });
        let again = mode.judge(&mut round, &Action::Submit("alert".to_string()), &mut ctx);
        assert_eq!(again, Verdict::rejected("Already used"));
        assert_eq!(tally.words, vec!["alert".to_string()]);
    }
}
