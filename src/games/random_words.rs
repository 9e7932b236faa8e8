use super::picks::pick_index;
use super::{
    Action, GameMode, JudgeContext, ProgressRule, RoundContext, RoundPlan, RoundState, Rules,
    ScoreRule, Verdict,
};
use crate::ledger::Direction;
use crate::words::RIVAL_WORDS;
use rand::RngCore;

pub const DEFAULT_SECS: u32 = 30;
const MIN_WORD_LEN: usize = 2;
const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Name words starting with one random letter. A word scores its length
/// unless the computer came up with it too.
pub struct RandomWords
{
    secs: u32,
}

impl RandomWords
{
    pub fn new(secs: u32) -> Self
    {
        Self { secs: secs.max(1) }
    }
}

pub fn rival_words(letter: char) -> &'static [&'static str]
{
    RIVAL_WORDS
        .iter()
        .find(|(initial, _)| *initial == letter)
        .map(|(_, words)| *words)
        .unwrap_or(&[])
}

pub fn check_initial_word(word: &str, letter: char, used: &[String]) -> Result<(), &'static str>
{
    if word.chars().count() < MIN_WORD_LEN {
        return Err("Too short");
    }
    if !word.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err("Letters only");
    }
    if !word.starts_with(letter) {
        return Err("Wrong first letter");
    }
    if used.iter().any(|seen| seen == word) {
        return Err("Already used");
    }
    Ok(())
}

impl GameMode for RandomWords
{
    fn id(&self) -> &'static str
    {
        "random-words"
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

    fn generate(&self, ctx: &RoundContext<'_>, rng: &mut dyn RngCore) -> Option<RoundPlan>
    {
        // One letter for the whole session.
        if let Some(RoundState::Initial { letter }) = ctx.previous {
            return Some(RoundPlan::new(RoundState::Initial { letter: *letter }));
        }
        let letter = ALPHABET.chars().nth(pick_index(rng, ALPHABET.len())?)?;
        Some(RoundPlan::new(RoundState::Initial { letter }))
    }

    fn fallback(&self) -> RoundPlan
    {
        RoundPlan::new(RoundState::Initial { letter: 's' })
    }

    fn judge(&self, round: &mut RoundState, action: &Action, ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::Initial { letter } = *round else {
            return Verdict::Rejected { hint: None };
        };
        let Action::Submit(text) = action else {
            return Verdict::Rejected { hint: None };
        };
        let word = text.trim().to_ascii_lowercase();
        if let Err(hint) = check_initial_word(&word, letter, &ctx.tally.words) {
            return Verdict::rejected(hint);
        }

        let score_delta = if rival_words(letter).iter().any(|rival| *rival == word) {
            0
        } else {
            word.chars().count() as i64
        };
        ctx.tally.words.push(word);
        ctx.tally.note = Some(format!(
            "{} words on {}",
            ctx.tally.words.len(),
            letter.to_ascii_uppercase()
        ));
        Verdict::Advance { score_delta }
    }
}
