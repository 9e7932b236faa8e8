use super::picks::pick_index;
use super::{
    Action, Attempt, GameMode, JudgeContext, LetterState, ProgressRule, RoundContext, RoundPlan,
    RoundState, Rules, ScoreRule, Verdict,
};
use crate::ledger::Direction;
use crate::words::WORDLE_WORDS;
use rand::RngCore;
use std::collections::HashMap;

pub const WORD_LEN: usize = 5;
pub const MAX_ATTEMPTS: usize = 6;

/// Per-letter feedback. Exact matches are claimed first so a repeated letter
/// is only marked present as many times as the secret still holds it.
pub fn evaluate_guess(secret: &str, guess: &str) -> Vec<LetterState>
{
    let secret: Vec<char> = secret.chars().collect();
    let guess: Vec<char> = guess.chars().collect();
    let mut states = vec![LetterState::Absent; guess.len()];
    let mut unclaimed: HashMap<char, usize> = HashMap::new();

    for (idx, want) in secret.iter().enumerate() {
        if guess.get(idx) == Some(want) {
            states[idx] = LetterState::Correct;
        } else {
            *unclaimed.entry(*want).or_insert(0) += 1;
        }
    }

    for (idx, ch) in guess.iter().enumerate() {
        if states[idx] == LetterState::Correct {
            continue;
        }
        if let Some(count) = unclaimed.get_mut(ch) {
            if *count > 0 {
                states[idx] = LetterState::Present;
                *count -= 1;
            }
        }
    }

    states
}

/// Guess the five-letter word in six tries. Ranked by attempts used; a loss
/// records one more than the limit.
pub struct Wordle;

impl GameMode for Wordle
{
    fn id(&self) -> &'static str
    {
        "wordle"
    }

    fn rules(&self) -> Rules
    {
        Rules {
            progress: ProgressRule::Rounds { cap: None },
            scoring: ScoreRule::Precision,
            direction: Direction::Ascending,
            ledger_limit: Some(10),
            feedback_pause_ms: 0,
        }
    }

    fn generate(&self, _ctx: &RoundContext<'_>, rng: &mut dyn RngCore) -> Option<RoundPlan>
    {
        let secret = WORDLE_WORDS[pick_index(rng, WORDLE_WORDS.len())?];
        Some(RoundPlan::new(RoundState::Wordle {
            secret: secret.to_string(),
            attempts: Vec::new(),
        }))
    }

    fn fallback(&self) -> RoundPlan
    {
        RoundPlan::new(RoundState::Wordle {
            secret: "crane".to_string(),
            attempts: Vec::new(),
        })
    }

    fn judge(&self, round: &mut RoundState, action: &Action, ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::Wordle { secret, attempts } = round else {
            return Verdict::Rejected { hint: None };
        };
        let Action::Submit(text) = action else {
            return Verdict::Rejected { hint: None };
        };
        let guess = text.trim().to_ascii_lowercase();
        if guess.chars().count() != WORD_LEN {
            return Verdict::rejected("Guesses are five letters");
        }
        if !guess.chars().all(|ch| ch.is_ascii_lowercase()) {
            return Verdict::rejected("Letters only");
        }

        let solved = guess == *secret;
        ctx.tally.words.push(guess.clone());
        attempts.push(Attempt {
            states: evaluate_guess(secret, &guess),
            guess,
        });

        if solved {
            ctx.tally.samples.push(attempts.len() as i64);
            ctx.tally.note = Some(format!("{}/{}", attempts.len(), MAX_ATTEMPTS));
            Verdict::Terminal { score_delta: 0 }
        } else if attempts.len() >= MAX_ATTEMPTS {
            ctx.tally.samples.push(MAX_ATTEMPTS as i64 + 1);
            ctx.tally.note = Some(format!("X/{MAX_ATTEMPTS} ({secret})"));
            Verdict::Terminal { score_delta: 0 }
        } else {
            Verdict::Partial
        }
    }
}
