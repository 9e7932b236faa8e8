use super::picks::pick_index_except;
use super::{
    Action, GameMode, JudgeContext, ProgressRule, RoundContext, RoundPlan, RoundState, Rules,
    ScoreRule, Verdict,
};
use crate::ledger::Direction;
use crate::words::UNSCRAMBLE_WORDS;
use rand::RngCore;
use rand::seq::SliceRandom;

const PERFECT: i64 = 10_000;
const SHUFFLE_TRIES: usize = 8;

/// Shuffles `word` so it reads differently. `None` if every try came back
/// unchanged (e.g. a word made of one repeated letter).
pub fn scramble(word: &str, rng: &mut dyn RngCore) -> Option<String>
{
    let mut letters: Vec<char> = word.chars().collect();
    for _ in 0..SHUFFLE_TRIES {
        letters.shuffle(rng);
        let candidate: String = letters.iter().collect();
        if candidate != word {
            return Some(candidate);
        }
    }
    None
}

/// Unscramble words until you bank the points with `Stop`. Quicker answers
/// score more.
pub struct Unscramble;

impl GameMode for Unscramble
{
    fn id(&self) -> &'static str
    {
        "unscramble"
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

    fn generate(&self, ctx: &RoundContext<'_>, rng: &mut dyn RngCore) -> Option<RoundPlan>
    {
        let last = match ctx.previous {
            Some(RoundState::Unscramble { word, .. }) => {
                UNSCRAMBLE_WORDS.iter().position(|candidate| candidate == word)
            }
            _ => None,
        };
        let word = UNSCRAMBLE_WORDS[pick_index_except(rng, UNSCRAMBLE_WORDS.len(), last)?];
        Some(RoundPlan::new(RoundState::Unscramble {
            scrambled: scramble(word, rng)?,
            word: word.to_string(),
        }))
    }

    fn fallback(&self) -> RoundPlan
    {
        RoundPlan::new(RoundState::Unscramble {
            word: "apple".to_string(),
            scrambled: "pplea".to_string(),
        })
    }

    fn judge(&self, round: &mut RoundState, action: &Action, ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::Unscramble { word, .. } = round else {
            return Verdict::Rejected { hint: None };
        };
        match action {
            Action::Stop => Verdict::Terminal { score_delta: 0 },
            Action::Submit(text) => {
                let guess = text.trim().to_ascii_lowercase();
                if guess.is_empty() {
                    return Verdict::rejected("Type a word first");
                }
                if guess != *word {
                    return Verdict::rejected("Try again");
                }
                let score_delta = (PERFECT - ctx.elapsed().min(PERFECT as u64) as i64).max(0);
                ctx.tally.words.push(guess);
                Verdict::Advance { score_delta }
            }
            _ => Verdict::Rejected { hint: None },
        }
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
    fn scrambled_word_differs_but_keeps_letters()
    {
        let mut rng = StdRng::seed_from_u64(21);
        for word in UNSCRAMBLE_WORDS {
            let scrambled = scramble(word, &mut rng).unwrap();
            assert_ne!(scrambled.as_str(), *word);
            let mut a: Vec<char> = scrambled.chars().collect();
            let mut b: Vec<char> = word.chars().collect();
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b);
        }
        assert_eq!(scramble("aaa", &mut rng), None);
    }

    #[test]
    fn next_word_is_never_the_same()
    {
        let mut rng = StdRng::seed_from_u64(2);
        let mut previous = Unscramble.fallback().state;
        for round in 2..40 {
            let ctx = RoundContext {
                round,
                difficulty: Difficulty::Medium,
                previous: Some(&previous),
            };
            let next = Unscramble.generate(&ctx, &mut rng).unwrap().state;
            let (RoundState::Unscramble { word: a, .. }, RoundState::Unscramble { word: b, .. }) =
                (&previous, &next)
            else {
                panic!("unexpected round state");
            };
            assert_ne!(a, b);
            previous = next;
        }
    }

    #[test]
    fn quick_answer_scores_more_and_stop_banks()
    {
        let mut round = Unscramble.fallback().state;
        let mut tally = Tally::default();
        let mut ctx = JudgeContext {
            now: 2500,
            round: 1,
            round_started_at: 0,
            tally: &mut tally,
            cue_after_ms: None,
        };
        assert_eq!(
            Unscramble.judge(&mut round, &Action::Submit("plea".to_string()), &mut ctx),
            Verdict::rejected("Try again")
        );
        assert_eq!(
            Unscramble.judge(&mut round, &Action::Submit(" Apple".to_string()), &mut ctx),
            Verdict::Advance { score_delta: 7500 }
        );
        assert_eq!(
            Unscramble.judge(&mut round, &Action::Stop, &mut ctx),
            Verdict::Terminal { score_delta: 0 }
        );
    }
}
