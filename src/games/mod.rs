//! Game modes. The session never looks inside a [`RoundState`]; only the
//! mode that produced a variant interprets it.

pub mod aim;
pub mod arithmetic;
pub mod bomb;
pub mod catch;
pub mod estimate;
pub mod face_finder;
pub mod odd_color;
pub mod pairs;
pub mod pattern;
pub mod picks;
pub mod random_words;
pub mod reaction;
pub mod rhythm;
pub mod stroop;
pub mod tapper;
pub mod typing;
pub mod unscramble;
pub mod word_builder;
pub mod wordle;

use crate::config::Difficulty;
use crate::ledger::Direction;
use rand::RngCore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action
{
    Tap,
    Select(usize),
    Submit(String),
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressRule
{
    Timed { secs: u32 },
    Rounds { cap: Option<u32> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreRule
{
    Accumulate,
    /// Round index the session ended on.
    RoundsSurvived,
    /// Mean of the measured samples unless the mode says otherwise.
    Precision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules
{
    pub progress: ProgressRule,
    pub scoring: ScoreRule,
    pub direction: Direction,
    pub ledger_limit: Option<usize>,
    pub feedback_pause_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb
{
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator
{
    Add,
    Sub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink
{
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item
{
    Apple,
    Banana,
    Bee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterState
{
    Correct,
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt
{
    pub guess: String,
    pub states: Vec<LetterState>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoundState
{
    Idle,
    Reaction {
        go: bool,
        cue_at: Option<u64>,
    },
    Tapper,
    Grid {
        size: usize,
        pattern: Vec<usize>,
        picked: Vec<usize>,
        showing: bool,
    },
    Simon {
        pads: usize,
        sequence: Vec<usize>,
        entered: usize,
        lit: Option<usize>,
        step: usize,
        playing: bool,
    },
    OddColor {
        cells: usize,
        base: Rgb,
        odd: Rgb,
        odd_index: usize,
    },
    Arithmetic {
        a: i64,
        b: i64,
        op: Operator,
    },
    Letters {
        allowed: Vec<char>,
    },
    Bomb {
        bomb: usize,
        revealed: Vec<bool>,
    },
    Estimate {
        target_ms: u64,
    },
    Typing {
        text: String,
    },
    Unscramble {
        word: String,
        scrambled: String,
    },
    Stroop {
        word: Ink,
        ink: Ink,
    },
    Catch {
        item: Item,
        lane: usize,
    },
    Aim {
        cells: usize,
        target: usize,
    },
    Wordle {
        secret: String,
        attempts: Vec<Attempt>,
    },
    Faces {
        target: &'static str,
        decoy: &'static str,
        cells: usize,
        at: usize,
    },
    Pairs {
        faces: Vec<&'static str>,
        matched: Vec<bool>,
        open: Vec<usize>,
    },
    Rhythm {
        free_from: Option<u64>,
        flash: bool,
        beats: u32,
    },
    Initial {
        letter: char,
    },
}

pub struct RoundContext<'a>
{
    pub round: u32,
    pub difficulty: Difficulty,
    pub previous: Option<&'a RoundState>,
}

pub struct RoundPlan
{
    pub state: RoundState,
    /// Arms a one-shot cue this many ms after the round begins.
    pub cue_after_ms: Option<u64>,
}

impl RoundPlan
{
    pub fn new(state: RoundState) -> Self
    {
        Self {
            state,
            cue_after_ms: None,
        }
    }

    pub fn with_cue(state: RoundState, delay_ms: u64) -> Self
    {
        Self {
            state,
            cue_after_ms: Some(delay_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict
{
    Rejected { hint: Option<&'static str> },
    /// Accepted, round still open.
    Partial,
    Advance { score_delta: i64 },
    Terminal { score_delta: i64 },
}

impl Verdict
{
    pub fn rejected(hint: &'static str) -> Self
    {
        Verdict::Rejected { hint: Some(hint) }
    }

    pub fn is_accepted(&self) -> bool
    {
        !matches!(self, Verdict::Rejected { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueOutcome
{
    Rearm(u64),
    Settled,
    Advance,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally
{
    pub score: i64,
    pub samples: Vec<i64>,
    pub words: Vec<String>,
    /// Short summary stored with the ledger entry.
    pub note: Option<String>,
    pub forfeited: bool,
}

impl Tally
{
    pub fn mean_sample(&self) -> i64
    {
        if self.samples.is_empty() {
            return 0;
        }
        self.samples.iter().sum::<i64>() / self.samples.len() as i64
    }
}

pub struct JudgeContext<'a>
{
    pub now: u64,
    pub round: u32,
    pub round_started_at: u64,
    pub tally: &'a mut Tally,
    /// Set by a `Partial` verdict to (re)arm the round cue from `now`.
    pub cue_after_ms: Option<u64>,
}

impl JudgeContext<'_>
{
    pub fn elapsed(&self) -> u64
    {
        self.now.saturating_sub(self.round_started_at)
    }
}

pub trait GameMode
{
    fn id(&self) -> &'static str;

    fn rules(&self) -> Rules;

    /// `None` means generation failed; the session then keeps the round in
    /// play, or uses [`GameMode::fallback`] on the first round.
    fn generate(&self, ctx: &RoundContext<'_>, rng: &mut dyn RngCore) -> Option<RoundPlan>;

    fn fallback(&self) -> RoundPlan;

    fn judge(&self, round: &mut RoundState, action: &Action, ctx: &mut JudgeContext<'_>) -> Verdict;

    fn on_cue(&self, _round: &mut RoundState, _now: u64) -> CueOutcome
    {
        CueOutcome::Settled
    }

    fn final_value(&self, tally: &Tally, round: u32) -> i64
    {
        if tally.forfeited {
            return 0;
        }
        match self.rules().scoring {
            ScoreRule::Accumulate => tally.score,
            ScoreRule::RoundsSurvived => round as i64,
            ScoreRule::Precision => tally.mean_sample(),
        }
    }

    fn label(&self, tally: &Tally) -> Option<String>
    {
        tally.note.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeKind
{
    Reaction { rounds: u32 },
    Tapper { secs: u32 },
    GridMemory,
    Simon,
    OddColor,
    Arithmetic,
    WordBuilder { secs: u32 },
    Bomb,
    Estimate,
    Typing,
    Unscramble,
    Stroop,
    Catch { secs: u32 },
    Aim { secs: u32 },
    Wordle,
    FaceFinder,
    Pairs,
    Rhythm,
    RandomWords { secs: u32 },
}

impl ModeKind
{
    pub fn from_id(id: &str) -> Option<Self>
    {
        let kind = match id {
            "reaction" => ModeKind::Reaction {
                rounds: reaction::DEFAULT_ROUNDS,
            },
            "tapper" => ModeKind::Tapper {
                secs: tapper::DEFAULT_SECS,
            },
            "grid-memory" => ModeKind::GridMemory,
            "simon" => ModeKind::Simon,
            "odd-color" => ModeKind::OddColor,
            "arithmetic" => ModeKind::Arithmetic,
            "word-builder" => ModeKind::WordBuilder {
                secs: word_builder::DEFAULT_SECS,
            },
            "bomb" => ModeKind::Bomb,
            "estimate" => ModeKind::Estimate,
            "typing" => ModeKind::Typing,
            "unscramble" => ModeKind::Unscramble,
            "stroop" => ModeKind::Stroop,
            "catch" => ModeKind::Catch {
                secs: catch::DEFAULT_SECS,
            },
            "aim" => ModeKind::Aim {
                secs: aim::DEFAULT_SECS,
            },
            "wordle" => ModeKind::Wordle,
            "face-finder" => ModeKind::FaceFinder,
            "pairs" => ModeKind::Pairs,
            "rhythm" => ModeKind::Rhythm,
            "random-words" => ModeKind::RandomWords {
                secs: random_words::DEFAULT_SECS,
            },
            _ => return None,
        };
        Some(kind)
    }

    pub fn build(&self, difficulty: Difficulty) -> Box<dyn GameMode>
    {
        match *self {
            ModeKind::Reaction { rounds } => Box::new(reaction::Reaction::new(rounds)),
            ModeKind::Tapper { secs } => Box::new(tapper::Tapper::new(secs)),
            ModeKind::GridMemory => Box::new(pattern::GridMemory),
            ModeKind::Simon => Box::new(pattern::Simon),
            ModeKind::OddColor => Box::new(odd_color::OddColor),
            ModeKind::Arithmetic => Box::new(arithmetic::Arithmetic),
            ModeKind::WordBuilder { secs } => Box::new(word_builder::WordBuilder::new(secs)),
            ModeKind::Bomb => Box::new(bomb::Bomb),
            ModeKind::Estimate => Box::new(estimate::Estimate),
            ModeKind::Typing => Box::new(typing::Typing),
            ModeKind::Unscramble => Box::new(unscramble::Unscramble),
            ModeKind::Stroop => Box::new(stroop::Stroop::new(difficulty)),
            ModeKind::Catch { secs } => Box::new(catch::Catch::new(secs)),
            ModeKind::Aim { secs } => Box::new(aim::Aim::new(secs)),
            ModeKind::Wordle => Box::new(wordle::Wordle),
            ModeKind::FaceFinder => Box::new(face_finder::FaceFinder),
            ModeKind::Pairs => Box::new(pairs::Pairs),
            ModeKind::Rhythm => Box::new(rhythm::Rhythm),
            ModeKind::RandomWords { secs } => Box::new(random_words::RandomWords::new(secs)),
        }
    }
}

pub struct GameDescriptor
{
    pub name: &'static str,
    pub description: &'static str,
}

pub fn registry() -> Vec<GameDescriptor>
{
    vec![
        GameDescriptor {
            name: "reaction",
            description: "Tap as soon as the light turns green, five times",
        },
        GameDescriptor {
            name: "tapper",
            description: "Mash the button for ten seconds",
        },
        GameDescriptor {
            name: "grid-memory",
            description: "Remember which squares lit up",
        },
        GameDescriptor {
            name: "simon",
            description: "Repeat a growing colour sequence",
        },
        GameDescriptor {
            name: "odd-color",
            description: "Spot the square with the odd shade",
        },
        GameDescriptor {
            name: "arithmetic",
            description: "Quick sums until the first mistake",
        },
        GameDescriptor {
            name: "word-builder",
            description: "Make words from seven letters in thirty seconds",
        },
        GameDescriptor {
            name: "bomb",
            description: "Reveal safe squares and cash out before the bomb",
        },
        GameDescriptor {
            name: "estimate",
            description: "Stop the clock on the target time",
        },
        GameDescriptor {
            name: "typing",
            description: "Type the sentence as fast as you can",
        },
        GameDescriptor {
            name: "unscramble",
            description: "Unscramble words against the clock",
        },
        GameDescriptor {
            name: "stroop",
            description: "Name the ink, not the word",
        },
        GameDescriptor {
            name: "catch",
            description: "Catch the fruit, dodge the bees",
        },
        GameDescriptor {
            name: "aim",
            description: "Hit the moving target",
        },
        GameDescriptor {
            name: "wordle",
            description: "Guess the five-letter word in six tries",
        },
        GameDescriptor {
            name: "face-finder",
            description: "Find the odd face in the crowd, three times",
        },
        GameDescriptor {
            name: "pairs",
            description: "Flip cards two at a time and match every pair",
        },
        GameDescriptor {
            name: "rhythm",
            description: "Follow the beat, then keep it without help",
        },
        GameDescriptor {
            name: "random-words",
            description: "Words starting with one letter in thirty seconds",
        },
    ]
}
