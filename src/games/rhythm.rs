use super::{
    Action, CueOutcome, GameMode, JudgeContext, ProgressRule, RoundContext, RoundPlan, RoundState,
    Rules, ScoreRule, Tally, Verdict,
};
use crate::ledger::Direction;
use rand::RngCore;

/// 120 bpm.
pub const BEAT_MS: u64 = 500;
const FLASH_MS: u64 = 100;
const GUIDED_BEATS: u32 = 10;
const FREE_MS: u64 = 10_000;
const MAX_ERROR_MS: i64 = BEAT_MS as i64;

/// Keep the beat. Five seconds of flashes set the tempo, then ten seconds
/// without them are scored on how close the taps land to the beat.
pub struct Rhythm;

/// `1000 - mean error`, floored at zero. Each expected beat of the free
/// stretch takes the error of its nearest tap, capped at one beat.
pub fn timing_score(taps: &[i64]) -> i64
{
    let beats = (FREE_MS / BEAT_MS) as i64;
    let total: i64 = (0..beats)
        .map(|beat| {
            let expected = beat * BEAT_MS as i64;
            taps.iter()
                .map(|tap| (tap - expected).abs())
                .min()
                .unwrap_or(MAX_ERROR_MS)
                .min(MAX_ERROR_MS)
        })
        .sum();
    let mean = total as f64 / beats as f64;
    (1000.0 - mean).floor().max(0.0) as i64
}

impl GameMode for Rhythm
{
    fn id(&self) -> &'static str
    {
        "rhythm"
    }

    fn rules(&self) -> Rules
    {
        Rules {
            progress: ProgressRule::Rounds { cap: Some(1) },
            scoring: ScoreRule::Precision,
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
        RoundPlan::with_cue(
            RoundState::Rhythm {
                free_from: None,
                flash: false,
                beats: 0,
            },
            BEAT_MS,
        )
    }

    fn judge(&self, round: &mut RoundState, action: &Action, ctx: &mut JudgeContext<'_>) -> Verdict
    {
        let RoundState::Rhythm { free_from, .. } = *round else {
            return Verdict::Rejected { hint: None };
        };
        if *action != Action::Tap {
            return Verdict::Rejected { hint: None };
        }
        // Taps during the flashes are practice.
        if let Some(start) = free_from {
            ctx.tally.samples.push(ctx.now.saturating_sub(start) as i64);
        }
        Verdict::Partial
    }

    fn on_cue(&self, round: &mut RoundState, now: u64) -> CueOutcome
    {
        let RoundState::Rhythm {
            free_from,
            flash,
            beats,
        } = round
        else {
            return CueOutcome::Settled;
        };
        if free_from.is_some() {
            return CueOutcome::Advance;
        }
        if *flash {
            *flash = false;
            return CueOutcome::Rearm(BEAT_MS - FLASH_MS);
        }
        *beats += 1;
        if *beats >= GUIDED_BEATS {
            *free_from = Some(now);
            CueOutcome::Rearm(FREE_MS)
        } else {
            *flash = true;
            CueOutcome::Rearm(FLASH_MS)
        }
    }

    fn final_value(&self, tally: &Tally, _round: u32) -> i64
    {
        timing_score(&tally.samples)
    }

    fn label(&self, tally: &Tally) -> Option<String>
    {
        Some(format!("{} taps", tally.samples.len()))
    }
}
