//! One [`Session`] is one play-through: `Idle → Countdown → Active →
//! (Resolving → Active)* → (Resolving →)? Complete`. The host feeds the clock
//! in; the session owns its timers and disarms them on every phase exit.

pub mod timer;

use crate::config::{Difficulty, SessionSettings};
use crate::games::{
    Action, CueOutcome, GameMode, JudgeContext, ProgressRule, RoundContext, RoundPlan, RoundState,
    Rules, ScoreRule, Tally, Verdict,
};
use crate::ledger::{Direction, EntryDetail};
use rand::rngs::StdRng;
use timer::{Fired, TimerKind, Timers};
use tracing::{debug, info, warn};

const TICK_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase
{
    Idle,
    Countdown,
    Active,
    Resolving,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress
{
    Timed { remaining_secs: u32 },
    Rounds { index: u32, cap: Option<u32> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult
{
    pub game_id: &'static str,
    pub value: i64,
    pub score: i64,
    pub rounds: u32,
    pub detail: Option<EntryDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent
{
    CountdownTick { remaining: u32 },
    Started,
    ClockTick { remaining: u32 },
    RoundStarted { round: u32 },
    Cue,
    Accepted { score_delta: i64 },
    Rejected { hint: Option<&'static str> },
    /// Input arrived outside `Active` and was dropped.
    Ignored,
    Resolving { finishing: bool },
    Completed(SessionResult),
}

#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a>
{
    pub phase: Phase,
    pub countdown_remaining: u32,
    pub progress: Progress,
    pub score: i64,
    pub round: &'a RoundState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterPause
{
    NextRound,
    Finish,
}

pub struct Session
{
    mode: Box<dyn GameMode>,
    rules: Rules,
    settings: SessionSettings,
    rng: StdRng,
    phase: Phase,
    path: Vec<Phase>,
    countdown_remaining: u32,
    time_remaining: Option<u32>,
    /// Time left until the next clock tick when the clock was paused.
    clock_left: Option<u64>,
    round: u32,
    round_started_at: u64,
    round_state: RoundState,
    tally: Tally,
    timers: Timers,
    after_pause: AfterPause,
    result: Option<SessionResult>,
    torn_down: bool,
}

impl Session
{
    pub fn new(mode: Box<dyn GameMode>, settings: SessionSettings, rng: StdRng) -> Self
    {
        let rules = mode.rules();
        Self {
            mode,
            rules,
            settings,
            rng,
            phase: Phase::Idle,
            path: vec![Phase::Idle],
            countdown_remaining: settings.countdown_secs,
            time_remaining: None,
            clock_left: None,
            round: 0,
            round_started_at: 0,
            round_state: RoundState::Idle,
            tally: Tally::default(),
            timers: Timers::new(),
            after_pause: AfterPause::NextRound,
            result: None,
            torn_down: false,
        }
    }

    pub fn game_id(&self) -> &'static str
    {
        self.mode.id()
    }

    pub fn rules(&self) -> Rules
    {
        self.rules
    }

    pub fn difficulty(&self) -> Difficulty
    {
        self.settings.difficulty
    }

    pub fn phase(&self) -> Phase
    {
        self.phase
    }

    pub fn phase_path(&self) -> &[Phase]
    {
        &self.path
    }

    pub fn countdown_remaining(&self) -> u32
    {
        self.countdown_remaining
    }

    pub fn round_state(&self) -> &RoundState
    {
        &self.round_state
    }

    pub fn tally(&self) -> &Tally
    {
        &self.tally
    }

    pub fn progress(&self) -> Progress
    {
        match self.rules.progress {
            ProgressRule::Timed { secs } => Progress::Timed {
                remaining_secs: self.time_remaining.unwrap_or(secs),
            },
            ProgressRule::Rounds { cap } => Progress::Rounds {
                index: self.round,
                cap,
            },
        }
    }

    /// Current score. Precision modes report the computed value, negated when
    /// lower is better so that a larger score is always a better one.
    pub fn score(&self) -> i64
    {
        match self.rules.scoring {
            ScoreRule::Precision if self.tally.samples.is_empty() => 0,
            ScoreRule::Precision => {
                let value = self.mode.final_value(&self.tally, self.round);
                match self.rules.direction {
                    Direction::Ascending => -value,
                    Direction::Descending => value,
                }
            }
            _ => self.tally.score,
        }
    }

    pub fn result(&self) -> Option<&SessionResult>
    {
        self.result.as_ref()
    }

    pub fn next_timer_due(&self) -> Option<u64>
    {
        self.timers.next_due()
    }

    pub fn has_pending_timers(&self) -> bool
    {
        !self.timers.is_empty()
    }

    pub fn view(&self) -> SessionView<'_>
    {
        SessionView {
            phase: self.phase,
            countdown_remaining: self.countdown_remaining,
            progress: self.progress(),
            score: self.score(),
            round: &self.round_state,
        }
    }

    /// `Idle → Countdown`. Only an idle session can start; a finished one
    /// stays finished and the host creates a new session instead.
    pub fn start(&mut self, now: u64) -> Vec<SessionEvent>
    {
        let mut events = Vec::new();
        if self.phase != Phase::Idle || self.torn_down {
            debug!(game = self.mode.id(), phase = ?self.phase, "Start ignored");
            return events;
        }

        self.countdown_remaining = self.settings.countdown_secs;
        self.time_remaining = None;
        self.clock_left = None;
        self.round = 0;
        self.tally = Tally::default();
        self.round_state = RoundState::Idle;
        self.timers.cancel_all();

        info!(game = self.mode.id(), countdown = self.countdown_remaining, "Session started");
        self.enter(Phase::Countdown);
        if self.countdown_remaining == 0 {
            self.begin_play(now, &mut events);
        } else {
            self.timers.arm_repeating(TimerKind::Countdown, now, TICK_MS);
        }
        events
    }

    pub fn advance(&mut self, now: u64) -> Vec<SessionEvent>
    {
        let mut events = Vec::new();
        while let Some(fired) = self.timers.pop_due(now) {
            self.on_timer(fired, &mut events);
        }
        events
    }

    /// Applies one user action. Timers due at or before `now` fire first, so
    /// whichever event happened first wins.
    pub fn input(&mut self, now: u64, action: Action) -> Vec<SessionEvent>
    {
        let mut events = self.advance(now);
        if self.phase != Phase::Active || self.torn_down {
            events.push(SessionEvent::Ignored);
            return events;
        }

        let (verdict, cue) = {
            let mut ctx = JudgeContext {
                now,
                round: self.round,
                round_started_at: self.round_started_at,
                tally: &mut self.tally,
                cue_after_ms: None,
            };
            let verdict = self.mode.judge(&mut self.round_state, &action, &mut ctx);
            (verdict, ctx.cue_after_ms)
        };
        debug!(game = self.mode.id(), ?action, ?verdict, "Input judged");

        match verdict {
            Verdict::Rejected { hint } => events.push(SessionEvent::Rejected { hint }),
            Verdict::Partial => {
                if let Some(delay) = cue {
                    self.timers.cancel_kind(TimerKind::Cue);
                    self.timers.arm_once(TimerKind::Cue, now, delay);
                }
                events.push(SessionEvent::Accepted { score_delta: 0 });
            }
            Verdict::Advance { score_delta } => {
                self.apply(score_delta);
                events.push(SessionEvent::Accepted { score_delta });
                self.round_done(now, &mut events);
            }
            Verdict::Terminal { score_delta } => {
                self.apply(score_delta);
                events.push(SessionEvent::Accepted { score_delta });
                self.finish(now, &mut events);
            }
        }
        events
    }

    /// Abandons the session. Nothing is recorded.
    pub fn teardown(&mut self)
    {
        if !self.timers.is_empty() {
            debug!(game = self.mode.id(), phase = ?self.phase, "Session torn down with live timers");
        }
        self.timers.cancel_all();
        self.torn_down = true;
    }

    fn enter(&mut self, phase: Phase)
    {
        debug!(game = self.mode.id(), from = ?self.phase, to = ?phase, "Phase change");
        self.phase = phase;
        self.path.push(phase);
    }

    fn apply(&mut self, score_delta: i64)
    {
        self.tally.score = self.tally.score.saturating_add(score_delta);
    }

    fn on_timer(&mut self, fired: Fired, events: &mut Vec<SessionEvent>)
    {
        match (fired.kind, self.phase) {
            (TimerKind::Countdown, Phase::Countdown) => {
                self.countdown_remaining = self.countdown_remaining.saturating_sub(1);
                events.push(SessionEvent::CountdownTick {
                    remaining: self.countdown_remaining,
                });
                if self.countdown_remaining == 0 {
                    self.timers.cancel(fired.id);
                    self.begin_play(fired.at, events);
                }
            }
            (TimerKind::Clock, Phase::Active) => {
                let remaining = self.time_remaining.unwrap_or(0).saturating_sub(1);
                self.time_remaining = Some(remaining);
                events.push(SessionEvent::ClockTick { remaining });
                if remaining == 0 {
                    info!(game = self.mode.id(), "Time is up");
                    self.finish(fired.at, events);
                }
            }
            (TimerKind::Cue, Phase::Active) => {
                events.push(SessionEvent::Cue);
                match self.mode.on_cue(&mut self.round_state, fired.at) {
                    CueOutcome::Rearm(delay) => {
                        self.timers.arm_once(TimerKind::Cue, fired.at, delay);
                    }
                    CueOutcome::Settled => {}
                    CueOutcome::Advance => self.round_done(fired.at, events),
                }
            }
            (TimerKind::Feedback, Phase::Resolving) => match self.after_pause {
                AfterPause::NextRound => self.resume(fired.at, events),
                AfterPause::Finish => self.complete(events),
            },
            (kind, phase) => {
                // Phase exits disarm their timers, so this only fires if that
                // contract is broken somewhere.
                warn!(game = self.mode.id(), ?kind, ?phase, "Timer fired outside its phase");
            }
        }
    }

    fn begin_play(&mut self, now: u64, events: &mut Vec<SessionEvent>)
    {
        self.enter(Phase::Active);
        events.push(SessionEvent::Started);
        if let ProgressRule::Timed { secs } = self.rules.progress {
            self.time_remaining = Some(secs);
            if secs == 0 {
                self.finish(now, events);
                return;
            }
            self.timers.arm_repeating(TimerKind::Clock, now, TICK_MS);
        }
        self.round = 1;
        self.start_round(now, events);
    }

    fn start_round(&mut self, now: u64, events: &mut Vec<SessionEvent>)
    {
        // The round just played, as the player left it.
        let previous = match &self.round_state {
            RoundState::Idle => None,
            state => Some(state),
        };
        let plan = {
            let ctx = RoundContext {
                round: self.round,
                difficulty: self.settings.difficulty,
                previous,
            };
            self.mode.generate(&ctx, &mut self.rng)
        };
        let plan = match plan {
            Some(plan) => plan,
            None => {
                warn!(game = self.mode.id(), round = self.round, "Round generation failed");
                match &self.round_state {
                    RoundState::Idle => self.mode.fallback(),
                    state => RoundPlan::new(state.clone()),
                }
            }
        };

        self.timers.cancel_kind(TimerKind::Cue);
        self.round_state = plan.state;
        self.round_started_at = now;
        if let Some(delay) = plan.cue_after_ms {
            self.timers.arm_once(TimerKind::Cue, now, delay);
        }
        events.push(SessionEvent::RoundStarted { round: self.round });
    }

    fn round_done(&mut self, now: u64, events: &mut Vec<SessionEvent>)
    {
        if let ProgressRule::Rounds { cap: Some(cap) } = self.rules.progress {
            if self.round >= cap {
                self.finish(now, events);
                return;
            }
        }
        if self.rules.feedback_pause_ms > 0 {
            self.pause(now, AfterPause::NextRound, events);
        } else {
            self.round += 1;
            self.start_round(now, events);
        }
    }

    fn leave_active(&mut self)
    {
        self.timers.cancel_kind(TimerKind::Clock);
        self.timers.cancel_kind(TimerKind::Cue);
    }

    fn pause(&mut self, now: u64, after: AfterPause, events: &mut Vec<SessionEvent>)
    {
        self.clock_left = self
            .timers
            .due_of(TimerKind::Clock)
            .map(|due| due.saturating_sub(now));
        self.leave_active();
        self.after_pause = after;
        self.enter(Phase::Resolving);
        self.timers
            .arm_once(TimerKind::Feedback, now, self.rules.feedback_pause_ms);
        events.push(SessionEvent::Resolving {
            finishing: after == AfterPause::Finish,
        });
    }

    fn resume(&mut self, now: u64, events: &mut Vec<SessionEvent>)
    {
        self.timers.cancel_kind(TimerKind::Feedback);
        self.enter(Phase::Active);
        if let Some(remaining) = self.time_remaining {
            if remaining > 0 {
                let first = self.clock_left.take().unwrap_or(TICK_MS);
                self.timers
                    .arm_repeating_after(TimerKind::Clock, now, first, TICK_MS);
            }
        }
        self.round += 1;
        self.start_round(now, events);
    }

    fn finish(&mut self, now: u64, events: &mut Vec<SessionEvent>)
    {
        if self.rules.feedback_pause_ms > 0 {
            self.pause(now, AfterPause::Finish, events);
        } else {
            self.complete(events);
        }
    }

    fn complete(&mut self, events: &mut Vec<SessionEvent>)
    {
        if self.phase == Phase::Complete {
            return;
        }
        self.timers.cancel_all();
        self.enter(Phase::Complete);

        let label = self.mode.label(&self.tally);
        let detail = if label.is_some() || !self.tally.words.is_empty() {
            Some(EntryDetail {
                label,
                words: self.tally.words.clone(),
            })
        } else {
            None
        };
        let result = SessionResult {
            game_id: self.mode.id(),
            value: self.mode.final_value(&self.tally, self.round),
            score: self.score(),
            rounds: self.round,
            detail,
        };
        info!(
            game = result.game_id,
            value = result.value,
            rounds = result.rounds,
            "Session complete"
        );
        self.result = Some(result.clone());
        events.push(SessionEvent::Completed(result));
    }
}

impl Drop for Session
{
    fn drop(&mut self)
    {
        self.teardown();
    }
}
