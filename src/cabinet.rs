//! Host-side glue for one game: its ledger plus the session being played.

use crate::config::SessionSettings;
use crate::games::{Action, ModeKind};
use crate::ledger::{Ledger, ScoreEntry};
use crate::session::{Session, SessionEvent, SessionResult, SessionView};
use crate::storage::KeyValueStore;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

pub struct Cabinet
{
    kind: ModeKind,
    settings: SessionSettings,
    ledger: Ledger,
    session: Option<Session>,
    rng: StdRng,
    recorded: bool,
    last_entry: Option<u64>,
}

impl Cabinet
{
    /// Loads the game's ranking from `store`. A seed makes every session's
    /// rounds reproducible.
    pub fn mount(
        kind: ModeKind,
        settings: SessionSettings,
        store: Box<dyn KeyValueStore>,
        seed: Option<u64>,
    ) -> Self
    {
        let mode = kind.build(settings.difficulty);
        let rules = mode.rules();
        let ledger = Ledger::load(mode.id(), rules.direction, rules.ledger_limit, store);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!(game = mode.id(), entries = ledger.view().len(), "Cabinet mounted");
        Self {
            kind,
            settings,
            ledger,
            session: None,
            rng,
            recorded: false,
            last_entry: None,
        }
    }

    pub fn game_id(&self) -> &str
    {
        self.ledger.game_id()
    }

    /// Replaces any session in progress with a fresh one and starts it. The
    /// replaced session is torn down and records nothing.
    pub fn start(&mut self, now: u64) -> Vec<SessionEvent>
    {
        self.leave();
        let mode = self.kind.build(self.settings.difficulty);
        let rng = StdRng::seed_from_u64(self.rng.next_u64());
        let mut session = Session::new(mode, self.settings, rng);
        let events = session.start(now);
        self.session = Some(session);
        self.recorded = false;
        self.settle(events)
    }

    pub fn advance(&mut self, now: u64) -> Vec<SessionEvent>
    {
        let events = match self.session.as_mut() {
            Some(session) => session.advance(now),
            None => Vec::new(),
        };
        self.settle(events)
    }

    pub fn input(&mut self, now: u64, action: Action) -> Vec<SessionEvent>
    {
        let events = match self.session.as_mut() {
            Some(session) => session.input(now, action),
            None => vec![SessionEvent::Ignored],
        };
        self.settle(events)
    }

    pub fn session(&self) -> Option<&Session>
    {
        self.session.as_ref()
    }

    pub fn view(&self) -> Option<SessionView<'_>>
    {
        self.session.as_ref().map(Session::view)
    }

    pub fn next_timer_due(&self) -> Option<u64>
    {
        self.session.as_ref().and_then(Session::next_timer_due)
    }

    pub fn ranking(&self) -> &[ScoreEntry]
    {
        self.ledger.view()
    }

    /// Rank of the most recently recorded entry, if it made the board.
    pub fn last_position(&self) -> Option<usize>
    {
        self.last_entry.and_then(|id| self.ledger.position(id))
    }

    pub fn leave(&mut self)
    {
        if let Some(mut session) = self.session.take() {
            session.teardown();
        }
    }

    pub fn reset_scores(&mut self)
    {
        self.ledger.clear();
        self.last_entry = None;
    }

    fn settle(&mut self, events: Vec<SessionEvent>) -> Vec<SessionEvent>
    {
        for event in &events {
            if let SessionEvent::Completed(result) = event {
                self.record(result);
            }
        }
        events
    }

    fn record(&mut self, result: &SessionResult)
    {
        if self.recorded {
            return;
        }
        self.recorded = true;

        let id = self.ledger.next_id(unix_millis());
        let entry = ScoreEntry {
            id,
            value: result.value,
            detail: result.detail.clone(),
        };
        self.ledger.record(entry);
        self.last_entry = Some(id);
        info!(
            game = result.game_id,
            value = result.value,
            position = ?self.ledger.position(id),
            "Score recorded"
        );
    }
}

impl Drop for Cabinet
{
    fn drop(&mut self)
    {
        self.leave();
    }
}

fn unix_millis() -> u64
{
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
