#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind
{
    Countdown,
    Clock,
    Cue,
    Feedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired
{
    pub id: TimerId,
    pub kind: TimerKind,
    pub at: u64,
}

#[derive(Debug, Clone)]
struct Armed
{
    id: TimerId,
    kind: TimerKind,
    due: u64,
    period: Option<u64>,
}

/// Session-owned timers. Nothing runs on its own; a cancelled timer is
/// removed outright and can never be popped later.
#[derive(Debug, Default)]
pub struct Timers
{
    next_id: u64,
    armed: Vec<Armed>,
}

impl Timers
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn arm_once(&mut self, kind: TimerKind, now: u64, delay_ms: u64) -> TimerId
    {
        self.arm(kind, now.saturating_add(delay_ms), None)
    }

    pub fn arm_repeating(&mut self, kind: TimerKind, now: u64, period_ms: u64) -> TimerId
    {
        self.arm_repeating_after(kind, now, period_ms, period_ms)
    }

    /// Repeating timer whose first period is cut short to `first_ms`.
    pub fn arm_repeating_after(
        &mut self,
        kind: TimerKind,
        now: u64,
        first_ms: u64,
        period_ms: u64,
    ) -> TimerId
    {
        let period = period_ms.max(1);
        self.arm(kind, now.saturating_add(first_ms), Some(period))
    }

    fn arm(&mut self, kind: TimerKind, due: u64, period: Option<u64>) -> TimerId
    {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.armed.push(Armed {
            id,
            kind,
            due,
            period,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId)
    {
        self.armed.retain(|timer| timer.id != id);
    }

    pub fn cancel_kind(&mut self, kind: TimerKind)
    {
        self.armed.retain(|timer| timer.kind != kind);
    }

    pub fn cancel_all(&mut self)
    {
        self.armed.clear();
    }

    pub fn is_armed(&self, id: TimerId) -> bool
    {
        self.armed.iter().any(|timer| timer.id == id)
    }

    pub fn has_kind(&self, kind: TimerKind) -> bool
    {
        self.armed.iter().any(|timer| timer.kind == kind)
    }

    pub fn is_empty(&self) -> bool
    {
        self.armed.is_empty()
    }

    /// Earliest due time among the timers of `kind`.
    pub fn due_of(&self, kind: TimerKind) -> Option<u64>
    {
        self.armed
            .iter()
            .filter(|timer| timer.kind == kind)
            .map(|timer| timer.due)
            .min()
    }

    pub fn next_due(&self) -> Option<u64>
    {
        self.armed.iter().map(|timer| timer.due).min()
    }

    /// Earliest timer due at or before `now`; ties go in arming order.
    /// Repeating timers re-arm one period after their due time.
    pub fn pop_due(&mut self, now: u64) -> Option<Fired>
    {
        let index = self
            .armed
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= now)
            .min_by_key(|(_, timer)| (timer.due, timer.id.0))
            .map(|(idx, _)| idx)?;

        let timer = self.armed.remove(index);
        let fired = Fired {
            id: timer.id,
            kind: timer.kind,
            at: timer.due,
        };
        if let Some(period) = timer.period {
            self.armed.push(Armed {
                due: timer.due.saturating_add(period),
                ..timer
            });
        }
        Some(fired)
    }
}
