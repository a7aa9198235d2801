//! Debounced propagation of rapidly changing values
//!
//! [`ChangeDebouncer`] takes many updates in and emits one settled value after
//! a quiet period. Every [`ChangeDebouncer::process`] call restarts the quiet
//! window (debounce, not throttle), so a stream of updates that never pauses
//! for a full window never settles. Callers that need an upper bound on
//! latency must add their own fallback.
//!
//! Timers come from a [`Scheduler`]. [`TokioScheduler`] runs them on the
//! current `LocalSet`; [`ManualScheduler`] runs them on a virtual clock that
//! the caller advances explicitly. Hosts that drive their own frame loop can
//! use the poll-based [`DebounceTimer`] instead.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

/// Default quiet window for selection changes
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(100);

/// Handle to a scheduled task
pub trait TimerHandle {
    /// Cancels the task if it has not run yet.
    fn cancel(&self);
}

/// Source of cancellable delayed callbacks
pub trait Scheduler {
    /// Handle returned for each scheduled task
    type Handle: TimerHandle;

    /// Runs `task` once after `delay`, unless cancelled first.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle;
}

/// Schedules tasks on the current tokio `LocalSet`
///
/// # Panics
///
/// [`Scheduler::schedule`] panics when called outside a `LocalSet`, the same
/// as `tokio::task::spawn_local`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    type Handle = tokio::task::JoinHandle<()>;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle {
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            task();
        })
    }
}

impl TimerHandle for tokio::task::JoinHandle<()> {
    fn cancel(&self) {
        self.abort();
    }
}

struct ScheduledTask {
    id: u64,
    deadline: Duration,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    next_id: u64,
    tasks: Vec<ScheduledTask>,
}

/// Scheduler driven by an explicit virtual clock
///
/// Nothing runs until [`ManualScheduler::advance`] moves the clock past a
/// task's deadline. Clones share the clock.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<ManualClock>>,
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clock = self.clock.borrow();
        f.debug_struct("ManualScheduler")
            .field("now", &clock.now)
            .field("pending", &clock.tasks.len())
            .finish()
    }
}

impl ManualScheduler {
    /// Creates a scheduler with its clock at zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since creation
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    /// Number of tasks waiting to run
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.clock.borrow().tasks.len()
    }

    /// Advances the clock by `by`, running due tasks in deadline order.
    ///
    /// Tasks scheduled by a running task are picked up in the same call if
    /// they fall due before the new time. The clock never moves backwards,
    /// even when a task advances it further itself. Returns the number of
    /// tasks run by this call.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = 0;
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let due = clock
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, task)| task.deadline <= target)
                    .min_by_key(|(_, task)| (task.deadline, task.id))
                    .map(|(index, _)| index);
                match due {
                    Some(index) => {
                        let task = clock.tasks.remove(index);
                        clock.now = clock.now.max(task.deadline);
                        Some(task.task)
                    }
                    None => {
                        clock.now = clock.now.max(target);
                        None
                    }
                }
            };
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}

/// Handle for a task scheduled on a [`ManualScheduler`]
#[derive(Debug, Clone)]
pub struct ManualTimer {
    id: u64,
    clock: Weak<RefCell<ManualClock>>,
}

impl TimerHandle for ManualTimer {
    fn cancel(&self) {
        if let Some(clock) = self.clock.upgrade() {
            clock.borrow_mut().tasks.retain(|task| task.id != self.id);
        }
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualTimer;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle {
        let mut clock = self.clock.borrow_mut();
        let id = clock.next_id;
        clock.next_id += 1;
        let deadline = clock.now + delay;
        clock.tasks.push(ScheduledTask { id, deadline, task });
        ManualTimer {
            id,
            clock: Rc::downgrade(&self.clock),
        }
    }
}

/// Poll-based debounce timer
///
/// Records the instant of the latest change; the change has settled once a
/// full quiet window passes without another [`DebounceTimer::record`].
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    quiet_window: Duration,
    last_change: Option<Instant>,
}

impl DebounceTimer {
    /// Creates a timer with the given quiet window
    #[must_use]
    pub const fn new(quiet_window: Duration) -> Self {
        Self {
            quiet_window,
            last_change: None,
        }
    }

    /// Creates a timer with a 100ms window (selection changes)
    #[must_use]
    pub const fn for_selection() -> Self {
        Self::new(DEFAULT_QUIET_WINDOW)
    }

    /// Creates a timer with a 16ms window (one frame at 60fps)
    #[must_use]
    pub const fn for_render() -> Self {
        Self::new(Duration::from_millis(16))
    }

    /// Records a change at `now`, restarting the quiet window
    pub fn record(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    /// Checks if a change is waiting to settle
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.last_change.is_some()
    }

    /// Checks if the pending change has settled at `now`
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.last_change
            .is_some_and(|last| now.saturating_duration_since(last) >= self.quiet_window)
    }

    /// Clears and returns true if the pending change has settled at `now`
    pub fn take_due(&mut self, now: Instant) -> bool {
        let due = self.is_due(now);
        if due {
            self.last_change = None;
        }
        due
    }

    /// Time left until the pending change settles (for event loop timing)
    #[must_use]
    pub fn time_until_settle(&self, now: Instant) -> Option<Duration> {
        self.last_change.map(|last| {
            self.quiet_window
                .saturating_sub(now.saturating_duration_since(last))
        })
    }

    /// Drops any pending change
    pub fn reset(&mut self) {
        self.last_change = None;
    }

    /// Gets the quiet window
    #[must_use]
    pub const fn quiet_window(&self) -> Duration {
        self.quiet_window
    }
}

struct DebounceShared<V, H> {
    pending: V,
    generation: u64,
    settled: u64,
    timer: Option<H>,
}

type SettledCallback<V> = Rc<RefCell<Box<dyn FnMut(V)>>>;

/// Coalesces rapid updates into one settled callback
///
/// `on_settled` runs exactly once per burst, with the last value passed to
/// [`Self::process`], after `quiet_window` has elapsed with no further calls.
/// Values are moved in, so later mutation by the caller cannot change a
/// value that is already waiting to settle.
pub struct ChangeDebouncer<V, S: Scheduler = TokioScheduler> {
    shared: Rc<RefCell<DebounceShared<V, S::Handle>>>,
    on_settled: SettledCallback<V>,
    scheduler: S,
    quiet_window: Duration,
}

impl<V, S: Scheduler> fmt::Debug for ChangeDebouncer<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("ChangeDebouncer")
            .field("quiet_window", &self.quiet_window)
            .field("generation", &shared.generation)
            .field("pending", &shared.timer.is_some())
            .finish_non_exhaustive()
    }
}

impl<V: Clone + 'static, S: Scheduler> ChangeDebouncer<V, S>
where
    S::Handle: 'static,
{
    /// Creates a debouncer holding `initial` with nothing scheduled
    pub fn new(
        initial: V,
        quiet_window: Duration,
        scheduler: S,
        on_settled: impl FnMut(V) + 'static,
    ) -> Self {
        Self {
            shared: Rc::new(RefCell::new(DebounceShared {
                pending: initial,
                generation: 0,
                settled: 0,
                timer: None,
            })),
            on_settled: Rc::new(RefCell::new(Box::new(on_settled))),
            scheduler,
            quiet_window,
        }
    }

    /// Records `value` and restarts the quiet window.
    pub fn process(&self, value: V) {
        let generation = {
            let mut shared = self.shared.borrow_mut();
            shared.pending = value;
            shared.generation += 1;
            if let Some(timer) = shared.timer.take() {
                timer.cancel();
            }
            shared.generation
        };

        let shared = Rc::downgrade(&self.shared);
        let on_settled = Rc::downgrade(&self.on_settled);
        let task = Box::new(move || {
            let Some(shared) = shared.upgrade() else {
                return;
            };
            let value = {
                let mut shared = shared.borrow_mut();
                if shared.generation != generation {
                    return;
                }
                shared.timer = None;
                shared.settled = generation;
                shared.pending.clone()
            };
            if let Some(callback) = on_settled.upgrade() {
                tracing::debug!(generation, "Debounced value settled");
                (callback.borrow_mut())(value);
            }
        });

        let handle = self.scheduler.schedule(self.quiet_window, task);
        let mut shared = self.shared.borrow_mut();
        // The task may already have run (or been superseded) inside `schedule`
        if shared.generation == generation && shared.settled != generation {
            shared.timer = Some(handle);
        }
    }

    /// Returns a copy of the most recently recorded value
    #[must_use]
    pub fn latest(&self) -> V {
        self.shared.borrow().pending.clone()
    }

    /// Checks if a value is waiting for the quiet window to pass
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.shared.borrow().timer.is_some()
    }

    /// Cancels the pending emission, keeping the latest value
    pub fn cancel(&self) {
        let mut shared = self.shared.borrow_mut();
        shared.generation += 1;
        if let Some(timer) = shared.timer.take() {
            timer.cancel();
        }
    }

    /// Gets the quiet window
    #[must_use]
    pub const fn quiet_window(&self) -> Duration {
        self.quiet_window
    }
}

impl<V, S: Scheduler> Drop for ChangeDebouncer<V, S> {
    fn drop(&mut self) {
        if let Ok(mut shared) = self.shared.try_borrow_mut() {
            if let Some(timer) = shared.timer.take() {
                timer.cancel();
            }
        }
    }
}
