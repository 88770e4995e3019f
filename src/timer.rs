use crate::errors::AppError;
use crate::state::AppState;
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

pub const WORK_MINUTES: u64 = 25;
pub const BREAK_MINUTES: u64 = 5;
/// Longest preset accepted from configuration, one day.
pub const MAX_PRESET_MINUTES: u64 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Work,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    CountUp,
    CountDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Stopped, or a countdown already at zero.
    Idle,
    /// One second elapsed; `credit` is set during work sessions.
    Counted { credit: bool },
    /// The countdown hit zero on this tick. The timer is now stopped with the
    /// next session's preset loaded.
    SessionComplete { credit: bool, next: SessionKind },
}

/// Focus timer state. Counts up from zero, or down from a preset in minutes.
#[derive(Debug, Clone)]
pub struct FocusTimer {
    seconds: u64,
    mode: TimerMode,
    session: SessionKind,
    running: bool,
    task_id: Option<String>,
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self {
            seconds: 0,
            mode: TimerMode::CountUp,
            session: SessionKind::Work,
            running: false,
            task_id: None,
        }
    }
}

impl FocusTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero minutes selects count-up.
    pub fn set_preset(&mut self, minutes: u64) {
        self.reset();
        if minutes > 0 {
            self.seconds = minutes.saturating_mul(60);
            self.mode = TimerMode::CountDown;
        }
    }

    pub fn select_task(&mut self, task_id: Option<String>) {
        self.task_id = task_id;
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    /// Returns false when the timer was already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.stop();
        self.seconds = 0;
        self.mode = TimerMode::CountUp;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn session(&self) -> SessionKind {
        self.session
    }

    pub fn display(&self) -> String {
        format_clock(self.seconds)
    }

    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Idle;
        }
        match self.mode {
            TimerMode::CountUp => self.seconds += 1,
            TimerMode::CountDown if self.seconds > 0 => self.seconds -= 1,
            TimerMode::CountDown => return Tick::Idle,
        }

        let credit = self.session == SessionKind::Work;
        if self.mode == TimerMode::CountDown && self.seconds == 0 {
            let next = self.complete_session();
            return Tick::SessionComplete { credit, next };
        }
        Tick::Counted { credit }
    }

    fn complete_session(&mut self) -> SessionKind {
        self.stop();
        self.session = match self.session {
            SessionKind::Work => SessionKind::Break,
            SessionKind::Break => SessionKind::Work,
        };
        let minutes = match self.session {
            SessionKind::Work => WORK_MINUTES,
            SessionKind::Break => BREAK_MINUTES,
        };
        self.set_preset(minutes);
        self.session
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionReport {
    pub credited_seconds: u64,
    pub completed: bool,
}

/// Ticks `timer` once per second until its session completes or `shutdown`
/// resolves, crediting work seconds to the shared store.
///
/// The timer is stopped whenever this returns, including on a store error.
pub async fn run_session<F>(
    state: &AppState,
    timer: &mut FocusTimer,
    shutdown: F,
) -> Result<SessionReport, AppError>
where
    F: Future<Output = ()>,
{
    let mut report = SessionReport::default();
    timer.start();
    info!(
        session = ?timer.session(),
        remaining = %timer.display(),
        "focus session started"
    );

    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
    ticker.tick().await;
    tokio::pin!(shutdown);

    while timer.is_running() {
        tokio::select! {
            _ = &mut shutdown => {
                timer.stop();
                info!(credited = report.credited_seconds, "focus session interrupted");
                break;
            }
            _ = ticker.tick() => {}
        }

        let (credit, completed) = match timer.tick() {
            Tick::Idle => (false, false),
            Tick::Counted { credit } => (credit, false),
            Tick::SessionComplete { credit, next } => {
                debug!(?next, "session complete");
                (credit, true)
            }
        };

        if credit {
            let mut store = state.store.lock().await;
            match store.add_time(timer.task_id(), 1).await {
                Ok(outcome) if !outcome.is_applied() => {
                    warn!(task = ?timer.task_id(), "focused task no longer exists");
                }
                Ok(_) => {}
                Err(err) => {
                    timer.stop();
                    error!(credited = report.credited_seconds, "focus session aborted: {err}");
                    return Err(err);
                }
            }
            report.credited_seconds += 1;
        }

        if completed {
            report.completed = true;
            info!(credited = report.credited_seconds, "focus session finished");
        }
    }

    Ok(report)
}

/// Formats seconds as `HH:MM:SS`.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60, seconds % 60)
}
