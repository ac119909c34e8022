use std::time::{Duration, Instant};

use log::{debug, info, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::board::{Renderer, COLUMNS};
use crate::clock::Clock;
use crate::format::{format_reaction_time, ZERO_TIME};
use crate::timer::{TimerHandle, TimerQueue};

/// Gap between consecutive columns lighting up
pub const SEQUENCE_STEP: Duration = Duration::from_millis(1000);

/// Hold window (lower bound inclusive, upper bound exclusive) before lights out
pub const HOLD_MIN: Duration = Duration::from_millis(3500);
pub const HOLD_MAX: Duration = Duration::from_millis(7000);

pub const DEFAULT_IDLE_PROMPT: &str = "Press SPACE or click when ready.";
pub const WAIT_MESSAGE: &str = "Wait for the lights to go out...";
pub const GO_MESSAGE: &str = "GO!";
pub const JUMP_START_TEXT: &str = "JUMP START!";
pub const JUMP_START_MESSAGE: &str = "You reacted too early! Try again.";
pub const TRY_AGAIN_MESSAGE: &str = "Try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum GameState {
    Idle,
    Sequencing,
    Holding,
    Timing,
    Result,
}

/// How an attempt ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    JumpStart,
    Finished {
        reaction: Duration,
        personal_best: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerAction {
    LightColumn(usize),
    LightsOut,
}

/// Draw a hold delay uniformly from `[HOLD_MIN, HOLD_MAX)` at microsecond resolution
pub fn sample_hold_delay<G: Rng>(rng: &mut G) -> Duration {
    let min = HOLD_MIN.as_micros() as u64;
    let max = HOLD_MAX.as_micros() as u64;
    Duration::from_micros(rng.gen_range(min..max))
}

/// The reaction game state machine.
///
/// Owns every piece of mutable game state and all pending timers. It is driven
/// by two entry points: [`ReflexGame::interact_at`] for user input and
/// [`ReflexGame::advance_to`] for the passage of time, and reports everything
/// visible through its [`Renderer`].
pub struct ReflexGame<C: Clock, R: Renderer> {
    clock: C,
    renderer: R,
    rng: StdRng,
    state: GameState,
    columns: [bool; COLUMNS],
    start_time: Option<Instant>,
    lights_out_due: Option<Instant>,
    best_time: Option<Duration>,
    last_outcome: Option<Outcome>,
    timers: TimerQueue<(u64, TimerAction)>,
    pending: Vec<TimerHandle>,
    attempt: u64,
    idle_prompt: String,
}

impl<C: Clock, R: Renderer> ReflexGame<C, R> {
    pub fn new(clock: C, renderer: R) -> Self {
        let mut game = Self {
            clock,
            renderer,
            rng: StdRng::from_entropy(),
            state: GameState::Idle,
            columns: [false; COLUMNS],
            start_time: None,
            lights_out_due: None,
            best_time: None,
            last_outcome: None,
            timers: TimerQueue::new(),
            pending: Vec::new(),
            attempt: 0,
            idle_prompt: DEFAULT_IDLE_PROMPT.to_string(),
        };
        game.enter_idle();
        game
    }

    /// Replace the hold-delay random source
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Replace the caption shown while idle
    pub fn with_idle_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.idle_prompt = prompt.into();
        if self.state == GameState::Idle {
            self.renderer.set_message_text(&self.idle_prompt);
        }
        self
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn best_time(&self) -> Option<Duration> {
        self.best_time
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    /// Number of attempts started this session
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn lit_columns(&self) -> usize {
        self.columns.iter().filter(|lit| **lit).count()
    }

    /// Columns are 1-indexed
    pub fn is_column_lit(&self, column: usize) -> bool {
        column
            .checked_sub(1)
            .and_then(|idx| self.columns.get(idx))
            .copied()
            .unwrap_or(false)
    }

    pub fn pending_timers(&self) -> usize {
        self.pending.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_due()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Handle one user interaction happening now
    pub fn interact(&mut self) {
        let now = self.clock.now();
        self.interact_at(now);
    }

    /// Handle one user interaction that happened at `at`.
    ///
    /// Timers due at or before `at` fire first, so the interaction is judged
    /// against the board as it was at that instant.
    pub fn interact_at(&mut self, at: Instant) {
        self.advance_to(at);

        match self.state {
            GameState::Idle | GameState::Result => self.start_sequence(at),
            GameState::Sequencing | GameState::Holding => self.jump_start(),
            GameState::Timing => match (self.lights_out_due, self.start_time) {
                (Some(due), Some(start)) if at >= due => {
                    self.finish(at.saturating_duration_since(start))
                }
                // pressed before the lights went out; only reachable when the
                // input was stamped before a timer that already fired
                _ => self.jump_start(),
            },
        }
    }

    /// Fire every timer due by now
    pub fn advance(&mut self) {
        let now = self.clock.now();
        self.advance_to(now);
    }

    /// Fire every timer due at or before `now`.
    ///
    /// Follow-up timers are chained from the due instant of the one that
    /// scheduled them, while the reaction clock starts at `now`, when the
    /// lights are actually turned off.
    pub fn advance_to(&mut self, now: Instant) {
        while let Some((handle, due, (attempt, action))) = self.timers.pop_due(now) {
            self.pending.retain(|h| *h != handle);
            if attempt != self.attempt {
                trace!("dropping timer from superseded attempt {attempt}");
                continue;
            }
            self.on_timer(action, due, now);
        }
    }

    fn on_timer(&mut self, action: TimerAction, due: Instant, now: Instant) {
        match action {
            TimerAction::LightColumn(column) => {
                if self.state != GameState::Sequencing || column != self.lit_columns() + 1 {
                    return;
                }
                self.set_column(column, true);
                trace!("column {column} lit");

                if self.lit_columns() == COLUMNS {
                    let delay = sample_hold_delay(&mut self.rng);
                    debug!("all lights on, holding for {delay:?}");
                    self.state = GameState::Holding;
                    self.schedule(due + delay, TimerAction::LightsOut);
                }
            }
            TimerAction::LightsOut => {
                if self.state != GameState::Holding {
                    return;
                }
                self.extinguish_all();
                self.start_time = Some(now);
                self.lights_out_due = Some(due);
                self.state = GameState::Timing;
                self.renderer.set_message_text(GO_MESSAGE);
                debug!("lights out, {:?} after schedule", now.saturating_duration_since(due));
            }
        }
    }

    fn enter_idle(&mut self) {
        self.state = GameState::Idle;
        self.extinguish_all();
        self.renderer.set_timer_text(ZERO_TIME);
        self.renderer.set_message_text(&self.idle_prompt);
        self.renderer.set_best_time_text(ZERO_TIME);
    }

    fn start_sequence(&mut self, at: Instant) {
        self.cancel_pending();
        self.attempt += 1;
        self.state = GameState::Sequencing;
        self.start_time = None;
        self.lights_out_due = None;
        self.extinguish_all();
        self.renderer.set_timer_text(ZERO_TIME);
        self.renderer.set_message_text(WAIT_MESSAGE);

        for column in 1..=COLUMNS {
            self.schedule(
                at + SEQUENCE_STEP * column as u32,
                TimerAction::LightColumn(column),
            );
        }
        debug!("attempt {} sequencing", self.attempt);
    }

    fn jump_start(&mut self) {
        self.cancel_pending();
        self.extinguish_all();
        self.start_time = None;
        self.lights_out_due = None;
        self.state = GameState::Result;
        self.last_outcome = Some(Outcome::JumpStart);
        self.renderer.set_timer_text(JUMP_START_TEXT);
        self.renderer.set_message_text(JUMP_START_MESSAGE);
        info!("attempt {} jump start", self.attempt);
    }

    fn finish(&mut self, reaction: Duration) {
        let formatted = format_reaction_time(reaction);
        let personal_best = self.best_time.map_or(true, |best| reaction < best);

        self.state = GameState::Result;
        self.renderer.set_timer_text(&formatted);
        self.renderer.set_message_text(TRY_AGAIN_MESSAGE);

        if personal_best {
            self.best_time = Some(reaction);
            self.renderer.set_best_time_text(&formatted);
        }
        self.last_outcome = Some(Outcome::Finished {
            reaction,
            personal_best,
        });
        info!(
            "attempt {} reaction {formatted}{}",
            self.attempt,
            if personal_best { " (best)" } else { "" }
        );
    }

    fn schedule(&mut self, due: Instant, action: TimerAction) {
        let handle = self.timers.schedule_at(due, (self.attempt, action));
        self.pending.push(handle);
    }

    fn cancel_pending(&mut self) {
        for handle in self.pending.drain(..) {
            self.timers.cancel(handle);
        }
    }

    fn set_column(&mut self, column: usize, lit: bool) {
        if let Some(slot) = column
            .checked_sub(1)
            .and_then(|idx| self.columns.get_mut(idx))
        {
            *slot = lit;
            self.renderer.set_column_lit(column, lit);
        }
    }

    fn extinguish_all(&mut self) {
        for column in 1..=COLUMNS {
            self.set_column(column, false);
        }
    }
}
