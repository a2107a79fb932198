//! Sequential event dispatcher.
//!
//! Timer ticks and player commands are funneled through one FIFO queue and
//! applied to the session one at a time. The dispatcher also owns the fall
//! timer: commands that reset the fall cadence are applied before the timer is
//! checked, so a reset always wins over a tick that has not fired yet.

use std::collections::VecDeque;
use std::time::Instant;

use tracing::{debug, trace};

use crate::core::{GameSession, GameSnapshot};
use crate::timer::FallTimer;
use crate::types::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Tick,
    Command(Command),
}

/// Whether the run loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    session: GameSession,
    timer: FallTimer,
    queue: VecDeque<Event>,
}

impl Dispatcher {
    pub fn new(session: GameSession, timer: FallTimer) -> Self {
        let mut dispatcher = Self {
            session,
            timer,
            queue: VecDeque::new(),
        };
        dispatcher.sync_timer(Instant::now());
        dispatcher
    }

    /// Start (or restart) the session and arm the fall timer.
    pub fn start(&mut self, now: Instant) {
        self.session.start();
        self.timer.reset(now);
        self.sync_timer(now);
    }

    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn push_command(&mut self, command: Command) {
        self.push(Event::Command(command));
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Apply every queued event in order, then fire the fall timer if due.
    ///
    /// Stops at the first `Quit`; events queued behind it are dropped.
    pub fn dispatch(&mut self, now: Instant) -> Flow {
        while let Some(event) = self.queue.pop_front() {
            if self.handle(event, now) == Flow::Quit {
                self.queue.clear();
                return Flow::Quit;
            }
        }

        if self.timer.is_due(now) {
            self.timer.arm(now);
            self.handle(Event::Tick, now);
        }

        Flow::Continue
    }

    fn handle(&mut self, event: Event, now: Instant) -> Flow {
        trace!(?event, "dispatch");

        match event {
            Event::Tick => {
                self.session.tick();
            }
            Event::Command(Command::Quit) => {
                debug!("quit requested");
                return Flow::Quit;
            }
            Event::Command(Command::Restart) => {
                self.start(now);
            }
            Event::Command(command @ (Command::SoftDrop | Command::HardDrop)) => {
                if self.session.apply_command(command) && self.session.running() {
                    self.timer.reset(now);
                }
            }
            Event::Command(command) => {
                self.session.apply_command(command);
            }
        }

        self.sync_timer(now);
        Flow::Continue
    }

    /// The timer only runs while the session does.
    fn sync_timer(&mut self, now: Instant) {
        if !self.session.running() {
            if self.timer.is_armed() {
                debug!("fall timer cancelled");
            }
            self.timer.cancel();
        } else if !self.timer.is_armed() {
            self.timer.arm(now);
        }
    }

    pub fn timer(&self) -> &FallTimer {
        &self.timer
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Snapshot for the renderer, pulled after each dispatch.
    pub fn snapshot(&self) -> GameSnapshot {
        self.session.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::{Board, SessionPhase};
    use crate::types::{Cell, PieceKind};

    const PERIOD: Duration = Duration::from_millis(100);

    fn dispatcher_with(kind: PieceKind) -> (Dispatcher, Instant) {
        let mut session = GameSession::from_board(Board::new(), 5);
        assert!(session.spawn_kind(kind));
        let t0 = Instant::now();
        let mut d = Dispatcher::new(session, FallTimer::new(PERIOD));
        d.timer.reset(t0);
        (d, t0)
    }

    #[test]
    fn idle_session_keeps_timer_cancelled() {
        let d = Dispatcher::new(GameSession::new(1), FallTimer::new(PERIOD));
        assert!(!d.timer().is_armed());
        assert_eq!(d.session().phase(), SessionPhase::Idle);
    }

    #[test]
    fn start_arms_timer() {
        let mut d = Dispatcher::new(GameSession::new(1), FallTimer::new(PERIOD));
        d.start(Instant::now());
        assert!(d.timer().is_armed());
        assert!(d.session().active().is_some());
    }

    #[test]
    fn due_timer_drops_piece_once() {
        let (mut d, t0) = dispatcher_with(PieceKind::O);

        assert_eq!(d.dispatch(t0 + PERIOD / 2), Flow::Continue);
        assert_eq!(d.session().active().unwrap().y, 0);

        d.dispatch(t0 + PERIOD);
        assert_eq!(d.session().active().unwrap().y, 1);

        // Re-armed from the fire time, not fired again immediately.
        d.dispatch(t0 + PERIOD + PERIOD / 2);
        assert_eq!(d.session().active().unwrap().y, 1);
    }

    #[test]
    fn soft_drop_resets_timer_before_pending_tick() {
        let (mut d, t0) = dispatcher_with(PieceKind::O);

        // The tick is due, but the soft drop queued before it resets the cadence.
        d.push_command(Command::SoftDrop);
        d.dispatch(t0 + PERIOD);

        assert_eq!(d.session().active().unwrap().y, 1);
        assert_eq!(
            d.timer().time_until_due(t0 + PERIOD),
            Some(PERIOD)
        );
    }

    #[test]
    fn moves_do_not_touch_timer() {
        let (mut d, t0) = dispatcher_with(PieceKind::O);

        d.push_command(Command::MoveLeft);
        d.dispatch(t0 + PERIOD / 2);

        assert_eq!(d.session().active().unwrap().x, 3);
        assert_eq!(
            d.timer().time_until_due(t0 + PERIOD / 2),
            Some(PERIOD / 2)
        );
    }

    #[test]
    fn events_apply_in_queue_order() {
        let (mut d, t0) = dispatcher_with(PieceKind::O);

        d.push_command(Command::MoveLeft);
        d.push_command(Command::MoveLeft);
        d.push(Event::Tick);
        d.push_command(Command::MoveRight);
        assert_eq!(d.pending(), 4);

        d.dispatch(t0);

        let active = d.session().active().unwrap();
        assert_eq!((active.x, active.y), (3, 1));
        assert_eq!(d.pending(), 0);
    }

    #[test]
    fn quit_stops_dispatch_and_drops_rest() {
        let (mut d, t0) = dispatcher_with(PieceKind::O);

        d.push_command(Command::Quit);
        d.push_command(Command::MoveLeft);

        assert_eq!(d.dispatch(t0), Flow::Quit);
        assert_eq!(d.session().active().unwrap().x, 4);
        assert_eq!(d.pending(), 0);
    }

    #[test]
    fn top_out_on_tick_cancels_timer() {
        let mut board = Board::new();
        board.set(4, 3, Cell::Filled(PieceKind::T));
        let mut session = GameSession::from_board(board, 5);
        assert!(session.spawn_kind(PieceKind::I));
        let t0 = Instant::now();
        let mut d = Dispatcher::new(session, FallTimer::new(PERIOD));

        // Vertical I reaches row -1 and rests on the filled cell at row 3.
        d.push_command(Command::Rotate);
        d.push(Event::Tick);
        d.dispatch(t0);

        assert!(d.snapshot().game_over());
        assert!(!d.timer().is_armed());

        d.dispatch(t0 + PERIOD * 5);
        assert!(d.snapshot().game_over());
    }

    #[test]
    fn restart_after_game_over_rearms_timer() {
        let mut session = GameSession::from_board(Board::new(), 5);
        session.game_over();
        let mut d = Dispatcher::new(session, FallTimer::new(PERIOD));
        assert!(!d.timer().is_armed());

        d.push_command(Command::Restart);
        d.dispatch(Instant::now());

        assert!(d.timer().is_armed());
        assert_eq!(d.session().phase(), SessionPhase::Falling);
        assert!(d.snapshot().playable());
    }
}
