//! Game state module - the game session
//!
//! Owns the board, the active piece, the score and the running flag, and is
//! the only thing that mutates the board. Every collision decision goes
//! through [`GameSession::is_legal`].
//!
//! Lifecycle: `Idle` until [`GameSession::start`], then `Falling` while pieces
//! spawn, fall and lock, and finally `GameOver` once a spawn collides or a
//! piece locks with a cell above the visible board. Spawning and locking
//! happen inside a single call and are never observable on their own.

use tracing::{debug, error, info};

use crate::error::CatalogError;
use crate::pieces::{next_rotation, shape_cells, spawn_position, PieceShape};
use crate::rng::PiecePicker;
use crate::scoring::line_clear_score;
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{Command, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
use crate::Board;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    /// Index into the kind's rotation table.
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a tetromino of `kind` at its spawn position in rotation 0
    pub fn spawn(kind: PieceKind) -> Self {
        let (x, y) = spawn_position(kind);
        Self {
            kind,
            rotation: 0,
            x,
            y,
        }
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> Result<PieceShape, CatalogError> {
        shape_cells(self.kind, self.rotation)
    }

    /// Absolute board positions of the four minos.
    ///
    /// Coordinates saturate at the `i8` range, so a cell past either edge
    /// stays on that side of the board.
    pub fn cells(&self) -> Result<[(i8, i8); 4], CatalogError> {
        Ok(self
            .shape()?
            .map(|(dx, dy)| (self.x.saturating_add(dx), self.y.saturating_add(dy))))
    }
}

/// Observable lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionPhase {
    /// Created but never started.
    #[default]
    Idle,
    /// Running; a piece is falling.
    Falling,
    /// Terminal until the next start. Score and board are final.
    GameOver,
}

/// Result of locking a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOutcome {
    pub lines_cleared: usize,
    pub score_delta: u32,
    /// A locked cell landed above the visible board; the session is over.
    pub topped_out: bool,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    active: Option<Tetromino>,
    picker: PiecePicker,
    score: u32,
    /// Total rows cleared since start.
    lines: u32,
    /// Successful spawns since start.
    pieces: u32,
    running: bool,
    started: bool,
}

impl GameSession {
    /// Create an idle session with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self {
            board: Board::new(),
            active: None,
            picker: PiecePicker::new(seed),
            score: 0,
            lines: 0,
            pieces: 0,
            running: false,
            started: false,
        }
    }

    /// Create a running session on a prepared board with no active piece.
    ///
    /// The next [`tick`](Self::tick) (or an explicit spawn) brings in a piece.
    pub fn from_board(board: Board, seed: u32) -> Self {
        Self {
            board,
            running: true,
            started: true,
            ..Self::new(seed)
        }
    }

    /// Reset board and score and spawn the first piece.
    ///
    /// Valid at any time, including mid-game and after game over. Returns
    /// whether the first spawn succeeded; if it did not, the session is
    /// already over with a score of 0.
    pub fn start(&mut self) -> bool {
        self.board.reset();
        self.active = None;
        self.score = 0;
        self.lines = 0;
        self.pieces = 0;
        self.running = true;
        self.started = true;
        info!(seed = self.picker.seed(), "session started");
        self.spawn_piece()
    }

    pub fn phase(&self) -> SessionPhase {
        match (self.started, self.running) {
            (false, _) => SessionPhase::Idle,
            (true, true) => SessionPhase::Falling,
            (true, false) => SessionPhase::GameOver,
        }
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase() == SessionPhase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn pieces(&self) -> u32 {
        self.pieces
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Spawn a uniformly random piece kind.
    pub fn spawn_piece(&mut self) -> bool {
        let kind = self.picker.pick();
        self.spawn_kind(kind)
    }

    /// Spawn a piece of `kind` at its centered spawn position.
    ///
    /// If the spawn cells are blocked the session ends and `false` is returned.
    /// Does nothing on a session that is not running.
    pub fn spawn_kind(&mut self, kind: PieceKind) -> bool {
        if !self.running {
            return false;
        }

        let piece = Tetromino::spawn(kind);
        if !self.is_legal(&piece, piece.x, piece.y, piece.rotation) {
            debug!(?kind, x = piece.x, y = piece.y, "spawn blocked");
            self.game_over();
            return false;
        }

        self.active = Some(piece);
        self.pieces = self.pieces.wrapping_add(1);
        debug!(?kind, x = piece.x, y = piece.y, "spawned piece");
        true
    }

    /// Whether `piece` may occupy anchor `(x, y)` in `rotation`.
    ///
    /// Every mino must be inside `0..width` horizontally and above the floor.
    /// Minos above the board (row < 0) are never checked against the grid.
    pub fn is_legal(&self, piece: &Tetromino, x: i8, y: i8, rotation: u8) -> bool {
        let candidate = Tetromino {
            x,
            y,
            rotation,
            ..*piece
        };
        let cells = match candidate.cells() {
            Ok(cells) => cells,
            Err(err) => {
                invariant_violation(err);
                return false;
            }
        };

        cells.iter().all(|&(col, row)| {
            if col < 0 || col >= BOARD_WIDTH as i8 || row >= BOARD_HEIGHT as i8 {
                return false;
            }
            row < 0 || !self.board.is_occupied(col, row)
        })
    }

    /// Shift the active piece horizontally; illegal moves are ignored.
    pub fn move_horizontal(&mut self, delta: i8) -> bool {
        self.try_move(delta, 0)
    }

    /// Move the active piece down one row. Returns whether it moved.
    pub fn move_down(&mut self) -> bool {
        self.try_move(0, 1)
    }

    fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        let (x, y) = (active.x + dx, active.y + dy);
        if !self.is_legal(&active, x, y, active.rotation) {
            return false;
        }

        self.active = Some(Tetromino { x, y, ..active });
        true
    }

    /// Advance to the next rotation state in place. No kicks are attempted.
    pub fn rotate(&mut self) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        let rotation = next_rotation(active.kind, active.rotation);
        if !self.is_legal(&active, active.x, active.y, rotation) {
            return false;
        }

        self.active = Some(Tetromino { rotation, ..active });
        true
    }

    /// Drop the active piece as far as it goes and lock it.
    pub fn hard_drop(&mut self) -> Option<LockOutcome> {
        let active = self.active?;

        let mut y = active.y;
        while self.is_legal(&active, active.x, y + 1, active.rotation) {
            y += 1;
        }
        self.active = Some(Tetromino { y, ..active });

        self.lock_piece()
    }

    /// Commit the active piece to the board, clear full rows and score them.
    ///
    /// Does not spawn the next piece. Ends the session if any mino was above
    /// the board; cells above the board are discarded.
    pub fn lock_piece(&mut self) -> Option<LockOutcome> {
        let active = self.active.take()?;

        let cells = match active.cells() {
            Ok(cells) => cells,
            Err(err) => {
                invariant_violation(err);
                return None;
            }
        };
        let topped_out = cells.iter().any(|&(_, y)| y < 0);

        self.board.lock(&cells, active.kind);

        let cleared = self.board.clear_full_rows();
        let score_delta = line_clear_score(cleared.len());
        self.score = self.score.saturating_add(score_delta);
        self.lines = self.lines.saturating_add(cleared.len() as u32);

        if !cleared.is_empty() {
            debug!(rows = ?cleared.as_slice(), score_delta, "cleared rows");
        }

        if topped_out {
            self.game_over();
        }

        Some(LockOutcome {
            lines_cleared: cleared.len(),
            score_delta,
            topped_out,
        })
    }

    /// End the session. Idempotent; the board and score stay as the final state.
    pub fn game_over(&mut self) {
        self.active = None;
        if !self.running {
            return;
        }
        self.running = false;
        info!(score = self.score, lines = self.lines, "game over");
    }

    /// Periodic driver: spawn if needed, otherwise fall one row or lock.
    ///
    /// Returns whether anything changed (always true while running).
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        if self.active.is_none() {
            self.spawn_piece();
            return true;
        }

        if !self.move_down() {
            self.lock_and_respawn();
        }
        true
    }

    fn lock_and_respawn(&mut self) {
        self.lock_piece();
        if self.running {
            self.spawn_piece();
        }
    }

    /// Apply a player command. Returns whether the state changed.
    ///
    /// Gameplay commands are ignored unless a piece is falling. `Restart`
    /// always restarts. `Quit` belongs to the caller and is a no-op here.
    pub fn apply_command(&mut self, command: Command) -> bool {
        match command {
            Command::Restart => {
                self.start();
                return true;
            }
            Command::Quit => return false,
            _ => {}
        }

        if !self.running || self.active.is_none() {
            return false;
        }

        match command {
            Command::MoveLeft => self.move_horizontal(-1),
            Command::MoveRight => self.move_horizontal(1),
            Command::Rotate => self.rotate(),
            Command::SoftDrop => {
                if !self.move_down() {
                    self.lock_and_respawn();
                }
                true
            }
            Command::HardDrop => {
                self.hard_drop();
                if self.running {
                    self.spawn_piece();
                }
                true
            }
            Command::Restart | Command::Quit => false,
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);
        out.active = self.active.and_then(|p| ActiveSnapshot::try_from(p).ok());
        out.score = self.score;
        out.lines = self.lines;
        out.pieces = self.pieces;
        out.running = self.running;
        out.phase = self.phase();
    }

    /// Copy of the observable state for renderers.
    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(1)
    }
}

/// A catalog lookup failed for a piece the session itself created.
fn invariant_violation(err: CatalogError) {
    error!(%err, "piece data invariant violated");
    debug_assert!(false, "piece data invariant violated: {err}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::rotation_count;
    use crate::types::Cell;

    fn fill_row_except(board: &mut Board, y: i8, holes: &[i8]) {
        for x in 0..BOARD_WIDTH as i8 {
            if !holes.contains(&x) {
                board.set(x, y, Cell::Filled(PieceKind::L));
            }
        }
    }

    fn running_with(kind: PieceKind) -> GameSession {
        let mut state = GameSession::from_board(Board::new(), 12345);
        assert!(state.spawn_kind(kind));
        state
    }

    #[test]
    fn test_new_session_is_idle() {
        let state = GameSession::new(12345);

        assert_eq!(state.phase(), SessionPhase::Idle);
        assert!(!state.running);
        assert_eq!(state.score, 0);
        assert!(state.active.is_none());
    }

    #[test]
    fn test_idle_session_ignores_tick_and_commands() {
        let mut state = GameSession::new(12345);

        assert!(!state.tick());
        assert!(!state.apply_command(Command::HardDrop));
        assert!(!state.spawn_piece());
        assert_eq!(state.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_start_spawns_first_piece() {
        let mut state = GameSession::new(12345);

        assert!(state.start());
        assert_eq!(state.phase(), SessionPhase::Falling);
        assert!(state.active.is_some());
        assert_eq!(state.pieces, 1);
    }

    #[test]
    fn test_spawn_o_is_centered() {
        let state = running_with(PieceKind::O);
        let active = state.active.unwrap();

        assert_eq!((active.x, active.y), (4, 0));
        assert_eq!(active.rotation, 0);
    }

    #[test]
    fn test_spawn_places_top_row_on_board_row_zero() {
        for kind in PieceKind::ALL {
            let state = running_with(kind);
            let cells = state.active.unwrap().cells().unwrap();
            let top = cells.iter().map(|&(_, y)| y).min().unwrap();
            assert_eq!(top, 0, "{kind:?}");
        }
    }

    #[test]
    fn test_blocked_spawn_ends_game_with_score_unchanged() {
        let mut board = Board::new();
        fill_row_except(&mut board, 0, &[0]);
        fill_row_except(&mut board, 1, &[0]);
        let mut state = GameSession::from_board(board, 7);
        state.score = 500;

        assert!(!state.spawn_piece());
        assert_eq!(state.phase(), SessionPhase::GameOver);
        assert!(!state.running);
        assert!(state.active.is_none());
        assert_eq!(state.score, 500);

        // Further spawns stay refused.
        assert!(!state.spawn_piece());
        assert_eq!(state.score, 500);
    }

    #[test]
    fn test_start_resets_prefilled_board() {
        let mut state = GameSession::new(3);
        fill_row_except(state.board_mut(), 0, &[]);
        assert!(state.start());
        assert_eq!(state.board().filled_count(), 0);
    }

    #[test]
    fn test_is_legal_bounds() {
        let state = running_with(PieceKind::O);
        let piece = state.active.unwrap();

        assert!(state.is_legal(&piece, 0, 0, 0));
        assert!(state.is_legal(&piece, 8, 18, 0));
        assert!(!state.is_legal(&piece, -1, 0, 0));
        assert!(!state.is_legal(&piece, 9, 0, 0));
        assert!(!state.is_legal(&piece, 0, 19, 0));
        // Above the board is allowed.
        assert!(state.is_legal(&piece, 0, -5, 0));
    }

    #[test]
    fn test_is_legal_ignores_filled_cells_above_board_only() {
        let mut state = running_with(PieceKind::O);
        state.board_mut().set(4, 0, Cell::Filled(PieceKind::T));
        let piece = state.active.unwrap();

        assert!(!state.is_legal(&piece, 4, 0, 0));
        assert!(!state.is_legal(&piece, 4, -1, 0));
        assert!(state.is_legal(&piece, 4, -2, 0));
    }

    #[test]
    fn test_move_horizontal_stops_at_walls() {
        let mut state = running_with(PieceKind::O);

        let mut moved = 0;
        while state.move_horizontal(-1) {
            moved += 1;
        }
        assert_eq!(moved, 4);
        assert_eq!(state.active.unwrap().x, 0);

        let before = state.active;
        assert!(!state.move_horizontal(-1));
        assert_eq!(state.active, before);

        while state.move_horizontal(1) {}
        assert_eq!(state.active.unwrap().x, 8);
    }

    #[test]
    fn test_move_down_stops_at_floor() {
        let mut state = running_with(PieceKind::O);

        let mut rows = 0;
        while state.move_down() {
            rows += 1;
        }
        assert_eq!(rows, 18);
        assert_eq!(state.active.unwrap().y, 18);
    }

    #[test]
    fn test_rotate_cycles_through_states() {
        let mut state = running_with(PieceKind::T);
        // Room to rotate without touching the top.
        state.move_down();

        for expected in [1, 2, 3, 0] {
            assert!(state.rotate());
            assert_eq!(state.active.unwrap().rotation, expected);
        }
    }

    #[test]
    fn test_rotate_rejected_without_kick() {
        let mut state = running_with(PieceKind::I);
        state.move_down();
        state.move_down();
        // Vertical I against the left wall at x = -1 (its column is dx = 1).
        assert!(state.rotate());
        while state.move_horizontal(-1) {}
        let before = state.active.unwrap();
        assert_eq!(before.x, -1);

        // Rotation 2 is horizontal and would stick out of the left wall.
        assert!(!state.rotate());
        assert_eq!(state.active.unwrap(), before);
    }

    #[test]
    fn test_o_rotation_is_identity() {
        let mut state = running_with(PieceKind::O);
        let before = state.active;
        assert!(state.rotate());
        assert_eq!(state.active, before);
    }

    #[test]
    fn test_lock_fills_bottom_row_hole_and_scores_single() {
        let mut board = Board::new();
        fill_row_except(&mut board, 19, &[0]);
        let mut state = GameSession::from_board(board, 1);
        assert!(state.spawn_kind(PieceKind::I));

        // Vertical I: column dx = 1, so anchor x = -1 puts it in column 0.
        assert!(state.rotate());
        while state.move_horizontal(-1) {}
        assert_eq!(state.active.unwrap().x, -1);

        let outcome = state.hard_drop().unwrap();

        assert_eq!(outcome.lines_cleared, 1);
        assert_eq!(outcome.score_delta, 100);
        assert!(!outcome.topped_out);
        assert_eq!(state.score, 100);
        assert_eq!(state.lines, 1);
        // Three of the I's cells remain in column 0, shifted down by one row.
        assert_eq!(state.board().filled_count(), 3);
        for y in 17..20 {
            assert!(state.board().is_occupied(0, y));
        }
        assert!(state.active.is_none());
    }

    #[test]
    fn test_tetris_scores_3200() {
        let mut board = Board::new();
        for y in 16..20 {
            fill_row_except(&mut board, y, &[9]);
        }
        let mut state = GameSession::from_board(board, 1);
        assert!(state.spawn_kind(PieceKind::I));
        assert!(state.rotate());
        while state.move_horizontal(1) {}

        let outcome = state.hard_drop().unwrap();
        assert_eq!(outcome.lines_cleared, 4);
        assert_eq!(state.score, 3200);
        assert_eq!(state.board().filled_count(), 0);
    }

    #[test]
    fn test_lock_above_board_ends_game_after_scoring() {
        let mut state = running_with(PieceKind::I);
        // Rotation 1 puts the top mino at y = -1.
        assert!(state.rotate());
        assert!(state.active.unwrap().cells().unwrap().iter().any(|&(_, y)| y < 0));

        let outcome = state.lock_piece().unwrap();

        assert!(outcome.topped_out);
        assert_eq!(state.phase(), SessionPhase::GameOver);
        assert_eq!(state.board().filled_count(), 3);
        // Nothing spawns after a top-out.
        assert!(!state.tick());
        assert!(state.active.is_none());
    }

    #[test]
    fn test_tick_moves_then_locks_and_respawns() {
        let mut state = running_with(PieceKind::O);

        for _ in 0..18 {
            assert!(state.tick());
        }
        assert_eq!(state.active.unwrap().y, 18);
        assert_eq!(state.pieces, 1);

        assert!(state.tick());
        assert_eq!(state.board().filled_count(), 4);
        assert_eq!(state.pieces, 2);
        assert!(state.active.is_some());
    }

    #[test]
    fn test_tick_without_piece_spawns() {
        let mut state = GameSession::from_board(Board::new(), 9);
        assert!(state.active.is_none());

        assert!(state.tick());
        assert!(state.active.is_some());
        assert_eq!(state.pieces, 1);
    }

    #[test]
    fn test_soft_drop_locks_when_grounded() {
        let mut state = running_with(PieceKind::O);
        while state.move_down() {}

        assert!(state.apply_command(Command::SoftDrop));
        assert_eq!(state.board().filled_count(), 4);
        assert_eq!(state.pieces, 2);
    }

    #[test]
    fn test_hard_drop_command_spawns_next() {
        let mut state = running_with(PieceKind::T);

        assert!(state.apply_command(Command::HardDrop));
        assert_eq!(state.board().filled_count(), 4);
        assert_eq!(state.pieces, 2);
        assert!(state.active.is_some());
    }

    #[test]
    fn test_commands_ignored_after_game_over() {
        let mut state = running_with(PieceKind::O);
        state.game_over();
        let snap = state.snapshot();

        for command in [
            Command::MoveLeft,
            Command::MoveRight,
            Command::SoftDrop,
            Command::Rotate,
            Command::HardDrop,
            Command::Quit,
        ] {
            assert!(!state.apply_command(command));
        }
        assert_eq!(state.snapshot(), snap);
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let mut state = running_with(PieceKind::O);
        state.score = 1200;

        state.game_over();
        state.game_over();

        assert_eq!(state.phase(), SessionPhase::GameOver);
        assert_eq!(state.score, 1200);
        assert!(state.active.is_none());
    }

    #[test]
    fn test_restart_mid_game_resets() {
        let mut state = running_with(PieceKind::O);
        state.hard_drop();
        state.score = 400;

        assert!(state.apply_command(Command::Restart));
        assert_eq!(state.score, 0);
        assert_eq!(state.lines, 0);
        assert_eq!(state.board().filled_count(), 0);
        assert!(state.running);
        assert!(state.active.is_some());
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = running_with(PieceKind::O);
        state.game_over();

        assert!(state.apply_command(Command::Restart));
        assert_eq!(state.phase(), SessionPhase::Falling);
    }

    #[test]
    fn test_extreme_anchors_are_never_legal_below_or_beside_the_board() {
        let state = GameSession::from_board(Board::new(), 1);

        for kind in PieceKind::ALL {
            let piece = Tetromino::spawn(kind);
            for rotation in 0..rotation_count(kind) {
                assert!(!state.is_legal(&piece, 0, i8::MAX, rotation), "{kind:?}");
                assert!(!state.is_legal(&piece, 0, i8::MAX - 2, rotation), "{kind:?}");
                assert!(!state.is_legal(&piece, i8::MAX, 0, rotation), "{kind:?}");
                assert!(!state.is_legal(&piece, i8::MIN, 0, rotation), "{kind:?}");
            }
        }

        // Far above the board is still legal; only the floor bounds rows.
        let o = Tetromino::spawn(PieceKind::O);
        assert!(state.is_legal(&o, 0, i8::MIN, 0));
    }

    #[test]
    fn test_cells_saturate_at_extreme_anchors() {
        let piece = Tetromino {
            kind: PieceKind::I,
            rotation: 1,
            x: i8::MAX,
            y: i8::MAX,
        };

        let cells = piece.cells().unwrap();

        assert!(cells
            .iter()
            .all(|&(x, y)| x >= BOARD_WIDTH as i8 && y >= BOARD_HEIGHT as i8));
        assert_eq!(cells[3], (i8::MAX, i8::MAX));
    }

    #[test]
    fn test_snapshot_carries_absolute_cells() {
        let state = running_with(PieceKind::O);
        let snap = state.snapshot();
        let active = snap.active.unwrap();

        assert_eq!(active.cells, [(4, 0), (5, 0), (4, 1), (5, 1)]);
        assert!(snap.running);
        assert_eq!(snap.phase, SessionPhase::Falling);
    }
}
