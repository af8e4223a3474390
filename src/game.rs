use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::{Cue, CueSink};
use crate::leaderboard::Leaderboard;
use crate::session::{SessionConfig, SessionSummary, HIT_ACK_SECS, POINTS_PER_HIT};
use crate::target::Target;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
    GameOver,
}

/// What a pointer-down changed; rendering consumes this separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// `target` is the index of the struck target, `score` the new total.
    Hit { target: usize, score: u32 },
    Miss,
    /// The pointer event arrived outside of a running session.
    Ignored,
}

/// What a frame tick changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No session is running.
    Idle,
    Running { time_remaining: f64 },
    Finished(SessionSummary),
}

/// A hit target waiting out the acknowledgement delay before reappearing.
#[derive(Debug, Clone, Copy)]
struct PendingRespawn {
    target: usize,
    deadline_secs: f64,
}

/// The session state machine: Menu -> Playing -> GameOver, re-entrant into
/// Playing via restart. Owns the targets, the timer, and the score; the
/// leaderboard and audio capabilities are injected.
pub struct Game {
    state: GameState,
    score: u32,
    time_remaining: f64,
    total_clicks: u32,
    hits: u32,
    targets: Vec<Target>,
    respawns: Vec<PendingRespawn>,
    bounds: (f64, f64),
    config: SessionConfig,
    sound_enabled: bool,
    leaderboard: Leaderboard,
    cues: Box<dyn CueSink>,
    rng: StdRng,
}

impl Game {
    pub fn new(config: SessionConfig, leaderboard: Leaderboard, cues: Box<dyn CueSink>) -> Self {
        Self::with_rng(config, leaderboard, cues, StdRng::from_entropy())
    }

    /// Seeded constructor so tests get reproducible target placement.
    pub fn with_rng(
        config: SessionConfig,
        leaderboard: Leaderboard,
        cues: Box<dyn CueSink>,
        rng: StdRng,
    ) -> Self {
        Self {
            state: GameState::Menu,
            score: 0,
            time_remaining: config.duration_secs,
            total_clicks: 0,
            hits: 0,
            targets: Vec::new(),
            respawns: Vec::new(),
            bounds: (0.0, 0.0),
            config,
            sound_enabled: true,
            leaderboard,
            cues,
            rng,
        }
    }

    /// Menu/GameOver -> Playing: fresh counters, full timer, a fresh set of
    /// targets at random padded positions on the given surface.
    pub fn start(&mut self, width: f64, height: f64) {
        self.bounds = (width, height);
        self.score = 0;
        self.total_clicks = 0;
        self.hits = 0;
        self.time_remaining = self.config.duration_secs;
        self.respawns.clear();
        self.targets.clear();

        for _ in 0..self.config.target_count {
            let mut target = Target::new(0.0, 0.0, self.config.target_radius);
            target.move_to_random_position(width, height, self.config.spawn_padding, &mut self.rng);
            self.targets.push(target);
        }

        self.state = GameState::Playing;
    }

    /// Routes a pointer-down in surface coordinates. The first active target
    /// (in creation order) containing the point takes the hit; an overlapped
    /// target behind it is masked.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> ClickOutcome {
        if self.state != GameState::Playing {
            return ClickOutcome::Ignored;
        }

        self.total_clicks += 1;

        match self
            .targets
            .iter()
            .position(|t| t.active && t.is_hit(x, y))
        {
            Some(idx) => {
                self.hits += 1;
                self.score += POINTS_PER_HIT;
                self.targets[idx].deactivate();
                self.respawns.push(PendingRespawn {
                    target: idx,
                    deadline_secs: HIT_ACK_SECS,
                });
                self.cue(Cue::Hit);
                ClickOutcome::Hit {
                    target: idx,
                    score: self.score,
                }
            }
            None => {
                self.cue(Cue::Miss);
                ClickOutcome::Miss
            }
        }
    }

    /// Advances the session by `dt` seconds of wall-clock time: due respawns
    /// reposition their target, the timer counts down clamped at zero, and an
    /// expired timer ends the session.
    pub fn advance(&mut self, dt: f64) -> TickOutcome {
        if self.state != GameState::Playing {
            return TickOutcome::Idle;
        }

        let (width, height) = self.bounds;
        let padding = self.config.spawn_padding;
        let mut i = 0;
        while i < self.respawns.len() {
            self.respawns[i].deadline_secs -= dt;
            if self.respawns[i].deadline_secs <= 0.0 {
                let due = self.respawns.swap_remove(i);
                if let Some(target) = self.targets.get_mut(due.target) {
                    target.move_to_random_position(width, height, padding, &mut self.rng);
                }
            } else {
                i += 1;
            }
        }

        self.time_remaining = (self.time_remaining - dt).max(0.0);
        if self.time_remaining > 0.0 {
            TickOutcome::Running {
                time_remaining: self.time_remaining,
            }
        } else {
            TickOutcome::Finished(self.finish())
        }
    }

    /// Playing -> GameOver: accuracy is computed, the result committed to the
    /// leaderboard, and pending respawns dropped so nothing re-enters the
    /// finished session.
    fn finish(&mut self) -> SessionSummary {
        self.state = GameState::GameOver;
        self.respawns.clear();

        let summary = self.summary();
        self.leaderboard.add_score(summary.score, summary.accuracy);
        self.cue(Cue::GameOver);
        summary
    }

    /// Hits over total clicks as a rounded percentage; a session without a
    /// single click counts as 100.
    pub fn accuracy(&self) -> u32 {
        if self.total_clicks == 0 {
            100
        } else {
            ((self.hits as f64 / self.total_clicks as f64) * 100.0).round() as u32
        }
    }

    /// New surface bounds; a running session shuffles its targets inside them.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.bounds = (width, height);
        if self.state == GameState::Playing {
            let padding = self.config.spawn_padding;
            for target in &mut self.targets {
                target.move_to_random_position(width, height, padding, &mut self.rng);
            }
        }
    }

    /// Playing/GameOver -> Menu: the in-progress session is discarded.
    pub fn return_to_menu(&mut self) {
        self.state = GameState::Menu;
        self.respawns.clear();
        self.targets.clear();
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    pub fn set_sound(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> f64 {
        self.time_remaining
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn total_clicks(&self) -> u32 {
        self.total_clicks
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            score: self.score,
            accuracy: self.accuracy(),
            hits: self.hits,
        }
    }

    pub fn high_score(&self) -> u32 {
        self.leaderboard.high_score()
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn leaderboard_mut(&mut self) -> &mut Leaderboard {
        &mut self.leaderboard
    }

    fn cue(&mut self, cue: Cue) {
        if self.sound_enabled {
            self.cues.play(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSink;
    use crate::leaderboard::MemoryScoreStore;
    use assert_matches::assert_matches;
    use std::cell::RefCell;
    use std::rc::Rc;

    const WIDTH: f64 = 1280.0;
    const HEIGHT: f64 = 720.0;

    #[derive(Clone, Default)]
    struct SharedSink(Rc<RefCell<Vec<Cue>>>);

    impl CueSink for SharedSink {
        fn play(&mut self, cue: Cue) {
            self.0.borrow_mut().push(cue);
        }
    }

    fn game_with(config: SessionConfig) -> Game {
        Game::with_rng(
            config,
            Leaderboard::new(Box::new(MemoryScoreStore::default())),
            Box::new(RecordingSink::default()),
            StdRng::seed_from_u64(42),
        )
    }

    fn default_game() -> Game {
        game_with(SessionConfig::default())
    }

    fn single_target_game() -> Game {
        game_with(SessionConfig {
            target_count: 1,
            ..SessionConfig::default()
        })
    }

    fn center_of(game: &Game, idx: usize) -> (f64, f64) {
        let t = &game.targets()[idx];
        (t.x, t.y)
    }

    #[test]
    fn new_game_sits_in_the_menu() {
        let game = default_game();
        assert_eq!(game.state(), GameState::Menu);
        assert!(game.targets().is_empty());
    }

    #[test]
    fn start_spawns_targets_within_padded_bounds() {
        let mut game = default_game();
        game.start(WIDTH, HEIGHT);

        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.targets().len(), 3);
        assert_eq!(game.score(), 0);
        assert_eq!(game.time_remaining(), 30.0);
        for target in game.targets() {
            assert!(target.active);
            assert!(target.x >= 120.0 && target.x < WIDTH - 120.0);
            assert!(target.y >= 120.0 && target.y < HEIGHT - 120.0);
        }
    }

    #[test]
    fn hit_awards_points_and_deactivates_the_target() {
        let mut game = single_target_game();
        game.start(WIDTH, HEIGHT);
        let (x, y) = center_of(&game, 0);

        let outcome = game.pointer_down(x, y);

        assert_matches!(outcome, ClickOutcome::Hit { target: 0, score: 10 });
        assert_eq!(game.score(), 10);
        assert_eq!(game.hits(), 1);
        assert_eq!(game.total_clicks(), 1);
        assert!(!game.targets()[0].active);
    }

    #[test]
    fn miss_increments_clicks_only() {
        let mut game = single_target_game();
        game.start(WIDTH, HEIGHT);

        // corner is well outside the padded spawn region
        let outcome = game.pointer_down(1.0, 1.0);

        assert_eq!(outcome, ClickOutcome::Miss);
        assert_eq!(game.score(), 0);
        assert_eq!(game.hits(), 0);
        assert_eq!(game.total_clicks(), 1);
    }

    #[test]
    fn deactivated_target_cannot_be_hit_twice() {
        let mut game = single_target_game();
        game.start(WIDTH, HEIGHT);
        let (x, y) = center_of(&game, 0);

        assert_matches!(game.pointer_down(x, y), ClickOutcome::Hit { .. });
        assert_eq!(game.pointer_down(x, y), ClickOutcome::Miss);
        assert_eq!(game.hits(), 1);
        assert_eq!(game.total_clicks(), 2);
    }

    #[test]
    fn first_target_in_creation_order_masks_an_overlap() {
        let mut game = game_with(SessionConfig {
            target_count: 2,
            ..SessionConfig::default()
        });
        game.start(WIDTH, HEIGHT);
        let (x, y) = center_of(&game, 0);

        // strike target 0; if target 1 happens to overlap the point it stays
        // untouched because lower indices win
        let outcome = game.pointer_down(x, y);
        assert_matches!(outcome, ClickOutcome::Hit { target: 0, .. });
    }

    #[test]
    fn hit_target_respawns_after_the_acknowledgement_delay() {
        let mut game = single_target_game();
        game.start(WIDTH, HEIGHT);
        let (x, y) = center_of(&game, 0);
        game.pointer_down(x, y);

        // not due yet
        game.advance(0.02);
        assert!(!game.targets()[0].active);

        game.advance(0.04);
        assert!(game.targets()[0].active);
        assert!(game.targets()[0].x >= 120.0 && game.targets()[0].x < WIDTH - 120.0);
    }

    #[test]
    fn clicks_outside_a_running_session_are_ignored() {
        let mut game = default_game();
        assert_eq!(game.pointer_down(100.0, 100.0), ClickOutcome::Ignored);

        game.start(WIDTH, HEIGHT);
        game.advance(31.0);
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.pointer_down(100.0, 100.0), ClickOutcome::Ignored);
        assert_eq!(game.total_clicks(), 0);
    }

    #[test]
    fn timer_clamps_at_zero_and_ends_the_session() {
        let mut game = default_game();
        game.start(WIDTH, HEIGHT);

        assert_matches!(game.advance(29.0), TickOutcome::Running { .. });
        let outcome = game.advance(5.0);

        assert_matches!(outcome, TickOutcome::Finished(_));
        assert_eq!(game.time_remaining(), 0.0);
        assert_eq!(game.state(), GameState::GameOver);
    }

    #[test]
    fn ticks_do_nothing_outside_playing() {
        let mut game = default_game();
        assert_eq!(game.advance(1.0), TickOutcome::Idle);
        assert_eq!(game.state(), GameState::Menu);
    }

    #[test]
    fn accuracy_is_100_without_clicks() {
        let mut game = default_game();
        game.start(WIDTH, HEIGHT);
        assert_eq!(game.accuracy(), 100);

        game.advance(31.0);
        assert_eq!(game.summary().accuracy, 100);
    }

    #[test]
    fn accuracy_rounds_hits_over_clicks() {
        let mut game = single_target_game();
        game.start(WIDTH, HEIGHT);

        for _ in 0..5 {
            let (x, y) = center_of(&game, 0);
            assert_matches!(game.pointer_down(x, y), ClickOutcome::Hit { .. });
            game.advance(HIT_ACK_SECS);
        }
        for _ in 0..5 {
            assert_eq!(game.pointer_down(1.0, 1.0), ClickOutcome::Miss);
        }

        assert_eq!(game.accuracy(), 50);
    }

    #[test]
    fn game_over_commits_the_session_to_the_leaderboard() {
        let mut game = single_target_game();
        game.start(WIDTH, HEIGHT);

        // 12 hits and 3 misses: score 120, accuracy 80
        for _ in 0..12 {
            let (x, y) = center_of(&game, 0);
            assert_matches!(game.pointer_down(x, y), ClickOutcome::Hit { .. });
            game.advance(HIT_ACK_SECS);
        }
        for _ in 0..3 {
            game.pointer_down(1.0, 1.0);
        }

        let outcome = game.advance(30.0);
        assert_eq!(
            outcome,
            TickOutcome::Finished(SessionSummary {
                score: 120,
                accuracy: 80,
                hits: 12,
            })
        );

        assert_eq!(game.leaderboard().len(), 1);
        let entry = &game.leaderboard().entries()[0];
        assert_eq!(entry.score, 120);
        assert_eq!(entry.accuracy, 80);
        assert_eq!(game.high_score(), 120);
    }

    #[test]
    fn restart_resets_counters_and_respawns_targets() {
        let mut game = default_game();
        game.start(WIDTH, HEIGHT);
        let (x, y) = center_of(&game, 0);
        game.pointer_down(x, y);
        game.advance(31.0);
        assert_eq!(game.state(), GameState::GameOver);

        game.start(WIDTH, HEIGHT);

        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.hits(), 0);
        assert_eq!(game.total_clicks(), 0);
        assert_eq!(game.time_remaining(), 30.0);
        assert_eq!(game.targets().len(), 3);
        assert!(game.targets().iter().all(|t| t.active));
    }

    #[test]
    fn high_score_survives_across_sessions() {
        let mut game = single_target_game();
        game.start(WIDTH, HEIGHT);
        let (x, y) = center_of(&game, 0);
        game.pointer_down(x, y);
        game.advance(31.0);
        assert_eq!(game.high_score(), 10);

        // a worse follow-up session leaves the high score alone
        game.start(WIDTH, HEIGHT);
        game.advance(31.0);
        assert_eq!(game.high_score(), 10);
        assert_eq!(game.leaderboard().len(), 2);
    }

    #[test]
    fn return_to_menu_discards_the_session() {
        let mut game = default_game();
        game.start(WIDTH, HEIGHT);
        let (x, y) = center_of(&game, 0);
        game.pointer_down(x, y);

        game.return_to_menu();

        assert_eq!(game.state(), GameState::Menu);
        assert!(game.targets().is_empty());
        // the abandoned session never reaches the leaderboard
        assert!(game.leaderboard().is_empty());
    }

    #[test]
    fn pending_respawn_is_dropped_when_leaving_playing() {
        let mut game = single_target_game();
        game.start(WIDTH, HEIGHT);
        let (x, y) = center_of(&game, 0);
        game.pointer_down(x, y);

        game.return_to_menu();
        // the stale acknowledgement can no longer touch session state
        assert_eq!(game.advance(1.0), TickOutcome::Idle);
        assert!(game.targets().is_empty());
    }

    #[test]
    fn resize_repositions_targets_into_the_new_bounds() {
        let mut game = default_game();
        game.start(WIDTH, HEIGHT);

        game.resize(400.0, 400.0);

        for target in game.targets() {
            assert!(target.x >= 120.0 && target.x < 280.0);
            assert!(target.y >= 120.0 && target.y < 280.0);
        }
    }

    #[test]
    fn cues_follow_the_sound_toggle() {
        let sink = SharedSink::default();
        let mut game = Game::with_rng(
            SessionConfig {
                target_count: 1,
                ..SessionConfig::default()
            },
            Leaderboard::new(Box::new(MemoryScoreStore::default())),
            Box::new(sink.clone()),
            StdRng::seed_from_u64(42),
        );

        game.start(WIDTH, HEIGHT);
        let (x, y) = center_of(&game, 0);
        game.pointer_down(x, y);
        game.pointer_down(1.0, 1.0);
        assert_eq!(*sink.0.borrow(), vec![Cue::Hit, Cue::Miss]);

        assert!(!game.toggle_sound());
        game.pointer_down(1.0, 1.0);
        assert_eq!(sink.0.borrow().len(), 2);

        game.toggle_sound();
        game.advance(31.0);
        assert_eq!(sink.0.borrow().last(), Some(&Cue::GameOver));
    }

    #[test]
    fn hits_never_exceed_total_clicks() {
        let mut game = default_game();
        game.start(WIDTH, HEIGHT);
        for i in 0..20 {
            let (x, y) = if i % 3 == 0 {
                center_of(&game, i % 3)
            } else {
                (1.0, 1.0)
            };
            game.pointer_down(x, y);
            game.advance(0.1);
        }
        assert!(game.hits() <= game.total_clicks());
    }
}
