/// Session length when nothing else is configured.
pub const GAME_DURATION_SECS: f64 = 30.0;
/// Targets spawned at the start of every session.
pub const INITIAL_TARGET_COUNT: usize = 3;
/// Points awarded per successful hit.
pub const POINTS_PER_HIT: u32 = 10;
/// Pause between a hit being acknowledged and the target reappearing.
pub const HIT_ACK_SECS: f64 = 0.05;
/// Default target radius, in surface units.
pub const TARGET_RADIUS: f64 = 65.0;
/// Targets never spawn closer than this to a surface edge.
pub const SPAWN_PADDING: f64 = 120.0;

/// Remaining-time thresholds the HUD styles against.
pub const TIMER_CRITICAL_SECS: f64 = 10.0;
pub const TIMER_WARNING_SECS: f64 = 20.0;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub duration_secs: f64,
    pub target_count: usize,
    pub target_radius: f64,
    pub spawn_padding: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: GAME_DURATION_SECS,
            target_count: INITIAL_TARGET_COUNT,
            target_radius: TARGET_RADIUS,
            spawn_padding: SPAWN_PADDING,
        }
    }
}

/// End-of-session stats pushed to the game-over screen and the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub score: u32,
    pub accuracy: u32,
    pub hits: u32,
}
