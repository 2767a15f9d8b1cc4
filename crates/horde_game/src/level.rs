//! Level progression

use serde::{Deserialize, Serialize};

/// Level rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Levels beyond this wrap back to 1
    pub max_level: u32,
    /// Kills needed on level 1
    pub base_kills: u32,
    /// Extra kills needed per level above 1
    pub kills_step: u32,
    /// Extra kills needed once the timer has run out
    pub overtime_kills: u32,
    /// Countdown per level in seconds
    pub time_limit: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            max_level: 3,
            base_kills: 5,
            kills_step: 5,
            overtime_kills: 5,
            time_limit: 100.0,
        }
    }
}

impl LevelConfig {
    pub fn kills_to_win(&self, level: u32) -> u32 {
        self.base_kills
            .saturating_add(level.saturating_sub(1).saturating_mul(self.kills_step))
    }
}

/// Progress through the current level.
///
/// This is the only state a host is expected to keep between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    pub kills: u32,
    pub kills_to_win: u32,
    pub time_remaining: f32,
}

impl LevelProgress {
    /// Fresh progress for a level, clamped into `1..=max_level`
    pub fn new(level: u32, config: &LevelConfig) -> Self {
        let level = if (1..=config.max_level.max(1)).contains(&level) {
            level
        } else {
            1
        };
        Self {
            level,
            kills: 0,
            kills_to_win: config.kills_to_win(level),
            time_remaining: config.time_limit,
        }
    }

    pub fn record_kill(&mut self) -> u32 {
        self.kills += 1;
        self.kills
    }

    /// Run the countdown. Returns true on the tick it reaches zero
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.time_remaining <= 0.0 || !(dt > 0.0) {
            return false;
        }
        self.time_remaining = (self.time_remaining - dt).max(0.0);
        self.time_remaining == 0.0
    }

    pub fn time_left(&self) -> bool {
        self.time_remaining > 0.0
    }

    /// Kills needed right now, counting overtime once the timer has expired
    pub fn target(&self, config: &LevelConfig) -> u32 {
        if self.time_left() {
            self.kills_to_win
        } else {
            self.kills_to_win.saturating_add(config.overtime_kills)
        }
    }

    pub fn is_complete(&self, config: &LevelConfig) -> bool {
        self.kills >= self.target(config)
    }

    /// Progress for the level after this one
    pub fn next(&self, config: &LevelConfig) -> Self {
        let level = if self.level >= config.max_level { 1 } else { self.level + 1 };
        Self::new(level, config)
    }
}

impl Default for LevelProgress {
    fn default() -> Self {
        Self::new(1, &LevelConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_per_level() {
        let config = LevelConfig::default();
        assert_eq!(LevelProgress::new(1, &config).kills_to_win, 5);
        assert_eq!(LevelProgress::new(2, &config).kills_to_win, 10);
        assert_eq!(LevelProgress::new(3, &config).kills_to_win, 15);
        assert_eq!(LevelProgress::new(9, &config).level, 1);
    }

    #[test]
    fn test_complete_in_time() {
        let config = LevelConfig::default();
        let mut progress = LevelProgress::new(1, &config);
        for _ in 0..4 {
            progress.record_kill();
        }
        assert!(!progress.is_complete(&config));
        progress.record_kill();
        assert!(progress.is_complete(&config));
    }

    #[test]
    fn test_overtime_needs_more_kills() {
        let config = LevelConfig::default();
        let mut progress = LevelProgress::new(1, &config);
        assert!(!progress.tick(60.0));
        assert!(progress.tick(60.0));
        assert!(!progress.tick(1.0), "expiry is reported once");

        for _ in 0..5 {
            progress.record_kill();
        }
        assert!(!progress.is_complete(&config));
        for _ in 0..5 {
            progress.record_kill();
        }
        assert!(progress.is_complete(&config));
    }

    #[test]
    fn test_level_wraps() {
        let config = LevelConfig::default();
        let third = LevelProgress::new(3, &config);
        let next = third.next(&config);
        assert_eq!(next.level, 1);
        assert_eq!(next.kills_to_win, 5);
        assert_eq!(LevelProgress::default().next(&config).level, 2);
    }

    #[test]
    fn test_progress_round_trips_as_json() {
        let progress = LevelProgress::new(2, &LevelConfig::default());
        let json = serde_json::to_string(&progress).unwrap();
        let back: LevelProgress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, progress);
    }
}
