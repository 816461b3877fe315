//! Scoring, leveling thresholds, and the gravity curve
//!
//! Values follow the NES scoring and drop tables:
//! <https://tetris.wiki/Tetris_(NES,_Nintendo)>

/// Frames between gravity drops, indexed by level; levels past the end of
/// the table clamp to its last entry.
const FRAMES_PER_DROP: [u32; 9] = [48, 43, 38, 33, 28, 23, 18, 13, 8];

/// Gravity is defined in 60 Hz frames but applied in real time, so the
/// curve stays correct under a variable tick rate.
const SECONDS_PER_FRAME: f64 = 1.0 / 60.0;

/// Points awarded for clearing `lines` rows at once at the given level
/// (pre-increment). Zero lines award nothing.
pub fn score_for(level: u32, lines: usize) -> u64 {
    let base: u64 = match lines {
        1 => 40,
        2 => 100,
        3 => 300,
        4 => 1200,
        _ => 0,
    };
    base * (level as u64 + 1)
}

/// Seconds between gravity drops at the given level
pub fn drop_interval(level: u32) -> f64 {
    let index = (level as usize).min(FRAMES_PER_DROP.len() - 1);
    f64::from(FRAMES_PER_DROP[index]) * SECONDS_PER_FRAME
}

/// Cumulative cleared-line count (from game start) at which the current
/// level is left behind.
///
/// The base threshold for the starting level is
/// `min(start*10 + 1, max(100, start*10 - 50))`; each level past the start
/// adds 10 to it.
pub fn lines_for_next_level(start_level: u32, level: u32) -> u32 {
    let base = (start_level * 10 + 1).min((start_level * 10).saturating_sub(50).max(100));
    if level == start_level {
        base
    } else {
        base + (level - start_level) * 10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_table() {
        assert_eq!(score_for(0, 1), 40);
        assert_eq!(score_for(0, 2), 100);
        assert_eq!(score_for(0, 3), 300);
        assert_eq!(score_for(0, 4), 1200);
        assert_eq!(score_for(5, 2), 600);
        assert_eq!(score_for(2, 0), 0);
    }

    #[test]
    fn test_drop_interval_table() {
        assert_eq!(drop_interval(0), 48.0 / 60.0);
        assert_eq!(drop_interval(8), 8.0 / 60.0);
    }

    #[test]
    fn test_drop_interval_clamps_above_level_eight() {
        assert_eq!(drop_interval(9), drop_interval(8));
        assert_eq!(drop_interval(20), drop_interval(8));
    }

    #[test]
    fn test_level_thresholds_from_zero() {
        // Start level 0: first level-up after a single line
        assert_eq!(lines_for_next_level(0, 0), 1);
        assert_eq!(lines_for_next_level(0, 1), 11);
        assert_eq!(lines_for_next_level(0, 2), 21);
    }

    #[test]
    fn test_level_thresholds_high_starts() {
        // start*10+1 wins until the 100-floor branch takes over
        assert_eq!(lines_for_next_level(5, 5), 51);
        assert_eq!(lines_for_next_level(9, 9), 91);
        assert_eq!(lines_for_next_level(10, 10), 100);
        // start 20: max(100, 150) = 150 < 201
        assert_eq!(lines_for_next_level(20, 20), 150);
        assert_eq!(lines_for_next_level(20, 22), 170);
    }
}
