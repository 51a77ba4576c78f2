// src/users/leveling.rs
// Level 1 needs 100 XP; each subsequent level needs the prior requirement
// times 1.2, truncated. Both public functions derive from the same walk so
// they can never disagree for the same xp value.

/// Where a given cumulative xp total lands in the level curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: i64,
    /// XP already spent inside the current level.
    pub xp_into_level: i64,
    /// Total XP the current level requires.
    pub level_requirement: i64,
}

impl LevelProgress {
    pub fn for_xp(xp: i64) -> Self {
        let mut level = 1i64;
        let mut requirement = 100i64;
        let mut remaining = xp.max(0);

        while remaining >= requirement {
            remaining -= requirement;
            level += 1;
            requirement = (requirement as f64 * 1.2) as i64;
        }

        Self {
            level,
            xp_into_level: remaining,
            level_requirement: requirement,
        }
    }

    /// XP still needed to reach the next level.
    pub fn xp_to_next(&self) -> i64 {
        self.level_requirement - self.xp_into_level
    }
}

pub fn level_for_xp(xp: i64) -> i64 {
    LevelProgress::for_xp(xp).level
}

pub fn xp_to_next_level(xp: i64) -> i64 {
    LevelProgress::for_xp(xp).xp_to_next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        // Level 2 needs 120 XP, so level 3 starts at 220.
        assert_eq!(level_for_xp(219), 2);
        assert_eq!(level_for_xp(220), 3);
    }

    #[test]
    fn test_xp_to_next_at_boundaries() {
        assert_eq!(xp_to_next_level(0), 100);
        assert_eq!(xp_to_next_level(99), 1);
        assert_eq!(xp_to_next_level(100), 120);
        assert_eq!(xp_to_next_level(219), 1);
    }

    #[test]
    fn test_level_monotonically_non_decreasing() {
        let mut prev = level_for_xp(0);
        for xp in 1..5000 {
            let lvl = level_for_xp(xp);
            assert!(lvl >= prev, "level dropped at xp={}", xp);
            prev = lvl;
        }
    }

    #[test]
    fn test_both_call_sites_agree() {
        // level() and xp_to_next() must come from the same walk: adding the
        // remaining xp should always push the user exactly one level up.
        for xp in [0, 50, 99, 100, 219, 220, 1000, 4321] {
            let progress = LevelProgress::for_xp(xp);
            let bumped = LevelProgress::for_xp(xp + progress.xp_to_next());
            assert_eq!(bumped.level, progress.level + 1, "xp={}", xp);
        }
    }

    #[test]
    fn test_negative_xp_clamped() {
        assert_eq!(level_for_xp(-5), 1);
        assert_eq!(xp_to_next_level(-5), 100);
    }
}
