/// Tactical tunables shared by bot logic, combat resolution and survival.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TacticsConfig {
    /// Hex distance within which a bot notices intruders (line of sight still required).
    pub visibility_range: u32,
    /// Number of turns a bot follows a cached pursuit path before re-planning.
    pub pursuit_counter: u32,
    /// Inclusive bounds for the randomized idle pause between patrol legs.
    pub idle_duration_min: u32,
    pub idle_duration_max: u32,
    /// Base d6 threshold a to-hit roll must reach.
    pub to_hit_base: i32,
    /// Per-turn decrease of the satiety stat.
    pub satiety_rate: i32,
    /// Per-turn decrease of the hydration stat.
    pub hydration_rate: i32,
}

impl TacticsConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_EFFECTS: usize = 8;
    pub const MAX_NEIGHBORS: usize = 6;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_VISIBILITY_RANGE: u32 = 5;
    pub const DEFAULT_PURSUIT_COUNTER: u32 = 3;
    pub const DEFAULT_IDLE_DURATION_MIN: u32 = 2;
    pub const DEFAULT_IDLE_DURATION_MAX: u32 = 10;
    pub const DEFAULT_TO_HIT_BASE: i32 = 4;
    pub const DEFAULT_SATIETY_RATE: i32 = 1;
    pub const DEFAULT_HYDRATION_RATE: i32 = 1;

    pub fn new() -> Self {
        Self {
            visibility_range: Self::DEFAULT_VISIBILITY_RANGE,
            pursuit_counter: Self::DEFAULT_PURSUIT_COUNTER,
            idle_duration_min: Self::DEFAULT_IDLE_DURATION_MIN,
            idle_duration_max: Self::DEFAULT_IDLE_DURATION_MAX,
            to_hit_base: Self::DEFAULT_TO_HIT_BASE,
            satiety_rate: Self::DEFAULT_SATIETY_RATE,
            hydration_rate: Self::DEFAULT_HYDRATION_RATE,
        }
    }

    pub fn with_pursuit_counter(mut self, pursuit_counter: u32) -> Self {
        self.pursuit_counter = pursuit_counter;
        self
    }

    pub fn with_visibility_range(mut self, visibility_range: u32) -> Self {
        self.visibility_range = visibility_range;
        self
    }
}

impl Default for TacticsConfig {
    fn default() -> Self {
        Self::new()
    }
}
