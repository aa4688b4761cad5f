//! Bounded survival stats with hazard key points.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurvivalStatType {
    Health,
    Satiety,
    Hydration,
}

/// Severity of a hazard, ordered from mildest to worst.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HazardLevel {
    Lesser,
    Strong,
    Max,
}

/// Threshold at or below which the stat is in the given hazard level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyPoint {
    pub level: HazardLevel,
    pub value: i32,
}

impl KeyPoint {
    pub const fn new(level: HazardLevel, value: i32) -> Self {
        Self { level, value }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurvivalStat {
    stat_type: SurvivalStatType,
    value: i32,
    min: i32,
    max: i32,
    /// Amount removed each turn.
    rate: i32,
    /// Sorted from worst (lowest threshold) to mildest.
    key_points: Vec<KeyPoint>,
}

impl SurvivalStat {
    pub fn new(stat_type: SurvivalStatType, value: i32, min: i32, max: i32) -> Self {
        Self {
            stat_type,
            value: value.clamp(min, max),
            min,
            max,
            rate: 0,
            key_points: Vec::new(),
        }
    }

    pub fn with_rate(mut self, rate: i32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_key_points(mut self, key_points: impl IntoIterator<Item = KeyPoint>) -> Self {
        self.key_points = key_points.into_iter().collect();
        self.key_points.sort_by(|a, b| b.level.cmp(&a.level).then(a.value.cmp(&b.value)));
        self
    }

    pub fn stat_type(&self) -> SurvivalStatType {
        self.stat_type
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn rate(&self) -> i32 {
        self.rate
    }

    pub fn key_points(&self) -> &[KeyPoint] {
        &self.key_points
    }

    pub fn is_at_min(&self) -> bool {
        self.value <= self.min
    }

    /// Sets the value (clamped) and returns key points crossed in either direction.
    pub fn set_value(&mut self, value: i32) -> Vec<KeyPoint> {
        let old = self.value;
        let new = value.clamp(self.min, self.max);
        self.value = new;

        self.key_points
            .iter()
            .filter(|kp| (old > kp.value) != (new > kp.value))
            .copied()
            .collect()
    }

    pub fn change_value(&mut self, delta: i32) -> Vec<KeyPoint> {
        self.set_value(self.value.saturating_add(delta))
    }

    /// Hazard level indicated by the current value.
    ///
    /// Key points are evaluated from the worst level down; the first whose
    /// threshold the value has reached wins.
    pub fn current_level(&self) -> Option<HazardLevel> {
        self.key_points
            .iter()
            .find(|kp| self.value <= kp.value)
            .map(|kp| kp.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn satiety() -> SurvivalStat {
        SurvivalStat::new(SurvivalStatType::Satiety, 10, -100, 100).with_key_points([
            KeyPoint::new(HazardLevel::Lesser, 0),
            KeyPoint::new(HazardLevel::Strong, -25),
            KeyPoint::new(HazardLevel::Max, -50),
        ])
    }

    #[test]
    fn value_is_clamped() {
        let mut stat = satiety();
        stat.set_value(500);
        assert_eq!(stat.value(), 100);
        stat.set_value(-500);
        assert_eq!(stat.value(), -100);
        assert!(stat.is_at_min());
    }

    #[test]
    fn crossing_downward_reports_each_threshold() {
        let mut stat = satiety();
        let crossed = stat.set_value(-30);
        let levels: Vec<_> = crossed.iter().map(|kp| kp.level).collect();
        assert_eq!(levels, vec![HazardLevel::Strong, HazardLevel::Lesser]);
    }

    #[test]
    fn crossing_upward_is_reported_too() {
        let mut stat = satiety();
        stat.set_value(-5);
        let crossed = stat.set_value(5);
        assert_eq!(crossed, vec![KeyPoint::new(HazardLevel::Lesser, 0)]);
    }

    #[test]
    fn staying_between_thresholds_crosses_nothing() {
        let mut stat = satiety();
        stat.set_value(-5);
        assert!(stat.change_value(-10).is_empty());
    }

    #[test]
    fn current_level_prefers_worst_reached() {
        let mut stat = satiety();
        assert_eq!(stat.current_level(), None);
        stat.set_value(0);
        assert_eq!(stat.current_level(), Some(HazardLevel::Lesser));
        stat.set_value(-30);
        assert_eq!(stat.current_level(), Some(HazardLevel::Strong));
        stat.set_value(-50);
        assert_eq!(stat.current_level(), Some(HazardLevel::Max));
    }
}
