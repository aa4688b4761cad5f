/// Flat bonus applied on top of a dice roll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollModifiers {
    pub result_buff: i32,
}

/// `count` dice with `dice` sides each, e.g. `Roll::new(6, 2)` is 2d6.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roll {
    pub dice: u32,
    pub count: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Option<RollModifiers>,
}

impl Roll {
    /// The standard to-hit die.
    pub const D6: Roll = Roll::new(6, 1);

    pub const fn new(dice: u32, count: u32) -> Self {
        Self {
            dice,
            count,
            modifiers: None,
        }
    }

    pub const fn with_modifiers(mut self, modifiers: RollModifiers) -> Self {
        self.modifiers = Some(modifiers);
        self
    }

    pub fn buff(&self) -> i32 {
        self.modifiers.map_or(0, |m| m.result_buff)
    }

    /// Twice the expected value (`dice / 2 × count` plus the flat buff).
    ///
    /// Doubling keeps act ranking in integers.
    pub fn doubled_expectation(&self) -> i64 {
        i64::from(self.dice) * i64::from(self.count) + 2 * i64::from(self.buff())
    }

    /// Middle of the roll's range, halves rounded up; used by deterministic sources.
    pub fn mean(&self) -> u32 {
        let min = self.count;
        let max = self.dice * self.count;
        (min + max).div_ceil(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expectation_ranks_more_dice_higher() {
        assert!(Roll::new(3, 3).doubled_expectation() > Roll::new(3, 1).doubled_expectation());
        assert_eq!(Roll::new(6, 1).doubled_expectation(), 6);
    }

    #[test]
    fn modifiers_shift_expectation() {
        let buffed = Roll::new(3, 1).with_modifiers(RollModifiers { result_buff: 2 });
        assert_eq!(buffed.doubled_expectation(), 7);
    }

    #[test]
    fn mean_sits_between_bounds() {
        assert_eq!(Roll::new(6, 1).mean(), 4);
        assert_eq!(Roll::new(3, 2).mean(), 4);
        assert_eq!(Roll::new(3, 1).mean(), 2);
    }
}
