//! Perks: eligibility, job progress, and level-ups.
//!
//! A perk scheme lists levels; each level has jobs (defeat N monsters, land N
//! melee hits) and rules (roll bonuses). A person's evolution module tracks
//! which perks are instantiated, their current level, and job progress.

use crate::error::{ErrorSeverity, GameError};
use crate::scheme::SchemeOracle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JobKind {
    Defeats,
    MeleeHits,
    BallisticHits,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuleKind {
    ToHit,
    Efficiency,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerkRule {
    pub kind: RuleKind,
    pub value: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JobScheme {
    pub kind: JobKind,
    pub value: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerkLevelScheme {
    /// Number of sub-levels in this primary level.
    pub max_value: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub jobs: Vec<JobScheme>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rules: Vec<PerkRule>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerkScheme {
    pub sid: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_built_in: bool,
    /// `None` marks a scheme that is never offered (placeholder or retired).
    #[cfg_attr(feature = "serde", serde(default))]
    pub levels: Option<Vec<PerkLevelScheme>>,
}

/// `(primary, sub)`, both one-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerkLevel {
    pub primary: u32,
    pub sub: u32,
}

impl PerkLevel {
    pub const FIRST: PerkLevel = PerkLevel::new(1, 1);

    pub const fn new(primary: u32, sub: u32) -> Self {
        Self { primary, sub }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RollBonuses {
    pub to_hit: i32,
    pub efficiency: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerkJob {
    pub kind: JobKind,
    pub target: u32,
    pub progress: u32,
}

impl PerkJob {
    pub fn is_complete(&self) -> bool {
        self.progress >= self.target
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Perk {
    pub sid: String,
    pub level: Option<PerkLevel>,
    pub is_built_in: bool,
    /// Jobs toward the next level; empty for built-in or maxed perks.
    pub jobs: Vec<PerkJob>,
    pub bonuses: RollBonuses,
}

impl Perk {
    pub fn built_in(sid: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            level: None,
            is_built_in: true,
            jobs: Vec::new(),
            bonuses: RollBonuses::default(),
        }
    }

    fn from_scheme(scheme: &PerkScheme, levels: &[PerkLevelScheme]) -> Self {
        Self {
            sid: scheme.sid.clone(),
            level: None,
            is_built_in: false,
            jobs: jobs_for(levels.first()),
            bonuses: RollBonuses::default(),
        }
    }

    /// True once every job toward the next level is done.
    pub fn is_ready(&self) -> bool {
        !self.is_built_in && !self.jobs.is_empty() && self.jobs.iter().all(PerkJob::is_complete)
    }
}

fn jobs_for(level: Option<&PerkLevelScheme>) -> Vec<PerkJob> {
    level
        .map(|level| {
            level
                .jobs
                .iter()
                .map(|job| PerkJob {
                    kind: job.kind,
                    target: job.value,
                    progress: 0,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Appends a fresh perk for every offered scheme not already in `perks`.
fn with_offered_perks(mut perks: Vec<Perk>, schemes: &dyn SchemeOracle) -> Result<Vec<Perk>, EvolutionError> {
    for scheme in schemes.perks() {
        if scheme.is_built_in || perks.iter().any(|p| p.sid == scheme.sid) {
            continue;
        }
        let Some(levels) = scheme.levels.as_deref() else {
            continue;
        };
        if levels.is_empty() {
            return Err(EvolutionError::MissingLevels(scheme.sid.clone()));
        }
        perks.push(Perk::from_scheme(scheme, levels));
    }
    Ok(perks)
}

/// Level that follows `current`, or `None` past the last level.
pub fn next_level(levels: &[PerkLevelScheme], current: Option<PerkLevel>) -> Option<PerkLevel> {
    let Some(current) = current else {
        return (!levels.is_empty()).then_some(PerkLevel::FIRST);
    };
    let level_scheme = levels.get(current.primary.checked_sub(1)? as usize)?;
    if current.sub < level_scheme.max_value {
        Some(PerkLevel::new(current.primary, current.sub + 1))
    } else if (current.primary as usize) < levels.len() {
        Some(PerkLevel::new(current.primary + 1, 1))
    } else {
        None
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvolutionError {
    #[error("perk {0} is not active for this person")]
    PerkNotActive(String),

    #[error("perk scheme {0} has no levels")]
    MissingLevels(String),

    #[error("perk {0} is already at its last level")]
    PerkAtMaxLevel(String),

    #[error("perk scheme {0} not found")]
    UnknownPerk(String),
}

impl GameError for EvolutionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::PerkNotActive(_) | Self::PerkAtMaxLevel(_) => ErrorSeverity::Validation,
            Self::MissingLevels(_) | Self::UnknownPerk(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PerkNotActive(_) => "EVOLUTION_PERK_NOT_ACTIVE",
            Self::MissingLevels(_) => "EVOLUTION_MISSING_LEVELS",
            Self::PerkAtMaxLevel(_) => "EVOLUTION_PERK_AT_MAX_LEVEL",
            Self::UnknownPerk(_) => "EVOLUTION_UNKNOWN_PERK",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvolutionEvent {
    PerkAdded { sid: String },
    PerkLeveledUp { sid: String, level: PerkLevel },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvolutionModule {
    perks: Vec<Perk>,
}

impl EvolutionModule {
    /// Creates a module offering every eligible perk from `schemes`.
    pub fn new(schemes: &dyn SchemeOracle) -> Result<Self, EvolutionError> {
        let mut module = Self::default();
        module.perks = module.get_perks(schemes)?;
        Ok(module)
    }

    pub fn perks(&self) -> &[Perk] {
        &self.perks
    }

    pub fn perk(&self, sid: &str) -> Option<&Perk> {
        self.perks.iter().find(|p| p.sid == sid)
    }

    /// Adds built-in perks (racial traits, backgrounds), skipping duplicates.
    pub fn add_built_in_perks(&mut self, perks: impl IntoIterator<Item = Perk>) -> Vec<EvolutionEvent> {
        let mut events = Vec::new();
        for mut perk in perks {
            if self.perk(&perk.sid).is_some() {
                continue;
            }
            perk.is_built_in = true;
            events.push(EvolutionEvent::PerkAdded { sid: perk.sid.clone() });
            self.perks.push(perk);
        }
        events
    }

    /// Built-in and already instantiated perks, followed by every scheme perk
    /// that is offered but not yet instantiated.
    ///
    /// Built-in schemes are never offered; schemes with `levels: None` are
    /// skipped; an offered scheme with an empty level list is an error.
    pub fn get_perks(&self, schemes: &dyn SchemeOracle) -> Result<Vec<Perk>, EvolutionError> {
        with_offered_perks(self.perks.clone(), schemes)
    }

    /// Advances an active perk by one level and refreshes the perk list.
    pub fn perk_level_up(&mut self, sid: &str, schemes: &dyn SchemeOracle) -> Result<EvolutionEvent, EvolutionError> {
        let index = self
            .perks
            .iter()
            .position(|p| p.sid == sid)
            .ok_or_else(|| EvolutionError::PerkNotActive(sid.to_owned()))?;

        let scheme = schemes
            .perk(sid)
            .ok_or_else(|| EvolutionError::UnknownPerk(sid.to_owned()))?;
        let levels = scheme
            .levels
            .as_deref()
            .filter(|levels| !levels.is_empty())
            .ok_or_else(|| EvolutionError::MissingLevels(sid.to_owned()))?;

        let mut perks = self.perks.clone();
        let perk = &mut perks[index];
        let reached = next_level(levels, perk.level)
            .ok_or_else(|| EvolutionError::PerkAtMaxLevel(sid.to_owned()))?;

        if let Some(level_scheme) = levels.get(reached.primary as usize - 1) {
            for rule in &level_scheme.rules {
                match rule.kind {
                    RuleKind::ToHit => perk.bonuses.to_hit += rule.value,
                    RuleKind::Efficiency => perk.bonuses.efficiency += rule.value,
                }
            }
        }
        perk.level = Some(reached);
        perk.jobs = next_level(levels, Some(reached))
            .map(|upcoming| jobs_for(levels.get(upcoming.primary as usize - 1)))
            .unwrap_or_default();

        self.perks = with_offered_perks(perks, schemes)?;
        Ok(EvolutionEvent::PerkLeveledUp {
            sid: sid.to_owned(),
            level: reached,
        })
    }

    /// Advances matching jobs; returns sids of perks that became ready.
    pub fn progress_job(&mut self, kind: JobKind, amount: u32) -> Vec<String> {
        let mut ready = Vec::new();
        for perk in &mut self.perks {
            let was_ready = perk.is_ready();
            for job in perk.jobs.iter_mut().filter(|job| job.kind == kind) {
                job.progress = job.progress.saturating_add(amount);
            }
            if !was_ready && perk.is_ready() {
                ready.push(perk.sid.clone());
            }
        }
        ready
    }

    pub fn roll_bonuses(&self) -> RollBonuses {
        self.perks.iter().fold(RollBonuses::default(), |acc, perk| RollBonuses {
            to_hit: acc.to_hit + perk.bonuses.to_hit,
            efficiency: acc.efficiency + perk.bonuses.efficiency,
        })
    }
}

crate::person::person_module!(EvolutionModule, crate::person::ModuleKey::Evolution);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::SchemeRegistry;

    fn level(max_value: u32, defeats: u32, efficiency: i32) -> PerkLevelScheme {
        PerkLevelScheme {
            max_value,
            jobs: vec![JobScheme {
                kind: JobKind::Defeats,
                value: defeats,
            }],
            rules: vec![PerkRule {
                kind: RuleKind::Efficiency,
                value: efficiency,
            }],
        }
    }

    fn perk_scheme(sid: &str, levels: Option<Vec<PerkLevelScheme>>) -> PerkScheme {
        PerkScheme {
            sid: sid.into(),
            is_built_in: false,
            levels,
        }
    }

    fn registry() -> SchemeRegistry {
        let mut schemes = SchemeRegistry::new();
        schemes.insert_perk(perk_scheme("fighter", Some(vec![level(2, 1, 1), level(1, 2, 2)])));
        schemes.insert_perk(perk_scheme("retired", None));
        schemes.insert_perk(PerkScheme {
            sid: "night-vision".into(),
            is_built_in: true,
            levels: None,
        });
        schemes
    }

    #[test]
    fn offers_eligible_schemes_only() {
        let module = EvolutionModule::new(&registry()).unwrap();
        let sids: Vec<_> = module.perks().iter().map(|p| p.sid.as_str()).collect();
        assert_eq!(sids, vec!["fighter"]);
    }

    #[test]
    fn offered_scheme_without_levels_is_an_error() {
        let mut schemes = registry();
        schemes.insert_perk(perk_scheme("broken", Some(Vec::new())));

        let err = EvolutionModule::new(&schemes).unwrap_err();
        assert_eq!(err, EvolutionError::MissingLevels("broken".into()));
    }

    #[test]
    fn built_in_perks_are_kept_and_announced() {
        let schemes = registry();
        let mut module = EvolutionModule::new(&schemes).unwrap();

        let events = module.add_built_in_perks([Perk::built_in("night-vision")]);
        assert_eq!(events, vec![EvolutionEvent::PerkAdded { sid: "night-vision".into() }]);
        assert!(module.add_built_in_perks([Perk::built_in("night-vision")]).is_empty());

        let merged = module.get_perks(&schemes).unwrap();
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn level_up_walks_sub_levels_then_primary_levels() {
        let schemes = registry();
        let mut module = EvolutionModule::new(&schemes).unwrap();

        let steps: Vec<_> = (0..3)
            .map(|_| match module.perk_level_up("fighter", &schemes).unwrap() {
                EvolutionEvent::PerkLeveledUp { level, .. } => level,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();

        assert_eq!(
            steps,
            vec![PerkLevel::new(1, 1), PerkLevel::new(1, 2), PerkLevel::new(2, 1)]
        );
        assert_eq!(
            module.perk_level_up("fighter", &schemes),
            Err(EvolutionError::PerkAtMaxLevel("fighter".into()))
        );
        assert_eq!(module.roll_bonuses().efficiency, 4);
    }

    #[test]
    fn level_up_requires_active_perk() {
        let schemes = registry();
        let mut module = EvolutionModule::new(&schemes).unwrap();

        assert_eq!(
            module.perk_level_up("retired", &schemes),
            Err(EvolutionError::PerkNotActive("retired".into()))
        );
    }

    #[test]
    fn finished_jobs_mark_perk_ready() {
        let schemes = registry();
        let mut module = EvolutionModule::new(&schemes).unwrap();

        assert!(module.progress_job(JobKind::MeleeHits, 5).is_empty());
        assert_eq!(module.progress_job(JobKind::Defeats, 1), vec!["fighter".to_string()]);
        assert!(module.progress_job(JobKind::Defeats, 1).is_empty());

        module.perk_level_up("fighter", &schemes).unwrap();
        assert!(!module.perk("fighter").unwrap().is_ready());
    }

    #[test]
    fn failed_level_up_leaves_perks_untouched() {
        let mut schemes = registry();
        let mut module = EvolutionModule::new(&schemes).unwrap();
        schemes.insert_perk(perk_scheme("broken", Some(Vec::new())));

        assert_eq!(
            module.perk_level_up("fighter", &schemes),
            Err(EvolutionError::MissingLevels("broken".into()))
        );

        let fighter = module.perk("fighter").unwrap();
        assert_eq!(fighter.level, None);
        assert_eq!(module.roll_bonuses().efficiency, 0);
        assert_eq!(module.perks().len(), 1);
    }
}
