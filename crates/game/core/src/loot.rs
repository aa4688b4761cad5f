//! Drop tables rolled into concrete props.
//!
//! Monsters name the tables they drop from; chests may be filled the same
//! way. Every roll goes through a [`DropRandomSource`], so a seeded source
//! always produces the same loot.

use tracing::{debug, warn};

use crate::equipment::Equipment;
use crate::inventory::{Prop, Resource, stack_prop};
use crate::random::DropRandomSource;
use crate::scheme::{DropTableRecord, DropTableScheme, SchemeOracle};

/// Turns drop table sids into props.
pub struct DropResolver<'a> {
    schemes: &'a dyn SchemeOracle,
}

impl<'a> DropResolver<'a> {
    pub fn new(schemes: &'a dyn SchemeOracle) -> Self {
        Self { schemes }
    }

    /// Rolls each table `rolls` times and collects the picked props.
    ///
    /// Resources with the same sid share one stack. Unknown tables and props
    /// are logged and skipped.
    pub fn resolve(&self, tables: &[String], random: &mut dyn DropRandomSource) -> Vec<Prop> {
        let mut props = Vec::new();
        for sid in tables {
            let table = match self.schemes.require_drop_table(sid) {
                Ok(table) => table,
                Err(err) => {
                    warn!(table = %sid, %err, "drop table skipped");
                    continue;
                }
            };
            for _ in 0..table.rolls {
                let Some(record) = roll_record(table, random) else {
                    continue;
                };
                let Some(prop) = record.prop.as_deref() else {
                    continue;
                };
                let count = random.roll_count(record.min_count, record.max_count);
                self.create_props(prop, count, &mut props);
            }
        }
        debug!(tables = tables.len(), props = props.len(), "drop tables resolved");
        props
    }

    fn create_props(&self, sid: &str, count: u32, props: &mut Vec<Prop>) {
        if count == 0 {
            return;
        }
        let scheme = match self.schemes.require_prop(sid) {
            Ok(scheme) => scheme,
            Err(err) => {
                warn!(prop = sid, %err, "dropped prop skipped");
                return;
            }
        };
        if scheme.equip.is_none() {
            stack_prop(props, Prop::Resource(Resource::from_scheme(scheme, count)));
            return;
        }
        match Equipment::from_scheme(scheme, self.schemes) {
            Ok(equipment) => props.extend((0..count).map(|_| Prop::Equipment(equipment.clone()))),
            Err(err) => warn!(prop = sid, %err, "dropped equipment skipped"),
        }
    }
}

/// Record whose cumulative weight band contains the rolled point.
fn roll_record<'t>(table: &'t DropTableScheme, random: &mut dyn DropRandomSource) -> Option<&'t DropTableRecord> {
    let total = table.total_weight();
    if total == 0 {
        return None;
    }
    let point = random.roll_weight(total);
    let mut cumulative = 0;
    table.records.iter().find(|record| {
        cumulative += record.weight;
        point <= cumulative
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{TacticalActScheme, TacticalActStats};
    use crate::equipment::{EquipScheme, SlotKind};
    use crate::random::Roll;
    use crate::scheme::{PropScheme, ResourceScheme, SchemeRegistry};
    use crate::test_support::FixedRandom;

    fn record(prop: Option<&str>, weight: u32, min_count: u32, max_count: u32) -> DropTableRecord {
        DropTableRecord {
            prop: prop.map(str::to_owned),
            weight,
            min_count,
            max_count,
        }
    }

    fn registry() -> SchemeRegistry {
        let mut schemes = SchemeRegistry::new();
        schemes.insert_act(TacticalActScheme::new("slash", TacticalActStats::melee_damage(Roll::new(4, 1))));
        schemes.insert_prop(PropScheme {
            sid: "arrow".into(),
            equip: None,
            resource: Some(ResourceScheme {
                resource_type: "arrow".into(),
            }),
            usage: None,
        });
        schemes.insert_prop(PropScheme {
            sid: "knife".into(),
            equip: Some(EquipScheme {
                slot: SlotKind::Hand,
                acts: vec!["slash".into()],
                armors: Vec::new(),
            }),
            resource: None,
            usage: None,
        });
        schemes.insert_drop_table(DropTableScheme {
            sid: "rat-loot".into(),
            rolls: 2,
            records: vec![record(None, 2, 0, 0), record(Some("arrow"), 3, 1, 3), record(Some("knife"), 1, 1, 1)],
        });
        schemes
    }

    fn rolling(weight: u32) -> FixedRandom {
        FixedRandom {
            drop_weight: weight,
            ..FixedRandom::mean()
        }
    }

    #[test]
    fn weight_point_selects_its_band() {
        let schemes = registry();
        let table = schemes.drop_table("rat-loot").unwrap();
        let pick = |weight| roll_record(table, &mut rolling(weight)).and_then(|r| r.prop.clone());

        assert_eq!(pick(1), None);
        assert_eq!(pick(2), None);
        assert_eq!(pick(3).as_deref(), Some("arrow"));
        assert_eq!(pick(5).as_deref(), Some("arrow"));
        assert_eq!(pick(6).as_deref(), Some("knife"));
    }

    #[test]
    fn repeated_rolls_stack_resources() {
        let schemes = registry();
        let props = DropResolver::new(&schemes).resolve(&["rat-loot".to_string()], &mut rolling(4));

        let [Prop::Resource(arrows)] = props.as_slice() else {
            panic!("expected a single arrow stack, got {props:?}");
        };
        assert_eq!(arrows.sid, "arrow");
        assert_eq!(arrows.count, 6);
    }

    #[test]
    fn equipment_drops_one_prop_per_unit() {
        let schemes = registry();
        let props = DropResolver::new(&schemes).resolve(&["rat-loot".to_string()], &mut rolling(6));

        assert_eq!(props.len(), 2);
        assert!(props.iter().all(|p| matches!(p, Prop::Equipment(e) if e.sid == "knife")));
    }

    #[test]
    fn empty_and_unknown_tables_drop_nothing() {
        let mut schemes = registry();
        schemes.insert_drop_table(DropTableScheme {
            sid: "nothing".into(),
            rolls: 3,
            records: vec![record(Some("arrow"), 0, 1, 1)],
        });
        let resolver = DropResolver::new(&schemes);

        assert!(resolver.resolve(&["nothing".to_string(), "dragon-hoard".to_string()], &mut rolling(1)).is_empty());
        assert!(resolver.resolve(&["rat-loot".to_string()], &mut rolling(1)).is_empty());
    }

    #[test]
    fn seeded_dice_replay_the_same_loot() {
        let schemes = registry();
        let resolver = DropResolver::new(&schemes);
        let tables = ["rat-loot".to_string()];
        let mut a = crate::random::DiceRandomSource::seeded(3);
        let mut b = crate::random::DiceRandomSource::seeded(3);

        for _ in 0..10 {
            assert_eq!(resolver.resolve(&tables, &mut a), resolver.resolve(&tables, &mut b));
        }
    }
}
