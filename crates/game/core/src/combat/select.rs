use super::act::TacticalAct;
use crate::inventory::InventoryModule;

/// True if the act has no resource constraint or the inventory covers it.
pub fn constraints_satisfied(act: &TacticalAct, inventory: Option<&InventoryModule>) -> bool {
    match act.constraints() {
        None => true,
        Some(constraints) => inventory.is_some_and(|inventory| {
            inventory.has_resource(&constraints.prop_resource_type, constraints.prop_resource_count)
        }),
    }
}

/// Picks the act with the highest expected efficiency among usable acts.
///
/// Acts whose resource constraints the inventory cannot cover are skipped;
/// ties go to the earliest act. When every act is unusable the first act is
/// returned anyway, and using it fails later at resource consumption.
pub fn select_best_act<'a>(acts: &'a [TacticalAct], inventory: Option<&InventoryModule>) -> Option<&'a TacticalAct> {
    let mut best: Option<&TacticalAct> = None;
    for act in acts.iter().filter(|act| constraints_satisfied(act, inventory)) {
        let better = best.is_none_or(|current| {
            act.efficient.doubled_expectation() > current.efficient.doubled_expectation()
        });
        if better {
            best = Some(act);
        }
    }
    best.or_else(|| acts.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{TacticalActScheme, TacticalActStats};
    use crate::inventory::{Prop, Resource};
    use crate::random::Roll;

    fn act(sid: &str, efficient: Roll) -> TacticalAct {
        TacticalAct::new(TacticalActScheme::new(sid, TacticalActStats::melee_damage(efficient)), None)
    }

    fn acts() -> Vec<TacticalAct> {
        let default = act("default", Roll::new(3, 1));
        let mut required = act("resource-required", Roll::new(3, 3));
        required.scheme = required.scheme.with_constraints("resource", 1);
        vec![default, required]
    }

    #[test]
    fn unmet_constraint_falls_back_to_default_with_empty_inventory() {
        let acts = acts();
        let inventory = InventoryModule::new();

        let best = select_best_act(&acts, Some(&inventory)).unwrap();

        assert_eq!(best.sid(), "default");
    }

    #[test]
    fn unmet_constraint_falls_back_to_default_without_inventory() {
        let acts = acts();
        assert_eq!(select_best_act(&acts, None).unwrap().sid(), "default");
    }

    #[test]
    fn met_constraint_picks_stronger_act() {
        let acts = acts();
        let mut inventory = InventoryModule::new();
        inventory.add(Prop::Resource(Resource {
            sid: "bolt".into(),
            resource_type: Some("resource".into()),
            usage: None,
            count: 1,
        }));

        assert_eq!(select_best_act(&acts, Some(&inventory)).unwrap().sid(), "resource-required");
    }

    #[test]
    fn ties_go_to_first_declared() {
        let acts = vec![act("first", Roll::new(6, 1)), act("second", Roll::new(6, 1))];
        assert_eq!(select_best_act(&acts, None).unwrap().sid(), "first");
    }

    #[test]
    fn all_constrained_and_unmet_returns_first_declared() {
        let mut first = act("crossbow", Roll::new(6, 2));
        first.scheme = first.scheme.with_constraints("bolt", 1);
        let mut second = act("bow", Roll::new(6, 3));
        second.scheme = second.scheme.with_constraints("arrow", 1);
        let acts = vec![first, second];

        assert_eq!(select_best_act(&acts, None).unwrap().sid(), "crossbow");
    }

    #[test]
    fn no_acts_selects_nothing() {
        assert!(select_best_act(&[], None).is_none());
    }
}
