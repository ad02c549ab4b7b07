//! Tests de propriétés du raisonnement par fermeture.
//!
//! Des ensembles de dépendances aléatoires sur un univers de six attributs.
//! Chaque propriété doit tenir pour TOUT ensemble F : axiomes de la
//! fermeture, portée de la projection, réduction des LHS, point fixe, et
//! accord entre le chase et le critère des décompositions binaires.

use proptest::prelude::*;

use normrust::core::attribute::AttrSet;
use normrust::core::chase::check_lossless_join;
use normrust::core::closure::{compute_closure, equivalent, find_transitive_fds, implies};
use normrust::core::fd::Fd;
use normrust::core::normal_form::{bcnf_violations, check_normal_form, is_bcnf, NormalForm};
use normrust::core::preservation::{check_dependency_preserving, projected_union};
use normrust::core::projection::{
    minimal_cover, minimize_lhs_for_fds, project_and_minimize, project_fds_by_closure,
};

const UNIVERSE_BITS: u64 = 0b11_1111;

fn any_set() -> impl Strategy<Value = AttrSet> {
    (0u64..=UNIVERSE_BITS).prop_map(AttrSet::from_bits)
}

fn non_empty_set() -> impl Strategy<Value = AttrSet> {
    (1u64..=UNIVERSE_BITS).prop_map(AttrSet::from_bits)
}

fn fd_strategy() -> impl Strategy<Value = Fd> {
    (non_empty_set(), non_empty_set()).prop_map(|(lhs, rhs)| Fd::new(lhs, rhs))
}

fn fd_sets() -> impl Strategy<Value = Vec<Fd>> {
    prop::collection::vec(fd_strategy(), 0..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn closure_is_reflexive(x in any_set(), fds in fd_sets()) {
        prop_assert!(compute_closure(x, &fds).is_superset(x));
    }

    #[test]
    fn closure_is_monotone(x in any_set(), extra in any_set(), fds in fd_sets()) {
        let y = x.union(extra);
        prop_assert!(compute_closure(x, &fds).is_subset(compute_closure(y, &fds)));
    }

    #[test]
    fn closure_is_idempotent(x in any_set(), fds in fd_sets()) {
        let once = compute_closure(x, &fds);
        prop_assert_eq!(compute_closure(once, &fds), once);
    }

    #[test]
    fn projection_stays_in_scope(attrs in non_empty_set(), fds in fd_sets()) {
        for p in project_fds_by_closure(attrs, &fds) {
            prop_assert!(p.lhs.is_subset(attrs));
            prop_assert!(p.rhs.is_subset(attrs));
            prop_assert!(!p.is_trivial());
            prop_assert!(implies(&fds, &p));
        }
    }

    #[test]
    fn minimized_lhs_is_sound_and_reduced(attrs in non_empty_set(), fds in fd_sets()) {
        for m in project_and_minimize(attrs, &fds) {
            prop_assert!(compute_closure(m.lhs, &fds).is_superset(m.rhs));
            for a in m.lhs.iter() {
                let mut reduced = m.lhs;
                reduced.remove(a);
                prop_assert!(!compute_closure(reduced, &fds).is_superset(m.rhs));
            }
        }
    }

    #[test]
    fn projection_reaches_fixpoint(attrs in non_empty_set(), fds in fd_sets()) {
        let once = project_and_minimize(attrs, &fds);
        prop_assert_eq!(&minimize_lhs_for_fds(&once, &fds), &once);
        prop_assert_eq!(&project_and_minimize(attrs, &once), &once);
    }

    #[test]
    fn minimal_cover_is_equivalent(fds in fd_sets()) {
        let cover = minimal_cover(&fds);
        prop_assert!(equivalent(&cover, &fds));
        for c in &cover {
            prop_assert_eq!(c.rhs.len(), 1);
        }
    }

    #[test]
    fn chained_fds_are_implied_and_non_trivial(fds in fd_sets()) {
        for d in find_transitive_fds(&fds) {
            prop_assert!(!d.is_trivial());
            prop_assert!(implies(&fds, &d));
            prop_assert!(!fds.contains(&d));
        }
    }

    #[test]
    fn bcnf_agrees_with_violations(attrs in non_empty_set(), fds in fd_sets()) {
        let bcnf = is_bcnf(attrs, &fds);
        prop_assert_eq!(bcnf, bcnf_violations(attrs, &fds).is_empty());
        prop_assert_eq!(bcnf, check_normal_form(attrs, &fds) == NormalForm::BoyceCodd);
    }

    #[test]
    fn binary_split_matches_key_criterion(x in non_empty_set(), y in non_empty_set(), fds in fd_sets()) {
        // {X, Y} est sans perte ⟺ (X ∩ Y)⁺ ⊇ X ou (X ∩ Y)⁺ ⊇ Y
        // Le chase travaille sur R = X ∪ Y, donc avec π_R(F).
        let r = x.union(y);
        let local = project_fds_by_closure(r, &fds);
        let shared = compute_closure(x.intersection(y), &fds);
        let expected = shared.is_superset(x) || shared.is_superset(y);
        prop_assert_eq!(check_lossless_join(r, &[x, y], &local), expected);
    }

    #[test]
    fn whole_relation_is_lossless_and_preserving(fds in fd_sets()) {
        let r = AttrSet::from_bits(UNIVERSE_BITS);
        prop_assert!(check_lossless_join(r, &[r], &fds));
        prop_assert!(check_dependency_preserving(&fds, &projected_union(&[r], &fds)));
    }
}
