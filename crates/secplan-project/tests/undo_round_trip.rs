//! Property test: any sequence of edits can be fully undone back to
//! the starting state and fully redone back to the ending state.

use proptest::prelude::*;
use secplan_core::catalog::DeviceKind;
use secplan_project::{factory, Action, AppState, Placement, Project};

/// One randomized edit, resolved against whatever items exist when it
/// is dispatched.
#[derive(Debug, Clone)]
enum Edit {
    Add { kind_index: usize, page: Option<u32> },
    Nudge { pick: usize, dx: f64 },
    Delete { pick: usize },
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0..DeviceKind::all().len(), proptest::option::of(0u32..4))
            .prop_map(|(kind_index, page)| Edit::Add { kind_index, page }),
        (0..16usize, -50.0f64..50.0).prop_map(|(pick, dx)| Edit::Nudge { pick, dx }),
        (0..16usize).prop_map(|pick| Edit::Delete { pick }),
    ]
}

/// Items in a stable order so `pick` resolves deterministically.
fn nth_item(project: &Project, pick: usize) -> Option<secplan_project::ItemId> {
    let mut ids: Vec<_> = project.inventory.keys().copied().collect();
    ids.sort();
    if ids.is_empty() {
        None
    } else {
        Some(ids[pick % ids.len()])
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn undo_redo_round_trip(edits in proptest::collection::vec(edit_strategy(), 1..30)) {
        let mut state = AppState::new("prop");
        let project = state.create_project("Round Trip");
        state.apply(Action::AddFloorplan {
            project,
            name: "Plan".to_string(),
            source: None,
            page_count: 4,
        });
        let plan = state.projects[&project].floorplans[0].id;

        let initial = state.projects[&project].clone();
        let mut applied = 0usize;

        // Count exactly the edits that pushed an undo command
        for edit in &edits {
            match edit {
                Edit::Add { kind_index, page } => {
                    let mut item = factory::new_device(DeviceKind::all()[*kind_index]);
                    if let Some(page) = page {
                        item.placement = Some(Placement {
                            floorplan: plan,
                            page: *page,
                            x: 10.0,
                            y: 10.0,
                        });
                    }
                    state.apply(Action::AddItems { project, items: vec![item] });
                    applied += 1;
                }
                Edit::Nudge { pick, dx } => {
                    let Some(id) = nth_item(&state.projects[&project], *pick) else {
                        continue;
                    };
                    let previous = state.projects[&project].inventory[&id].clone();
                    let mut current = previous.clone();
                    current.width += dx.abs();
                    if let Some(p) = &mut current.placement {
                        p.x += dx;
                    }
                    state.apply(Action::UpdateItems {
                        project,
                        previous: vec![previous],
                        current: vec![current],
                    });
                    applied += 1;
                }
                Edit::Delete { pick } => {
                    let Some(id) = nth_item(&state.projects[&project], *pick) else {
                        continue;
                    };
                    state.apply(Action::DeleteItems { project, items: vec![id] });
                    applied += 1;
                }
            }
            prop_assert!(state.projects[&project].placement_consistent());
        }

        let final_state = state.projects[&project].clone();

        for _ in 0..applied {
            state.apply(Action::Undo { project });
            prop_assert!(state.projects[&project].placement_consistent());
        }
        prop_assert_eq!(&state.projects[&project].inventory, &initial.inventory);
        prop_assert_eq!(
            &state.projects[&project].floorplans[0].placed,
            &initial.floorplans[0].placed
        );

        for _ in 0..applied {
            state.apply(Action::Redo { project });
        }
        prop_assert_eq!(&state.projects[&project].inventory, &final_state.inventory);
        prop_assert_eq!(
            &state.projects[&project].floorplans[0].placed,
            &final_state.floorplans[0].placed
        );
        prop_assert!(state.projects[&project].placement_consistent());
    }
}
