//! Change tracking and listener delivery through the public Rocket API.

use rk_core::{ComponentId, ModIdSequence};
use rk_tree::{ChangeEvent, ChangeKind, Component, Rocket, TreeError};
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<ChangeEvent>>>;

fn recorder(rocket: &mut Rocket) -> Log {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    rocket.add_component_change_listener(move |e: &ChangeEvent| sink.borrow_mut().push(*e));
    log
}

fn simple_rocket() -> (Rocket, ComponentId, ComponentId) {
    let mut rocket = Rocket::with_sequence(ModIdSequence::new());
    let stage = rocket.add_child(rocket.root(), Component::stage()).unwrap();
    rocket.add_child(stage, Component::nose_cone()).unwrap();
    let body = rocket.add_child(stage, Component::body_tube()).unwrap();
    (rocket, stage, body)
}

#[test]
fn setter_fires_once_with_its_category() {
    let (mut rocket, _, body) = simple_rocket();
    let log = recorder(&mut rocket);

    assert!(rocket.modify(body, |c| c.set_length(0.4)).unwrap());
    let events = log.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].source, body);
    assert_eq!(events[0].kind, ChangeKind::BOTH);
}

#[test]
fn equal_value_is_a_no_op() {
    let (mut rocket, _, body) = simple_rocket();
    let log = recorder(&mut rocket);
    let before = rocket.mod_ids();

    let len = rocket.component(body).unwrap().length();
    assert!(!rocket.modify(body, |c| c.set_length(len * (1.0 + 1e-10))).unwrap());
    assert!(!rocket
        .modify(body, |c| c.body_mut().and_then(|b| b.set_thickness(0.002)))
        .unwrap());

    assert!(log.borrow().is_empty());
    assert_eq!(rocket.mod_ids(), before);
}

#[test]
fn repeated_out_of_range_thickness_fires_once() {
    let (mut rocket, _, body) = simple_rocket();
    let lug = rocket.add_child(body, Component::launch_lug()).unwrap();
    let log = recorder(&mut rocket);

    for _ in 0..2 {
        rocket
            .modify(body, |c| c.body_mut().and_then(|b| b.set_thickness(1.0)))
            .unwrap();
        rocket
            .modify(lug, |c| c.launch_lug_mut().and_then(|l| l.set_thickness(1.0)))
            .unwrap();
    }
    assert_eq!(log.borrow().len(), 2);

    let ids = rocket.mod_ids();
    rocket.component(body).unwrap().mass();
    assert!(!rocket
        .modify(body, |c| c.body_mut().and_then(|b| b.set_thickness(5.0)))
        .unwrap());
    assert_eq!(rocket.mod_ids(), ids);
    assert!(rocket.component(body).unwrap().has_cached_properties());
    assert_eq!(
        rocket.component(lug).unwrap().as_launch_lug().unwrap().inner_radius(),
        0.0
    );
}

#[test]
fn counters_move_by_category() {
    let (mut rocket, _, body) = simple_rocket();
    let start = rocket.mod_ids();

    rocket.modify(body, |c| c.set_name("Main tube")).unwrap();
    let named = rocket.mod_ids();
    assert!(named.overall > start.overall);
    assert_eq!(named.functional, start.functional);
    assert_eq!(named.mass, start.mass);

    rocket
        .modify(body, |c| c.body_mut().and_then(|b| b.set_density(1200.0)))
        .unwrap();
    let dense = rocket.mod_ids();
    assert!(dense.mass > named.mass);
    assert_eq!(dense.aerodynamic, named.aerodynamic);
    assert!(dense.functional > named.functional);

    rocket.set_perfect_finish(true);
    let smooth = rocket.mod_ids();
    assert!(smooth.aerodynamic > dense.aerodynamic);
    assert_eq!(smooth.mass, dense.mass);
    assert_eq!(smooth.tree, start.tree);
}

#[test]
fn structural_edits_carry_tree_and_physics() {
    let (mut rocket, _, body) = simple_rocket();
    let log = recorder(&mut rocket);
    let before = rocket.tree_modification_id();

    let lug = rocket.add_child(body, Component::launch_lug()).unwrap();
    assert!(rocket.tree_modification_id() > before);
    assert_eq!(log.borrow()[0].source, lug);
    assert_eq!(log.borrow()[0].kind, ChangeKind::TREE | ChangeKind::BOTH);

    rocket.remove_child(lug).unwrap();
    assert_eq!(log.borrow()[1].source, body);
    assert!(rocket.component(lug).is_err());

    // Empty stage: no mass, no aerodynamics.
    let booster = rocket.add_child(rocket.root(), Component::stage()).unwrap();
    assert_eq!(log.borrow()[2].kind, ChangeKind::TREE);
    rocket.remove_child(booster).unwrap();
    assert_eq!(log.borrow()[3].kind, ChangeKind::TREE);

    assert_eq!(rocket.remove_child(rocket.root()), Err(TreeError::RootRemoval));
}

#[test]
fn incompatible_attachment_is_refused_up_front() {
    let (mut rocket, stage, body) = simple_rocket();
    assert!(!rocket.is_compatible(rocket.root(), rk_tree::ComponentType::BodyTube));
    assert!(rocket.is_compatible(body, rk_tree::ComponentType::LaunchLug));
    assert!(!rocket.is_compatible(stage, rk_tree::ComponentType::LaunchLug));

    let before = rocket.mod_ids();
    let err = rocket.add_child(stage, Component::launch_lug()).unwrap_err();
    assert!(matches!(err, TreeError::Incompatible { .. }));
    assert_eq!(rocket.mod_ids(), before);
}

#[test]
fn listeners_run_newest_first_on_both_channels() {
    let (mut rocket, _, body) = simple_rocket();
    let order = Rc::new(RefCell::new(Vec::new()));
    for (name, state) in [("first", false), ("second", true), ("third", false)] {
        let order = Rc::clone(&order);
        let push = move |_: &ChangeEvent| order.borrow_mut().push(name);
        if state {
            rocket.add_state_change_listener(push);
        } else {
            rocket.add_component_change_listener(push);
        }
    }
    rocket.modify(body, |c| c.set_length(0.25)).unwrap();
    assert_eq!(*order.borrow(), vec!["third", "second", "first"]);
}

#[test]
fn removed_listener_hears_nothing() {
    let (mut rocket, _, body) = simple_rocket();
    let hits = Rc::new(RefCell::new(0));
    let h = Rc::clone(&hits);
    let id = rocket.add_state_change_listener(move |_: &ChangeEvent| *h.borrow_mut() += 1);
    rocket.modify(body, |c| c.set_length(0.25)).unwrap();
    assert!(rocket.remove_listener(id));
    rocket.modify(body, |c| c.set_length(0.35)).unwrap();
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn freeze_thaw_coalesces() {
    let (mut rocket, stage, body) = simple_rocket();
    let log = recorder(&mut rocket);
    let nose = rocket.tree().children(stage).unwrap()[0];

    rocket.freeze();
    rocket.freeze();
    rocket.modify(body, |c| c.set_name("Tube")).unwrap();
    rocket
        .modify(nose, |c| c.body_mut().and_then(|b| b.set_density(900.0)))
        .unwrap();
    rocket.modify(body, |c| c.set_relative_position(rk_tree::RelativePosition::Top)).unwrap();
    assert!(log.borrow().is_empty());

    rocket.thaw();
    let events = log.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].source, body);
    assert_eq!(
        events[0].kind,
        ChangeKind::NONFUNCTIONAL | ChangeKind::MASS | ChangeKind::AERODYNAMIC
    );
    assert!(!rocket.is_frozen());
}

#[test]
fn empty_batch_fires_nothing() {
    let (mut rocket, _, _) = simple_rocket();
    let log = recorder(&mut rocket);
    let before = rocket.mod_ids();
    rocket.freeze();
    rocket.thaw();
    rocket.thaw();
    assert!(log.borrow().is_empty());
    assert_eq!(rocket.mod_ids(), before);
}

#[test]
fn batched_counters_match_unbatched_categories() {
    let (mut plain, _, plain_body) = simple_rocket();
    let (mut batched, _, batched_body) = simple_rocket();
    let p0 = plain.mod_ids();
    let b0 = batched.mod_ids();

    plain.modify(plain_body, |c| c.set_name("x")).unwrap();
    plain
        .modify(plain_body, |c| c.body_mut().and_then(|b| b.set_filled(true)))
        .unwrap();

    batched.batch(|r| {
        r.modify(batched_body, |c| c.set_name("x")).unwrap();
        r.modify(batched_body, |c| c.body_mut().and_then(|b| b.set_filled(true)))
            .unwrap();
    });

    let (p1, b1) = (plain.mod_ids(), batched.mod_ids());
    assert_eq!(p1.mass > p0.mass, b1.mass > b0.mass);
    assert_eq!(p1.aerodynamic > p0.aerodynamic, b1.aerodynamic > b0.aerodynamic);
    assert_eq!(p1.tree > p0.tree, b1.tree > b0.tree);
    assert_eq!(p1.functional > p0.functional, b1.functional > b0.functional);
    assert_eq!(
        batched.component(batched_body).unwrap().mass(),
        plain.component(plain_body).unwrap().mass()
    );
}

#[test]
fn freeze_guard_thaws_on_drop() {
    let (mut rocket, _, body) = simple_rocket();
    let log = recorder(&mut rocket);
    {
        let mut guard = rocket.frozen();
        assert!(guard.is_frozen());
        guard.modify(body, |c| c.set_length(0.45)).unwrap();
    }
    assert!(!rocket.is_frozen());
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn only_physical_changes_drop_cached_properties() {
    let (mut rocket, _, body) = simple_rocket();
    let mass = rocket.component(body).unwrap().mass();
    assert!(rocket.component(body).unwrap().has_cached_properties());

    rocket.modify(body, |c| c.set_name("Renamed")).unwrap();
    rocket.set_designer("A. Builder");
    assert!(rocket.component(body).unwrap().has_cached_properties());

    rocket
        .modify(body, |c| c.body_mut().and_then(|b| b.set_thickness(0.001)))
        .unwrap();
    assert!(!rocket.component(body).unwrap().has_cached_properties());
    assert!(rocket.component(body).unwrap().mass() < mass);
}

#[test]
fn design_settings_fire_selectively() {
    let (mut rocket, _, _) = simple_rocket();
    let log = recorder(&mut rocket);

    rocket.set_designer("Jo");
    rocket.set_designer("Jo");
    rocket.set_revision("r2");
    assert_eq!(log.borrow().len(), 2);

    // Not custom yet: stored silently.
    rocket.set_custom_reference_length(0.0);
    assert_eq!(rocket.settings().custom_reference_length, 0.001);
    assert_eq!(log.borrow().len(), 2);

    rocket.set_reference_type(rk_tree::ReferenceType::Custom);
    rocket.set_custom_reference_length(0.05);
    assert_eq!(log.borrow().len(), 4);
    assert!(log.borrow().iter().all(|e| e.kind == ChangeKind::NONFUNCTIONAL));
}

#[test]
fn undo_restores_ids_and_state() {
    let (mut rocket, _, body) = simple_rocket();
    let log = recorder(&mut rocket);
    let snapshot = rocket.snapshot();
    let saved = snapshot.mod_ids();
    let saved_mass = rocket.component(body).unwrap().mass();

    rocket.modify(body, |c| c.set_length(0.6)).unwrap();
    let lug = rocket.add_child(body, Component::launch_lug()).unwrap();
    let edited = rocket.mod_ids();

    rocket.restore(snapshot);
    assert_eq!(rocket.mod_ids(), saved);
    assert!(rocket.component(lug).is_err());
    assert!((rocket.component(body).unwrap().mass() - saved_mass).abs() < 1e-12);

    let last = *log.borrow().last().unwrap();
    assert!(last.kind.is_undo_change());
    assert!(last.kind.contains(ChangeKind::NONFUNCTIONAL | ChangeKind::BOTH | ChangeKind::TREE));

    // New edits never reuse IDs handed out before the restore.
    rocket.modify(body, |c| c.set_length(0.7)).unwrap();
    assert!(rocket.modification_id() > edited.max());
}

#[test]
fn restore_flags_only_categories_that_differ() {
    let (mut rocket, _, body) = simple_rocket();
    let snapshot = rocket.snapshot();
    rocket.modify(body, |c| c.set_name("Other")).unwrap();

    let log = recorder(&mut rocket);
    rocket.restore(snapshot);
    assert_eq!(
        log.borrow()[0].kind,
        ChangeKind::UNDO | ChangeKind::NONFUNCTIONAL
    );
    assert_eq!(rocket.component(body).unwrap().name(), "Body tube");
}
