//! World integration tests against the embedded ability catalog.

use std::sync::Arc;
use std::thread;

use rules_content::Content;
use rules_core::{
    CastError, CastEvent, CastRequest, Debuff, Entity, EntityId, EntityType, GameError, Position,
    ProcedureOutcome, Resources,
};
use rules_runtime::{Event, Topic, TurnEvent, World};

const HERO: EntityId = EntityId(1);
const TARGET: EntityId = EntityId(10);

fn world() -> World {
    rules_runtime::logging::init_for_tests();
    World::from_content(Content::embedded().unwrap())
}

fn monster(id: u32, x: i32, y: i32) -> Entity {
    Entity::new(
        EntityId(id),
        EntityType::Monster,
        Resources::new(4, 4, 20, 4),
        Position::new(x, y),
    )
}

fn hero(x: i32, y: i32) -> Entity {
    Entity::new(
        HERO,
        EntityType::Player,
        Resources::new(4, 4, 10, 20),
        Position::new(x, y),
    )
}

#[test]
fn concurrent_casts_on_one_target_all_land() {
    let world = Arc::new(world());
    world.spawn(monster(TARGET.0, 0, 0)).unwrap();

    // Every neighbour of the target bites it twice (two ticks per bite).
    let neighbours = [
        (-1, -1),
        (0, -1),
        (1, -1),
        (-1, 0),
        (1, 0),
        (-1, 1),
        (0, 1),
        (1, 1),
    ];
    for (offset, (x, y)) in neighbours.iter().enumerate() {
        world.spawn(monster(20 + offset as u32, *x, *y)).unwrap();
    }
    world.begin_turn().unwrap();

    let workers: Vec<_> = (0..neighbours.len() as u32)
        .map(|offset| {
            let world = Arc::clone(&world);
            thread::spawn(move || {
                let caster = EntityId(20 + offset);
                for _ in 0..2 {
                    let request = CastRequest::new("bite", caster).on(TARGET).ignoring_cost();
                    world.cast(&request).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(world.entity(TARGET).unwrap().resources.hp, 4);
    for offset in 0..neighbours.len() as u32 {
        assert_eq!(world.remaining_ticks(EntityId(20 + offset)).unwrap(), 0);
    }
}

#[test]
fn one_caster_racing_itself_is_bounded_by_its_budget() {
    let world = Arc::new(world());
    world.spawn(monster(2, 0, 0)).unwrap();
    world.spawn(monster(TARGET.0, 1, 0)).unwrap();
    world.begin_turn().unwrap();

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let world = Arc::clone(&world);
            thread::spawn(move || {
                let request = CastRequest::new("bite", EntityId(2)).on(TARGET).ignoring_cost();
                world.cast(&request)
            })
        })
        .collect();
    let outcomes: Vec<_> = workers
        .into_iter()
        .map(|worker| worker.join().unwrap())
        .collect();

    let landed = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let interrupted = outcomes
        .iter()
        .filter(|outcome| {
            matches!(
                outcome.as_ref().err().and_then(|error| error.as_cast()),
                Some(CastError::OutOfTime { .. })
            )
        })
        .count();

    assert_eq!(landed, 2);
    assert_eq!(interrupted, 2);
    assert_eq!(world.entity(TARGET).unwrap().resources.hp, 18);
}

#[test]
fn new_turn_restores_budgets() {
    let world = world();
    world.spawn(monster(2, 0, 0)).unwrap();
    world.spawn(monster(TARGET.0, 1, 0)).unwrap();

    let bite = CastRequest::new("bite", EntityId(2)).on(TARGET).ignoring_cost();
    world.cast(&bite).unwrap();
    world.cast(&bite).unwrap();

    let err = world.cast(&bite).unwrap_err();
    assert_eq!(err.error_code(), "CAST_OUT_OF_TIME");
    let partial = err.as_cast().and_then(CastError::partial).unwrap();
    assert_eq!(partial.procedures, vec![ProcedureOutcome::Interrupted { step: 0 }]);
    assert_eq!(world.entity(TARGET).unwrap().resources.hp, 16);

    assert_eq!(world.begin_turn().unwrap(), 1);
    assert_eq!(world.remaining_ticks(EntityId(2)).unwrap(), 4);
    world.cast(&bite).unwrap();
    assert_eq!(world.entity(TARGET).unwrap().resources.hp, 15);
}

#[test]
fn teleport_moves_caster_onto_target() {
    let world = world();
    world.spawn(hero(0, 0)).unwrap();
    world.spawn(monster(TARGET.0, 40, -7)).unwrap();

    let result = world
        .cast(&CastRequest::new("teleport", HERO).on(TARGET))
        .unwrap();

    assert!(result.is_complete());
    assert!(result.cost_charged);
    let hero = world.entity(HERO).unwrap();
    assert_eq!(hero.location, Position::new(40, -7));
    assert_eq!(hero.resources.ap, 0);
    assert_eq!(hero.resources.mp, 0);
    assert_eq!(world.entity(TARGET).unwrap().location, Position::new(40, -7));
}

#[test]
fn breath_fire_reaches_neighbours_of_the_target() {
    let world = world();
    world.spawn(hero(0, 0)).unwrap();
    world.spawn(monster(TARGET.0, 1, 0)).unwrap();
    let mut wet = monster(11, 2, 0);
    wet.debuffs.push(Debuff::Wet);
    world.spawn(wet).unwrap();
    world.spawn(monster(12, 6, 0)).unwrap();

    let result = world
        .cast(&CastRequest::new("breathFire", HERO).on(TARGET))
        .unwrap();

    assert_eq!(result.affected, vec![TARGET, EntityId(11)]);

    let target = world.entity(TARGET).unwrap();
    assert_eq!(target.resources.hp, 17);
    assert!(target.debuffs.contains(Debuff::Burning));

    let soaked = world.entity(EntityId(11)).unwrap();
    assert_eq!(soaked.resources.hp, 17);
    assert!(!soaked.debuffs.contains(Debuff::Burning));

    assert_eq!(world.entity(EntityId(12)).unwrap().resources.hp, 20);
}

#[test]
fn expire_debuffs_removes_selected_instances() {
    let world = world();
    world.spawn(monster(2, 0, 0)).unwrap();
    world.spawn(monster(TARGET.0, 1, 0)).unwrap();

    let paralyze = CastRequest::new("paralyze", EntityId(2)).on(TARGET).ignoring_cost();
    world.cast(&paralyze).unwrap();
    world.begin_turn().unwrap();
    world
        .cast(&CastRequest::new("blind", EntityId(2)).on(TARGET).ignoring_cost())
        .unwrap();
    world.cast(&paralyze).unwrap();

    let expired = world
        .expire_debuffs(|_, debuff| debuff == Debuff::Paralyzed)
        .unwrap();

    assert_eq!(
        expired,
        vec![(TARGET, vec![Debuff::Paralyzed, Debuff::Paralyzed])]
    );
    assert_eq!(
        world.entity(TARGET).unwrap().debuffs.list(),
        &[Debuff::Blinded]
    );
}

#[test]
fn gate_failures_leave_the_world_untouched() {
    let world = world();
    world.spawn(hero(0, 0)).unwrap();
    world.spawn(monster(TARGET.0, 3, 0)).unwrap();
    let before = world.snapshot().unwrap();

    let err = world
        .cast(&CastRequest::new("scratch", HERO).on(TARGET))
        .unwrap_err();
    assert_eq!(err.error_code(), "CAST_INVALID_TARGET");

    let err = world
        .cast(&CastRequest::new("fireball", HERO).on(TARGET))
        .unwrap_err();
    assert_eq!(err.error_code(), "CAST_NOT_FOUND");

    let err = world
        .cast(&CastRequest::new("scratch", HERO).on(EntityId(99)))
        .unwrap_err();
    assert_eq!(err.error_code(), "CAST_ENTITY_NOT_FOUND");

    assert_eq!(world.snapshot().unwrap(), before);
    assert_eq!(world.remaining_ticks(HERO).unwrap(), 4);
}

#[tokio::test]
async fn subscribers_see_casts_and_turns() {
    let world = world();
    let mut casts = world.subscribe(Topic::Cast);
    let mut turns = world.subscribe(Topic::Turn);
    world.spawn(monster(2, 0, 0)).unwrap();
    world.spawn(monster(TARGET.0, 1, 0)).unwrap();

    world.begin_turn().unwrap();
    world
        .cast(&CastRequest::new("scratch", EntityId(2)).on(TARGET))
        .unwrap();
    world
        .cast(&CastRequest::new("scratch", EntityId(2)).on(EntityId(2)))
        .unwrap_err();

    match turns.recv().await.unwrap() {
        Event::Turn(TurnEvent::Started { turn }) => assert_eq!(turn, 1),
        other => panic!("unexpected event: {other:?}"),
    }

    match casts.recv().await.unwrap() {
        Event::Cast(event) => match *event {
            CastEvent::Executed(result) => {
                assert_eq!(result.ability.as_str(), "scratch");
                assert_eq!(result.damage_dealt(TARGET), 1);
            }
            other => panic!("expected executed cast, got {other:?}"),
        },
        other => panic!("unexpected event: {other:?}"),
    }

    match casts.recv().await.unwrap() {
        Event::Cast(event) => {
            assert!(matches!(*event, CastEvent::Failed { .. }));
            assert_eq!(event.caster(), EntityId(2));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn events_serialize_to_json() {
    let event = Event::Turn(TurnEvent::DebuffsExpired {
        entity: TARGET,
        removed: vec![Debuff::Burning],
    });

    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("DebuffsExpired"));
    assert!(json.contains("Burning"));

    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(back.topic(), Topic::Turn);
}
