use crystal_defence_core::{
    Command, DefenderId, DefenderKind, EffectShape, Event, HostileId, HostileKind,
    HostileSnapshot, ProjectileTarget, SimulationConfig, Vec2,
};
use crystal_defence_world::{self as world, query, World};

/// Builds a world rich enough to buy its way up to the black hole tier.
fn unlocked_world() -> World {
    let mut world = World::with_config(&SimulationConfig {
        starting_gold: 10_000_000,
        ..SimulationConfig::default()
    });
    while query::crystal(&world).level < DefenderKind::BlackHole.stats().unlock_level {
        let mut events = Vec::new();
        world::apply(&mut world, Command::PurchaseExperience, &mut events);
        assert!(
            matches!(events.first(), Some(Event::ExperiencePurchased { .. })),
            "purchase rejected: {events:?}"
        );
    }
    world
}

fn spawn(world: &mut World, kind: HostileKind, x: f32, y: f32) -> HostileId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnHostile {
            kind,
            position: Vec2::new(x, y),
            wave: 1,
            bounty: None,
        },
        &mut events,
    );
    match events.as_slice() {
        [Event::HostileSpawned { hostile, .. }] => *hostile,
        other => panic!("unexpected events {other:?}"),
    }
}

fn place(world: &mut World, kind: DefenderKind, x: f32, y: f32) -> DefenderId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::PlaceDefender {
            variant: kind.variant_id(),
            position: Vec2::new(x, y),
        },
        &mut events,
    );
    match events.as_slice() {
        [Event::DefenderPlaced { defender, .. }] => *defender,
        other => panic!("unexpected events {other:?}"),
    }
}

fn sell_at(world: &mut World, x: f32, y: f32) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SelectAt {
            position: Vec2::new(x, y),
        },
        &mut events,
    );
    world::apply(world, Command::SellSelected, &mut events);
    assert!(
        events
            .iter()
            .any(|event| matches!(event, Event::DefenderSold { .. })),
        "sale rejected: {events:?}"
    );
}

fn update(world: &mut World, dt: f32) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::UpdateEntities { dt }, &mut events);
    events
}

fn hostile(world: &World, id: HostileId) -> HostileSnapshot {
    query::hostile_view(world)
        .into_vec()
        .into_iter()
        .find(|hostile| hostile.id == id)
        .unwrap_or_else(|| panic!("hostile {id:?} missing"))
}

fn defender_health(world: &World, id: DefenderId) -> f32 {
    query::defender_view(world)
        .iter()
        .find(|defender| defender.id == id)
        .map(|defender| defender.health)
        .unwrap_or_else(|| panic!("defender {id:?} missing"))
}

fn count_effects(world: &World, predicate: impl Fn(&EffectShape) -> bool) -> usize {
    query::effects(world)
        .iter()
        .filter(|effect| predicate(&effect.shape))
        .count()
}

#[test]
fn tesla_chain_hits_four_distinct_hostiles() {
    let mut world = unlocked_world();
    let _ = place(&mut world, DefenderKind::Tesla, 300.0, 0.0);
    let chain: Vec<HostileId> = [400.0, 450.0, 500.0, 550.0, 600.0]
        .into_iter()
        .map(|x| spawn(&mut world, HostileKind::Grunt, x, 0.0))
        .collect();

    let _ = update(&mut world, 0.0);

    for id in &chain[..4] {
        assert_eq!(hostile(&world, *id).health, 10.0);
    }
    assert_eq!(hostile(&world, chain[4]).health, 35.0);
    assert_eq!(
        count_effects(&world, |shape| matches!(shape, EffectShape::Lightning { .. })),
        4
    );
}

#[test]
fn laser_damages_everything_along_the_beam() {
    let mut world = unlocked_world();
    let _ = place(&mut world, DefenderKind::Laser, 300.0, 0.0);
    let target = spawn(&mut world, HostileKind::Grunt, 400.0, 0.0);
    let behind = spawn(&mut world, HostileKind::Armored, 600.0, 10.0);
    let aside = spawn(&mut world, HostileKind::Grunt, 500.0, 40.0);

    let _ = update(&mut world, 0.0);

    assert!(hostile(&world, target).health <= 0.0);
    assert_eq!(hostile(&world, behind).health, 30.0);
    assert_eq!(hostile(&world, aside).health, 35.0);
    let beam_end = query::effects(&world)
        .iter()
        .find_map(|effect| match effect.shape {
            EffectShape::Beam { to, .. } => Some(to),
            _ => None,
        })
        .expect("beam effect");
    assert!(beam_end.distance(Vec2::new(700.0, 0.0)) < 1e-3);
}

#[test]
fn black_hole_damages_and_pulls_toward_impact() {
    let mut world = unlocked_world();
    let _ = place(&mut world, DefenderKind::BlackHole, 300.0, 0.0);
    let target = spawn(&mut world, HostileKind::Grunt, 400.0, 0.0);
    let pulled = spawn(&mut world, HostileKind::Armored, 400.0, 100.0);
    let distant = spawn(&mut world, HostileKind::Grunt, 400.0, 200.0);

    let _ = update(&mut world, 0.0);

    assert_eq!(hostile(&world, target).health, -25.0);
    assert_eq!(hostile(&world, target).position, Vec2::new(400.0, 0.0));

    let pulled = hostile(&world, pulled);
    assert_eq!(pulled.health, 40.0);
    assert!(pulled.position.distance(Vec2::new(400.0, 0.0)) < 1e-3);

    let distant = hostile(&world, distant);
    assert_eq!(distant.health, 35.0);
    assert_eq!(distant.position, Vec2::new(400.0, 200.0));
    assert_eq!(
        count_effects(&world, |shape| matches!(shape, EffectShape::BlackHole { .. })),
        1
    );
}

#[test]
fn splitter_death_releases_two_weakened_grunts() {
    let mut world = unlocked_world();
    let _ = place(&mut world, DefenderKind::Laser, 300.0, 0.0);
    let splitter = spawn(&mut world, HostileKind::Splitter, 400.0, 0.0);

    let _ = update(&mut world, 0.0);
    let events = update(&mut world, 0.0);

    assert!(events.iter().any(|event| matches!(
        event,
        Event::HostileKilled { hostile, kind: HostileKind::Splitter, .. } if *hostile == splitter
    )));
    let spawned = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::HostileSpawned {
                    kind: HostileKind::Grunt,
                    ..
                }
            )
        })
        .count();
    assert_eq!(spawned, 2);

    let offspring = query::hostile_view(&world).into_vec();
    assert_eq!(offspring.len(), 2);
    let expected = HostileKind::Splitter.max_health(1) * 3.0 / 10.0;
    let mut positions = Vec::new();
    for child in &offspring {
        assert_eq!(child.kind, HostileKind::Grunt);
        assert!((child.health - expected).abs() < 1e-4);
        assert_eq!(child.health, child.max_health);
        assert_eq!(child.radius, 8.0);
        positions.push(child.position);
    }
    assert!(positions.contains(&Vec2::new(390.0, -10.0)));
    assert!(positions.contains(&Vec2::new(410.0, 10.0)));
}

#[test]
fn exploder_splash_cascades_within_one_tick() {
    let mut world = unlocked_world();
    let _ = place(&mut world, DefenderKind::Laser, 400.0, 0.0);
    let exploder = spawn(&mut world, HostileKind::Exploder, 500.0, 0.0);
    let bystander = spawn(&mut world, HostileKind::Grunt, 520.0, 60.0);
    let survivor = spawn(&mut world, HostileKind::Armored, 500.0, -80.0);
    let gold = query::session(&world).gold;

    let _ = update(&mut world, 0.0);
    let events = update(&mut world, 0.0);

    let killed: Vec<HostileId> = events
        .iter()
        .filter_map(|event| match event {
            Event::HostileKilled { hostile, .. } => Some(*hostile),
            _ => None,
        })
        .collect();
    assert_eq!(killed, vec![exploder, bystander]);

    let remaining = query::hostile_view(&world).into_vec();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, survivor);
    assert_eq!(remaining[0].health, 45.0);
    assert_eq!(query::session(&world).gold, gold + 20);
}

#[test]
fn armored_hostiles_halve_projectile_damage() {
    let mut world = unlocked_world();
    let _ = place(&mut world, DefenderKind::Basic, 300.0, 0.0);
    let armored = spawn(&mut world, HostileKind::Armored, 400.0, 0.0);

    let mut health = hostile(&world, armored).health;
    for _ in 0..20 {
        let _ = update(&mut world, 0.0625);
        health = hostile(&world, armored).health;
        if health < 70.0 {
            break;
        }
    }

    assert_eq!(health, 55.0);
}

#[test]
fn flame_hits_ignite_for_three_seconds() {
    let mut world = unlocked_world();
    let _ = place(&mut world, DefenderKind::Flame, 300.0, 0.0);
    let armored = spawn(&mut world, HostileKind::Armored, 400.0, 0.0);

    for _ in 0..20 {
        let _ = update(&mut world, 0.0625);
        if hostile(&world, armored).burn_remaining > 0.0 {
            break;
        }
    }
    let ignited = hostile(&world, armored);
    assert_eq!(ignited.burn_remaining, 3.0);
    assert_eq!(ignited.health, 50.0);
    sell_at(&mut world, 300.0, 0.0);
    assert!(query::projectiles(&world).is_empty());

    let _ = update(&mut world, 0.5);
    let burning = hostile(&world, armored);
    assert_eq!(burning.health, 45.0);
    assert_eq!(burning.burn_remaining, 2.5);

    for _ in 0..6 {
        let _ = update(&mut world, 0.5);
    }
    let extinguished = hostile(&world, armored);
    assert_eq!(extinguished.health, 20.0);
    assert_eq!(extinguished.burn_remaining, 0.0);
}

#[test]
fn medic_heals_neighbours_without_exceeding_maximum() {
    let mut world = unlocked_world();
    let _ = place(&mut world, DefenderKind::Laser, 300.0, 0.0);
    let patient = spawn(&mut world, HostileKind::Armored, 400.0, 0.0);
    let medic = spawn(&mut world, HostileKind::Healer, 420.0, 100.0);

    let _ = update(&mut world, 0.0);
    assert_eq!(hostile(&world, patient).health, 30.0);
    sell_at(&mut world, 300.0, 0.0);

    for _ in 0..6 {
        let _ = update(&mut world, 0.5);
    }
    assert_eq!(hostile(&world, patient).health, 30.0);

    let _ = update(&mut world, 0.5);
    assert_eq!(hostile(&world, patient).health, 50.0);
    let medic = hostile(&world, medic);
    assert_eq!(medic.health, medic.max_health);
}

#[test]
fn ground_units_are_blocked_by_defenders() {
    let mut world = unlocked_world();
    let blocker = place(&mut world, DefenderKind::Healer, 300.0, 0.0);
    let grunt = spawn(&mut world, HostileKind::Grunt, 320.0, 0.0);
    let flyer = spawn(&mut world, HostileKind::Flying, 320.0, 5.0);

    let _ = update(&mut world, 0.5);

    let nudged = hostile(&world, grunt).position;
    assert!(nudged.distance(Vec2::new(321.0, 0.0)) < 1e-4, "nudged to {nudged}");
    assert_eq!(defender_health(&world, blocker), 197.5);
    assert!(hostile(&world, flyer).position.x < 285.0);
}

#[test]
fn exploder_contact_destroys_selected_defender() {
    let mut world = unlocked_world();
    let victim = place(&mut world, DefenderKind::Basic, 300.0, 0.0);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SelectAt {
            position: Vec2::new(300.0, 0.0),
        },
        &mut events,
    );
    assert_eq!(query::session(&world).selected, Some(victim));
    let _ = spawn(&mut world, HostileKind::Exploder, 350.0, 0.0);

    let events = update(&mut world, 0.0);

    assert!(events.contains(&Event::DefenderDestroyed {
        defender: victim,
        kind: DefenderKind::Basic
    }));
    assert!(query::defender_view(&world).is_empty());
    assert_eq!(query::session(&world).selected, None);
    assert!(query::hostile_view(&world).is_empty());
}

#[test]
fn healer_tower_repairs_damaged_neighbour() {
    let mut world = unlocked_world();
    let patient = place(&mut world, DefenderKind::BlackHole, 300.0, 0.0);
    let _ = place(&mut world, DefenderKind::Healer, 300.0, 120.0);
    let _ = spawn(&mut world, HostileKind::Exploder, 350.0, 0.0);

    let _ = update(&mut world, 0.0);
    assert_eq!(defender_health(&world, patient), 65.0);
    assert_eq!(
        count_effects(&world, |shape| matches!(shape, EffectShape::Line { .. })),
        1
    );

    let _ = update(&mut world, 0.5);
    let _ = update(&mut world, 0.5);
    assert_eq!(defender_health(&world, patient), 65.0);

    let _ = update(&mut world, 0.5);
    assert_eq!(defender_health(&world, patient), 80.0);
}

#[test]
fn money_tower_pays_three_gold_per_second() {
    let mut world = unlocked_world();
    let _ = place(&mut world, DefenderKind::Money, 300.0, 0.0);
    let gold = query::session(&world).gold;

    let _ = update(&mut world, 0.5);
    assert_eq!(query::session(&world).gold, gold);

    let _ = update(&mut world, 0.5);
    assert_eq!(query::session(&world).gold, gold + 3);

    for _ in 0..2 {
        let _ = update(&mut world, 0.5);
    }
    assert_eq!(query::session(&world).gold, gold + 6);
    assert!(query::effects(&world).iter().any(|effect| matches!(
        &effect.shape,
        EffectShape::Text { label, .. } if label == "+$3"
    )));
}

#[test]
fn bosses_shoot_the_nearest_defender() {
    let mut world = unlocked_world();
    let target = place(&mut world, DefenderKind::Healer, 300.0, 0.0);
    let _ = place(&mut world, DefenderKind::Healer, 100.0, 200.0);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnHostile {
            kind: HostileKind::Boss,
            position: Vec2::new(500.0, 0.0),
            wave: 5,
            bounty: None,
        },
        &mut events,
    );

    let _ = update(&mut world, 0.0625);
    let shots = query::projectiles(&world);
    assert_eq!(shots.len(), 1);
    assert_eq!(shots[0].target, ProjectileTarget::Defender(target));

    for _ in 0..29 {
        let _ = update(&mut world, 0.0625);
    }
    assert!(query::projectiles(&world).is_empty());
    assert_eq!(defender_health(&world, target), 180.0);
}

#[test]
fn defenders_killed_by_boss_shots_leave_the_roster_that_tick() {
    let mut world = unlocked_world();
    let doomed = place(&mut world, DefenderKind::Basic, 300.0, 0.0);
    let mut events = Vec::new();
    for _ in 0..5 {
        world::apply(
            &mut world,
            Command::SpawnHostile {
                kind: HostileKind::Boss,
                position: Vec2::new(500.0, 0.0),
                wave: 5,
                bounty: None,
            },
            &mut events,
        );
    }

    let mut destroyed = false;
    for _ in 0..40 {
        let events = update(&mut world, 0.0625);
        for defender in query::defender_view(&world).iter() {
            assert!(defender.health > 0.0, "dead defender listed: {defender:?}");
        }
        if events.contains(&Event::DefenderDestroyed {
            defender: doomed,
            kind: DefenderKind::Basic,
        }) {
            destroyed = true;
            break;
        }
    }
    assert!(destroyed, "five boss shots should destroy a basic tower");
    assert!(query::defender_view(&world).is_empty());

    let _ = place(&mut world, DefenderKind::Basic, 300.0, 0.0);
    assert_eq!(query::defender_view(&world).len(), 1);
}

#[test]
fn money_tower_fires_on_its_income_tick() {
    let mut world = unlocked_world();
    let _ = place(&mut world, DefenderKind::Money, 300.0, 0.0);
    let gold = query::session(&world).gold;
    let _ = update(&mut world, 0.5);
    let _ = update(&mut world, 0.4375);
    assert_eq!(query::session(&world).gold, gold);
    assert!(query::projectiles(&world).is_empty());

    let target = spawn(&mut world, HostileKind::Armored, 380.0, 0.0);
    let _ = update(&mut world, 0.0625);

    assert_eq!(query::session(&world).gold, gold + 3);
    let shots = query::projectiles(&world);
    assert_eq!(shots.len(), 1);
    assert_eq!(shots[0].target, ProjectileTarget::Hostile(target));
}
