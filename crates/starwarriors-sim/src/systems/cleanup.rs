//! Cleanup system: removes bodies whose `Active` flag has dropped.

use hecs::{Component, Entity, World};

use starwarriors_core::components::{Active, SpawnOrder};

/// Despawn every entity carrying role component `R` that is no longer active,
/// plus any entity already queued in `despawn_buffer` (faulted updates).
pub fn sweep<R: Component>(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for (entity, (_role, active)) in world.query_mut::<(&R, &Active)>() {
        if !active.0 {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Entities carrying role `R`, in spawn order.
pub fn ordered<R: Component>(world: &World) -> Vec<Entity> {
    let mut entities: Vec<(SpawnOrder, Entity)> = world
        .query::<(&R, &SpawnOrder)>()
        .iter()
        .map(|(entity, (_role, order))| (*order, entity))
        .collect();
    entities.sort_unstable_by_key(|(order, _)| *order);
    entities.into_iter().map(|(_, entity)| entity).collect()
}

/// Whether `entity` exists and is still flagged active.
pub fn is_active(world: &World, entity: Entity) -> bool {
    world.get::<&Active>(entity).map(|a| a.0).unwrap_or(false)
}

/// Number of entities carrying role `R`, active or awaiting removal.
pub fn count<R: Component>(world: &World) -> usize {
    world.query::<&R>().iter().count()
}
