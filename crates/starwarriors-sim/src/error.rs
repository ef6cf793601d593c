//! Per-entity simulation faults.
//!
//! Systems return these from single-entity updates. The system loop logs the
//! fault and removes only the offending entity; the tick always continues.

use std::fmt;

use hecs::Entity;

#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A required component is absent from the entity.
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },
    /// Position or velocity became NaN or infinite.
    NonFiniteState { entity: Entity, detail: &'static str },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::MissingComponent { entity, component } => {
                write!(f, "entity {entity:?} is missing component {component}")
            }
            SimError::NonFiniteState { entity, detail } => {
                write!(f, "entity {entity:?} has non-finite {detail}")
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Read a copy of a component, mapping absence to `SimError::MissingComponent`.
pub(crate) fn read<T>(world: &hecs::World, entity: Entity, component: &'static str) -> Result<T, SimError>
where
    T: hecs::Component + Clone,
{
    world
        .get::<&T>(entity)
        .map(|c| (*c).clone())
        .map_err(|_| SimError::MissingComponent { entity, component })
}

/// Overwrite a component in place.
pub(crate) fn write<T>(
    world: &mut hecs::World,
    entity: Entity,
    component: &'static str,
    value: T,
) -> Result<(), SimError>
where
    T: hecs::Component,
{
    let mut slot = world
        .get::<&mut T>(entity)
        .map_err(|_| SimError::MissingComponent { entity, component })?;
    *slot = value;
    Ok(())
}
