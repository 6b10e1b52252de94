//! Fire pipeline: FirePressed → aim resolution → ShotResolved.
//!
//! Architecture:
//! - ECS: резолвит точку попадания (двухлучевой trace) и взводит окно
//!   firing_bullet для crosshair'а
//! - Engine bridge: по ShotResolved играет muzzle flash, звук, beam и
//!   impact-партиклы (fire-and-forget, ответа в симуляцию нет)

use bevy::prelude::*;

pub mod trace;

pub use trace::{
    resolve_impact, GroundPlane, OpenWorld, RayCastService, RayCaster, RayHit, TraceChannel,
    ViewRay, AIM_TRACE_RANGE,
};

use crate::components::{CameraRig, MuzzlePoint};
use crate::crosshair::CrosshairSpread;
use crate::logger;
use crate::ControllerSet;

/// Event: кнопка выстрела нажата (just_pressed edge, не autofire)
#[derive(Event, Debug, Clone)]
pub struct FirePressed {
    pub entity: Entity,
}

/// Event: выстрел обработан (ECS → engine bridge).
///
/// `impact == None` — screen-to-world проекция недоступна: bridge пропускает
/// impact/beam эффекты, но звук и анимацию выстрела играет всё равно.
#[derive(Event, Debug, Clone)]
pub struct ShotResolved {
    pub shooter: Entity,

    /// Позиция muzzle socket'а (начало beam'а)
    pub muzzle: Vec3,

    /// Мировая точка попадания (конец beam'а + impact-партиклы)
    pub impact: Option<Vec3>,
}

/// System: обработка FirePressed.
///
/// На каждый выстрел: re-arm окна firing_bullet (last-call-wins) +
/// двухлучевой trace + ShotResolved для effect collaborator'а.
pub fn process_fire_input(
    mut fire_events: EventReader<FirePressed>,
    mut query: Query<(&CameraRig, &MuzzlePoint, &mut CrosshairSpread)>,
    caster: Res<RayCastService>,
    mut resolved_events: EventWriter<ShotResolved>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for event in fire_events.read() {
        let Ok((rig, muzzle, mut spread)) = query.get_mut(event.entity) else {
            continue;
        };

        spread.start_bullet_fire(now);

        let impact = resolve_impact(rig.view_ray(), muzzle.position, caster.0.as_ref());
        if impact.is_none() {
            logger::log_warning(&format!(
                "Entity {:?} fired with no valid screen projection, skipping impact",
                event.entity
            ));
        }

        resolved_events.write(ShotResolved {
            shooter: event.entity,
            muzzle: muzzle.position,
            impact,
        });

        logger::log(&format!(
            "Entity {:?} fired: muzzle={:?} impact={:?}",
            event.entity, muzzle.position, impact
        ));
    }
}

/// Plugin: fire pipeline
pub struct ShootingPlugin;

impl Plugin for ShootingPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<FirePressed>().add_event::<ShotResolved>();

        app.add_systems(
            FixedUpdate,
            process_fire_input.in_set(ControllerSet::Shooting),
        );
    }
}
