//! IRONSIGHT Simulation Core
//!
//! ECS-симуляция third-person shooter контроллера на Bevy 0.16.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (aim state machine, crosshair spread, fire resolution)
//! - Engine bridge = tactical layer (рендер, skeletal mesh, физика, input devices)
//!
//! Bridge общается с симуляцией узкими контрактами: input events внутрь
//! (AimPressed/AimReleased/FirePressed/JumpPressed, MoveInput/LookInput),
//! компоненты наружу (CameraRig.fov, CrosshairSpread, AnimationPose),
//! ShotResolved для эффектов и RayCastService для collision queries.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

// Публичные модули
pub mod aiming;
pub mod components;
pub mod config;
pub mod crosshair;
pub mod interp;
pub mod locomotion;
pub mod logger;
pub mod shooting;

// Re-export базовых типов для удобства
pub use aiming::{AimPressed, AimReleased, AimState};
pub use components::{AnimationPose, CameraRig, MuzzlePoint, Player};
pub use config::ControllerConfig;
pub use crosshair::CrosshairSpread;
pub use locomotion::{
    spawn_player_character, CharacterMotion, ControlRotation, JumpPressed, LookInput, MoveInput,
};
pub use shooting::{
    resolve_impact, FirePressed, GroundPlane, OpenWorld, RayCastService, RayCaster, RayHit,
    ShotResolved, TraceChannel, ViewRay,
};

/// Порядок наборов систем внутри тика.
///
/// Контракт из контроллера: сначала locomotion, затем aim state machine,
/// затем выстрелы, затем crosshair (читает aiming-флаг и скорость того же
/// тика), в конце snapshot для анимации.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerSet {
    Locomotion,
    Aiming,
    Shooting,
    Crosshair,
    Animation,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<ControllerConfig>()
            // Пустой мир по умолчанию, engine bridge подменяет своим caster'ом
            .insert_resource(RayCastService::disabled())
            .add_systems(Startup, config::load_controller_config)
            .configure_sets(
                FixedUpdate,
                (
                    ControllerSet::Locomotion,
                    ControllerSet::Aiming,
                    ControllerSet::Shooting,
                    ControllerSet::Crosshair,
                    ControllerSet::Animation,
                )
                    .chain(),
            )
            .add_plugins((
                locomotion::LocomotionPlugin,
                aiming::AimingPlugin,
                shooting::ShootingPlugin,
                crosshair::CrosshairPlugin,
            ));
    }
}

/// Создаёт minimal Bevy App для headless симуляции.
///
/// Время двигаем вручную ровно на период fixed tick'а — каждый
/// `app.update()` даёт один детерминированный FixedUpdate.
pub fn create_headless_app() -> App {
    let mut app = App::new();
    logger::init_logger();

    app.add_plugins(MinimalPlugins)
        .insert_resource(Time::<Fixed>::from_hz(60.0))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )));

    app
}
