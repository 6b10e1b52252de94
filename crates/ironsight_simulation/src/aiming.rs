//! Aiming/zoom state machine (ADS ↔ hip fire).
//!
//! Архитектура:
//! - `AimState` — level-семантика: AimPressed/AimReleased ставят флаг сразу,
//!   без debounce и transition delay
//! - FOV сходится к цели экспоненциальной интерполяцией каждый тик
//! - Turn/look sensitivity — hard switch (не интерполируется)
//! - Новый FOV каждый тик пишется в CameraRig, камера движка читает компонент

use bevy::prelude::*;

use crate::components::CameraRig;
use crate::config::ControllerConfig;
use crate::interp::interp_to;
use crate::logger;
use crate::ControllerSet;

/// Aiming/zoom состояние персонажа.
///
/// Инвариант: `current_fov` всегда в пределах
/// `[min(default_fov, zoomed_fov), max(default_fov, zoomed_fov)]`,
/// геометрически сходится к FOV, выбранному `is_aiming`.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct AimState {
    /// ADS активен
    pub is_aiming: bool,

    /// Текущий FOV камеры (градусы)
    pub current_fov: f32,

    /// FOV hip-fire (захвачен из камеры при спавне)
    pub default_fov: f32,

    /// FOV при прицеливании
    pub zoomed_fov: f32,

    /// Скорость интерполяции FOV (1/с)
    pub zoom_interp_speed: f32,

    // Сконфигурированные sensitivity-константы
    pub hip_turn_rate: f32,
    pub hip_look_rate: f32,
    pub aim_turn_rate: f32,
    pub aim_look_rate: f32,

    /// Действующий turn rate (°/с), производное от is_aiming
    pub base_turn_rate: f32,

    /// Действующий look rate (°/с), производное от is_aiming
    pub base_look_rate: f32,
}

impl AimState {
    /// `default_fov` захватывается из стартового FOV камеры (один раз)
    pub fn new(default_fov: f32, config: &ControllerConfig) -> Self {
        Self {
            is_aiming: false,
            current_fov: default_fov,
            default_fov,
            zoomed_fov: config.zoomed_fov,
            zoom_interp_speed: config.zoom_interp_speed,
            hip_turn_rate: config.hip_turn_rate,
            hip_look_rate: config.hip_look_rate,
            aim_turn_rate: config.aim_turn_rate,
            aim_look_rate: config.aim_look_rate,
            base_turn_rate: config.hip_turn_rate,
            base_look_rate: config.hip_look_rate,
        }
    }

    /// Level, не edge: ставит флаг немедленно
    pub fn set_aiming(&mut self, aiming: bool) {
        self.is_aiming = aiming;
    }

    /// Per-tick шаг state machine:
    /// 1. FOV → zoomed_fov (aiming) или default_fov (hip), InterpTo-закон
    /// 2. base turn/look rate — hard switch по is_aiming
    pub fn advance(&mut self, delta: f32) {
        let target_fov = if self.is_aiming {
            self.zoomed_fov
        } else {
            self.default_fov
        };
        self.current_fov = interp_to(self.current_fov, target_fov, delta, self.zoom_interp_speed);

        if self.is_aiming {
            self.base_turn_rate = self.aim_turn_rate;
            self.base_look_rate = self.aim_look_rate;
        } else {
            self.base_turn_rate = self.hip_turn_rate;
            self.base_look_rate = self.hip_look_rate;
        }
    }
}

impl Default for AimState {
    fn default() -> Self {
        let config = ControllerConfig::default();
        Self::new(config.camera_default_fov, &config)
    }
}

/// Event: кнопка прицеливания нажата
#[derive(Event, Debug, Clone)]
pub struct AimPressed {
    pub entity: Entity,
}

/// Event: кнопка прицеливания отпущена
#[derive(Event, Debug, Clone)]
pub struct AimReleased {
    pub entity: Entity,
}

/// System: input events → is_aiming
pub fn process_aim_input(
    mut pressed: EventReader<AimPressed>,
    mut released: EventReader<AimReleased>,
    mut query: Query<&mut AimState>,
) {
    for event in pressed.read() {
        if let Ok(mut aim) = query.get_mut(event.entity) {
            aim.set_aiming(true);
            logger::log(&format!("Entity {:?} aiming: on", event.entity));
        }
    }

    for event in released.read() {
        if let Ok(mut aim) = query.get_mut(event.entity) {
            aim.set_aiming(false);
            logger::log(&format!("Entity {:?} aiming: off", event.entity));
        }
    }
}

/// System: per-tick advance + push FOV в camera collaborator
pub fn advance_aim_zoom(
    mut query: Query<(&mut AimState, &mut CameraRig)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut aim, mut rig) in query.iter_mut() {
        aim.advance(delta);
        rig.fov = aim.current_fov;
    }
}

/// Plugin: aim input + zoom state machine
pub struct AimingPlugin;

impl Plugin for AimingPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AimPressed>().add_event::<AimReleased>();

        app.add_systems(
            FixedUpdate,
            (process_aim_input, advance_aim_zoom)
                .chain()
                .in_set(ControllerSet::Aiming),
        );
    }
}
