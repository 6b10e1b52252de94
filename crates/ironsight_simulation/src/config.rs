//! Runtime-конфиг контроллера, загружается из `assets/controller.toml`.
//!
//! [`ControllerConfig`] — Bevy [`Resource`] со всеми editor-tunable значениями
//! персонажа (FOV, sensitivity, movement). На старте [`load_controller_config`]
//! читает TOML и перезаписывает дефолты значениями из файла. Отсутствующие
//! ключи остаются compile-time дефолтами, поэтому минимальный TOML может
//! переопределить только нужные константы.
//!
//! Единицы — сантиметры и градусы (шкала оригинального контента).

use bevy::prelude::*;
use serde::Deserialize;

use crate::logger;

pub const CONFIG_PATH: &str = "assets/controller.toml";

// Camera
pub const CAMERA_DEFAULT_FOV: f32 = 90.0;
pub const CAMERA_BOOM_LENGTH: f32 = 300.0;
pub const EYE_HEIGHT: f32 = 160.0;

// Aiming / zoom
pub const ZOOMED_FOV: f32 = 35.0;
pub const ZOOM_INTERP_SPEED: f32 = 20.0;
pub const HIP_TURN_RATE: f32 = 90.0;
pub const HIP_LOOK_RATE: f32 = 90.0;
pub const AIM_TURN_RATE: f32 = 20.0;
pub const AIM_LOOK_RATE: f32 = 20.0;

// Locomotion
pub const MAX_WALK_SPEED: f32 = 600.0;
pub const JUMP_VELOCITY: f32 = 420.0;
pub const GRAVITY: f32 = -980.0;

// Muzzle socket (локальный offset от корня персонажа, engine bridge
// перезаписывает реальной позицией socket'а на меше)
pub const MUZZLE_OFFSET: [f32; 3] = [30.0, 140.0, -60.0];

/// Tunable-конфиг персонажа.
///
/// Все поля дефолтятся в compile-time константы выше; TOML переопределяет
/// любое подмножество.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // Camera
    pub camera_default_fov: f32,
    pub camera_boom_length: f32,
    pub eye_height: f32,

    // Aiming / zoom
    pub zoomed_fov: f32,
    pub zoom_interp_speed: f32,
    pub hip_turn_rate: f32,
    pub hip_look_rate: f32,
    pub aim_turn_rate: f32,
    pub aim_look_rate: f32,

    // Locomotion
    pub max_walk_speed: f32,
    pub jump_velocity: f32,
    pub gravity: f32,

    // Muzzle
    pub muzzle_offset: [f32; 3],
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            camera_default_fov: CAMERA_DEFAULT_FOV,
            camera_boom_length: CAMERA_BOOM_LENGTH,
            eye_height: EYE_HEIGHT,
            zoomed_fov: ZOOMED_FOV,
            zoom_interp_speed: ZOOM_INTERP_SPEED,
            hip_turn_rate: HIP_TURN_RATE,
            hip_look_rate: HIP_LOOK_RATE,
            aim_turn_rate: AIM_TURN_RATE,
            aim_look_rate: AIM_LOOK_RATE,
            max_walk_speed: MAX_WALK_SPEED,
            jump_velocity: JUMP_VELOCITY,
            gravity: GRAVITY,
            muzzle_offset: MUZZLE_OFFSET,
        }
    }
}

/// Startup system: читает `assets/controller.toml` и перезаписывает resource.
pub fn load_controller_config(mut config: ResMut<ControllerConfig>) {
    apply_config_file(&mut config, std::path::Path::new(CONFIG_PATH));
}

/// Накатывает TOML-файл на конфиг.
///
/// Файла может не быть (headless тесты) — тогда остаются дефолты.
/// Битый TOML не фатален: warning в лог, дефолты остаются.
pub fn apply_config_file(config: &mut ControllerConfig, path: &std::path::Path) {
    match std::fs::read_to_string(path) {
        Ok(text) => match toml::from_str::<ControllerConfig>(&text) {
            Ok(loaded) => {
                *config = loaded;
                logger::log_info(&format!("ControllerConfig loaded from {}", path.display()));
            }
            Err(err) => {
                logger::log_warning(&format!(
                    "Failed to parse {}: {} (using defaults)",
                    path.display(),
                    err
                ));
            }
        },
        Err(_) => {
            logger::log(&format!("{} not found, using defaults", path.display()));
        }
    }
}
