//! Crosshair spread calculator.
//!
//! Четыре независимо интерполируемых фактора складываются в один
//! spread multiplier для HUD:
//!
//! `spread = 0.5 + velocity + air − aim + shoot`
//!
//! HUD collaborator читает `spread_multiplier()` каждый кадр, read-only.
//! Окно firing_bullet — polled timestamp на компоненте (никаких таймеров):
//! re-arm перезаписывает deadline, last-call-wins.

use bevy::prelude::*;

use crate::aiming::AimState;
use crate::interp::{interp_to, map_range_clamped};
use crate::locomotion::CharacterMotion;
use crate::ControllerSet;

/// Базовый spread (неподвижный персонаж на земле, без aim/fire)
pub const SPREAD_BASE: f32 = 0.5;

/// Скорость, на которой velocity factor достигает 1.0 (см/с)
pub const VELOCITY_FACTOR_MAX_SPEED: f32 = 600.0;

pub const AIR_FACTOR_TARGET: f32 = 2.25;
/// В воздухе расползается медленно...
pub const AIR_SPREAD_RATE: f32 = 2.25;
/// ...а при приземлении схлопывается быстро (асимметрия намеренная)
pub const AIR_RECOVER_RATE: f32 = 30.0;

pub const AIM_FACTOR_TARGET: f32 = 0.35;
pub const AIM_INTERP_RATE: f32 = 30.0;

pub const SHOOT_FACTOR_TARGET: f32 = 0.3;
pub const SHOOT_SPREAD_RATE: f32 = 60.0;
pub const SHOOT_RECOVER_RATE: f32 = 15.0;

/// Длительность окна firing_bullet после выстрела (сек)
pub const FIRE_WINDOW_SECS: f32 = 0.05;

/// Состояние crosshair spread.
///
/// Инварианты:
/// - velocity_factor ∈ [0, 1], air_factor ∈ [0, 2.25],
///   aim_factor ∈ [0, 0.35], shoot_factor ∈ [0, 0.3]
/// - spread — чистая функция четырёх факторов того же тика (не бывает stale)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct CrosshairSpread {
    pub velocity_factor: f32,
    pub air_factor: f32,
    /// Target инвертирован: растёт при прицеливании, сумма его ВЫЧИТАЕТ
    pub aim_factor: f32,
    pub shoot_factor: f32,

    /// Кэш суммы факторов текущего тика
    spread: f32,

    /// Окно недавнего выстрела активно
    pub firing_bullet: bool,

    /// Deadline окна (simulated seconds); None — окно не активно
    fire_window_until: Option<f32>,
}

impl Default for CrosshairSpread {
    fn default() -> Self {
        Self {
            velocity_factor: 0.0,
            air_factor: 0.0,
            aim_factor: 0.0,
            shoot_factor: 0.0,
            spread: SPREAD_BASE,
            firing_bullet: false,
            fire_window_until: None,
        }
    }
}

impl CrosshairSpread {
    /// Spread multiplier для HUD — всегда валиден, error states нет
    pub fn spread_multiplier(&self) -> f32 {
        self.spread
    }

    /// Взводит окно firing_bullet на 0.05 с от `now`.
    ///
    /// Повторный вызов до истечения просто перезаписывает deadline
    /// (окна не считаются и не складываются).
    pub fn start_bullet_fire(&mut self, now: f32) {
        self.firing_bullet = true;
        self.fire_window_until = Some(now + FIRE_WINDOW_SECS);
    }

    fn expire_fire_window(&mut self, now: f32) {
        if let Some(deadline) = self.fire_window_until {
            if now >= deadline {
                self.firing_bullet = false;
                self.fire_window_until = None;
            }
        }
    }

    /// Per-tick шаг калькулятора.
    ///
    /// `speed` — горизонтальная скорость, `now` — simulated time для
    /// проверки deadline окна выстрела.
    pub fn advance(&mut self, delta: f32, speed: f32, falling: bool, aiming: bool, now: f32) {
        self.expire_fire_window(now);

        // Clamped linear remap, НЕ интерполяция
        self.velocity_factor =
            map_range_clamped(speed, 0.0, VELOCITY_FACTOR_MAX_SPEED, 0.0, 1.0);

        self.air_factor = if falling {
            interp_to(self.air_factor, AIR_FACTOR_TARGET, delta, AIR_SPREAD_RATE)
        } else {
            interp_to(self.air_factor, 0.0, delta, AIR_RECOVER_RATE)
        };

        self.aim_factor = if aiming {
            interp_to(self.aim_factor, AIM_FACTOR_TARGET, delta, AIM_INTERP_RATE)
        } else {
            interp_to(self.aim_factor, 0.0, delta, AIM_INTERP_RATE)
        };

        self.shoot_factor = if self.firing_bullet {
            interp_to(self.shoot_factor, SHOOT_FACTOR_TARGET, delta, SHOOT_SPREAD_RATE)
        } else {
            interp_to(self.shoot_factor, 0.0, delta, SHOOT_RECOVER_RATE)
        };

        self.spread = SPREAD_BASE + self.velocity_factor + self.air_factor - self.aim_factor
            + self.shoot_factor;
    }
}

/// System: per-tick advance всех crosshair'ов.
///
/// Читает флаги из locomotion (speed, falling) и aim state machine (aiming) —
/// оба уже обновлены в этом тике (порядок наборов в SimulationPlugin).
pub fn advance_crosshair_spread(
    mut query: Query<(&mut CrosshairSpread, &CharacterMotion, &AimState)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let now = time.elapsed_secs();

    for (mut spread, motion, aim) in query.iter_mut() {
        spread.advance(delta, motion.ground_speed(), motion.falling(), aim.is_aiming, now);
    }
}

/// Plugin: crosshair spread
pub struct CrosshairPlugin;

impl Plugin for CrosshairPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            advance_crosshair_spread.in_set(ControllerSet::Crosshair),
        );
    }
}
