//! Kinematic локомоция персонажа + control rotation.
//!
//! Архитектура:
//! - Input приходит извне (engine bridge пишет MoveInput/LookInput, шлёт JumpPressed)
//! - Velocity интегрируем сами, fixed timestep 60Hz
//! - Look sensitivity берётся из aim state machine (hip vs aim rates)
//!
//! Полноценные коллизии — на стороне движка; здесь только плоскость пола
//! для флага falling.

use bevy::prelude::*;

use crate::aiming::AimState;
use crate::components::{AnimationPose, CameraRig, MuzzlePoint, Player};
use crate::config::ControllerConfig;
use crate::crosshair::CrosshairSpread;
use crate::ControllerSet;

/// Кламп pitch'а, чтобы камера не перекручивалась через зенит
pub const PITCH_LIMIT: f32 = 89.0;

/// Высота плоскости пола для ground check
const FLOOR_HEIGHT: f32 = 0.0;

/// Движение персонажа (velocity + tunables)
///
/// Инвариант: grounded ⇒ velocity.y == 0
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CharacterMotion {
    /// Текущая скорость (см/с)
    pub velocity: Vec3,
    /// Максимальная скорость ходьбы (см/с)
    pub move_speed: f32,
    /// Вертикальная скорость прыжка (см/с)
    pub jump_velocity: f32,
    /// Гравитация (см/с², отрицательная)
    pub gravity: f32,
    /// На земле ли персонаж
    pub grounded: bool,
}

impl CharacterMotion {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            velocity: Vec3::ZERO,
            move_speed: config.max_walk_speed,
            jump_velocity: config.jump_velocity,
            gravity: config.gravity,
            grounded: true,
        }
    }

    /// Горизонтальная скорость — вертикальная компонента исключена
    pub fn ground_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }

    /// Персонаж в воздухе (падение или прыжок)
    pub fn falling(&self) -> bool {
        !self.grounded
    }
}

impl Default for CharacterMotion {
    fn default() -> Self {
        Self::new(&ControllerConfig::default())
    }
}

/// Movement input (WASD-оси), пишется engine bridge'ем каждый кадр
///
/// `forward`/`right` в [-1, 1]; в headless тестах — mock через компонент.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct MoveInput {
    pub forward: f32,
    pub right: f32,
}

impl MoveInput {
    pub fn is_active(&self) -> bool {
        self.forward != 0.0 || self.right != 0.0
    }
}

/// Look input (оси стиков/мыши), rate-based
///
/// Значения в [-1, 1], масштабируются base turn/look rate из AimState.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct LookInput {
    /// Поворот по yaw (+ вправо)
    pub turn: f32,
    /// Наклон по pitch (+ вверх)
    pub look_up: f32,
}

/// Control rotation персонажа (градусы)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct ControlRotation {
    pub yaw: f32,
    pub pitch: f32,
}

impl ControlRotation {
    /// Направление взгляда из yaw + pitch
    pub fn view_direction(&self) -> Vec3 {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            0.0,
        ) * Vec3::NEG_Z
    }

    /// Горизонтальный forward-базис (только yaw, как у оригинального
    /// контроллера: движение не зависит от pitch'а камеры)
    pub fn ground_forward(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw.to_radians()) * Vec3::NEG_Z
    }

    pub fn ground_right(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw.to_radians()) * Vec3::X
    }
}

/// Event: прыжок (just_pressed edge от input collaborator'а)
#[derive(Event, Debug, Clone)]
pub struct JumpPressed {
    pub entity: Entity,
}

/// System: look input → control rotation
///
/// Sensitivity — base_turn_rate/base_look_rate из aim state machine
/// (hard switch hip↔aim, без интерполяции).
pub fn apply_look_input(
    mut query: Query<(&LookInput, &AimState, &mut ControlRotation)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (look, aim, mut rotation) in query.iter_mut() {
        rotation.yaw += look.turn * aim.base_turn_rate * delta;
        rotation.pitch =
            (rotation.pitch + look.look_up * aim.base_look_rate * delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}

/// System: movement input → горизонтальная velocity
///
/// Направление проецируется на yaw-базис control rotation
/// (forward экранный, не по оси мира).
pub fn apply_move_input(mut query: Query<(&MoveInput, &ControlRotation, &mut CharacterMotion)>) {
    for (input, rotation, mut motion) in query.iter_mut() {
        if input.is_active() {
            let direction = (rotation.ground_forward() * input.forward
                + rotation.ground_right() * input.right)
                .normalize_or_zero();

            motion.velocity.x = direction.x * motion.move_speed;
            motion.velocity.z = direction.z * motion.move_speed;
        } else {
            // Мгновенная остановка горизонтали (без инерции)
            motion.velocity.x = 0.0;
            motion.velocity.z = 0.0;
        }
    }
}

/// System: прыжок (только с земли)
pub fn process_jump_input(
    mut jump_events: EventReader<JumpPressed>,
    mut query: Query<&mut CharacterMotion>,
) {
    for event in jump_events.read() {
        if let Ok(mut motion) = query.get_mut(event.entity) {
            if motion.grounded {
                motion.velocity.y = motion.jump_velocity;
                motion.grounded = false;
            }
        }
    }
}

/// System: гравитация (только в воздухе)
pub fn apply_gravity(mut query: Query<&mut CharacterMotion>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut motion in query.iter_mut() {
        if !motion.grounded {
            motion.velocity.y += motion.gravity * delta;
        }
    }
}

/// System: интеграция velocity → Transform + ground check
///
/// TODO: заменить плоскость пола на ground check через RayCastService,
/// когда engine bridge начнёт отдавать collision geometry.
pub fn integrate_motion(
    mut query: Query<(&mut CharacterMotion, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut motion, mut transform) in query.iter_mut() {
        transform.translation += motion.velocity * delta;

        if transform.translation.y <= FLOOR_HEIGHT {
            transform.translation.y = FLOOR_HEIGHT;
            motion.velocity.y = 0.0;
            motion.grounded = true;
        } else {
            motion.grounded = false;
        }
    }
}

/// System: control rotation → camera rig (boom длиной 300 за спиной)
pub fn sync_camera_rig(
    mut query: Query<(&Transform, &ControlRotation, &mut CameraRig)>,
    config: Res<ControllerConfig>,
) {
    for (transform, rotation, mut rig) in query.iter_mut() {
        let direction = rotation.view_direction();
        let pivot = transform.translation + Vec3::Y * config.eye_height;

        rig.view_direction = direction;
        rig.view_origin = pivot - direction * rig.boom_length;
    }
}

/// System: позиция muzzle socket'а из yaw персонажа
pub fn sync_muzzle_point(mut query: Query<(&Transform, &ControlRotation, &mut MuzzlePoint)>) {
    for (transform, rotation, mut muzzle) in query.iter_mut() {
        let offset = Quat::from_rotation_y(rotation.yaw.to_radians()) * muzzle.local_offset;
        muzzle.position = transform.translation + offset;
    }
}

/// System: snapshot движения для animation collaborator'а
pub fn update_animation_pose(mut query: Query<(&CharacterMotion, &MoveInput, &mut AnimationPose)>) {
    for (motion, input, mut pose) in query.iter_mut() {
        pose.speed = motion.ground_speed();
        pose.in_air = motion.falling();
        pose.accelerating = input.is_active();
    }
}

/// Spawn helper: персонаж с полным набором компонентов контроллера.
///
/// `default_fov` aim state machine захватывает из camera rig при спавне.
pub fn spawn_player_character(
    commands: &mut Commands,
    config: &ControllerConfig,
    position: Vec3,
) -> Entity {
    let rig = CameraRig::new(config.camera_default_fov, config.camera_boom_length);
    let aim = AimState::new(rig.fov, config);

    commands
        .spawn((
            Player,
            Transform::from_translation(position),
            CharacterMotion::new(config),
            MoveInput::default(),
            LookInput::default(),
            ControlRotation::default(),
            rig,
            aim,
            CrosshairSpread::default(),
            MuzzlePoint::new(Vec3::from_array(config.muzzle_offset)),
            AnimationPose::default(),
        ))
        .id()
}

/// Plugin локомоции: движение + camera/muzzle sync + animation snapshot
pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<JumpPressed>();

        app.add_systems(
            FixedUpdate,
            (
                apply_look_input,
                apply_move_input,
                process_jump_input,
                apply_gravity,
                integrate_motion,
                sync_camera_rig,
                sync_muzzle_point,
            )
                .chain()
                .in_set(ControllerSet::Locomotion),
        );

        // Snapshot для анимации — после всех расчётов тика
        app.add_systems(
            FixedUpdate,
            update_animation_pose.in_set(ControllerSet::Animation),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aiming::AimPressed;
    use crate::{create_headless_app, SimulationPlugin};

    #[test]
    fn test_ground_speed_excludes_vertical() {
        let motion = CharacterMotion {
            velocity: Vec3::new(300.0, -980.0, 400.0),
            ..default()
        };

        // 3-4-5: горизонталь 500, вертикаль не учитывается
        assert!((motion.ground_speed() - 500.0).abs() < 0.01);
    }

    #[test]
    fn test_view_direction_at_zero_rotation_is_neg_z() {
        let rotation = ControlRotation::default();
        assert!((rotation.view_direction() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_positive_pitch_looks_up() {
        let rotation = ControlRotation {
            yaw: 0.0,
            pitch: 45.0,
        };
        assert!(rotation.view_direction().y > 0.5);
    }

    #[test]
    fn test_movement_follows_yaw_basis() {
        // yaw 90° → forward мира поворачивается на -X
        let rotation = ControlRotation {
            yaw: 90.0,
            pitch: 0.0,
        };
        let forward = rotation.ground_forward();
        assert!((forward - Vec3::NEG_X).length() < 1e-5);
    }

    /// Helper: headless App с полным контроллером + заспавненный персонаж
    fn create_test_app() -> (App, Entity) {
        let mut app = create_headless_app();
        app.add_plugins(SimulationPlugin);
        app.update(); // Startup: конфиг загружен
        let config = app.world().resource::<ControllerConfig>().clone();
        let player = spawn_player_character(&mut app.world_mut().commands(), &config, Vec3::ZERO);
        app.update();
        (app, player)
    }

    /// Helper: сбрасывает yaw, гоняет тики, возвращает накопленный yaw
    fn yaw_after_ticks(app: &mut App, player: Entity, ticks: u32) -> f32 {
        if let Some(mut rotation) = app.world_mut().get_mut::<ControlRotation>(player) {
            rotation.yaw = 0.0;
        }
        for _ in 0..ticks {
            app.update();
        }
        app.world().get::<ControlRotation>(player).unwrap().yaw
    }

    #[test]
    fn test_look_input_scaled_by_aim_vs_hip_rate() {
        let (mut app, player) = create_test_app();
        if let Some(mut look) = app.world_mut().get_mut::<LookInput>(player) {
            look.turn = 1.0;
        }

        // Hip: 90°/с → за секунду ровно 90°
        let hip_yaw = yaw_after_ticks(&mut app, player, 60);
        assert!((hip_yaw - 90.0).abs() < 0.1, "hip yaw за 1с: {}", hip_yaw);

        // Прицел: hard switch на 20°/с
        app.world_mut().send_event(AimPressed { entity: player });
        app.update();
        let aim_yaw = yaw_after_ticks(&mut app, player, 60);
        assert!((aim_yaw - 20.0).abs() < 0.1, "aim yaw за 1с: {}", aim_yaw);

        // Aim-дельта пропорционально меньше (90/20 = 4.5)
        assert!(aim_yaw < hip_yaw);
        assert!((hip_yaw / aim_yaw - 4.5).abs() < 0.01);
    }

    #[test]
    fn test_pitch_clamped_by_look_system() {
        let (mut app, player) = create_test_app();
        if let Some(mut look) = app.world_mut().get_mut::<LookInput>(player) {
            look.look_up = 1.0;
        }

        // 10 секунд по 90°/с — без клампа было бы 900°
        for _ in 0..600 {
            app.update();
        }
        let rotation = app.world().get::<ControlRotation>(player).unwrap();
        assert_eq!(rotation.pitch, PITCH_LIMIT);

        if let Some(mut look) = app.world_mut().get_mut::<LookInput>(player) {
            look.look_up = -1.0;
        }
        for _ in 0..1200 {
            app.update();
        }
        let rotation = app.world().get::<ControlRotation>(player).unwrap();
        assert_eq!(rotation.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn test_gravity_applies_only_in_air() {
        let (mut app, player) = create_test_app();

        // На земле вертикальная скорость не копится
        for _ in 0..30 {
            app.update();
        }
        let motion = *app.world().get::<CharacterMotion>(player).unwrap();
        assert!(motion.grounded);
        assert_eq!(motion.velocity.y, 0.0);

        // Прыжок: гравитация откусывает от jump_velocity каждый тик
        app.world_mut().send_event(JumpPressed { entity: player });
        app.update();
        let after_jump = *app.world().get::<CharacterMotion>(player).unwrap();
        assert!(!after_jump.grounded);
        assert!(after_jump.velocity.y > 0.0);
        assert!(after_jump.velocity.y < after_jump.jump_velocity);

        app.update();
        let next_tick = *app.world().get::<CharacterMotion>(player).unwrap();
        assert!(next_tick.velocity.y < after_jump.velocity.y);

        // Приземление: velocity.y обнуляется, grounded восстанавливается
        for _ in 0..120 {
            app.update();
        }
        let landed = *app.world().get::<CharacterMotion>(player).unwrap();
        assert!(landed.grounded);
        assert_eq!(landed.velocity.y, 0.0);
    }
}
