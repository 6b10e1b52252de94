//! Базовые ECS компоненты персонажа.
//!
//! Всё состояние, которое engine bridge читает/пишет напрямую
//! (камера, muzzle socket, animation snapshot), живёт здесь.

use bevy::prelude::*;

use crate::shooting::ViewRay;

/// Marker: управляемый игроком персонаж
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Camera rig (boom + follow camera) персонажа.
///
/// Симуляция пишет сюда view ray (из control rotation) и FOV (из aim state
/// machine), engine bridge читает компонент каждый кадр и двигает настоящую
/// камеру. `projection_valid` bridge сбрасывает при degenerate viewport —
/// единственный случай, когда screen-to-world проекция недоступна.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct CameraRig {
    /// Мировая позиция камеры (конец boom'а)
    pub view_origin: Vec3,

    /// Направление взгляда (normalized)
    pub view_direction: Vec3,

    /// Текущий FOV (градусы), пишется aim state machine каждый тик
    pub fov: f32,

    /// Длина camera boom (см)
    pub boom_length: f32,

    /// Валидна ли screen-to-world проекция (false при degenerate viewport)
    pub projection_valid: bool,
}

impl CameraRig {
    pub fn new(fov: f32, boom_length: f32) -> Self {
        Self {
            view_origin: Vec3::ZERO,
            view_direction: Vec3::NEG_Z,
            fov,
            boom_length,
            projection_valid: true,
        }
    }

    /// View ray для aim trace. `None` — проекция недоступна
    pub fn view_ray(&self) -> Option<ViewRay> {
        self.projection_valid.then(|| ViewRay {
            origin: self.view_origin,
            direction: self.view_direction,
        })
    }
}

/// Позиция muzzle socket'а в мире.
///
/// Симуляция держит её на фиксированном локальном offset'е от корня персонажа,
/// engine bridge перезаписывает реальной позицией socket'а на skeletal mesh.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct MuzzlePoint {
    /// Мировая позиция socket'а
    pub position: Vec3,

    /// Локальный offset от корня персонажа (до поворота по yaw)
    pub local_offset: Vec3,
}

impl MuzzlePoint {
    pub fn new(local_offset: Vec3) -> Self {
        Self {
            position: local_offset,
            local_offset,
        }
    }
}

/// Snapshot состояния движения для animation collaborator'а.
///
/// Обновляется каждый тик, animation blend space читает поля read-only.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct AnimationPose {
    /// Горизонтальная скорость (вертикальная компонента исключена)
    pub speed: f32,

    /// Персонаж в воздухе
    pub in_air: bool,

    /// Есть ли movement input (acceleration > 0)
    pub accelerating: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_ray_none_when_projection_invalid() {
        let mut rig = CameraRig::new(90.0, 300.0);
        assert!(rig.view_ray().is_some());

        rig.projection_valid = false;
        assert!(rig.view_ray().is_none());
    }

    #[test]
    fn test_view_ray_carries_origin_and_direction() {
        let mut rig = CameraRig::new(90.0, 300.0);
        rig.view_origin = Vec3::new(1.0, 2.0, 3.0);
        rig.view_direction = Vec3::X;

        let ray = rig.view_ray().unwrap();
        assert_eq!(ray.origin, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(ray.direction, Vec3::X);
    }
}
