//! Aim-resolution: два последовательных ray cast'а → одна точка попадания.
//!
//! Ray cast — сервис движка (tactical layer), симуляция видит его только
//! через trait object в [`RayCastService`]. Благодаря этому resolve_impact
//! тестируется без engine runtime.

use bevy::prelude::*;

/// Максимальная дистанция aim trace (см)
pub const AIM_TRACE_RANGE: f32 = 50_000.0;

/// Collision channel для trace (аналог visibility channel движка)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceChannel {
    Visibility,
}

/// Результат ray cast'а: точка первого блокирующего попадания
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub position: Vec3,
}

/// Луч от камеры (screen-to-world проекция центра экрана)
#[derive(Debug, Clone, Copy)]
pub struct ViewRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Ray-cast сервис движка: синхронный, без side effects.
///
/// `None` — сегмент `origin → end` ничем не перекрыт.
pub trait RayCaster: Send + Sync {
    fn cast(&self, origin: Vec3, end: Vec3, channel: TraceChannel) -> Option<RayHit>;
}

/// Resource-обёртка над RayCaster движка.
///
/// Engine bridge вставляет свою реализацию; по умолчанию — пустой мир.
#[derive(Resource)]
pub struct RayCastService(pub Box<dyn RayCaster>);

impl RayCastService {
    pub fn new(caster: impl RayCaster + 'static) -> Self {
        Self(Box::new(caster))
    }

    /// Пустой мир: ни один луч ничего не задевает
    pub fn disabled() -> Self {
        Self::new(OpenWorld)
    }
}

/// Мир без геометрии (дефолт для headless запуска без bridge'а)
pub struct OpenWorld;

impl RayCaster for OpenWorld {
    fn cast(&self, _origin: Vec3, _end: Vec3, _channel: TraceChannel) -> Option<RayHit> {
        None
    }
}

/// Бесконечная горизонтальная плоскость (пол демо-сцены и тестов)
pub struct GroundPlane {
    pub height: f32,
}

impl RayCaster for GroundPlane {
    fn cast(&self, origin: Vec3, end: Vec3, _channel: TraceChannel) -> Option<RayHit> {
        let delta = end - origin;
        if delta.y.abs() < f32::EPSILON {
            return None; // луч параллелен плоскости
        }

        let t = (self.height - origin.y) / delta.y;
        // t > малого эпсилона, чтобы луч из точки на плоскости не бил сам в себя
        if t > 1e-4 && t <= 1.0 {
            Some(RayHit {
                position: origin + delta * t,
            })
        } else {
            None
        }
    }
}

/// Резолвит точку попадания выстрела двумя лучами.
///
/// 1. View ray на 50 000 единиц: мимо → кандидат = дальний конец луча,
///    попал → кандидат = точка попадания.
/// 2. Луч muzzle → кандидат: если что-то перекрывает линию от ствола до
///    цели, итоговая точка — ближнее попадание второго луча.
///
/// Два луча нужны, чтобы выстрел визуально сходился на reticle-цель при
/// смещённом от камеры стволе, но не проходил сквозь геометрию рядом
/// со стволом.
///
/// `None` только если screen-to-world проекция недоступна (`view_ray` пуст
/// или направление вырождено) — caller пропускает impact-эффекты, но звук
/// и анимация выстрела всё равно играют.
pub fn resolve_impact(
    view_ray: Option<ViewRay>,
    muzzle: Vec3,
    caster: &dyn RayCaster,
) -> Option<Vec3> {
    let ray = view_ray?;
    let direction = ray.direction.normalize_or_zero();
    if direction == Vec3::ZERO {
        return None;
    }

    let far_end = ray.origin + direction * AIM_TRACE_RANGE;
    let candidate = caster
        .cast(ray.origin, far_end, TraceChannel::Visibility)
        .map(|hit| hit.position)
        .unwrap_or(far_end);

    // Short-circuit check: ничего не должно перекрывать линию ствол → цель
    let resolved = caster
        .cast(muzzle, candidate, TraceChannel::Visibility)
        .map(|hit| hit.position)
        .unwrap_or(candidate);

    Some(resolved)
}
