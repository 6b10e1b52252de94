//! Численные помощники для per-tick интерполяций.

/// Exponential smoothing: `value += (target - value) * clamp(rate * dt, 0, 1)`
///
/// Монотонная сходимость к target без overshoot. Fraction кламплен в [0, 1],
/// поэтому нулевой или отрицательный delta — no-op (total function).
pub fn interp_to(current: f32, target: f32, delta: f32, speed: f32) -> f32 {
    let alpha = (speed * delta).clamp(0.0, 1.0);
    current + (target - current) * alpha
}

/// Линейный remap `[in_min, in_max] → [out_min, out_max]` с клампом на обоих концах
pub fn map_range_clamped(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let t = ((value - in_min) / (in_max - in_min)).clamp(0.0, 1.0);
    out_min + (out_max - out_min) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interp_to_converges_monotonically() {
        let mut value = 0.0;
        let mut previous = value;

        // 100 тиков по 1/60 сек, rate 20/s
        for _ in 0..100 {
            value = interp_to(value, 1.0, 1.0 / 60.0, 20.0);
            assert!(value >= previous, "должно расти монотонно");
            assert!(value <= 1.0, "overshoot запрещён");
            previous = value;
        }

        assert!(value > 0.99);
    }

    #[test]
    fn test_interp_to_zero_delta_is_noop() {
        assert_eq!(interp_to(0.5, 1.0, 0.0, 20.0), 0.5);
        assert_eq!(interp_to(0.5, 1.0, -0.1, 20.0), 0.5); // отрицательный dt тоже no-op
    }

    #[test]
    fn test_interp_to_large_step_snaps_to_target() {
        // rate * dt >= 1 → кламп fraction, ровно target
        assert_eq!(interp_to(0.0, 2.25, 1.0, 30.0), 2.25);
    }

    #[test]
    fn test_map_range_clamped() {
        assert_eq!(map_range_clamped(0.0, 0.0, 600.0, 0.0, 1.0), 0.0);
        assert_eq!(map_range_clamped(300.0, 0.0, 600.0, 0.0, 1.0), 0.5);
        assert_eq!(map_range_clamped(600.0, 0.0, 600.0, 0.0, 1.0), 1.0);
        assert_eq!(map_range_clamped(1200.0, 0.0, 600.0, 0.0, 1.0), 1.0); // кламп сверху
        assert_eq!(map_range_clamped(-50.0, 0.0, 600.0, 0.0, 1.0), 0.0); // кламп снизу
    }
}
