//! Headless демо IRONSIGHT
//!
//! Запускает Bevy App без рендера: скриптованный прогон контроллера
//! (бег → прицеливание → выстрелы → прыжок) с логом spread/FOV.

use bevy::prelude::*;
use ironsight_simulation::*;

fn main() {
    let mut app = create_headless_app();
    app.add_plugins(SimulationPlugin);
    // Демо-сцена: бесконечный пол на y=0
    app.insert_resource(RayCastService::new(GroundPlane { height: 0.0 }));

    // Startup (загрузка assets/controller.toml) должен отработать ДО того,
    // как персонаж захватит значения из конфига
    app.update();

    let config = app.world().resource::<ControllerConfig>().clone();
    let player = spawn_player_character(&mut app.world_mut().commands(), &config, Vec3::ZERO);

    logger::log_info("Starting IRONSIGHT headless demo (600 ticks at 60Hz)");

    for tick in 0..600u32 {
        match tick {
            // 1s: бежим вперёд
            60 => set_move_input(&mut app, player, 1.0),
            // 3s: останавливаемся и прицеливаемся
            180 => {
                set_move_input(&mut app, player, 0.0);
                app.world_mut().send_event(AimPressed { entity: player });
            }
            // 4s: два выстрела подряд (re-arm окна)
            240 | 242 => {
                app.world_mut().send_event(FirePressed { entity: player });
            }
            // 5s: отпускаем прицел и прыгаем
            300 => {
                app.world_mut().send_event(AimReleased { entity: player });
                app.world_mut().send_event(JumpPressed { entity: player });
            }
            _ => {}
        }

        app.update();

        if tick % 60 == 0 {
            log_state(&app, player, tick);
        }
    }

    logger::log_info("Demo complete");
}

fn set_move_input(app: &mut App, player: Entity, forward: f32) {
    if let Some(mut input) = app.world_mut().get_mut::<MoveInput>(player) {
        input.forward = forward;
    }
}

fn log_state(app: &App, player: Entity, tick: u32) {
    let world = app.world();
    let (Some(spread), Some(aim), Some(motion)) = (
        world.get::<CrosshairSpread>(player),
        world.get::<AimState>(player),
        world.get::<CharacterMotion>(player),
    ) else {
        return;
    };

    logger::log_info(&format!(
        "Tick {}: speed={:.0} fov={:.1} aiming={} spread={:.3}",
        tick,
        motion.ground_speed(),
        aim.current_fov,
        aim.is_aiming,
        spread.spread_multiplier()
    ));
}
