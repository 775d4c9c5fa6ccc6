/// Entry point and game loop.

mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use wildlands::config::GameConfig;
use wildlands::sim::event::GameEvent;
use wildlands::sim::step;
use wildlands::sim::world::{Phase, WorldState};
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];

fn main() {
    // Logs go to stderr; run with `RUST_LOG=debug 2>wildlands.log` to keep
    // them off the game screen.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    let config = GameConfig::load();

    let mut world = match WorldState::new(config) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Could not create world: {e}");
            std::process::exit(1);
        }
    };

    let mut renderer = Renderer::new();
    let mut kb = InputState::new();

    match renderer.init() {
        Ok(enhanced) => kb.honor_release = enhanced,
        Err(e) => {
            eprintln!("Terminal init failed: {e}");
            return;
        }
    }

    let result = game_loop(&mut world, &mut renderer, &mut kb);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    let p = &world.player;
    println!();
    println!("Thanks for playing Wildlands!");
    println!("Level {} {}  ·  {} XP", p.level, wildlands::domain::progression::level_title(p.level), p.xp);
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    kb: &mut InputState,
) -> Result<(), Box<dyn std::error::Error>> {
    // One session clock, read once per frame.
    let clock = Instant::now();
    let tick_rate = Duration::from_millis(world.config.general.tick_rate_ms.max(1));
    let mut last_tick = clock;

    // The world was populated at t=0 by WorldState::new.
    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) {
            break;
        }

        let frame_start = Instant::now();
        let now_ms = frame_start.duration_since(clock).as_millis() as u64;

        if world.phase == Phase::GameOver && kb.any_pressed(KEYS_RESTART) {
            world.start_session(now_ms)?;
            last_tick = frame_start;
        }

        let elapsed = frame_start.duration_since(last_tick);
        if elapsed >= tick_rate {
            // Clamp long stalls (window drag, suspend) to a few frames.
            let dt_ms = (elapsed.as_secs_f32() * 1000.0).min(100.0);
            let events = step::step(world, kb.frame_input(), now_ms, dt_ms)?;
            announce(world, &events, now_ms);
            last_tick = frame_start;
        }

        renderer.render(world, now_ms)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Short status-line messages for notable events.
fn announce(world: &mut WorldState, events: &[GameEvent], now_ms: u64) {
    for event in events {
        match event {
            GameEvent::EnemyKilled { archetype, boss: true, xp, .. } => {
                let msg = format!("Boss {} slain! +{} XP", archetype.name(), xp * 2);
                world.set_message(&msg, now_ms, 2_000);
            }
            GameEvent::FoodEaten { heal, .. } => {
                world.set_message(&format!("Ate an apple (+{heal} HP)"), now_ms, 1_000);
            }
            _ => {}
        }
    }
}
