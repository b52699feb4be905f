use macroquad::file::load_string;
use macroquad::logging::{error, info, warn};
use macroquad::miniquad::conf::Platform;
use macroquad::prelude::*;

mod render;
mod sound;

use hero_platformer::config::GameConfig;
use hero_platformer::game::Game;
use hero_platformer::helpers::asset_path;
use hero_platformer::input::MacroquadInput;
use hero_platformer::level::LevelData;

use render::Atlas;
use sound::SoundSystem;

/// Longest step the simulation will take in one frame; a stall longer than
/// this slows the game down instead of tunnelling bodies through platforms.
const MAX_FRAME_TIME: f32 = 1.0 / 30.0;

fn window_conf() -> Conf {
    Conf {
        window_title: "hero_platformer".to_owned(),
        window_width: 960,
        window_height: 600,
        window_resizable: false,
        sample_count: 1,
        platform: Platform {
            linux_wm_class: "hero_platformer",
            ..Default::default()
        },
        ..Default::default()
    }
}

async fn show_loading(label: &str, progress: f32) {
    let pct = (progress.clamp(0.0, 1.0) * 100.0).round();
    let bar_w = screen_width() * 0.5;
    let bar_h = 12.0;
    let pos = vec2((screen_width() - bar_w) * 0.5, screen_height() * 0.5);

    set_default_camera();
    clear_background(BLACK);
    draw_rectangle_lines(pos.x, pos.y, bar_w, bar_h, 2.0, WHITE);
    draw_rectangle(pos.x, pos.y, bar_w * progress.clamp(0.0, 1.0), bar_h, WHITE);
    draw_text(&format!("{label} {pct:.0}%"), 20.0, 40.0, 30.0, WHITE);
    next_frame().await;
}

async fn load_config() -> Option<GameConfig> {
    let path = asset_path("config.yaml");
    let raw = match load_string(&path).await {
        Ok(raw) => raw,
        Err(err) => {
            warn!("{} not readable ({}), using built-in defaults", path, err);
            return Some(GameConfig::default());
        }
    };
    match GameConfig::from_yaml_str(&raw) {
        Ok(config) => Some(config),
        Err(err) => {
            error!("config load failed: {}", err);
            None
        }
    }
}

async fn load_levels(config: &GameConfig) -> Option<Vec<LevelData>> {
    let mut levels = Vec::with_capacity(config.level_count());
    for (index, file) in config.levels.iter().enumerate() {
        let progress = 0.1 + 0.3 * index as f32 / config.level_count() as f32;
        show_loading("Loading levels", progress).await;
        let path = asset_path(file);
        let raw = match load_string(&path).await {
            Ok(raw) => raw,
            Err(err) => {
                error!("level {} ({}) could not be read: {}", index, path, err);
                return None;
            }
        };
        match LevelData::from_json_str(&raw) {
            Ok(level) => levels.push(level),
            Err(err) => {
                error!("level {} ({}) is malformed: {}", index, path, err);
                return None;
            }
        }
    }
    Some(levels)
}

#[macroquad::main(window_conf)]
async fn main() {
    show_loading("Loading", 0.0).await;

    let Some(config) = load_config().await else {
        return;
    };
    let Some(levels) = load_levels(&config).await else {
        return;
    };

    show_loading("Loading images", 0.5).await;
    let atlas = Atlas::load(&config).await;

    show_loading("Loading sounds", 0.75).await;
    let sounds = SoundSystem::load_from("audio").await;

    let mut game = match Game::new(config, levels) {
        Ok(game) => game,
        Err(err) => {
            error!("game start failed: {}", err);
            return;
        }
    };
    info!("starting with {} levels", game.level_count());

    let mut input = MacroquadInput::new();
    let mut show_hitboxes = false;

    loop {
        let dt = get_frame_time().min(MAX_FRAME_TIME);

        if is_key_pressed(KeyCode::F1) {
            show_hitboxes = !show_hitboxes;
        }

        let snapshot = input.poll();
        if let Err(err) = game.tick(&snapshot, dt) {
            error!("level load failed: {}", err);
            break;
        }
        for event in game.drain_events() {
            sounds.handle(event);
        }

        render::draw_session(game.session(), &atlas, show_hitboxes);

        next_frame().await;
    }
}
