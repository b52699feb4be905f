use macroquad::logging::warn;
use macroquad::prelude::*;
use std::collections::HashMap;

use hero_platformer::config::{GameConfig, size_of};
use hero_platformer::entity::{COIN_SHEET, DECORATION_SHEET, DOOR_SHEET, KEY_SHEET, SPIDER_SHEET};
use hero_platformer::helpers::{draw_hitbox, load_single_texture, sheet_frame};
use hero_platformer::hero::HERO_SHEET;
use hero_platformer::r#trait::{Physical, Renderable, SpriteFrame};
use hero_platformer::session::{GameSession, RunState};

const BACKGROUND: &str = "background";
const ICON_COIN: &str = "icon:coin";
const ICON_KEY: &str = "icon:key";
const ICON_KEY_CELL: Vec2 = Vec2::new(34.0, 30.0);
const SCOREBOARD_ORIGIN: Vec2 = Vec2::new(10.0, 10.0);

/// Textures by sheet name, plus the cell size of every multi-frame sheet.
pub struct Atlas {
    textures: HashMap<String, Texture2D>,
    cells: HashMap<String, Vec2>,
}

impl Atlas {
    pub async fn load(config: &GameConfig) -> Self {
        let sizes = &config.sizes;
        let cells: HashMap<String, Vec2> = [
            (HERO_SHEET, sizes.hero),
            (SPIDER_SHEET, sizes.spider),
            (COIN_SHEET, sizes.coin),
            (DOOR_SHEET, sizes.door),
            (DECORATION_SHEET, sizes.decoration),
        ]
        .into_iter()
        .map(|(name, size)| (name.to_string(), size_of(size)))
        .chain([(ICON_KEY.to_string(), ICON_KEY_CELL)])
        .collect();

        let mut names: Vec<String> = [
            BACKGROUND,
            HERO_SHEET,
            SPIDER_SHEET,
            COIN_SHEET,
            KEY_SHEET,
            DOOR_SHEET,
            DECORATION_SHEET,
            ICON_COIN,
            ICON_KEY,
        ]
        .iter()
        .map(|name| name.to_string())
        .collect();
        names.extend(config.platform_images.keys().cloned());

        let mut textures = HashMap::new();
        for name in names {
            // "grass:8x1" lives in grass_8x1.png
            let file = name.replace(':', "_");
            match load_single_texture("images", &file).await {
                Some(texture) => {
                    textures.insert(name, texture);
                }
                None => warn!("texture '{}' missing, drawing placeholder", name),
            }
        }

        Self { textures, cells }
    }

    fn draw_sprite(&self, sprite: &SpriteFrame<'_>) {
        let tint = Color::new(1.0, 1.0, 1.0, sprite.alpha);
        let Some(texture) = self.textures.get(sprite.sheet) else {
            let mut color = placeholder_color(sprite.sheet);
            color.a *= sprite.alpha;
            draw_rectangle(sprite.dest.x, sprite.dest.y, sprite.dest.w, sprite.dest.h, color);
            return;
        };
        let source = self
            .cells
            .get(sprite.sheet)
            .map(|cell| sheet_frame(texture.size(), *cell, sprite.frame));
        draw_texture_ex(
            texture,
            sprite.dest.x,
            sprite.dest.y,
            tint,
            DrawTextureParams {
                dest_size: Some(vec2(sprite.dest.w, sprite.dest.h)),
                source,
                flip_x: sprite.flip_x,
                ..Default::default()
            },
        );
    }

    fn draw(&self, item: &impl Renderable) {
        if let Some(sprite) = item.sprite() {
            self.draw_sprite(&sprite);
        }
    }
}

fn placeholder_color(sheet: &str) -> Color {
    match sheet {
        HERO_SHEET => Color::from_hex(0x3a7bd5),
        SPIDER_SHEET => Color::from_hex(0x7b2d26),
        COIN_SHEET => GOLD,
        KEY_SHEET => ORANGE,
        DOOR_SHEET => BROWN,
        DECORATION_SHEET => Color::from_hex(0x5d8a3a),
        _ => Color::from_hex(0x4e9a06),
    }
}

pub fn draw_session(session: &GameSession, atlas: &Atlas, show_hitboxes: bool) {
    let world = session.world();

    match atlas.textures.get(BACKGROUND) {
        Some(texture) => draw_texture(texture, 0.0, 0.0, WHITE),
        None => clear_background(Color::from_hex(0x9bd4f5)),
    }

    for platform in &world.platforms {
        atlas.draw(platform);
    }
    atlas.draw(&world.door);
    atlas.draw(&world.key);
    for deco in &world.decorations {
        atlas.draw(deco);
    }
    for coin in &world.coins {
        atlas.draw(coin);
    }
    for spider in &world.spiders {
        atlas.draw(spider);
    }
    atlas.draw(&world.hero);

    if show_hitboxes {
        for wall in &world.enemy_walls {
            draw_hitbox(wall.rect, RED);
        }
        for spider in &world.spiders {
            draw_hitbox(spider.body().rect(), MAGENTA);
        }
        if world.hero.exists() {
            draw_hitbox(world.hero.body().rect(), YELLOW);
        }
    }

    draw_scoreboard(session.run(), atlas);

    let fade = session.screen_fade();
    if fade > 0.0 {
        draw_rectangle(0.0, 0.0, screen_width(), screen_height(), Color::new(0.0, 0.0, 0.0, fade));
    }
}

fn draw_scoreboard(run: &RunState, atlas: &Atlas) {
    let origin = SCOREBOARD_ORIGIN;
    atlas.draw_sprite(&SpriteFrame {
        sheet: ICON_KEY,
        frame: if run.has_key { 1 } else { 0 },
        dest: Rect::new(origin.x, origin.y + 4.0, ICON_KEY_CELL.x, ICON_KEY_CELL.y),
        flip_x: false,
        alpha: 1.0,
    });

    let coin_x = origin.x + ICON_KEY_CELL.x + 7.0;
    let coin_size = atlas
        .textures
        .get(ICON_COIN)
        .map(|t| t.size())
        .unwrap_or(vec2(22.0, 22.0));
    atlas.draw_sprite(&SpriteFrame {
        sheet: ICON_COIN,
        frame: 0,
        dest: Rect::new(coin_x, origin.y + 4.0, coin_size.x, coin_size.y),
        flip_x: false,
        alpha: 1.0,
    });

    draw_text(
        &format!("x{}", run.coin_count),
        coin_x + coin_size.x + 4.0,
        origin.y + 4.0 + coin_size.y,
        32.0,
        WHITE,
    );
}
