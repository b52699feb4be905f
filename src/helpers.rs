use macroquad::prelude::*;

pub const ASSET_ROOT: &str = "assets";

pub fn asset_path(relative: &str) -> String {
    format!("{ASSET_ROOT}/{relative}")
}

pub async fn load_single_texture(dir: &str, name: &str) -> Option<Texture2D> {
    let path = asset_path(&format!("{dir}/{name}.png"));
    let texture = load_texture(&path).await.ok()?;
    texture.set_filter(FilterMode::Nearest);
    Some(texture)
}

pub fn draw_hitbox(hitbox: Rect, color: Color) {
    draw_rectangle_lines(hitbox.x, hitbox.y, hitbox.w, hitbox.h, 1.0, color);
}

/// Source rectangle of `frame` in a sheet laid out left-to-right, top-to-bottom
/// in cells of `cell` size.
pub fn sheet_frame(sheet_size: Vec2, cell: Vec2, frame: usize) -> Rect {
    let columns = ((sheet_size.x / cell.x.max(1.0)).floor() as usize).max(1);
    let col = frame % columns;
    let row = frame / columns;
    Rect::new(col as f32 * cell.x, row as f32 * cell.y, cell.x, cell.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_paths_are_rooted() {
        assert_eq!(asset_path("data/level00.json"), "assets/data/level00.json");
    }

    #[test]
    fn sheet_frames_wrap_rows() {
        let sheet = vec2(108.0, 84.0);
        let cell = vec2(36.0, 42.0);
        assert_eq!(sheet_frame(sheet, cell, 0), Rect::new(0.0, 0.0, 36.0, 42.0));
        assert_eq!(sheet_frame(sheet, cell, 2), Rect::new(72.0, 0.0, 36.0, 42.0));
        assert_eq!(sheet_frame(sheet, cell, 4), Rect::new(36.0, 42.0, 36.0, 42.0));
    }
}
