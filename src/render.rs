use crate::config::{SimConfig, UI_PANEL_WIDTH, WINDOW_HEIGHT};
use crate::game::Snapshot;
use crate::hero::Hero;
use crate::types::{PaletteColor, Point};
use macroquad::prelude::*;

// Conversion helpers
fn point_to_vec2(p: Point) -> Vec2 {
    Vec2::new(p.x as f32, p.y as f32)
}

fn palette_color(color: PaletteColor) -> Color {
    match color {
        PaletteColor::Red => RED,
        PaletteColor::Blue => BLUE,
        PaletteColor::Green => GREEN,
        PaletteColor::Yellow => YELLOW,
    }
}

fn faded_color(mut color: Color, alpha: f32) -> Color {
    color.a *= alpha;
    color
}

// Draws snapshots of the simulation using macroquad
pub struct Renderer {
    field_width: f32,
    field_height: f32,
    hero_radius: f32,
    evasion_buffer: f32,
}

impl Renderer {
    pub fn new(config: &SimConfig) -> Self {
        Renderer {
            field_width: config.field_width as f32,
            field_height: config.field_height as f32,
            hero_radius: config.hero_radius as f32,
            evasion_buffer: config.evasion_buffer as f32,
        }
    }

    pub fn draw_frame(&self, snapshot: &Snapshot) {
        clear_background(Color::from_rgba(12, 12, 24, 255));

        self.draw_field();
        if let Some(cursor) = snapshot.cursor {
            self.draw_evasion_ring(cursor);
        }
        for hero in &snapshot.heroes {
            self.draw_hero(hero, snapshot.selected_hero == Some(hero.index));
        }
        for projectile in &snapshot.projectiles {
            let pos = point_to_vec2(projectile.position);
            draw_circle(pos.x, pos.y, projectile.radius as f32, palette_color(projectile.color));
        }

        self.draw_ui_panel(snapshot);

        if !snapshot.running {
            self.draw_announcement("PAUSED");
        }
    }

    fn draw_field(&self) {
        draw_rectangle(0.0, 0.0, self.field_width, self.field_height, Color::from_rgba(24, 24, 40, 255));
        let mid = self.field_width / 2.0;
        draw_line(mid, 0.0, mid, self.field_height, 1.0, Color::from_rgba(60, 60, 100, 255));
        draw_rectangle_lines(0.0, 0.0, self.field_width, self.field_height, 2.0, DARKGRAY);
    }

    fn draw_evasion_ring(&self, cursor: Point) {
        let pos = point_to_vec2(cursor);
        if pos.x < 0.0 || pos.y < 0.0 || pos.x > self.field_width || pos.y > self.field_height {
            return;
        }
        draw_circle_lines(pos.x, pos.y, self.evasion_buffer, 1.0, faded_color(WHITE, 0.25));
    }

    fn draw_hero(&self, hero: &Hero, selected: bool) {
        let pos = point_to_vec2(hero.position);
        draw_circle(pos.x, pos.y, self.hero_radius, palette_color(hero.color));
        if selected {
            draw_circle_lines(pos.x, pos.y, self.hero_radius + 4.0, 2.0, GOLD);
        }
    }

    fn draw_ui_panel(&self, snapshot: &Snapshot) {
        let panel_x = self.field_width;
        let panel_width = UI_PANEL_WIDTH as f32;
        let padding = 12.0;
        let mut y = 28.0;

        draw_rectangle(panel_x, 0.0, panel_width, WINDOW_HEIGHT as f32, Color::from_rgba(20, 20, 50, 255));
        draw_text("HERO DUEL", panel_x + padding, y, 28.0, GOLD);
        y += 24.0;

        let status = if snapshot.running { "RUNNING" } else { "PAUSED" };
        draw_text(&format!("{}  tick {}", status, snapshot.tick), panel_x + padding, y, 16.0, LIGHTGRAY);
        y += 30.0;

        // --- Score Cards ---
        draw_text("SCORE", panel_x + padding, y, 20.0, WHITE);
        y += 8.0;
        for hero in &snapshot.heroes {
            let card_height = 28.0;
            let color = palette_color(hero.color);
            draw_rectangle(panel_x + padding, y, panel_width - 2.0 * padding, card_height, faded_color(color, 0.2));
            draw_rectangle_lines(panel_x + padding, y, panel_width - 2.0 * padding, card_height, 1.5, color);
            draw_text(
                &format!("Hero {}: {}", hero.index + 1, hero.score),
                panel_x + padding * 2.0,
                y + 19.0,
                18.0,
                WHITE,
            );
            y += card_height + 6.0;
        }
        y += 16.0;

        // --- Edit Panel ---
        if let Some(hero) = snapshot.selected_hero.and_then(|i| snapshot.heroes.get(i)) {
            draw_text(&format!("EDIT HERO {}", hero.index + 1), panel_x + padding, y, 20.0, GOLD);
            y += 22.0;
            let rows = [
                format!("Projectile: {}", hero.projectile_color.name()),
                format!("Fire interval: {} ms", hero.fire_interval_ms),
                format!("Speed: {} px/tick", hero.speed),
            ];
            for row in &rows {
                draw_text(row, panel_x + padding, y, 16.0, WHITE);
                y += 18.0;
            }
            y += 6.0;
            for (i, color) in PaletteColor::ALL.iter().enumerate() {
                let swatch_x = panel_x + padding + i as f32 * 28.0;
                draw_rectangle(swatch_x, y, 20.0, 20.0, palette_color(*color));
                draw_text(&format!("{}", i + 1), swatch_x + 6.0, y + 15.0, 16.0, BLACK);
            }
            y += 40.0;
        }

        // --- Key Help ---
        let help = [
            "A / L   fire hero 1 / 2",
            "SPACE   pause / resume",
            "Click   select hero",
            "1-4     projectile color",
            "UP/DOWN speed",
            "LEFT/RIGHT fire interval",
            "C       cancel edit",
            "ESC     quit",
        ];
        let help_top = (WINDOW_HEIGHT as f32 - help.len() as f32 * 16.0 - padding).max(y);
        for (i, line) in help.iter().enumerate() {
            draw_text(line, panel_x + padding, help_top + i as f32 * 16.0, 14.0, GRAY);
        }
    }

    fn draw_announcement(&self, msg: &str) {
        let rect_width = 300.0;
        let rect_height = 90.0;
        let x = self.field_width / 2.0 - rect_width / 2.0;
        let y = self.field_height / 2.0 - rect_height / 2.0;
        draw_rectangle(x, y, rect_width, rect_height, Color::from_rgba(0, 0, 0, 180));

        let font_size = 36;
        let dims = measure_text(msg, None, font_size, 1.0);
        let text_x = x + (rect_width - dims.width) / 2.0;
        let text_y = y + (rect_height + dims.offset_y) / 2.0;
        draw_text(msg, text_x, text_y, font_size as f32, WHITE);
    }

    pub fn window_should_close() -> bool {
        is_key_down(KeyCode::Escape) || is_quit_requested()
    }
}
