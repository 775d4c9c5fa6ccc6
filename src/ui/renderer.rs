/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Every world cell is two terminal columns wide so emoji line up.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use wildlands::domain::entity::EffectKind;
use wildlands::domain::progression;
use wildlands::domain::terrain::Terrain;
use wildlands::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 16],  // up to 16 bytes (emoji with variation selectors)
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // true = this glyph occupies 2 terminal columns
    cont: bool,    // true = right half of the previous wide glyph (skip render)
}

impl Cell {
    /// Explicit dark background for every "empty" terminal cell, so the
    /// gaps between rows match the cells on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    /// Sentinel used to invalidate the back buffer: differs from any real cell.
    const INVALID: Cell = Cell {
        ch: [b'?', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    fn cont(bg: Color) -> Self {
        Cell { ch: [0; 16], ch_len: 0, fg: Color::White, bg, wide: false, cont: true }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        cell.ch_len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.fg = fg;
        cell.bg = bg;
        cell
    }

    /// A wide cell from a (possibly multi-codepoint) emoji string.
    fn from_str_wide(s: &str, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let bytes = s.as_bytes();
        let mut len = bytes.len().min(cell.ch.len());
        while !s.is_char_boundary(len) { len -= 1; }
        cell.ch[..len].copy_from_slice(&bytes[..len]);
        cell.ch_len = len as u8;
        cell.fg = fg;
        cell.bg = bg;
        cell.wide = true;
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or("?")
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn bg_at(&self, x: usize, y: usize) -> Color {
        self.get(x, y).bg
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::from_char(ch, fg, bg));
        }
    }

    /// Place an emoji on a 2-column world cell, keeping the existing background.
    fn put_glyph(&mut self, col: usize, row: usize, glyph: &str, fg: Color) {
        if col + 1 >= self.width || row >= self.height { return; }
        let bg = self.bg_at(col, row);
        self.set(col, row, Cell::from_str_wide(glyph, fg, bg));
        self.set(col + 1, row, Cell::cont(bg));
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::from_char(' ', Color::White, bg));
        }
    }
}

// ── Renderer ──

/// Each world cell = 2 terminal columns.
const CELL_W: usize = 2;

/// Vertical layout
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const PLAYER_GLYPH: &str = "🧍";
const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const BAR_WIDTH: usize = 20;

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}

/// `[██████░░░░]` style gauge.
fn gauge(value: f32, max: f32, width: usize) -> String {
    let frac = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
    let filled = (frac * width as f32).round() as usize;
    let mut s = String::with_capacity(width * 3 + 2);
    s.push('[');
    s.extend(std::iter::repeat('█').take(filled));
    s.extend(std::iter::repeat('░').take(width - filled));
    s.push(']');
    s
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    enhanced_keys: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            enhanced_keys: false,
        }
    }

    /// Enter raw mode and the alternate screen. Returns true when the
    /// terminal will report key releases.
    pub fn init(&mut self) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced_keys = true;
        }

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);

        Ok(self.enhanced_keys)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.enhanced_keys {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &mut WorldState, now_ms: u64) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Viewport = terminal minus HUD, message and help rows.
        let (world_w, world_h) = (world.terrain.width(), world.terrain.height());
        let reserved_rows = MAP_ROW + 3;
        world.camera.view_w = (self.term_w / CELL_W).min(world_w);
        world.camera.view_h = self.term_h.saturating_sub(reserved_rows).max(1).min(world_h);

        let (px, py) = (world.player.x as usize, world.player.y as usize);
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
            world.camera.center_on(px, py, world_w, world_h);
        } else {
            world.camera.follow(px, py, world_w, world_h);
        }

        self.front.clear();
        self.compose_game(world, now_ms);
        if world.phase == Phase::GameOver {
            self.compose_game_over(world);
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colours; ResetColor would fall back to the
        // terminal default and leave seams between rows.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, w: &WorldState, now_ms: u64) {
        self.compose_hud(w);
        self.compose_terrain(w);
        self.compose_entities(w, now_ms);

        let cam = &w.camera;
        let msg_row = MAP_ROW + cam.view_h;
        if msg_row < self.front.height && !w.message.is_empty() {
            let bg = Color::Rgb { r: 200, g: 180, b: 50 };
            self.front.fill_row(msg_row, bg);
            self.front.put_str(1, msg_row, &w.message, Color::Black, bg);
        }

        let help_row = MAP_ROW + cam.view_h + 1;
        if help_row < self.front.height {
            let help = " Arrows/WASD:Move  Shift/Tab:Sprint  F:Attack  .:Wait  Q/Esc:Quit";
            self.front.put_str(0, help_row, help, Color::DarkGrey, Cell::BASE_BG);
        }
    }

    fn compose_hud(&mut self, w: &WorldState) {
        let p = &w.player;
        let max_hp = w.max_health();
        let xp_per_level = w.config.progression.xp_per_level;
        let next = if p.level >= w.config.progression.max_level {
            "MAX".to_string()
        } else {
            (p.level * xp_per_level).to_string()
        };

        self.front.fill_row(HUD_ROW, HUD_BG);
        let hp = format!(" HP {} {:>3}/{:<3}", gauge(p.health as f32, max_hp as f32, BAR_WIDTH), p.health, max_hp);
        let st = format!(" ST {} {:>3.0}", gauge(p.stamina, w.config.player.max_stamina, BAR_WIDTH / 2), p.stamina);
        let lv = format!("  Lv{} {}  XP {}/{}", p.level, progression::level_title(p.level), p.xp, next);

        let hp_fg = if p.health * 4 <= max_hp { Color::Rgb { r: 255, g: 80, b: 80 } } else { Color::Rgb { r: 120, g: 230, b: 120 } };
        let mut x = 0;
        self.front.put_str(x, HUD_ROW, &hp, hp_fg, HUD_BG);
        x += hp.chars().count();
        self.front.put_str(x, HUD_ROW, &st, Color::Rgb { r: 255, g: 220, b: 80 }, HUD_BG);
        x += st.chars().count();
        self.front.put_str(x, HUD_ROW, &lv, Color::White, HUD_BG);
    }

    /// Terrain colours, plus glyphs for mountains and forest.
    fn compose_terrain(&mut self, w: &WorldState) {
        let cam = &w.camera;
        for vy in 0..cam.view_h {
            let row = MAP_ROW + vy;
            if row >= self.front.height { break; }
            for vx in 0..cam.view_w {
                let col = vx * CELL_W;
                if col + 1 >= self.front.width { break; }

                let (wx, wy) = (cam.x + vx as i32, cam.y + vy as i32);
                let terrain = if wx >= 0 && wy >= 0 {
                    w.terrain.get(wx as usize, wy as usize)
                } else {
                    None
                };
                let Some(terrain) = terrain else {
                    self.front.set(col, row, Cell::BLANK);
                    self.front.set(col + 1, row, Cell::BLANK);
                    continue;
                };

                let meta = terrain.meta();
                let bg = rgb(meta.background);
                match terrain {
                    Terrain::Mountain | Terrain::Forest => {
                        self.front.set(col, row, Cell::from_str_wide(meta.symbol, Color::White, bg));
                        self.front.set(col + 1, row, Cell::cont(bg));
                    }
                    Terrain::Grass | Terrain::Water => {
                        self.front.set(col, row, Cell::from_char(' ', Color::White, bg));
                        self.front.set(col + 1, row, Cell::from_char(' ', Color::White, bg));
                    }
                }
            }
        }
    }

    /// Food, then enemies, then the player, then effects on top.
    fn compose_entities(&mut self, w: &WorldState, now_ms: u64) {
        let cam = &w.camera;
        let to_screen = |x: f32, y: f32| {
            cam.world_to_view(x.floor() as i32, y.floor() as i32)
                .map(|(vx, vy)| (vx * CELL_W, MAP_ROW + vy))
        };

        for food in &w.foods {
            if let Some((col, row)) = to_screen(food.x, food.y) {
                self.front.put_glyph(col, row, food.symbol, Color::White);
            }
        }
        for enemy in &w.enemies {
            if let Some((col, row)) = to_screen(enemy.x, enemy.y) {
                let fg = if enemy.boss { Color::Red } else { Color::White };
                self.front.put_glyph(col, row, enemy.symbol(), fg);
            }
        }

        let player_cell = to_screen(w.player.x, w.player.y);
        if let Some((col, row)) = player_cell {
            if w.player.alive {
                self.front.put_glyph(col, row, PLAYER_GLYPH, Color::White);
            }
        }

        for fx in &w.effects {
            if fx.is_expired(now_ms) { continue; }
            match fx.kind {
                EffectKind::PlayerHit => {
                    // Flash the player's cell background while fresh.
                    let Some((col, row)) = player_cell else { continue };
                    if fx.progress(now_ms) >= 0.5 { continue; }
                    let flash = fx.color.map(rgb).unwrap_or(Color::Red);
                    let (left, right) = (self.front.get(col, row), self.front.get(col + 1, row));
                    self.front.set(col, row, Cell { bg: flash, ..left });
                    self.front.set(col + 1, row, Cell { bg: flash, ..right });
                }
                EffectKind::Hit | EffectKind::Swing => {
                    if let Some((col, row)) = to_screen(fx.x, fx.y) {
                        let fg = fx.color.map(rgb).unwrap_or(Color::White);
                        self.front.put_glyph(col, row, fx.symbol, fg);
                    }
                }
            }
        }
    }

    fn compose_game_over(&mut self, w: &WorldState) {
        let cam = &w.camera;
        let view_cols = (cam.view_w * CELL_W).min(self.front.width);
        let box_w = 36_usize.min(view_cols);
        let box_h = 9_usize.min(cam.view_h);
        let box_x = view_cols.saturating_sub(box_w) / 2;
        let box_y = MAP_ROW + cam.view_h.saturating_sub(box_h) / 2;

        let dim = Color::Rgb { r: 30, g: 30, b: 40 };
        for y in box_y..box_y + box_h {
            for x in box_x..box_x + box_w {
                self.front.set(x, y, Cell::from_char(' ', Color::White, dim));
            }
        }

        let red = Color::Rgb { r: 255, g: 60, b: 60 };
        let green = Color::Rgb { r: 80, g: 255, b: 80 };
        let p = &w.player;
        self.front.put_str(box_x + 2, box_y + 1, "YOU DIED", red, dim);
        let reached = format!("Reached level {} ({})", p.level, progression::level_title(p.level));
        let xp = format!("Total XP: {}", p.xp);
        self.front.put_str(box_x + 2, box_y + 3, &reached, Color::White, dim);
        self.front.put_str(box_x + 2, box_y + 4, &xp, Color::White, dim);
        self.front.put_str(box_x + 2, box_y + 6, "R: Restart", green, dim);
        self.front.put_str(box_x + 2, box_y + 7, "Q/Esc: Quit", Color::DarkGrey, dim);
    }
}
