use crate::game::{Game, Phase};
use crate::model::{GROUND_Y, PAD_HEIGHT, SCREEN_H, SCREEN_W};
use crate::scenery::Scenery;
use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
            bold: false,
        }
    }
}

pub struct CellBuffer {
    pub w: u16,
    pub h: u16,
    pub cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub fn clear(&mut self, bg: Color) {
        for c in &mut self.cells {
            *c = Cell { bg, ..Cell::default() };
        }
    }

    /// Text of row `y`, for inspection.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.h {
            return String::new();
        }
        let start = self.idx(0, y);
        self.cells[start..start + self.w as usize]
            .iter()
            .map(|c| c.ch)
            .collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Anything non-zero is ink.
    pub a: u8,
}

impl Pixel {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

const WHITE: Pixel = Pixel::rgb(255, 255, 255);
const GRAY: Pixel = Pixel::rgb(150, 150, 150);
const DARK_GRAY: Pixel = Pixel::rgb(50, 50, 50);
const RED: Pixel = Pixel::rgb(255, 0, 0);
const ORANGE: Pixel = Pixel::rgb(255, 165, 0);
const GREEN: Pixel = Pixel::rgb(0, 255, 0);
const BLUE: Pixel = Pixel::rgb(60, 90, 255);

/// Subpixel canvas (2×4 per cell) addressed in world coordinates.
pub struct PixelCanvas {
    pub w: u32,
    pub h: u32,
    pub px: Vec<Pixel>,
    sx: f64,
    sy: f64,
}

impl PixelCanvas {
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            px: vec![Pixel::default(); (w as usize) * (h as usize)],
            sx: w as f64 / SCREEN_W,
            sy: h as f64 / SCREEN_H,
        }
    }
    pub fn for_cells(cols: u16, rows: u16) -> Self {
        Self::new(cols as u32 * 2, rows as u32 * 4)
    }
    pub fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub fn clear(&mut self) {
        self.px.fill(Pixel::default());
    }

    fn plot(&mut self, x: i64, y: i64, p: Pixel) {
        if x < 0 || y < 0 || x >= self.w as i64 || y >= self.h as i64 {
            return;
        }
        let i = self.idx(x as u32, y as u32);
        self.px[i] = p;
    }

    fn to_canvas(&self, wx: f64, wy: f64) -> (i64, i64) {
        ((wx * self.sx).floor() as i64, (wy * self.sy).floor() as i64)
    }

    /// Canvas span covering world `[a, a + len)`, never empty.
    fn span(a: f64, len: f64, scale: f64) -> (i64, i64) {
        let lo = (a * scale).floor() as i64;
        let hi = ((a + len) * scale).ceil() as i64;
        (lo, hi.max(lo + 1))
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, p: Pixel) {
        let (x0, x1) = Self::span(x, w, self.sx);
        let (y0, y1) = Self::span(y, h, self.sy);
        for py in y0..y1 {
            for px in x0..x1 {
                self.plot(px, py, p);
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, p: Pixel) {
        let (x0, x1) = Self::span(cx - r, 2.0 * r, self.sx);
        let (y0, y1) = Self::span(cy - r, 2.0 * r, self.sy);
        let mut any = false;
        for py in y0..y1 {
            for px in x0..x1 {
                let wx = (px as f64 + 0.5) / self.sx - cx;
                let wy = (py as f64 + 0.5) / self.sy - cy;
                if wx * wx + wy * wy <= r * r {
                    self.plot(px, py, p);
                    any = true;
                }
            }
        }
        // too small to cover a subpixel centre
        if !any {
            let (px, py) = self.to_canvas(cx, cy);
            self.plot(px, py, p);
        }
    }

    pub fn fill_triangle(&mut self, a: (f64, f64), b: (f64, f64), c: (f64, f64), p: Pixel) {
        let edge = |p0: (f64, f64), p1: (f64, f64), q: (f64, f64)| {
            (p1.0 - p0.0) * (q.1 - p0.1) - (p1.1 - p0.1) * (q.0 - p0.0)
        };
        let min_x = a.0.min(b.0).min(c.0);
        let max_x = a.0.max(b.0).max(c.0);
        let min_y = a.1.min(b.1).min(c.1);
        let max_y = a.1.max(b.1).max(c.1);
        let (x0, x1) = Self::span(min_x, max_x - min_x, self.sx);
        let (y0, y1) = Self::span(min_y, max_y - min_y, self.sy);

        let mut any = false;
        for py in y0..y1 {
            for px in x0..x1 {
                let q = ((px as f64 + 0.5) / self.sx, (py as f64 + 0.5) / self.sy);
                let (e0, e1, e2) = (edge(a, b, q), edge(b, c, q), edge(c, a, q));
                let inside = (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0)
                    || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0);
                if inside {
                    self.plot(px, py, p);
                    any = true;
                }
            }
        }
        if !any {
            let (px, py) = self.to_canvas((a.0 + b.0 + c.0) / 3.0, (a.1 + b.1 + c.1) / 3.0);
            self.plot(px, py, p);
        }
    }
}

pub struct Terminal {
    pub out: io::Stdout,
    pub cols: u16,
    pub rows: u16,
    pub prev: CellBuffer,
    pub cur: CellBuffer,
    pub canvas: PixelCanvas,
    /// Terminal sends key release events.
    pub reports_release: bool,
}

impl Terminal {
    pub fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let reports_release = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if reports_release {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }

        let (cols, rows) = terminal::size()?;
        log::info!(
            "terminal {}x{}, key release events: {}",
            cols,
            rows,
            reports_release
        );

        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            canvas: PixelCanvas::for_cells(cols, rows),
            reports_release,
        })
    }

    pub fn end(&mut self) -> anyhow::Result<()> {
        if self.reports_release {
            queue!(self.out, PopKeyboardEnhancementFlags)?;
        }
        queue!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        self.canvas = PixelCanvas::for_cells(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    pub fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_bold = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if diff_only && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_bold != Some(c.bold) {
                    let attr = if c.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    };
                    queue!(self.out, SetAttribute(attr))?;
                    last_bold = Some(c.bold);
                }
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Braille encoding: 2×4 pixels -> U+2800..U+28FF
------------------------------ */

fn braille_bit(dx: u32, dy: u32) -> u8 {
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

pub fn canvas_to_cells(canvas: &PixelCanvas, out: &mut CellBuffer, enable_color: bool, bg: Color) {
    let cols = out.w as u32;
    let rows = out.h as u32;

    for cy in 0..rows {
        for cx in 0..cols {
            let mut mask: u8 = 0;
            let (mut sum_r, mut sum_g, mut sum_b) = (0u32, 0u32, 0u32);
            let mut ink: u32 = 0;

            for dy in 0..4 {
                for dx in 0..2 {
                    let (x, y) = (cx * 2 + dx, cy * 4 + dy);
                    if x >= canvas.w || y >= canvas.h {
                        continue;
                    }
                    let p = canvas.px[canvas.idx(x, y)];
                    if p.a > 0 {
                        mask |= braille_bit(dx, dy);
                        sum_r += p.r as u32;
                        sum_g += p.g as u32;
                        sum_b += p.b as u32;
                        ink += 1;
                    }
                }
            }

            if mask == 0 {
                continue;
            }
            let ch = char::from_u32(0x2800 + mask as u32).unwrap_or(' ');
            let fg = if enable_color {
                Color::Rgb {
                    r: (sum_r / ink) as u8,
                    g: (sum_g / ink) as u8,
                    b: (sum_b / ink) as u8,
                }
            } else {
                Color::White
            };

            out.set(cx as u16, cy as u16, Cell { ch, fg, bg, bold: false });
        }
    }
}

/* -----------------------------
   Scene
------------------------------ */

fn draw_scenery(canvas: &mut PixelCanvas, s: &Scenery) {
    for &(x, y) in &s.stars {
        canvas.fill_circle(x, y, 1.0, WHITE);
    }
    canvas.fill_circle(s.moon_x, s.moon_y, s.moon_radius, GRAY);
    for c in &s.craters {
        let (x, y) = (s.moon_x + c.dx, s.moon_y + c.dy);
        canvas.fill_circle(x, y, c.radius, DARK_GRAY);
        canvas.fill_circle(x + 1.0, y + 1.0, (c.radius - 2.0).max(1.0), GRAY);
    }
}

/// Sprite is drawn from the craft's top-left corner; the left leg hangs
/// outside the collision box.
fn draw_lander(canvas: &mut PixelCanvas, x: f64, y: f64, thrusting: bool) {
    canvas.fill_rect(x, y, 20.0, 30.0, WHITE);

    canvas.fill_rect(x - 10.0, y + 30.0, 5.0, 10.0, WHITE);
    canvas.fill_rect(x - 15.0, y + 40.0, 10.0, 3.0, WHITE);

    canvas.fill_rect(x + 25.0, y + 30.0, 5.0, 10.0, WHITE);
    canvas.fill_rect(x + 25.0, y + 40.0, 10.0, 3.0, WHITE);

    canvas.fill_rect(x + 5.0, y + 5.0, 10.0, 10.0, GRAY);

    if thrusting {
        canvas.fill_rect(x + 5.0, y + 30.0, 10.0, 5.0, RED);
        canvas.fill_triangle(
            (x + 5.0, y + 35.0),
            (x + 10.0, y + 45.0),
            (x + 15.0, y + 35.0),
            ORANGE,
        );
    }
}

const WIND_ARROW_X: f64 = SCREEN_W - 100.0;
const WIND_ARROW_Y: f64 = 180.0;

pub fn wind_arrow_length(wind: f64) -> f64 {
    (wind.abs() * 1000.0).clamp(10.0, 50.0)
}

fn draw_wind_indicator(canvas: &mut PixelCanvas, wind: f64) {
    if wind == 0.0 {
        canvas.fill_circle(WIND_ARROW_X, WIND_ARROW_Y, 5.0, BLUE);
        return;
    }
    let len = wind_arrow_length(wind);
    let dir = wind.signum();
    let tip = WIND_ARROW_X + len * dir;
    let (lo, hi) = if dir > 0.0 {
        (WIND_ARROW_X, tip)
    } else {
        (tip, WIND_ARROW_X)
    };
    canvas.fill_rect(lo, WIND_ARROW_Y - 1.5, hi - lo, 3.0, BLUE);
    canvas.fill_triangle(
        (tip, WIND_ARROW_Y),
        (WIND_ARROW_X + (len - 10.0) * dir, WIND_ARROW_Y - 5.0),
        (WIND_ARROW_X + (len - 10.0) * dir, WIND_ARROW_Y + 5.0),
        BLUE,
    );
}

pub fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, text: &str, fg: Color, bold: bool) {
    for (i, ch) in text.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w {
            break;
        }
        buf.set(
            xx,
            y,
            Cell {
                ch,
                fg,
                bg: Color::Black,
                bold,
            },
        );
    }
}

fn draw_text_right(buf: &mut CellBuffer, y: u16, text: &str, fg: Color) {
    let len = text.chars().count() as u16;
    let x = buf.w.saturating_sub(len + 1);
    draw_text(buf, x, y, text, fg, false);
}

fn draw_text_centered(buf: &mut CellBuffer, y: u16, text: &str, fg: Color, bold: bool) {
    let len = text.chars().count() as u16;
    let x = buf.w.saturating_sub(len) / 2;
    draw_text(buf, x, y, text, fg, bold);
}

pub fn fuel_color(percent: f64) -> Color {
    if percent > 50.0 {
        Color::Green
    } else if percent > 25.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Banner and prompt for a finished attempt.
pub fn overlay_text(game: &Game) -> Option<(&'static str, &'static str, Color)> {
    match game.phase() {
        Phase::Playing => None,
        Phase::GameOver => Some((
            "GAME OVER",
            "Press SPACE to Play Again or Q to Quit",
            Color::Red,
        )),
        Phase::Crashed => Some(("You Died!", "Press SPACE to Continue", Color::Red)),
        Phase::Landed if game.has_won() => {
            Some(("You Win!", "Press SPACE to Play Again", Color::Green))
        }
        Phase::Landed => Some(("Level Complete!", "Press SPACE to Continue", Color::Green)),
    }
}

/// Draw the whole frame into `cur`, using `canvas` as scratch.
pub fn compose(
    cur: &mut CellBuffer,
    canvas: &mut PixelCanvas,
    game: &Game,
    scenery: &Scenery,
    enable_color: bool,
) {
    let bg = Color::Black;
    cur.clear(bg);
    canvas.clear();

    let level = game.level();
    let craft = game.craft();

    draw_scenery(canvas, scenery);
    draw_lander(canvas, craft.pos.x, craft.pos.y, game.thrusting());
    canvas.fill_rect(craft.pad_x, GROUND_Y, level.pad_width, PAD_HEIGHT, GREEN);
    draw_wind_indicator(canvas, level.wind_accel);

    canvas_to_cells(canvas, cur, enable_color, bg);

    let color = |c: Color| if enable_color { c } else { Color::White };

    draw_text(
        cur,
        1,
        0,
        &format!("Velocity: {:.2}", craft.speed()),
        Color::White,
        false,
    );
    let fuel = craft.fuel_percent(level);
    draw_text(
        cur,
        1,
        1,
        &format!("Fuel: {:.1}%", fuel),
        color(fuel_color(fuel)),
        false,
    );
    draw_text_right(cur, 0, &format!("Level: {}", game.level_index() + 1), Color::White);
    draw_text_right(cur, 1, &format!("Lives: {}", game.lives()), Color::White);

    // wind label sits under the arrow
    let wind_label = format!("Wind: {:.3}", level.wind_accel.abs());
    let label_x = ((SCREEN_W - 150.0) / SCREEN_W * cur.w as f64) as u16;
    let label_y = ((WIND_ARROW_Y + 20.0) / SCREEN_H * cur.h as f64) as u16;
    draw_text(cur, label_x, label_y, &wind_label, color(Color::Blue), false);

    if let Some((title, prompt, title_color)) = overlay_text(game) {
        let mid = cur.h / 2;
        draw_text_centered(cur, mid.saturating_sub(2), title, color(title_color), true);
        draw_text_centered(cur, mid + 2, prompt, Color::White, false);
    }
}
