use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// display resolution in pixels
pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// a full frame of pixel states, row-major
pub type Grid = [[bool; WIDTH]; HEIGHT];

/// The 64x32 monochrome framebuffer sprites are XORed onto.
///
/// Draw coordinates wrap modulo the screen dimensions on both axes, so a
/// sprite pushed off one edge re-enters from the other. A dirty flag records
/// that pixels changed since the host last flushed a frame.
pub struct FrameBuffer {
    px: Grid,
    dirty: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            px: [[false; WIDTH]; HEIGHT],
            dirty: false,
        }
    }

    /// blank every pixel
    pub fn clear(&mut self) {
        self.px = [[false; WIDTH]; HEIGHT];
        self.dirty = true;
    }

    /// XOR a sprite onto the grid at (x0, y0), one byte per row, most
    /// significant bit leftmost. Returns true if any set pixel was turned
    /// off, which is the value the draw instruction leaves in VF.
    pub fn draw_sprite(&mut self, x0: u8, y0: u8, rows: &[u8]) -> bool {
        let mut collision = false;
        for (i, row) in rows.iter().enumerate() {
            let y = (y0 as usize + i) % HEIGHT;
            for j in 0..8 {
                if row & (0x80 >> j) == 0 {
                    continue;
                }
                let x = (x0 as usize + j) % WIDTH;
                if self.px[y][x] {
                    collision = true;
                }
                self.px[y][x] ^= true;
                self.dirty = true;
            }
        }
        collision
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.px[y][x]
    }

    /// copy of the grid for the host renderer
    pub fn snapshot(&self) -> Grid {
        self.px
    }

    /// read and reset the dirty flag in one go
    pub fn take_dirty(&mut self) -> bool {
        let d = self.dirty;
        self.dirty = false;
        d
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Screen is where the host flushes finished frames. It abstracts the
/// rendering details so a variety of kinds of screen would work.
pub trait Screen {
    fn blit(&mut self, grid: &Grid) -> Result<(), io::Error>;
}

/// monochrome terminal screen, rendered with TUI over crossterm
pub struct TermScreen {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TermScreen {
    pub fn new() -> Result<TermScreen, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(TermScreen { terminal })
    }
}

impl Screen for TermScreen {
    fn blit(&mut self, grid: &Grid) -> Result<(), io::Error> {
        // split the frame into lit and unlit point sets; painting both means
        // pixels that toggle off actually go dark between frames
        let mut lit = Vec::new();
        let mut unlit = Vec::new();
        for (y, row) in grid.iter().enumerate() {
            for (x, &on) in row.iter().enumerate() {
                let p = (x as f64, -(y as f64));
                if on {
                    lit.push(p);
                } else {
                    unlit.push(p);
                }
            }
        }

        // 1:1 between chip-8 pixels and terminal cells, plus the border
        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + WIDTH as u16, 2 + HEIGHT as u16);
            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("cosmac8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds([0.0, (WIDTH - 1) as f64])
                .y_bounds([-1.0 * (HEIGHT - 1) as f64, 0.0])
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &unlit,
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &lit,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// useful for running the machine without a terminal
pub struct NullScreen;

impl NullScreen {
    pub fn new() -> Self {
        NullScreen {}
    }
}

impl Screen for NullScreen {
    fn blit(&mut self, _grid: &Grid) -> Result<(), io::Error> {
        Ok(())
    }
}
