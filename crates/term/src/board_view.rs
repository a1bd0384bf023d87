//! BoardView: maps a [`DisplayBoard`] into a terminal framebuffer.
//!
//! Pure (no I/O), so it can be unit-tested.

use crate::core::PieceCatalog;
use crate::display_board::DisplayBoard;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::Point;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Status shown to the right of the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackStatus {
    pub clears: u32,
    pub pieces: u32,
}

const BACKGROUND: Rgb = Rgb::new(30, 30, 40);

pub struct BoardView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for BoardView {
    fn default() -> Self {
        // 2x1 roughly squares up typical terminal glyphs.
        Self { cell_w: 2, cell_h: 1 }
    }
}

impl BoardView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self { cell_w, cell_h }
    }

    /// Frame size (board plus border) in terminal cells.
    pub fn frame_size<C: PieceCatalog>(&self, board: &DisplayBoard<C>) -> (u16, u16) {
        let size = board.size();
        (
            (size.width.max(0) as u16) * self.cell_w + 2,
            (size.height.max(0) as u16) * self.cell_h + 2,
        )
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into<C: PieceCatalog>(
        &self,
        board: &DisplayBoard<C>,
        status: Option<&PlaybackStatus>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let (frame_w, frame_h) = self.frame_size(board);
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        let size = board.size();
        for y in 0..size.height {
            for x in 0..size.width {
                let (ch, style) = match board.color_at(Point::new(x, y)) {
                    Some(color) => ('█', CellStyle { bold: true, ..CellStyle::new(color, BACKGROUND) }),
                    None => ('·', CellStyle { dim: true, ..CellStyle::new(Rgb::new(90, 90, 100), BACKGROUND) }),
                };
                let px = start_x + 1 + x as u16 * self.cell_w;
                let py = start_y + 1 + y as u16 * self.cell_h;
                fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
            }
        }

        if let Some(status) = status {
            self.draw_status(fb, viewport, start_x + frame_w + 2, start_y, status);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render<C: PieceCatalog>(
        &self,
        board: &DisplayBoard<C>,
        status: Option<&PlaybackStatus>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(board, status, viewport, &mut fb);
        fb
    }

    fn draw_status(
        &self,
        fb: &mut FrameBuffer,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
        status: &PlaybackStatus,
    ) {
        if panel_x.saturating_add(8) > viewport.width {
            return;
        }
        let label = CellStyle { bold: true, ..CellStyle::default() };
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        fb.put_str(panel_x, start_y, "CLEARS", label);
        fb.put_str(panel_x, start_y + 1, &status.clears.to_string(), value);
        fb.put_str(panel_x, start_y + 3, "PIECES", label);
        fb.put_str(panel_x, start_y + 4, &status.pieces.to_string(), value);
        fb.put_str(panel_x, start_y + 6, "q quit", CellStyle { dim: true, ..value });
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }
    let (right, bottom) = (x + w - 1, y + h - 1);
    fb.fill_rect(x + 1, y, w - 2, 1, '─', style);
    fb.fill_rect(x + 1, bottom, w - 2, 1, '─', style);
    fb.fill_rect(x, y + 1, 1, h - 2, '│', style);
    fb.fill_rect(right, y + 1, 1, h - 2, '│', style);
    for (cx, cy, ch) in [(x, y, '┌'), (right, y, '┐'), (x, bottom, '└'), (right, bottom, '┘')] {
        fb.put_char(cx, cy, ch, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppearEvent, PlacedPiece, SimulationEvent, Size};

    #[test]
    fn board_is_centered_with_border() {
        let board = DisplayBoard::new(Size::new(10, 20));
        let fb = BoardView::default().render(&board, None, Viewport::new(40, 24));

        // 22x22 frame in a 40x24 viewport.
        assert_eq!(fb.get(9, 1).map(|c| c.ch), Some('┌'));
        assert_eq!(fb.get(30, 22).map(|c| c.ch), Some('┘'));
        assert_eq!(fb.get(10, 2).map(|c| c.ch), Some('·'));
    }

    #[test]
    fn cell_size_scales_frame() {
        let board = DisplayBoard::new(Size::new(10, 20));
        assert_eq!(BoardView::new(1, 1).frame_size(&board), (12, 22));
        assert_eq!(BoardView::new(3, 2).frame_size(&board), (32, 42));
        assert_eq!(BoardView::default().frame_size(&board), (22, 22));
    }

    #[test]
    fn filled_cells_use_piece_color() {
        let mut board = DisplayBoard::new(Size::new(10, 20));
        board
            .apply(&SimulationEvent::Appear(AppearEvent {
                piece_id: 0,
                placement: PlacedPiece::new(0, 0, Point::new(0, 19)),
                duration_ms: 0,
            }))
            .unwrap();
        let fb = BoardView::default().render(&board, None, Viewport::new(22, 22));

        // Board cell (0, 19) covers terminal columns 1..=2 on row 20.
        for x in 1..=2 {
            let cell = fb.get(x, 20).unwrap();
            assert_eq!(cell.ch, '█');
            assert_eq!(cell.style.fg, Rgb::new(39, 147, 230));
        }
        assert_eq!(fb.get(9, 20).map(|c| c.ch), Some('·'));
    }

    #[test]
    fn status_panel_needs_room() {
        let board = DisplayBoard::new(Size::new(10, 20));
        let status = PlaybackStatus { clears: 3, pieces: 12 };

        let wide = BoardView::default().render(&board, Some(&status), Viewport::new(60, 22));
        assert!(wide.row_text(0).contains("CLEARS"));
        assert!(wide.row_text(4).contains("12"));

        let narrow = BoardView::default().render(&board, Some(&status), Viewport::new(22, 22));
        assert!(!narrow.row_text(0).contains("CLEARS"));
    }
}
