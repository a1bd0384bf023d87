//! Terminal playback and export backends.
//!
//! Events from the runner are replayed onto a [`DisplayBoard`] and either drawn
//! into a framebuffer flushed through crossterm, written out as JSON lines, or
//! just tracked headlessly.
//!
//! Rendering avoids widget/layout libraries: a [`BoardView`] paints straight
//! into a [`FrameBuffer`] with 2 terminal columns per board cell, and the
//! [`TerminalRenderer`] emits only the cells that changed since the last frame.

pub mod animators;
pub mod board_view;
pub mod display_board;
pub mod fb;
pub mod renderer;

pub use infinitetris_core as core;
pub use infinitetris_engine as engine;
pub use infinitetris_types as types;

pub use animators::{is_quit_key, scaled_duration, JsonLinesAnimator, NopAnimator, TerminalAnimator};
pub use board_view::{BoardView, PlaybackStatus, Viewport};
pub use display_board::{piece_color, DisplayBoard};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{changed_spans, write_patch, write_repaint, Span, TerminalRenderer};
