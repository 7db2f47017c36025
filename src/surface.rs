//! The widget glue: routes pointer events between the mouse reporter
//! and the selection model, owns view scroll state and timers, and
//! drives the differ.

use std::time::{Duration, Instant};

use crate::config::SurfaceConfig;
use crate::differ::{Damage, GridDiffer, ViewState};
use crate::index::Point;
use crate::link::LinkLocator;
use crate::mode::{Modifiers, MouseEncoding, MouseMode, SurfaceMode};
use crate::observer::SurfaceObserver;
use crate::registry::{ClipboardTarget, SharedRegistry, SurfaceId};
use crate::report::{self, MouseButton, PointerEvent, PointerKind};
use crate::sched::{Deadline, RepaintGate};
use crate::selection::{SelectionCorner, SelectionKind, SelectionModel};
use crate::source::CellSource;

/// One terminal widget surface.
///
/// Single-threaded and host-driven: input handlers mutate state
/// synchronously, repaints coalesce through a gate, and the host calls
/// [`TermSurface::poll`] to fire the hover, resize-settle, and
/// auto-scroll timers.
pub struct TermSurface<S: CellSource, O: SurfaceObserver> {
    source: S,
    observer: O,
    registry: SharedRegistry,
    id: SurfaceId,
    config: SurfaceConfig,

    mode: SurfaceMode,
    mouse_mode: MouseMode,
    mouse_encoding: MouseEncoding,

    selection: SelectionModel,
    selection_was_active: bool,
    differ: GridDiffer,
    link: LinkLocator,

    width: usize,
    height: usize,
    scroll: usize,
    cursor: Point,
    focused: bool,

    held_button: Option<MouseButton>,
    mouse_cell: Option<(i32, i32)>,
    corner_hover: Option<SelectionCorner>,

    last_click_at: Option<Instant>,
    last_click_cell: Option<(i32, i32)>,
    click_count: u8,

    repaint: RepaintGate,
    hover_deadline: Deadline,
    settle_deadline: Deadline,
    autoscroll_deadline: Deadline,
    pending_resize: Option<(usize, usize)>,
    autoscroll_overshoot: i32,
}

impl<S: CellSource, O: SurfaceObserver> TermSurface<S, O> {
    pub fn new(
        source: S,
        observer: O,
        registry: SharedRegistry,
        config: SurfaceConfig,
        width: usize,
        height: usize,
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let id = registry.borrow_mut().register();
        Self {
            source,
            observer,
            registry,
            id,
            config,
            mode: SurfaceMode::empty(),
            mouse_mode: MouseMode::Off,
            mouse_encoding: MouseEncoding::Default,
            selection: SelectionModel::new(),
            selection_was_active: false,
            differ: GridDiffer::new(width, height),
            link: LinkLocator::new(),
            width,
            height,
            scroll: 0,
            cursor: Point::ORIGIN,
            focused: false,
            held_button: None,
            mouse_cell: None,
            corner_hover: None,
            last_click_at: None,
            last_click_cell: None,
            click_count: 0,
            repaint: RepaintGate::new(),
            hover_deadline: Deadline::new(),
            settle_deadline: Deadline::new(),
            autoscroll_deadline: Deadline::new(),
            pending_resize: None,
            autoscroll_overshoot: 0,
        }
    }

    // --- Accessors ---

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    // --- Mode plumbing from the terminal-state layer ---

    pub fn set_mouse_mode(&mut self, mode: MouseMode) {
        self.mouse_mode = mode;
    }

    pub fn set_mouse_encoding(&mut self, encoding: MouseEncoding) {
        self.mouse_encoding = encoding;
    }

    pub fn set_modes(&mut self, mode: SurfaceMode) {
        if mode != self.mode {
            self.mode = mode;
            self.request_repaint();
        }
    }

    pub fn set_cursor(&mut self, col: i32, row: i32) {
        self.cursor = Point::new(col, row);
        self.request_repaint();
    }

    /// Toggle the newline/autowrap marker overlay.
    pub fn toggle_debug_markers(&mut self) {
        self.differ.debug_markers = !self.differ.debug_markers;
        self.differ.invalidate();
        self.request_repaint();
    }

    /// Presentation reports the pointer entering/leaving an endpoint
    /// handle of the highlight skin.
    pub fn set_corner_hover(&mut self, corner: Option<SelectionCorner>) {
        self.corner_hover = corner;
    }

    pub fn set_focused(&mut self, focused: bool, now: Instant) {
        self.focused = focused;
        if focused {
            self.arm_hover(now);
        } else if self.link.clear() {
            self.observer.link_dismissed();
        }
    }

    // --- Pointer input ---

    pub fn mouse_down(
        &mut self,
        col: i32,
        row: i32,
        button: MouseButton,
        mods: Modifiers,
        now: Instant,
    ) {
        let (col, row) = self.clamp_cell(col, row);

        if !mods.shift && !mods.ctrl {
            if self.mouse_mode != MouseMode::Off && self.held_button.is_none() {
                self.held_button = Some(button);
            }
            let event = PointerEvent {
                kind: PointerKind::Press,
                button: Some(button),
                alt: mods.alt,
                col,
                row,
            };
            if let Some(bytes) = report::encode(&event, self.mouse_mode, self.mouse_encoding) {
                self.observer.pty_write(&bytes);
                return;
            }
        }

        match button {
            MouseButton::Left => {
                let clicks = self.detect_click_count(col, row, now);
                let p = self.buffer_point(col, row);
                match clicks {
                    3 => {
                        self.selection.select_line(&self.source, self.width, p);
                        self.take_selection(ClipboardTarget::Primary);
                    }
                    2 => {
                        if mods.shift && self.selection.active() {
                            self.selection.extend_word_to(
                                &self.source,
                                &self.config.selection.word_separators,
                                p,
                            );
                        } else {
                            self.selection.select_word(
                                &self.source,
                                &self.config.selection.word_separators,
                                p,
                            );
                        }
                        if self.selection.active() {
                            self.take_selection(ClipboardTarget::Primary);
                        }
                    }
                    _ => {
                        if let Some(corner) = self.corner_hover.filter(|_| self.selection.active())
                        {
                            self.selection.begin_stretch(&self.source, corner, p);
                        } else if mods.shift {
                            self.selection.cancel();
                        } else {
                            let kind = if mods.ctrl || mods.alt {
                                SelectionKind::Box
                            } else {
                                SelectionKind::Stream
                            };
                            self.selection.begin(&self.source, p, kind);
                        }
                    }
                }
                self.sync_selection_state();
                self.request_repaint();
            }
            MouseButton::Middle => self.paste_from(ClipboardTarget::Primary),
            _ => {}
        }
    }

    pub fn mouse_up(&mut self, col: i32, row: i32, button: MouseButton, mods: Modifiers) {
        let (col, row) = self.clamp_cell(col, row);
        if self.held_button == Some(button) {
            self.held_button = None;
        }

        if !mods.shift && !mods.ctrl {
            let event = PointerEvent {
                kind: PointerKind::Release,
                button: Some(button),
                alt: mods.alt,
                col,
                row,
            };
            if let Some(bytes) = report::encode(&event, self.mouse_mode, self.mouse_encoding) {
                self.observer.pty_write(&bytes);
                return;
            }
        }

        if button == MouseButton::Left && self.selection.building() {
            self.autoscroll_deadline.cancel();
            let p = self.buffer_point(col, row);
            if self.selection.finish(&self.source, self.width, Some(p)) {
                self.take_selection(ClipboardTarget::Primary);
            }
            self.sync_selection_state();
            self.request_repaint();
        }
    }

    pub fn mouse_move(&mut self, col: i32, row: i32, mods: Modifiers, now: Instant) {
        let clamped_col = col.clamp(0, self.width as i32 - 1);
        let overshoot = if row < 0 {
            row
        } else if row >= self.height as i32 {
            row - (self.height as i32 - 1)
        } else {
            0
        };

        if overshoot != 0 && self.selection.building() {
            self.autoscroll_overshoot = overshoot;
            if !self.autoscroll_deadline.is_armed() {
                self.autoscroll_deadline
                    .arm(now, Duration::from_millis(self.config.timing.autoscroll_ms));
            }
            return;
        }
        self.autoscroll_deadline.cancel();

        let clamped_row = row.clamp(0, self.height as i32 - 1);
        if self.mouse_cell == Some((clamped_col, clamped_row)) {
            return;
        }
        self.mouse_cell = Some((clamped_col, clamped_row));

        if !mods.shift && !mods.ctrl {
            let event = PointerEvent {
                kind: PointerKind::Motion,
                button: self.held_button,
                alt: mods.alt,
                col: clamped_col,
                row: clamped_row,
            };
            if let Some(bytes) = report::encode(&event, self.mouse_mode, self.mouse_encoding) {
                self.observer.pty_write(&bytes);
                return;
            }
        }

        if self.selection.building() {
            let p = self.buffer_point(clamped_col, clamped_row);
            self.selection.extend(&self.source, self.width, p);
            self.sync_selection_state();
            self.request_repaint();
        }

        self.arm_hover(now);
    }

    /// Vertical wheel. Positive `notches` scroll toward the live
    /// screen, negative into history.
    pub fn wheel(&mut self, notches: i32, col: i32, row: i32, mods: Modifiers) {
        if notches == 0 || mods.any() {
            return;
        }

        if self.mouse_mode == MouseMode::Off {
            if self.mode.contains(SurfaceMode::ALT_SCREEN) {
                let bytes: &[u8] = if notches < 0 { b"\x1bOA" } else { b"\x1bOB" };
                self.observer.pty_write(bytes);
            } else {
                self.scroll_by(-notches * self.config.behavior.wheel_step as i32);
            }
            return;
        }

        let (col, row) = self.clamp_cell(col, row);
        let event = PointerEvent {
            kind: PointerKind::Wheel { down: notches >= 0 },
            button: None,
            alt: false,
            col,
            row,
        };
        if let Some(bytes) = report::encode(&event, self.mouse_mode, self.mouse_encoding) {
            self.observer.pty_write(&bytes);
        }
    }

    pub fn pointer_entered(&mut self, col: i32, row: i32, now: Instant) {
        self.mouse_cell = Some(self.clamp_cell(col, row));
        self.link.suspension().pop();
        self.arm_hover(now);
    }

    pub fn pointer_left(&mut self) {
        self.link.suspension().push();
        self.hover_deadline.cancel();
        self.mouse_cell = None;
        if self.link.clear() {
            self.observer.link_dismissed();
        }
    }

    /// Suspend link detection while a modal UI surface is up.
    pub fn suspend_hover(&mut self) {
        self.link.suspension().push();
        self.hover_deadline.cancel();
        if self.link.clear() {
            self.observer.link_dismissed();
        }
    }

    pub fn resume_hover(&mut self, now: Instant) {
        self.link.suspension().pop();
        self.arm_hover(now);
    }

    // --- View scrolling ---

    pub fn scroll_by(&mut self, lines: i32) {
        let limit = self.source.backscroll_limit() as i32;
        let new = (self.scroll as i32 + lines).clamp(0, limit) as usize;
        if new != self.scroll {
            self.scroll = new;
            self.request_repaint();
        }
    }

    pub fn scroll_to_live(&mut self) {
        if self.scroll != 0 {
            self.scroll = 0;
            self.request_repaint();
        }
    }

    // --- Clipboard ---

    /// Hand the current selection to a system selection target.
    pub fn copy(&mut self, target: ClipboardTarget) {
        self.take_selection(target);
    }

    /// Paste text toward the PTY: newlines become carriage returns and
    /// bracketed-paste markers wrap the payload when the mode is set.
    pub fn paste(&mut self, text: &str) {
        let mut bytes = Vec::with_capacity(text.len() + 16);
        if self.mode.contains(SurfaceMode::BRACKETED_PASTE) {
            bytes.extend_from_slice(b"\x1b[200~");
        }
        for b in text.bytes() {
            bytes.push(if b == b'\n' { b'\r' } else { b });
        }
        if self.mode.contains(SurfaceMode::BRACKETED_PASTE) {
            bytes.extend_from_slice(b"\x1b[201~");
        }
        self.observer.pty_write(&bytes);
    }

    /// Paste the in-process text held for a target.
    pub fn paste_from(&mut self, target: ClipboardTarget) {
        let text = self.registry.borrow().text(target).map(str::to_owned);
        if let Some(text) = text {
            self.paste(&text);
        }
    }

    /// Another surface (or application) took a target we owned.
    pub fn selection_lost(&mut self, target: ClipboardTarget) {
        self.registry.borrow_mut().release(self.id, target);
        self.selection.cancel();
        self.sync_selection_state();
        self.request_repaint();
    }

    // --- Terminal-state notifications ---

    /// Rows `first..=last` shifted by `direction` (scrollback grew).
    pub fn buffer_scrolled(&mut self, direction: i32, first: i32, last: i32) {
        if !self.config.behavior.jump_on_change && self.scroll > 0 {
            self.scroll = (self.scroll + 1).min(self.source.backscroll_limit());
        }
        let was = self.selection.active();
        self.selection.scrolled(direction, first, last);
        if was != self.selection.active() {
            self.sync_selection_state();
        }
        self.request_repaint();
    }

    /// `count` cells rewritten in place starting at `origin`.
    pub fn buffer_content_changed(&mut self, origin: Point, count: usize) {
        let was = self.selection.active();
        self.selection.content_changed(self.width, origin, count);
        if was != self.selection.active() {
            self.sync_selection_state();
            self.request_repaint();
        }
    }

    /// The terminal application asked for the selection to go away.
    pub fn cancel_selection(&mut self) {
        if self.selection.active() || self.selection.building() {
            self.selection.cancel();
            self.sync_selection_state();
            self.request_repaint();
        }
    }

    /// The program wrote output; snap to live if configured.
    pub fn content_updated(&mut self) {
        if self.config.behavior.jump_on_change {
            self.scroll = 0;
        }
        self.request_repaint();
    }

    pub fn notify_bell(&mut self) {
        self.observer.bell();
    }

    pub fn notify_title(&mut self, title: &str) {
        self.observer.title_changed(title);
    }

    pub fn notify_exited(&mut self) {
        self.observer.exited();
    }

    // --- Geometry ---

    /// Stage a resize; it applies after the settle window with no
    /// further geometry events.
    pub fn resize_request(&mut self, width: usize, height: usize, now: Instant) {
        let width = width.max(1);
        let height = height.max(1);
        if (width, height) == (self.width, self.height) && self.pending_resize.is_none() {
            return;
        }
        self.pending_resize = Some((width, height));
        self.settle_deadline
            .arm(now, Duration::from_millis(self.config.timing.resize_settle_ms));
    }

    // --- Timers & rendering ---

    /// Fire due timers. The host calls this from its event loop tick.
    pub fn poll(&mut self, now: Instant) {
        if self.settle_deadline.fire(now) {
            if let Some((w, h)) = self.pending_resize.take() {
                self.apply_resize(w, h);
            }
        }
        if self.autoscroll_deadline.fire(now) {
            self.autoscroll_step(now);
        }
        if self.hover_deadline.fire(now) {
            self.hover_apply();
        }
    }

    /// Whether a coalesced repaint is pending (and consume it).
    pub fn take_repaint(&mut self) -> bool {
        self.repaint.take()
    }

    /// One differencing pass; returns the update spans and overlay
    /// geometry for the presentation.
    pub fn render(&mut self, now: Instant) -> Damage {
        self.repaint.take();
        let view = ViewState {
            width: self.width,
            height: self.height,
            scroll: self.scroll,
            inverse_video: self.mode.contains(SurfaceMode::INVERSE_VIDEO),
            cursor: self.cursor,
            cursor_visible: !self.mode.contains(SurfaceMode::HIDE_CURSOR),
        };
        let damage = self.differ.apply(&self.source, &view, &self.selection);
        for block in &damage.blocks_placed {
            self.observer.block_placed(block.id, block.col, block.row);
        }
        for id in &damage.blocks_removed {
            self.observer.block_removed(*id);
        }
        // hover geometry may be stale after any repaint
        self.arm_hover(now);
        damage
    }

    // --- Internals ---

    fn clamp_cell(&self, col: i32, row: i32) -> (i32, i32) {
        (
            col.clamp(0, self.width as i32 - 1),
            row.clamp(0, self.height as i32 - 1),
        )
    }

    /// Viewport cell to buffer coordinates under the current scroll.
    fn buffer_point(&self, col: i32, row: i32) -> Point {
        Point::new(col, row - self.scroll as i32)
    }

    fn detect_click_count(&mut self, col: i32, row: i32, now: Instant) -> u8 {
        let same_cell = self.last_click_cell == Some((col, row));
        let within = self.last_click_at.is_some_and(|t| {
            now.duration_since(t).as_millis() < u128::from(self.config.timing.double_click_ms)
        });
        let count = if same_cell && within {
            match self.click_count {
                1 => 2,
                2 => 3,
                _ => 1,
            }
        } else {
            1
        };
        self.last_click_at = Some(now);
        self.last_click_cell = Some((col, row));
        self.click_count = count;
        count
    }

    fn request_repaint(&mut self) {
        if self.repaint.request() {
            self.observer.repaint_requested();
        }
    }

    fn sync_selection_state(&mut self) {
        let active = self.selection.active();
        if active != self.selection_was_active {
            self.selection_was_active = active;
            self.observer.selection_changed(active);
        }
    }

    fn take_selection(&mut self, target: ClipboardTarget) {
        let link = self.link.current().map(|l| l.text.clone());
        let Some(text) = self.selection.to_text(&self.source, self.width, link.as_deref()) else {
            return;
        };
        if text.is_empty() {
            return;
        }
        if let Some(previous) = self.registry.borrow_mut().take(self.id, target, text.clone()) {
            log::debug!("selection target {target:?} taken from surface {previous}");
        }
        self.observer.clipboard_set(target, &text);
    }

    fn apply_resize(&mut self, width: usize, height: usize) {
        log::debug!("grid resize {}x{} -> {width}x{height}", self.width, self.height);
        self.width = width;
        self.height = height;
        self.differ.resize(width, height);
        self.scroll = self.scroll.min(self.source.backscroll_limit());
        self.selection.cancel();
        self.sync_selection_state();
        self.observer.grid_resized(width, height);
        self.request_repaint();
    }

    fn autoscroll_step(&mut self, now: Instant) {
        if !self.selection.building() {
            return;
        }
        let overshoot = self.autoscroll_overshoot;
        let limit = self.source.backscroll_limit() as i32;
        if overshoot < 0 {
            self.scroll = ((self.scroll as i32 - overshoot).min(limit)).max(0) as usize;
            let p = Point::new(self.selection.cursor().col, -(self.scroll as i32));
            self.selection.extend(&self.source, self.width, p);
        } else if overshoot > 0 {
            self.scroll = (self.scroll as i32 - overshoot).max(0) as usize;
            let p = Point::new(
                self.selection.cursor().col,
                self.height as i32 - 1 - self.scroll as i32,
            );
            self.selection.extend(&self.source, self.width, p);
        }
        self.sync_selection_state();
        self.request_repaint();
        self.autoscroll_deadline
            .arm(now, Duration::from_millis(self.config.timing.autoscroll_ms));
    }

    fn arm_hover(&mut self, now: Instant) {
        self.hover_deadline
            .arm(now, Duration::from_millis(self.config.timing.hover_delay_ms));
    }

    fn hover_apply(&mut self) {
        let changed = match self.mouse_cell {
            Some((col, row)) if self.focused && !self.link.suspended() => {
                let p = self.buffer_point(col, row);
                self.link.probe(&self.source, p.col, p.row)
            }
            _ => self.link.clear(),
        };
        if changed {
            if let Some(link) = self.link.current() {
                self.observer.link_hovered(link);
            } else {
                self.observer.link_dismissed();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::cell::BlockRef;
    use crate::index::Rect;
    use crate::link::HoverLink;
    use crate::registry::SurfaceRegistry;
    use crate::testgrid::TestGrid;

    #[derive(Default)]
    struct Recorder {
        pty: Vec<u8>,
        repaints: usize,
        clipboard: Vec<(ClipboardTarget, String)>,
        selection_changes: Vec<bool>,
        hovered: Vec<String>,
        dismissed: usize,
        resized: Vec<(usize, usize)>,
        blocks_placed: Vec<(u16, i32, i32)>,
        blocks_removed: Vec<u16>,
    }

    impl SurfaceObserver for Recorder {
        fn pty_write(&mut self, bytes: &[u8]) {
            self.pty.extend_from_slice(bytes);
        }

        fn repaint_requested(&mut self) {
            self.repaints += 1;
        }

        fn selection_changed(&mut self, active: bool) {
            self.selection_changes.push(active);
        }

        fn clipboard_set(&mut self, target: ClipboardTarget, text: &str) {
            self.clipboard.push((target, text.to_owned()));
        }

        fn link_hovered(&mut self, link: &HoverLink) {
            self.hovered.push(link.text.clone());
        }

        fn link_dismissed(&mut self) {
            self.dismissed += 1;
        }

        fn grid_resized(&mut self, width: usize, height: usize) {
            self.resized.push((width, height));
        }

        fn block_placed(&mut self, id: u16, col: i32, row: i32) {
            self.blocks_placed.push((id, col, row));
        }

        fn block_removed(&mut self, id: u16) {
            self.blocks_removed.push(id);
        }
    }

    const W: usize = 10;

    fn surface_with(grid: TestGrid, height: usize) -> TermSurface<TestGrid, Recorder> {
        TermSurface::new(
            grid,
            Recorder::default(),
            SurfaceRegistry::shared(),
            SurfaceConfig::default(),
            W,
            height,
        )
    }

    fn surface(lines: &[&str]) -> TermSurface<TestGrid, Recorder> {
        let height = lines.len().max(1);
        surface_with(TestGrid::from_lines(W, lines), height)
    }

    #[test]
    fn drag_copies_primary_selection() {
        let mut s = surface(&["hello"]);
        let t0 = Instant::now();
        s.mouse_down(0, 0, MouseButton::Left, Modifiers::NONE, t0);
        s.mouse_move(4, 0, Modifiers::NONE, t0);
        s.mouse_up(4, 0, MouseButton::Left, Modifiers::NONE);

        assert!(s.selection().active());
        let rec = s.observer_mut();
        assert!(rec.pty.is_empty());
        assert_eq!(rec.clipboard, vec![(ClipboardTarget::Primary, "hello".to_owned())]);
        assert_eq!(rec.selection_changes, vec![true]);
    }

    #[test]
    fn click_without_drag_selects_nothing() {
        let mut s = surface(&["hello"]);
        let t0 = Instant::now();
        s.mouse_down(2, 0, MouseButton::Left, Modifiers::NONE, t0);
        s.mouse_up(2, 0, MouseButton::Left, Modifiers::NONE);
        assert!(!s.selection().active());
        assert!(s.observer_mut().clipboard.is_empty());
    }

    #[test]
    fn double_click_selects_word() {
        let mut s = surface(&["foo bar"]);
        let t0 = Instant::now();
        s.mouse_down(1, 0, MouseButton::Left, Modifiers::NONE, t0);
        s.mouse_up(1, 0, MouseButton::Left, Modifiers::NONE);
        s.mouse_down(1, 0, MouseButton::Left, Modifiers::NONE, t0 + Duration::from_millis(100));

        assert!(s.selection().active());
        assert_eq!(
            s.observer_mut().clipboard,
            vec![(ClipboardTarget::Primary, "foo".to_owned())]
        );
    }

    #[test]
    fn reporting_consumes_pointer_events() {
        let mut s = surface(&[""; 12]);
        s.set_mouse_mode(MouseMode::Normal);
        s.set_mouse_encoding(MouseEncoding::Sgr);
        let t0 = Instant::now();
        s.mouse_down(5, 10, MouseButton::Left, Modifiers::NONE, t0);
        s.mouse_up(5, 10, MouseButton::Left, Modifiers::NONE);

        assert!(!s.selection().active());
        assert_eq!(s.observer_mut().pty, b"\x1b[<0;6;11M\x1b[<0;6;11m");
    }

    #[test]
    fn shift_clicks_are_not_reported() {
        let mut s = surface(&["hello"]);
        s.set_mouse_mode(MouseMode::Normal);
        s.set_mouse_encoding(MouseEncoding::Sgr);
        let t0 = Instant::now();
        let shift = Modifiers { shift: true, ..Modifiers::NONE };
        s.mouse_down(0, 0, MouseButton::Left, shift, t0);
        s.mouse_up(0, 0, MouseButton::Left, shift);
        // shift reserves the click for the widget; a bare single click
        // only drops any existing highlight
        assert!(s.observer_mut().pty.is_empty());
        assert!(!s.selection().active());
    }

    #[test]
    fn motion_echoes_originally_pressed_button() {
        let mut s = surface(&[""; 4]);
        s.set_mouse_mode(MouseMode::ButtonMotion);
        s.set_mouse_encoding(MouseEncoding::Sgr);
        let t0 = Instant::now();
        s.mouse_down(1, 1, MouseButton::Middle, Modifiers::NONE, t0);
        s.mouse_move(3, 1, Modifiers::NONE, t0);
        assert_eq!(s.observer_mut().pty, b"\x1b[<1;2;2M\x1b[<33;4;2M");

        s.observer_mut().pty.clear();
        s.mouse_up(3, 1, MouseButton::Middle, Modifiers::NONE);
        assert_eq!(s.observer_mut().pty, b"\x1b[<1;4;2m");

        // button released: button-motion mode stops reporting
        s.observer_mut().pty.clear();
        s.mouse_move(5, 1, Modifiers::NONE, t0);
        assert!(s.observer_mut().pty.is_empty());
    }

    #[test]
    fn wheel_scrolls_view_when_reporting_off() {
        let mut grid = TestGrid::from_lines(W, &["a", "b"]);
        grid.push_scrollback("x");
        grid.push_scrollback("y");
        grid.push_scrollback("z");
        let mut s = surface_with(grid, 2);

        s.wheel(-1, 0, 0, Modifiers::NONE);
        assert_eq!(s.scroll(), 3); // one notch, clamped to backscroll
        s.wheel(1, 0, 0, Modifiers::NONE);
        assert_eq!(s.scroll(), 0);
        assert!(s.observer_mut().pty.is_empty());
    }

    #[test]
    fn wheel_emulates_arrows_on_alt_screen() {
        let mut s = surface(&["x"]);
        s.set_modes(SurfaceMode::ALT_SCREEN);
        s.wheel(-1, 0, 0, Modifiers::NONE);
        s.wheel(1, 0, 0, Modifiers::NONE);
        assert_eq!(s.observer_mut().pty, b"\x1bOA\x1bOB");
    }

    #[test]
    fn wheel_reports_when_mode_active() {
        let mut s = surface(&[""; 5]);
        s.set_mouse_mode(MouseMode::Normal);
        s.set_mouse_encoding(MouseEncoding::Sgr);
        s.wheel(1, 2, 3, Modifiers::NONE);
        s.wheel(-1, 2, 3, Modifiers::NONE);
        assert_eq!(s.observer_mut().pty, b"\x1b[<65;3;4M\x1b[<64;3;4M");
    }

    #[test]
    fn paste_rewrites_newlines() {
        let mut s = surface(&["x"]);
        s.paste("one\ntwo\n");
        assert_eq!(s.observer_mut().pty, b"one\rtwo\r");
    }

    #[test]
    fn paste_brackets_when_requested() {
        let mut s = surface(&["x"]);
        s.set_modes(SurfaceMode::BRACKETED_PASTE);
        s.paste("hi");
        assert_eq!(s.observer_mut().pty, b"\x1b[200~hi\x1b[201~");
    }

    #[test]
    fn middle_click_pastes_primary() {
        let mut s = surface(&["hello"]);
        let t0 = Instant::now();
        s.mouse_down(0, 0, MouseButton::Left, Modifiers::NONE, t0);
        s.mouse_move(4, 0, Modifiers::NONE, t0);
        s.mouse_up(4, 0, MouseButton::Left, Modifiers::NONE);

        s.mouse_down(0, 0, MouseButton::Middle, Modifiers::NONE, t0);
        assert_eq!(s.observer_mut().pty, b"hello");
    }

    #[test]
    fn hover_link_debounce_flow() {
        let mut grid = TestGrid::from_lines(W, &["see https:"]);
        grid.add_link(Rect::new(4, 0, 9, 0), "https://example.com");
        let mut s = surface_with(grid, 1);
        let t0 = Instant::now();
        s.set_focused(true, t0);
        s.pointer_entered(5, 0, t0);

        // before the settle interval nothing fires
        s.poll(t0 + Duration::from_millis(10));
        assert!(s.observer_mut().hovered.is_empty());

        s.poll(t0 + Duration::from_millis(60));
        assert_eq!(s.observer_mut().hovered, vec!["https://example.com".to_owned()]);

        s.pointer_left();
        assert_eq!(s.observer_mut().dismissed, 1);
    }

    #[test]
    fn hover_suspension_blocks_detection() {
        let mut grid = TestGrid::from_lines(W, &["see https:"]);
        grid.add_link(Rect::new(4, 0, 9, 0), "https://example.com");
        let mut s = surface_with(grid, 1);
        let t0 = Instant::now();
        s.set_focused(true, t0);
        s.pointer_entered(5, 0, t0);
        s.suspend_hover();
        s.poll(t0 + Duration::from_millis(60));
        assert!(s.observer_mut().hovered.is_empty());

        s.resume_hover(t0 + Duration::from_millis(70));
        s.poll(t0 + Duration::from_millis(130));
        assert_eq!(s.observer_mut().hovered.len(), 1);
    }

    #[test]
    fn resize_waits_for_settle_window() {
        let mut s = surface(&["hello"]);
        let t0 = Instant::now();
        s.mouse_down(0, 0, MouseButton::Left, Modifiers::NONE, t0);
        s.mouse_move(4, 0, Modifiers::NONE, t0);
        s.mouse_up(4, 0, MouseButton::Left, Modifiers::NONE);
        assert!(s.selection().active());

        s.resize_request(8, 5, t0);
        s.poll(t0 + Duration::from_millis(100));
        assert!(s.observer_mut().resized.is_empty());
        assert_eq!(s.size(), (W, 1));

        s.poll(t0 + Duration::from_millis(250));
        assert_eq!(s.observer_mut().resized, vec![(8, 5)]);
        assert_eq!(s.size(), (8, 5));
        assert!(!s.selection().active());
    }

    #[test]
    fn repaint_requests_coalesce() {
        let mut s = surface(&["x"]);
        s.content_updated();
        s.content_updated();
        s.content_updated();
        assert_eq!(s.observer_mut().repaints, 1);
        assert!(s.take_repaint());
        s.content_updated();
        assert_eq!(s.observer_mut().repaints, 2);
    }

    #[test]
    fn selection_lost_clears_highlight() {
        let mut s = surface(&["hello"]);
        let t0 = Instant::now();
        s.mouse_down(0, 0, MouseButton::Left, Modifiers::NONE, t0);
        s.mouse_move(4, 0, Modifiers::NONE, t0);
        s.mouse_up(4, 0, MouseButton::Left, Modifiers::NONE);
        assert!(s.selection().active());

        s.selection_lost(ClipboardTarget::Primary);
        assert!(!s.selection().active());
        assert_eq!(s.observer_mut().selection_changes, vec![true, false]);
    }

    #[test]
    fn buffer_scroll_rides_selection() {
        let mut s = surface(&["aaaaaaaaaa"; 4]);
        let t0 = Instant::now();
        s.mouse_down(1, 1, MouseButton::Left, Modifiers::NONE, t0);
        s.mouse_move(4, 2, Modifiers::NONE, t0);
        s.mouse_up(4, 2, MouseButton::Left, Modifiers::NONE);

        s.buffer_scrolled(-1, -10, 3);
        assert!(s.selection().active());
        let (a, b) = s.selection().canonical();
        assert_eq!((a.row, b.row), (0, 1));
    }

    #[test]
    fn render_forwards_block_lifecycle() {
        let mut grid = TestGrid::from_lines(W, &[""; 3]);
        grid.cell_mut(5, 2).block = Some(BlockRef { id: 7, dx: 0, dy: 0 });
        let mut s = surface_with(grid, 3);
        let t0 = Instant::now();
        s.render(t0);
        assert_eq!(s.observer_mut().blocks_placed, vec![(7, 5, 2)]);

        s.source_mut().cell_mut(5, 2).block = None;
        s.render(t0);
        assert_eq!(s.observer_mut().blocks_removed, vec![7]);
    }

    #[test]
    fn ctrl_click_starts_box_selection() {
        let mut s = surface(&["aaaaaaaaaa"; 4]);
        let t0 = Instant::now();
        let ctrl = Modifiers { ctrl: true, ..Modifiers::NONE };
        s.mouse_down(2, 1, MouseButton::Left, ctrl, t0);
        s.mouse_move(5, 2, Modifiers::NONE, t0);
        s.mouse_up(5, 2, MouseButton::Left, Modifiers::NONE);
        assert!(s.selection().active());
        assert_eq!(s.selection().kind(), SelectionKind::Box);
    }

    #[test]
    fn drag_past_bottom_autoscrolls(){
        let mut grid = TestGrid::from_lines(W, &["aaaaaaaaaa"; 4]);
        grid.push_scrollback("zzzz");
        grid.push_scrollback("yyyy");
        let mut s = surface_with(grid, 4);
        s.scroll_by(2);
        assert_eq!(s.scroll(), 2);
        let t0 = Instant::now();
        s.mouse_down(1, 1, MouseButton::Left, Modifiers::NONE, t0);
        // pointer below the grid: auto-scroll toward live
        s.mouse_move(1, 6, Modifiers::NONE, t0);
        s.poll(t0 + Duration::from_millis(60));
        assert_eq!(s.scroll(), 0);
        assert_eq!(s.selection().cursor().row, 3);
    }
}
