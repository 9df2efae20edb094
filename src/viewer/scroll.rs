/// Height of the content above the viewport recorded right before a
/// backward extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollAnchor {
    content_height: usize,
}

/// Viewport bookkeeping in rendered rows.
///
/// The renderer reports `content_height` and `viewport_height` after every
/// frame via [`on_layout`](Self::on_layout); scroll notifications arrive as
/// [`scroll_by`](Self::scroll_by) and friends. `is_at_top`/`is_at_bottom`
/// are recomputed on each of those.
#[derive(Debug, Clone)]
pub struct ScrollPositionPreserver {
    offset: usize,
    content_height: usize,
    viewport_height: usize,
    is_at_top: bool,
    is_at_bottom: bool,
    attached: bool,
    pending_anchor: Option<ScrollAnchor>,
    bottom_requested: bool,
}

impl Default for ScrollPositionPreserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollPositionPreserver {
    pub fn new() -> Self {
        Self {
            offset: 0,
            content_height: 0,
            viewport_height: 0,
            is_at_top: true,
            is_at_bottom: true,
            attached: false,
            pending_anchor: None,
            bottom_requested: false,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn content_height(&self) -> usize {
        self.content_height
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    pub fn is_at_top(&self) -> bool {
        self.is_at_top
    }

    pub fn is_at_bottom(&self) -> bool {
        self.is_at_bottom
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn has_pending_restore(&self) -> bool {
        self.pending_anchor.is_some()
    }

    /// A jump to the bottom is waiting for the next layout.
    pub fn has_bottom_request(&self) -> bool {
        self.bottom_requested
    }

    fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.viewport_height)
    }

    fn recompute_flags(&mut self) {
        let remaining = self.content_height as i64 - self.offset as i64 - self.viewport_height as i64;
        self.is_at_bottom = remaining < 1;
        self.is_at_top = self.offset == 0;
    }

    /// First measurement of the viewport; flags are computed eagerly.
    pub fn attach(&mut self, content_height: usize, viewport_height: usize) {
        self.attached = true;
        self.content_height = content_height;
        self.viewport_height = viewport_height;
        self.offset = self.offset.min(self.max_offset());
        self.recompute_flags();
    }

    /// Apply a fresh layout measurement. Any pending anchor restore and
    /// bottom request are resolved here, after the renderer has laid out the
    /// rows they depend on. Returns true when an anchor was restored.
    pub fn on_layout(&mut self, content_height: usize, viewport_height: usize) -> bool {
        if !self.attached {
            self.attach(content_height, viewport_height);
        }
        self.content_height = content_height;
        self.viewport_height = viewport_height;

        let restored = match self.pending_anchor.take() {
            Some(anchor) => {
                self.restore(anchor);
                true
            }
            None => false,
        };

        if std::mem::take(&mut self.bottom_requested) {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
        self.recompute_flags();
        restored
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let target = if delta.is_negative() {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta as usize)
        };
        self.scroll_to(target);
    }

    pub fn scroll_to(&mut self, offset: usize) {
        self.offset = offset.min(self.max_offset());
        self.recompute_flags();
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_to(0);
    }

    /// Move to the maximum offset for the content measured so far.
    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
        self.is_at_bottom = true;
        self.is_at_top = self.offset == 0;
    }

    /// Scroll to the bottom once the next layout has been measured.
    pub fn request_bottom(&mut self) {
        self.bottom_requested = true;
    }

    /// Record the content height before rows are prepended. The correction
    /// is applied by the next [`on_layout`](Self::on_layout).
    pub fn capture(&mut self) -> ScrollAnchor {
        let anchor = ScrollAnchor {
            content_height: self.content_height,
        };
        self.pending_anchor = Some(anchor);
        anchor
    }

    pub fn cancel_restore(&mut self) {
        self.pending_anchor = None;
    }

    fn restore(&mut self, anchor: ScrollAnchor) {
        let grown = self.content_height.saturating_sub(anchor.content_height);
        self.offset = (self.offset + grown).min(self.max_offset());
    }

    pub fn reset(&mut self) {
        let attached = self.attached;
        let viewport_height = self.viewport_height;
        *self = Self::new();
        self.attached = attached;
        self.viewport_height = viewport_height;
    }
}
