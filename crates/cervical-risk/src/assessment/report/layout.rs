/// Page dimensions and the fixed offsets the report is laid out on, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    /// Distance from the top edge to the first line of a continuation page.
    pub top_margin: f64,
    /// A line is never placed below this baseline.
    pub bottom_margin: f64,
    pub line_step: f64,
}

impl PageGeometry {
    pub const fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            top_margin: 50.0,
            bottom_margin: 50.0,
            line_step: 15.0,
        }
    }

    /// Baseline measured down from the top edge.
    pub fn from_top(&self, offset: f64) -> f64 {
        self.height - offset
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// Where a single line of text lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Zero-based page index.
    pub page: usize,
    pub y: f64,
}

/// Vertical cursor over a growing sequence of pages.
///
/// Each call to [`PageCursor::place`] either writes on the current page or, when the
/// cursor has dropped below the bottom margin, opens a new page and resets to the
/// top margin first. [`PageCursor::finish`] consumes the cursor and reports how many
/// pages were produced.
#[derive(Debug, Clone)]
pub struct PageCursor {
    geometry: PageGeometry,
    page: usize,
    y: f64,
}

impl PageCursor {
    pub fn new(geometry: PageGeometry, start_y: f64) -> Self {
        Self {
            geometry,
            page: 0,
            y: start_y,
        }
    }

    pub fn place(&mut self) -> Placement {
        if self.y < self.geometry.bottom_margin {
            self.page += 1;
            self.y = self.geometry.from_top(self.geometry.top_margin);
            tracing::trace!(page = self.page, "report page break");
        }

        let placement = Placement {
            page: self.page,
            y: self.y,
        };
        self.y -= self.geometry.line_step;
        placement
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn finish(self) -> usize {
        self.page + 1
    }
}
