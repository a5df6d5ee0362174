//! Line window around the cursor

use std::ops::Range;

/// Half-open range of lines `[start, end)` that receive the column guide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWindow {
    pub start: usize,
    pub end: usize,
}

impl LineWindow {
    /// Window of radius `size` around `line`, clamped to `[0, line_count)`
    ///
    /// `start = max(0, line - size + 1)`, `end = min(line_count, line + size + 1)`.
    /// `start` never passes `line`, so a zero radius still keeps the cursor
    /// line. A cursor past the end of the document yields a window that ends
    /// at `line_count` (possibly empty), never a reversed range.
    pub fn around(line: usize, line_count: usize, size: usize) -> Self {
        let start = line.saturating_add(1).saturating_sub(size).min(line);
        let end = line.saturating_add(size).saturating_add(1).min(line_count);
        Self {
            start: start.min(end),
            end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.start && line < self.end
    }

    pub fn lines(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_symmetric_in_middle() {
        let w = LineWindow::around(50, 100, 10);
        assert_eq!(w, LineWindow { start: 41, end: 61 });
        assert!(w.contains(50));
    }

    #[test]
    fn test_window_clamped_at_top() {
        let w = LineWindow::around(2, 100, 10);
        assert_eq!(w.start, 0);
        assert_eq!(w.end, 13);
    }

    #[test]
    fn test_window_clamped_at_bottom() {
        let w = LineWindow::around(98, 100, 10);
        assert_eq!(w.start, 89);
        assert_eq!(w.end, 100);
    }

    #[test]
    fn test_empty_document_gives_empty_window() {
        let w = LineWindow::around(0, 0, 10);
        assert!(w.is_empty());
        assert_eq!(w.len(), 0);
    }

    #[test]
    fn test_zero_radius_keeps_cursor_line() {
        let w = LineWindow::around(5, 10, 0);
        assert_eq!(w, LineWindow { start: 5, end: 6 });
        assert!(w.contains(5));
    }

    #[test]
    fn test_cursor_past_end_clamps() {
        let w = LineWindow::around(5, 3, 10);
        assert_eq!(w, LineWindow { start: 0, end: 3 });

        let far = LineWindow::around(500, 3, 10);
        assert!(far.is_empty());
        assert!(far.start <= far.end);
    }

    #[test]
    fn test_huge_line_does_not_overflow() {
        let w = LineWindow::around(usize::MAX, 10, usize::MAX);
        assert!(w.start <= w.end);
        assert!(w.end <= 10);
    }
}
