//! Decides which side of the loaded window may grow or shrink against a target rect.

use crate::layout::WindowRects;
use crate::{CellRect, Edge, GridSize, Rect, Spacing};

/// Snapshot of the window geometry the predicates work on.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EdgeProbe {
    pub(crate) grid: GridSize,
    pub(crate) window: CellRect,
    pub(crate) rects: WindowRects,
    pub(crate) spacing: Spacing,
}

impl EdgeProbe {
    /// `true` while the window has not reached `target` on `edge`, and the grid has more cells there.
    pub(crate) fn can_load(&self, edge: Edge, target: Rect) -> bool {
        let outer = self.rects.outer;
        let spacing = self.spacing;
        match edge {
            Edge::Left => self.window.left > 0 && outer.left() > target.left() + spacing.column,
            Edge::Right => {
                self.window.right + 1 < self.grid.columns
                    && outer.right() < target.right() - spacing.column
            }
            Edge::Top => self.window.top > 0 && outer.top() > target.top() + spacing.row,
            Edge::Bottom => {
                self.window.bottom + 1 < self.grid.rows
                    && outer.bottom() < target.bottom() - spacing.row
            }
        }
    }

    /// `true` once the row/column on `edge` lies entirely outside `target`. The last row and
    /// column are never unloaded; later edges are laid out against them.
    pub(crate) fn can_unload(&self, edge: Edge, target: Rect) -> bool {
        let inner = self.rects.inner;
        match edge {
            Edge::Left => self.window.width() > 1 && inner.left() <= target.left(),
            Edge::Right => self.window.width() > 1 && inner.right() >= target.right(),
            Edge::Top => self.window.height() > 1 && inner.top() <= target.top(),
            Edge::Bottom => self.window.height() > 1 && inner.bottom() >= target.bottom(),
        }
    }

    pub(crate) fn next_edge_to_load(&self, target: Rect) -> Option<Edge> {
        Edge::ALL
            .into_iter()
            .find(|&edge| self.can_load(edge, target))
    }

    pub(crate) fn next_edge_to_unload(&self, target: Rect) -> Option<Edge> {
        Edge::ALL
            .into_iter()
            .find(|&edge| self.can_unload(edge, target))
    }
}
