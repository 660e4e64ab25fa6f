//! Betting table geometry
//!
//! Maps a pointer coordinate in table-logical space to the wager shape it
//! represents. Pure geometry: no knowledge of balance or placed wagers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::{Column, Dozen, OutsideBet, WagerShape};
use crate::wheel::Number;

/// Number grid, top row to bottom row
pub const TABLE_ROWS: [[Number; 12]; 3] = [
    [3, 6, 9, 12, 15, 18, 21, 24, 27, 30, 33, 36],
    [2, 5, 8, 11, 14, 17, 20, 23, 26, 29, 32, 35],
    [1, 4, 7, 10, 13, 16, 19, 22, 25, 28, 31, 34],
];

const GRID_ROWS: usize = 3;
const GRID_COLS: usize = 12;

/// Axis-aligned box in table space (edges inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            min: Vec2::new(x0, y0),
            max: Vec2::new(x1, y1),
        }
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

fn center_of<T: PartialEq>(rects: &[(T, Rect)], wanted: T) -> Option<Vec2> {
    rects
        .iter()
        .find(|(item, _)| *item == wanted)
        .map(|(_, rect)| rect.center())
}

/// A wager shape inferred from a pointer position, plus where its chip sits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub shape: WagerShape,
    pub anchor: Vec2,
}

/// Layout descriptor: cell boxes for every region of the betting table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableLayout {
    /// Top-left corner of the number grid
    pub grid_origin: Vec2,
    pub cell_size: Vec2,
    /// Distance from a cell border that counts as "on the line"
    pub edge_tolerance: f32,
    pub zero: Rect,
    /// Column boxes, top to bottom
    pub columns: [(Column, Rect); 3],
    pub dozens: [(Dozen, Rect); 3],
    pub outside: [(OutsideBet, Rect); 6],
    /// Full drawable extent
    pub bounds: Rect,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self::standard()
    }
}

impl TableLayout {
    /// The standard single-zero layout
    pub fn standard() -> Self {
        let (cell_w, cell_h) = (60.0, 44.0);
        let zero_w = 78.0;
        let col_box_w = 72.0;
        let extra_h = 44.0;
        let (pad_x, pad_y) = (8.0, 6.0);

        let grid_w = GRID_COLS as f32 * cell_w;
        let grid_h = GRID_ROWS as f32 * cell_h;
        let grid_x0 = pad_x + zero_w;
        let grid_x1 = grid_x0 + grid_w;

        let zero = Rect::new(pad_x, pad_y, grid_x0, pad_y + grid_h);

        let column_order = [Column::Third, Column::Second, Column::First];
        let columns = std::array::from_fn(|i| {
            let y0 = pad_y + i as f32 * cell_h;
            (
                column_order[i],
                Rect::new(grid_x1, y0, grid_x1 + col_box_w, y0 + cell_h),
            )
        });

        let dozen_y0 = pad_y + grid_h;
        let dozen_w = grid_w / 3.0;
        let dozens = std::array::from_fn(|i| {
            let x0 = grid_x0 + i as f32 * dozen_w;
            (
                Dozen::ALL[i],
                Rect::new(x0, dozen_y0, x0 + dozen_w, dozen_y0 + extra_h),
            )
        });

        let outside_y0 = dozen_y0 + extra_h;
        let outside_w = grid_w / 6.0;
        let outside = std::array::from_fn(|i| {
            let x0 = grid_x0 + i as f32 * outside_w;
            (
                OutsideBet::LAYOUT_ORDER[i],
                Rect::new(x0, outside_y0, x0 + outside_w, outside_y0 + extra_h),
            )
        });

        let bounds = Rect::new(
            0.0,
            0.0,
            grid_x1 + col_box_w + pad_x,
            outside_y0 + extra_h + pad_y,
        );

        Self {
            grid_origin: Vec2::new(grid_x0, pad_y),
            cell_size: Vec2::new(cell_w, cell_h),
            edge_tolerance: 8.0,
            zero,
            columns,
            dozens,
            outside,
            bounds,
        }
    }

    /// Box of the number grid (3x12 cells)
    pub fn grid_rect(&self) -> Rect {
        let size = self.cell_size * Vec2::new(GRID_COLS as f32, GRID_ROWS as f32);
        Rect {
            min: self.grid_origin,
            max: self.grid_origin + size,
        }
    }

    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        let min = self.grid_origin + self.cell_size * Vec2::new(col as f32, row as f32);
        Rect {
            min,
            max: min + self.cell_size,
        }
    }

    fn number_at(row: isize, col: isize) -> Option<Number> {
        if (0..GRID_ROWS as isize).contains(&row) && (0..GRID_COLS as isize).contains(&col) {
            Some(TABLE_ROWS[row as usize][col as usize])
        } else {
            None
        }
    }

    /// Centre of the cell that holds `n` (zero included)
    pub fn number_center(&self, n: Number) -> Option<Vec2> {
        if n == 0 {
            return Some(self.zero.center());
        }
        TABLE_ROWS.iter().enumerate().find_map(|(row, cells)| {
            cells
                .iter()
                .position(|&c| c == n)
                .map(|col| self.cell_rect(row, col).center())
        })
    }

    /// Default chip position for a shape placed without a pointer (quick and call bets)
    pub fn anchor_for(&self, shape: &WagerShape) -> Vec2 {
        let anchor = match shape {
            WagerShape::Column(col) => center_of(&self.columns, *col),
            WagerShape::Dozen(dozen) => center_of(&self.dozens, *dozen),
            WagerShape::Outside(bet) => center_of(&self.outside, *bet),
            _ => {
                let centers: Vec<Vec2> = shape
                    .numbers()
                    .iter()
                    .filter_map(|&n| self.number_center(n))
                    .collect();
                (!centers.is_empty())
                    .then(|| centers.iter().copied().sum::<Vec2>() / centers.len() as f32)
            }
        };
        anchor.unwrap_or_else(|| self.bounds.center())
    }

    /// Resolve a table-logical point to the wager it represents.
    ///
    /// Priority: zero, columns, dozens, outside bets, then the number grid
    /// where proximity to cell borders selects corner over split over straight.
    pub fn resolve(&self, p: Vec2) -> Option<Candidate> {
        if self.zero.contains(p) {
            return Some(Candidate {
                shape: WagerShape::Straight(0),
                anchor: self.zero.center(),
            });
        }

        if let Some((col, rect)) = self.columns.iter().find(|(_, r)| r.contains(p)) {
            return Some(Candidate {
                shape: WagerShape::Column(*col),
                anchor: rect.center(),
            });
        }

        if let Some((dozen, rect)) = self.dozens.iter().find(|(_, r)| r.contains(p)) {
            return Some(Candidate {
                shape: WagerShape::Dozen(*dozen),
                anchor: Vec2::new(p.x, rect.center().y),
            });
        }

        if let Some((bet, rect)) = self.outside.iter().find(|(_, r)| r.contains(p)) {
            return Some(Candidate {
                shape: WagerShape::Outside(*bet),
                anchor: Vec2::new(p.x, rect.center().y),
            });
        }

        if !self.grid_rect().contains(p) {
            return None;
        }

        let offset = p - self.grid_origin;
        let col = (offset.x / self.cell_size.x).floor() as isize;
        let row = (offset.y / self.cell_size.y).floor() as isize;
        let num = Self::number_at(row, col)?;
        self.classify_in_cell(p, row, col, num)
    }

    fn classify_in_cell(&self, p: Vec2, row: isize, col: isize, num: Number) -> Option<Candidate> {
        let cell = self.cell_rect(row as usize, col as usize);
        let local = p - cell.min;
        let tol = self.edge_tolerance;

        let near_left = local.x <= tol;
        let near_right = local.x >= self.cell_size.x - tol;
        let near_top = local.y <= tol;
        let near_bottom = local.y >= self.cell_size.y - tol;

        let nb = |dr: isize, dc: isize| Self::number_at(row + dr, col + dc);

        // Corners: (vertical side, horizontal side, anchor)
        let corners = [
            (near_top && near_left, -1, -1, Vec2::new(cell.min.x, cell.min.y)),
            (near_top && near_right, -1, 1, Vec2::new(cell.max.x, cell.min.y)),
            (near_bottom && near_left, 1, -1, Vec2::new(cell.min.x, cell.max.y)),
            (near_bottom && near_right, 1, 1, Vec2::new(cell.max.x, cell.max.y)),
        ];
        for (hit, dr, dc, anchor) in corners {
            if !hit {
                continue;
            }
            if let (Some(diag), Some(vert), Some(horiz)) = (nb(dr, dc), nb(dr, 0), nb(0, dc)) {
                if let Some(shape) = WagerShape::corner([num, vert, horiz, diag]) {
                    return Some(Candidate { shape, anchor });
                }
            }
        }

        let mid = cell.center();
        let splits = [
            (near_left, 0, -1, Vec2::new(cell.min.x, mid.y)),
            (near_right, 0, 1, Vec2::new(cell.max.x, mid.y)),
            (near_top, -1, 0, Vec2::new(mid.x, cell.min.y)),
            (near_bottom, 1, 0, Vec2::new(mid.x, cell.max.y)),
        ];
        for (hit, dr, dc, anchor) in splits {
            if !hit {
                continue;
            }
            if let Some(other) = nb(dr, dc) {
                if let Some(shape) = WagerShape::split(num, other) {
                    return Some(Candidate { shape, anchor });
                }
            }
        }

        Some(Candidate {
            shape: WagerShape::Straight(num),
            anchor: mid,
        })
    }
}

/// Uniform scale + offset applied when the table is drawn into a viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f32,
    pub offset: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    /// Largest table zoom
    pub const MAX_SCALE: f32 = 2.3;

    /// Fit `content` into `viewport`, centred, keeping the aspect ratio
    pub fn fit(content: Vec2, viewport: Vec2) -> Option<Self> {
        if viewport.x < 10.0 || viewport.y < 10.0 || content.x <= 0.0 || content.y <= 0.0 {
            return None;
        }
        let scale = (viewport.x / content.x)
            .min(viewport.y / content.y)
            .min(Self::MAX_SCALE);
        let offset = (viewport - content * scale) / 2.0;
        Some(Self { scale, offset })
    }

    /// Screen point -> table-logical point
    pub fn to_logical(&self, screen: Vec2) -> Vec2 {
        let scale = if self.scale > 0.0 { self.scale } else { 1.0 };
        (screen - self.offset) / scale
    }

    /// Table-logical point -> screen point
    pub fn to_screen(&self, logical: Vec2) -> Vec2 {
        self.offset + logical * self.scale
    }
}
