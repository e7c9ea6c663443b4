use crate::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaylineId {
    CenterRow,
    TopRow,
    BottomRow,
    DiagonalDown,
    DiagonalUp,
    LeftColumn,
    MiddleColumn,
    RightColumn,
}

impl PaylineId {
    /// Evaluation order: rows, diagonals, then columns.
    pub const ALL: [PaylineId; 8] = [
        PaylineId::CenterRow,
        PaylineId::TopRow,
        PaylineId::BottomRow,
        PaylineId::DiagonalDown,
        PaylineId::DiagonalUp,
        PaylineId::LeftColumn,
        PaylineId::MiddleColumn,
        PaylineId::RightColumn,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PaylineId::CenterRow => "center_row",
            PaylineId::TopRow => "top_row",
            PaylineId::BottomRow => "bottom_row",
            PaylineId::DiagonalDown => "diagonal_down",
            PaylineId::DiagonalUp => "diagonal_up",
            PaylineId::LeftColumn => "left_column",
            PaylineId::MiddleColumn => "middle_column",
            PaylineId::RightColumn => "right_column",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PaylineId::CenterRow => "center row",
            PaylineId::TopRow => "top row",
            PaylineId::BottomRow => "bottom row",
            PaylineId::DiagonalDown => "diagonal down",
            PaylineId::DiagonalUp => "diagonal up",
            PaylineId::LeftColumn => "left column",
            PaylineId::MiddleColumn => "middle column",
            PaylineId::RightColumn => "right column",
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(
            self,
            PaylineId::LeftColumn | PaylineId::MiddleColumn | PaylineId::RightColumn
        )
    }

    /// The three `(reel, row)` cells of the line.
    pub fn path(self) -> [(usize, Row); 3] {
        match self {
            PaylineId::CenterRow => [(0, Row::Center), (1, Row::Center), (2, Row::Center)],
            PaylineId::TopRow => [(0, Row::Top), (1, Row::Top), (2, Row::Top)],
            PaylineId::BottomRow => [(0, Row::Bottom), (1, Row::Bottom), (2, Row::Bottom)],
            PaylineId::DiagonalDown => [(0, Row::Top), (1, Row::Center), (2, Row::Bottom)],
            PaylineId::DiagonalUp => [(0, Row::Bottom), (1, Row::Center), (2, Row::Top)],
            PaylineId::LeftColumn => [(0, Row::Top), (0, Row::Center), (0, Row::Bottom)],
            PaylineId::MiddleColumn => [(1, Row::Top), (1, Row::Center), (1, Row::Bottom)],
            PaylineId::RightColumn => [(2, Row::Top), (2, Row::Center), (2, Row::Bottom)],
        }
    }

    pub fn contains(self, reel: usize, row: Row) -> bool {
        self.path().iter().any(|cell| *cell == (reel, row))
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaylineSet {
    /// Rows and diagonals.
    #[default]
    Standard,
    /// Rows, diagonals and the three columns.
    WithVerticals,
}

impl PaylineSet {
    pub fn lines(self) -> &'static [PaylineId] {
        match self {
            PaylineSet::Standard => &PaylineId::ALL[..5],
            PaylineSet::WithVerticals => &PaylineId::ALL,
        }
    }

    pub fn has_verticals(self) -> bool {
        matches!(self, PaylineSet::WithVerticals)
    }
}
