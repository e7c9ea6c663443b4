use crate::{PaylineId, SpinPlan, SymbolId, SymbolTable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineWin {
    pub line: PaylineId,
    pub symbol: SymbolId,
    pub payout: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpinEvaluation {
    pub wins: Vec<LineWin>,
    pub total: i64,
}

impl SpinEvaluation {
    pub fn is_win(&self) -> bool {
        !self.wins.is_empty()
    }

    pub fn first_symbol(&self) -> Option<SymbolId> {
        self.wins.first().map(|win| win.symbol)
    }
}

/// Checks every line in order; a line pays its symbol's value when all three
/// cells match. Several lines can pay on one spin.
pub fn evaluate(plan: &SpinPlan, lines: &[PaylineId], table: &SymbolTable) -> SpinEvaluation {
    let mut wins = Vec::new();
    for line in lines {
        let [a, b, c] = line.path();
        let first = plan.cell(a.0, a.1);
        if first == plan.cell(b.0, b.1) && first == plan.cell(c.0, c.1) {
            wins.push(LineWin {
                line: *line,
                symbol: first,
                payout: table.value(first),
            });
        }
    }
    let total = wins.iter().map(|win| win.payout).sum();
    SpinEvaluation { wins, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MachineConfig, PaylineSet, ReelFaces};

    fn plan(reels: [[usize; 3]; 3]) -> SpinPlan {
        SpinPlan::from_reels(reels.map(|[top, center, bottom]| ReelFaces::new(top, center, bottom)))
    }

    #[test]
    fn no_lines_on_mixed_grid() {
        let table = MachineConfig::classic().symbol_table();
        let grid = plan([[0, 1, 2], [3, 4, 5], [6, 7, 0]]);
        let eval = evaluate(&grid, PaylineSet::WithVerticals.lines(), &table);
        assert!(!eval.is_win());
        assert_eq!(eval.total, 0);
    }

    #[test]
    fn full_grid_pays_every_line() {
        let table = MachineConfig::classic().symbol_table();
        let grid = plan([[3, 3, 3], [3, 3, 3], [3, 3, 3]]);
        let eval = evaluate(&grid, PaylineSet::WithVerticals.lines(), &table);
        assert_eq!(eval.wins.len(), 8);
        assert_eq!(eval.total, 8 * table.value(3));
        let five = evaluate(&grid, PaylineSet::Standard.lines(), &table);
        assert_eq!(five.wins.len(), 5);
    }

    #[test]
    fn columns_only_pay_with_verticals() {
        let table = MachineConfig::classic().symbol_table();
        let grid = plan([[5, 5, 5], [0, 1, 2], [2, 0, 1]]);
        assert!(!evaluate(&grid, PaylineSet::Standard.lines(), &table).is_win());
        let eval = evaluate(&grid, PaylineSet::WithVerticals.lines(), &table);
        assert_eq!(
            eval.wins,
            vec![LineWin {
                line: PaylineId::LeftColumn,
                symbol: 5,
                payout: table.value(5),
            }]
        );
    }
}
