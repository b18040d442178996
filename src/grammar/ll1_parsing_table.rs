use std::collections::{BTreeSet, HashMap};

use super::{
    first_follow::{FirstSets, FollowSets},
    grammar::{body_to_string, Symbol},
    Grammar, END_MARK, EPSILON,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseTableCell {
    production: Option<Vec<Symbol>>,
    conflicts: Vec<Vec<Symbol>>,
}

impl ParseTableCell {
    /// The first body assigned to this cell, kept even when later bodies conflict with it.
    pub fn production(&self) -> Option<&[Symbol]> {
        self.production.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.production.is_none()
    }

    pub fn is_conflicting(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Bodies that were assigned after the first one.
    pub fn conflicts(&self) -> &[Vec<Symbol>] {
        &self.conflicts
    }

    pub fn bodies(&self) -> impl Iterator<Item = &[Symbol]> {
        self.production
            .iter()
            .chain(self.conflicts.iter())
            .map(|body| body.as_slice())
    }

    /// Returns `true` when `body` conflicts with what the cell already holds.
    fn assign(&mut self, body: &[Symbol]) -> bool {
        match &self.production {
            None => {
                self.production = Some(body.to_vec());
                false
            }
            Some(existing) if existing == body => false,
            Some(_) => {
                if !self.conflicts.iter().any(|c| c == body) {
                    self.conflicts.push(body.to_vec());
                }
                true
            }
        }
    }
}

/// Predictive parsing table keyed on (non-terminal, lookahead). Every non-terminal has a
/// cell for every terminal of the grammar and for `$`, empty or not.
#[derive(Debug, Clone)]
pub struct LL1ParsingTable {
    non_terminals: Vec<char>,
    lookaheads: Vec<char>,
    cells: HashMap<(char, char), ParseTableCell>,
    ll1: bool,
}

impl LL1ParsingTable {
    /// Every terminal of `grammar` gets a column even when `terminals` leaves it out;
    /// `terminals` can only add columns.
    pub fn build(
        grammar: &Grammar,
        first: &FirstSets,
        follow: &FollowSets,
        terminals: &BTreeSet<char>,
    ) -> Self {
        let non_terminals: Vec<char> = grammar.non_terminal_iter().collect();
        let columns: BTreeSet<char> = terminals
            .iter()
            .copied()
            .chain(grammar.terminals())
            .filter(|&t| t != END_MARK)
            .collect();
        let lookaheads: Vec<char> = columns
            .into_iter()
            .chain(std::iter::once(END_MARK))
            .collect();

        let mut cells: HashMap<(char, char), ParseTableCell> = HashMap::new();
        for &nt in &non_terminals {
            for &t in &lookaheads {
                cells.insert((nt, t), ParseTableCell::default());
            }
        }

        let mut ll1 = true;
        let mut assign = |nt: char, lookahead: char, body: &[Symbol]| match cells
            .get_mut(&(nt, lookahead))
        {
            Some(cell) => {
                if cell.assign(body) {
                    log::warn!(
                        "conflict at M[{}, {}]: {} -> {}",
                        nt,
                        lookahead,
                        nt,
                        body_to_string(body)
                    );
                    ll1 = false;
                }
            }
            None => {
                log::warn!("lookahead {} is not a column of the table", lookahead);
                ll1 = false;
            }
        };

        for production in grammar.productions() {
            let nt = production.left;
            for right in &production.rights {
                let right_first = first.of_sequence(right);
                for &t in right_first.iter().filter(|&&t| t != EPSILON) {
                    assign(nt, t, right);
                }
                if right_first.contains(&EPSILON) {
                    for &f in follow.get(nt).into_iter().flatten() {
                        assign(nt, f, right);
                    }
                }
            }
        }

        Self {
            non_terminals,
            lookaheads,
            cells,
            ll1,
        }
    }

    pub fn is_ll1(&self) -> bool {
        self.ll1
    }

    pub fn get(&self, non_terminal: char, lookahead: char) -> Option<&ParseTableCell> {
        self.cells.get(&(non_terminal, lookahead))
    }

    pub fn non_terminals(&self) -> &[char] {
        &self.non_terminals
    }

    /// Terminal columns in ascending order, followed by `$`.
    pub fn lookaheads(&self) -> &[char] {
        &self.lookaheads
    }

    pub fn is_lookahead(&self, c: char) -> bool {
        self.lookaheads.contains(&c)
    }

    pub fn row(&self, non_terminal: char) -> impl Iterator<Item = (char, &ParseTableCell)> + '_ {
        self.lookaheads
            .iter()
            .filter_map(move |&t| self.get(non_terminal, t).map(|cell| (t, cell)))
    }

    pub fn conflicting_cells(&self) -> impl Iterator<Item = (char, char, &ParseTableCell)> + '_ {
        self.non_terminals.iter().flat_map(move |&nt| {
            self.row(nt)
                .filter(|(_, cell)| cell.is_conflicting())
                .map(move |(t, cell)| (nt, t, cell))
        })
    }
}

impl Grammar {
    pub fn generate_ll1_parsing_table(&self) -> LL1ParsingTable {
        let (first, follow) = self.calculate_first_follow();
        LL1ParsingTable::build(self, &first, &follow, &self.terminals())
    }
}
