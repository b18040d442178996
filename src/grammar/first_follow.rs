use std::collections::{BTreeMap, BTreeSet};

use super::{grammar::Symbol, Grammar, END_MARK, EPSILON};

/// FIRST(A) for every non-terminal `A`. The sets may contain [`EPSILON`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FirstSets {
    sets: BTreeMap<char, BTreeSet<char>>,
}

/// FOLLOW(A) for every non-terminal `A`. The sets may contain [`END_MARK`], never [`EPSILON`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FollowSets {
    sets: BTreeMap<char, BTreeSet<char>>,
}

impl FirstSets {
    pub fn get(&self, non_terminal: char) -> Option<&BTreeSet<char>> {
        self.sets.get(&non_terminal)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &BTreeSet<char>)> {
        self.sets.iter().map(|(nt, set)| (*nt, set))
    }

    pub fn nullable(&self, non_terminal: char) -> bool {
        self.get(non_terminal)
            .map_or(false, |set| set.contains(&EPSILON))
    }

    /// FIRST of an arbitrary symbol sequence. An empty sequence, or one made only of
    /// epsilon-deriving symbols, yields a set containing [`EPSILON`].
    pub fn of_sequence(&self, sequence: &[Symbol]) -> BTreeSet<char> {
        let mut first = BTreeSet::new();
        for symbol in sequence {
            match symbol {
                Symbol::Terminal(c) => {
                    first.insert(*c);
                    return first;
                }
                Symbol::NonTerminal(nt) => {
                    let nt_first = match self.get(*nt) {
                        Some(set) => set,
                        None => return first,
                    };
                    first.extend(nt_first.iter().filter(|&&c| c != EPSILON));
                    if !nt_first.contains(&EPSILON) {
                        return first;
                    }
                }
                Symbol::Epsilon => {}
            }
        }
        first.insert(EPSILON);
        first
    }
}

impl FollowSets {
    pub fn get(&self, non_terminal: char) -> Option<&BTreeSet<char>> {
        self.sets.get(&non_terminal)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &BTreeSet<char>)> {
        self.sets.iter().map(|(nt, set)| (*nt, set))
    }
}

/// Inserts every element of `items` into `set`, reporting whether the set grew.
fn extend_changed(set: &mut BTreeSet<char>, items: impl IntoIterator<Item = char>) -> bool {
    let before = set.len();
    set.extend(items);
    set.len() != before
}

impl Grammar {
    pub fn calculate_first(&self) -> FirstSets {
        let mut first = FirstSets {
            sets: self
                .non_terminal_iter()
                .map(|nt| (nt, BTreeSet::new()))
                .collect(),
        };

        let mut passes = 0;
        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;
            for production in self.productions() {
                for right in &production.rights {
                    let contribution = first.of_sequence(right);
                    if let Some(set) = first.sets.get_mut(&production.left) {
                        changed |= extend_changed(set, contribution);
                    }
                }
            }
        }
        log::debug!("FIRST sets converged after {} passes", passes);

        first
    }

    /// Needs fully converged FIRST sets; the two computations are not interleaved.
    pub fn calculate_follow(&self, first: &FirstSets) -> FollowSets {
        let mut follow = FollowSets {
            sets: self
                .non_terminal_iter()
                .map(|nt| (nt, BTreeSet::new()))
                .collect(),
        };
        if let Some(set) = follow.sets.get_mut(&self.start_symbol()) {
            set.insert(END_MARK);
        }

        let mut passes = 0;
        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;
            for production in self.productions() {
                for right in &production.rights {
                    for (i, symbol) in right.iter().enumerate() {
                        let b = match symbol.non_terminal() {
                            Some(b) => b,
                            None => continue,
                        };

                        // FIRST of an empty suffix is {ε}, so `A -> αB` takes the same path as
                        // a suffix that only derives ε.
                        let beta_first = first.of_sequence(&right[i + 1..]);
                        let mut additions: Vec<char> = beta_first
                            .iter()
                            .copied()
                            .filter(|&c| c != EPSILON)
                            .collect();
                        if beta_first.contains(&EPSILON) {
                            if let Some(left_follow) = follow.sets.get(&production.left) {
                                additions.extend(left_follow.iter().copied());
                            }
                        }

                        if let Some(set) = follow.sets.get_mut(&b) {
                            changed |= extend_changed(set, additions);
                        }
                    }
                }
            }
        }
        log::debug!("FOLLOW sets converged after {} passes", passes);

        follow
    }

    pub fn calculate_first_follow(&self) -> (FirstSets, FollowSets) {
        let first = self.calculate_first();
        let follow = self.calculate_follow(&first);
        (first, follow)
    }
}
