use std::collections::BTreeSet;

use super::{
    grammar::{Production, Symbol},
    Grammar, GrammarError,
};

/// `prefix` followed by `suffix`, with ε dropped unless nothing else is left.
fn concat(prefix: &[Symbol], suffix: &[Symbol]) -> Vec<Symbol> {
    let mut right: Vec<Symbol> = prefix
        .iter()
        .chain(suffix.iter())
        .copied()
        .filter(|s| *s != Symbol::Epsilon)
        .collect();
    if right.is_empty() {
        right.push(Symbol::Epsilon);
    }
    right
}

fn fresh_non_terminal(used: &mut BTreeSet<char>) -> Result<char, GrammarError> {
    let c = ('A'..='Z')
        .rev()
        .find(|c| !used.contains(c))
        .ok_or(GrammarError::OutOfNonTerminals)?;
    used.insert(c);
    Ok(c)
}

impl Grammar {
    /// Removes direct and indirect left recursion, keeping the start symbol. Each recursive
    /// non-terminal `A` gets a helper taken from the unused uppercase letters, `Z` first.
    ///
    /// A non-terminal whose bodies are all left recursive derives nothing and is left with
    /// no bodies.
    pub fn eliminate_left_recursion(&self) -> Result<Grammar, GrammarError> {
        let mut productions: Vec<Production> = self.productions().to_vec();
        let mut used: BTreeSet<char> = productions.iter().map(|p| p.left).collect();
        let mut new_productions: Vec<Production> = Vec::new();

        for i in 0..productions.len() {
            let (earlier, rest) = productions.split_at_mut(i);
            let nt = &mut rest[0];
            let itself = Symbol::NonTerminal(nt.left);

            // After substituting A_j, no body starts with A_0..=A_j.
            let mut rights = std::mem::take(&mut nt.rights);
            for replace in earlier.iter() {
                let head = Symbol::NonTerminal(replace.left);
                rights = rights
                    .into_iter()
                    .flat_map(|right| {
                        if right.first() == Some(&head) {
                            replace
                                .rights
                                .iter()
                                .map(|prefix| concat(prefix, &right[1..]))
                                .collect::<Vec<_>>()
                        } else {
                            vec![right]
                        }
                    })
                    .collect();
            }

            let mut recursive_rights: Vec<Vec<Symbol>> = Vec::new();
            for right in rights {
                if right.first() == Some(&itself) {
                    // A -> A is a cycle and contributes nothing.
                    if right.len() > 1 {
                        recursive_rights.push(right[1..].to_vec());
                    }
                } else {
                    nt.rights.push(right);
                }
            }

            if recursive_rights.is_empty() {
                continue;
            }
            if nt.rights.is_empty() {
                log::warn!("{} only has left recursive bodies and derives nothing", nt.left);
                continue;
            }

            let prime = fresh_non_terminal(&mut used)?;
            log::debug!("{} is left recursive, introducing {}", nt.left, prime);
            let tail = [Symbol::NonTerminal(prime)];

            for right in &mut nt.rights {
                *right = concat(right, &tail);
            }

            let mut prime_rights: Vec<Vec<Symbol>> = recursive_rights
                .iter()
                .map(|alpha| concat(alpha, &tail))
                .collect();
            prime_rights.push(vec![Symbol::Epsilon]);
            new_productions.push(Production::new(prime, prime_rights));
        }

        productions.extend(new_productions);
        Grammar::new(productions)
    }
}
