use std::collections::{BTreeSet, HashSet};
use std::fmt;

use super::{GrammarError, END_MARK, EPSILON, EPSILON_ALIAS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    NonTerminal(char),
    Terminal(char),
    Epsilon,
}

impl Symbol {
    /// Uppercase ASCII letters are non-terminals, the epsilon marker is its own class and
    /// every other character is a terminal.
    pub fn classify(c: char) -> Self {
        if c == EPSILON || c == EPSILON_ALIAS {
            Symbol::Epsilon
        } else if c.is_ascii_uppercase() {
            Symbol::NonTerminal(c)
        } else {
            Symbol::Terminal(c)
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Symbol::NonTerminal(c) | Symbol::Terminal(c) => *c,
            Symbol::Epsilon => EPSILON,
        }
    }

    pub fn non_terminal(&self) -> Option<char> {
        match self {
            Symbol::NonTerminal(c) => Some(*c),
            _ => None,
        }
    }

    pub fn terminal(&self) -> Option<char> {
        match self {
            Symbol::Terminal(c) => Some(*c),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

pub fn body_to_string(body: &[Symbol]) -> String {
    body.iter().map(Symbol::as_char).collect()
}

/// A non-terminal together with all of its derivation bodies, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub left: char,
    pub rights: Vec<Vec<Symbol>>,
}

impl Production {
    pub fn new(left: char, rights: Vec<Vec<Symbol>>) -> Self {
        Self { left, rights }
    }

    /// Every character of a derivation string is one symbol.
    pub fn from_strs<S: AsRef<str>>(left: char, rights: impl IntoIterator<Item = S>) -> Self {
        Self {
            left,
            rights: rights
                .into_iter()
                .map(|right| right.as_ref().chars().map(Symbol::classify).collect())
                .collect(),
        }
    }

    pub fn has_epsilon_body(&self) -> bool {
        self.rights.iter().any(|right| right == &[Symbol::Epsilon])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    productions: Vec<Production>,
}

impl Grammar {
    /// The first production's left side becomes the start symbol.
    pub fn new(productions: Vec<Production>) -> Result<Self, GrammarError> {
        if productions.is_empty() {
            return Err(GrammarError::Empty);
        }

        let mut defined: HashSet<char> = HashSet::new();
        for production in &productions {
            if Symbol::classify(production.left) != Symbol::NonTerminal(production.left) {
                return Err(GrammarError::LeftNotNonTerminal(production.left));
            }
            if !defined.insert(production.left) {
                return Err(GrammarError::DuplicateNonTerminal(production.left));
            }
        }

        for production in &productions {
            for right in &production.rights {
                if right.is_empty() {
                    return Err(GrammarError::EmptyBody(production.left));
                }
                if right.len() > 1 && right.contains(&Symbol::Epsilon) {
                    return Err(GrammarError::MisplacedEpsilon(production.left));
                }
                for symbol in right {
                    match symbol {
                        Symbol::NonTerminal(c) if !defined.contains(c) => {
                            return Err(GrammarError::UndefinedNonTerminal(*c));
                        }
                        Symbol::Terminal(END_MARK) => {
                            return Err(GrammarError::ReservedSymbol(END_MARK));
                        }
                        _ => {}
                    }
                }
            }
        }

        Ok(Self { productions })
    }

    /// Builds a grammar from ordered `(non-terminal, derivation strings)` pairs.
    pub fn from_rules<I, R, S>(rules: I) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = (char, R)>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            rules
                .into_iter()
                .map(|(left, rights)| Production::from_strs(left, rights))
                .collect(),
        )
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, non_terminal: char) -> Option<&Production> {
        self.productions.iter().find(|p| p.left == non_terminal)
    }

    pub fn start_symbol(&self) -> char {
        self.productions[0].left
    }

    pub fn non_terminal_iter(&self) -> impl Iterator<Item = char> + '_ {
        self.productions.iter().map(|p| p.left)
    }

    pub fn is_non_terminal(&self, c: char) -> bool {
        self.production(c).is_some()
    }

    /// Terminals occurring in any derivation body, `$` excluded.
    pub fn terminals(&self) -> BTreeSet<char> {
        self.productions
            .iter()
            .flat_map(|p| p.rights.iter())
            .flatten()
            .filter_map(Symbol::terminal)
            .collect()
    }
}
