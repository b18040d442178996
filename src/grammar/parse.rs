use crate::grammar::{Grammar, GrammarError, Production, Symbol};

impl Grammar {
    pub fn parse(grammar: &str) -> Result<Self, GrammarError> {
        let mut productions: Vec<Production> = Vec::new();

        let mut previous_left: Option<usize> = None;
        for (i, line) in grammar.lines().enumerate() {
            if line.chars().all(|c| c.is_whitespace()) {
                continue;
            }
            let line_no = i + 1;
            let parts: Vec<&str> = line.split("->").collect();
            if parts.len() > 2 {
                return Err(GrammarError::TooManyArrows { line: line_no });
            }
            let (left, rights): (usize, &str) = if parts.len() == 2 {
                let left_str = parts[0].trim();
                let mut chars = left_str.chars();
                let left_char = match (chars.next(), chars.next()) {
                    (None, _) => return Err(GrammarError::EmptyLeft { line: line_no }),
                    (Some(c), None) if Symbol::classify(c) == Symbol::NonTerminal(c) => c,
                    _ => return Err(GrammarError::LeftNotSingleSymbol { line: line_no }),
                };
                let idx = match productions.iter().position(|p| p.left == left_char) {
                    Some(idx) => idx,
                    None => {
                        productions.push(Production::new(left_char, Vec::new()));
                        productions.len() - 1
                    }
                };
                (idx, parts[1].trim())
            } else {
                let trimmed = parts[0].trim();
                match (previous_left, trimmed.strip_prefix('|')) {
                    (Some(idx), Some(rest)) => (idx, rest.trim()),
                    _ => return Err(GrammarError::MissingLeft { line: line_no }),
                }
            };

            previous_left = Some(left);

            for right in rights.split('|') {
                let symbols: Vec<Symbol> = right
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .map(Symbol::classify)
                    .collect();
                productions[left].rights.push(symbols);
            }
        }

        Grammar::new(productions)
    }
}
