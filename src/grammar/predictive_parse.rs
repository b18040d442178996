use std::fmt;

use thiserror::Error;

use super::{
    grammar::{body_to_string, Symbol},
    LL1ParsingTable, END_MARK,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseRejection {
    #[error("Expected {expected}, got {found}")]
    Mismatch { expected: char, found: char },

    #[error("No production for {non_terminal} on input {lookahead}")]
    NoProduction { non_terminal: char, lookahead: char },

    #[error("{0} is not a terminal of the grammar")]
    UnknownSymbol(char),

    #[error("Stack exhausted with {remaining:?} left")]
    TrailingInput { remaining: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAction {
    Match(char),
    Apply { left: char, right: Vec<Symbol> },
    Error(ParseRejection),
}

impl fmt::Display for ParseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAction::Match(c) => write!(f, "Match and pop {}", c),
            ParseAction::Apply { left, right } => {
                write!(f, "Apply {} -> {}", left, body_to_string(right))
            }
            ParseAction::Error(e) => write!(f, "Error: {}", e),
        }
    }
}

/// One row of a parse trace. `stack` is printed bottom to top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStep {
    pub stack: String,
    pub input: String,
    pub action: ParseAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    rejection: Option<ParseRejection>,
    steps: Vec<ParseStep>,
}

impl ParseOutcome {
    pub fn is_accepted(&self) -> bool {
        self.rejection.is_none()
    }

    pub fn rejection(&self) -> Option<&ParseRejection> {
        self.rejection.as_ref()
    }

    /// Empty unless the parse was asked to trace.
    pub fn steps(&self) -> &[ParseStep] {
        &self.steps
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackEntry {
    End,
    Symbol(Symbol),
}

impl StackEntry {
    fn as_char(&self) -> char {
        match self {
            StackEntry::End => END_MARK,
            StackEntry::Symbol(s) => s.as_char(),
        }
    }
}

struct Tracer {
    enabled: bool,
    steps: Vec<ParseStep>,
}

impl Tracer {
    fn record(&mut self, stack: &[StackEntry], input: &[char], action: &ParseAction) {
        let stack: String = stack.iter().map(StackEntry::as_char).collect();
        let input: String = input.iter().collect();
        log::trace!("{:<20}{:<20}{}", stack, input, action);
        if self.enabled {
            self.steps.push(ParseStep {
                stack,
                input,
                action: action.clone(),
            });
        }
    }
}

impl LL1ParsingTable {
    /// Runs the table-driven predictive parse of `input` from `start_symbol`.
    ///
    /// The table is expected to be LL(1); a conflicting table is not rejected, the first
    /// body recorded in each cell is used. A left-recursive first body makes the parse loop
    /// forever, so check [`LL1ParsingTable::is_ll1`] first.
    pub fn parse(&self, input: &str, start_symbol: char, trace: bool) -> ParseOutcome {
        let mut tracer = Tracer {
            enabled: trace,
            steps: Vec::new(),
        };

        let augmented: Vec<char> = input.chars().chain(std::iter::once(END_MARK)).collect();
        let rejection = self.run(&augmented, start_symbol, &mut tracer).err();
        log::debug!(
            "{:?} is {}",
            input,
            if rejection.is_none() { "accepted" } else { "rejected" }
        );

        ParseOutcome {
            rejection,
            steps: tracer.steps,
        }
    }

    fn run(
        &self,
        input: &[char],
        start_symbol: char,
        tracer: &mut Tracer,
    ) -> Result<(), ParseRejection> {
        let mut stack = vec![
            StackEntry::End,
            StackEntry::Symbol(Symbol::NonTerminal(start_symbol)),
        ];
        let mut cursor = 0;

        let fail = |tracer: &mut Tracer, stack: &[StackEntry], rest: &[char], e: ParseRejection| {
            tracer.record(stack, rest, &ParseAction::Error(e.clone()));
            Err(e)
        };

        while let Some(&top) = stack.last() {
            let rest = &input[cursor..];
            let current = rest.first().copied().unwrap_or(END_MARK);

            let at_end = cursor + 1 >= input.len();
            if !at_end && (current == END_MARK || !self.is_lookahead(current)) {
                return fail(tracer, &stack, rest, ParseRejection::UnknownSymbol(current));
            }

            match top {
                StackEntry::End | StackEntry::Symbol(Symbol::Terminal(_)) => {
                    let expected = top.as_char();
                    if expected != current {
                        return fail(
                            tracer,
                            &stack,
                            rest,
                            ParseRejection::Mismatch {
                                expected,
                                found: current,
                            },
                        );
                    }
                    tracer.record(&stack, rest, &ParseAction::Match(expected));
                    stack.pop();
                    cursor += 1;
                }
                StackEntry::Symbol(Symbol::NonTerminal(nt)) => {
                    let right = match self.get(nt, current).and_then(|cell| cell.production()) {
                        Some(right) => right,
                        None => {
                            return fail(
                                tracer,
                                &stack,
                                rest,
                                ParseRejection::NoProduction {
                                    non_terminal: nt,
                                    lookahead: current,
                                },
                            )
                        }
                    };
                    tracer.record(
                        &stack,
                        rest,
                        &ParseAction::Apply {
                            left: nt,
                            right: right.to_vec(),
                        },
                    );
                    stack.pop();
                    stack.extend(
                        right
                            .iter()
                            .rev()
                            .filter(|s| **s != Symbol::Epsilon)
                            .map(|s| StackEntry::Symbol(*s)),
                    );
                }
                StackEntry::Symbol(Symbol::Epsilon) => {
                    stack.pop();
                }
            }
        }

        if cursor < input.len() {
            let remaining: String = input[cursor..].iter().collect();
            return fail(
                tracer,
                &stack,
                &input[cursor..],
                ParseRejection::TrailingInput { remaining },
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ParseAction, ParseRejection};
    use crate::grammar::{grammar::Symbol, Grammar, LL1ParsingTable};

    fn sample_table() -> LL1ParsingTable {
        Grammar::parse("S -> ABC | D\nA -> a | ε\nB -> b | ε\nC -> (S) | c\nD -> AC")
            .unwrap()
            .generate_ll1_parsing_table()
    }

    fn expression_table() -> LL1ParsingTable {
        Grammar::parse("E -> TR\nR -> +TR | ε\nT -> FY\nY -> *FY | ε\nF -> (E) | i")
            .unwrap()
            .generate_ll1_parsing_table()
    }

    #[test]
    fn sample_verdicts() {
        let table = sample_table();
        for accepted in ["abc", "ac", "(abc)", "c", "(ac)"] {
            assert!(table.parse(accepted, 'S', false).is_accepted(), "{}", accepted);
        }
        for rejected in ["b", "abcabc", "a", "()", "(ab)", ""] {
            assert!(!table.parse(rejected, 'S', false).is_accepted(), "{}", rejected);
        }
    }

    #[test]
    fn rejection_reasons() {
        let table = sample_table();

        assert_eq!(
            table.parse("abcabc", 'S', false).rejection(),
            Some(&ParseRejection::Mismatch {
                expected: '$',
                found: 'a'
            })
        );
        assert_eq!(
            table.parse("b", 'S', false).rejection(),
            Some(&ParseRejection::NoProduction {
                non_terminal: 'C',
                lookahead: '$'
            })
        );
        assert_eq!(
            table.parse("(ab)", 'S', false).rejection(),
            Some(&ParseRejection::NoProduction {
                non_terminal: 'C',
                lookahead: ')'
            })
        );
    }

    #[test]
    fn unknown_symbols_fail_fast() {
        let table = expression_table();

        assert_eq!(
            table.parse("i+x", 'E', false).rejection(),
            Some(&ParseRejection::UnknownSymbol('x'))
        );
        assert_eq!(
            table.parse("i$i", 'E', false).rejection(),
            Some(&ParseRejection::UnknownSymbol('$'))
        );
    }

    #[test]
    fn expression_grammar() {
        let table = expression_table();
        for accepted in ["i", "i+i", "i*i+i", "(i+i)*i", "((i))"] {
            assert!(table.parse(accepted, 'E', false).is_accepted(), "{}", accepted);
        }
        for rejected in ["", "+", "i+", "(i", "i)", "ii"] {
            assert!(!table.parse(rejected, 'E', false).is_accepted(), "{}", rejected);
        }
    }

    #[test]
    fn trace_records_every_step() {
        let table = sample_table();
        let outcome = table.parse("ac", 'S', true);

        assert!(outcome.is_accepted());
        let rows: Vec<(&str, &str)> = outcome
            .steps()
            .iter()
            .map(|s| (s.stack.as_str(), s.input.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("$S", "ac$"),
                ("$CBA", "ac$"),
                ("$CBa", "ac$"),
                ("$CB", "c$"),
                ("$C", "c$"),
                ("$c", "c$"),
                ("$", "$"),
            ]
        );
        assert_eq!(
            outcome.steps()[0].action,
            ParseAction::Apply {
                left: 'S',
                right: vec![
                    Symbol::NonTerminal('A'),
                    Symbol::NonTerminal('B'),
                    Symbol::NonTerminal('C')
                ]
            }
        );
        assert_eq!(outcome.steps()[3].action.to_string(), "Apply B -> ε");
        assert_eq!(outcome.steps()[6].action, ParseAction::Match('$'));
    }

    #[test]
    fn trace_ends_with_error() {
        let outcome = sample_table().parse("b", 'S', true);

        assert!(!outcome.is_accepted());
        let last = outcome.steps().last().unwrap();
        assert_eq!(last.stack, "$C");
        assert_eq!(last.action.to_string(), "Error: No production for C on input $");
    }

    #[test]
    fn no_trace_unless_asked() {
        assert!(sample_table().parse("abc", 'S', false).steps().is_empty());
    }
}
