use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("grammar has no production")]
    Empty,

    #[error("left side {0} is not a non-terminal")]
    LeftNotNonTerminal(char),

    #[error("{0} has an empty derivation, write ε instead")]
    EmptyBody(char),

    #[error("{0} has a derivation mixing ε with other symbols")]
    MisplacedEpsilon(char),

    #[error("non-terminal {0} is defined twice")]
    DuplicateNonTerminal(char),

    #[error("non-terminal {0} is used but never defined")]
    UndefinedNonTerminal(char),

    #[error("{0} is reserved and cannot appear in a derivation")]
    ReservedSymbol(char),

    #[error("Line {line}: too many \"->\"")]
    TooManyArrows { line: usize },

    #[error("Line {line}: empty left side")]
    EmptyLeft { line: usize },

    #[error("Line {line}: left side must be a single non-terminal")]
    LeftNotSingleSymbol { line: usize },

    #[error("Line {line}: cannot find left side")]
    MissingLeft { line: usize },

    #[error("no unused non-terminal left for a new production")]
    OutOfNonTerminals,
}
