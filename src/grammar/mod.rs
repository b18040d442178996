pub mod eliminate_left_recursion;
pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod ll1_parsing_table;
pub mod parse;
pub mod predictive_parse;
pub mod pretty_print;

#[cfg(test)]
mod tests;

pub use error::GrammarError;
pub use first_follow::{FirstSets, FollowSets};
pub use grammar::{Grammar, Production, Symbol};
pub use ll1_parsing_table::{LL1ParsingTable, ParseTableCell};
pub use predictive_parse::{ParseAction, ParseOutcome, ParseRejection, ParseStep};

pub const EPSILON: char = 'ε';
pub const EPSILON_ALIAS: char = 'ϵ';
pub const END_MARK: char = '$';
