extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::{Grammar, GrammarError, LL1ParsingTable, ParseOutcome};

fn error_json(e: impl std::fmt::Display) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

#[wasm_bindgen]
pub fn first_follow_to_json(grammar: &str) -> String {
    match Grammar::parse(grammar) {
        Ok(g) => {
            let (first, follow) = g.calculate_first_follow();
            g.to_non_terminal_output_vec(&first, &follow).to_json()
        }
        Err(e) => error_json(e),
    }
}

#[wasm_bindgen]
pub fn ll1_table_to_json(grammar: &str) -> String {
    match Grammar::parse(grammar) {
        Ok(g) => serde_json::to_string(&g.generate_ll1_parsing_table().to_output())
            .unwrap_or_else(error_json),
        Err(e) => error_json(e),
    }
}

#[wasm_bindgen]
pub fn parse_to_json(grammar: &str, input: &str) -> String {
    let g = match Grammar::parse(grammar) {
        Ok(g) => g,
        Err(e) => return error_json(e),
    };
    let table = g.generate_ll1_parsing_table();
    if !table.is_ll1() {
        return error_json("Cannot validate strings as the grammar is not LL(1).");
    }
    let outcome = table.parse(input, g.start_symbol(), true);
    serde_json::to_string(&outcome.to_output(input)).unwrap_or_else(error_json)
}
