use std::collections::BTreeSet;

use proptest::{collection, prelude::*};

use crate::grammar::{Grammar, Symbol, END_MARK, EPSILON};

const NON_TERMINALS: [char; 4] = ['S', 'A', 'B', 'C'];
const SYMBOLS: [char; 7] = ['S', 'A', 'B', 'C', 'a', 'b', 'c'];

fn arb_body() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(EPSILON.to_string()),
        4 => collection::vec(prop::sample::select(SYMBOLS.to_vec()), 1..=4)
            .prop_map(|symbols| symbols.into_iter().collect()),
    ]
}

fn arb_grammar() -> impl Strategy<Value = Grammar> {
    collection::vec(collection::vec(arb_body(), 1..=3), NON_TERMINALS.len()).prop_map(|rules| {
        Grammar::from_rules(NON_TERMINALS.iter().copied().zip(rules))
            .expect("every non-terminal is defined")
    })
}

/// Leftmost derivation from the start symbol driven by `choices`. Gives up once the
/// choices run out.
fn derive(grammar: &Grammar, choices: &[usize]) -> Option<String> {
    let mut form: Vec<Symbol> = vec![Symbol::NonTerminal(grammar.start_symbol())];
    let mut choices = choices.iter();
    while let Some(i) = form.iter().position(|s| s.non_terminal().is_some()) {
        let nt = form[i].non_terminal()?;
        let rights = &grammar.production(nt)?.rights;
        let right = &rights[choices.next()? % rights.len()];
        form.splice(
            i..=i,
            right.iter().copied().filter(|s| *s != Symbol::Epsilon),
        );
    }
    Some(form.iter().map(Symbol::as_char).collect())
}

/// Whether `grammar` derives `word`. Grows the set of `(non-terminal, from, to)` spans
/// that derive `word[from..to]` until nothing changes.
fn derives(grammar: &Grammar, word: &[char]) -> bool {
    let n = word.len();
    let mut spans: BTreeSet<(char, usize, usize)> = BTreeSet::new();

    let ends = |spans: &BTreeSet<(char, usize, usize)>, right: &[Symbol], from: usize| {
        let mut at: BTreeSet<usize> = BTreeSet::from([from]);
        for symbol in right {
            at = at
                .iter()
                .flat_map(|&k| -> Vec<usize> {
                    match *symbol {
                        Symbol::Epsilon => vec![k],
                        Symbol::Terminal(t) if word.get(k) == Some(&t) => vec![k + 1],
                        Symbol::Terminal(_) => Vec::new(),
                        Symbol::NonTerminal(b) => {
                            (k..=n).filter(|&m| spans.contains(&(b, k, m))).collect()
                        }
                    }
                })
                .collect();
        }
        at
    };

    loop {
        let mut changed = false;
        for production in grammar.productions() {
            for right in &production.rights {
                for from in 0..=n {
                    for to in ends(&spans, right, from) {
                        changed |= spans.insert((production.left, from, to));
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }
    spans.contains(&(grammar.start_symbol(), 0, n))
}

proptest! {
    #[test]
    fn follow_of_start_has_end_mark(g in arb_grammar()) {
        let (_, follow) = g.calculate_first_follow();
        prop_assert!(follow.get(g.start_symbol()).unwrap().contains(&END_MARK));
        for (_, set) in follow.iter() {
            prop_assert!(!set.contains(&EPSILON));
        }
    }

    #[test]
    fn epsilon_body_means_epsilon_in_first(g in arb_grammar()) {
        let first = g.calculate_first();
        for production in g.productions() {
            if production.has_epsilon_body() {
                prop_assert!(first.nullable(production.left));
            }
        }
    }

    #[test]
    fn sets_are_closed(g in arb_grammar()) {
        let (first, follow) = g.calculate_first_follow();
        for production in g.productions() {
            let left_first = first.get(production.left).unwrap();
            let left_follow = follow.get(production.left).unwrap();
            for right in &production.rights {
                prop_assert!(first.of_sequence(right).is_subset(left_first));
                for (i, symbol) in right.iter().enumerate() {
                    if let Some(b) = symbol.non_terminal() {
                        let b_follow = follow.get(b).unwrap();
                        let beta = first.of_sequence(&right[i + 1..]);
                        for c in beta.iter().filter(|&&c| c != EPSILON) {
                            prop_assert!(b_follow.contains(c));
                        }
                        if beta.contains(&EPSILON) {
                            prop_assert!(left_follow.is_subset(b_follow));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn first_ignores_production_order(g in arb_grammar()) {
        let mut productions = g.productions().to_vec();
        productions.reverse();
        for production in &mut productions {
            production.rights.reverse();
        }
        let reordered = Grammar::new(productions).unwrap();

        prop_assert_eq!(g.calculate_first(), reordered.calculate_first());
    }

    #[test]
    fn table_is_complete(g in arb_grammar()) {
        let table = g.generate_ll1_parsing_table();
        let columns: BTreeSet<char> = g.terminals().into_iter().chain([END_MARK]).collect();

        for nt in g.non_terminal_iter() {
            for &t in &columns {
                prop_assert!(table.get(nt, t).is_some());
            }
        }
        prop_assert_eq!(table.is_ll1(), table.conflicting_cells().next().is_none());
    }

    #[test]
    fn derived_strings_are_accepted(
        g in arb_grammar(),
        choices in collection::vec(0usize..3, 0..48),
    ) {
        let table = g.generate_ll1_parsing_table();
        if !table.is_ll1() {
            return Ok(());
        }
        if let Some(sentence) = derive(&g, &choices) {
            let outcome = table.parse(&sentence, g.start_symbol(), false);
            prop_assert!(outcome.is_accepted(), "{:?} rejected: {:?}", sentence, outcome.rejection());
        }
    }

    #[test]
    fn ll1_tables_accept_only_the_language(
        g in arb_grammar(),
        word in collection::vec(prop::sample::select(vec!['a', 'b', 'c']), 0..6),
    ) {
        let table = g.generate_ll1_parsing_table();
        if !table.is_ll1() {
            return Ok(());
        }
        let sentence: String = word.iter().collect();
        let outcome = table.parse(&sentence, g.start_symbol(), false);
        prop_assert_eq!(
            outcome.is_accepted(),
            derives(&g, &word),
            "{:?}: {:?}",
            sentence,
            outcome.rejection()
        );
    }
}
