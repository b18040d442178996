use crowbook_text_processing::escape;
use serde::Serialize;

use super::{
    first_follow::{FirstSets, FollowSets},
    grammar::body_to_string,
    predictive_parse::ParseOutcome,
    Grammar, LL1ParsingTable, EPSILON,
};

fn tex_symbols(s: &str) -> String {
    escape::tex(s)
        .into_owned()
        .replace(EPSILON, "\\epsilon ")
}

/// Text-mode TeX, with `->` and ε set in math mode.
fn tex_text(s: &str) -> String {
    s.split("->")
        .map(|part| escape::tex(part).into_owned())
        .collect::<Vec<_>>()
        .join("$\\rightarrow$")
        .replace(EPSILON, "$\\epsilon$")
}

/// Right-aligns every column and joins them with ` | `.
fn align_columns(output: &[Vec<String>]) -> String {
    let columns = output.iter().map(|line| line.len()).max().unwrap_or(0);
    let width: Vec<usize> = (0..columns)
        .map(|j| {
            output
                .iter()
                .filter_map(|line| line.get(j))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    output
        .iter()
        .map(|line| {
            line.iter()
                .enumerate()
                .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput {
    pub left: char,
    pub rights: Vec<String>,
}

impl ProductionOutput {
    pub fn to_plaintext(&self, multiline: bool) -> String {
        self.rights
            .iter()
            .enumerate()
            .map(|(i, right)| {
                if i == 0 {
                    format!("{} -> {}", self.left, right)
                } else if multiline {
                    format!("  | {}", right)
                } else {
                    format!(" | {}", right)
                }
            })
            .collect::<Vec<_>>()
            .join(if multiline { "\n" } else { "" })
    }

    pub fn to_latex(&self, and_sign: bool) -> String {
        if self.rights.is_empty() {
            return String::new();
        }

        let left = if and_sign {
            format!("{} & \\rightarrow &", self.left)
        } else {
            format!("{} \\rightarrow ", self.left)
        };
        let right = self
            .rights
            .iter()
            .map(|right| tex_symbols(right))
            .collect::<Vec<_>>()
            .join(" \\mid ");

        left + &right
    }
}

#[derive(Serialize)]
pub struct ProductionOutputVec {
    productions: Vec<ProductionOutput>,
}

impl ProductionOutputVec {
    pub fn to_plaintext(&self) -> String {
        self.productions
            .iter()
            .map(|p| p.to_plaintext(false))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(self.productions.iter().map(|p| p.to_latex(true)))
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        ProductionOutputVec {
            productions: self
                .productions()
                .iter()
                .map(|p| ProductionOutput {
                    left: p.left,
                    rights: p.rights.iter().map(|r| body_to_string(r)).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct NonTerminalOutput {
    name: char,
    nullable: bool,
    first: Vec<char>,
    follow: Vec<char>,
}

fn join_chars(chars: &[char], separator: &str) -> String {
    chars
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

impl NonTerminalOutput {
    fn to_plaintext(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.name,
            self.nullable,
            join_chars(&self.first, ", "),
            join_chars(&self.follow, ", ")
        )
    }

    fn to_latex(&self) -> String {
        fn f(a: &[char]) -> String {
            a.iter()
                .map(|c| escape::tex(c.to_string()).into_owned())
                .collect::<Vec<_>>()
                .join(r"\ ")
                .replace(EPSILON, r"$\epsilon$")
        }

        format!(
            "{} & {} & {} & {}",
            self.name,
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Serialize)]
pub struct NonTerminalOutputVec {
    data: Vec<NonTerminalOutput>,
}

impl NonTerminalOutputVec {
    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|s| s.to_plaintext())
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl Grammar {
    /// Sets are listed in character order, with ε moved to the end of FIRST.
    pub fn to_non_terminal_output_vec(
        &self,
        first: &FirstSets,
        follow: &FollowSets,
    ) -> NonTerminalOutputVec {
        let data = self
            .non_terminal_iter()
            .map(|nt| {
                let mut t = NonTerminalOutput {
                    name: nt,
                    nullable: first.nullable(nt),
                    first: first
                        .get(nt)
                        .into_iter()
                        .flatten()
                        .copied()
                        .filter(|&c| c != EPSILON)
                        .collect(),
                    follow: follow.get(nt).into_iter().flatten().copied().collect(),
                };
                if t.nullable {
                    t.first.push(EPSILON);
                }
                t
            })
            .collect();
        NonTerminalOutputVec { data }
    }
}

#[derive(Serialize)]
struct LL1ParsingTableRow {
    non_terminal: char,
    cells: Vec<Vec<String>>,
    conflicts: Vec<bool>,
}

#[derive(Serialize)]
pub struct LL1ParsingTableOutput {
    ll1: bool,
    terminals: Vec<char>,
    rows: Vec<LL1ParsingTableRow>,
}

impl LL1ParsingTableOutput {
    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().map(|t| t.to_string()));
        let mut output: Vec<Vec<String>> = vec![header];
        for row in &self.rows {
            let mut line: Vec<String> = vec![row.non_terminal.to_string()];
            line.extend(row.cells.iter().zip(&row.conflicts).map(|(bodies, &conflict)| {
                let cell = bodies
                    .iter()
                    .map(|body| format!("{} -> {}", row.non_terminal, body))
                    .collect::<Vec<_>>()
                    .join(", ");
                if conflict {
                    cell + "*"
                } else {
                    cell
                }
            }));
            output.push(line);
        }

        format!(
            "{}\n\nThe grammar is {}",
            align_columns(&output),
            if self.ll1 { "LL(1)" } else { "not LL(1)" }
        )
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|t| format!("\\text{{{}}}", escape::tex(t.to_string()))),
        );
        let header = header.join(" & ");

        let mut output: Vec<String> = Vec::new();
        for row in &self.rows {
            let mut line: Vec<String> = vec![row.non_terminal.to_string()];
            line.extend(row.cells.iter().zip(&row.conflicts).map(|(bodies, &conflict)| {
                let cell = bodies
                    .iter()
                    .map(|body| format!("{} \\rightarrow {}", row.non_terminal, tex_symbols(body)))
                    .collect::<Vec<_>>()
                    .join("; ");
                if conflict {
                    format!("{{\\color{{red}}{}}}", cell)
                } else {
                    cell
                }
            }));
            output.push(line.join(" & "));
        }

        let output = output.join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }
}

impl LL1ParsingTable {
    pub fn to_output(&self) -> LL1ParsingTableOutput {
        let rows = self
            .non_terminals()
            .iter()
            .map(|&nt| {
                let (cells, conflicts) = self
                    .row(nt)
                    .map(|(_, cell)| {
                        (
                            cell.bodies().map(body_to_string).collect::<Vec<_>>(),
                            cell.is_conflicting(),
                        )
                    })
                    .unzip();
                LL1ParsingTableRow {
                    non_terminal: nt,
                    cells,
                    conflicts,
                }
            })
            .collect();

        LL1ParsingTableOutput {
            ll1: self.is_ll1(),
            terminals: self.lookaheads().to_vec(),
            rows,
        }
    }
}

#[derive(Serialize)]
struct ParseStepOutput {
    stack: String,
    input: String,
    action: String,
}

#[derive(Serialize)]
pub struct ParseOutcomeOutput {
    input: String,
    accepted: bool,
    reason: Option<String>,
    steps: Vec<ParseStepOutput>,
}

impl ParseOutcomeOutput {
    pub fn to_plaintext(&self) -> String {
        let verdict = format!(
            "\"{}\" is {} string",
            self.input,
            if self.accepted { "Valid" } else { "Invalid" }
        );
        if self.steps.is_empty() {
            return verdict;
        }

        let steps = self
            .steps
            .iter()
            .map(|s| format!("{:<20}{:<20}{}", s.stack, s.input, s.action))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "{:<20}{:<20}Action\n{}\n{}\n{}",
            "Stack",
            "Input",
            "-".repeat(60),
            steps,
            verdict
        )
    }

    pub fn to_latex(&self) -> String {
        let rows = self
            .steps
            .iter()
            .map(|s| {
                format!(
                    "{} & {} & {}",
                    escape::tex(s.stack.as_str()),
                    escape::tex(s.input.as_str()),
                    tex_text(&s.action)
                )
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        format!(
            "\\begin{{tabular}}{{l|l|l}}\nStack & Input & Action\\\\\\hline\n{}\\\\\n\\end{{tabular}}\n\n\\texttt{{{}}}: {}",
            rows,
            escape::tex(self.input.as_str()),
            if self.accepted { "accepted" } else { "rejected" }
        )
    }
}

impl ParseOutcome {
    pub fn to_output(&self, input: &str) -> ParseOutcomeOutput {
        ParseOutcomeOutput {
            input: input.to_string(),
            accepted: self.is_accepted(),
            reason: self.rejection().map(|r| r.to_string()),
            steps: self
                .steps()
                .iter()
                .map(|s| ParseStepOutput {
                    stack: s.stack.clone(),
                    input: s.input.clone(),
                    action: s.action.to_string(),
                })
                .collect(),
        }
    }
}
