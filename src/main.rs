use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use clap::{Parser, ValueEnum};
use ll1_helper::Grammar;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Productions
    Prod,
    /// First and follow sets
    Ff,
    /// LL(1) parsing table
    Ll1,
    /// Predictive parse of every --input string
    Parse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Plain,
    Latex,
    Json,
}

#[derive(Parser)]
#[command(name = "ll1-helper")]
#[command(about = "FIRST/FOLLOW sets, LL(1) parsing tables and predictive parsing")]
#[command(version)]
struct Cli {
    /// Eliminate left recursion before anything else
    #[arg(long)]
    elf: bool,

    /// What to print
    #[arg(value_enum, required = true, num_args = 1..)]
    outputs: Vec<Output>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,

    /// String to validate with the `parse` output, may be repeated
    #[arg(short, long = "input")]
    inputs: Vec<String>,

    /// Show the parsing steps
    #[arg(short, long)]
    trace: bool,

    /// Grammar file, stdin when absent
    #[arg(short, long)]
    grammar: Option<PathBuf>,
}

impl Cli {
    fn parse_without_inputs(&self) -> bool {
        self.outputs.contains(&Output::Parse) && self.inputs.is_empty()
    }
}

fn render<T: serde::Serialize>(
    format: OutputFormat,
    value: &T,
    plain: impl FnOnce(&T) -> String,
    latex: impl FnOnce(&T) -> String,
) -> Result<String, serde_json::Error> {
    Ok(match format {
        OutputFormat::Plain => plain(value),
        OutputFormat::Latex => latex(value),
        OutputFormat::Json => serde_json::to_string(value)?,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.parse_without_inputs() {
        eprintln!("Nothing to parse, pass strings with -i.");
    }

    let input: String = match &cli.grammar {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().lock().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut g = Grammar::parse(&input)?;
    if cli.elf {
        g = g.eliminate_left_recursion()?;
    }

    for output in &cli.outputs {
        match output {
            Output::Prod => {
                let t = g.to_production_output_vec();
                println!("{}", render(cli.format, &t, |t| t.to_plaintext(), |t| t.to_latex())?);
            }
            Output::Ff => {
                let (first, follow) = g.calculate_first_follow();
                let t = g.to_non_terminal_output_vec(&first, &follow);
                println!("{}", render(cli.format, &t, |t| t.to_plaintext(), |t| t.to_latex())?);
            }
            Output::Ll1 => {
                let t = g.generate_ll1_parsing_table().to_output();
                println!("{}", render(cli.format, &t, |t| t.to_plaintext(), |t| t.to_latex())?);
            }
            Output::Parse => {
                let table = g.generate_ll1_parsing_table();
                if !table.is_ll1() {
                    eprintln!("Cannot validate strings as the grammar is not LL(1).");
                    continue;
                }
                for s in &cli.inputs {
                    let t = table.parse(s, g.start_symbol(), cli.trace).to_output(s);
                    println!("{}", render(cli.format, &t, |t| t.to_plaintext(), |t| t.to_latex())?);
                }
            }
        }
    }

    Ok(())
}
