// The optimizer driver for intermediate language code.

use clap::Parser;
use derive_more::Display;
use ilopt::front_end::*;
use ilopt::middle_end::optimization::{run_steps, Step, StepContext};
use log::info;
use std::str::FromStr;

// Input/output file types
#[derive(Display, Clone, Copy, PartialEq, Eq)]
enum FileType {
    #[display(fmt = "il")]
    Il,
    #[display(fmt = "json")]
    Ast,
}

// File names with associated file types.  This is used for determining input
// and output file types from file names.  The actual functionality is
// implemented in the `from_str` trait function.
#[derive(Clone)]
struct File {
    typ: FileType,
    name: String,
}

impl FromStr for File {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use FileType::*;

        let name = String::from(s);
        let typ = s
            .rsplit_once('.')
            .and_then(|(_, extension)| match extension {
                "il" => Some(Il),
                "json" => Some(Ast),
                _ => None,
            })
            .ok_or_else(|| {
                format!("Expected a file name with one of the following extensions: il, json. Got {s}")
            })?;

        Ok(File { typ, name })
    }
}

// Command-line arguments
#[derive(Parser)]
#[command(version, about)]
struct Args {
    // optimization steps to run, in order: `common-switch-prefix` (or `o`).
    #[arg(short = 'O', long = "step")]
    steps: Vec<Step>,
    input_file: File,
    output_file: File,
}

pub fn main() {
    env_logger::init();

    let args = Args::parse();
    let input_file = args.input_file.name.as_str();
    let output_file = args.output_file.name.as_str();

    let input_string = String::from_utf8(
        std::fs::read(input_file)
            .unwrap_or_else(|_| panic!("Could not read the input file {}", input_file)),
    )
    .expect("The input file does not contain valid utf-8 text");

    let program: Block = match args.input_file.typ {
        FileType::Il => parse(&input_string).unwrap_or_else(|e| panic!("Syntax error: {e}")),
        FileType::Ast => serde_json::from_str(&input_string)
            .unwrap_or_else(|e| panic!("AST JSON file is not valid: {e}")),
    };

    let program = program
        .validate()
        .unwrap_or_else(|e| panic!("The input program is not valid:\n{e}"));

    info!(
        "read {} ({}), running {} step(s)",
        input_file,
        args.input_file.typ,
        args.steps.len()
    );
    let mut context = StepContext::default();
    let program = run_steps(&args.steps, &mut context, program);

    let output = match args.output_file.typ {
        FileType::Il => format!("{}\n", program.0),
        FileType::Ast => serde_json::to_string_pretty(&program.0).unwrap(),
    };

    std::fs::write(output_file, output).unwrap_or_else(|_| {
        panic!(
            "Failed to write to the optimized program to the output file: {}",
            output_file
        )
    });
}
