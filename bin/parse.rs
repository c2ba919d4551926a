// Parses intermediate language code from stdin and prints its AST as JSON.

use ::ilopt::front_end::*;

use std::io::Read;

pub fn main() {
    env_logger::init();

    let mut input_string = String::new();
    std::io::stdin().read_to_string(&mut input_string).unwrap();

    let program: Block = parse(&input_string).unwrap_or_else(|e| panic!("Syntax error: {e}"));
    let output = serde_json::to_string_pretty(&program).unwrap();

    println!("{output}");
}
