//! `dsviz-huffman`: Huffman-encode text read from stdin.
//!
//! Usage:
//!   echo ABRACADABRA | dsviz-huffman
//!
//! Prints `{"encoded": <bits>, "tree": <document>}`. One trailing line
//! ending is dropped from the input.

use dsviz_store::cli::{run_huffman, strip_line_ending};
use std::io::{self, Read, Write};

fn main() {
    env_logger::init();

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match run_huffman(strip_line_ending(&buf)) {
        Ok(json) => {
            let mut out = io::stdout().lock();
            if let Err(e) = writeln!(out, "{json}") {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
