//! `dsviz-tree`: build a tree from integers and print its JSON document.
//!
//! Usage:
//!   dsviz-tree <bst|avl|binary> <int>... [--delete <int>]...
//!
//! Values are inserted in argument order, then each `--delete` value is
//! removed in turn. `RUST_LOG=debug` shows rotations.

use dsviz_store::cli::{parse_tree_args, run_tree};
use std::io::{self, Write};

fn main() {
    env_logger::init();

    let cmd = match parse_tree_args(std::env::args().skip(1)) {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    match run_tree(&cmd) {
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
