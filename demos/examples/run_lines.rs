//! Runs command lines against the demo shell.
//!
//! Lines come from the arguments, or from stdin when none are given.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p shellkit-demos --example run_lines -- 'add 1.5 2' 'greet --style=loud you'
//! printf 'help\necho -u "quiet please"\n' | cargo run -p shellkit-demos --example run_lines
//! RUST_LOG=shellkit_engine=debug cargo run -p shellkit-demos --example run_lines -- 'repeat hi'
//! ```

use std::io::BufRead;

use shellkit_demos::{demo_shell, render};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let shell = match demo_shell() {
        Ok(shell) => shell,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let lines: Vec<String> = if args.is_empty() {
        std::io::stdin().lock().lines().map_while(Result::ok).collect()
    } else {
        args
    };

    for line in lines {
        println!("> {line}");
        if let Some(text) = render(&shell.execute(&line)) {
            println!("{text}");
        }
    }
}
