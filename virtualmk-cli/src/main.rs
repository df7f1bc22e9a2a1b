//! VirtualMK CLI — load and execute `.mk` programs.
//!
//! Exit codes:
//! - 0: The machine ran (it halted on HLT or on a fatal error)
//! - 1: Usage, input, or output error

mod commands;

use std::process;

fn main() {
    virtualmk_cli::init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("error: no input file");
        eprintln!();
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "tokens" => commands::tokens(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        // A bare path is shorthand for `run <path>`.
        _ => commands::run(&args[1..]),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: virtualmk [run] <input.mk>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <input.mk>      Execute a program (default)");
    eprintln!("  tokens <input.mk>   Print the normalized token stream");
    eprintln!();
    eprintln!("Set RUST_LOG=debug to trace instruction dispatch on stderr.");
}
