use std::{env, fs, process};

use garnet::bytecode::{compile::Compiler, disasm, stack_check};
use garnet::lang::node::Node;
use garnet::Program;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut disasm_only = false;
    let mut check = false;
    let mut output: Option<String> = None;
    let mut input: Option<String> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--disasm" => disasm_only = true,
            "--check" => check = true,
            "-o" => match iter.next() {
                Some(path) => output = Some(path.clone()),
                None => {
                    eprintln!("-o requires an output path");
                    process::exit(1);
                }
            },
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other if other.starts_with('-') => {
                eprintln!("unknown flag: {}", other);
                print_usage();
                process::exit(1);
            }
            other => input = Some(other.to_string()),
        }
    }

    let Some(input) = input else {
        print_usage();
        process::exit(1);
    };

    let bytes = match fs::read(&input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Failed to read '{}': {}", input, e);
            process::exit(1);
        }
    };

    let ast: Node = match postcard::from_bytes(&bytes) {
        Ok(ast) => ast,
        Err(e) => {
            eprintln!("'{}' is not a serialized AST: {}", input, e);
            process::exit(1);
        }
    };

    let program = match Compiler::new(ast).compile(true) {
        Ok(ops) => Program::new(ops),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if check {
        match stack_check::check_ops(&program.ops) {
            Ok(net) => println!("stack effect ok (net {})", net),
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        }
    }

    if let Some(path) = &output {
        let encoded = match program.to_bytes() {
            Ok(encoded) => encoded,
            Err(e) => {
                eprintln!("Failed to encode program: {}", e);
                process::exit(1);
            }
        };
        if let Err(e) = fs::write(path, encoded) {
            eprintln!("Failed to write '{}': {}", path, e);
            process::exit(1);
        }
    }

    // without an output path the listing is the default output
    if disasm_only || output.is_none() {
        print!("{}", disasm::disassemble_program(&program));
    }
}

fn print_usage() {
    println!("GARNET - bytecode compiler");
    println!();
    println!("Usage:");
    println!("  garnet <file.ast>             Compile and print the listing");
    println!("  garnet <file.ast> -o <out>    Compile and write the bytecode");
    println!("  garnet --check <file.ast>     Also verify stack effects");
    println!("  garnet --disasm <file.ast>    Print the listing");
    println!("  garnet --help, -h             Show this help");
}
