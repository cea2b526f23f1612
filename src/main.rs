use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::process;

use sol25::Interpreter;

const EXIT_USAGE: i32 = 10;
const EXIT_OPEN_INPUT: i32 = 11;

struct Options {
    source: Option<String>,
    input: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        source: None,
        input: None,
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!(
                    "Usage: sol25 [--source FILE] [--input FILE]\n\
                     Executes a SOL25 program given as an XML abstract syntax tree.\n\
                     --source FILE  the AST document (stdin when omitted)\n\
                     --input FILE   the program input stream (stdin when omitted)\n\
                     At least one of the two options must name a file."
                );
                process::exit(0);
            }
            "--source" => match iter.next() {
                Some(path) if options.source.is_none() => options.source = Some(path.clone()),
                _ => return Err("--source expects exactly one file".to_string()),
            },
            "--input" => match iter.next() {
                Some(path) if options.input.is_none() => options.input = Some(path.clone()),
                _ => return Err("--input expects exactly one file".to_string()),
            },
            other => return Err(format!("unknown option: {}", other)),
        }
    }
    if options.source.is_none() && options.input.is_none() {
        return Err("at least one of --source and --input must be given".to_string());
    }
    Ok(options)
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_args(&args).unwrap_or_else(|message| {
        eprintln!("{}", message);
        process::exit(EXIT_USAGE);
    });

    let source = match &options.source {
        Some(path) => std::fs::read_to_string(path).unwrap_or_else(|err| {
            eprintln!("failed to read {}: {}", path, err);
            process::exit(EXIT_OPEN_INPUT);
        }),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).unwrap_or_else(|err| {
                eprintln!("failed to read stdin: {}", err);
                process::exit(EXIT_OPEN_INPUT);
            });
            buf
        }
    };

    let input: Box<dyn BufRead> = match &options.input {
        Some(path) => {
            let file = File::open(path).unwrap_or_else(|err| {
                eprintln!("failed to open {}: {}", path, err);
                process::exit(EXIT_OPEN_INPUT);
            });
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut interpreter = Interpreter::with_input(input);
    match interpreter.run(&source) {
        Ok(output) => print!("{}", output),
        Err(err) => {
            // Output written before the failure still belongs to the user.
            print!("{}", interpreter.output());
            eprintln!("{}", err);
            process::exit(err.code.exit_code());
        }
    }
}
