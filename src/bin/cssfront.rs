//! The demo CLI: reads a document from stdin, parses it in one of four
//! modes selected by the first argument, and dumps the resulting AST (or,
//! for `zml`, reports the first structural failure). Grounded on
//! `gosub_css3`'s `src/bin/css3-parser.rs` (read input, parse, dump or
//! report, `-d`/`--debug` behind `simple_logger`), except the mode
//! dispatch here is positional and arity-sensitive in a way `clap`'s
//! subcommand model doesn't fit, so arguments are parsed by hand.

use std::io::{self, Read};
use std::process::exit;

use anyhow::Result;
use simple_logger::SimpleLogger;

use cssfront::dump::dump;
use cssfront::error::ParseFailure;
use cssfront::parser::{parse_list_of_component_values, parse_stylesheet, ParserConfig};
use cssfront::tokenizer::Lexer;
use cssfront::zml::{parse_zml_document, ZmlConfig};

enum Mode {
    Stylesheet,
    Components,
    Tokens,
    Zml,
}

fn usage_error() -> ! {
    eprintln!("usage: cssfront [-d|--debug] [stylesheet|components|tokens|zml]");
    exit(1);
}

fn main() -> Result<()> {
    let mut debug = false;
    let mut mode_arg: Option<String> = None;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-d" | "--debug" => debug = true,
            _ if mode_arg.is_none() => mode_arg = Some(arg),
            _ => usage_error(),
        }
    }

    if debug {
        SimpleLogger::new().init().expect("logger already initialized");
    }

    let mode = match mode_arg.as_deref() {
        None | Some("stylesheet") => Mode::Stylesheet,
        Some("components") => Mode::Components,
        Some("tokens") => Mode::Tokens,
        Some("zml") => Mode::Zml,
        Some(_) => usage_error(),
    };

    let mut source = String::new();
    io::stdin().read_to_string(&mut source)?;

    match mode {
        Mode::Stylesheet => run_stylesheet(&source),
        Mode::Components => run_components(&source),
        Mode::Tokens => run_tokens(&source),
        Mode::Zml => run_zml(&source),
    }
}

fn run_stylesheet(source: &str) -> Result<()> {
    match parse_stylesheet(source, ParserConfig::default()) {
        Ok(out) => {
            print!("{}", dump(&out.ast, out.root));
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {e}");
            exit(1);
        }
    }
}

fn run_components(source: &str) -> Result<()> {
    match parse_list_of_component_values(source, ParserConfig::default()) {
        Ok(out) => {
            print!("{}", dump(&out.ast, out.root));
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {e}");
            exit(1);
        }
    }
}

fn run_tokens(source: &str) -> Result<()> {
    let mut lexer = match Lexer::new(source) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("error: {e}");
            exit(1);
        }
    };

    let mut index = 0usize;
    loop {
        let tok = lexer.consume();
        println!("{index}: {:?}", tok.tag);
        if tok.tag.is_eof() {
            break;
        }
        index += 1;
    }
    Ok(())
}

fn run_zml(source: &str) -> Result<()> {
    match parse_zml_document(source, ZmlConfig::default()) {
        Ok(out) => {
            print!("{}", dump(&out.ast, out.root));
            Ok(())
        }
        Err(ParseFailure::Zml(e)) => {
            eprintln!("error at location {}: {}", e.location.offset(), e.cause);
            exit(1);
        }
        Err(e) => {
            eprintln!("error: {e}");
            exit(1);
        }
    }
}
