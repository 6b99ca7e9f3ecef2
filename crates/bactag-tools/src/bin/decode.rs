use bactag_tools::{decode, parse_hex, render, OutputFormat};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bactag-decode")]
struct Args {
    /// Hex bytes to decode; read from --file or stdin when omitted.
    #[arg(long, conflicts_with = "file")]
    hex: Option<String>,
    /// Hex fixture file; `#` starts a comment.
    #[arg(long)]
    file: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "debug")]
    format: OutputFormat,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let input = match (args.hex, args.file) {
        (Some(hex), _) => hex,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let bytes = parse_hex(&input)?;
    match decode(&bytes) {
        Ok(envelopes) => println!("{}", render(&envelopes, args.format)?),
        Err(e) => {
            eprintln!("decode failed: {e}");
            std::process::exit(1);
        }
    }
    Ok(())
}
