use bactag_core::text::TextOptions;
use bactag_tools::encode_xml;
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bactag-encode")]
struct Args {
    /// XML envelope document; read from stdin when omitted.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Fill missing elements with zero values instead of failing.
    #[arg(long)]
    lenient: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let xml = match args.file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let options = if args.lenient {
        TextOptions::lenient()
    } else {
        TextOptions::default()
    };

    match encode_xml(&xml, &options) {
        Ok(hex) => println!("{hex}"),
        Err(e) => {
            eprintln!("encode failed: {e}");
            std::process::exit(1);
        }
    }
    Ok(())
}
