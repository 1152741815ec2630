//! Round-trip harness: reads one encoded value from stdin, decodes it,
//! re-encodes it, and writes the result to stdout.
//!
//! Usage: `roundtrip <json|json-verbose|msgpack>`

use std::io::{Read, Write};
use std::process::ExitCode;

use transit::{Decoder, Encoder, Format};

fn run() -> Result<(), String> {
    let arg = std::env::args()
        .nth(1)
        .ok_or_else(|| "usage: roundtrip <json|json-verbose|msgpack>".to_owned())?;
    let format = match arg.as_str() {
        "json" => Format::Json,
        "json-verbose" => Format::JsonVerbose,
        "msgpack" => Format::MsgPack,
        other => return Err(format!("unknown format: {other}")),
    };

    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .map_err(|e| e.to_string())?;

    let value = Decoder::new(format)
        .decode(&input)
        .map_err(|e| format!("decode: {e}"))?;
    let output = Encoder::new(format)
        .encode(&value)
        .map_err(|e| format!("encode: {e}"))?;

    std::io::stdout()
        .write_all(&output)
        .map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("roundtrip: {msg}");
            ExitCode::FAILURE
        }
    }
}
