//! # surge - terse command-line HTTP client
//!
//! Compiles `key<delimiter>value` tokens into a full HTTP request, sends it,
//! and pretty-prints the response for a terminal.
//!
//! ## Usage
//!
//! ```bash
//! # GET with a query parameter
//! surge httpbin.org/get q==5
//!
//! # Implicit POST with a JSON body
//! surge httpbin.org/post name=bob jsondata:=2
//!
//! # Form encoding, custom header, explicit method
//! surge -f PUT httpbin.org/put X-Token:abc name=bob
//!
//! # Upload files as multipart, or send one file as the raw body
//! surge httpbin.org/post upload@report.pdf
//! surge httpbin.org/post -@body.bin
//! ```
//!
//! Exits 0 on success; a response status of 400 or above exits with
//! `status - 399`; compilation and transport failures exit 1 with a
//! message on stderr.

use clap::Parser;
use surge::{run, Cli};

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {suggestion}");
            }
            std::process::exit(1);
        }
    }
}
