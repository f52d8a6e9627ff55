use std::fs::File;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser as ClapParser};
use tracing_subscriber::EnvFilter;

use httpfeed::{
    ParseError, ParserConfig, Request, format_debug, format_headers_only, format_json,
    request_from_reader_with_config,
};

/// httpfeed CLI: read one HTTP/1.1 request incrementally and print it.
///
/// Reads a raw HTTP request from a file, --raw string, or stdin through the
/// streaming reader and outputs a structured representation in the chosen
/// format.
///
/// Escape sequences (\r, \n, \t, \\) in the --raw value are interpreted so
/// you can pass a full HTTP request as a single shell argument.
#[derive(ClapParser)]
#[command(name = "httpfeed-cli", version, about, long_about = None)]
struct Cli {
    /// Path to a file containing a raw HTTP request.
    /// Reads from stdin when neither FILE nor --raw is given.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Raw HTTP request string (escape sequences \r \n \t \\ are expanded).
    #[arg(long)]
    raw: Option<String>,

    /// Output format.
    #[arg(short, long, default_value = "json", value_enum)]
    format: OutputFormat,

    /// Pretty-print JSON output (ignored for other formats).
    #[arg(short, long)]
    pretty: bool,

    /// Accepted protocol version after "HTTP/" (repeatable).
    #[arg(long = "allow-version", value_name = "VERSION", default_value = "1.1")]
    versions: Vec<String>,

    /// Hand at most this many bytes to the parser per read.
    #[arg(long, value_name = "BYTES")]
    read_size: Option<usize>,

    /// Starting size of the read buffer in bytes.
    #[arg(long, default_value = "8")]
    initial_buffer: usize,

    /// Maximum read buffer size in bytes (unbounded when omitted).
    #[arg(long)]
    max_buffer: Option<usize>,

    /// Maximum accepted Content-Length in bytes (unbounded when omitted).
    #[arg(long)]
    max_body: Option<usize>,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable debug output
    Debug,
    /// Request-line + headers only
    Headers,
}

/// Caps every read of the inner source at `limit` bytes.
struct ThrottledReader<R> {
    inner: R,
    limit: usize,
}

impl<R: Read> Read for ThrottledReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.limit);
        self.inner.read(&mut buf[..n])
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // When no input source is provided and stdin is a terminal (not piped),
    // show help instead of blocking.
    if cli.file.is_none() && cli.raw.is_none() && io::stdin().is_terminal() {
        Cli::command().print_help().ok();
        println!();
        process::exit(0);
    }

    let config = ParserConfig {
        versions: cli.versions.clone(),
        initial_buffer_size: cli.initial_buffer,
        max_buffer_size: cli.max_buffer,
        max_body_size: cli.max_body,
    };

    let request = match read_request(&cli, config) {
        Ok(r) => r,
        Err(e) => {
            let code = exit_code(&e);
            if code == 2 {
                eprintln!("Parse error: {e}");
            } else {
                eprintln!("Error reading input: {e}");
            }
            process::exit(code);
        }
    };

    let output = match cli.format {
        OutputFormat::Json => format_json(&request, cli.pretty),
        OutputFormat::Debug => format_debug(&request),
        OutputFormat::Headers => format_headers_only(&request),
    };

    print!("{output}");
}

/// Stream one request from --raw, a file, or stdin.
fn read_request(cli: &Cli, config: ParserConfig) -> Result<Request, ParseError> {
    let source: Box<dyn Read> = if let Some(raw) = &cli.raw {
        Box::new(io::Cursor::new(unescape(raw).into_bytes()))
    } else if let Some(path) = &cli.file {
        Box::new(File::open(path)?)
    } else {
        Box::new(io::stdin().lock())
    };

    match cli.read_size {
        Some(limit) => request_from_reader_with_config(
            ThrottledReader {
                inner: source,
                limit: limit.max(1),
            },
            config,
        ),
        None => request_from_reader_with_config(source, config),
    }
}

/// Exit status for a failed read: 2 when the request bytes are malformed,
/// 1 when the input itself failed or ended early.
fn exit_code(err: &ParseError) -> i32 {
    if err.is_protocol_error() { 2 } else { 1 }
}

/// Expand the escapes `\r`, `\n`, `\t` and `\\` in a `--raw` argument.
///
/// Unknown escapes and a trailing lone backslash are left untouched.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let expanded = match tail.as_bytes().first() {
            Some(b'r') => Some('\r'),
            Some(b'n') => Some('\n'),
            Some(b't') => Some('\t'),
            Some(b'\\') => Some('\\'),
            _ => None,
        };
        match expanded {
            Some(ch) => {
                out.push(ch);
                rest = &tail[1..];
            }
            None => {
                out.push('\\');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_expands_crlf() {
        assert_eq!(unescape(r"GET / HTTP/1.1\r\n\r\n"), "GET / HTTP/1.1\r\n\r\n");
        assert_eq!(unescape(r"a\\b\q"), "a\\b\\q");
        assert_eq!(unescape("tail\\"), "tail\\");
        assert_eq!(unescape(r"caf\é\t"), "caf\\é\t");
        assert_eq!(unescape("plain"), "plain");
    }

    #[test]
    fn exit_codes_split_protocol_and_input_errors() {
        assert_eq!(exit_code(&ParseError::MalformedHeaderLine("missing colon")), 2);
        assert_eq!(exit_code(&ParseError::BodyFraming("content-length exceeded")), 2);
        assert_eq!(exit_code(&ParseError::BufferLimitExceeded { limit: 8 }), 2);
        assert_eq!(exit_code(&ParseError::IncompleteRequest), 1);
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        assert_eq!(exit_code(&ParseError::Io(io_err)), 1);
    }

    #[test]
    fn throttled_reader_caps_each_read() {
        let mut reader = ThrottledReader {
            inner: io::Cursor::new(b"abcdef".to_vec()),
            limit: 4,
        };
        let mut buf = [0u8; 16];
        assert_eq!(reader.read(&mut buf).unwrap(), 4);
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }
}
