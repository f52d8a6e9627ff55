use std::io::{self, BufRead, Write};
use std::net::UdpSocket;
use std::process;

use clap::Parser as ClapParser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Forward each line typed on stdin as one UDP datagram.
///
/// A debugging aid for watching raw bytes arrive at a listener. Lines are
/// sent verbatim, trailing newline included, with no framing.
#[derive(ClapParser)]
#[command(name = "udp-relay", version, about, long_about = None)]
struct Cli {
    /// Destination address for the datagrams.
    #[arg(short, long, default_value = "127.0.0.1:42069")]
    addr: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli.addr) {
        error!(error = %e, "relay stopped");
        process::exit(1);
    }
}

fn run(addr: &str) -> io::Result<()> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect(addr)?;
    info!(destination = addr, "relaying stdin lines");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        write!(stdout, ">")?;
        stdout.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            info!("end of input");
            return Ok(());
        }
        socket.send(line.as_bytes())?;
    }
}
