//! The synth daemon: a single-threaded (current-thread Tokio runtime),
//! cooperatively-scheduled event loop. Each iteration accepts at most one
//! new connection, services ready client sockets, then asks the sample
//! clock to render whatever samples are due. Diagnostics go to stderr —
//! stdout carries only the raw PCM stream.

mod clock;

use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use log::{info, warn};
use tokio::net::{TcpListener, TcpStream};

use synth_control::{protocol, ConnTable, Connection, VoicesTable};
use synth_core::consts::{DEFAULT_PORT, MXCMD};
use synth_core::VoiceBank;
use synth_dsp::{Engine, Lfsr};

fn listen_port() -> u16 {
    std::env::var("SYNTH_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env().target(env_logger::Target::Stderr).init();

    let port = listen_port();
    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("cannot bind control socket on port {port}"))?;
    info!("listening for control connections on port {port}");

    let mut bank = VoiceBank::new();
    let table = VoicesTable::new();
    let engine = Engine::new();
    let mut lfsr = Lfsr::new();
    let mut clock = clock::SampleClock::new();
    let mut conns: ConnTable<TcpStream> = ConnTable::new();

    let stdout = std::io::stdout();
    let mut sink = stdout.lock();

    loop {
        tokio::select! {
            biased;
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, addr)) => {
                        if let Err(e) = stream.set_nodelay(true) {
                            warn!("failed to set TCP_NODELAY for {addr}: {e}");
                        }
                        if let Some(evicted) = conns.accept(Connection::new(stream)) {
                            info!("connection limit reached, evicting oldest connection");
                            drop(evicted);
                        }
                        info!("accepted control connection from {addr}");
                    }
                    Err(e) => warn!("accept failed: {e}"),
                }
            }
            _ = tokio::time::sleep(Duration::from_millis(10)) => {}
        }

        service_connections(&mut conns, &table, &mut bank).await;

        let dosamples = clock.tick();
        if dosamples > 0 {
            engine.render_block(&mut bank, &mut lfsr, dosamples as usize, |bytes| {
                let _ = sink.write_all(&bytes);
            });
        }
    }
}

/// Reads and writes every ready connection exactly once per iteration,
/// matching the source's non-retrying, non-blocking readiness pass. Closed
/// or errored connections are unlinked from the table.
async fn service_connections(conns: &mut ConnTable<TcpStream>, table: &VoicesTable, bank: &mut VoiceBank) {
    let mut dead = Vec::new();
    for (i, conn) in conns.iter_mut().enumerate() {
        let mut scratch = [0u8; MXCMD];
        match conn.id.try_read(&mut scratch) {
            Ok(0) => {
                dead.push(i);
                continue;
            }
            Ok(n) => {
                conn.cmdbuf.push_str(&String::from_utf8_lossy(&scratch[..n]));
                let (response, consumed) = protocol::drive(table, bank, &conn.cmdbuf);
                conn.cmdbuf.drain(..consumed);
                conn.rspbuf.push_str(&response);
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
            Err(_) => {
                dead.push(i);
                continue;
            }
        }

        if !conn.rspbuf.is_empty() {
            match conn.id.try_write(conn.rspbuf.as_bytes()) {
                Ok(n) => {
                    conn.rspbuf.drain(..n);
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
                Err(_) => dead.push(i),
            }
        }
    }

    for &i in dead.iter().rev() {
        conns.remove(i);
    }
}
