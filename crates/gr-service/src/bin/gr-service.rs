//! gr-service — dev-convenience front end for the routing core.
//!
//! The real HTTP/RPC transport that wraps `gr_route::handle` is an external
//! collaborator's concern, not this crate's. This binary exists only so the
//! library can be exercised without one: set `PORT` for a one-request-per-line
//! TCP loop, or leave it unset to read a single envelope from stdin and print
//! the response to stdout.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;

use anyhow::{Context, Result};

use gr_service::{AnyCatalog, HttpGeofenceCatalog, NullGeofenceCatalog, ServiceConfig, ServiceState};

fn main() -> Result<()> {
    env_logger::init();

    let config = ServiceConfig::from_env();
    log::info!("loading prepared graph from {}", config.graph_path.display());
    let graph = gr_service::load_graph(&config.graph_path)
        .with_context(|| format!("loading graph from {}", config.graph_path.display()))?;

    let catalog = match &config.geofence_catalog_url {
        Some(url) => AnyCatalog::Http(HttpGeofenceCatalog::new(url.clone(), config.geofence_timeout_ms)),
        None => {
            log::warn!("GEOFENCE_CATALOG_URL unset; requests with geofence references will fail");
            AnyCatalog::Null(NullGeofenceCatalog)
        }
    };

    let state = ServiceState::new(graph, catalog);

    match config.port {
        Some(port) => serve_tcp(&state, port),
        None => serve_stdio(&state),
    }
}

/// One JSON request envelope per line in, one response envelope per line out.
/// A dev convenience, not a production listener: single-threaded, no
/// keep-alive, no backpressure.
fn serve_tcp<C: gr_core::GeofenceCatalog>(state: &ServiceState<C>, port: u16) -> Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port)).with_context(|| format!("binding port {port}"))?;
    log::info!("listening on 0.0.0.0:{port} (dev mode, one request per line)");

    for stream in listener.incoming() {
        let mut stream = stream.context("accepting connection")?;
        let mut reader = BufReader::new(stream.try_clone().context("cloning stream")?);
        let mut line = String::new();
        if reader.read_line(&mut line).context("reading request line")? == 0 {
            continue;
        }
        let response = state.handle_event(line.trim_end());
        writeln!(stream, "{response}").context("writing response")?;
    }

    Ok(())
}

fn serve_stdio<C: gr_core::GeofenceCatalog>(state: &ServiceState<C>) -> Result<()> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input).context("reading request envelope from stdin")?;
    let response = state.handle_event(input.trim_end());
    println!("{response}");
    Ok(())
}
