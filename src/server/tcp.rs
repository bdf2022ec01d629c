//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Loop principal: acepta una conexión, la entrega al modelo de
//! concurrencia y vuelve a aceptar. Las conexiones que el acceptor descarta
//! no detienen el loop; solo un error del modelo (fork) lo termina.

use crate::config::{ConcurrencyMode, Config};
use crate::context::ServerContext;
use crate::dispatch;
use crate::error::ServerError;
use crate::server::acceptor;
use crate::server::concurrency::{ConcurrencyModel, Forking, Sequential};
use crate::server::listener;
use log::info;
use std::io;
use std::net::{SocketAddr, TcpListener};

pub struct Server {
    ctx: ServerContext,
    listener: TcpListener,
    model: Box<dyn ConcurrencyModel>,
}

impl Server {
    pub fn new(ctx: ServerContext, listener: TcpListener, model: Box<dyn ConcurrencyModel>) -> Self {
        Self { ctx, listener, model }
    }

    /// Arma contexto, socket de escucha y modelo a partir de la configuración
    pub fn from_config(config: &Config) -> Result<Self, ServerError> {
        let ctx = ServerContext::from_config(config)?;

        let address = config.address();
        let listener = listener::bind(&address).map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

        let model: Box<dyn ConcurrencyModel> = match config.concurrency {
            ConcurrencyMode::Single => Box::new(Sequential),
            ConcurrencyMode::Forking => Box::new(Forking::new()?),
        };

        Ok(Self::new(ctx, listener, model))
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Atiende conexiones hasta que ocurra un error fatal
    pub fn run(&self) -> Result<(), ServerError> {
        info!(
            "{} server listening on {}",
            self.model.name(),
            self.listener
                .local_addr()
                .map(|addr| addr.to_string())
                .unwrap_or_else(|_| "?".to_string())
        );

        loop {
            self.serve_one()?;
        }
    }

    /// Una iteración del loop: `false` si el acceptor descartó la conexión
    pub fn serve_one(&self) -> Result<bool, ServerError> {
        let Some(request) = acceptor::accept(&self.listener) else {
            return Ok(false);
        };

        self.model.serve(request, &|request| {
            dispatch::handle(request, &self.ctx);
        })?;
        Ok(true)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::handlers::testing::{context, temp_root, write_file};
    use std::fs;
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use std::thread;

    fn sequential_server(name: &str) -> (Server, std::path::PathBuf) {
        let root = temp_root(name);
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let server = Server::new(context(root.clone()), listener, Box::new(Sequential));
        (server, root)
    }

    fn send(addr: SocketAddr, raw: &'static [u8]) -> thread::JoinHandle<String> {
        let mut client = TcpStream::connect(addr).unwrap();
        thread::spawn(move || {
            client.write_all(raw).unwrap();
            client.shutdown(std::net::Shutdown::Write).unwrap();

            let mut buf = Vec::new();
            client.read_to_end(&mut buf).unwrap();
            String::from_utf8_lossy(&buf).into_owned()
        })
    }

    #[test]
    fn test_serve_one_static_file() {
        let (server, root) = sequential_server("tcp_file");
        write_file(&root.join("hello.txt"), "hello", 0o644);
        let addr = server.local_addr().unwrap();

        let client = send(addr, b"GET /hello.txt HTTP/1.0\r\nHost: localhost\r\n\r\n");
        assert!(server.serve_one().unwrap());

        let text = client.join().unwrap();
        assert_eq!(text, "HTTP/1.0 200 OK\r\nContent-Type: text/plain\r\n\r\nhello");

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_serve_in_arrival_order() {
        let (server, root) = sequential_server("tcp_fifo");
        write_file(&root.join("a.txt"), "first", 0o644);
        write_file(&root.join("b.txt"), "second", 0o644);
        let addr = server.local_addr().unwrap();

        let first = send(addr, b"GET /a.txt HTTP/1.0\r\nHost: h\r\n\r\n");
        let second = send(addr, b"GET /b.txt HTTP/1.0\r\nHost: h\r\n\r\n");
        assert!(server.serve_one().unwrap());
        assert!(server.serve_one().unwrap());

        assert!(first.join().unwrap().ends_with("first"));
        assert!(second.join().unwrap().ends_with("second"));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_bad_request_keeps_serving() {
        let (server, root) = sequential_server("tcp_bad");
        write_file(&root.join("ok.txt"), "ok", 0o644);
        let addr = server.local_addr().unwrap();

        let bad = send(addr, b"GET /ok.txt HTTP/1.0\r\nbroken header\r\n\r\n");
        assert!(server.serve_one().unwrap());
        assert!(bad.join().unwrap().starts_with("HTTP/1.0 400 Bad Request\r\n"));

        let good = send(addr, b"GET /ok.txt HTTP/1.0\r\nHost: h\r\n\r\n");
        assert!(server.serve_one().unwrap());
        assert!(good.join().unwrap().ends_with("\r\n\r\nok"));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_peer_closed_immediately() {
        let (server, root) = sequential_server("tcp_closed");
        let addr = server.local_addr().unwrap();

        drop(TcpStream::connect(addr).unwrap());
        assert!(server.serve_one().unwrap());

        let _ = fs::remove_dir_all(&root);
    }
}
