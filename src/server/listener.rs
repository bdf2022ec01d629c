//! # Socket de Escucha
//! src/server/listener.rs
//!
//! Crea el socket TCP de escucha con `SO_REUSEADDR`, para poder reiniciar
//! el servidor sin esperar a que expiren las conexiones en TIME_WAIT.

use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};

/// Largo de la cola de conexiones pendientes
const BACKLOG: i32 = 128;

/// Abre un socket de escucha en `address` (`host:port`)
pub fn bind(address: &str) -> io::Result<TcpListener> {
    let addr: SocketAddr = address.to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("no address for {}", address))
    })?;

    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    Ok(socket.into())
}
