//! # Acceptor
//! src/server/acceptor.rs
//!
//! Convierte una conexión pendiente en un [`Request`]:
//!
//! 1. `accept` sobre el socket de escucha (bloquea)
//! 2. Búsqueda inversa del cliente con `NI_NAMEREQD`: si la IP no tiene
//!    nombre, la conexión se descarta (no se usa la IP numérica)
//! 3. Envoltura del socket en un stream con buffer de lectura y escritura
//!
//! Cualquier fallo libera lo que se había creado y retorna `None`; el
//! llamador simplemente pasa a la siguiente conexión.

use crate::http::Request;
use log::{info, warn};
use socket2::SockAddr;
use std::ffi::CStr;
use std::io;
use std::net::{SocketAddr, TcpListener};

/// Tamaño del buffer de host para getnameinfo (NI_MAXHOST)
const MAX_HOST: usize = 1025;

/// Tamaño del buffer de servicio para getnameinfo (NI_MAXSERV)
const MAX_SERV: usize = 32;

/// Acepta la siguiente conexión; `None` significa "saltar esta iteración"
pub fn accept(listener: &TcpListener) -> Option<Request> {
    let (stream, addr) = match listener.accept() {
        Ok(pair) => pair,
        Err(e) => {
            warn!("Cannot accept connection: {}", e);
            return None;
        }
    };

    let (host, port) = match lookup_peer(&addr) {
        Ok(peer) => peer,
        Err(e) => {
            warn!("Cannot resolve peer {}: {}", addr, e);
            return None;
        }
    };

    match Request::new(stream, host, port) {
        Ok(request) => {
            info!("Accepted request from {}:{}", request.host(), request.port());
            Some(request)
        }
        Err(e) => {
            warn!("Cannot open socket stream for {}: {}", addr, e);
            None
        }
    }
}

/// Nombre de host y puerto del cliente
///
/// El host debe resolverse a un nombre (`NI_NAMEREQD`); el puerto se
/// entrega siempre en forma numérica.
pub fn lookup_peer(addr: &SocketAddr) -> io::Result<(String, String)> {
    let sockaddr = SockAddr::from(*addr);
    let mut host = [0 as libc::c_char; MAX_HOST];
    let mut serv = [0 as libc::c_char; MAX_SERV];

    // SAFETY: los buffers viven durante la llamada y sus largos son los reales;
    // getnameinfo los termina en NUL cuando retorna 0.
    let rc = unsafe {
        libc::getnameinfo(
            sockaddr.as_ptr(),
            sockaddr.len(),
            host.as_mut_ptr(),
            MAX_HOST as libc::socklen_t,
            serv.as_mut_ptr(),
            MAX_SERV as libc::socklen_t,
            libc::NI_NAMEREQD | libc::NI_NUMERICSERV,
        )
    };

    if rc != 0 {
        // SAFETY: gai_strerror retorna un string estático
        let message = unsafe { CStr::from_ptr(libc::gai_strerror(rc)) };
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            message.to_string_lossy().into_owned(),
        ));
    }

    // SAFETY: getnameinfo terminó ambos buffers en NUL
    let host = unsafe { CStr::from_ptr(host.as_ptr()) };
    let serv = unsafe { CStr::from_ptr(serv.as_ptr()) };

    Ok((
        host.to_string_lossy().into_owned(),
        serv.to_string_lossy().into_owned(),
    ))
}
