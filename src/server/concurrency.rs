//! # Modelos de Concurrencia
//! src/server/concurrency.rs
//!
//! Dos estrategias intercambiables sobre el mismo pipeline
//! acceptor → dispatcher → handler:
//!
//! - [`Sequential`]: el mismo flujo de control sirve un request completo
//!   antes de aceptar el siguiente. Orden FIFO estricto; un handler lento
//!   bloquea a todos los demás clientes.
//! - [`Forking`]: un proceso hijo por request. El hijo sirve exactamente un
//!   request y termina sin volver al loop de accept; el padre no lo espera
//!   y el kernel lo recoge (`SIGCHLD` ignorado), así que no quedan zombies.
//!   Si `fork` falla, el error es fatal para el servidor.

use crate::error::ServerError;
use crate::http::Request;
use log::debug;
use nix::sys::signal::{signal, SigHandler, Signal};
use nix::unistd::{fork, ForkResult};

/// Estrategia para servir un request ya aceptado
pub trait ConcurrencyModel {
    /// Entrega `request` a `handler` según la estrategia
    ///
    /// Solo retorna error cuando el servidor no puede continuar.
    fn serve(&self, request: Request, handler: &dyn Fn(Request)) -> Result<(), ServerError>;

    /// Nombre para los logs
    fn name(&self) -> &'static str;
}

/// Un request a la vez, en el mismo proceso
#[derive(Debug, Default)]
pub struct Sequential;

impl ConcurrencyModel for Sequential {
    fn serve(&self, request: Request, handler: &dyn Fn(Request)) -> Result<(), ServerError> {
        handler(request);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Single"
    }
}

/// Un proceso hijo por request
#[derive(Debug)]
pub struct Forking {
    _private: (),
}

impl Forking {
    /// Ignora `SIGCHLD` para que los hijos terminados se recojan solos
    pub fn new() -> Result<Self, ServerError> {
        // SAFETY: SigIgn no instala ningún handler propio
        unsafe { signal(Signal::SIGCHLD, SigHandler::SigIgn) }.map_err(ServerError::Signal)?;
        Ok(Self { _private: () })
    }
}

impl ConcurrencyModel for Forking {
    fn serve(&self, request: Request, handler: &dyn Fn(Request)) -> Result<(), ServerError> {
        // SAFETY: el servidor no crea threads, así que el hijo hereda un
        // único flujo de control y puede seguir usando el allocator.
        match unsafe { fork() } {
            Ok(ForkResult::Child) => {
                // El hijo espera a sus propios CGI con wait(); con SIGCHLD
                // ignorado el kernel se los llevaría antes.
                // SAFETY: SigDfl no instala ningún handler propio
                let _ = unsafe { signal(Signal::SIGCHLD, SigHandler::SigDfl) };

                handler(request);
                std::process::exit(0);
            }
            Ok(ForkResult::Parent { child }) => {
                debug!("Forked {} for request", child);
                // El padre suelta su copia del socket; el hijo conserva la suya
                drop(request);
                Ok(())
            }
            Err(e) => {
                drop(request);
                Err(ServerError::Fork(e))
            }
        }
    }

    fn name(&self) -> &'static str {
        "Forking"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{exchange, read_response};
    use std::cell::RefCell;
    use std::io::Write;

    #[test]
    fn test_sequential_serves_inline_in_order() {
        let served = RefCell::new(Vec::new());
        let model = Sequential;

        let mut clients = Vec::new();
        for i in 0..3 {
            let (request, client) = exchange(b"");
            clients.push(client);
            model
                .serve(request, &|mut request: Request| {
                    write!(request.stream(), "response {}", i).unwrap();
                    served.borrow_mut().push(i);
                })
                .unwrap();
        }

        assert_eq!(*served.borrow(), vec![0, 1, 2]);
        for (i, client) in clients.into_iter().enumerate() {
            assert_eq!(read_response(client), format!("response {}", i));
        }
        assert_eq!(model.name(), "Single");
    }
}
