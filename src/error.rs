//! # Errores del Servidor
//! src/error.rs
//!
//! Dos niveles de error:
//!
//! - [`RequestError`]: todo lo que puede fallar al servir un request. Nunca
//!   sale del request que lo produjo: el dispatcher lo convierte en un
//!   [`StatusCode`] y lo muestra con la página de error.
//! - [`ServerError`]: errores del proceso servidor. Solo `Fork` ocurre
//!   mientras se sirve, y termina el proceso.

use crate::http::{ParseError, StatusCode};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error al servir un request individual
#[derive(Debug, Error)]
pub enum RequestError {
    /// Request line o headers malformados
    #[error("malformed request: {0}")]
    Parse(#[from] ParseError),

    /// La URI sale de la raíz o no existe
    #[error("cannot resolve {uri} under the document root")]
    Resolution { uri: String },

    /// El objetivo no es ejecutable, ni legible, ni un directorio
    #[error("{} is neither executable, readable nor a directory", .path.display())]
    Dispatch { path: PathBuf },

    /// El archivo o directorio no pudo abrirse
    #[error("cannot open {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Error de E/S en el socket o al lanzar el CGI
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
        /// La cabecera 200 ya salió hacia el cliente
        head_sent: bool,
    },
}

impl RequestError {
    /// Adaptador para `map_err` sobre errores de E/S
    pub fn io(context: &'static str, head_sent: bool) -> impl FnOnce(io::Error) -> RequestError {
        move |source| RequestError::Io {
            context,
            source,
            head_sent,
        }
    }

    /// Código HTTP que corresponde a este error
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::Parse(_) => StatusCode::BadRequest,
            RequestError::Resolution { .. }
            | RequestError::Dispatch { .. }
            | RequestError::Unavailable { .. } => StatusCode::NotFound,
            RequestError::Io { .. } => StatusCode::InternalServerError,
        }
    }

    /// Si todavía se puede escribir una página de error
    ///
    /// Cuando la cabecera 200 ya salió no hay forma de corregirla; el
    /// status 500 solo se reporta al llamador.
    pub fn renders_page(&self) -> bool {
        !matches!(self, RequestError::Io { head_sent: true, .. })
    }
}

/// Errores del proceso servidor
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuración inválida
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No se pudo abrir el socket de escucha
    #[error("cannot listen on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// No se pudo instalar la disposición de `SIGCHLD`
    #[error("cannot set SIGCHLD disposition: {0}")]
    Signal(#[source] nix::Error),

    /// No se pudo crear el proceso hijo que sirve un request
    #[error("cannot fork request handler: {0}")]
    Fork(#[source] nix::Error),
}
