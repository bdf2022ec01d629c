//! # Handlers de Contenido
//!
//! Cada handler recibe el request ya parseado, con la ruta canónica que fijó
//! el dispatcher (`Request::path`), escribe la respuesta en el socket y
//! retorna el status.
//!
//! ## Handlers
//!
//! - **file**: archivos legibles, transmitidos por bloques
//! - **browse**: listado HTML de un directorio
//! - **cgi**: ejecutables, cuya salida se copia tal cual al cliente
//! - **error**: página de error; nunca falla

pub mod browse;
pub mod cgi;
pub mod error;
pub mod file;

// Re-exportar funciones útiles
pub use browse::handle_browse;
pub use cgi::handle_cgi;
pub use error::handle_error;
pub use file::handle_file;

use crate::error::RequestError;
use crate::http::{Request, StatusCode};
use std::path::{Path, PathBuf};

/// Resultado de un handler de contenido
pub type HandlerResult = Result<StatusCode, RequestError>;

/// Ruta que fijó el dispatcher; un request sin ruta no tiene nada que servir
fn target_path(request: &Request) -> Result<PathBuf, RequestError> {
    request
        .path()
        .map(Path::to_path_buf)
        .ok_or_else(|| RequestError::Resolution {
            uri: request.uri().to_string_lossy().into_owned(),
        })
}
