//! # Dispatcher
//! src/dispatch/mod.rs
//!
//! Decide qué handler sirve cada request mirando solo los atributos del
//! archivo en disco, nunca su contenido.
//!
//! ## Flujo
//!
//! ```text
//! Request → parse → resolve(uri) → classify(path) → Handler → drop(Request)
//! ```
//!
//! ## Clasificación (en este orden)
//!
//! 1. Archivo regular con permiso de ejecución → CGI (aunque no sea legible)
//! 2. Archivo regular con permiso de lectura → archivo estático
//! 3. Directorio → listado
//! 4. Cualquier otra cosa → 404
//!
//! Todo error del request termina en un status HTTP y, si todavía no salió
//! ninguna cabecera, en la página de error.

use crate::context::ServerContext;
use crate::error::RequestError;
use crate::handlers::{self, HandlerResult};
use crate::http::{Request, StatusCode};
use log::{debug, info, warn};
use nix::unistd::{access, AccessFlags};
use std::fs;
use std::path::Path;

/// Handler elegido para una ruta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Archivo regular ejecutable
    Cgi,

    /// Archivo regular legible (y no ejecutable)
    File,

    /// Directorio
    Browse,

    /// Inexistente, archivo especial o archivo sin permisos de lectura ni ejecución
    Unservable,
}

/// Clasifica `path` por tipo de archivo y permisos (`stat` + `access`)
pub fn classify(path: &Path) -> Target {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            debug!("Cannot stat {}: {}", path.display(), e);
            return Target::Unservable;
        }
    };

    if metadata.is_file() {
        if access(path, AccessFlags::X_OK).is_ok() {
            return Target::Cgi;
        }
        if access(path, AccessFlags::R_OK).is_ok() {
            return Target::File;
        }
        return Target::Unservable;
    }

    if metadata.is_dir() {
        return Target::Browse;
    }

    Target::Unservable
}

/// Sirve un request completo y lo libera
///
/// Ningún error sale de aquí: todos se convierten en el status retornado.
pub fn handle(mut request: Request, ctx: &ServerContext) -> StatusCode {
    let status = match serve(&mut request, ctx) {
        Ok(status) => status,
        Err(e) => {
            warn!("{}:{} {}", request.host(), request.port(), e);
            if e.renders_page() {
                handlers::handle_error(&mut request, e.status())
            } else {
                e.status()
            }
        }
    };

    info!(
        "{}:{} \"{} {}\" {}",
        request.host(),
        request.port(),
        request.method(),
        request.uri().to_string_lossy(),
        status
    );
    status
}

fn serve(request: &mut Request, ctx: &ServerContext) -> HandlerResult {
    request.parse()?;

    let path = ctx
        .resolver()
        .resolve(request.uri())
        .ok_or_else(|| RequestError::Resolution {
            uri: request.uri().to_string_lossy().into_owned(),
        })?;
    debug!("HTTP REQUEST PATH: {}", path.display());
    request.set_path(path.clone());

    let target = classify(&path);
    debug!("Dispatching {} as {:?}", path.display(), target);

    match target {
        Target::Cgi => handlers::handle_cgi(request, ctx),
        Target::File => handlers::handle_file(request, ctx),
        Target::Browse => handlers::handle_browse(request),
        Target::Unservable => Err(RequestError::Dispatch { path }),
    }
}
