//! # Handler de Archivos
//!
//! Transmite un archivo legible al cliente en bloques de tamaño fijo.
//!
//! La cabecera 200 sale antes del contenido y no hay rollback: si la
//! escritura falla a mitad del archivo, el cliente ya recibió un 200 y el
//! handler reporta 500 al llamador sin escribir página de error.

use super::{target_path, HandlerResult};
use crate::context::ServerContext;
use crate::error::RequestError;
use crate::http::{Request, Response, StatusCode};
use log::debug;
use std::fs::File;
use std::io::{ErrorKind, Read, Write};

/// Tamaño del bloque de copia
const BUFFER_SIZE: usize = 8192;

/// Sirve la ruta del request con el Content-Type de la tabla MIME
pub fn handle_file(request: &mut Request, ctx: &ServerContext) -> HandlerResult {
    let path = target_path(request)?;
    debug!("HANDLE FILE REQUEST {}", path.display());

    let mut file = File::open(&path).map_err(|source| RequestError::Unavailable {
        path: path.clone(),
        source,
    })?;

    let mime_type = ctx.mime_types().lookup(&path);
    debug!("MIME type: {}", mime_type);

    let head = Response::new(StatusCode::Ok).with_header("Content-Type", &mime_type);
    let out = request.stream();
    out.write_all(&head.head_bytes())
        .map_err(RequestError::io("cannot write response head", false))?;

    let mut buffer = [0u8; BUFFER_SIZE];
    loop {
        let nread = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(RequestError::io("cannot read file", true)(e)),
        };

        out.write_all(&buffer[..nread])
            .map_err(RequestError::io("cannot write file contents", true))?;
    }

    out.flush().map_err(RequestError::io("cannot flush file contents", true))?;
    Ok(StatusCode::Ok)
}
