//! # Handler de Listados
//!
//! Lista un directorio en HTML: una entrada por línea, en orden de bytes,
//! sin `.` pero con `..` y con los archivos ocultos. El listado se lee
//! completo antes de escribir nada, así que un directorio que no se puede
//! abrir todavía produce un 404 limpio.
//!
//! Los nombres no pasan por UTF-8: los bytes del disco van tal cual al
//! enlace, y el cliente los devuelve igual en el request line.

use super::{target_path, HandlerResult};
use crate::error::RequestError;
use crate::http::{Request, Response, StatusCode};
use log::debug;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Sirve el listado de la ruta del request
pub fn handle_browse(request: &mut Request) -> HandlerResult {
    let path = target_path(request)?;
    debug!("HANDLE BROWSE REQUEST {}", path.display());

    let entries = list_entries(&path).map_err(|source| RequestError::Unavailable {
        path: path.clone(),
        source,
    })?;

    let page = render_listing(request.uri(), &entries);
    Response::new(StatusCode::Ok)
        .with_header("Content-Type", "text/html")
        .with_body(page)
        .write_to(request.stream())
        .map_err(RequestError::io("cannot write listing", true))?;

    Ok(StatusCode::Ok)
}

/// Nombres de las entradas de `path`, ordenados por bytes, incluyendo `..`
///
/// `read_dir` nunca entrega `.` ni `..`, así que `..` se agrega aquí.
pub fn list_entries(path: &Path) -> io::Result<Vec<OsString>> {
    let mut names = vec![OsString::from("..")];

    for entry in fs::read_dir(path)? {
        names.push(entry?.file_name());
    }

    names.sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
    Ok(names)
}

/// HTML del listado; cada enlace es `uri/nombre` (la raíz no aporta prefijo)
pub fn render_listing(uri: &OsStr, entries: &[OsString]) -> Vec<u8> {
    let uri = uri.as_bytes();
    let end = uri.iter().rposition(|&b| b != b'/').map_or(0, |i| i + 1);
    let prefix = escape_html(&uri[..end]);

    let mut page = b"<html><body><ul>\n".to_vec();
    for name in entries {
        let name = escape_html(name.as_bytes());
        page.extend_from_slice(b"<li><a href=\"");
        page.extend_from_slice(&prefix);
        page.push(b'/');
        page.extend_from_slice(&name);
        page.extend_from_slice(b"\">");
        page.extend_from_slice(&name);
        page.extend_from_slice(b"</a></li>\n");
    }
    page.extend_from_slice(b"</ul></body></html>\n");
    page
}

fn escape_html(text: &[u8]) -> Vec<u8> {
    let mut escaped = Vec::with_capacity(text.len());
    for &b in text {
        match b {
            b'&' => escaped.extend_from_slice(b"&amp;"),
            b'<' => escaped.extend_from_slice(b"&lt;"),
            b'>' => escaped.extend_from_slice(b"&gt;"),
            b'"' => escaped.extend_from_slice(b"&quot;"),
            _ => escaped.push(b),
        }
    }
    escaped
}
