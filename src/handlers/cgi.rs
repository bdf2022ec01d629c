//! # Handler CGI
//!
//! Ejecuta el archivo pedido como subproceso y copia su salida estándar tal
//! cual al cliente. El script es responsable de sus propios headers.
//!
//! El archivo se lanza a través de `/bin/sh -c`, igual que `popen(3)`: un
//! ejecutable de texto sin `#!` corre como script de shell. Si el script no
//! arranca (intérprete inexistente, por ejemplo) el shell lo reporta en
//! stderr y el cliente recibe una salida vacía; solo un fallo al lanzar el
//! propio shell produce 500.
//!
//! ## Entorno del subproceso
//!
//! | Variable            | Origen                         |
//! |---------------------|--------------------------------|
//! | `DOCUMENT_ROOT`     | raíz canónica del servidor     |
//! | `QUERY_STRING`      | query del request (o vacío)    |
//! | `REMOTE_ADDR`       | host del cliente               |
//! | `REMOTE_PORT`       | puerto del cliente             |
//! | `REQUEST_METHOD`    | método                         |
//! | `REQUEST_URI`       | URI sin query                  |
//! | `SCRIPT_FILENAME`   | ruta canónica del script       |
//! | `SERVER_PORT`       | puerto de escucha              |
//! | `HTTP_*`            | solo los 6 headers permitidos, |
//! |                     | nombre sin distinguir mayúsc.  |
//!
//! El subproceso hereda además el entorno completo del servidor, sin
//! filtrar. Las variables se fijan solo en el hijo: el entorno del servidor
//! nunca se modifica, así que un request no deja variables a otro.

use super::{target_path, HandlerResult};
use crate::context::ServerContext;
use crate::error::RequestError;
use crate::http::{Request, StatusCode};
use log::debug;
use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::Path;
use std::process::{Command, Stdio};

/// Shell que interpreta la línea de comando, como en `popen(3)`
const SHELL: &str = "/bin/sh";

/// Headers que se traducen a variables de entorno; el resto se descarta
const HEADER_VARIABLES: [(&str, &str); 6] = [
    ("Accept", "HTTP_ACCEPT"),
    ("Accept-Encoding", "HTTP_ACCEPT_ENCODING"),
    ("Accept-Language", "HTTP_ACCEPT_LANGUAGE"),
    ("Connection", "HTTP_CONNECTION"),
    ("Host", "HTTP_HOST"),
    ("User-Agent", "HTTP_USER_AGENT"),
];

/// Variables CGI para ejecutar `path` en respuesta a `request`
pub fn cgi_environment(request: &Request, path: &Path, ctx: &ServerContext) -> Vec<(&'static str, OsString)> {
    let mut env = vec![
        ("DOCUMENT_ROOT", ctx.root().as_os_str().to_os_string()),
        ("QUERY_STRING", request.query().to_os_string()),
        ("REMOTE_ADDR", OsString::from(request.host())),
        ("REMOTE_PORT", OsString::from(request.port())),
        ("REQUEST_METHOD", OsString::from(request.method())),
        ("REQUEST_URI", request.uri().to_os_string()),
        ("SCRIPT_FILENAME", path.as_os_str().to_os_string()),
        ("SERVER_PORT", OsString::from(ctx.port().to_string())),
    ];

    for (header, variable) in HEADER_VARIABLES {
        if let Some(value) = request.header(header) {
            env.push((variable, OsString::from(value)));
        }
    }

    env
}

/// `path` entre comillas simples para `sh -c`
fn shell_quote(path: &Path) -> OsString {
    let mut quoted = vec![b'\''];
    for &b in path.as_os_str().as_bytes() {
        if b == b'\'' {
            quoted.extend_from_slice(b"'\\''");
        } else {
            quoted.push(b);
        }
    }
    quoted.push(b'\'');
    OsString::from_vec(quoted)
}

/// Ejecuta la ruta del request y retransmite su salida
pub fn handle_cgi(request: &mut Request, ctx: &ServerContext) -> HandlerResult {
    let path = target_path(request)?;
    run_script(request, &path, ctx, OsStr::new(SHELL))
}

fn run_script(request: &mut Request, path: &Path, ctx: &ServerContext, shell: &OsStr) -> HandlerResult {
    debug!("HANDLE CGI REQUEST {}", path.display());

    let env = cgi_environment(request, path, ctx);
    let mut child = Command::new(shell)
        .arg("-c")
        .arg(shell_quote(path))
        .envs(env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(RequestError::io("cannot start CGI script", false))?;

    let copied = match child.stdout.take() {
        Some(mut output) => io::copy(&mut output, request.stream()),
        None => Err(io::Error::new(io::ErrorKind::Other, "CGI stdout was not captured")),
    };

    // El código de salida del script no cambia la respuesta
    match child.wait() {
        Ok(exit) => debug!("CGI {} exited with {}", path.display(), exit),
        Err(e) => debug!("Cannot wait for CGI {}: {}", path.display(), e),
    }

    let copied = copied.map_err(RequestError::io("cannot relay CGI output", true))?;
    request
        .stream()
        .flush()
        .map_err(RequestError::io("cannot flush CGI output", true))?;
    debug!("CGI relayed {} bytes", copied);

    Ok(StatusCode::Ok)
}
