//! # Construcción de Respuestas HTTP
//!
//! API para construir la cabecera de una respuesta HTTP/1.0 y escribirla
//! en el socket. Los handlers de archivos y de CGI transmiten el cuerpo por
//! su cuenta después de la cabecera; las páginas de error y los listados
//! se construyen completos en memoria.
//!
//! ## Formato de una respuesta HTTP/1.0
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Content-Type: text/html\r\n
//! \r\n
//! <html>...</html>
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use cgi_httpd::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/plain")
//!     .with_body("Hello");
//!
//! assert_eq!(response.to_bytes(), b"HTTP/1.0 200 OK\r\nContent-Type: text/plain\r\n\r\nHello");
//! ```

use super::StatusCode;
use std::io::{self, Write};

/// Respuesta HTTP/1.0: status, headers en orden de inserción y body opcional
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Headers HTTP, en el orden en que se escriben
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (vacío cuando el handler lo transmite aparte)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Agrega un header a la respuesta
    ///
    /// Si el header ya existe, se sobrescribe conservando su posición.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Versión mutable de [`Response::with_header`]
    pub fn add_header(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(existing) => existing.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Establece el cuerpo de la respuesta (texto o bytes crudos)
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Página HTML completa con el status y su descripción
    ///
    /// # Ejemplo
    /// ```
    /// use cgi_httpd::http::{Response, StatusCode};
    ///
    /// let page = Response::error_page(StatusCode::NotFound);
    /// let text = String::from_utf8(page.to_bytes()).unwrap();
    /// assert!(text.starts_with("HTTP/1.0 404 Not Found\r\n"));
    /// ```
    pub fn error_page(status: StatusCode) -> Self {
        let body = format!(
            "<html><body><h1>{}</h1><p>{}</p></body></html>\n",
            status,
            status.description()
        );
        Self::new(status)
            .with_header("Content-Type", "text/html")
            .with_body(body)
    }

    /// Bytes de la status line, los headers y la línea vacía
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut result = format!("HTTP/1.0 {}\r\n", self.status).into_bytes();

        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        result
    }

    /// Convierte la respuesta completa (cabecera + body) a bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = self.head_bytes();
        result.extend_from_slice(&self.body);
        result
    }

    /// Escribe la respuesta completa en `out`
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.to_bytes())?;
        out.flush()
    }
}
