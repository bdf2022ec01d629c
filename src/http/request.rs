//! # Parsing de Requests HTTP/1.0
//! src/http/request.rs
//!
//! Parser HTTP escrito a mano sobre el stream del socket: se leen líneas
//! directamente del `BufReader`, sin buffer intermedio del request completo.
//!
//! ## Formato de un Request
//!
//! ```text
//! GET /script.cgi?q=foo HTTP/1.0\r\n
//! Host: localhost:9898\r\n
//! User-Agent: curl/7.68.0\r\n
//! \r\n
//! ```
//!
//! ## Fases
//!
//! 1. **Request Line**: `METHOD TARGET HTTP/VERSION`. El target se divide en
//!    `uri` y `query` por el primer `?`. La query nunca queda ausente: sin `?`
//!    es el string vacío. El target se conserva byte a byte (`OsString`),
//!    así que un nombre de archivo que no es UTF-8 llega intacto al disco.
//! 2. **Headers**: pares `Name: Value` hasta la línea vacía. Se conservan en
//!    orden de llegada. Un request sin ningún header se rechaza.

use log::debug;
use std::ffi::{OsStr, OsString};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::os::unix::ffi::OsStrExt;
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No se pudo leer la request line (EOF o error de lectura)
    #[error("Request line could not be read")]
    UnreadableRequestLine,

    /// La request line está vacía
    #[error("Request line has no method")]
    MissingMethod,

    /// La request line no tiene target
    #[error("Request line has no target")]
    MissingTarget,

    /// Header sin `:` o sin nombre
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// El bloque de headers terminó sin ningún header
    #[error("Request has no headers")]
    NoHeaders,
}

/// Un header HTTP `Name: Value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Resultado de la fase de request line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub uri: OsString,
    pub query: OsString,
}

/// Stream bidireccional con buffer sobre el socket aceptado
///
/// La mitad de escritura es un `try_clone` del socket; si el clon falla no
/// existe `Connection` y el socket original se cierra al soltarse. Ambas
/// mitades se liberan juntas al soltar la conexión (el writer hace flush).
pub struct Connection {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Connection {
    pub fn new(stream: TcpStream) -> io::Result<Self> {
        let writer = BufWriter::new(stream.try_clone()?);
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
        })
    }

    /// Mitad de lectura, con buffer
    pub fn reader(&mut self) -> &mut BufReader<TcpStream> {
        &mut self.reader
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Un request HTTP aceptado, dueño exclusivo de su conexión
///
/// Lo crea el acceptor, lo completan el parser (`method`, `uri`, `query`,
/// `headers`) y el dispatcher (`path`), y se libera una sola vez al
/// soltarse cuando el handler termina.
pub struct Request {
    conn: Connection,
    host: String,
    port: String,
    method: String,
    uri: OsString,
    query: OsString,
    path: Option<PathBuf>,
    headers: Vec<Header>,
}

impl Request {
    /// Envuelve el socket aceptado; `host` y `port` vienen de la búsqueda inversa
    pub fn new(stream: TcpStream, host: String, port: String) -> io::Result<Self> {
        Ok(Self {
            conn: Connection::new(stream)?,
            host,
            port,
            method: String::new(),
            uri: OsString::new(),
            query: OsString::new(),
            path: None,
            headers: Vec::new(),
        })
    }

    /// Parsea la request line y los headers desde el socket
    ///
    /// Si falla, los campos ya leídos pueden quedar a medio llenar; el
    /// request solo sirve para responder con un error.
    pub fn parse(&mut self) -> Result<(), ParseError> {
        let line = parse_request_line(self.conn.reader())?;
        debug!("HTTP METHOD: {}", line.method);
        debug!("HTTP URI:    {}", line.uri.to_string_lossy());
        debug!("HTTP QUERY:  {}", line.query.to_string_lossy());

        self.method = line.method;
        self.uri = line.uri;
        self.query = line.query;

        self.headers = parse_headers(self.conn.reader())?;
        for header in &self.headers {
            debug!("HTTP HEADER {} = {}", header.name, header.value);
        }

        Ok(())
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn uri(&self) -> &OsStr {
        &self.uri
    }

    pub fn query(&self) -> &OsStr {
        &self.query
    }

    /// Ruta canónica en disco, disponible después del dispatch
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    /// Obtiene un header por nombre (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Stream de escritura hacia el cliente
    pub fn stream(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

/// Lee una línea cruda, con su terminador; `None` en EOF o error de lectura
fn read_line<R: BufRead>(reader: &mut R) -> Option<Vec<u8>> {
    let mut buffer = Vec::new();
    match reader.read_until(b'\n', &mut buffer) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buffer),
    }
}

/// Parsea la request line: `METHOD TARGET [VERSION]`
///
/// # Ejemplo
///
/// ```
/// use cgi_httpd::http::request::parse_request_line;
///
/// let mut input: &[u8] = b"GET /x?y=1 HTTP/1.1\r\n";
/// let line = parse_request_line(&mut input).unwrap();
///
/// assert_eq!(line.method, "GET");
/// assert_eq!(line.uri, "/x");
/// assert_eq!(line.query, "y=1");
/// ```
pub fn parse_request_line<R: BufRead>(reader: &mut R) -> Result<RequestLine, ParseError> {
    let line = read_line(reader).ok_or(ParseError::UnreadableRequestLine)?;

    let mut tokens = line
        .split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty());
    let method = tokens.next().ok_or(ParseError::MissingMethod)?;
    let target = tokens.next().ok_or(ParseError::MissingTarget)?;

    // La query termina en el siguiente espacio, que ya cortó el split
    let (uri, query) = match target.iter().position(|&b| b == b'?') {
        Some(i) => (&target[..i], &target[i + 1..]),
        None => (target, &target[target.len()..]),
    };
    if uri.is_empty() {
        return Err(ParseError::MissingTarget);
    }

    Ok(RequestLine {
        method: String::from_utf8_lossy(method).into_owned(),
        uri: OsStr::from_bytes(uri).to_os_string(),
        query: OsStr::from_bytes(query).to_os_string(),
    })
}

/// Parsea el bloque de headers hasta la línea vacía
///
/// Un error de lectura o EOF también cierra el bloque. Las líneas pierden
/// su terminador antes de dividirse por el primer `:`, y el valor pierde
/// los espacios iniciales.
pub fn parse_headers<R: BufRead>(reader: &mut R) -> Result<Vec<Header>, ParseError> {
    let mut headers = Vec::new();

    while let Some(raw) = read_line(reader) {
        let raw = String::from_utf8_lossy(&raw);
        let line = raw.trim_end_matches(|c: char| c == '\r' || c == '\n');
        if line.is_empty() {
            break;
        }

        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::InvalidHeader(line.to_string()))?;
        if name.is_empty() {
            return Err(ParseError::InvalidHeader(line.to_string()));
        }

        headers.push(Header::new(name, value.trim_start()));
    }

    if headers.is_empty() {
        return Err(ParseError::NoHeaders);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(raw: &[u8]) -> Result<RequestLine, ParseError> {
        let mut input = raw;
        parse_request_line(&mut input)
    }

    fn headers(raw: &[u8]) -> Result<Vec<Header>, ParseError> {
        let mut input = raw;
        parse_headers(&mut input)
    }

    #[test]
    fn test_parse_with_query() {
        let parsed = line(b"GET /x?y=1 HTTP/1.1\r\n").unwrap();

        assert_eq!(parsed.method, "GET");
        assert_eq!(parsed.uri, "/x");
        assert_eq!(parsed.query, "y=1");
    }

    #[test]
    fn test_parse_without_query() {
        let parsed = line(b"GET /x HTTP/1.1\r\n").unwrap();

        assert_eq!(parsed.uri, "/x");
        assert_eq!(parsed.query, "");
    }

    #[test]
    fn test_parse_without_version() {
        let parsed = line(b"HEAD /index.html\n").unwrap();

        assert_eq!(parsed.method, "HEAD");
        assert_eq!(parsed.uri, "/index.html");
        assert_eq!(parsed.query, "");
    }

    #[test]
    fn test_query_splits_at_first_question_mark() {
        let parsed = line(b"GET /s.cgi?a=1?b=2 HTTP/1.0\r\n").unwrap();

        assert_eq!(parsed.uri, "/s.cgi");
        assert_eq!(parsed.query, "a=1?b=2");
    }

    #[test]
    fn test_empty_query_after_question_mark() {
        let parsed = line(b"GET /s.cgi? HTTP/1.0\r\n").unwrap();

        assert_eq!(parsed.uri, "/s.cgi");
        assert_eq!(parsed.query, "");
    }

    #[test]
    fn test_request_line_errors() {
        assert_eq!(line(b""), Err(ParseError::UnreadableRequestLine));
        assert_eq!(line(b"\r\n"), Err(ParseError::MissingMethod));
        assert_eq!(line(b"GET\r\n"), Err(ParseError::MissingTarget));
        assert_eq!(line(b"GET ?q=1 HTTP/1.0\r\n"), Err(ParseError::MissingTarget));
    }

    #[test]
    fn test_target_keeps_raw_bytes() {
        let parsed = line(b"GET /caf\xe9.txt?q=\xff HTTP/1.0\r\n").unwrap();

        assert_eq!(parsed.uri.as_bytes(), b"/caf\xe9.txt");
        assert_eq!(parsed.query.as_bytes(), b"q=\xff");
    }

    #[test]
    fn test_headers_in_arrival_order() {
        let parsed = headers(b"Host: a\r\nAccept: b\r\n\r\n").unwrap();

        assert_eq!(parsed, vec![Header::new("Host", "a"), Header::new("Accept", "b")]);
    }

    #[test]
    fn test_header_value_trimmed_and_split_at_first_colon() {
        let parsed = headers(b"Host:    localhost:9898\r\n\r\n").unwrap();

        assert_eq!(parsed[0].name, "Host");
        assert_eq!(parsed[0].value, "localhost:9898");
    }

    #[test]
    fn test_headers_end_at_eof() {
        let parsed = headers(b"User-Agent: test\n").unwrap();
        assert_eq!(parsed, vec![Header::new("User-Agent", "test")]);
    }

    #[test]
    fn test_zero_headers_fails() {
        assert_eq!(headers(b"\r\n"), Err(ParseError::NoHeaders));
        assert_eq!(headers(b""), Err(ParseError::NoHeaders));
    }

    #[test]
    fn test_header_without_colon_fails() {
        let result = headers(b"Host: a\r\nbroken line\r\n\r\n");
        assert_eq!(result, Err(ParseError::InvalidHeader("broken line".to_string())));
    }

    #[test]
    fn test_header_without_name_fails() {
        assert!(matches!(headers(b": value\r\n\r\n"), Err(ParseError::InvalidHeader(_))));
    }

    #[test]
    fn test_both_phases_share_the_reader() {
        let mut input: &[u8] = b"GET /dir?sort=1 HTTP/1.0\r\nHost: example\r\n\r\nbody";

        let parsed = parse_request_line(&mut input).unwrap();
        let parsed_headers = parse_headers(&mut input).unwrap();

        assert_eq!(parsed.uri, "/dir");
        assert_eq!(parsed_headers.len(), 1);
        assert_eq!(input, b"body");
    }
}
