//! # Códigos de Estado HTTP
//!
//! Códigos HTTP/1.0 (RFC 1945) que produce el servidor. Cada error de una
//! petición termina convertido en uno de estos códigos:
//!
//! - **2xx**: Éxito (200 OK)
//! - **4xx**: Error del cliente (400 petición malformada, 404 objetivo no servible)
//! - **5xx**: Error del servidor (500 fallo de E/S o de lanzamiento del CGI)

/// Representa los códigos de estado HTTP que soporta nuestro servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 400 Bad Request - Request line o headers malformados
    BadRequest = 400,

    /// 404 Not Found - Ruta fuera de la raíz, inexistente o no servible
    NotFound = 404,

    /// 500 Internal Server Error - Error de E/S o el CGI no pudo lanzarse
    InternalServerError = 500,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use cgi_httpd::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use cgi_httpd::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    /// Descripción corta para la página de error
    pub fn description(&self) -> &'static str {
        match self {
            StatusCode::Ok => "The request was served.",
            StatusCode::BadRequest => "The request line or headers could not be parsed.",
            StatusCode::NotFound => "The requested resource does not exist or cannot be served.",
            StatusCode::InternalServerError => "The server failed while producing the response.",
        }
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
