use super::Result;
use std::{fmt, path::PathBuf, str::FromStr};
use url::Url;

/// Strips credentials, query and fragment so URLs are safe to log.
fn redact_url(u: &Url) -> String {
    let mut redacted = u.clone();
    if !redacted.username().is_empty() || redacted.password().is_some() {
        let _ = redacted.set_username("");
        let _ = redacted.set_password(None);
    }
    redacted.set_query(None);
    redacted.set_fragment(None);
    redacted.to_string()
}

/// Location of an input htslib can open: a local path or a remote URL
/// (http(s), s3 or gs).
#[derive(Clone)]
pub enum InputSource {
    Local(PathBuf),
    Remote(Url),
}

impl FromStr for InputSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(mut url) = Url::parse(s) {
            match url.scheme() {
                "file" => {
                    let p = url
                        .to_file_path()
                        .map_err(|_| "Bad file:// URL".to_string())?;
                    return Self::local(p);
                }
                "http" | "https" | "s3" | "gs" => return Ok(InputSource::Remote(url)),
                "gcs" => {
                    let _ = url.set_scheme("gs");
                    return Ok(InputSource::Remote(url));
                }
                _ => {}
            }
        }
        Self::local(PathBuf::from(s))
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Local(p) => write!(f, "{}", p.display()),
            InputSource::Remote(u) => write!(f, "{}", redact_url(u)),
        }
    }
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Local(p) => f.debug_tuple("Local").field(p).finish(),
            InputSource::Remote(u) => f.debug_tuple("Remote").field(&redact_url(u)).finish(),
        }
    }
}

impl InputSource {
    fn local(p: PathBuf) -> Result<Self> {
        if p.exists() {
            Ok(InputSource::Local(p))
        } else {
            Err(format!("File does not exist: {}", p.display()))
        }
    }

    /// Use this when wrapping errors from htslib that might leak URLs
    pub fn format_error(&self, context: &str, error: impl fmt::Display) -> String {
        let error_str = error.to_string();
        let error_str = match self {
            InputSource::Remote(u) => error_str.replace(u.as_str(), &redact_url(u)),
            InputSource::Local(_) => error_str,
        };
        format!("{} {}: {}", context, self, error_str)
    }
}
