//! Read-only values computed from stored fields.

use url::Url;

const GRUB_SCHEMES: &[&str] = &["http", "https", "ftp", "tftp"];

/// Rewrite a remote boot URL into grub's `(scheme,host[:port])/path` device syntax.
///
/// Returns `None` for anything that is not an absolute URL grub can fetch.
/// Credentials, query strings and fragments are not part of the device path.
pub fn grub_remote_path(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let scheme = parsed.scheme();
    if !GRUB_SCHEMES.contains(&scheme) {
        return None;
    }
    let host = parsed.host_str().filter(|host| !host.is_empty())?;
    let path = parsed.path().trim_start_matches('/');
    if path.is_empty() {
        return None;
    }
    let authority = match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    Some(format!("({},{})/{}", scheme, authority, path))
}
