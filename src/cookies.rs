/*!
 * Cookie file support.
 *
 * The cookie file holds a single `Cookie:` header value copied from a browser,
 * e.g. `SESSDATA=abc; bili_jct=def; buvid3=xyz`. Parsing is delegated to the
 * `cookie` crate so that whitespace, `=` inside values and stray separators are
 * handled the way user agents handle them.
 */

use std::path::Path;
use cookie::Cookie;
use log::{debug, error, info};

/// Read-only set of cookies sent with every request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CookieJar {
    pairs: Vec<(String, String)>,
}

impl CookieJar {
    /// Parse a `k1=v1; k2=v2` string
    ///
    /// Later duplicates replace earlier values but keep the original position.
    pub fn parse(raw: &str) -> Self {
        let mut jar = CookieJar::default();

        for parsed in Cookie::split_parse(raw.trim().to_string()) {
            match parsed {
                Ok(cookie) => jar.insert(cookie.name(), cookie.value()),
                Err(e) => debug!("Skipping unparseable cookie fragment: {}", e),
            }
        }

        jar
    }

    /// Load cookies from `path`; a missing or unreadable file yields an empty jar
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("No cookie file found at {:?}. Proceeding without cookies.", path);
            return CookieJar::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => {
                let jar = Self::parse(&content);
                info!("Loaded {} cookie(s) from {:?}", jar.len(), path);
                jar
            }
            Err(e) => {
                error!("Error loading cookies from {:?}: {}", path, e);
                CookieJar::default()
            }
        }
    }

    fn insert(&mut self, name: &str, value: &str) {
        if let Some(existing) = self.pairs.iter_mut().find(|(n, _)| n == name) {
            existing.1 = value.to_string();
        } else {
            self.pairs.push((name.to_string(), value.to_string()));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Render the `Cookie` request header, `None` when there is nothing to send
    pub fn header_value(&self) -> Option<String> {
        if self.pairs.is_empty() {
            return None;
        }

        Some(
            self.pairs
                .iter()
                .map(|(n, v)| format!("{}={}", n, v))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
