// src/fetch.rs
use std::cell::RefCell;
use std::collections::HashMap;

use crate::core::net;

pub use crate::core::net::FetchError;

/// The injected transport capability. Everything above the socket goes
/// through this trait, so tests and the memoizing wrapper can stand in for
/// the live network.
pub trait Fetch {
    fn get(&self, host: &str, path: &str) -> Result<Vec<u8>, FetchError>;
}

/// Live transport (core::net).
pub struct HttpFetch;

impl Fetch for HttpFetch {
    fn get(&self, host: &str, path: &str) -> Result<Vec<u8>, FetchError> {
        net::http_get(host, path)
    }
}

/// Memoizes successful bodies for the life of the run, keyed by host + path
/// (for history pages that amounts to nation id + page number). The two
/// target-date resolutions for one nation then share page fetches. Purely an
/// optimization: resolution results must not depend on its presence.
pub struct CachedFetch<F: Fetch> {
    inner: F,
    seen: RefCell<HashMap<(String, String), Vec<u8>>>,
}

impl<F: Fetch> CachedFetch<F> {
    pub fn new(inner: F) -> Self {
        Self { inner, seen: RefCell::new(HashMap::new()) }
    }
}

impl<F: Fetch> Fetch for CachedFetch<F> {
    fn get(&self, host: &str, path: &str) -> Result<Vec<u8>, FetchError> {
        let key = (s!(host), s!(path));
        if let Some(body) = self.seen.borrow().get(&key) {
            return Ok(body.clone());
        }
        let body = self.inner.get(host, path)?;
        self.seen.borrow_mut().insert(key, body.clone());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counting<'a> {
        hits: &'a Cell<usize>,
        fail: bool,
    }

    impl Fetch for Counting<'_> {
        fn get(&self, _host: &str, _path: &str) -> Result<Vec<u8>, FetchError> {
            self.hits.set(self.hits.get() + 1);
            if self.fail {
                Err(FetchError::Status(404, s!("x")))
            } else {
                Ok(b"body".to_vec())
            }
        }
    }

    #[test]
    fn repeat_get_served_from_cache() {
        let hits = Cell::new(0);
        let f = CachedFetch::new(Counting { hits: &hits, fail: false });
        assert_eq!(f.get("h", "/p").unwrap(), b"body");
        assert_eq!(f.get("h", "/p").unwrap(), b"body");
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn errors_are_not_cached() {
        let hits = Cell::new(0);
        let f = CachedFetch::new(Counting { hits: &hits, fail: true });
        assert!(f.get("h", "/p").is_err());
        assert!(f.get("h", "/p").is_err());
        assert_eq!(hits.get(), 2);
    }
}
