// src/data.rs
//
// Canonical table shape flowing between decoder, locator and export:
// ordered headers plus ordered body rows. Document order is load-bearing:
// the locator takes the *first* date match, so nothing here may reorder rows.

/// One decoded table: header row + body rows, all trimmed strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn empty() -> Self {
        Self { headers: Vec::new(), rows: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a named column, case-sensitive (site headers are stable).
    pub fn col(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell of `row` under the named column, if both exist.
    pub fn field<'a>(&self, row: &'a [String], name: &str) -> Option<&'a str> {
        self.col(name).and_then(|i| row.get(i)).map(|s| s.as_str())
    }
}
