/// Settings for reading one HTTP request.
///
/// The version allow-list is per instance rather than global, so each
/// reader can accept a different set of protocol versions.
///
/// All sizes are in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Accepted values for the part after `HTTP/` in the request line
    /// (default: `["1.1"]`).
    pub versions: Vec<String>,
    /// Starting capacity of the read buffer (default: 8). It doubles
    /// whenever unconsumed data fills it. A value of 0 is treated as 1.
    pub initial_buffer_size: usize,
    /// Hard cap on the read buffer (default: unbounded). This bounds the
    /// longest request line or header line the reader will hold.
    pub max_buffer_size: Option<usize>,
    /// Largest `Content-Length` the parser will accept (default: unbounded).
    pub max_body_size: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            versions: vec!["1.1".to_string()],
            initial_buffer_size: 8,
            max_buffer_size: None,
            max_body_size: None,
        }
    }
}

impl ParserConfig {
    /// Replace the version allow-list.
    pub fn with_versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.versions = versions.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` if `version` (e.g. `"1.1"`) is on the allow-list.
    pub fn supports_version(&self, version: &str) -> bool {
        self.versions.iter().any(|v| v == version)
    }
}
