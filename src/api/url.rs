use std::collections::BTreeMap;

/// Builder for API endpoint URLs over a fixed base.
///
/// The builder is reused across calls: `build()` renders the accumulated
/// path segments and query parameters and then clears them, so state never
/// leaks from one request into the next. Calling `build()` twice in a row
/// yields the bare base URL the second time.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base_url: String,
    path_segments: Vec<String>,
    query_params: BTreeMap<String, String>,
}

impl UrlBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path_segments: Vec::new(),
            query_params: BTreeMap::new(),
        }
    }

    /// Append one path component. Call order determines path order.
    pub fn add_path_segment(&mut self, segment: impl Into<String>) -> &mut Self {
        self.path_segments.push(segment.into());
        self
    }

    /// Add a single query parameter. A duplicate key overwrites the
    /// previous value.
    pub fn add_query_param(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    /// Add several query parameters at once.
    pub fn add_query_param_map<K, V, I>(&mut self, params: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in params {
            self.query_params.insert(key.into(), value.into());
        }
        self
    }

    /// Render `base[/seg1/seg2…][?k1=v1&k2=v2…]` and reset the builder.
    ///
    /// Query parameters are emitted in sorted key order. Keys and values
    /// are not percent-encoded; callers pass ids and fixed type strings,
    /// never free-form user input.
    pub fn build(&mut self) -> String {
        let mut url = String::from(&self.base_url);

        if !self.path_segments.is_empty() {
            url.push('/');
            url.push_str(&self.path_segments.join("/"));
        }

        if !self.query_params.is_empty() {
            url.push('?');
            let query = self
                .query_params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&");
            url.push_str(&query);
        }

        self.clear();
        url
    }

    fn clear(&mut self) {
        self.path_segments.clear();
        self.query_params.clear();
    }
}
