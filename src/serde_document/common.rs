use std::fmt::Display;

/// Location of a value inside a document, rendered as `/a/b[2]/c`.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceKey {
    Root,
    Map(String, Box<TraceKey>),
    Array(usize, Box<TraceKey>),
}

impl TraceKey {
    pub(crate) fn child(&self, key: impl Into<String>) -> TraceKey {
        TraceKey::Map(key.into(), Box::new(self.clone()))
    }

    pub(crate) fn index(&self, index: usize) -> TraceKey {
        TraceKey::Array(index, Box::new(self.clone()))
    }
}

impl Display for TraceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TraceKey::Root => write!(f, ""),
            TraceKey::Map(key, parent) => write!(f, "{}/{}", parent, key),
            TraceKey::Array(index, parent) => write!(f, "{}[{}]", parent, index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TraceKey;

    #[test]
    fn renders_paths() {
        let key = TraceKey::Root.child("tags").index(2).child("name");
        assert_eq!(key.to_string(), "/tags[2]/name");
        assert_eq!(TraceKey::Root.to_string(), "");
    }
}
