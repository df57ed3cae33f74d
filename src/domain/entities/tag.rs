//! Tag entity.

use std::fmt;

/// A named label attached to short URLs.
///
/// Tags are identified by name only: two tags with the same name are the same tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag {
    name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_tags_are_unique_by_name() {
        let tags: BTreeSet<Tag> = [Tag::new("foo"), Tag::new("bar"), Tag::new("foo")]
            .into_iter()
            .collect();

        assert_eq!(tags.len(), 2);
        assert!(tags.contains(&Tag::new("foo")));
    }
}
