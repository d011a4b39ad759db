/// Group every layer without an explicit `group` falls into.
pub const DEFAULT_GROUP_ID: &str = "Default";

/// Pseudo-group of base maps. Never part of the group tree.
pub const BACKGROUND_GROUP_ID: &str = "background";

/// Node id addressing the top level of the tree in sort gestures.
pub const ROOT_GROUP_ID: &str = "root";

/// Separator between the segments of a group path.
pub const PATH_SEPARATOR: char = '.';

/// Token standing for a literal `.` inside a single path segment.
pub const DOT_TOKEN: &str = "${dot}";

/// Resolves an optional `group` attribute to the group id it denotes.
///
/// Absent and empty values both mean [`DEFAULT_GROUP_ID`].
pub fn group_or_default(group: Option<&str>) -> &str {
    match group {
        Some(g) if !g.is_empty() => g,
        _ => DEFAULT_GROUP_ID,
    }
}

pub fn is_background(group: Option<&str>) -> bool {
    group == Some(BACKGROUND_GROUP_ID)
}

/// Restores escaped dots in a path segment (`a${dot}b` -> `a.b`).
pub fn unescape_segment(segment: &str) -> String {
    segment.replace(DOT_TOKEN, ".")
}

pub fn escape_segment(label: &str) -> String {
    label.replace('.', DOT_TOKEN)
}

/// Dot-delimited group path such as `continent.country`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupPath<'a> {
    raw: &'a str,
}

impl<'a> GroupPath<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    pub fn segments(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.raw.split(PATH_SEPARATOR)
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Yields `(cumulative_id, segment)` for every depth, shallowest first.
    ///
    /// `a.b.c` yields `("a", "a")`, `("a.b", "b")`, `("a.b.c", "c")`.
    pub fn prefixes(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let raw = self.raw;
        let mut start = 0usize;
        std::iter::from_fn(move || {
            if start > raw.len() {
                return None;
            }
            let rest = &raw[start..];
            let (segment, end) = match rest.find(PATH_SEPARATOR) {
                Some(pos) => (&rest[..pos], start + pos),
                None => (rest, raw.len()),
            };
            start = end + PATH_SEPARATOR.len_utf8();
            Some((&raw[..end], segment))
        })
    }

    /// True if `self` equals `ancestor` or lies below it.
    pub fn is_within(&self, ancestor: &str) -> bool {
        self.raw == ancestor
            || (self.raw.len() > ancestor.len()
                && self.raw.starts_with(ancestor)
                && self.raw[ancestor.len()..].starts_with(PATH_SEPARATOR))
    }
}

/// Checks a user-typed label for a new group (`a/b/c` style labels allowed).
///
/// Rejects empty labels, leading or trailing `/`, and empty segments.
pub fn is_valid_new_group_label(label: &str) -> bool {
    let trimmed = label.trim();
    if trimmed.is_empty() || trimmed.starts_with('/') || trimmed.ends_with('/') {
        return false;
    }
    !trimmed.split('/').any(|s| s.trim().is_empty())
}
