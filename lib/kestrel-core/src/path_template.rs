//! Path templates such as `/1/aspects/{id}`.
//!
//! A template renders into a concrete path on the client side (each
//! parameter percent-encoded as one path segment) and matches concrete
//! paths on the server side.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use crate::{Error, Result};

// Unreserved characters and sub-delims stay as they are.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// A path pattern with `{name}` placeholders, one per segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathTemplate(&'static str);

impl PathTemplate {
    /// Create a new path template.
    #[must_use]
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    /// Get the template string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    fn segments(&self) -> impl Iterator<Item = Segment> {
        self.0
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|segment| {
                segment
                    .strip_prefix('{')
                    .and_then(|rest| rest.strip_suffix('}'))
                    .map_or(Segment::Literal(segment), Segment::Param)
            })
    }

    /// Render the template, percent-encoding each parameter value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if a placeholder has no value.
    ///
    /// ```
    /// use kestrel_core::PathTemplate;
    ///
    /// let template = PathTemplate::new("/1/secrets/{name}");
    /// let path = template.render(&[("name", "db password")]).expect("render");
    /// assert_eq!(path, "/1/secrets/db%20password");
    /// ```
    pub fn render(&self, params: &[(&str, &str)]) -> Result<String> {
        let mut path = String::with_capacity(self.0.len());
        for segment in self.segments() {
            path.push('/');
            match segment {
                Segment::Literal(literal) => path.push_str(literal),
                Segment::Param(name) => {
                    let value = params
                        .iter()
                        .find(|(key, _)| *key == name)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| {
                            Error::invalid_request(format!(
                                "missing path parameter {name:?} for {}",
                                self.0
                            ))
                        })?;
                    path.extend(utf8_percent_encode(value, PATH_SEGMENT_ENCODE_SET));
                }
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }

    /// Match a concrete path, capturing the decoded parameter values.
    ///
    /// Returns `None` if the path has another shape or a captured segment
    /// is empty.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let mut actual = path.split('/').filter(|s| !s.is_empty());
        let mut params = Vec::new();
        for segment in self.segments() {
            let value = actual.next()?;
            match segment {
                Segment::Literal(literal) if literal == value => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    let decoded = percent_decode_str(value).decode_utf8().ok()?;
                    params.push((name, decoded.into_owned()));
                }
            }
        }
        actual.next().is_none().then_some(PathParams(params))
    }
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

enum Segment {
    Literal(&'static str),
    Param(&'static str),
}

/// Parameter values captured by [`PathTemplate::matches`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(&'static str, String)>);

impl PathParams {
    /// The value captured for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}
