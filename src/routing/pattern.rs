//! URL path templates.
//!
//! # Responsibilities
//! - Parse templates such as `/v1/example/{name}`
//! - Match request paths segment by segment
//! - Return captured field values (percent-decoded)
//!
//! # Design Decisions
//! - Segment count must match exactly; no wildcards
//! - Literal segments are case-sensitive
//! - A segment is a capture only when it is exactly `{field}`; anything else is literal

/// One segment of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Capture(String),
}

/// A parsed path template.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(template: &str) -> Self {
        let segments = split(template)
            .map(|segment| {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(field) if !field.is_empty() => Segment::Capture(field.to_string()),
                    _ => Segment::Literal(segment.to_string()),
                }
            })
            .collect();

        Self {
            raw: template.to_string(),
            segments,
        }
    }

    /// Template as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match `path`, returning `(field, value)` pairs for every capture.
    ///
    /// A capture whose value is not valid percent-encoded UTF-8 fails the match.
    pub fn matches(&self, path: &str) -> Option<Vec<(String, String)>> {
        let mut captures = Vec::new();
        let mut parts = split(path);

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Capture(field) => {
                    if part.is_empty() {
                        return None;
                    }
                    let value = urlencoding::decode(part).ok()?;
                    captures.push((field.clone(), value.into_owned()));
                }
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(captures)
    }
}

fn split(path: &str) -> std::str::Split<'_, char> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}
