//! Repository reference parsing
//!
//! Follows the distribution reference grammar:
//! `[domain[:port]/]path-component[/path-component...][:tag][@digest]`.
//! Only the leading segment of the repository name is needed to look up
//! credentials, so no normalization (e.g. implicit `docker.io`) is applied.

use crate::error::ReferenceError;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;


const NAME_TOTAL_LENGTH_MAX: usize = 255;

static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alpha_numeric = r"[a-z0-9]+";
    let separator = r"(?:[._]|__|[-]+)";
    let path_component = format!("{alpha_numeric}(?:{separator}{alpha_numeric})*");
    let domain_component = r"(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])";
    let ipv6 = r"\[(?:[a-fA-F0-9:]+)\]";
    let host = format!(r"(?:{domain_component}(?:\.{domain_component})*|{ipv6})");
    let domain = format!(r"{host}(?::[0-9]+)?");
    let name = format!("(?:{domain}/)?{path_component}(?:/{path_component})*");
    let tag = r"[\w][\w.-]{0,127}";
    let digest = r"[A-Za-z][A-Za-z0-9]*(?:[-_+.][A-Za-z][A-Za-z0-9]*)*:[0-9a-fA-F]{32,}";

    Regex::new(&format!("^({name})(?::({tag}))?(?:@({digest}))?$"))
        .expect("reference pattern is valid")
});

/// A parsed repository reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    name: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl Reference {
    /// Full repository name, including the domain if one was given
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Segment of the repository name before the first `/`
    pub fn server(&self) -> &str {
        self.name.split('/').next().unwrap_or(&self.name)
    }
}

impl FromStr for Reference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ReferenceError::Empty);
        }

        let Some(captures) = REFERENCE_PATTERN.captures(s) else {
            if REFERENCE_PATTERN.is_match(&s.to_lowercase()) {
                return Err(ReferenceError::NameNotLowercase {
                    reference: s.to_string(),
                });
            }
            return Err(ReferenceError::InvalidFormat {
                reference: s.to_string(),
            });
        };

        let name = captures[1].to_string();
        if name.len() > NAME_TOTAL_LENGTH_MAX {
            return Err(ReferenceError::NameTooLong {
                reference: s.to_string(),
            });
        }

        Ok(Reference {
            name,
            tag: captures.get(2).map(|m| m.as_str().to_string()),
            digest: captures.get(3).map(|m| m.as_str().to_string()),
        })
    }
}

/// Extract the server address used as the credential lookup key
///
/// On failure the error still carries the raw reference, see
/// [`ReferenceError::reference`].
pub fn parse_server_address(reference: &str) -> Result<String, ReferenceError> {
    let parsed: Reference = reference.parse()?;
    Ok(parsed.server().to_string())
}
