//! Bundle references.
//!
//! A reference names a bundle either by repository and tag (`example.com/app:1.0`),
//! by repository and digest (`app@sha256:<hex>`), or by a bare 64 character
//! digest hex string, which is how a bundle is identified once it has been
//! stored without a human readable name.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use stowage_utils::hash::{is_lower_hex, Sha256Digest, SHA256_HEX_LEN};

use crate::error::ReferenceError;

/// Tag assumed when a reference carries neither a tag nor a digest.
pub const DEFAULT_TAG: &str = "latest";

/// Maximum length of a repository name.
pub const NAME_MAX_LEN: usize = 255;

static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^(?P<name>
            (?:
                (?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])
                (?:\.(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9]))*
                (?::[0-9]+)?
                /
            )?                                               # optional registry domain
            [a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*            # first path component
            (?:/[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*)*      # further path components
        )
        (?::(?P<tag>[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}))?     # optional tag
        (?:@(?P<digest>[a-z0-9]+(?:[+._-][a-z0-9]+)*:[0-9A-Fa-f]{32,}))?
        $",
    )
    .expect("unable to compile reference regex")
});

/// A `repository:tag` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaggedReference {
    repository: String,
    tag: String,
}

impl TaggedReference {
    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// A reference pinned to a content digest.
///
/// Without a repository the reference is a bare bundle ID and renders as the
/// digest hex alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DigestedReference {
    repository: Option<String>,
    digest: Sha256Digest,
}

impl DigestedReference {
    /// The bare ID reference for `digest`.
    pub fn from_digest(digest: Sha256Digest) -> Self {
        Self {
            repository: None,
            digest,
        }
    }

    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    pub fn digest(&self) -> &Sha256Digest {
        &self.digest
    }
}

/// A parsed bundle reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    Tagged(TaggedReference),
    Digested(DigestedReference),
}

impl Reference {
    /// The repository part as shown to users.
    ///
    /// A bare ID reference has no repository and is shown as its digest hex.
    pub fn repository(&self) -> String {
        match self {
            Reference::Tagged(tagged) => tagged.repository.clone(),
            Reference::Digested(digested) => {
                match &digested.repository {
                    Some(repository) => repository.clone(),
                    None => digested.digest.hex(),
                }
            }
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Reference::Tagged(tagged) => Some(&tagged.tag),
            Reference::Digested(_) => None,
        }
    }

    pub fn digest(&self) -> Option<&Sha256Digest> {
        match self {
            Reference::Tagged(_) => None,
            Reference::Digested(digested) => Some(&digested.digest),
        }
    }

    /// Whether this reference is a bare bundle ID with no repository.
    pub fn is_bare_id(&self) -> bool {
        matches!(
            self,
            Reference::Digested(DigestedReference {
                repository: None,
                ..
            })
        )
    }
}

impl From<DigestedReference> for Reference {
    fn from(value: DigestedReference) -> Self {
        Reference::Digested(value)
    }
}

impl From<TaggedReference> for Reference {
    fn from(value: TaggedReference) -> Self {
        Reference::Tagged(value)
    }
}

impl fmt::Display for TaggedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}

impl fmt::Display for DigestedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repository {
            Some(repository) => write!(f, "{repository}@{}", self.digest),
            None => f.write_str(&self.digest.hex()),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Tagged(tagged) => tagged.fmt(f),
            Reference::Digested(digested) => digested.fmt(f),
        }
    }
}

impl FromStr for Reference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(ReferenceError::Empty);
        }

        if input.len() == SHA256_HEX_LEN && is_lower_hex(input) {
            let digest = Sha256Digest::from_hex(input)
                .map_err(|_| ReferenceError::InvalidDigest(input.to_string()))?;
            return Ok(DigestedReference::from_digest(digest).into());
        }

        let Some(caps) = REFERENCE_RE.captures(input) else {
            let lowered = match input.split_once('@') {
                Some((name, digest)) => format!("{}@{digest}", name.to_lowercase()),
                None => input.to_lowercase(),
            };
            if REFERENCE_RE.is_match(&lowered) {
                return Err(ReferenceError::Uppercase(input.to_string()));
            }
            return Err(ReferenceError::InvalidFormat(input.to_string()));
        };

        let name = caps
            .name("name")
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| ReferenceError::InvalidFormat(input.to_string()))?;
        if let Some((first, _)) = name.split_once('/') {
            let is_domain = first.contains(['.', ':']) || first == "localhost";
            if !is_domain && first.bytes().any(|b| b.is_ascii_uppercase()) {
                return Err(ReferenceError::Uppercase(input.to_string()));
            }
        }
        if name.len() > NAME_MAX_LEN {
            return Err(ReferenceError::NameTooLong {
                name,
                max: NAME_MAX_LEN,
            });
        }

        // A digest pins the content, so any tag alongside it is dropped.
        if let Some(digest) = caps.name("digest") {
            let digest = digest
                .as_str()
                .parse::<Sha256Digest>()
                .map_err(|_| ReferenceError::InvalidDigest(digest.as_str().to_string()))?;
            return Ok(Reference::Digested(DigestedReference {
                repository: Some(name),
                digest,
            }));
        }

        let tag = caps
            .name("tag")
            .map_or_else(|| DEFAULT_TAG.to_string(), |m| m.as_str().to_string());

        Ok(Reference::Tagged(TaggedReference {
            repository: name,
            tag,
        }))
    }
}

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Reference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "a948904f2f0f479b8f8197694b30184b0d2ed1c1cd2a1ec0fb85d299a192a447";

    #[test]
    fn test_parse_name_defaults_to_latest() {
        let reference: Reference = "foo".parse().unwrap();
        assert_eq!(reference.repository(), "foo");
        assert_eq!(reference.tag(), Some("latest"));
        assert_eq!(reference.to_string(), "foo:latest");
    }

    #[test]
    fn test_parse_tagged_with_domain() {
        let reference: Reference = "localhost:5000/team/app:v1.2".parse().unwrap();
        assert_eq!(reference.repository(), "localhost:5000/team/app");
        assert_eq!(reference.tag(), Some("v1.2"));
        assert!(reference.digest().is_none());
        assert_eq!(reference.to_string(), "localhost:5000/team/app:v1.2");
    }

    #[test]
    fn test_parse_digested() {
        let input = format!("example.com/app@sha256:{HEX}");
        let reference: Reference = input.parse().unwrap();
        assert_eq!(reference.repository(), "example.com/app");
        assert_eq!(reference.tag(), None);
        assert_eq!(reference.digest().unwrap().hex(), HEX);
        assert!(!reference.is_bare_id());
        assert_eq!(reference.to_string(), input);
    }

    #[test]
    fn test_parse_tag_and_digest_drops_tag() {
        let reference: Reference = format!("app:1.0@sha256:{HEX}").parse().unwrap();
        assert_eq!(reference.to_string(), format!("app@sha256:{HEX}"));
    }

    #[test]
    fn test_parse_bare_id() {
        let reference: Reference = HEX.parse().unwrap();
        assert!(reference.is_bare_id());
        assert_eq!(reference.repository(), HEX);
        assert_eq!(reference.tag(), None);
        assert_eq!(reference.to_string(), HEX);
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert_eq!("".parse::<Reference>(), Err(ReferenceError::Empty));
        assert_eq!("   ".parse::<Reference>(), Err(ReferenceError::Empty));
        assert!(matches!(
            "foo:".parse::<Reference>(),
            Err(ReferenceError::InvalidFormat(_))
        ));
        assert!(matches!(
            "foo bar".parse::<Reference>(),
            Err(ReferenceError::InvalidFormat(_))
        ));
        assert!(matches!(
            "Foo".parse::<Reference>(),
            Err(ReferenceError::Uppercase(_))
        ));
        assert!(matches!(
            "Team/app".parse::<Reference>(),
            Err(ReferenceError::Uppercase(_))
        ));
        assert!("Registry.example.com/app".parse::<Reference>().is_ok());
        assert!(matches!(
            "app@sha256:abcd1234abcd1234abcd1234abcd1234".parse::<Reference>(),
            Err(ReferenceError::InvalidDigest(_))
        ));
        assert!(matches!(
            format!("app@sha512:{HEX}").parse::<Reference>(),
            Err(ReferenceError::InvalidDigest(_))
        ));
        assert!(matches!(
            format!("app@sha256+b64u:{HEX}").parse::<Reference>(),
            Err(ReferenceError::InvalidDigest(_))
        ));
        assert!(matches!(
            format!("app@SHA256:{HEX}").parse::<Reference>(),
            Err(ReferenceError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_rejects_long_name() {
        let name = "a".repeat(NAME_MAX_LEN + 1);
        assert!(matches!(
            name.parse::<Reference>(),
            Err(ReferenceError::NameTooLong { .. })
        ));
    }

    #[test]
    fn test_display_round_trips() {
        let digested = format!("app@sha256:{HEX}");
        for input in [
            "foo:latest",
            "my-app:1.0.0",
            "registry.example.com:443/org/app:rc_1",
            digested.as_str(),
            HEX,
        ] {
            let reference: Reference = input.parse().unwrap();
            assert_eq!(reference.to_string(), input);
            assert_eq!(reference.to_string().parse::<Reference>().unwrap(), reference);
        }
    }

    #[test]
    fn test_serde_as_string() {
        let reference: Reference = "foo:1".parse().unwrap();
        let json = serde_json::to_string(&reference).unwrap();
        assert_eq!(json, "\"foo:1\"");
        let back: Reference = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reference);
        assert!(serde_json::from_str::<Reference>("\"Bad Ref\"").is_err());
    }
}
