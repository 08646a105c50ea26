//! Resource URNs and provider references.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

const URN_PREFIX: &str = "urn:pulumi:";
const NAME_DELIMITER: &str = "::";
const TYPE_DELIMITER: char = '$';

/// A resource URN of the form
/// `urn:pulumi:<stack>::<project>::<qualified type>::<name>`.
///
/// The qualified type is a `$`-separated chain of parent types ending in the
/// resource's own type token. The name may itself contain `::`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Urn(String);

impl Urn {
    /// Create a URN from a string without validating it.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The URN as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the URN, returning the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether the URN has the expected prefix and all four components.
    pub fn is_valid(&self) -> bool {
        self.parts().is_some()
    }

    fn parts(&self) -> Option<[&str; 4]> {
        let rest = self.0.strip_prefix(URN_PREFIX)?;
        let mut split = rest.splitn(4, NAME_DELIMITER);
        let stack = split.next()?;
        let project = split.next()?;
        let qualified_type = split.next()?;
        let name = split.next()?;
        if stack.is_empty() || project.is_empty() || qualified_type.is_empty() {
            return None;
        }
        Some([stack, project, qualified_type, name])
    }

    fn part(&self, i: usize) -> &str {
        self.parts().map(|p| p[i]).unwrap_or("")
    }

    /// The stack component, or `""` for an invalid URN.
    pub fn stack(&self) -> &str {
        self.part(0)
    }

    /// The project component, or `""` for an invalid URN.
    pub fn project(&self) -> &str {
        self.part(1)
    }

    /// The full `$`-separated type chain, or `""` for an invalid URN.
    pub fn qualified_type(&self) -> &str {
        self.part(2)
    }

    /// The resource's own type token (the last segment of the qualified type).
    pub fn type_token(&self) -> &str {
        let qualified = self.qualified_type();
        qualified
            .rsplit(TYPE_DELIMITER)
            .next()
            .unwrap_or(qualified)
    }

    /// The resource name, or `""` for an invalid URN.
    pub fn name(&self) -> &str {
        self.part(3)
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Urn {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Urn {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<Urn> for String {
    fn from(urn: Urn) -> Self {
        urn.0
    }
}

impl AsRef<str> for Urn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parse a provider reference of the form `<urn>::<id>`.
pub fn parse_provider_reference(s: &str) -> Result<(Urn, String), ProviderError> {
    let Some(sep) = s.rfind(NAME_DELIMITER) else {
        return Err(ProviderError::Malformed(format!(
            "expected '{}' in provider reference '{}'",
            NAME_DELIMITER, s
        )));
    };
    let urn = Urn::new(&s[..sep]);
    let id = &s[sep + NAME_DELIMITER.len()..];
    if !urn.is_valid() {
        return Err(ProviderError::Malformed(format!("{} is not a valid URN", urn)));
    }
    if id.is_empty() {
        return Err(ProviderError::Malformed(format!("{} is not a valid ID", id)));
    }
    Ok((urn, id.to_string()))
}

/// Format a provider reference from its URN and ID.
pub fn format_provider_reference(urn: &Urn, id: &str) -> String {
    format!("{}{}{}", urn, NAME_DELIMITER, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URN: &str = "urn:pulumi:dev::proj::aws:ec2/vpc:Vpc$aws:ec2/subnet:Subnet::my::subnet";

    #[test]
    fn test_components() {
        let urn = Urn::from(URN);
        assert!(urn.is_valid());
        assert_eq!(urn.stack(), "dev");
        assert_eq!(urn.project(), "proj");
        assert_eq!(urn.qualified_type(), "aws:ec2/vpc:Vpc$aws:ec2/subnet:Subnet");
        assert_eq!(urn.type_token(), "aws:ec2/subnet:Subnet");
        assert_eq!(urn.name(), "my::subnet");
    }

    #[test]
    fn test_invalid_urn() {
        let urn = Urn::from("not-a-urn");
        assert!(!urn.is_valid());
        assert_eq!(urn.name(), "");
        assert_eq!(urn.type_token(), "");
        assert!(!Urn::from("urn:pulumi:dev::proj").is_valid());
    }

    #[test]
    fn test_provider_reference() {
        let reference = "urn:pulumi:dev::proj::pulumi:providers:aws::default::0b1e-42";
        let (urn, id) = parse_provider_reference(reference).unwrap();
        assert_eq!(urn.as_str(), "urn:pulumi:dev::proj::pulumi:providers:aws::default");
        assert_eq!(id, "0b1e-42");
        assert_eq!(format_provider_reference(&urn, &id), reference);
    }

    #[test]
    fn test_provider_reference_errors() {
        assert!(parse_provider_reference("no-separator").is_err());
        assert!(parse_provider_reference("bad::id").is_err());
        assert!(
            parse_provider_reference("urn:pulumi:dev::proj::pulumi:providers:aws::default::")
                .is_err()
        );
    }

    #[test]
    fn test_serde_transparent() {
        let urn = Urn::from(URN);
        let json = serde_json::to_string(&urn).unwrap();
        assert_eq!(json, format!("\"{}\"", URN));
        let back: Urn = serde_json::from_str(&json).unwrap();
        assert_eq!(back, urn);
    }
}
