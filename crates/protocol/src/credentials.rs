//! Credentials presented to a repository at login.
//!
//! Transports decide how to turn these into wire-level authentication
//! (HTTP basic auth, tokens, ...). The core only passes them through.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Credentials for a repository login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credentials {
    /// User id and password, with optional free-form attributes.
    Simple(SimpleCredentials),
    /// Anonymous access, if the repository allows it.
    Guest,
}

impl Credentials {
    /// Shorthand for [`SimpleCredentials::new`] wrapped in [`Credentials::Simple`].
    pub fn simple(user_id: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Simple(SimpleCredentials::new(user_id, password))
    }

    /// Returns the user id, if these credentials carry one.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Credentials::Simple(simple) => Some(simple.user_id()),
            Credentials::Guest => None,
        }
    }

    /// Returns the attribute names carried by these credentials.
    pub fn attribute_names(&self) -> Vec<&str> {
        match self {
            Credentials::Simple(simple) => simple.attribute_names().collect(),
            Credentials::Guest => Vec::new(),
        }
    }

    /// Returns an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        match self {
            Credentials::Simple(simple) => simple.attribute(name),
            Credentials::Guest => None,
        }
    }
}

impl From<SimpleCredentials> for Credentials {
    fn from(simple: SimpleCredentials) -> Self {
        Credentials::Simple(simple)
    }
}

/// User id and password credentials.
///
/// The `Debug` output redacts the password.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleCredentials {
    user_id: String,
    password: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, Value>,
}

impl SimpleCredentials {
    /// Creates credentials for the given user id and password.
    pub fn new(user_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            password: password.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute, replacing any previous value with the same name.
    pub fn attribute_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Iterates attribute names in sorted order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }
}

impl fmt::Debug for SimpleCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleCredentials")
            .field("user_id", &self.user_id)
            .field("password", &"<redacted>")
            .field("attributes", &self.attributes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let credentials = SimpleCredentials::new("admin", "s3cret");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("admin"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_attributes() {
        let credentials: Credentials = SimpleCredentials::new("admin", "admin")
            .attribute_value("tenant", "acme")
            .attribute_value("impersonate", false)
            .into();

        assert_eq!(credentials.user_id(), Some("admin"));
        assert_eq!(credentials.attribute_names(), vec!["impersonate", "tenant"]);
        assert_eq!(credentials.attribute("tenant"), Some(&Value::from("acme")));
        assert_eq!(credentials.attribute("missing"), None);
    }

    #[test]
    fn test_guest_has_no_user() {
        assert_eq!(Credentials::Guest.user_id(), None);
        assert!(Credentials::Guest.attribute_names().is_empty());
    }

    #[test]
    fn test_credentials_serialization() {
        let json = serde_json::to_value(Credentials::simple("admin", "pw")).unwrap();
        assert_eq!(json["type"], "simple");
        assert_eq!(json["userId"], "admin");
        assert!(json.get("attributes").is_none());
    }
}
