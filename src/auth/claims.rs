use serde::{Deserialize, Serialize};

/// Purpose a token was issued for. A token is only accepted by the flow
/// that matches its purpose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenPurpose {
    Access,
    Reset,
    Verify,
}

/// JWT payload shared by access, password-reset and email-verification tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,        // user ID
    pub iat: usize,      // issued at (unix timestamp)
    pub exp: usize,      // expires at (unix timestamp)
    pub iss: String,     // issuer
    pub aud: String,     // audience
    pub purpose: TokenPurpose,
    /// Email bound to a verification token; the token dies if the user's
    /// email changes before it is consumed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Fingerprint of the password hash current when a reset token was
    /// issued; a successful reset changes the hash and voids the token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purpose_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TokenPurpose::Access).unwrap(),
            "\"access\""
        );
        assert_eq!(
            serde_json::to_string(&TokenPurpose::Reset).unwrap(),
            "\"reset\""
        );
    }

    #[test]
    fn optional_claims_are_omitted_when_absent() {
        let claims = Claims {
            sub: 7,
            iat: 0,
            exp: 0,
            iss: "iss".into(),
            aud: "aud".into(),
            purpose: TokenPurpose::Access,
            email: None,
            fingerprint: None,
        };
        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("email"));
        assert!(!json.contains("fingerprint"));
    }
}
