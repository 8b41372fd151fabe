use serde::{Deserialize, Serialize};

/// The identity a request acts under, as resolved by an access policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub player_id: String,
    pub is_admin: bool,
}

impl Caller {
    pub fn player(player_id: &str) -> Self {
        Caller {
            player_id: player_id.to_string(),
            is_admin: false,
        }
    }

    pub fn admin(player_id: &str) -> Self {
        Caller {
            player_id: player_id.to_string(),
            is_admin: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenClaims {
    pub sub: String, // subject (player ID)
    #[serde(default)]
    pub is_admin: bool,
    pub exp: usize, // expiration time
    pub iat: usize, // issued at
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_constructors() {
        assert!(!Caller::player("p1").is_admin);
        assert!(Caller::admin("root").is_admin);
        assert_eq!(Caller::player("p1").player_id, "p1");
    }

    #[test]
    fn test_claims_default_to_non_admin() {
        let claims: TokenClaims =
            serde_json::from_str(r#"{"sub":"p1","exp":10,"iat":1}"#).unwrap();

        assert_eq!(claims.sub, "p1");
        assert!(!claims.is_admin);
    }
}
