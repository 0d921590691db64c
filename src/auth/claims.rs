use serde::{Deserialize, Serialize};

/// JWT payload: the subject user id plus issue and expiry instants.
///
/// The subject is typed as `i64`, so a token whose `sub` is not numeric
/// fails at decode rather than somewhere downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,   // user ID
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_must_be_numeric() {
        let result = serde_json::from_str::<Claims>(r#"{"sub":"abc","iat":1,"exp":2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn missing_subject_rejected() {
        let result = serde_json::from_str::<Claims>(r#"{"iat":1,"exp":2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn roundtrip() {
        let claims = Claims {
            sub: 7,
            iat: 1_700_000_000,
            exp: 1_700_086_400,
        };
        let json = serde_json::to_string(&claims).unwrap();
        let back: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sub, 7);
        assert_eq!(back.exp, claims.exp);
    }
}
