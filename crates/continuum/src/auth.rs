use crate::config::AuthConfig;

/// Login check used by the dashboard gate.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// A single username/password pair compared by exact string equality.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_pair_is_accepted() {
        let verifier = StaticCredentials::new("Zhalae", "password");
        assert!(verifier.verify("Zhalae", "password"));
        assert!(!verifier.verify("zhalae", "password"));
        assert!(!verifier.verify("Zhalae", "password "));
        assert!(!verifier.verify("", ""));
    }
}
