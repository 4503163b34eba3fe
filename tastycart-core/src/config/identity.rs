//! Customer identity configuration.

#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Firebase project id. Tokens must be issued for this audience.
    pub project_id: String,
}

impl IdentityConfig {
    pub fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }
}
