//! Command-line interface.
//!
//! ```text
//! gatehouse                      # same as `gatehouse serve`
//! gatehouse serve
//! gatehouse issue-token --sub u1 --email a@b.com --role admin --role user
//! ```

use clap::{Args, Parser, Subcommand};

use gatehouse_auth::{Claims, TokenError, encode_claims};
use gatehouse_config::JwtConfig;
use gatehouse_core::Identity;

#[derive(Debug, Parser)]
#[command(name = "gatehouse")]
#[command(about = "Bearer-token authentication and role enforcement for HTTP APIs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,
    /// Mint a signed access token with the configured secret (development aid)
    IssueToken(IssueTokenArgs),
}

#[derive(Debug, Clone, Args)]
pub struct IssueTokenArgs {
    /// Subject (caller id)
    #[arg(long)]
    pub sub: String,

    /// Email address
    #[arg(long)]
    pub email: String,

    /// Tenant id; omit for a tenant-less token
    #[arg(long)]
    pub tenant: Option<String>,

    /// Granted role, repeatable
    #[arg(long = "role")]
    pub roles: Vec<String>,

    /// Lifetime in seconds; defaults to JWT_ACCESS_EXPIRY
    #[arg(long, allow_negative_numbers = true)]
    pub ttl: Option<i64>,
}

impl IssueTokenArgs {
    pub fn identity(&self) -> Identity {
        let identity =
            Identity::new(self.sub.clone(), self.email.clone()).with_roles(self.roles.clone());

        match &self.tenant {
            Some(tenant) => identity.with_tenant(tenant.clone()),
            None => identity,
        }
    }
}

/// Signs a token for the identity described by `args`.
pub fn issue_token(args: &IssueTokenArgs, jwt_config: &JwtConfig) -> Result<String, TokenError> {
    let ttl = args.ttl.unwrap_or(jwt_config.access_token_expiry);

    let mut claims = Claims::for_identity(&args.identity(), ttl);
    claims.iss = jwt_config.issuer.clone();
    claims.aud = jwt_config.audience.clone();

    encode_claims(&claims, jwt_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_auth::verify_token;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig::with_secret("test-secret-key-at-least-32-characters-long")
    }

    #[test]
    fn test_parse_issue_token() {
        let cli = Cli::try_parse_from([
            "gatehouse",
            "issue-token",
            "--sub",
            "u1",
            "--email",
            "a@b.com",
            "--role",
            "admin",
            "--role",
            "user",
        ])
        .unwrap();

        let Some(Command::IssueToken(args)) = cli.command else {
            panic!("expected issue-token");
        };
        assert_eq!(args.roles, vec!["admin".to_string(), "user".to_string()]);
        assert!(args.tenant.is_none());
    }

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["gatehouse"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_issued_token_verifies() {
        let config = get_test_jwt_config();
        let args = IssueTokenArgs {
            sub: "u1".to_string(),
            email: "a@b.com".to_string(),
            tenant: Some("t1".to_string()),
            roles: vec!["user".to_string()],
            ttl: None,
        };

        let token = issue_token(&args, &config).unwrap();
        let identity = verify_token(&token, &config).unwrap().into_identity();
        assert_eq!(identity, args.identity());
    }

    #[test]
    fn test_negative_ttl_issues_expired_token() {
        let config = get_test_jwt_config();
        let args = IssueTokenArgs {
            sub: "u1".to_string(),
            email: "a@b.com".to_string(),
            tenant: None,
            roles: vec![],
            ttl: Some(-3600),
        };

        let token = issue_token(&args, &config).unwrap();
        assert!(matches!(
            verify_token(&token, &config),
            Err(TokenError::Expired)
        ));
    }
}
