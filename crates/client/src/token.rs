//! Access-token claim decoding
//!
//! The backend authenticates responses; the client only needs the claims, so
//! the JWT payload is decoded without signature verification, the same way a
//! browser client would. Claims are validated against an explicit schema at
//! this trust boundary: an unparseable token or one missing required claims
//! is a `MalformedToken`, never a partially populated identity.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use helpdesk_domain::{HelpdeskError, Identity, Result, Role};
use serde::Deserialize;

/// Claim shape the backend puts in access tokens. The role travels under
/// `role` or, on older tokens, `perfil`.
#[derive(Debug, Deserialize)]
struct AccessClaims {
    sub: String,
    name: Option<String>,
    #[serde(alias = "perfil")]
    role: Option<String>,
}

/// Decode an access token into the authenticated identity.
///
/// The subject claim carries the principal's email. A missing role claim
/// defaults to the plain user role (matching the backend's older tokens);
/// a role outside the closed set is rejected.
///
/// # Errors
/// Returns [`HelpdeskError::MalformedToken`] if the token is not a JWT, the
/// payload is not valid base64url JSON, or the claims do not match the
/// expected shape.
pub fn decode_identity(access_token: &str) -> Result<Identity> {
    let mut parts = access_token.split('.');
    let payload = match (parts.next(), parts.next()) {
        (Some(_), Some(payload)) if !payload.is_empty() => payload,
        _ => {
            return Err(HelpdeskError::MalformedToken(
                "token does not have a payload segment".into(),
            ))
        }
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|err| HelpdeskError::MalformedToken(format!("payload is not base64url: {err}")))?;

    let claims: AccessClaims = serde_json::from_slice(&bytes).map_err(|err| {
        HelpdeskError::MalformedToken(format!("claims do not match expected shape: {err}"))
    })?;

    let role_claim = claims.role.unwrap_or_else(|| "user".to_string());
    let role = Role::parse(&role_claim)
        .ok_or_else(|| HelpdeskError::MalformedToken(format!("unknown role claim: {role_claim}")))?;

    Ok(Identity {
        name: claims.name.unwrap_or_else(|| "Usuário".to_string()),
        email: claims.sub,
        role,
    })
}
