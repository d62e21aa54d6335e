use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::clock::Clock;
use super::clock::SystemClock;
use super::errors::TokenError;

/// Mints and parses signed access tokens.
///
/// Tokens are compact JWS strings signed with HS256. The keys are derived
/// once from the secret and never change, so a codec can be shared freely
/// between requests.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    algorithm: Algorithm,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Minimum accepted secret length for HS256.
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Create a codec signing with `secret` and reading the system clock.
    ///
    /// # Errors
    /// * `WeakSecret` - Secret shorter than 32 bytes
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    /// Create a codec with an explicit time source.
    ///
    /// # Errors
    /// * `WeakSecret` - Secret shorter than 32 bytes
    pub fn with_clock(secret: &[u8], clock: Arc<dyn Clock>) -> Result<Self, TokenError> {
        if secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(TokenError::WeakSecret {
                min: Self::MIN_SECRET_LENGTH,
                actual: secret.len(),
            });
        }

        let algorithm = Algorithm::HS256;

        // Expiry is checked against our own clock after the signature passes.
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            algorithm,
            clock,
        })
    }

    /// Current time according to the codec's clock.
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Mint a token for `subject` valid for `ttl` from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - `ttl` is shorter than one second, or signing failed
    pub fn mint(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        self.mint_with_scope(subject, ttl, Vec::<String>::new())
    }

    /// Mint a token carrying a scope list.
    ///
    /// # Errors
    /// * `EncodingFailed` - `ttl` is shorter than one second, or signing failed
    pub fn mint_with_scope<S: ToString>(
        &self,
        subject: &str,
        ttl: Duration,
        scope: impl IntoIterator<Item = S>,
    ) -> Result<String, TokenError> {
        if ttl.num_seconds() <= 0 {
            return Err(TokenError::EncodingFailed(format!(
                "ttl must be at least one second, got {}",
                ttl
            )));
        }

        let claims = Claims::for_subject(subject, self.now(), ttl).with_scope(scope);
        self.encode(&claims)
    }

    fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a token.
    ///
    /// # Returns
    /// Claims, once signature and expiry both check out
    ///
    /// # Errors
    /// * `Malformed` - Not a decodable token with the expected claims
    /// * `InvalidSignature` - Signature does not match
    /// * `Expired` - Current time is past `exp`
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.parse_ignoring_expiry(token)?;

        if claims.is_expired(self.now()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Decode a token, verifying its signature but not its expiry.
    ///
    /// Only for operations that must accept already expired tokens, such
    /// as revoking them. Never use the result to authorize a request.
    ///
    /// # Errors
    /// * `Malformed` - Not a decodable token with the expected claims
    /// * `InvalidSignature` - Signature does not match
    pub fn parse_ignoring_expiry(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            },
        )?;

        let claims = token_data.claims;
        if claims.exp <= claims.iat {
            return Err(TokenError::Malformed(
                "expiry is not after issue time".to_string(),
            ));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::clock::ManualClock;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn codec_at(start: i64) -> (TokenCodec, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_at(start));
        let codec = TokenCodec::with_clock(SECRET, clock.clone()).expect("valid secret");
        (codec, clock)
    }

    #[test]
    fn test_mint_and_parse() {
        let (codec, _) = codec_at(1_700_000_000);

        let token = codec
            .mint("user123", Duration::hours(1))
            .expect("Failed to mint token");
        assert!(!token.is_empty());

        let claims = codec.parse(&token).expect("Failed to parse token");
        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_000 + 3_600);
        assert!(claims.scope.is_empty());
    }

    #[test]
    fn test_mint_with_scope() {
        let (codec, _) = codec_at(1_700_000_000);

        let token = codec
            .mint_with_scope("user123", Duration::minutes(5), ["profile:read"])
            .unwrap();

        let claims = codec.parse(&token).unwrap();
        assert!(claims.has_scope("profile:read"));
    }

    #[test]
    fn test_valid_until_expiry_then_expired() {
        let (codec, clock) = codec_at(1_700_000_000);
        let token = codec.mint("user123", Duration::seconds(60)).unwrap();

        clock.advance(Duration::seconds(59));
        assert!(codec.parse(&token).is_ok());

        clock.advance(Duration::seconds(1));
        assert!(codec.parse(&token).is_ok());

        clock.advance(Duration::seconds(1));
        assert_eq!(codec.parse(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_parse_ignoring_expiry_accepts_expired_token() {
        let (codec, clock) = codec_at(1_700_000_000);
        let token = codec.mint("user123", Duration::seconds(60)).unwrap();

        clock.advance(Duration::days(2));

        assert_eq!(codec.parse(&token), Err(TokenError::Expired));
        let claims = codec.parse_ignoring_expiry(&token).unwrap();
        assert_eq!(claims.sub, "user123");
    }

    #[test]
    fn test_expiry_follows_codec_clock_not_wall_clock() {
        // Minted and read decades in the past: the library must not judge exp.
        let (codec, clock) = codec_at(1_000);
        let token = codec.mint("user123", Duration::seconds(60)).unwrap();

        assert!(codec.parse(&token).is_ok());
        assert!(codec.parse_ignoring_expiry(&token).is_ok());

        clock.advance(Duration::seconds(61));
        assert_eq!(codec.parse(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let (codec, _) = codec_at(1_700_000_000);

        assert!(matches!(
            codec.mint("user123", Duration::zero()),
            Err(TokenError::EncodingFailed(_))
        ));
        assert!(matches!(
            codec.mint("user123", Duration::seconds(-5)),
            Err(TokenError::EncodingFailed(_))
        ));
    }

    #[test]
    fn test_weak_secret_rejected() {
        let result = TokenCodec::new(b"short");
        assert!(matches!(
            result,
            Err(TokenError::WeakSecret { min: 32, actual: 5 })
        ));
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        let (codec, _) = codec_at(1_700_000_000);

        for input in ["", "invalid.token.here", "a.b", "not a token at all"] {
            assert!(
                matches!(codec.parse(input), Err(TokenError::Malformed(_))),
                "{input:?}"
            );
        }
    }

    #[test]
    fn test_parse_with_wrong_secret() {
        let (codec, _) = codec_at(1_700_000_000);
        let other = TokenCodec::new(b"another_secret_key_at_least_32_bytes!").unwrap();

        let token = other.mint("user123", Duration::hours(1)).unwrap();

        assert_eq!(codec.parse(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_every_single_character_change_is_rejected() {
        let (codec, _) = codec_at(1_700_000_000);
        let token = codec.mint("user123", Duration::hours(1)).unwrap();

        for index in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();

            let result = codec.parse(&tampered);
            assert!(
                matches!(
                    result,
                    Err(TokenError::InvalidSignature) | Err(TokenError::Malformed(_))
                ),
                "index {index} accepted: {result:?}"
            );
        }
    }

    #[test]
    fn test_missing_claims_are_malformed() {
        let (codec, _) = codec_at(1_700_000_000);

        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "sub": "user123", "exp": 1_800_000_000i64 }),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(codec.parse(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_other_algorithm_is_malformed() {
        let (codec, _) = codec_at(1_700_000_000);
        let claims = Claims::for_subject("user123", 1_700_000_000, Duration::hours(1));

        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(codec.parse(&token), Err(TokenError::Malformed(_))));
    }
}
