//! Keyed-hash pseudonyms for matched addresses

use crate::patterns::AddressMatcher;
use crate::salt::{Salt, SaltClock};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use md5::Md5;
use std::sync::Arc;

/// Length of an emitted pseudonym, in base64 characters
pub const PSEUDONYM_LEN: usize = 6;

type HmacMd5 = Hmac<Md5>;

/// `base64(HMAC-MD5(salt, address))`, truncated to `PSEUDONYM_LEN`.
///
/// The truncation keeps log lines readable at the cost of collision
/// resistance; pseudonyms are not guaranteed unique.
pub fn pseudonym(salt: &Salt, address: &str) -> String {
    let mut mac = HmacMd5::new_from_slice(salt.as_bytes()).expect("HMAC can take key of any size");
    mac.update(address.as_bytes());
    let digest = mac.finalize().into_bytes();

    let mut encoded = STANDARD.encode(digest);
    encoded.truncate(PSEUDONYM_LEN);
    encoded
}

/// Replace every span reported by `matcher` with its pseudonym under `salt`.
/// Text outside the spans is copied unchanged.
pub fn transform<M>(line: &str, matcher: &M, salt: &Salt) -> String
where
    M: AddressMatcher + ?Sized,
{
    transform_counted(line, matcher, salt).0
}

/// Same as [`transform`], also returning how many addresses were replaced
pub fn transform_counted<M>(line: &str, matcher: &M, salt: &Salt) -> (String, usize)
where
    M: AddressMatcher + ?Sized,
{
    let spans = matcher.find_spans(line);
    if spans.is_empty() {
        return (line.to_string(), 0);
    }

    let mut result = String::with_capacity(line.len());
    let mut last = 0;
    for span in &spans {
        result.push_str(&line[last..span.start]);
        result.push_str(&pseudonym(salt, &line[span.clone()]));
        last = span.end;
    }
    result.push_str(&line[last..]);

    (result, spans.len())
}

/// Binds a salt clock to a matcher
pub struct Pseudonymizer {
    clock: Arc<SaltClock>,
    matcher: Arc<dyn AddressMatcher>,
}

impl Pseudonymizer {
    pub fn new<M>(clock: Arc<SaltClock>, matcher: M) -> Self
    where
        M: AddressMatcher + 'static,
    {
        Self {
            clock,
            matcher: Arc::new(matcher),
        }
    }

    /// Anonymize one line. The salt is read once, so the whole line is
    /// transformed under a single salt even if a rotation races in.
    pub fn anonymize_line(&self, line: &str) -> String {
        self.anonymize_line_counted(line).0
    }

    pub fn anonymize_line_counted(&self, line: &str) -> (String, usize) {
        let salt = self.clock.current();
        transform_counted(line, self.matcher.as_ref(), &salt)
    }

    pub fn clock(&self) -> &Arc<SaltClock> {
        &self.clock
    }
}
