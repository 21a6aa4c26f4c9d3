//! Integer decoding policy.
//!
//! Standard decoders refuse integers whose content is longer than the target
//! register. Some agents emit such encodings anyway (padded counters, sign
//! octets repeated several times), so the length ceiling is configurable
//! rather than baked into the decoder.

use crate::error::{Error, Result};

/// Length ceiling applied to integer content octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerPolicy {
    max_length: Option<usize>,
}

impl IntegerPolicy {
    /// Reject signed integers with more than 4 content octets (and unsigned
    /// integers with more than 8 significant octets).
    pub const STRICT: Self = Self {
        max_length: Some(4),
    };

    /// Accept any content length. Excess high-order octets wrap out of the
    /// register, so the trailing octets determine the value.
    pub const RELAXED: Self = Self { max_length: None };

    /// Custom ceiling on signed integer content octets.
    pub const fn with_max_length(max: usize) -> Self {
        Self {
            max_length: Some(max),
        }
    }

    /// The configured ceiling, `None` when unbounded.
    pub const fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Whether this policy accepts arbitrarily long content.
    pub const fn is_relaxed(&self) -> bool {
        self.max_length.is_none()
    }

    /// Select a policy from a textual workaround toggle.
    ///
    /// `"true"` (any case) enables the relaxed policy, `"false"` or an empty
    /// string keeps the strict one.
    ///
    /// ```
    /// use snmp_lenient::ber::IntegerPolicy;
    ///
    /// assert_eq!(IntegerPolicy::from_flag("TRUE").unwrap(), IntegerPolicy::RELAXED);
    /// assert_eq!(IntegerPolicy::from_flag("").unwrap(), IntegerPolicy::STRICT);
    /// assert!(IntegerPolicy::from_flag("maybe").is_err());
    /// ```
    pub fn from_flag(flag: &str) -> Result<Self> {
        let flag = flag.trim();
        if flag.eq_ignore_ascii_case("true") {
            Ok(Self::RELAXED)
        } else if flag.is_empty() || flag.eq_ignore_ascii_case("false") {
            Ok(Self::STRICT)
        } else {
            Err(Error::Config(
                format!("invalid integer workaround flag: {flag:?}").into_boxed_str(),
            ))
        }
    }

    /// Returns the ceiling violated by `len`, if any.
    pub(crate) fn exceeded_by(&self, len: usize) -> Option<usize> {
        self.max_length.filter(|&max| len > max)
    }
}

impl Default for IntegerPolicy {
    /// The relaxed policy.
    fn default() -> Self {
        Self::RELAXED
    }
}
