//! Password policy and secret wrappers.
//!
//! Registration and password reset share one policy: at least twelve
//! characters with lowercase, uppercase, digit, and special characters. Every
//! violated rule is reported so callers can show a single combined message.

use std::fmt;

use zeroize::Zeroizing;

/// Minimum number of characters accepted by the policy.
pub const PASSWORD_MIN_LENGTH: usize = 12;

/// A single password rule that was not satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordViolation {
    /// Fewer than [`PASSWORD_MIN_LENGTH`] characters.
    TooShort { min: usize, actual: usize },
    /// No ASCII lowercase letter.
    MissingLowercase,
    /// No ASCII uppercase letter.
    MissingUppercase,
    /// No ASCII digit.
    MissingDigit,
    /// No character outside `[A-Za-z0-9]`.
    MissingSpecial,
}

impl PasswordViolation {
    /// Stable code reported in error details.
    pub fn code(self) -> &'static str {
        match self {
            Self::TooShort { .. } => "too_short",
            Self::MissingLowercase => "missing_lowercase",
            Self::MissingUppercase => "missing_uppercase",
            Self::MissingDigit => "missing_digit",
            Self::MissingSpecial => "missing_special",
        }
    }
}

impl fmt::Display for PasswordViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { min, actual } => write!(
                f,
                "Password must be at least {min} characters long (currently {actual})."
            ),
            Self::MissingLowercase => {
                write!(f, "Password must include at least one lowercase letter.")
            }
            Self::MissingUppercase => {
                write!(f, "Password must include at least one uppercase letter.")
            }
            Self::MissingDigit => write!(f, "Password must include at least one number."),
            Self::MissingSpecial => {
                write!(f, "Password must include at least one special character.")
            }
        }
    }
}

/// Aggregated policy failure; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicyError {
    violations: Vec<PasswordViolation>,
}

impl PasswordPolicyError {
    /// Violated rules in policy order.
    pub fn violations(&self) -> &[PasswordViolation] {
        &self.violations
    }
}

impl fmt::Display for PasswordPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.violations {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{violation}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for PasswordPolicyError {}

/// Check a candidate password against the policy.
///
/// # Examples
/// ```
/// use propertyhub::domain::validate_password;
///
/// assert!(validate_password("Str0ng&Secret!").is_ok());
/// let err = validate_password("short").expect_err("weak password");
/// assert_eq!(err.violations().len(), 4);
/// ```
pub fn validate_password(candidate: &str) -> Result<(), PasswordPolicyError> {
    let length = candidate.chars().count();
    let mut violations = Vec::new();

    if length < PASSWORD_MIN_LENGTH {
        violations.push(PasswordViolation::TooShort {
            min: PASSWORD_MIN_LENGTH,
            actual: length,
        });
    }
    if !candidate.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push(PasswordViolation::MissingLowercase);
    }
    if !candidate.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push(PasswordViolation::MissingUppercase);
    }
    if !candidate.chars().any(|c| c.is_ascii_digit()) {
        violations.push(PasswordViolation::MissingDigit);
    }
    if !candidate.chars().any(|c| !c.is_ascii_alphanumeric()) {
        violations.push(PasswordViolation::MissingSpecial);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(PasswordPolicyError { violations })
    }
}

/// Caller-supplied password held in memory that is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct RawPassword(Zeroizing<String>);

impl RawPassword {
    /// Wrap a password without applying the policy (login, federated secrets).
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Wrap a password after it satisfies the policy.
    pub fn with_policy(value: impl Into<String>) -> Result<Self, PasswordPolicyError> {
        let password = Self::new(value);
        validate_password(password.expose())?;
        Ok(password)
    }

    /// Borrow the secret for hashing or verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword(***)")
    }
}

/// One-way password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a stored hash string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// PHC string for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}
