//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper returns an `invalid_request` [`Error`] whose details name the
//! offending field and a stable machine-readable code.

use serde_json::json;

use crate::domain::{
    AccountKind, AccountValidationError, Error, IdValidationError, OtpFormatError,
    SuggestionValidationError, UnknownFileKind,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    NotNumeric,
    NotPositive,
    UnknownAccountKind,
    UnknownFileKind,
    EmptyFullName,
    FullNameTooLong,
    EmptyEmail,
    InvalidEmail,
    EmailTooLong,
    EmptyPassword,
    EmptyIdToken,
    EmptyText,
    TextTooLong,
    UnknownVote,
    UnknownStatus,
    InvalidOtp,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotNumeric => "not_numeric",
            ErrorCode::NotPositive => "not_positive",
            ErrorCode::UnknownAccountKind => "unknown_account_kind",
            ErrorCode::UnknownFileKind => "unknown_file_kind",
            ErrorCode::EmptyFullName => "empty_full_name",
            ErrorCode::FullNameTooLong => "full_name_too_long",
            ErrorCode::EmptyEmail => "empty_email",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::EmailTooLong => "email_too_long",
            ErrorCode::EmptyPassword => "empty_password",
            ErrorCode::EmptyIdToken => "empty_id_token",
            ErrorCode::EmptyText => "empty_text",
            ErrorCode::TextTooLong => "text_too_long",
            ErrorCode::UnknownVote => "unknown_vote",
            ErrorCode::UnknownStatus => "unknown_status",
            ErrorCode::InvalidOtp => "invalid_otp",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_error_with_value(
    field: FieldName,
    code: ErrorCode,
    message: impl Into<String>,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Parse a numeric identifier from a path segment.
pub(crate) fn parse_id<T>(
    raw: &str,
    field: FieldName,
    parse: impl FnOnce(&str) -> Result<T, IdValidationError>,
) -> Result<T, Error> {
    parse(raw).map_err(|err| {
        let code = match err {
            IdValidationError::NotNumeric { .. } => ErrorCode::NotNumeric,
            IdValidationError::NotPositive { .. } => ErrorCode::NotPositive,
        };
        field_error_with_value(field, code, err.to_string(), raw)
    })
}

/// Map the `{kind}` collection segment onto an account class.
pub(crate) fn parse_account_collection(segment: &str) -> Result<AccountKind, Error> {
    match segment {
        "developers" => Ok(AccountKind::Developer),
        "users" => Ok(AccountKind::Consumer),
        other => Err(field_error_with_value(
            FieldName::new("kind"),
            ErrorCode::UnknownAccountKind,
            "account collection must be developers or users",
            other,
        )),
    }
}

pub(crate) fn unknown_file_kind_error(err: UnknownFileKind) -> Error {
    let value = err.0.clone();
    field_error_with_value(
        FieldName::new("kind"),
        ErrorCode::UnknownFileKind,
        err.to_string(),
        &value,
    )
}

pub(crate) fn account_validation_error(err: AccountValidationError) -> Error {
    let code = match &err {
        AccountValidationError::EmptyFullName => ErrorCode::EmptyFullName,
        AccountValidationError::FullNameTooLong { .. } => ErrorCode::FullNameTooLong,
        AccountValidationError::EmptyEmail => ErrorCode::EmptyEmail,
        AccountValidationError::InvalidEmail => ErrorCode::InvalidEmail,
        AccountValidationError::EmailTooLong { .. } => ErrorCode::EmailTooLong,
        AccountValidationError::UnknownKind(_) => ErrorCode::UnknownAccountKind,
    };
    field_error(FieldName::new(err.field()), code, err.to_string())
}

pub(crate) fn empty_password_error() -> Error {
    field_error(
        FieldName::new("password"),
        ErrorCode::EmptyPassword,
        "password must not be empty",
    )
}

pub(crate) fn empty_id_token_error() -> Error {
    field_error(
        FieldName::new("idToken"),
        ErrorCode::EmptyIdToken,
        "idToken must not be empty",
    )
}

pub(crate) fn suggestion_validation_error(err: SuggestionValidationError) -> Error {
    match &err {
        SuggestionValidationError::EmptyText => {
            field_error(FieldName::new("text"), ErrorCode::EmptyText, err.to_string())
        }
        SuggestionValidationError::TextTooLong { .. } => {
            field_error(FieldName::new("text"), ErrorCode::TextTooLong, err.to_string())
        }
        SuggestionValidationError::UnknownDirection(value) => field_error_with_value(
            FieldName::new("vote"),
            ErrorCode::UnknownVote,
            err.to_string(),
            value,
        ),
        SuggestionValidationError::UnknownStatus(value) => field_error_with_value(
            FieldName::new("status"),
            ErrorCode::UnknownStatus,
            err.to_string(),
            value,
        ),
    }
}

pub(crate) fn otp_format_error(err: OtpFormatError) -> Error {
    field_error(FieldName::new("otp"), ErrorCode::InvalidOtp, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PropertyId;
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details().and_then(|d| d.get(key)).and_then(Value::as_str)
    }

    #[rstest]
    #[case("abc", "not_numeric")]
    #[case("0", "not_positive")]
    #[case("-4", "not_positive")]
    fn parse_id_reports_reason(#[case] raw: &str, #[case] code: &str) {
        let err = parse_id(raw, FieldName::new("propertyId"), PropertyId::parse)
            .expect_err("invalid id");
        assert_eq!(detail(&err, "code"), Some(code));
        assert_eq!(detail(&err, "field"), Some("propertyId"));
        assert_eq!(detail(&err, "value"), Some(raw));
    }

    #[rstest]
    fn parse_id_accepts_positive_integers() {
        let id = parse_id("12", FieldName::new("propertyId"), PropertyId::parse).expect("valid");
        assert_eq!(id.get(), 12);
    }

    #[rstest]
    #[case("developers", Some(AccountKind::Developer))]
    #[case("users", Some(AccountKind::Consumer))]
    #[case("admins", None)]
    fn account_collection_segments(#[case] segment: &str, #[case] expected: Option<AccountKind>) {
        assert_eq!(parse_account_collection(segment).ok(), expected);
    }

    #[rstest]
    fn account_errors_name_their_field() {
        let err = account_validation_error(AccountValidationError::InvalidEmail);
        assert_eq!(detail(&err, "field"), Some("email"));
        assert_eq!(detail(&err, "code"), Some("invalid_email"));
    }

    #[rstest]
    fn unknown_vote_echoes_value() {
        let err = suggestion_validation_error(SuggestionValidationError::UnknownDirection(
            "sideways".into(),
        ));
        assert_eq!(detail(&err, "field"), Some("vote"));
        assert_eq!(detail(&err, "value"), Some("sideways"));
    }
}
