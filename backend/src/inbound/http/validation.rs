//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure is an `invalid_request` error carrying a
//! `details` object with the offending `field` and a stable `code` so pages
//! can attach messages to the right input.

use pagination::{PageRequest, PageRequestError};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Build a field-level validation error.
pub(crate) fn field_error(
    field: FieldName,
    code: &'static str,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code,
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("{name} must be a valid UUID")).with_details(json!({
        "field": name,
        "value": value,
        "code": "invalid_uuid",
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

/// Raw paging and search parameters as they arrive on the query string.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub search: Option<String>,
}

impl PageQuery {
    /// Parse into a clamped [`PageRequest`], mapping parse failures to
    /// field-level errors.
    pub fn page_request(&self) -> Result<PageRequest, Error> {
        PageRequest::from_raw(
            self.page.as_deref(),
            self.per_page.as_deref(),
            self.search.as_deref(),
        )
        .map_err(|error| match error {
            PageRequestError::InvalidPage { value } => {
                Error::invalid_request("page must be a positive integer").with_details(json!({
                    "field": "page",
                    "value": value,
                    "code": "invalid_page",
                }))
            }
            PageRequestError::InvalidPerPage { value } => {
                Error::invalid_request("per_page must be a positive integer").with_details(
                    json!({
                        "field": "per_page",
                        "value": value,
                        "code": "invalid_per_page",
                    }),
                )
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    fn parse_uuid_reports_the_field() {
        let err = parse_uuid("nope", FieldName::new("post_id")).expect_err("invalid uuid");
        let details = err.details().expect("details");
        assert_eq!(details["field"], "post_id");
        assert_eq!(details["code"], "invalid_uuid");
    }

    #[rstest]
    #[case(Some("0"), None, "page")]
    #[case(None, Some("lots"), "per_page")]
    fn page_query_maps_parse_failures(
        #[case] page: Option<&str>,
        #[case] per_page: Option<&str>,
        #[case] expected_field: &str,
    ) {
        let query = PageQuery {
            page: page.map(str::to_owned),
            per_page: per_page.map(str::to_owned),
            search: None,
        };
        let err = query.page_request().expect_err("invalid paging");
        let details = err.details().expect("details");
        assert_eq!(details["field"], Value::from(expected_field));
    }

    #[rstest]
    fn page_query_defaults_are_first_page() {
        let request = PageQuery::default().page_request().expect("valid");
        assert_eq!(request.page(), 1);
        assert_eq!(request.per_page(), pagination::DEFAULT_PER_PAGE);
        assert!(request.search().is_none());
    }
}
