//! API route paths with per-segment encoding.

use std::fmt;

use reqwest::Url;

use crate::error::{Error, Result};

/// A route below the API base URL, kept as raw (unencoded) segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPath {
    segments: Vec<String>,
}

impl ApiPath {
    /// A `/v1/...` route made of fixed segments.
    pub fn v1<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut all = vec!["v1".to_string()];
        all.extend(segments.into_iter().map(Into::into));
        Self { segments: all }
    }

    /// Appends a caller-supplied identifier as a single segment.
    pub fn join(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolves the path against `base`, encoding each segment on its own so
    /// that identifiers containing `/`, `?` or spaces stay one segment.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::Config(format!("Base URL cannot carry a path: {}", base)))?;
            path.pop_if_empty();
            for segment in &self.segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// The error reported when this route answers 404.
    ///
    /// `/v1/ndc/0069-0151-01` becomes `NDC not found: 0069-0151-01`;
    /// `/v1/icd10/cm/E11.9` becomes `ICD10 not found: cm/E11.9`.
    pub fn not_found(&self) -> Error {
        match self.segments.as_slice() {
            [version, kind, rest @ ..] if version == "v1" && !rest.is_empty() => Error::NotFound {
                code_type: kind.to_uppercase(),
                code: rest.join("/"),
            },
            _ => Error::NotFound {
                code_type: "Resource".to_string(),
                code: self.to_string(),
            },
        }
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let path = ApiPath::v1(["icd10", "cm"]).join("E11.9");
        assert_eq!(path.to_string(), "/v1/icd10/cm/E11.9");
    }

    #[test]
    fn test_url_on_bare_host() {
        let base = Url::parse("https://api.fhirfly.io").unwrap();
        let url = ApiPath::v1(["ndc"]).join("0069-0151-01").url(&base).unwrap();
        assert_eq!(url.as_str(), "https://api.fhirfly.io/v1/ndc/0069-0151-01");
    }

    #[test]
    fn test_url_keeps_base_prefix() {
        let base = Url::parse("http://localhost:8080/api/").unwrap();
        let url = ApiPath::v1(["cvx"]).join("08").url(&base).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/cvx/08");
    }

    #[test]
    fn test_url_encodes_identifier() {
        let base = Url::parse("https://api.fhirfly.io").unwrap();
        let url = ApiPath::v1(["fda-labels"]).join("a/b c?d").url(&base).unwrap();
        assert_eq!(url.path(), "/v1/fda-labels/a%2Fb%20c%3Fd");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_url_rejects_cannot_be_a_base() {
        let base = Url::parse("mailto:someone@example.com").unwrap();
        let result = ApiPath::v1(["ndc"]).url(&base);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_not_found_single_segment_code() {
        let err = ApiPath::v1(["ndc"]).join("0069-0151-01").not_found();
        match err {
            Error::NotFound { code_type, code } => {
                assert_eq!(code_type, "NDC");
                assert_eq!(code, "0069-0151-01");
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_not_found_nested_route() {
        let err = ApiPath::v1(["icd10", "pcs"]).join("0BJ08ZZ").not_found();
        assert_eq!(err.to_string(), "ICD10 not found: pcs/0BJ08ZZ");
    }

    #[test]
    fn test_not_found_without_code() {
        let err = ApiPath::v1(["ndc"]).not_found();
        assert_eq!(err.to_string(), "Resource not found: /v1/ndc");
    }
}
