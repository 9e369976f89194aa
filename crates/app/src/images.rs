//! Property images.
//!
//! Properties store an object key; listings carry a URL built from it. A key
//! that cannot be resolved means "no image", never a failed request.

use mockall::automock;
use realty::properties::Property;
use thiserror::Error;
use tracing::warn;
use url::Url;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image endpoint is not a valid base URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("image endpoint `{0}` cannot carry a path")]
    OpaqueEndpoint(String),

    #[error("image bucket name cannot be empty")]
    EmptyBucket,

    #[error("image key `{0}` is not a valid object path")]
    InvalidKey(String),
}

#[automock]
pub trait ImageUrlResolver: Send + Sync {
    /// URL where the object stored under `key` can be fetched.
    fn resolve(&self, key: &str) -> Result<Url, ImageError>;
}

/// Resolves keys to `{endpoint}/{bucket}/{key}`.
#[derive(Debug, Clone)]
pub struct BucketUrlResolver {
    base: Url,
}

impl BucketUrlResolver {
    /// # Errors
    ///
    /// Returns an error when the endpoint is not an absolute http(s)-style URL
    /// or the bucket name is blank.
    pub fn new(endpoint: &str, bucket: &str) -> Result<Self, ImageError> {
        let bucket = bucket.trim().trim_matches('/');

        if bucket.is_empty() {
            return Err(ImageError::EmptyBucket);
        }

        let mut base = Url::parse(endpoint)?;

        base.path_segments_mut()
            .map_err(|()| ImageError::OpaqueEndpoint(endpoint.to_string()))?
            .pop_if_empty()
            .push(bucket);

        Ok(Self { base })
    }
}

impl ImageUrlResolver for BucketUrlResolver {
    fn resolve(&self, key: &str) -> Result<Url, ImageError> {
        let segments: Vec<&str> = key.trim_start_matches('/').split('/').collect();

        let valid = segments
            .iter()
            .all(|segment| !segment.is_empty() && *segment != "." && *segment != "..");

        if !valid {
            return Err(ImageError::InvalidKey(key.to_string()));
        }

        let mut url = self.base.clone();

        url.path_segments_mut()
            .map_err(|()| ImageError::InvalidKey(key.to_string()))?
            .extend(segments);

        Ok(url)
    }
}

/// The image URL for `property`, if it has one and it resolves.
pub fn image_url(resolver: Option<&dyn ImageUrlResolver>, property: &Property) -> Option<String> {
    let resolver = resolver?;
    let key = property.image_key.as_deref()?;

    match resolver.resolve(key) {
        Ok(url) => Some(url.into()),
        Err(error) => {
            warn!(property = %property.uuid, key, %error, "image unavailable");

            None
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn joins_endpoint_bucket_and_key() -> TestResult {
        let resolver = BucketUrlResolver::new("http://localhost:9000/", "properties")?;

        let url = resolver.resolve("flats/tverskaya 15.jpg")?;

        assert_eq!(
            url.as_str(),
            "http://localhost:9000/properties/flats/tverskaya%2015.jpg"
        );

        Ok(())
    }

    #[test]
    fn keys_cannot_escape_the_bucket() -> TestResult {
        let resolver = BucketUrlResolver::new("https://cdn.example.com/media", "properties")?;

        for key in ["", "../secret.jpg", "a//b.jpg"] {
            let result = resolver.resolve(key);

            assert!(
                matches!(result, Err(ImageError::InvalidKey(_))),
                "expected InvalidKey for {key:?}, got {result:?}"
            );
        }

        Ok(())
    }

    #[test]
    fn blank_bucket_is_rejected() {
        let result = BucketUrlResolver::new("http://localhost:9000", " / ");

        assert!(
            matches!(result, Err(ImageError::EmptyBucket)),
            "expected EmptyBucket, got {result:?}"
        );
    }
}
