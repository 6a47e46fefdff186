use serde::{Serialize, Serializer};

use crate::errors::{CoreError, ErrorKind};

/// Why an optional report section could not be produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unavailable {
    pub kind: ErrorKind,
    pub reason: String,
}

impl Unavailable {
    pub fn new(kind: ErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    pub fn missing(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingRequiredInput, reason)
    }
}

impl From<&CoreError> for Unavailable {
    fn from(e: &CoreError) -> Self {
        Self::new(e.kind(), e.to_string())
    }
}

impl From<CoreError> for Unavailable {
    fn from(e: CoreError) -> Self {
        Self::from(&e)
    }
}

/// Outcome of an optional report section.
///
/// Serializes as the inner value when present and as `null` otherwise, so the
/// JSON shape is that of a nullable field. The reason stays inspectable in Rust.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Present(T),
    Unavailable(Unavailable),
}

impl<T> Section<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Section::Present(_))
    }

    pub fn present(&self) -> Option<&T> {
        match self {
            Section::Present(v) => Some(v),
            Section::Unavailable(_) => None,
        }
    }

    pub fn into_present(self) -> Option<T> {
        match self {
            Section::Present(v) => Some(v),
            Section::Unavailable(_) => None,
        }
    }

    pub fn unavailable(&self) -> Option<&Unavailable> {
        match self {
            Section::Present(_) => None,
            Section::Unavailable(u) => Some(u),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Section<U> {
        match self {
            Section::Present(v) => Section::Present(f(v)),
            Section::Unavailable(u) => Section::Unavailable(u),
        }
    }

    pub fn as_ref(&self) -> Section<&T> {
        match self {
            Section::Present(v) => Section::Present(v),
            Section::Unavailable(u) => Section::Unavailable(u.clone()),
        }
    }
}

impl<T> From<Result<T, CoreError>> for Section<T> {
    fn from(result: Result<T, CoreError>) -> Self {
        match result {
            Ok(v) => Section::Present(v),
            Err(e) => Section::Unavailable(e.into()),
        }
    }
}

impl<T: Serialize> Serialize for Section<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Section::Present(v) => v.serialize(serializer),
            Section::Unavailable(_) => serializer.serialize_none(),
        }
    }
}
