//! Tri-state result of fetching a single object by ID.

use crate::Error;

#[cfg(test)]
#[path = "lookup_tests.rs"]
mod tests;

/// Outcome of a `GET` for one object.
///
/// A 404 is an expected answer when asking whether something still exists, so it gets its
/// own variant instead of hiding inside [`Error::NotFound`]. Any other failure is carried in
/// [`Lookup::Error`].
///
/// # Examples
///
/// ```rust
/// use gitlab_client::{Error, Lookup};
///
/// let gone: Lookup<u64> = Lookup::from_result(Err(Error::NotFound));
/// assert!(matches!(gone, Lookup::NotFound));
///
/// let found = Lookup::from_result(Ok::<_, Error>(7_u64));
/// assert!(matches!(found, Lookup::Found(7)));
/// ```
#[derive(Debug)]
pub enum Lookup<T> {
    /// The object exists and was returned by GitLab
    Found(T),
    /// GitLab answered 404
    NotFound,
    /// Any other failure
    Error(Error),
}

impl<T> Lookup<T> {
    /// Classifies a client result, turning `Error::NotFound` into [`Lookup::NotFound`].
    pub fn from_result(result: Result<T, Error>) -> Self {
        match result {
            Ok(value) => Lookup::Found(value),
            Err(Error::NotFound) => Lookup::NotFound,
            Err(e) => Lookup::Error(e),
        }
    }
}
