//! Ordered collection of validated search engines.

use thiserror::Error;

use super::descriptor::{Candidate, SearchDescriptor, ValidationError};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("search engine {short_name:?} (#{position}) failed validation: {source}")]
    Invalid {
        short_name: String,
        position: usize,
        #[source]
        source: ValidationError,
    },
}

/// Validate every candidate, stopping at the first failure.
pub fn validate_all(candidates: &[Candidate]) -> Result<(), RegistryError> {
    for (index, candidate) in candidates.iter().enumerate() {
        candidate
            .validate()
            .map_err(|source| RegistryError::Invalid {
                short_name: candidate.descriptor.short_name.clone(),
                position: index + 1,
                source,
            })?;
    }
    Ok(())
}

/// Search engines served by the dispatcher, in display order.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    engines: Vec<SearchDescriptor>,
}

impl Registry {
    /// Validate all candidates and keep them if every one passes.
    ///
    /// A single bad engine rejects the whole set.
    pub fn load(candidates: Vec<Candidate>) -> Result<Self, RegistryError> {
        validate_all(&candidates)?;
        Ok(Self {
            engines: candidates
                .into_iter()
                .map(Candidate::into_descriptor)
                .collect(),
        })
    }

    /// First engine whose short name matches exactly.
    pub fn find_by_short_name(&self, short_name: &str) -> Option<&SearchDescriptor> {
        self.engines.iter().find(|e| e.short_name == short_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchDescriptor> {
        self.engines.iter()
    }

    pub fn engines(&self) -> &[SearchDescriptor] {
        &self.engines
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}
