//! Taxonomy indexing.
//!
//! Builds the category/tag term index and the slug table from a document
//! set. Pure function of its input: identical documents produce an identical
//! index with a stable iteration order (descending member count, then
//! alphabetical by term value).

use crate::{config::SlugCollision, content::Document, error::BuildError, utils::slug};
use std::collections::BTreeMap;

/// Taxonomy kind: where the term came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TermKind {
    Category,
    Tag,
}

impl TermKind {
    /// URL section for list pages of this kind.
    pub const fn section(self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::Tag => "tags",
        }
    }
}

/// Term index plus slug table for one document set.
///
/// Terms hold back-references (document indices) only; they never own
/// documents. Rebuilt wholesale on every build, so membership can never go
/// stale.
#[derive(Debug, Default)]
pub struct Taxonomy {
    /// (kind, term value) → member document slugs in document order.
    terms: BTreeMap<(TermKind, String), Vec<String>>,

    /// Unique slug → document index.
    by_slug: BTreeMap<String, usize>,
}

impl Taxonomy {
    /// Index the given documents.
    ///
    /// Slug uniqueness is enforced here. Under [`SlugCollision::Error`] a
    /// duplicate slug fails the build; under [`SlugCollision::Suffix`] later
    /// documents (in document order) get `-2`, `-3`, ... suffixes written
    /// back into the document.
    pub fn build(documents: &mut [Document], policy: SlugCollision) -> Result<Self, BuildError> {
        let mut index = Self::default();

        for i in 0..documents.len() {
            let current = documents[i].slug.clone();
            match index.by_slug.get(&current) {
                None => {
                    index.by_slug.insert(current, i);
                }
                Some(&first) if policy == SlugCollision::Error => {
                    return Err(BuildError::RouteCollision {
                        url: format!("/{current}/"),
                        first: documents[first].path.clone(),
                        second: documents[i].path.clone(),
                    });
                }
                Some(_) => {
                    let mut n = 2;
                    let mut candidate = slug::with_suffix(&current, n);
                    while index.by_slug.contains_key(&candidate) {
                        n += 1;
                        candidate = slug::with_suffix(&current, n);
                    }
                    documents[i].slug = candidate.clone();
                    index.by_slug.insert(candidate, i);
                }
            }
        }

        for doc in documents.iter() {
            for value in &doc.categories {
                index.insert_term(TermKind::Category, value, &doc.slug);
            }
            for value in &doc.tags {
                index.insert_term(TermKind::Tag, value, &doc.slug);
            }
        }

        Ok(index)
    }

    /// Record one membership, ignoring duplicate terms within a document.
    fn insert_term(&mut self, kind: TermKind, value: &str, slug: &str) {
        let members = self
            .terms
            .entry((kind, value.to_string()))
            .or_default();
        if members.last().map(String::as_str) != Some(slug) {
            members.push(slug.to_string());
        }
    }

    /// Member document slugs carrying the given term, in document order.
    pub fn members(&self, kind: TermKind, value: &str) -> &[String] {
        self.terms
            .get(&(kind, value.to_string()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All terms of a kind, descending by member count, then alphabetical.
    pub fn terms(&self, kind: TermKind) -> Vec<(&str, &[String])> {
        let mut terms: Vec<(&str, &[String])> = self
            .terms
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|((_, value), members)| (value.as_str(), members.as_slice()))
            .collect();
        terms.sort_by(|(va, ma), (vb, mb)| mb.len().cmp(&ma.len()).then(va.cmp(vb)));
        terms
    }

    /// Look up a document index by its unique slug.
    pub fn doc_by_slug(&self, slug: &str) -> Option<usize> {
        self.by_slug.get(slug).copied()
    }
}
