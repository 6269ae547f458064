use crate::diagnostics::{Warning, WarningSink};
use crate::records::Reporters;
use serde::Serialize;
use std::collections::BTreeMap;

/// Lookup tables derived from the reporter records.
///
/// Rebuilt from source whenever the data changes and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Indices {
    /// Variation -> every edition key it may refer to, in first-seen order.
    variations: BTreeMap<String, Vec<String>>,
    /// Edition key -> series key of the first series that claimed it.
    editions: BTreeMap<String, String>,
    /// Edition key -> `cite_format` of its reporter, when one is declared.
    formats: BTreeMap<String, String>,
    /// Reporter name -> its edition keys, oldest first.
    names: BTreeMap<String, Vec<String>>,
    #[serde(skip)]
    collisions: usize,
}

impl Indices {
    /// Builds all four indices in one pass over `reporters`.
    ///
    /// Series are visited in document order, which decides which series keeps
    /// an edition key claimed twice. Each ignored claim is reported to `sink`.
    pub fn build(reporters: &Reporters, sink: &mut dyn WarningSink) -> Self {
        let mut indices = Indices::default();
        // name -> (start, edition key); sorted once every record is seen.
        let mut dated: BTreeMap<String, Vec<(Option<String>, String)>> = BTreeMap::new();

        for (series_key, records) in reporters.iter() {
            for record in records {
                for (variation, edition) in record.variations.iter() {
                    let candidates = indices.variations.entry(variation.to_string()).or_default();
                    if !candidates.contains(edition) {
                        candidates.push(edition.clone());
                    }
                }

                for edition_key in record.editions.keys() {
                    match indices.editions.get(edition_key) {
                        None => {
                            indices
                                .editions
                                .insert(edition_key.to_string(), series_key.to_string());
                        }
                        Some(owner) if owner != series_key => {
                            indices.collisions += 1;
                            sink.warn(Warning::EditionCollision {
                                edition: edition_key.to_string(),
                                kept: owner.clone(),
                                ignored: series_key.to_string(),
                            });
                        }
                        // The same series listing an edition twice is not a conflict.
                        Some(_) => {}
                    }
                }

                if let Some(format) = record.cite_format.as_deref().filter(|f| !f.is_empty()) {
                    for edition_key in record.editions.keys() {
                        indices
                            .formats
                            .insert(edition_key.to_string(), format.to_string());
                    }
                }

                let group = dated.entry(record.name.clone()).or_default();
                for (edition_key, edition) in record.editions.iter() {
                    if group.iter().all(|(_, key)| key != edition_key) {
                        // ISO-8601 strings order the same way the dates do.
                        let start = edition
                            .start
                            .map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string());
                        group.push((start, edition_key.to_string()));
                    }
                }
            }
        }

        for (name, mut group) in dated {
            // `None` sorts before any date, like an empty-string sentinel.
            group.sort();
            indices
                .names
                .insert(name, group.into_iter().map(|(_, key)| key).collect());
        }

        log::debug!(
            "built indices: {} variations, {} editions, {} formats, {} names",
            indices.variations.len(),
            indices.editions.len(),
            indices.formats.len(),
            indices.names.len()
        );
        indices
    }

    /// Edition keys a variation spelling may stand for.
    pub fn variation_candidates(&self, variation: &str) -> Option<&[String]> {
        self.variations.get(variation).map(Vec::as_slice)
    }

    /// Series key that owns `edition`.
    pub fn series_for_edition(&self, edition: &str) -> Option<&str> {
        self.editions.get(edition).map(String::as_str)
    }

    pub fn cite_format(&self, edition: &str) -> Option<&str> {
        self.formats.get(edition).map(String::as_str)
    }

    /// Edition keys of the reporter called `name`, ordered by start date.
    pub fn editions_for_name(&self, name: &str) -> Option<&[String]> {
        self.names.get(name).map(Vec::as_slice)
    }

    /// Number of edition-key claims ignored because another series had
    /// claimed the key first.
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    pub fn variations(&self) -> &BTreeMap<String, Vec<String>> {
        &self.variations
    }

    pub fn editions(&self) -> &BTreeMap<String, String> {
        &self.editions
    }

    pub fn formats(&self) -> &BTreeMap<String, String> {
        &self.formats
    }

    pub fn names(&self) -> &BTreeMap<String, Vec<String>> {
        &self.names
    }
}
