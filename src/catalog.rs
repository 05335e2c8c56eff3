//! @dose
//! purpose: Static catalog of supported AWS regions and the CloudFormation resource
//!     specification endpoint for each of them. The configuration wizard presents the
//!     catalog by index and copies the URL table into every configuration record.
//!
//! when-editing:
//!     - !Adding a region means adding it to BUILTIN_REGIONS and SPECIFICATION_URLS
//!     - Order of BUILTIN_REGIONS is user-visible (wizard indices)
//!
//! invariants:
//!     - Region codes in a catalog are unique
//!     - Every catalogued region has a specification URL
//!
//! gotchas:
//!     - Catalog construction is checked at runtime, not at compile time; builtin() fails
//!       fast if the static tables drift apart

use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Regions offered by the wizard, in display order.
pub const BUILTIN_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "ca-central-1",
    "eu-central-1",
    "eu-west-1",
    "eu-west-2",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-south-1",
    "sa-east-1",
];

/// Region code -> resource specification endpoint
pub static SPECIFICATION_URLS: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        ("us-east-2", "https://dnwj8swjjbsbt.cloudfront.net"),
        ("us-east-1", "https://d1uauaxba7bl26.cloudfront.net"),
        ("us-west-1", "https://d68hl49wbnanq.cloudfront.net"),
        ("us-west-2", "https://d201a2mn26r7lk.cloudfront.net"),
        ("ap-south-1", "https://d2senuesg1djtx.cloudfront.net"),
        ("ap-northeast-2", "https://d1ane3fvebulky.cloudfront.net"),
        ("ap-southeast-1", "https://doigdx0kgq9el.cloudfront.net"),
        ("ap-southeast-2", "https://d2stg8d246z9di.cloudfront.net"),
        ("ap-northeast-1", "https://d33vqc0rt9ld30.cloudfront.net"),
        ("ca-central-1", "https://d2s8ygphhesbe7.cloudfront.net"),
        ("eu-central-1", "https://d1mta8qj7i28i2.cloudfront.net"),
        ("eu-west-1", "https://d3teyb21fexa9r.cloudfront.net"),
        ("eu-west-2", "https://d1742qcu2c1ncx.cloudfront.net"),
        ("sa-east-1", "https://d3c9jyj3w509b0.cloudfront.net"),
    ])
});

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Region catalog is empty")]
    Empty,
    #[error("Region {0} appears more than once in the catalog")]
    DuplicateRegion(String),
    #[error("Region {0} has no resource specification URL")]
    MissingSpecificationUrl(String),
}

/// One catalogued region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionEntry {
    pub code: String,
    pub specification_url: String,
}

/// Ordered, duplicate-free list of regions
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    entries: Vec<RegionEntry>,
}

impl RegionCatalog {
    /// Build a catalog from region codes, resolving each URL from `urls`.
    pub fn new<'a, I>(codes: I, urls: &BTreeMap<&str, &str>) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for code in codes {
            if !seen.insert(code) {
                return Err(CatalogError::DuplicateRegion(code.to_string()));
            }
            let url = urls
                .get(code)
                .ok_or_else(|| CatalogError::MissingSpecificationUrl(code.to_string()))?;
            entries.push(RegionEntry {
                code: code.to_string(),
                specification_url: url.to_string(),
            });
        }

        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(Self { entries })
    }

    /// The catalog shipped with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(BUILTIN_REGIONS.iter().copied(), &SPECIFICATION_URLS)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a region by its 0-based display index
    pub fn get(&self, index: usize) -> Option<&RegionEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionEntry> {
        self.entries.iter()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.iter().any(|e| e.code == code)
    }

    /// Region code -> specification URL for every catalogued region
    pub fn specification_urls(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|e| (e.code.clone(), e.specification_url.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_consistent() {
        let catalog = RegionCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), BUILTIN_REGIONS.len());
        assert_eq!(catalog.get(0).unwrap().code, "us-east-1");
        assert_eq!(catalog.get(1).unwrap().code, "us-east-2");
        assert!(catalog.get(catalog.len()).is_none());
    }

    #[test]
    fn test_every_url_is_catalogued() {
        let catalog = RegionCatalog::builtin().unwrap();
        for region in SPECIFICATION_URLS.keys() {
            assert!(catalog.contains(region), "{} missing from catalog", region);
        }
        assert_eq!(catalog.specification_urls().len(), SPECIFICATION_URLS.len());
    }

    #[test]
    fn test_duplicate_region_rejected() {
        let err = RegionCatalog::new(
            ["us-east-1", "ca-central-1", "ca-central-1"],
            &SPECIFICATION_URLS,
        )
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateRegion("ca-central-1".to_string()));
    }

    #[test]
    fn test_missing_url_rejected() {
        let err = RegionCatalog::new(["us-east-1", "mars-north-1"], &SPECIFICATION_URLS)
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::MissingSpecificationUrl("mars-north-1".to_string())
        );
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = RegionCatalog::new(std::iter::empty(), &SPECIFICATION_URLS).unwrap_err();
        assert_eq!(err, CatalogError::Empty);
    }
}
