use super::{SourceError, Transport};
use cnpj2parquet_core::DatasetType;
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;
use tracing::{info, warn};
use url::Url;

/// One downloadable archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    pub url: String,
    /// Text after the last `/` of the URL
    pub filename: String,
    /// `None` for archives of tables the pipeline does not read
    pub dataset: Option<DatasetType>,
}

impl SourceLink {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let filename = url.rsplit('/').next().unwrap_or_default().to_string();
        let dataset = DatasetType::from_filename(&filename);
        Self {
            url,
            filename,
            dataset,
        }
    }
}

/// Collect every `.zip` link of an index page, in page order.
///
/// Absolute `http(s)` links are kept as they are; anything else is resolved
/// against `base_url`.
pub fn parse_links(html: &str, base_url: &Url) -> Vec<SourceLink> {
    let document = Html::parse_document(html);

    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "a")
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| href.ends_with(".zip"))
        .filter_map(|href| {
            if href.starts_with("http://") || href.starts_with("https://") {
                return Some(SourceLink::new(href));
            }
            match base_url.join(href) {
                Ok(url) => Some(SourceLink::new(url.as_str())),
                Err(err) => {
                    warn!(href = %href, error = %err, "Skipping unresolvable link");
                    None
                }
            }
        })
        .collect()
}

/// Archive links grouped by dataset, each group in page order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceIndex {
    groups: BTreeMap<DatasetType, Vec<SourceLink>>,
}

impl SourceIndex {
    /// Fetch and parse the index page published at `base_url`.
    pub fn discover<T: Transport>(transport: &T, base_url: &str) -> Result<Self, SourceError> {
        let base = Url::parse(base_url).map_err(|source| SourceError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        info!("Fetching the archive index from {}", base);
        let html = transport.get_text(base.as_str())?;
        let index = Self::from_links(parse_links(&html, &base));

        for (dataset, links) in &index.groups {
            info!("Found {} archive(s) for {}", links.len(), dataset);
        }
        Ok(index)
    }

    pub fn from_links(links: Vec<SourceLink>) -> Self {
        Self {
            groups: Self::group_by_type(links),
        }
    }

    /// Group links by dataset. Links of no known dataset are dropped.
    pub fn group_by_type(links: Vec<SourceLink>) -> BTreeMap<DatasetType, Vec<SourceLink>> {
        let mut groups: BTreeMap<DatasetType, Vec<SourceLink>> = BTreeMap::new();
        for link in links {
            if let Some(dataset) = link.dataset {
                groups.entry(dataset).or_default().push(link);
            }
        }
        groups
    }

    pub fn links(&self, dataset: DatasetType) -> &[SourceLink] {
        self.groups.get(&dataset).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn part_count(&self, dataset: DatasetType) -> usize {
        self.links(dataset).len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DatasetType, &[SourceLink])> {
        self.groups
            .iter()
            .map(|(dataset, links)| (*dataset, links.as_slice()))
    }

    /// Link of the zero-based `part` of `dataset`.
    pub fn resolve(&self, dataset: DatasetType, part: i64) -> Result<&SourceLink, SourceError> {
        if part < 0 {
            return Err(SourceError::NegativePart(part));
        }

        let links = self.links(dataset);
        usize::try_from(part)
            .ok()
            .and_then(|index| links.get(index))
            .ok_or(SourceError::PartOutOfRange {
                dataset,
                part,
                available: links.len(),
            })
    }
}
