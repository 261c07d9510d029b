//! Report generation: parse → normalize → filter → accumulate → sort.

use std::collections::BTreeMap;
use std::path::Path;

use crate::accumulate::Accumulator;
use crate::error::Result;
use crate::exclude::ExclusionFilter;
use crate::model::{Profile, Report};
use crate::normalize::normalize_name;
use crate::parsers::gocover;
use crate::sort::{sort_summaries, Order, SortBy};

/// Name of the grand-total row.
pub const TOTAL_NAME: &str = "Total";

/// Fully resolved settings for one report generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Path prefix stripped from every display name.
    pub root: String,
    /// Glob patterns matched against display names.
    pub exclusions: Vec<String>,
    pub sort_by: SortBy,
    pub order: Order,
    /// Group by containing directory instead of by file.
    pub group_by_package: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            root: String::new(),
            exclusions: Vec::new(),
            sort_by: SortBy::default(),
            order: Order::default(),
            group_by_package: true,
        }
    }
}

impl Configuration {
    /// Build a configuration from the string form of the sort settings,
    /// rejecting unknown sort columns and directions.
    pub fn from_strings(
        root: impl Into<String>,
        exclusions: Vec<String>,
        sort_by: &str,
        order: &str,
        group_by_package: bool,
    ) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            exclusions,
            sort_by: sort_by.parse()?,
            order: order.parse()?,
            group_by_package,
        })
    }
}

/// Generate a report from the coverage profile at `path`.
pub fn generate_report(path: &Path, conf: &Configuration) -> Result<Report> {
    let profiles = gocover::parse_file(path)?;
    build_report(&profiles, conf)
}

/// Generate a report from in-memory coverage profile bytes.
pub fn generate_report_from_bytes(input: &[u8], conf: &Configuration) -> Result<Report> {
    let profiles = gocover::parse(input)?;
    build_report(&profiles, conf)
}

/// Fold already-parsed profiles into a sorted [`Report`].
///
/// Profiles whose display name is excluded contribute to neither their own
/// entry nor the total. Entries enter the sort in name order, so tied keys
/// come out in name order too.
pub fn build_report(profiles: &[Profile], conf: &Configuration) -> Result<Report> {
    let filter = ExclusionFilter::new(&conf.exclusions)?;

    let mut total = Accumulator::new(TOTAL_NAME);
    let mut entities: BTreeMap<String, Accumulator> = BTreeMap::new();
    for profile in profiles {
        let name = normalize_name(&profile.file_name, &conf.root, conf.group_by_package);
        if filter.is_excluded(&name) {
            continue;
        }
        total.add_all(&profile.blocks);
        entities
            .entry(name)
            .or_insert_with_key(|name| Accumulator::new(name.as_str()))
            .add_all(&profile.blocks);
    }

    let mut entries: Vec<_> = entities.values().map(Accumulator::finalize).collect();
    sort_summaries(&mut entries, conf.sort_by, conf.order);

    Ok(Report {
        total: total.finalize(),
        entries,
    })
}
