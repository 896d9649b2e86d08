use serde::Serialize;
use wtw_config::ProviderPolicy;
use wtw_models::{ProviderGroup, SourceKind};

/// What the movie page shows under "Where to watch"
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Availability {
    /// Aggregated groups and the schema they came from; `groups` may be empty
    Groups { kind: SourceKind, groups: Vec<ProviderGroup> },
    Unavailable,
}

impl Availability {
    pub fn groups(&self) -> &[ProviderGroup] {
        match self {
            Availability::Groups { groups, .. } => groups,
            Availability::Unavailable => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups().is_empty()
    }
}

/// Choose between the aggregated flat and grouped results.
///
/// `None` means the source was not configured, failed, or answered without a
/// usable structure. A present result with no groups only wins over
/// `Unavailable`, never over the other schema's non-empty result.
pub fn select_availability(
    flat: Option<Vec<ProviderGroup>>,
    grouped: Option<Vec<ProviderGroup>>,
    policy: ProviderPolicy,
) -> Availability {
    let flat = flat.map(|groups| (SourceKind::Flat, groups));
    let grouped = grouped.map(|groups| (SourceKind::Grouped, groups));

    let chosen = match policy {
        ProviderPolicy::PreferFlat => prefer(flat, grouped),
        ProviderPolicy::PreferGrouped => prefer(grouped, flat),
        ProviderPolicy::FlatOnly => flat.filter(|(_, groups)| !groups.is_empty()),
        ProviderPolicy::GroupedOnly => grouped,
    };

    match chosen {
        Some((kind, groups)) => Availability::Groups { kind, groups },
        None => Availability::Unavailable,
    }
}

type Candidate = Option<(SourceKind, Vec<ProviderGroup>)>;

fn prefer(primary: Candidate, secondary: Candidate) -> Candidate {
    match primary {
        Some(candidate) if !candidate.1.is_empty() => Some(candidate),
        _ => secondary,
    }
}
