//! Merge availability from either upstream schema into ordered offer groups.

use std::collections::{HashMap, HashSet};
use tracing::debug;
use wtw_models::movie::image_url;
use wtw_models::{FlatSource, GroupedAvailability, OfferType, ProviderGroup, ProviderOffer, ProviderSource};

/// Regions tried, in order, when the preferred one has no data
pub const FALLBACK_REGIONS: [&str; 4] = ["US", "GB", "CA", "AU"];

/// Provider logos are always rendered small
pub const LOGO_SIZE: &str = "w45";

/// Groups in fixed offer-type order; a type with no offers is omitted.
pub fn aggregate(source: &ProviderSource, preferred_region: &str) -> Vec<ProviderGroup> {
    match source {
        ProviderSource::Grouped(grouped) => aggregate_grouped(grouped, preferred_region),
        ProviderSource::Flat(sources) => aggregate_flat(sources, preferred_region),
    }
}

fn region_priority(preferred_region: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(preferred_region.trim().to_uppercase())
        .chain(FALLBACK_REGIONS.iter().map(|r| r.to_string()))
        .filter(|r| !r.is_empty())
}

fn aggregate_grouped(grouped: &GroupedAvailability, preferred_region: &str) -> Vec<ProviderGroup> {
    let Some((code, region)) = region_priority(preferred_region).find_map(|code| {
        let region = grouped.region(&code)?;
        Some((code, region))
    }) else {
        debug!("No grouped availability for {} or any fallback region", preferred_region);
        return Vec::new();
    };
    debug!("Using grouped availability for region {}", code);

    OfferType::ALL
        .into_iter()
        .filter_map(|offer_type| {
            let bucket = region.bucket(offer_type);
            if bucket.is_empty() {
                return None;
            }
            let offers = bucket
                .iter()
                .map(|entry| ProviderOffer {
                    name: entry.provider_name.clone(),
                    logo_path: image_url(&entry.logo_path, LOGO_SIZE),
                    web_url: String::new(),
                    format: String::new(),
                    price: None,
                })
                .collect();
            Some(ProviderGroup { offer_type, offers })
        })
        .collect()
}

fn aggregate_flat(sources: &[FlatSource], preferred_region: &str) -> Vec<ProviderGroup> {
    let typed: Vec<(OfferType, &FlatSource)> = sources
        .iter()
        .filter_map(|source| Some((OfferType::from_source_type(&source.source_type)?, source)))
        .collect();

    let Some(region) = region_priority(preferred_region)
        .find(|code| typed.iter().any(|(_, source)| source.region.eq_ignore_ascii_case(code)))
    else {
        debug!("No flat sources for {} or any fallback region", preferred_region);
        return Vec::new();
    };

    let mut seen: HashSet<(OfferType, &str, &str)> = HashSet::new();
    let mut buckets: HashMap<OfferType, Vec<ProviderOffer>> = HashMap::new();
    for (offer_type, source) in typed {
        if !source.region.eq_ignore_ascii_case(&region) {
            continue;
        }
        if !seen.insert((offer_type, source.display_name(), source.link())) {
            continue;
        }
        buckets.entry(offer_type).or_default().push(ProviderOffer {
            name: source.display_name().to_string(),
            logo_path: String::new(),
            web_url: source.link().to_string(),
            format: source.format.clone(),
            price: source.price,
        });
    }

    OfferType::FLAT
        .into_iter()
        .filter_map(|offer_type| {
            let offers = buckets.remove(&offer_type)?;
            Some(ProviderGroup { offer_type, offers })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wtw_models::{GroupedOffer, RegionOffers};

    fn flat(region: &str, source_type: &str, name: &str, web_url: &str) -> FlatSource {
        FlatSource {
            region: region.to_string(),
            source_type: source_type.to_string(),
            name: name.to_string(),
            web_url: web_url.to_string(),
            ..FlatSource::default()
        }
    }

    fn offer(name: &str, logo: &str) -> GroupedOffer {
        GroupedOffer {
            provider_name: name.to_string(),
            logo_path: logo.to_string(),
        }
    }

    #[test]
    fn test_grouped_falls_back_to_us() {
        let raw = json!({
            "results": {
                "FR": {"flatrate": [{"provider_name": "Canal+", "logo_path": "/c.jpg"}]},
                "US": {"flatrate": [{"provider_name": "Netflix", "logo_path": "/n.jpg"}]}
            }
        });
        let grouped = GroupedAvailability::from_response(&raw).unwrap();
        let groups = aggregate(&ProviderSource::Grouped(grouped), "DE");

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].offer_type, OfferType::Flatrate);
        assert_eq!(groups[0].offers[0].name, "Netflix");
        assert_eq!(groups[0].offers[0].logo_path, "https://image.tmdb.org/t/p/w45/n.jpg");
        assert_eq!(groups[0].offers[0].web_url, "");
        assert_eq!(groups[0].offers[0].price, None);
    }

    #[test]
    fn test_grouped_prefers_requested_region_case_insensitively() {
        let mut grouped = GroupedAvailability::default();
        grouped.insert_region("US", RegionOffers::default().with_bucket(OfferType::Buy, vec![offer("Apple TV", "")]));
        grouped.insert_region("GB", RegionOffers::default().with_bucket(OfferType::Rent, vec![offer("Sky Store", "")]));

        let groups = aggregate(&ProviderSource::Grouped(grouped), "gb");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].offer_type, OfferType::Rent);
        assert_eq!(groups[0].offers[0].name, "Sky Store");
        assert_eq!(groups[0].offers[0].logo_path, "");
    }

    #[test]
    fn test_grouped_bucket_order_and_empty_buckets() {
        let mut grouped = GroupedAvailability::default();
        grouped.insert_region(
            "US",
            RegionOffers::default()
                .with_bucket(OfferType::Buy, vec![offer("Apple TV", "/a.jpg")])
                .with_bucket(OfferType::Free, vec![])
                .with_bucket(OfferType::Ads, vec![offer("Tubi", "/t.jpg"), offer("Pluto", "/p.jpg")])
                .with_bucket(OfferType::Flatrate, vec![offer("Max", "/m.jpg")]),
        );

        let groups = aggregate(&ProviderSource::Grouped(grouped), "US");
        let types: Vec<OfferType> = groups.iter().map(|g| g.offer_type).collect();
        assert_eq!(types, vec![OfferType::Flatrate, OfferType::Ads, OfferType::Buy]);
        let ads: Vec<&str> = groups[1].offers.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(ads, vec!["Tubi", "Pluto"]);
    }

    #[test]
    fn test_grouped_without_any_known_region() {
        let mut grouped = GroupedAvailability::default();
        grouped.insert_region("JP", RegionOffers::default().with_bucket(OfferType::Buy, vec![offer("U-Next", "")]));
        assert!(aggregate(&ProviderSource::Grouped(grouped), "DE").is_empty());
    }

    #[test]
    fn test_flat_maps_types_and_dedups() {
        let sources = vec![
            flat("US", "sub", "Netflix", "https://netflix.com/1"),
            flat("US", "purchase", "iTunes", "https://itunes.com/1"),
            flat("US", "SUB", "Netflix", "https://netflix.com/1"),
        ];
        let groups = aggregate(&ProviderSource::Flat(sources), "US");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].offer_type, OfferType::Flatrate);
        assert_eq!(groups[0].offers.len(), 1);
        assert_eq!(groups[1].offer_type, OfferType::Buy);
        assert_eq!(groups[1].offers[0].name, "iTunes");
    }

    #[test]
    fn test_flat_same_name_different_link_kept() {
        let sources = vec![
            flat("US", "rent", "Amazon", "https://amazon.com/hd"),
            flat("US", "rent", "Amazon", "https://amazon.com/4k"),
            flat("US", "buy", "Amazon", "https://amazon.com/hd"),
        ];
        let groups = aggregate(&ProviderSource::Flat(sources), "US");
        assert_eq!(groups[0].offer_type, OfferType::Rent);
        assert_eq!(groups[0].offers.len(), 2);
        assert_eq!(groups[1].offer_type, OfferType::Buy);
    }

    #[test]
    fn test_flat_dedup_uses_resolved_link() {
        let mut a = flat("US", "rent", "Vudu", "");
        a.ios_url = "vudu://1".to_string();
        let mut b = flat("US", "rent", "Vudu", "");
        b.android_url = "vudu://1".to_string();
        let groups = aggregate(&ProviderSource::Flat(vec![a, b]), "US");
        assert_eq!(groups[0].offers.len(), 1);
        assert_eq!(groups[0].offers[0].web_url, "vudu://1");
    }

    #[test]
    fn test_flat_offer_keeps_app_link_without_web_url() {
        let mut only_ios = flat("US", "sub", "Netflix", "");
        only_ios.ios_url = "nflx://title/1".to_string();
        let mut web_first = flat("US", "rent", "Apple TV", "https://tv.apple.com/m/1");
        web_first.android_url = "appletv://m/1".to_string();
        let groups = aggregate(&ProviderSource::Flat(vec![only_ios, web_first]), "US");
        assert_eq!(groups[0].offer_type, OfferType::Flatrate);
        assert_eq!(groups[0].offers[0].web_url, "nflx://title/1");
        assert_eq!(groups[1].offers[0].web_url, "https://tv.apple.com/m/1");
    }

    #[test]
    fn test_flat_region_fallback_order() {
        let sources = vec![
            flat("AU", "sub", "Stan", ""),
            flat("ca", "sub", "Crave", ""),
            flat("FR", "sub", "Canal+", ""),
        ];
        let groups = aggregate(&ProviderSource::Flat(sources), "DE");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].offers[0].name, "Crave");
    }

    #[test]
    fn test_flat_no_matching_region_is_empty() {
        let sources = vec![flat("FR", "sub", "Canal+", ""), flat("JP", "buy", "U-Next", "")];
        assert!(aggregate(&ProviderSource::Flat(sources), "DE").is_empty());
    }

    #[test]
    fn test_flat_unrecognized_types_dropped_before_region_choice() {
        let sources = vec![
            flat("DE", "tve", "ARD", ""),
            flat("US", "free", "Tubi", "https://tubi.tv/1"),
        ];
        let groups = aggregate(&ProviderSource::Flat(sources), "DE");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].offer_type, OfferType::Free);
        assert_eq!(groups[0].offers[0].name, "Tubi");
    }

    #[test]
    fn test_flat_passes_through_format_and_price() {
        let mut source = flat("US", "rent", "", "https://store/1");
        source.format = "4K".to_string();
        source.price = Some(5.99);
        let groups = aggregate(&ProviderSource::Flat(vec![source]), "US");
        let offer = &groups[0].offers[0];
        assert_eq!(offer.name, "Unknown");
        assert_eq!(offer.format, "4K");
        assert_eq!(offer.price, Some(5.99));
        assert_eq!(offer.logo_path, "");
    }

    #[test]
    fn test_flat_never_produces_ads() {
        let sources = vec![
            flat("US", "buy", "A", ""),
            flat("US", "rent", "B", ""),
            flat("US", "free", "C", ""),
            flat("US", "sub", "D", ""),
        ];
        let types: Vec<OfferType> = aggregate(&ProviderSource::Flat(sources), "US")
            .iter()
            .map(|g| g.offer_type)
            .collect();
        assert_eq!(types, OfferType::FLAT.to_vec());
    }
}
