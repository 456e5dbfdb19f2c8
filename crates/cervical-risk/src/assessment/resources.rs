use serde::Serialize;

/// Outbound link shown after an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpResource {
    pub title: String,
    pub url: String,
}

impl HelpResource {
    fn fixed(title: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
        }
    }
}

const MAP_SEARCH_BASE: &str = "https://www.google.com/maps/search/";

/// Fixed help links, optionally followed by a gynecologist search near `location`.
pub fn help_resources(location: Option<&str>) -> Vec<HelpResource> {
    let mut resources = vec![
        HelpResource::fixed(
            "Search Nearby Gynecologists on Google Maps",
            "https://www.google.com/maps/search/gynecologist+near+me",
        ),
        HelpResource::fixed(
            "Search Hospitals Near You",
            "https://www.google.com/maps/search/hospitals+near+me",
        ),
        HelpResource::fixed(
            "WHO Cervical Cancer Info",
            "https://www.who.int/health-topics/cervical-cancer",
        ),
        HelpResource::fixed(
            "CDC Cervical Cancer Resources",
            "https://www.cdc.gov/cancer/cervical/",
        ),
        HelpResource::fixed(
            "National Cancer Institute - Cervical Cancer",
            "https://www.cancer.gov/types/cervical",
        ),
    ];

    if let Some(resource) = location.and_then(nearby_gynecologists) {
        resources.push(resource);
    }

    resources
}

/// Map search for gynecologists in `location`. Blank locations yield nothing.
pub fn nearby_gynecologists(location: &str) -> Option<HelpResource> {
    let location = location.trim();
    if location.is_empty() {
        return None;
    }

    Some(HelpResource {
        title: format!("Find gynecologists near {location}"),
        url: format!(
            "{MAP_SEARCH_BASE}gynecologist+in+{}",
            location.replace(' ', "+")
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_links_are_always_present() {
        let resources = help_resources(None);
        assert_eq!(resources.len(), 5);
        assert_eq!(
            resources[2].url,
            "https://www.who.int/health-topics/cervical-cancer"
        );
    }

    #[test]
    fn location_link_replaces_spaces() {
        let resources = help_resources(Some("New Delhi"));
        let last = resources.last().expect("location link");

        assert_eq!(resources.len(), 6);
        assert_eq!(
            last.url,
            "https://www.google.com/maps/search/gynecologist+in+New+Delhi"
        );
        assert_eq!(last.title, "Find gynecologists near New Delhi");
    }

    #[test]
    fn blank_location_adds_nothing() {
        assert_eq!(help_resources(Some("   ")).len(), 5);
        assert!(nearby_gynecologists("").is_none());
    }
}
