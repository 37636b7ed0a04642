//! Static travel overview data, keyed by exact country name.

use std::collections::HashMap;

use crate::constants::NO_COUNTRY_DATA;

#[derive(Debug, Clone, PartialEq)]
pub struct CountryOverview {
    pub weather: &'static str,
    pub clothing: &'static str,
    pub tips: &'static str,
    // carried in the table, not rendered by any report
    #[allow(dead_code)]
    pub sub_regions: HashMap<&'static str, CountryOverview>,
}

impl CountryOverview {
    fn new(weather: &'static str, clothing: &'static str, tips: &'static str) -> Self {
        Self {
            weather,
            clothing,
            tips,
            sub_regions: HashMap::new(),
        }
    }

    fn with_region(mut self, name: &'static str, region: CountryOverview) -> Self {
        self.sub_regions.insert(name, region);
        self
    }

    /// Returned for every country missing from the table
    pub fn unknown() -> Self {
        Self::new(NO_COUNTRY_DATA, NO_COUNTRY_DATA, NO_COUNTRY_DATA)
    }
}

/// Read-only lookup table, built once at startup
#[derive(Debug, Clone)]
pub struct CountryTable {
    entries: HashMap<&'static str, CountryOverview>,
    unknown: CountryOverview,
}

impl CountryTable {
    pub fn new(entries: HashMap<&'static str, CountryOverview>) -> Self {
        Self {
            entries,
            unknown: CountryOverview::unknown(),
        }
    }

    /// Matches case-sensitively; misses fall back to the "no data" overview
    pub fn lookup(&self, country: &str) -> &CountryOverview {
        self.entries.get(country).unwrap_or(&self.unknown)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for CountryTable {
    fn default() -> Self {
        let indonesia = CountryOverview::new(
            "Tropical climate with high humidity. Expect warm temperatures year-round.",
            "Light, breathable clothing is recommended. Bring rain gear during the wet season.",
            "Stay hydrated, use sunscreen, and be prepared for sudden rain showers.",
        )
        .with_region(
            "Bali",
            CountryOverview::new(
                "Warm and humid with occasional rain. Best time to visit is during the dry season (April to October).",
                "Light, casual clothing. Swimwear for beaches and modest attire for temples.",
                "Respect local customs, especially in temples. Be cautious of traffic and tourist scams.",
            ),
        )
        .with_region(
            "Jakarta",
            CountryOverview::new(
                "Hot and humid year-round with frequent rain, especially during the wet season (November to March).",
                "Light, breathable clothing. Bring an umbrella or raincoat.",
                "Prepare for heavy traffic and urban heat. Stay hydrated.",
            ),
        );

        let entries = HashMap::from([
            ("Indonesia", indonesia),
            (
                "Turkey",
                CountryOverview::new(
                    "Varies by region. Coastal areas have a Mediterranean climate, while inland areas have hot summers and cold winters.",
                    "Light clothing for summer, layers for cooler months. Modest attire is recommended for visiting mosques.",
                    "Learn basic Turkish phrases. Be respectful of local customs and traditions.",
                ),
            ),
            (
                "Qatar",
                CountryOverview::new(
                    "Extremely hot summers with mild winters. Rain is rare.",
                    "Light, breathable clothing. Modest attire is required in public places.",
                    "Stay hydrated and avoid outdoor activities during peak heat. Respect local dress codes.",
                ),
            ),
            (
                "India",
                CountryOverview::new(
                    "Diverse climate ranging from tropical in the south to temperate in the north. Monsoon season occurs from June to September.",
                    "Light, breathable clothing for most regions. Layers for cooler areas. Modest attire is recommended.",
                    "Be cautious of food and water hygiene. Learn basic Hindi phrases for easier communication.",
                ),
            ),
            (
                "USA",
                CountryOverview::new(
                    "Varies greatly by region and season. Check the specific state or city for details.",
                    "Depends on the region and season. Layers are often a good choice.",
                    "Plan for diverse climates if traveling across multiple states.",
                ),
            ),
        ]);

        Self::new(entries)
    }
}
