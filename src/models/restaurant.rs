use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Structured restaurant details extracted from a model response.
///
/// Every field is required and must be a string; a response that leaves one
/// out (or sends `null`) is rejected rather than partially filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantDetail {
    pub phone: String,
    pub address: String,
    pub summary: String,
    pub moods: String,
    pub highlight: String,
    pub rating: String,
    pub hours: String,
    pub price: String,
    pub popular_items: String,
}

/// A restaurant the model picked for a mood and location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredRestaurant {
    pub name: String,
    #[serde(flatten)]
    pub detail: RestaurantDetail,
}

/// Types that can describe their JSON shape to a language model
pub trait OutputSchema {
    fn json_schema() -> Value;
}

fn string_property(description: &str) -> Value {
    json!({ "description": description, "type": "string" })
}

fn detail_properties() -> serde_json::Map<String, Value> {
    let mut properties = serde_json::Map::new();
    properties.insert("phone".into(), string_property("Restaurant phone number"));
    properties.insert("address".into(), string_property("Restaurant street address"));
    properties.insert("summary".into(), string_property("Brief description of the restaurant"));
    properties.insert("moods".into(), string_property("Moods the restaurant fits"));
    properties.insert("highlight".into(), string_property("Key highlight or specialty"));
    properties.insert("rating".into(), string_property("Rating information"));
    properties.insert("hours".into(), string_property("Opening hours"));
    properties.insert("price".into(), string_property("Price range"));
    properties.insert("popular_items".into(), string_property("Popular menu items"));
    properties
}

const DETAIL_FIELDS: [&str; 9] = [
    "phone",
    "address",
    "summary",
    "moods",
    "highlight",
    "rating",
    "hours",
    "price",
    "popular_items",
];

impl OutputSchema for RestaurantDetail {
    fn json_schema() -> Value {
        json!({
            "properties": detail_properties(),
            "required": DETAIL_FIELDS,
        })
    }
}

impl OutputSchema for DiscoveredRestaurant {
    fn json_schema() -> Value {
        let mut properties = serde_json::Map::new();
        properties.insert("name".into(), string_property("Restaurant name"));
        properties.extend(detail_properties());

        let mut required = vec!["name"];
        required.extend(DETAIL_FIELDS);

        json!({
            "properties": properties,
            "required": required,
        })
    }
}
