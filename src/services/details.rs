/// Restaurant detail generation
///
/// Two prompt modes share one model:
/// - identity mode describes a restaurant we already picked from the dataset
/// - discovery mode asks the model to pick one for a mood and location
///
/// Both ask for JSON matching a fixed schema and reject anything that does
/// not parse into it. The emoji layout shown to users is built locally by
/// [`format_restaurant_details`], never requested from the model.
use std::sync::Arc;

use rand::Rng;
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{DiscoveredRestaurant, OutputSchema, RestaurantDetail},
    services::providers::LanguageModel,
};

/// Temperature for describing a known restaurant
pub const DETAIL_TEMPERATURE: f32 = 0.3;

/// Temperature for inventing a restaurant
pub const DISCOVERY_TEMPERATURE: f32 = 0.9;

#[derive(Clone)]
pub struct DetailGenerator {
    model: Arc<dyn LanguageModel>,
}

impl DetailGenerator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Identity mode: details for a named restaurant at a known address
    pub async fn describe(
        &self,
        name: &str,
        city: &str,
        street: &str,
    ) -> AppResult<RestaurantDetail> {
        let prompt = identity_prompt(name, city, street);

        tracing::info!(
            restaurant = %name,
            city = %city,
            provider = self.model.name(),
            "Requesting restaurant details"
        );

        let raw = self.model.generate(&prompt, DETAIL_TEMPERATURE).await?;
        parse_structured(&raw)
    }

    /// Discovery mode: the model picks a well-rated restaurant for the mood.
    ///
    /// A random seed goes into the prompt so repeated calls for the same mood
    /// and location do not keep landing on the same place.
    pub async fn discover(&self, mood: &str, location: &str) -> AppResult<DiscoveredRestaurant> {
        let seed = rand::thread_rng().gen_range(1..=9999);
        let prompt = discovery_prompt(mood, location, seed);

        tracing::info!(
            mood = %mood,
            location = %location,
            seed = seed,
            provider = self.model.name(),
            "Requesting restaurant discovery"
        );

        let raw = self.model.generate(&prompt, DISCOVERY_TEMPERATURE).await?;
        parse_structured(&raw)
    }
}

/// Instructions telling the model to answer with JSON matching `T`
pub fn format_instructions<T: OutputSchema>() -> String {
    format!(
        "The output should be formatted as a JSON instance that conforms to the JSON schema below.\n\
         \n\
         As an example, for the schema {{\"properties\": {{\"foo\": {{\"description\": \"a list of strings\", \"type\": \"array\", \"items\": {{\"type\": \"string\"}}}}}}, \"required\": [\"foo\"]}}\n\
         the object {{\"foo\": [\"bar\", \"baz\"]}} is a well-formatted instance of the schema. \
         The object {{\"properties\": {{\"foo\": [\"bar\", \"baz\"]}}}} is not well-formatted.\n\
         \n\
         Here is the output schema:\n\
         ```\n\
         {}\n\
         ```",
        T::json_schema()
    )
}

fn expert_prompt(question: &str) -> String {
    format!(
        "You are a world famous restaurant expert. Answer the question about the \
         restaurant accurately and concisely. Every value in your answer must be a \
         plain string. If a detail is unknown, give your best estimate instead of \
         leaving it out.\n\
         \n\
         Question: {}\n\
         Answer:",
        question
    )
}

fn identity_prompt(name: &str, city: &str, street: &str) -> String {
    let query = format!(
        "Give me the details of {} in {} on {}\n\n{}",
        name,
        city,
        street,
        format_instructions::<RestaurantDetail>()
    );
    expert_prompt(&query)
}

fn discovery_prompt(mood: &str, location: &str, seed: u32) -> String {
    let query = format!(
        "Recommend one real, currently open restaurant in {} that is a great fit for \
         someone feeling {}. Choose a place rated 4 to 5 stars and include its name. \
         Variety seed: {} (use it to vary your pick between requests).\n\n{}",
        location,
        mood,
        seed,
        format_instructions::<DiscoveredRestaurant>()
    );
    expert_prompt(&query)
}

/// Parses a model answer into `T`, tolerating Markdown code fences and
/// surrounding chatter but nothing missing from the schema.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> AppResult<T> {
    let trimmed = raw.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|rest| rest.trim_end().trim_end_matches("```"))
        .unwrap_or(trimmed);

    let candidate = match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => {
            return Err(AppError::OutputParse(format!(
                "no JSON object in response. Raw output: {}",
                raw
            )))
        }
    };

    serde_json::from_str(candidate).map_err(|e| {
        tracing::warn!(error = %e, "Model output did not match schema");
        AppError::OutputParse(format!("{}. Raw output: {}", e, raw))
    })
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the
/// rest: `"date-night"` → `"Date-Night"`. Everything else is kept as is.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// Emoji layout shown to users. The moods line shows the mood the user asked
/// for, not the model's description.
pub fn format_restaurant_details(detail: &RestaurantDetail, mood: &str) -> String {
    format!(
        "📝 Summary: {}\n\
         📞 Phone: {}\n\
         📍 Address: {}\n\
         😊 Moods: {}\n\
         ✅ Highlight: {}\n\
         ⭐ Rating: {}\n\
         🕒 Hours: {}\n\
         💰 Price: {}\n\
         🍽️ Popular Items: {}\n",
        detail.summary,
        detail.phone,
        detail.address,
        mood,
        detail.highlight,
        detail.rating,
        detail.hours,
        detail.price,
        detail.popular_items
    )
}

/// Discovery results lead with the restaurant name
pub fn format_discovered_restaurant(restaurant: &DiscoveredRestaurant, mood: &str) -> String {
    format!(
        "🍴 Restaurant: {}\n{}",
        restaurant.name,
        format_restaurant_details(&restaurant.detail, mood)
    )
}
