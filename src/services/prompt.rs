use crate::models::{Product, UserPreferences, MAX_RECOMMENDATIONS};

/// Hard cap on candidates listed in a prompt, bounding token usage
pub const MAX_PROMPT_CANDIDATES: usize = 40;

/// System instruction sent alongside every recommendation prompt
pub const SYSTEM_PROMPT: &str = "You are a smart e-commerce recommendation system like the ones \
used by large online retailers. Write recommendations in a direct, engaging style without \
referring to 'the user' or 'the customer'; describe why the product is worth buying. \
Always respond with valid JSON only, no additional text.";

const NO_PREFERENCE: &str = "No specific preference";

/// Renders preferences, browsing history and candidates into one instruction
pub fn build_prompt(
    preferences: &UserPreferences,
    browsed: &[&Product],
    candidates: &[&Product],
) -> String {
    let mut prompt = format!(
        "Analyze the shopping preferences and browsing history below and recommend exactly \
{count} products.

IMPORTANT:
1. Respond with a valid JSON array containing exactly {count} recommendations.
2. Write explanations in a direct, engaging style like real shopping apps do.
3. NEVER mention \"the user\", \"for the user\", \"the customer\" or similar.
4. Describe why each product is great, not why it is great for someone.

PREFERENCES:
",
        count = MAX_RECOMMENDATIONS
    );

    prompt.push_str(&format!("- Price range: {}\n", preferences.price_range));
    prompt.push_str(&format!(
        "- Preferred categories: {}\n",
        join_or_default(&preferences.categories)
    ));
    prompt.push_str(&format!(
        "- Preferred brands: {}\n",
        join_or_default(&preferences.brands)
    ));

    if browsed.is_empty() {
        prompt.push_str("\nBROWSING HISTORY: No previous browsing history\n");
    } else {
        prompt.push_str("\nBROWSING HISTORY (recently viewed products):\n");
        for product in browsed {
            prompt.push_str(&format!(
                "- {} | Category: {} | Brand: {} | Price: ${} | Tags: {}\n",
                product.name,
                product.category,
                product.brand,
                product.price,
                product.tags.join(", ")
            ));
        }
    }

    prompt.push_str(&format!(
        "\nAVAILABLE PRODUCTS TO RECOMMEND FROM ({} products after filtering):\n",
        candidates.len()
    ));
    for product in candidates.iter().take(MAX_PROMPT_CANDIDATES) {
        prompt.push_str(&format!(
            "ID: {} | {} | Category: {} | Brand: {} | Price: ${} | Rating: {}\n",
            product.id, product.name, product.category, product.brand, product.price, product.rating
        ));
    }

    prompt.push_str(&format!(
        r#"
TASK: Using the preferences and browsing history above, recommend exactly {count} products from the available list.

RECOMMENDATION CRITERIA:
1. Match the preferred price range
2. Align with preferred categories and brands
3. Follow patterns in the browsing history (similar items, complementary products)
4. Prioritize highly-rated products
5. Suggest diverse but relevant options

RESPONSE FORMAT: Return ONLY a JSON array with this exact structure:
[
  {{
    "product_id": "prod001",
    "explanation": "Direct, engaging 2-3 sentence explanation written like a real shopping app recommendation.",
    "score": 9
  }}
]

Each recommendation must include:
- product_id: the exact ID from the available products list
- explanation: why this product stands out (NO mention of 'user' or 'customer')
- score: confidence score from 1-10

Return ONLY the JSON array, no additional text."#,
        count = MAX_RECOMMENDATIONS
    ));

    prompt
}

fn join_or_default(values: &[String]) -> String {
    if values.is_empty() {
        NO_PREFERENCE.to_string()
    } else {
        values.join(", ")
    }
}
