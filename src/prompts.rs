pub const ANALYZE_SYSTEM: &str = include_str!("../data/prompts/analyze_system.txt");
pub const ANALYZE_USER: &str = include_str!("../data/prompts/analyze_user.txt");

/// Sampling temperature for every analysis call; low to keep answers consistent.
pub const TEMPERATURE: f32 = 0.3;

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Labels the free-text query the way the system instruction expects it.
pub fn user_query(query: &str) -> String {
    render(ANALYZE_USER, &[("query", query)])
}
