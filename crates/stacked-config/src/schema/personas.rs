use serde::{Deserialize, Serialize};

/// One selectable persona: which model to call and how to instruct it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub description: String,
    pub model: String,
    #[serde(default)]
    pub system_prompt: String,
}

impl PersonaConfig {
    fn new(
        id: &str,
        name: &str,
        emoji: &str,
        description: &str,
        model: &str,
        system_prompt: &str,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            emoji: emoji.into(),
            description: description.into(),
            model: model.into(),
            system_prompt: system_prompt.into(),
        }
    }
}

/// The built-in persona roster, in carousel order.
pub fn default_personas() -> Vec<PersonaConfig> {
    vec![
        PersonaConfig::new(
            "nova",
            "Nova",
            "🔥",
            "Uncensored & Wild",
            "nova",
            "You are Nova, an uncensored AI assistant. Be direct, honest, and wild.",
        ),
        PersonaConfig::new(
            "julie",
            "Julie",
            "💋",
            "Creative Persona",
            "Julie",
            "You are Julie, a creative and engaging AI. Be playful, imaginative, and fun.",
        ),
        PersonaConfig::new(
            "stheno",
            "Stheno",
            "🐍",
            "Roleplay Master",
            "fluffy/l3-8b-stheno-v3.2",
            "You are Stheno, a master of roleplay and storytelling.",
        ),
        PersonaConfig::new(
            "dolphin",
            "Dolphin",
            "🐬",
            "Uncensored General",
            "dolphin-llama3",
            "You are Dolphin, an uncensored general-purpose AI.",
        ),
    ]
}
