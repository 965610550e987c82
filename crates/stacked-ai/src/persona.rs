//! Persona roster with a wrapping selection cursor.

use serde::{Deserialize, Serialize};

use crate::GenerationRequest;

/// A named model + system prompt pairing with display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub description: String,
    pub model: String,
    pub system_prompt: String,
}

impl Persona {
    /// Build the chat request this persona would send for `prompt`.
    pub fn request(&self, prompt: impl Into<String>) -> GenerationRequest {
        GenerationRequest::new(self.model.clone(), prompt, self.system_prompt.clone())
    }

    /// `"🔥 Nova"`, or just the name when there is no emoji.
    pub fn label(&self) -> String {
        if self.emoji.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.emoji, self.name)
        }
    }
}

/// Ordered, non-empty persona list with exactly one selected entry.
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    personas: Vec<Persona>,
    selected: usize,
}

impl PersonaRegistry {
    /// Returns `None` for an empty roster. The first persona starts selected.
    pub fn new(personas: Vec<Persona>) -> Option<Self> {
        if personas.is_empty() {
            return None;
        }
        Some(Self {
            personas,
            selected: 0,
        })
    }

    pub fn selected(&self) -> &Persona {
        &self.personas[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn all(&self) -> &[Persona] {
        &self.personas
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    /// Advance to the next persona, wrapping past the end.
    pub fn next(&mut self) -> &Persona {
        self.selected = (self.selected + 1) % self.personas.len();
        self.selected()
    }

    /// Step back to the previous persona, wrapping past the start.
    pub fn previous(&mut self) -> &Persona {
        self.selected = (self.selected + self.personas.len() - 1) % self.personas.len();
        self.selected()
    }

    /// Select by id. Leaves the selection unchanged when the id is unknown.
    pub fn select(&mut self, id: &str) -> Option<&Persona> {
        let index = self.personas.iter().position(|p| p.id == id)?;
        self.selected = index;
        Some(self.selected())
    }
}
