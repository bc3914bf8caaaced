//! Archetype registry for loading, validating and resolving body layouts.
//!
//! The registry is filled once at startup (built-in data, TOML files or a
//! directory of them). Every archetype is schema-checked on registration so
//! bad data surfaces as a load error instead of a mid-combat surprise.
//! Lookups hand out `Arc<Archetype>` so many enemies share one layout.

use ahash::AHashMap;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use super::schema::{Archetype, ArchetypeFile};
use crate::core::error::{PartError, Result};
use crate::core::types::ActionId;

const BUILTIN_ARCHETYPES: [(&str, &str); 4] = [
    ("humanoid.toml", include_str!("../../data/archetypes/humanoid.toml")),
    ("beast.toml", include_str!("../../data/archetypes/beast.toml")),
    ("dragon.toml", include_str!("../../data/archetypes/dragon.toml")),
    ("slime.toml", include_str!("../../data/archetypes/slime.toml")),
];

/// Registry of archetypes and the special effects their parts refer to
#[derive(Debug, Clone)]
pub struct ArchetypeRegistry {
    /// Archetypes indexed by name
    archetypes: AHashMap<String, Arc<Archetype>>,
    /// Registration order, for stable listings
    names: Vec<String>,
    /// Effect id -> actions disabled by it
    effects: AHashMap<String, Vec<ActionId>>,
    /// Shared last-resort layout
    synthetic: Arc<Archetype>,
}

impl ArchetypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            archetypes: AHashMap::new(),
            names: Vec::new(),
            effects: AHashMap::new(),
            synthetic: Arc::new(Archetype::synthetic()),
        }
    }

    /// Registry holding the archetypes shipped in `data/archetypes`
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        for (file, content) in BUILTIN_ARCHETYPES {
            registry.load_str(content).map_err(|e| match e {
                PartError::Toml(err) => PartError::InvalidArchetype {
                    name: file.to_string(),
                    problems: vec![err.to_string()],
                },
                other => other,
            })?;
        }
        Ok(registry)
    }

    /// Register a special effect and the actions it disables
    pub fn register_effect(&mut self, id: &str, actions: Vec<ActionId>) {
        self.effects.insert(id.to_string(), actions);
    }

    /// Validate and register an archetype
    pub fn register(&mut self, archetype: Archetype) -> Result<()> {
        self.register_with_effects(archetype, BTreeMap::new())
    }

    fn register_with_effects(
        &mut self,
        archetype: Archetype,
        effects: BTreeMap<String, Vec<ActionId>>,
    ) -> Result<()> {
        if self.archetypes.contains_key(&archetype.name) {
            return Err(PartError::DuplicateArchetype(archetype.name));
        }

        let problems =
            archetype.problems(|id| self.effects.contains_key(id) || effects.contains_key(id));
        if !problems.is_empty() {
            return Err(PartError::InvalidArchetype {
                name: archetype.name,
                problems,
            });
        }

        for (id, actions) in effects {
            if self.effects.get(&id).is_some_and(|existing| existing != &actions) {
                tracing::warn!(
                    effect = %id,
                    archetype = %archetype.name,
                    "Special effect redefined"
                );
            }
            self.effects.insert(id, actions);
        }

        tracing::debug!(
            archetype = %archetype.name,
            parts = archetype.parts.len(),
            "Registered archetype"
        );
        self.names.push(archetype.name.clone());
        self.archetypes
            .insert(archetype.name.clone(), Arc::new(archetype));
        Ok(())
    }

    /// Parse and register one archetype document, returning its name
    pub fn load_str(&mut self, content: &str) -> Result<String> {
        let file: ArchetypeFile = toml::from_str(content)?;
        let (archetype, effects) = file.into_parts();
        let name = archetype.name.clone();
        self.register_with_effects(archetype, effects)?;
        Ok(name)
    }

    /// Load an archetype from a TOML file
    pub fn load_file(&mut self, path: &Path) -> Result<String> {
        let content = std::fs::read_to_string(path)?;
        self.load_str(&content)
    }

    /// Load all .toml files from a directory, in file name order
    pub fn load_directory(&mut self, path: &Path) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry_path = entry?.path();
            if entry_path.extension().is_some_and(|ext| ext == "toml") {
                files.push(entry_path);
            }
        }
        files.sort();

        let mut names = Vec::new();
        for file in files {
            names.push(self.load_file(&file)?);
        }
        tracing::info!(count = names.len(), dir = %path.display(), "Loaded archetypes");
        Ok(names)
    }

    /// Get an archetype by name
    pub fn get(&self, name: &str) -> Option<Arc<Archetype>> {
        self.archetypes.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.archetypes.contains_key(name)
    }

    /// Archetype names in registration order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    /// Actions disabled by a special effect
    pub fn effect_actions(&self, effect: &str) -> Option<&[ActionId]> {
        self.effects.get(effect).map(Vec::as_slice)
    }

    /// Resolve an enemy's archetype tag
    ///
    /// Missing or unknown tags fall back to `default_name`; if that is not
    /// registered either, the synthetic single-part layout is returned.
    pub fn resolve(&self, tag: Option<&str>, default_name: &str) -> Arc<Archetype> {
        if let Some(name) = tag {
            if let Some(archetype) = self.get(name) {
                return archetype;
            }
            tracing::warn!(tag = name, fallback = default_name, "Unknown archetype tag");
        } else {
            tracing::warn!(fallback = default_name, "Enemy has no archetype tag");
        }

        match self.get(default_name) {
            Some(archetype) => archetype,
            None => {
                tracing::warn!(
                    default = default_name,
                    "Default archetype missing, using single-part body"
                );
                Arc::clone(&self.synthetic)
            }
        }
    }
}

impl Default for ArchetypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
