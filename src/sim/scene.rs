//! Scene descriptions and the entity factory registry
//!
//! A scene is plain data (usually JSON): world constants plus a list of
//! placed entities, each naming its kind and carrying a flat map of numeric
//! parameters. The [`EntityRegistry`] turns each description into a concrete
//! entity through the factory registered for its kind.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::cloud::Cloud;
use super::entity::{Body, Entity, EntityKind};
use super::hoop::Hoop;
use super::pegasus::Pegasus;
use super::simulation::{Environment, Simulation};
use crate::SceneError;
use crate::consts::{
    DEFAULT_AGILITY, DEFAULT_BOUNCE, DEFAULT_CAMERA_SPEED, DEFAULT_DRAG, DEFAULT_GRAVITY,
    DEFAULT_LIFT, DEFAULT_WORLD_SPEED, FINISH_NAME,
};

fn default_gravity() -> DVec2 {
    DVec2::new(DEFAULT_GRAVITY.0, DEFAULT_GRAVITY.1)
}

fn default_speed() -> f64 {
    DEFAULT_WORLD_SPEED
}

/// Whole-scene description, consumed once when a world is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default = "default_gravity")]
    pub gravity: DVec2,
    /// World speed (time scale)
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default)]
    pub entities: Vec<EntityDescription>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            speed: default_speed(),
            entities: Vec::new(),
        }
    }
}

/// One placed entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescription {
    /// Registry key, e.g. `pegasus`, `cloud`
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub position: DVec2,
    pub size: DVec2,
    #[serde(default)]
    pub angle: f64,
    /// Kind-specific numeric parameters
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, f64>,
}

impl EntityDescription {
    pub fn new(kind: impl Into<String>, position: DVec2, size: DVec2) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            position,
            size,
            angle: 0.0,
            params: BTreeMap::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: f64) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

/// Read access to a description's parameters with defaults
pub struct Params<'a> {
    index: usize,
    desc: &'a EntityDescription,
}

impl Params<'_> {
    pub fn get(&self, key: &str, default: f64) -> Result<f64, SceneError> {
        match self.desc.params.get(key) {
            Some(&value) if !value.is_finite() => Err(SceneError::NonFinite {
                index: self.index,
                name: key.to_string(),
            }),
            Some(&value) => Ok(value),
            None => Ok(default),
        }
    }

    pub fn optional(&self, key: &str) -> Result<Option<f64>, SceneError> {
        if self.desc.params.contains_key(key) {
            self.get(key, 0.0).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.desc.name.as_deref()
    }
}

/// Builds the kind-specific part of an entity from its parameters
pub type EntityFactory = fn(&Params<'_>) -> Result<EntityKind, SceneError>;

/// Maps kind identifiers to factories
#[derive(Clone)]
pub struct EntityRegistry {
    factories: HashMap<String, EntityFactory>,
}

impl std::fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("EntityRegistry").field("kinds", &kinds).finish()
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl EntityRegistry {
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with the four built-in kinds
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register("pegasus", pegasus_factory);
        registry.register("cloud", cloud_factory);
        registry.register("hoop", hoop_factory);
        registry.register("camera", camera_factory);
        registry
    }

    pub fn register(&mut self, kind: impl Into<String>, factory: EntityFactory) {
        self.factories.insert(kind.into(), factory);
    }

    /// Build one entity; `index` is its position in the scene for errors
    pub fn create(&self, index: usize, desc: &EntityDescription) -> Result<Entity, SceneError> {
        let factory = self
            .factories
            .get(&desc.kind)
            .ok_or_else(|| SceneError::UnknownKind(desc.kind.clone()))?;

        if desc.size.x < 0.0 || desc.size.y < 0.0 {
            return Err(SceneError::NegativeSize { index });
        }
        let finite = [
            ("position", desc.position.is_finite()),
            ("size", desc.size.is_finite()),
            ("angle", desc.angle.is_finite()),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, ok)| !ok) {
            return Err(SceneError::NonFinite {
                index,
                name: name.to_string(),
            });
        }

        let kind = factory(&Params { index, desc })?;
        let body = Body::new(desc.position, desc.size, crate::normalize_angle(desc.angle));
        Ok(Entity {
            name: desc.name.clone(),
            body,
            kind,
        })
    }
}

fn pegasus_factory(params: &Params<'_>) -> Result<EntityKind, SceneError> {
    Ok(EntityKind::Pegasus(Pegasus {
        agility: params.get("agility", DEFAULT_AGILITY)?,
        drag: DVec2::new(
            params.get("drag_x", DEFAULT_DRAG.0)?,
            params.get("drag_y", DEFAULT_DRAG.1)?,
        ),
        lift: params.get("lift", DEFAULT_LIFT)?,
        // A negative limit would invert the clamp range
        max_speed: params.optional("max_speed")?.map(f64::abs),
        ..Default::default()
    }))
}

fn cloud_factory(params: &Params<'_>) -> Result<EntityKind, SceneError> {
    Ok(EntityKind::Cloud(Cloud {
        bounce: params.get("bounce", DEFAULT_BOUNCE)?,
    }))
}

fn hoop_factory(params: &Params<'_>) -> Result<EntityKind, SceneError> {
    let is_finish = params.name() == Some(FINISH_NAME) || params.get("finish", 0.0)? != 0.0;
    Ok(EntityKind::Hoop(Hoop {
        is_finish,
        is_visited: false,
    }))
}

fn camera_factory(params: &Params<'_>) -> Result<EntityKind, SceneError> {
    Ok(EntityKind::Camera(Camera {
        speed: params.get("speed", DEFAULT_CAMERA_SPEED)?,
    }))
}

impl SceneDescription {
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn environment(&self) -> Environment {
        Environment {
            gravity: self.gravity,
            speed: self.speed,
        }
    }

    /// Build a simulation with the standard registry
    pub fn build(&self) -> Result<Simulation, SceneError> {
        self.build_with(&EntityRegistry::standard())
    }

    pub fn build_with(&self, registry: &EntityRegistry) -> Result<Simulation, SceneError> {
        if !self.gravity.is_finite() {
            return Err(SceneError::NonFinite {
                index: 0,
                name: "gravity".into(),
            });
        }
        let entities = self
            .entities
            .iter()
            .enumerate()
            .map(|(index, desc)| registry.create(index, desc))
            .collect::<Result<Vec<_>, _>>()?;
        Simulation::new(self.environment(), entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "gravity": [0.0, 0.2],
        "speed": 0.5,
        "entities": [
            { "kind": "camera", "position": [0, 0], "size": [0, 0], "params": { "speed": 0.2 } },
            { "kind": "pegasus", "name": "Hero", "position": [0, 0], "size": [60, 30],
              "params": { "agility": 0.08, "lift": 0.01, "max_speed": 12 } },
            { "kind": "cloud", "position": [300, 40], "size": [200, 90], "angle": 0.2,
              "params": { "bounce": 0.03 } },
            { "kind": "hoop", "position": [600, 0], "size": [20, 120] },
            { "kind": "hoop", "name": "Finish", "position": [900, 0], "size": [20, 120] }
        ]
    }"#;

    #[test]
    fn test_scene_from_json() {
        let scene = SceneDescription::from_json(SCENE).unwrap();
        assert_eq!(scene.gravity, DVec2::new(0.0, 0.2));
        assert_eq!(scene.speed, 0.5);
        assert_eq!(scene.entities.len(), 5);

        let sim = scene.build().unwrap();
        assert_eq!(sim.env.speed, 0.5);
        let hero = sim.find("Hero").unwrap();
        let pegasus = hero.as_pegasus().unwrap();
        assert_eq!(pegasus.agility, 0.08);
        assert_eq!(pegasus.max_speed, Some(12.0));
        assert_eq!(pegasus.drag, DVec2::new(DEFAULT_DRAG.0, DEFAULT_DRAG.1));
        assert_eq!(hero.body.bounding_radius_sq(), 900.0);

        match &sim.entities()[0].kind {
            EntityKind::Camera(camera) => assert_eq!(camera.speed, 0.2),
            other => panic!("expected camera, got {}", other.label()),
        }
        assert!(!sim.entities()[3].as_hoop().unwrap().is_finish);
        assert!(sim.find("Finish").unwrap().as_hoop().unwrap().is_finish);
    }

    #[test]
    fn test_defaults_when_omitted() {
        let scene = SceneDescription::from_json(r#"{ "entities": [] }"#).unwrap();
        assert_eq!(scene, SceneDescription::default());
        let sim = scene.build().unwrap();
        assert!(sim.pegasus().is_none());
    }

    #[test]
    fn test_unknown_kind() {
        let scene = SceneDescription {
            entities: vec![EntityDescription::new("dragon", DVec2::ZERO, DVec2::ONE)],
            ..Default::default()
        };
        assert!(matches!(scene.build(), Err(SceneError::UnknownKind(kind)) if kind == "dragon"));
    }

    #[test]
    fn test_negative_size_rejected() {
        let scene = SceneDescription {
            entities: vec![
                EntityDescription::new("cloud", DVec2::ZERO, DVec2::ONE),
                EntityDescription::new("cloud", DVec2::ZERO, DVec2::new(-1.0, 4.0)),
            ],
            ..Default::default()
        };
        assert!(matches!(scene.build(), Err(SceneError::NegativeSize { index: 1 })));
    }

    #[test]
    fn test_non_finite_param_rejected() {
        let scene = SceneDescription {
            entities: vec![
                EntityDescription::new("cloud", DVec2::ZERO, DVec2::ONE).with_param("bounce", f64::NAN),
            ],
            ..Default::default()
        };
        assert!(matches!(
            scene.build(),
            Err(SceneError::NonFinite { index: 0, name }) if name == "bounce"
        ));
    }

    #[test]
    fn test_duplicate_pegasus_rejected() {
        let scene = SceneDescription {
            entities: vec![
                EntityDescription::new("pegasus", DVec2::ZERO, DVec2::ONE),
                EntityDescription::new("pegasus", DVec2::ZERO, DVec2::ONE),
            ],
            ..Default::default()
        };
        assert!(matches!(scene.build(), Err(SceneError::DuplicatePegasus { index: 1 })));
    }

    #[test]
    fn test_custom_factory() {
        fn heavy_cloud(_: &Params<'_>) -> Result<EntityKind, SceneError> {
            Ok(EntityKind::Cloud(Cloud { bounce: 1.0 }))
        }
        let mut registry = EntityRegistry::standard();
        registry.register("storm", heavy_cloud);
        let scene = SceneDescription {
            entities: vec![EntityDescription::new("storm", DVec2::ZERO, DVec2::ONE)],
            ..Default::default()
        };
        let sim = scene.build_with(&registry).unwrap();
        assert!(matches!(sim.entities()[0].kind, EntityKind::Cloud(Cloud { bounce }) if bounce == 1.0));
    }

    #[test]
    fn test_json_round_trip_keeps_names_and_params() {
        let scene = SceneDescription::from_json(SCENE).unwrap();
        let again = SceneDescription::from_json(&scene.to_json().unwrap()).unwrap();
        assert_eq!(scene, again);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SceneDescription::from_json("{ \"entities\": 3 }"),
            Err(SceneError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SceneDescription::load("/nonexistent/scene.json"),
            Err(SceneError::Io(_))
        ));
    }
}
