//! Scene Records
//!
//! Plain serde structures for the JSON scene format and their conversion to
//! and from the arena-backed [`Articulated`]. Records own no keys; the tree
//! shape is expressed by nesting.
//!
//! Keyframe lists are stored under `keyframes` and models carry a `mesh`.
//! The older layout (`transformations`, faces directly on the model) is
//! accepted on input.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::animation::keyframes::KeyframeList;
use crate::errors::Result;
use crate::scene::NodeKey;
use crate::scene::articulated::Articulated;
use crate::scene::mesh::{Face, Mesh};
use crate::scene::node::Node;
use crate::scene::transformation::Transformation;

/// Serialized form of a [`Transformation`]: the twelve named scalars.
pub type TransformationRecord = Transformation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    #[serde(default)]
    pub mesh: Mesh,
    #[serde(alias = "transformations")]
    pub keyframes: Vec<TransformationRecord>,
    /// Flat layout with faces directly on the model; read only when `mesh`
    /// is absent or empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faces: Vec<Face>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub component: String,
    #[serde(default)]
    pub children: Vec<NodeRecord>,
    pub model: ModelRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticulatedRecord {
    pub root: Vec<NodeRecord>,
    #[serde(alias = "transformations")]
    pub keyframes: Vec<TransformationRecord>,
}

// ============================================================================
// Conversion
// ============================================================================

impl ModelRecord {
    /// Mesh and validated keyframes. Fails with `EmptyKeyframes`.
    pub fn to_parts(&self) -> Result<(Mesh, KeyframeList)> {
        let keyframes = KeyframeList::new(self.keyframes.clone())?;
        let mesh = if self.mesh.is_empty() {
            Mesh::new(self.faces.clone())
        } else {
            self.mesh.clone()
        };
        Ok((mesh, keyframes))
    }
}

impl Articulated {
    /// Builds a model from a record. Nothing is inserted unless every
    /// keyframe list in the record is non-empty.
    pub fn from_record(record: &ArticulatedRecord) -> Result<Self> {
        let keyframes = KeyframeList::new(record.keyframes.clone())?;

        // Validate and convert up front so a bad record builds nothing.
        let mut pending: Vec<(Option<usize>, Node)> = Vec::new();
        let mut stack: Vec<(Option<usize>, &NodeRecord)> =
            record.root.iter().rev().map(|n| (None, n)).collect();
        while let Some((parent, node_record)) = stack.pop() {
            let (mesh, frames) = node_record.model.to_parts()?;
            let index = pending.len();
            pending.push((
                parent,
                Node::with_keyframes(node_record.component.clone(), mesh, frames),
            ));
            for child in node_record.children.iter().rev() {
                stack.push((Some(index), child));
            }
        }

        let mut articulated = Self::new(keyframes);
        let mut keys: Vec<NodeKey> = Vec::with_capacity(pending.len());
        for (parent, node) in pending {
            let key = match parent {
                None => articulated.add_root(node),
                Some(p) => articulated.add_child(keys[p], node)?,
            };
            keys.push(key);
        }
        Ok(articulated)
    }

    #[must_use]
    pub fn to_record(&self) -> ArticulatedRecord {
        ArticulatedRecord {
            root: self.roots.iter().map(|&k| self.node_record(k)).collect(),
            keyframes: self.keyframes.as_slice().to_vec(),
        }
    }

    fn node_record(&self, key: NodeKey) -> NodeRecord {
        let node = &self.nodes[key];
        NodeRecord {
            component: node.component.clone(),
            children: node
                .children
                .iter()
                .map(|&c| self.node_record(c))
                .collect(),
            model: ModelRecord {
                mesh: node.mesh.clone(),
                keyframes: node.keyframes.as_slice().to_vec(),
                faces: Vec::new(),
            },
        }
    }
}

// ============================================================================
// JSON helpers
// ============================================================================

/// Parses without serde_json's nesting limit. Each child level nests two
/// JSON containers, so the default limit would reject trees that
/// [`save_articulated_string`] writes without complaint; the stack grows on
/// demand instead.
fn parse_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

pub fn load_articulated_str(json: &str) -> Result<Articulated> {
    let record: ArticulatedRecord = parse_json(json)?;
    Articulated::from_record(&record)
}

pub fn save_articulated_string(articulated: &Articulated) -> Result<String> {
    Ok(serde_json::to_string_pretty(&articulated.to_record())?)
}

/// Parses a standalone model record into a detached node.
pub fn load_model_str(component: &str, json: &str) -> Result<Node> {
    let record: ModelRecord = parse_json(json)?;
    let (mesh, keyframes) = record.to_parts()?;
    Ok(Node::with_keyframes(component, mesh, keyframes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::KineError;

    const IDENTITY_JSON: &str = r#"{"px":0,"py":0,"pz":0,"tx":0,"ty":0,"tz":0,"rx":0,"ry":0,"rz":0,"sx":1,"sy":1,"sz":1}"#;

    #[test]
    fn accepts_legacy_transformations_key() {
        let json = format!(
            r#"{{ "root": [ {{ "component": "body", "children": [],
                 "model": {{ "faces": [], "transformations": [{IDENTITY_JSON}] }} }} ],
                 "transformations": [{IDENTITY_JSON}, {IDENTITY_JSON}] }}"#
        );
        let a = load_articulated_str(&json).unwrap();
        assert_eq!(a.keyframes().len(), 2);
        assert_eq!(a.node_count(), 1);
        assert!(a.find_by_component("body").is_some());
    }

    #[test]
    fn rejects_empty_keyframes() {
        let json = format!(
            r#"{{ "root": [ {{ "component": "body",
                 "model": {{ "mesh": {{ "faces": [] }}, "keyframes": [] }} }} ],
                 "keyframes": [{IDENTITY_JSON}] }}"#
        );
        assert!(matches!(load_articulated_str(&json), Err(KineError::EmptyKeyframes)));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(load_articulated_str("{ root: "), Err(KineError::JsonError(_))));
    }
}
