//! Minimal FBX converter: the `Model` hierarchy as glTF nodes.

use std::collections::HashMap;

use gltf_json as json;
use tracing::{debug, info_span};

use super::SceneConverter;
use crate::document::DocumentBuilder;
use crate::fbx::{ConnectionKind, FbxObject, FbxScene};
use crate::options::ConvertOptions;
use crate::util::{Error, Result};

/// Maps every `Model` object to a named node and `OO` connections between
/// models to parent/child links. Models without a model parent become the
/// roots of a single scene.
#[derive(Clone, Copy, Debug, Default)]
pub struct HierarchyConverter;

impl HierarchyConverter {
    pub fn new() -> Self {
        Self
    }
}

impl SceneConverter<FbxScene> for HierarchyConverter {
    fn convert(&mut self, scene: &FbxScene, options: &ConvertOptions, builder: &mut DocumentBuilder) -> Result<()> {
        let _span = info_span!("convert_hierarchy").entered();

        let models: Vec<FbxObject<'_>> = scene
            .objects()
            .into_iter()
            .filter(|object| object.class == "Model")
            .collect();

        let mut slot_of = HashMap::with_capacity(models.len());
        for (slot, model) in models.iter().enumerate() {
            if slot_of.insert(model.id, slot).is_some() {
                return Err(Error::conversion(format!("duplicate object id {}", model.id)));
            }
        }

        let mut parent: Vec<Option<usize>> = vec![None; models.len()];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); models.len()];
        for connection in scene.connections() {
            if connection.kind != ConnectionKind::ObjectObject {
                continue;
            }
            let (Some(&child), Some(&owner)) = (slot_of.get(&connection.child), slot_of.get(&connection.parent)) else {
                continue;
            };
            if parent[child].is_some() {
                options.log_warning(format!(
                    "Model '{}' has more than one parent, keeping the first",
                    models[child].name
                ));
                continue;
            }
            if is_ancestor(&parent, child, owner) {
                options.log_warning(format!(
                    "Skipping connection that makes '{}' its own ancestor",
                    models[child].name
                ));
                continue;
            }
            parent[child] = Some(owner);
            children[owner].push(child);
        }

        let base = builder.document().nodes.len() as u32;
        let index_of = |slot: usize| json::Index::new(base + slot as u32);

        for (model, kids) in models.iter().zip(&children) {
            builder.add_node(json::Node {
                camera: None,
                children: (!kids.is_empty()).then(|| kids.iter().map(|&k| index_of(k)).collect()),
                extensions: Default::default(),
                extras: Default::default(),
                matrix: None,
                mesh: None,
                name: Some(model.name.to_string()),
                rotation: None,
                scale: None,
                skin: None,
                translation: None,
                weights: None,
            });
        }

        let roots: Vec<_> = (0..models.len())
            .filter(|&slot| parent[slot].is_none())
            .map(index_of)
            .collect();
        debug!(models = models.len(), roots = roots.len(), "mapped model hierarchy");
        options.log_verbose(format!("Converted {} nodes ({} roots)", models.len(), roots.len()));

        builder.add_scene(scene.document_name(), roots);
        Ok(())
    }
}

/// Whether `candidate` is `node` or one of its ancestors.
fn is_ancestor(parent: &[Option<usize>], candidate: usize, mut node: usize) -> bool {
    loop {
        if node == candidate {
            return true;
        }
        match parent[node] {
            Some(up) => node = up,
            None => return false,
        }
    }
}
