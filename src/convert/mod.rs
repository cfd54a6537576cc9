//! Scene-to-document conversion.
//!
//! A [`SceneConverter`] walks an imported scene and populates a
//! [`DocumentBuilder`]. The pipeline does not inspect what it adds; errors
//! it returns abort the conversion unchanged.

mod hierarchy;

pub use hierarchy::*;

use crate::document::DocumentBuilder;
use crate::options::ConvertOptions;
use crate::util::Result;

/// Populates a document from a scene of type `S`.
pub trait SceneConverter<S> {
    fn convert(&mut self, scene: &S, options: &ConvertOptions, builder: &mut DocumentBuilder) -> Result<()>;
}

impl<S, F> SceneConverter<S> for F
where
    F: FnMut(&S, &ConvertOptions, &mut DocumentBuilder) -> Result<()>,
{
    fn convert(&mut self, scene: &S, options: &ConvertOptions, builder: &mut DocumentBuilder) -> Result<()> {
        self(scene, options, builder)
    }
}
