//! Turn a `SceneDescription` into renderable objects.

use std::collections::HashMap;
use std::sync::Arc;

use lumen_core::{MaterialDesc, ObjectDesc, SceneDescription, SceneError, SceneResult, TextureDesc, TextureRef};

use crate::bvh::BvhNode;
use crate::hittable::HittableList;
use crate::material::{Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal};
use crate::quad::{box_prism, Quad};
use crate::sphere::Sphere;
use crate::texture::{CheckerTexture, ImageTexture, SolidColor, Texture};

/// Checker textures may nest; anything deeper than this is treated as a cycle.
const MAX_TEXTURE_NESTING: usize = 16;

/// Build a BVH over every object in the scene.
///
/// Materials and textures are created once per name and shared between the
/// objects that use them. Image textures are loaded here, before rendering.
pub fn build_world(scene: &SceneDescription) -> SceneResult<BvhNode> {
    let mut builder = Builder {
        scene,
        textures: HashMap::new(),
        materials: HashMap::new(),
    };

    let mut world = HittableList::new();
    for (index, object) in scene.objects.iter().enumerate() {
        let material = builder.material(index, object.material())?;
        match object {
            ObjectDesc::Sphere {
                center,
                center_end: Some(end),
                radius,
                ..
            } => world.add(Arc::new(Sphere::moving(*center, *end, *radius, material))),
            ObjectDesc::Sphere {
                center,
                center_end: None,
                radius,
                ..
            } => world.add(Arc::new(Sphere::new(*center, *radius, material))),
            ObjectDesc::Quad { q, u, v, .. } => world.add(Arc::new(Quad::new(*q, *u, *v, material))),
            ObjectDesc::Triangle { q, u, v, .. } => world.add(Arc::new(Quad::triangle(*q, *u, *v, material))),
            ObjectDesc::Disk { q, u, v, .. } => world.add(Arc::new(Quad::disk(*q, *u, *v, material))),
            ObjectDesc::Box { a, b, .. } => world.extend(box_prism(*a, *b, material)),
        }
    }

    let primitives = world.len();
    let bvh = BvhNode::from_list(world);
    log::info!(
        "Built scene: {} objects, {} primitives, {} materials, BVH depth {}",
        scene.objects.len(),
        primitives,
        builder.materials.len(),
        bvh.depth()
    );

    Ok(bvh)
}

struct Builder<'s> {
    scene: &'s SceneDescription,
    textures: HashMap<&'s str, Arc<dyn Texture>>,
    materials: HashMap<&'s str, Arc<dyn Material>>,
}

impl<'s> Builder<'s> {
    fn material(&mut self, index: usize, name: &'s str) -> SceneResult<Arc<dyn Material>> {
        if let Some(material) = self.materials.get(name) {
            return Ok(material.clone());
        }

        let scene = self.scene;
        let desc = scene
            .materials
            .get(name)
            .ok_or_else(|| SceneError::UnknownMaterial {
                index,
                name: name.to_string(),
            })?;

        let material: Arc<dyn Material> = match desc {
            MaterialDesc::Lambertian { albedo } => Arc::new(Lambertian::from_texture(self.texture_ref(name, albedo, 0)?)),
            MaterialDesc::Metal { albedo, fuzz } => Arc::new(Metal::new(*albedo, *fuzz)),
            MaterialDesc::Dielectric { refraction_index } => Arc::new(Dielectric::new(*refraction_index)),
            MaterialDesc::DiffuseLight { emit } => Arc::new(DiffuseLight::from_texture(self.texture_ref(name, emit, 0)?)),
            MaterialDesc::Isotropic { albedo } => Arc::new(Isotropic::from_texture(self.texture_ref(name, albedo, 0)?)),
        };

        self.materials.insert(name, material.clone());
        Ok(material)
    }

    fn texture_ref(&mut self, owner: &str, tex: &'s TextureRef, depth: usize) -> SceneResult<Arc<dyn Texture>> {
        match tex {
            TextureRef::Color(color) => Ok(Arc::new(SolidColor::new(*color))),
            TextureRef::Named(name) => self.texture(owner, name, depth),
        }
    }

    fn texture(&mut self, owner: &str, name: &'s str, depth: usize) -> SceneResult<Arc<dyn Texture>> {
        if let Some(texture) = self.textures.get(name) {
            return Ok(texture.clone());
        }
        if depth > MAX_TEXTURE_NESTING {
            return Err(SceneError::Invalid(format!(
                "texture '{}' nests too deeply (cyclic checker?)",
                name
            )));
        }

        let scene = self.scene;
        let desc = scene
            .textures
            .get(name)
            .ok_or_else(|| SceneError::UnknownTexture {
                material: owner.to_string(),
                name: name.to_string(),
            })?;

        let texture: Arc<dyn Texture> = match desc {
            TextureDesc::Solid { color } => Arc::new(SolidColor::new(*color)),
            TextureDesc::Checker { scale, even, odd } => {
                let even = self.texture_ref(owner, even, depth + 1)?;
                let odd = self.texture_ref(owner, odd, depth + 1)?;
                Arc::new(CheckerTexture::new(*scale, even, odd))
            }
            TextureDesc::Image { file } => Arc::new(ImageTexture::load(file)),
        };

        self.textures.insert(name, texture.clone());
        Ok(texture)
    }
}
