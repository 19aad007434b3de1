//! Built-in demo scenes, expressed as scene descriptions.

use lumen_core::{CameraConfig, MaterialDesc, ObjectDesc, SceneDescription, TextureDesc, TextureRef};
use lumen_renderer::{Point3, Vec3};

use crate::cli::SceneChoice;

const SKY: Vec3 = Vec3::new(0.70, 0.80, 1.00);

pub fn builtin(choice: SceneChoice) -> SceneDescription {
    match choice {
        SceneChoice::Spheres => spheres(),
        SceneChoice::Quads => quads(),
        SceneChoice::Cornell => cornell_box(),
        SceneChoice::Checker => checkered_spheres(),
        SceneChoice::Earth => earth(),
    }
}

fn color(c: Vec3) -> TextureRef {
    TextureRef::Color(c)
}

fn lambertian(albedo: Vec3) -> MaterialDesc {
    MaterialDesc::Lambertian { albedo: color(albedo) }
}

fn sphere(center: Point3, radius: f64, material: &str) -> ObjectDesc {
    ObjectDesc::Sphere {
        center,
        center_end: None,
        radius,
        material: material.into(),
    }
}

fn quad(q: Point3, u: Vec3, v: Vec3, material: &str) -> ObjectDesc {
    ObjectDesc::Quad {
        q,
        u,
        v,
        material: material.into(),
    }
}

fn spheres() -> SceneDescription {
    let mut scene = SceneDescription {
        camera: CameraConfig::new()
            .with_resolution(400, 16.0 / 9.0)
            .with_quality(100, 50)
            .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.6, 10.0)
            .with_background(SKY),
        ..Default::default()
    };

    scene.materials.insert("ground".into(), lambertian(Vec3::splat(0.5)));
    scene.materials.insert("glass".into(), MaterialDesc::Dielectric { refraction_index: 1.5 });
    scene.materials.insert("brown".into(), lambertian(Vec3::new(0.4, 0.2, 0.1)));
    scene.materials.insert(
        "steel".into(),
        MaterialDesc::Metal {
            albedo: Vec3::new(0.7, 0.6, 0.5),
            fuzz: 0.0,
        },
    );
    scene.materials.insert("red".into(), lambertian(Vec3::new(0.8, 0.2, 0.1)));

    scene.objects = vec![
        sphere(Point3::new(0.0, -1000.0, 0.0), 1000.0, "ground"),
        sphere(Point3::new(0.0, 1.0, 0.0), 1.0, "glass"),
        sphere(Point3::new(-4.0, 1.0, 0.0), 1.0, "brown"),
        sphere(Point3::new(4.0, 1.0, 0.0), 1.0, "steel"),
        // Motion blur
        ObjectDesc::Sphere {
            center: Point3::new(2.0, 0.2, 2.0),
            center_end: Some(Point3::new(2.0, 0.5, 2.0)),
            radius: 0.2,
            material: "red".into(),
        },
    ];

    scene
}

fn quads() -> SceneDescription {
    let mut scene = SceneDescription {
        camera: CameraConfig::new()
            .with_resolution(400, 1.0)
            .with_quality(100, 50)
            .with_position(Point3::new(0.0, 0.0, 9.0), Point3::ZERO, Vec3::Y)
            .with_lens(80.0, 0.0, 10.0)
            .with_background(SKY),
        ..Default::default()
    };

    scene.materials.insert("left_red".into(), lambertian(Vec3::new(1.0, 0.2, 0.2)));
    scene.materials.insert("back_green".into(), lambertian(Vec3::new(0.2, 1.0, 0.2)));
    scene.materials.insert("right_blue".into(), lambertian(Vec3::new(0.2, 0.2, 1.0)));
    scene.materials.insert("upper_orange".into(), lambertian(Vec3::new(1.0, 0.5, 0.0)));
    scene.materials.insert("lower_teal".into(), lambertian(Vec3::new(0.2, 0.8, 0.8)));

    scene.objects = vec![
        quad(Point3::new(-3.0, -2.0, 5.0), Vec3::new(0.0, 0.0, -4.0), Vec3::new(0.0, 4.0, 0.0), "left_red"),
        quad(Point3::new(-2.0, -2.0, 0.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 4.0, 0.0), "back_green"),
        quad(Point3::new(3.0, -2.0, 1.0), Vec3::new(0.0, 0.0, 4.0), Vec3::new(0.0, 4.0, 0.0), "right_blue"),
        quad(Point3::new(-2.0, 3.0, 1.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 4.0), "upper_orange"),
        quad(Point3::new(-2.0, -3.0, 5.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -4.0), "lower_teal"),
    ];

    scene
}

fn cornell_box() -> SceneDescription {
    let mut scene = SceneDescription {
        camera: CameraConfig::new()
            .with_resolution(600, 1.0)
            .with_quality(200, 50)
            .with_position(Point3::new(278.0, 278.0, -800.0), Point3::new(278.0, 278.0, 0.0), Vec3::Y)
            .with_lens(40.0, 0.0, 10.0)
            .with_background(Vec3::ZERO),
        ..Default::default()
    };

    scene.materials.insert("red".into(), lambertian(Vec3::new(0.65, 0.05, 0.05)));
    scene.materials.insert("white".into(), lambertian(Vec3::splat(0.73)));
    scene.materials.insert("green".into(), lambertian(Vec3::new(0.12, 0.45, 0.15)));
    scene.materials.insert(
        "light".into(),
        MaterialDesc::DiffuseLight {
            emit: color(Vec3::splat(15.0)),
        },
    );

    let side = 555.0;
    scene.objects = vec![
        quad(Point3::new(side, 0.0, 0.0), Vec3::new(0.0, side, 0.0), Vec3::new(0.0, 0.0, side), "green"),
        quad(Point3::ZERO, Vec3::new(0.0, side, 0.0), Vec3::new(0.0, 0.0, side), "red"),
        quad(Point3::new(343.0, 554.0, 332.0), Vec3::new(-130.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -105.0), "light"),
        quad(Point3::ZERO, Vec3::new(side, 0.0, 0.0), Vec3::new(0.0, 0.0, side), "white"),
        quad(Point3::splat(side), Vec3::new(-side, 0.0, 0.0), Vec3::new(0.0, 0.0, -side), "white"),
        quad(Point3::new(0.0, 0.0, side), Vec3::new(side, 0.0, 0.0), Vec3::new(0.0, side, 0.0), "white"),
        ObjectDesc::Box {
            a: Point3::new(130.0, 0.0, 65.0),
            b: Point3::new(295.0, 165.0, 230.0),
            material: "white".into(),
        },
        ObjectDesc::Box {
            a: Point3::new(265.0, 0.0, 295.0),
            b: Point3::new(430.0, 330.0, 460.0),
            material: "white".into(),
        },
    ];

    scene
}

fn checkered_spheres() -> SceneDescription {
    let mut scene = SceneDescription {
        camera: CameraConfig::new()
            .with_resolution(400, 16.0 / 9.0)
            .with_quality(100, 50)
            .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.0, 10.0)
            .with_background(SKY),
        ..Default::default()
    };

    scene.textures.insert(
        "checker".into(),
        TextureDesc::Checker {
            scale: 0.32,
            even: color(Vec3::new(0.2, 0.3, 0.1)),
            odd: color(Vec3::splat(0.9)),
        },
    );
    scene.materials.insert(
        "checkered".into(),
        MaterialDesc::Lambertian {
            albedo: TextureRef::Named("checker".into()),
        },
    );

    scene.objects = vec![
        sphere(Point3::new(0.0, -10.0, 0.0), 10.0, "checkered"),
        sphere(Point3::new(0.0, 10.0, 0.0), 10.0, "checkered"),
    ];

    scene
}

fn earth() -> SceneDescription {
    let mut scene = SceneDescription {
        camera: CameraConfig::new()
            .with_resolution(400, 16.0 / 9.0)
            .with_quality(100, 50)
            .with_position(Point3::new(0.0, 0.0, 12.0), Point3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.0, 10.0)
            .with_background(SKY),
        ..Default::default()
    };

    scene.textures.insert(
        "earth".into(),
        TextureDesc::Image {
            file: "earthmap.jpg".into(),
        },
    );
    scene.materials.insert(
        "earth_surface".into(),
        MaterialDesc::Lambertian {
            albedo: TextureRef::Named("earth".into()),
        },
    );
    scene.objects = vec![sphere(Point3::ZERO, 2.0, "earth_surface")];

    scene
}
