use lumen_core::{CameraConfig, MaterialDesc, ObjectDesc, SceneDescription, SceneError, TextureDesc, TextureRef};
use lumen_math::{Point3, Vec3};

const CORNELL_LIKE: &str = r#"{
    "camera": {
        "aspect_ratio": 1.0,
        "image_width": 64,
        "samples_per_pixel": 4,
        "max_depth": 8,
        "vfov": 40.0,
        "lookfrom": [278.0, 278.0, -800.0],
        "lookat": [278.0, 278.0, 0.0]
    },
    "textures": {
        "checks": { "type": "checker", "scale": 0.32, "even": [0.2, 0.3, 0.1], "odd": [0.9, 0.9, 0.9] }
    },
    "materials": {
        "white": { "type": "lambertian", "albedo": [0.73, 0.73, 0.73] },
        "floor": { "type": "lambertian", "albedo": "checks" },
        "light": { "type": "diffuse_light", "emit": [15.0, 15.0, 15.0] },
        "glass": { "type": "dielectric", "refraction_index": 1.5 }
    },
    "objects": [
        { "type": "quad", "q": [343.0, 554.0, 332.0], "u": [-130.0, 0.0, 0.0], "v": [0.0, 0.0, -105.0], "material": "light" },
        { "type": "quad", "q": [0.0, 0.0, 0.0], "u": [555.0, 0.0, 0.0], "v": [0.0, 0.0, 555.0], "material": "floor" },
        { "type": "box", "a": [130.0, 0.0, 65.0], "b": [295.0, 165.0, 230.0], "material": "white" },
        { "type": "sphere", "center": [190.0, 90.0, 190.0], "radius": 90.0, "material": "glass" },
        { "type": "sphere", "center": [400.0, 90.0, 190.0], "center_end": [400.0, 120.0, 190.0], "radius": 50.0, "material": "white" }
    ]
}"#;

#[test]
fn test_parse_full_scene() {
    let scene = SceneDescription::from_json_str(CORNELL_LIKE).unwrap();

    assert_eq!(scene.camera.image_width, 64);
    assert_eq!(scene.camera.samples_per_pixel, 4);
    // Omitted fields keep their defaults
    assert_eq!(scene.camera.vup, Vec3::Y);
    assert_eq!(scene.camera.focus_dist, CameraConfig::default().focus_dist);

    assert_eq!(scene.objects.len(), 5);
    assert_eq!(scene.materials.len(), 4);
    assert!(matches!(scene.textures["checks"], TextureDesc::Checker { .. }));
    assert_eq!(
        scene.materials["floor"],
        MaterialDesc::Lambertian {
            albedo: TextureRef::Named("checks".into())
        }
    );

    match &scene.objects[4] {
        ObjectDesc::Sphere { center_end, .. } => {
            assert_eq!(*center_end, Some(Point3::new(400.0, 120.0, 190.0)));
        }
        other => panic!("expected a sphere, got {other:?}"),
    }
    match &scene.objects[3] {
        ObjectDesc::Sphere { center_end, .. } => assert!(center_end.is_none()),
        other => panic!("expected a sphere, got {other:?}"),
    }
}

#[test]
fn test_unknown_material_is_reported_with_index() {
    let json = r#"{
        "materials": { "red": { "type": "lambertian", "albedo": [0.65, 0.05, 0.05] } },
        "objects": [
            { "type": "sphere", "center": [0.0, 0.0, -1.0], "radius": 0.5, "material": "red" },
            { "type": "disk", "q": [0.0, 0.0, 0.0], "u": [1.0, 0.0, 0.0], "v": [0.0, 1.0, 0.0], "material": "blue" }
        ]
    }"#;

    match SceneDescription::from_json_str(json) {
        Err(SceneError::UnknownMaterial { index, name }) => {
            assert_eq!(index, 1);
            assert_eq!(name, "blue");
        }
        other => panic!("expected UnknownMaterial, got {other:?}"),
    }
}

#[test]
fn test_malformed_json_is_json_error() {
    let err = SceneDescription::from_json_str("{ \"objects\": [ }").unwrap_err();
    assert!(matches!(err, SceneError::Json(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = SceneDescription::load("no/such/scene-file.json").unwrap_err();
    assert!(matches!(err, SceneError::Io(_)));
}

#[test]
fn test_round_trip_through_file() {
    let _ = env_logger::builder().is_test(true).try_init();

    let scene = SceneDescription::from_json_str(CORNELL_LIKE).unwrap();
    let path = std::env::temp_dir().join(format!("lumen-scene-{}.json", std::process::id()));
    std::fs::write(&path, serde_json::to_string_pretty(&scene).unwrap()).unwrap();

    let loaded = SceneDescription::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.objects.len(), scene.objects.len());
    assert_eq!(loaded.camera.image_width, scene.camera.image_width);
    assert_eq!(loaded.materials.keys().collect::<Vec<_>>(), scene.materials.keys().collect::<Vec<_>>());
}
