//! End-to-end runs of the terrain pipeline from a config file on disk.

use vista_app::{PipelineError, run};
use vista_config::Config;
use vista_mesh::{FLOATS_PER_VERTEX, NormalMode, Triangulation};
use vista_terrain::{BiomeTable, DegeneratePolicy, HeightmapError};

fn small_config() -> Config {
    let mut config = Config::default();
    config.terrain.seed = 2024;
    config.terrain.heightmap.width = 24;
    config.terrain.heightmap.height = 20;
    config.terrain.heightmap.scale = 6.0;
    config
}

#[test]
fn config_file_drives_generation() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = small_config();
    config.output.color_map_png = Some(dir.path().join("colors.png"));
    config.output.heightmap_png = Some(dir.path().join("height.png"));
    config.save(dir.path()).unwrap();

    let loaded = Config::load_or_create(dir.path()).unwrap();
    let terrain = run(&loaded).unwrap();

    assert_eq!(terrain.color_map.width(), 24);
    assert_eq!(terrain.color_map.height(), 20);
    assert_eq!(terrain.mesh.triangle_count(), 2 * 23 * 18);
    assert_eq!(
        terrain.mesh.as_floats().len(),
        terrain.mesh.vertex_count() * FLOATS_PER_VERTEX
    );
    assert!(dir.path().join("colors.png").exists());
    assert!(dir.path().join("height.png").exists());
}

#[test]
fn default_normals_point_up() {
    let terrain = run(&small_config()).unwrap();
    assert!(
        terrain
            .mesh
            .vertices()
            .iter()
            .all(|v| v.normal == [0.0, 1.0, 0.0])
    );
}

#[test]
fn full_triangulation_with_smooth_normals() {
    let mut config = small_config();
    config.mesh.triangulation = Triangulation::Full;
    config.mesh.normals = NormalMode::Smooth;

    let terrain = run(&config).unwrap();
    assert_eq!(terrain.mesh.triangle_count(), 2 * 23 * 19);
    for vertex in terrain.mesh.vertices() {
        let [x, y, z] = vertex.normal;
        let len = (x * x + y * y + z * z).sqrt();
        assert!((len - 1.0).abs() < 1e-4, "normal not unit length: {len}");
        assert!(y > 0.0, "normal points down: {:?}", vertex.normal);
    }
}

#[test]
fn mesh_spans_the_height_range() {
    let terrain = run(&small_config()).unwrap();
    let ys = terrain.mesh.vertices().iter().map(|v| v.position[1]);
    let (lo, hi) = ys.fold((f32::MAX, f32::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)));
    assert!(lo >= 0.0);
    assert!(hi <= 10.0 + 1e-4);
}

#[test]
fn colors_come_from_the_biome_table() {
    let config = small_config();
    let terrain = run(&config).unwrap();
    let palette: Vec<_> = config.biomes.bands().iter().map(|b| b.color).collect();
    assert!(terrain.color_map.pixels().iter().all(|c| palette.contains(c)));
    assert!(terrain.color_map.unique_color_count() <= BiomeTable::default().len());
}

#[test]
fn invalid_dimensions_fail() {
    let mut config = small_config();
    config.terrain.heightmap.width = 0;
    let result = run(&config);
    assert!(matches!(
        result,
        Err(PipelineError::Heightmap(HeightmapError::ZeroDimensions { .. }))
    ));
}

#[test]
fn fill_policy_leaves_varied_noise_alone() {
    let mut config = small_config();
    config.terrain.heightmap.octaves = 1;
    config.terrain.degenerate = DegeneratePolicy::Fill(0.5);
    let filled = run(&config).unwrap();

    config.terrain.degenerate = DegeneratePolicy::Fail;
    let strict = run(&config).unwrap();
    assert_eq!(filled.mesh, strict.mesh);
}

#[test]
fn invalid_height_scale_fails_before_any_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = small_config();
    config.mesh.height_scale_range = (f32::INFINITY, 1.0);
    config.output.heightmap_png = Some(dir.path().join("height.png"));

    assert!(matches!(run(&config), Err(PipelineError::Mesh(_))));
    assert!(!dir.path().join("height.png").exists());
}
