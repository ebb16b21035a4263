// src/bench/session.rs
//! Generation session: owns the objects root, tears down the previous pass and
//! realizes a freshly planned BatchSet as render entities.

use std::fmt;

use bevy::prelude::*;
use bevy::render::batching::NoAutomaticBatching;

use crate::bench::batching::{combine_instances, plan_batches};
use crate::bench::core::{BatchKind, BatchSet, CombinedBatch, GenerationError, GridSpec, MeshShape};
use crate::bench::material::MaterialPanel;
use crate::bench::settings::{BenchConfig, BenchSettings, GeometrySettings};

/// Marker on the container every generated object is parented to.
#[derive(Component)]
pub struct BenchRoot;

/// Marker on every generated render object.
#[derive(Component)]
pub struct BenchObject;

/// A mesh the user can generate grids of.
#[derive(Clone, Debug)]
pub struct ShapeEntry {
    pub name: String,
    pub mesh: Handle<Mesh>,
}

/// Builtin shapes first, then config-provided custom meshes.
#[derive(Resource, Default)]
pub struct BenchShapes {
    pub entries: Vec<ShapeEntry>,
}

/// Material presets with their parameter controls; `active` indexes `panels`.
#[derive(Resource, Default)]
pub struct BenchMaterials {
    pub panels: Vec<MaterialPanel>,
    pub active: Option<usize>,
}

impl BenchMaterials {
    pub fn active_panel(&self) -> Option<&MaterialPanel> {
        self.active.and_then(|i| self.panels.get(i))
    }

    pub fn active_handle(&self) -> Option<Handle<StandardMaterial>> {
        self.active_panel().map(|p| p.handle.clone())
    }
}

/// Ask for a new grid of `BenchShapes::entries[shape]`.
#[derive(Event, Clone, Copy, Debug)]
pub struct GenerateRequest {
    pub shape: usize,
}

/// Switch every generated object to `BenchMaterials::panels[index]`.
#[derive(Event, Clone, Copy, Debug)]
pub struct SelectMaterial(pub usize);

/// Write `value` into parameter `index` of the active material.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct SetParameter {
    pub index: usize,
    pub value: f32,
}

/// Summary of the last generation pass.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct CreatedInfo(pub Option<CreatedSummary>);

#[derive(Clone, Debug, PartialEq)]
pub struct CreatedSummary {
    /// Render objects spawned (combined meshes when combining, else instances).
    pub objects: usize,
    pub total_vertices: usize,
    pub combined: bool,
    pub static_batching: bool,
}

impl CreatedSummary {
    pub fn from_set(set: &BatchSet, combined: bool, static_batching: bool) -> Self {
        Self {
            objects: set.batch_count(),
            total_vertices: set.vertex_count(),
            combined,
            static_batching,
        }
    }
}

impl fmt::Display for CreatedInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => write!(f, "<None>"),
            Some(s) => write!(
                f,
                "Objects {}\nTotal Verts {}\nCombined {}\nBatching {}",
                s.objects, s.total_vertices, s.combined, s.static_batching
            ),
        }
    }
}

// ---------- Startup ----------

/// Startup: read config, seed geometry settings, build shape and material lists.
pub fn init_session(
    mut commands: Commands,
    settings: Res<BenchSettings>,
    assets: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let cfg = BenchConfig::load_or_default(&settings.config_path);

    let mut geometry = GeometrySettings::from_config(&cfg);
    geometry.apply_overrides(|k| std::env::var(k).ok());
    commands.insert_resource(geometry);

    let mut entries = vec![
        ShapeEntry { name: "Cube".into(), mesh: meshes.add(Cuboid::default()) },
        ShapeEntry { name: "Sphere".into(), mesh: meshes.add(Sphere::new(0.5)) },
        ShapeEntry { name: "Capsule".into(), mesh: meshes.add(Capsule3d::default()) },
        ShapeEntry { name: "Quad".into(), mesh: meshes.add(Rectangle::default()) },
    ];
    for def in &cfg.custom_meshes {
        entries.push(ShapeEntry { name: def.name.clone(), mesh: assets.load(def.path.clone()) });
    }
    info!("Bench: {} shapes available", entries.len());
    commands.insert_resource(BenchShapes { entries });

    // Each preset gets its own material asset so edits never leak between presets.
    let panels: Vec<MaterialPanel> = cfg
        .materials
        .iter()
        .map(|preset| {
            let mat = preset.to_material();
            let panel = MaterialPanel::new(preset.name.clone(), Handle::default(), &mat);
            MaterialPanel { handle: materials.add(mat), ..panel }
        })
        .collect();
    let active = if panels.is_empty() { None } else { Some(0) };
    commands.insert_resource(BenchMaterials { panels, active });

    commands.spawn((
        BenchRoot,
        Name::new("ObjectsRoot"),
        Transform::default(),
        Visibility::default(),
    ));
}

// ---------- Generation ----------

/// Plan a pass for `shape` using the current geometry settings.
pub fn plan_for(shape: &MeshShape, geometry: &GeometrySettings) -> Result<BatchSet, GenerationError> {
    let grid = GridSpec::new(geometry.count, geometry.spacing)?;
    plan_batches(shape, geometry.scale, grid.positions(), geometry.combine_meshes)
}

/// Update: handle generate requests (last one per frame wins).
#[allow(clippy::too_many_arguments)]
pub fn handle_generate_requests(
    mut commands: Commands,
    mut requests: EventReader<GenerateRequest>,
    shapes: Res<BenchShapes>,
    geometry: Res<GeometrySettings>,
    bench_materials: Res<BenchMaterials>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut created: ResMut<CreatedInfo>,
    q_root: Query<Entity, With<BenchRoot>>,
    q_objects: Query<Entity, With<BenchObject>>,
) {
    let Some(req) = requests.read().last().copied() else { return };
    let Some(entry) = shapes.entries.get(req.shape) else {
        warn!("Bench: no shape at index {}", req.shape);
        return;
    };
    let Some(src) = meshes.get(&entry.mesh).cloned() else {
        warn!("Bench: mesh '{}' is not loaded yet", entry.name);
        return;
    };
    let Ok(root) = q_root.single() else {
        warn!("Bench: objects root missing");
        return;
    };

    let shape = MeshShape::from_mesh(entry.name.clone(), entry.mesh.clone(), &src);
    let set = match plan_for(&shape, &geometry) {
        Ok(set) => set,
        Err(e) => {
            warn!("Bench: generation rejected: {e}");
            return;
        }
    };

    // Previous pass goes away wholesale.
    for e in &q_objects {
        commands.entity(e).despawn();
    }

    let material = bench_materials.active_handle().unwrap_or_default();
    let mut spawned = 0usize;
    commands.entity(root).with_children(|parent| {
        for batch in &set.batches {
            let Some(bundle) = realize_batch(batch, &src, &mut meshes) else { continue };
            let mut obj = parent.spawn((
                bundle,
                MeshMaterial3d(material.clone()),
                Name::new(batch.name.clone()),
                BenchObject,
            ));
            if !geometry.static_batching {
                obj.insert(NoAutomaticBatching);
            }
            spawned += 1;
        }
    });

    let summary = CreatedSummary::from_set(&set, geometry.combine_meshes, geometry.static_batching);
    info!(
        "Bench: generated {} objects ({} instances, {} verts) of '{}'",
        spawned,
        set.instance_count(),
        summary.total_vertices,
        shape.name
    );
    created.0 = Some(summary);
}

/// Mesh + transform for one batch; combined batches bake a new mesh asset.
fn realize_batch(batch: &CombinedBatch, src: &Mesh, meshes: &mut Assets<Mesh>) -> Option<(Mesh3d, Transform)> {
    match batch.kind {
        BatchKind::Single => {
            let t = batch.instances.first().copied()?;
            Some((Mesh3d(batch.shape.mesh.clone()), t))
        }
        BatchKind::Combined => match combine_instances(src, &batch.instances) {
            Ok(merged) => Some((Mesh3d(meshes.add(merged)), Transform::IDENTITY)),
            Err(e) => {
                error!("Bench: failed to combine '{}': {e}", batch.name);
                None
            }
        },
    }
}

/// Update: re-assign the selected material to every generated object.
pub fn handle_material_selection(
    mut events: EventReader<SelectMaterial>,
    mut bench_materials: ResMut<BenchMaterials>,
    mut q_objects: Query<&mut MeshMaterial3d<StandardMaterial>, With<BenchObject>>,
) {
    let Some(SelectMaterial(index)) = events.read().last().copied() else { return };
    if index >= bench_materials.panels.len() || bench_materials.active == Some(index) {
        return;
    }
    bench_materials.active = Some(index);
    let Some(handle) = bench_materials.active_handle() else { return };
    for mut mat in &mut q_objects {
        mat.0 = handle.clone();
    }
    info!("Bench: active material '{}'", bench_materials.panels[index].name);
}

/// Update: apply parameter edits to the active material asset.
pub fn handle_parameter_edits(
    mut events: EventReader<SetParameter>,
    mut bench_materials: ResMut<BenchMaterials>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for ev in events.read() {
        let Some(active) = bench_materials.active else { return };
        let panel = &mut bench_materials.panels[active];
        let Some(material) = materials.get_mut(&panel.handle) else {
            warn!("Bench: material '{}' is missing", panel.name);
            return;
        };
        if let Some(v) = panel.set(ev.index, ev.value, material) {
            debug!("Bench: {}.{} = {v:.2}", panel.name, panel.controls[ev.index].name());
        }
    }
}

/// Update: keep the active panel's cached values in sync with its material asset.
pub fn sync_active_parameters(
    mut events: EventReader<AssetEvent<StandardMaterial>>,
    mut bench_materials: ResMut<BenchMaterials>,
    materials: Res<Assets<StandardMaterial>>,
) {
    let Some(active_id) = bench_materials.active_handle().map(|h| h.id()) else {
        events.clear();
        return;
    };
    let touched = events
        .read()
        .filter(|ev| matches!(ev, AssetEvent::Modified { id } if *id == active_id))
        .count();
    if touched == 0 {
        return;
    }
    let Some(active) = bench_materials.active else { return };
    if let Some(material) = materials.get(active_id) {
        bench_materials.panels[active].refresh(material);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(count: UVec3, combine: bool) -> GeometrySettings {
        GeometrySettings {
            count,
            spacing: 2.0,
            scale: 1.0,
            combine_meshes: combine,
            static_batching: false,
        }
    }

    #[test]
    fn created_info_starts_empty() {
        assert_eq!(CreatedInfo::default().to_string(), "<None>");
    }

    #[test]
    fn created_info_reports_last_pass() {
        let shape = MeshShape::new("Cube", 24, Handle::default());
        let set = plan_for(&shape, &geometry(UVec3::new(10, 1, 10), true)).unwrap();
        let info = CreatedInfo(Some(CreatedSummary::from_set(&set, true, false)));
        assert_eq!(info.to_string(), "Objects 1\nTotal Verts 2400\nCombined true\nBatching false");
    }

    #[test]
    fn unbatched_summary_counts_every_instance() {
        let shape = MeshShape::new("Cube", 24, Handle::default());
        let set = plan_for(&shape, &geometry(UVec3::new(3, 2, 3), false)).unwrap();
        let s = CreatedSummary::from_set(&set, false, true);
        assert_eq!(s.objects, 18);
        assert_eq!(s.total_vertices, 18 * 24);
    }

    #[test]
    fn zero_count_is_rejected_before_planning() {
        let shape = MeshShape::new("Cube", 24, Handle::default());
        assert!(plan_for(&shape, &geometry(UVec3::new(0, 1, 1), true)).is_err());
    }

    #[test]
    fn realize_single_uses_shape_mesh_and_instance_transform() {
        let mut meshes = Assets::<Mesh>::default();
        let src = Mesh::from(Cuboid::default());
        let handle = meshes.add(src.clone());
        let shape = MeshShape::from_mesh("Cube", handle.clone(), &src);
        let set = plan_batches(&shape, 2.0, [Vec3::X], false).unwrap();

        let (mesh, t) = realize_batch(&set.batches[0], &src, &mut meshes).unwrap();
        assert_eq!(mesh.0, handle);
        assert_eq!(t.translation, Vec3::X);
        assert_eq!(t.scale, Vec3::splat(2.0));
    }

    #[test]
    fn realize_combined_adds_one_mesh_asset() {
        let mut meshes = Assets::<Mesh>::default();
        let src = Mesh::from(Cuboid::default());
        let shape = MeshShape::from_mesh("Cube", Handle::default(), &src);
        let set = plan_batches(&shape, 1.0, [Vec3::ZERO, Vec3::X, Vec3::Y], true).unwrap();

        let (mesh, t) = realize_batch(&set.batches[0], &src, &mut meshes).unwrap();
        assert_eq!(t, Transform::IDENTITY);
        let merged = meshes.get(&mesh.0).unwrap();
        assert_eq!(merged.count_vertices(), src.count_vertices() * 3);
    }

    fn session_app(count: UVec3, combine: bool, static_batching: bool) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .init_resource::<CreatedInfo>()
            .add_event::<GenerateRequest>()
            .add_event::<SelectMaterial>()
            .add_event::<SetParameter>()
            .add_systems(
                Update,
                (
                    handle_material_selection,
                    handle_parameter_edits.after(handle_material_selection),
                    handle_generate_requests.after(handle_material_selection),
                ),
            );

        let world = app.world_mut();
        let cube = world.resource_mut::<Assets<Mesh>>().add(Cuboid::default());
        let panels: Vec<MaterialPanel> = {
            let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
            ["Default", "Metal"]
                .into_iter()
                .map(|name| {
                    let mat = StandardMaterial::default();
                    let panel = MaterialPanel::new(name, Handle::default(), &mat);
                    MaterialPanel { handle: materials.add(mat), ..panel }
                })
                .collect()
        };
        world.insert_resource(BenchShapes { entries: vec![ShapeEntry { name: "Cube".into(), mesh: cube }] });
        world.insert_resource(BenchMaterials { panels, active: Some(0) });
        world.insert_resource(GeometrySettings {
            count,
            spacing: 2.0,
            scale: 1.0,
            combine_meshes: combine,
            static_batching,
        });
        world.spawn((BenchRoot, Transform::default(), Visibility::default()));
        app
    }

    fn generate(app: &mut App) {
        app.world_mut().send_event(GenerateRequest { shape: 0 });
        app.update();
    }

    fn object_count(app: &mut App) -> usize {
        let mut q = app.world_mut().query_filtered::<(), With<BenchObject>>();
        q.iter(app.world()).count()
    }

    #[test]
    fn new_pass_replaces_the_previous_one() {
        let mut app = session_app(UVec3::new(2, 1, 2), false, false);
        generate(&mut app);
        assert_eq!(object_count(&mut app), 4);

        app.world_mut().resource_mut::<GeometrySettings>().count = UVec3::new(3, 1, 1);
        generate(&mut app);
        assert_eq!(object_count(&mut app), 3);

        let info = app.world().resource::<CreatedInfo>().0.clone().unwrap();
        assert_eq!(info.objects, 3);
        assert_eq!(info.total_vertices, 3 * 24);
        assert!(!info.combined);
    }

    #[test]
    fn generated_objects_hang_off_the_root() {
        let mut app = session_app(UVec3::new(2, 2, 1), false, false);
        generate(&mut app);
        let mut q_root = app.world_mut().query_filtered::<Entity, With<BenchRoot>>();
        let root = q_root.single(app.world()).unwrap();
        let mut q = app.world_mut().query_filtered::<&ChildOf, With<BenchObject>>();
        let parents: Vec<Entity> = q.iter(app.world()).map(|c| c.parent()).collect();
        assert_eq!(parents.len(), 4);
        assert!(parents.iter().all(|p| *p == root));
    }

    #[test]
    fn automatic_batching_is_opted_out_unless_enabled() {
        let mut app = session_app(UVec3::new(2, 1, 1), false, false);
        generate(&mut app);
        let mut q = app.world_mut().query_filtered::<Has<NoAutomaticBatching>, With<BenchObject>>();
        let flags: Vec<bool> = q.iter(app.world()).collect();
        assert_eq!(flags, vec![true, true]);

        app.world_mut().resource_mut::<GeometrySettings>().static_batching = true;
        generate(&mut app);
        let flags: Vec<bool> = q.iter(app.world()).collect();
        assert_eq!(flags, vec![false, false]);
        assert!(app.world().resource::<CreatedInfo>().0.as_ref().unwrap().static_batching);
    }

    #[test]
    fn combining_spawns_one_merged_mesh() {
        let mut app = session_app(UVec3::new(10, 1, 10), true, false);
        generate(&mut app);
        assert_eq!(object_count(&mut app), 1);

        let cube = app.world().resource::<BenchShapes>().entries[0].mesh.clone();
        let mut q = app.world_mut().query_filtered::<(&Mesh3d, &Transform, &Name), With<BenchObject>>();
        let (mesh, transform, name) = q.single(app.world()).unwrap();
        assert_ne!(mesh.0, cube);
        assert_eq!(*transform, Transform::IDENTITY);
        assert_eq!(name.as_str(), "Combined_Cube");
        let merged = app.world().resource::<Assets<Mesh>>().get(&mesh.0).unwrap();
        assert_eq!(merged.count_vertices(), 100 * 24);
    }

    #[test]
    fn rejected_grid_keeps_previous_objects() {
        let mut app = session_app(UVec3::new(2, 1, 2), false, false);
        generate(&mut app);
        app.world_mut().resource_mut::<GeometrySettings>().count = UVec3::new(0, 1, 1);
        generate(&mut app);
        assert_eq!(object_count(&mut app), 4);
        assert_eq!(app.world().resource::<CreatedInfo>().0.as_ref().unwrap().objects, 4);
    }

    #[test]
    fn selecting_a_material_reassigns_every_object() {
        let mut app = session_app(UVec3::new(2, 1, 2), false, false);
        generate(&mut app);
        let metal = app.world().resource::<BenchMaterials>().panels[1].handle.clone();

        app.world_mut().send_event(SelectMaterial(1));
        app.update();

        assert_eq!(app.world().resource::<BenchMaterials>().active, Some(1));
        let mut q = app
            .world_mut()
            .query_filtered::<&MeshMaterial3d<StandardMaterial>, With<BenchObject>>();
        let handles: Vec<Handle<StandardMaterial>> = q.iter(app.world()).map(|m| m.0.clone()).collect();
        assert_eq!(handles.len(), 4);
        assert!(handles.iter().all(|h| *h == metal));

        // A later pass uses the selection too.
        generate(&mut app);
        let handles: Vec<Handle<StandardMaterial>> = q.iter(app.world()).map(|m| m.0.clone()).collect();
        assert!(handles.iter().all(|h| *h == metal));
    }

    #[test]
    fn set_parameter_edits_the_active_material_asset() {
        let mut app = session_app(UVec3::ONE, false, false);
        let (handle, index) = {
            let panel = &app.world().resource::<BenchMaterials>().panels[0];
            let index = panel.controls.iter().position(|c| c.name() == "metallic").unwrap();
            (panel.handle.clone(), index)
        };

        app.world_mut().send_event(SetParameter { index, value: 0.75 });
        app.update();

        let material = app.world().resource::<Assets<StandardMaterial>>().get(&handle).unwrap();
        assert_eq!(material.metallic, 0.75);
        let panel = &app.world().resource::<BenchMaterials>().panels[0];
        assert_eq!(panel.controls[index].value(), 0.75);
    }
}
