//! Behavioural tests for [`LeafletMap`].

use std::cell::RefCell;

use camino::Utf8PathBuf;
use catchment_core::test_support::square_around;
use catchment_core::{BoundingBox, ElementId, Isochrone, MapFeature, RenderError, RenderSink};
use catchment_data::{ChainPalette, LeafletMap, LeafletMapConfig};
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

/// Scenario state: destination, palette and the outcome of `finish`.
#[derive(Debug, Default)]
pub struct MapWorld {
    output: Option<Utf8PathBuf>,
    palette: ChainPalette,
    html: Option<String>,
    result: Option<Result<(), RenderError>>,
}

#[fixture]
pub fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("create temporary directory: {err}"),
    }
}

#[fixture]
pub fn world() -> RefCell<MapWorld> {
    RefCell::new(MapWorld::default())
}

fn utf8_dir(temp_dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf())
        .unwrap_or_else(|path| panic!("non-UTF-8 temp dir: {}", path.display()))
}

fn outlet(id: u64, name: &str, chain: &str, location: Coord<f64>) -> MapFeature {
    let mut isochrone = Isochrone::new(square_around(location));
    isochrone.total_population = Some(4200.0);
    MapFeature {
        id: ElementId::node(id),
        location,
        display_name: name.to_owned(),
        chain: chain.to_owned(),
        isochrone,
    }
}

fn run(world: &RefCell<MapWorld>, features: &[MapFeature]) {
    let mut state = world.borrow_mut();
    let Some(output) = state.output.clone() else {
        panic!("map output must be initialised");
    };
    let bbox = BoundingBox::new(-37.11, 174.38, -36.67, 175.08)
        .unwrap_or_else(|err| panic!("valid bbox: {err}"));
    let config = LeafletMapConfig::new(output, &bbox).with_palette(state.palette.clone());
    let mut map = LeafletMap::new(config);
    for feature in features {
        map.render(feature)
            .unwrap_or_else(|err| panic!("render {}: {err}", feature.id));
    }
    state.html = Some(map.to_html());
    state.result = Some(map.finish());
}

#[given("a map output in a fresh directory")]
fn fresh_output(temp_dir: &TempDir, #[from(world)] world: &RefCell<MapWorld>) {
    world.borrow_mut().output = Some(utf8_dir(temp_dir).join("maps/catchment.html"));
}

#[given("a map output that names an existing directory")]
fn directory_output(temp_dir: &TempDir, #[from(world)] world: &RefCell<MapWorld>) {
    let dir = utf8_dir(temp_dir).join("taken");
    std::fs::create_dir_all(dir.as_std_path())
        .unwrap_or_else(|err| panic!("create {dir}: {err}"));
    world.borrow_mut().output = Some(dir);
}

#[given("chains Countdown and New World coloured green and red")]
fn two_chain_palette(#[from(world)] world: &RefCell<MapWorld>) {
    world.borrow_mut().palette = ChainPalette::new(["Countdown", "New World"], ["green", "red"]);
}

#[when("a Countdown and a New World outlet are rendered")]
fn render_two(#[from(world)] world: &RefCell<MapWorld>) {
    run(
        world,
        &[
            outlet(1, "Countdown Mt Eden", "countdown", Coord { x: 174.76, y: -36.88 }),
            outlet(2, "New World Metro", "new world", Coord { x: 174.77, y: -36.90 }),
        ],
    );
}

#[when("no outlets are rendered")]
fn render_none(#[from(world)] world: &RefCell<MapWorld>) {
    run(world, &[]);
}

#[then("the map file exists")]
fn map_exists(#[from(world)] world: &RefCell<MapWorld>) {
    let state = world.borrow();
    assert!(
        matches!(state.result, Some(Ok(()))),
        "finish failed: {:?}",
        state.result
    );
    let Some(output) = state.output.as_ref() else {
        panic!("map output must be initialised");
    };
    let written = std::fs::read_to_string(output.as_std_path())
        .unwrap_or_else(|err| panic!("read {output}: {err}"));
    assert_eq!(Some(&written), state.html.as_ref());
}

fn html(world: &RefCell<MapWorld>) -> String {
    world
        .borrow()
        .html
        .clone()
        .unwrap_or_else(|| panic!("map must be rendered"))
}

#[then("the Countdown layer is green with its population in the popup")]
fn countdown_layer(#[from(world)] world: &RefCell<MapWorld>) {
    let html = html(world);
    assert!(html.contains(
        r#""name":"Countdown Mt Eden","chain":"countdown","colour":"green","popup":"Countdown Mt Eden, Population: 4200""#
    ));
}

#[then("the New World layer is red")]
fn new_world_layer(#[from(world)] world: &RefCell<MapWorld>) {
    assert!(html(world).contains(r#""chain":"new world","colour":"red""#));
}

#[then("the map contains no layers")]
fn no_layers(#[from(world)] world: &RefCell<MapWorld>) {
    let html = html(world);
    assert!(html.contains("const layers = [\n\n];"));
}

#[then("a write error names the destination")]
fn write_error(#[from(world)] world: &RefCell<MapWorld>) {
    let state = world.borrow();
    match state.result.as_ref() {
        Some(Err(RenderError::Write { path, .. })) => {
            assert!(path.ends_with("taken"), "unexpected path {path}");
        }
        other => panic!("expected a write error, got {other:?}"),
    }
}

#[scenario(path = "tests/features/leaflet_map.feature", index = 0)]
fn coloured_outlets(temp_dir: TempDir, world: RefCell<MapWorld>) {
    let _ = (temp_dir, world);
}

#[scenario(path = "tests/features/leaflet_map.feature", index = 1)]
fn empty_map(temp_dir: TempDir, world: RefCell<MapWorld>) {
    let _ = (temp_dir, world);
}

#[scenario(path = "tests/features/leaflet_map.feature", index = 2)]
fn unwritable_destination(temp_dir: TempDir, world: RefCell<MapWorld>) {
    let _ = (temp_dir, world);
}
