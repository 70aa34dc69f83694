use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use cartograph::render::{draw_image, draw_zoom_levels, draw_zoom_levels_parallel};
use cartograph::style::{AreaStyle, Color, LineStyle, WayStyle};
use cartograph::{CancellationToken, GeoPoint, ImageFormat, ImageOptions, Map, SkiaCanvas, TileOptions};

const RED: Color = Color::rgb(220, 20, 20);

fn scratch() -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(dir.path()).unwrap().to_owned();
    (dir, root)
}

fn block_map() -> Map {
    let mut map = Map::new();
    let block = [
        GeoPoint::new(-40.0, -90.0),
        GeoPoint::new(-40.0, 90.0),
        GeoPoint::new(40.0, 90.0),
        GeoPoint::new(40.0, -90.0),
    ];
    map.add_area(&block, Arc::new(AreaStyle::new(0, RED))).unwrap();
    map.add_way(
        &[GeoPoint::new(60.0, -170.0), GeoPoint::new(60.0, 170.0)],
        Arc::new(WayStyle::new(1, Color::BLACK).with_line(LineStyle::Dashed, 2.0)),
    )
    .unwrap();
    map
}

fn rgb(path: &Utf8Path, x: u32, y: u32) -> [u8; 3] {
    let image = image::open(path).unwrap().to_rgb8();
    image.get_pixel(x, y).0
}

#[test]
fn writes_png_tiles() {
    let (_dir, root) = scratch();
    let mut map = block_map();
    let options = TileOptions::new(root.clone()).with_zooms(0, Some(2));
    let report =
        draw_zoom_levels(&mut map, &options, &mut SkiaCanvas::new(), &CancellationToken::new()).unwrap();
    assert!(report.is_complete(), "{:?}", report.failed);
    assert_eq!(report.rendered, 5);

    let world = root.join("0/0/0.png");
    let image = image::open(&world).unwrap();
    assert_eq!((image.width(), image.height()), (256, 256));

    // The block straddles the origin, the polar corners stay background
    assert_eq!(rgb(&world, 128, 128), [220, 20, 20]);
    assert_eq!(rgb(&world, 2, 2), [255, 255, 255]);

    // At zoom 1 the origin is the shared corner of all four tiles
    for (x, y, px, py) in [(0, 0, 250, 250), (1, 0, 5, 250), (0, 1, 250, 5), (1, 1, 5, 5)] {
        let tile = root.join(format!("1/{x}/{y}.png"));
        assert_eq!(rgb(&tile, px, py), [220, 20, 20], "{tile}");
    }
}

#[test]
fn parallel_tiles_match_sequential() {
    let (_dir, root) = scratch();
    let sequential = TileOptions::new(root.join("seq")).with_zooms(0, Some(3));
    let parallel = TileOptions::new(root.join("par")).with_zooms(0, Some(3));

    draw_zoom_levels(&mut block_map(), &sequential, &mut SkiaCanvas::new(), &CancellationToken::new())
        .unwrap();
    let report =
        draw_zoom_levels_parallel(&mut block_map(), &parallel, SkiaCanvas::new, &CancellationToken::new())
            .unwrap();
    assert_eq!(report.rendered, 1 + 4 + 16);

    for tile in ["0/0/0.png", "1/1/0.png", "2/3/1.png", "2/0/2.png"] {
        let a = image::open(root.join("seq").join(tile)).unwrap().to_rgba8();
        let b = image::open(root.join("par").join(tile)).unwrap().to_rgba8();
        assert!(a == b, "{tile} differs");
    }
}

#[test]
fn writes_jpeg_overview() {
    let (_dir, root) = scratch();
    let mut map = block_map();
    map.set_by_box(-60.0, 60.0, -120.0, 120.0).unwrap();
    let path = root.join("overview.jpg");
    let options = ImageOptions::new(path.clone()).with_dpi(64);
    assert_eq!(options.format, ImageFormat::Jpeg);

    draw_image(&mut map, &options, &mut SkiaCanvas::new()).unwrap();

    let image = image::open(&path).unwrap();
    let expected_width = (map.bounds().aspect_ratio() * 64.0).round() as u32;
    assert_eq!((image.width(), image.height()), (expected_width, 64));
}
